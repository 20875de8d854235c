use super::OutboundMessage;

/// Anything that can deliver an [`OutboundMessage`] to the device.
///
/// The encoder never reads anything back from the sink. If the sink is shared between threads,
/// making it thread-safe is the sink's business.
pub trait MessageSink {
    fn send_message(&mut self, message: OutboundMessage) -> Result<(), crate::MidiError>;
}

impl<S: MessageSink + ?Sized> MessageSink for &mut S {
    fn send_message(&mut self, message: OutboundMessage) -> Result<(), crate::MidiError> {
        (**self).send_message(message)
    }
}

/// A sink that just remembers every message it was handed. Useful for tests and dry runs.
///
/// ```
/// # use apcy::{MessageSink, RecordingSink, OutboundMessage};
/// let mut sink = RecordingSink::new();
/// sink.send_message(OutboundMessage::SystemExclusive(vec![0xF0, 0xF7]))?;
/// assert_eq!(sink.messages().len(), 1);
/// # Ok::<(), apcy::MidiError>(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    messages: Vec<OutboundMessage>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[OutboundMessage] {
        &self.messages
    }

    /// Take all recorded messages, leaving the sink empty
    pub fn take(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.messages)
    }
}

impl MessageSink for RecordingSink {
    fn send_message(&mut self, message: OutboundMessage) -> Result<(), crate::MidiError> {
        self.messages.push(message);
        Ok(())
    }
}
