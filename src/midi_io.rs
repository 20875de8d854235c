use crate::{ok_or_continue, MessageSink, MidiError, OutboundMessage};
use midir::{MidiInput, MidiInputConnection, MidiInputPort, MidiOutput, MidiOutputConnection};

fn guess_port<T: midir::MidiIO>(midi_io: &T, keyword: &str) -> Option<T::Port> {
    for port in midi_io.ports() {
        let name = ok_or_continue!(midi_io.port_name(&port));

        if name.contains(keyword) {
            log::debug!("picked MIDI port {:?} for {:?}", name, keyword);
            return Some(port);
        }
    }

    None
}

/// A raw midir connection can be used as a sink directly
impl MessageSink for MidiOutputConnection {
    fn send_message(&mut self, message: OutboundMessage) -> Result<(), MidiError> {
        self.send(&message.to_bytes())?;
        Ok(())
    }
}

pub trait OutputDevice
where
    Self: Sized,
{
    const MIDI_CONNECTION_NAME: &'static str;
    const MIDI_DEVICE_KEYWORD: &'static str;

    /// Initiate from an existing midir connection.
    fn from_connection(connection: MidiOutputConnection) -> Result<Self, MidiError>;

    /// Send raw bytes, bypassing all validation
    fn send(&mut self, bytes: &[u8]) -> Result<(), MidiError>;

    /// Search the MIDI devices and connect to the first one whose name contains
    /// [`MIDI_DEVICE_KEYWORD`](Self::MIDI_DEVICE_KEYWORD).
    fn guess() -> Result<Self, MidiError> {
        let midi_output = MidiOutput::new(crate::APPLICATION_NAME)?;

        let port = guess_port(&midi_output, Self::MIDI_DEVICE_KEYWORD).ok_or(
            MidiError::NoPortFound {
                keyword: Self::MIDI_DEVICE_KEYWORD,
            },
        )?;

        let connection = midi_output.connect(&port, Self::MIDI_CONNECTION_NAME)?;

        Self::from_connection(connection)
    }
}

pub struct InputDeviceHandler {
    #[allow(dead_code)]
    connection: MidiInputConnection<()>,
}

pub struct InputDeviceHandlerPolling<Message> {
    #[allow(dead_code)]
    connection: MidiInputConnection<()>,
    receiver: std::sync::mpsc::Receiver<Message>,
}

impl<Message> InputDeviceHandlerPolling<Message> {
    /// Wait for a message to arrive, and return that. For a non-block variant, see `try_recv()`.
    ///
    /// Returns `None` only if the MIDI backend has shut down the connection.
    pub fn recv(&self) -> Option<Message> {
        self.receiver.recv().ok()
    }

    /// If there is a pending message, return that. Otherwise, return `None`.
    ///
    /// This function does not block.
    pub fn try_recv(&self) -> Option<Message> {
        self.receiver.try_recv().ok()
    }

    /// Receives a single message. If no message arrives within the timespan specified by `timeout`,
    /// `None` is returned.
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<Message> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Returns an iterator over all arriving messages. The iterator will only return when the
    /// MIDI connection has been dropped.
    ///
    /// For an iteration method that doesn't block, but returns immediately when there are no more
    /// pending messages, see `iter_pending`.
    pub fn iter(&self) -> impl Iterator<Item = Message> + '_ {
        self.receiver.iter()
    }

    /// Returns an iterator over the currently pending messages. As soon as all pending messages
    /// have been iterated over, the iterator will return.
    ///
    /// For an iteration method that will block, waiting for new messages to arrive, see `iter()`.
    pub fn iter_pending(&self) -> impl Iterator<Item = Message> + '_ {
        self.receiver.try_iter()
    }

    /// Drain of any pending messages, e.g. knob positions the device reports right after
    /// connecting.
    ///
    /// This function returns the number of messages that were discarded.
    pub fn drain(&self) -> usize {
        self.iter_pending().count()
    }
}

pub trait InputDevice
where
    Self: Sized + 'static,
{
    const MIDI_CONNECTION_NAME: &'static str;
    const MIDI_DEVICE_KEYWORD: &'static str;
    type Message;

    fn decode_message(timestamp: u64, data: &[u8]) -> Self::Message;

    #[must_use = "If not saved, the connection will be immediately dropped"]
    fn from_port<F>(
        midi_input: MidiInput,
        port: &MidiInputPort,
        mut user_callback: F,
    ) -> Result<InputDeviceHandler, MidiError>
    where
        F: FnMut(Self::Message) + Send + 'static,
    {
        let midir_callback = move |timestamp: u64, data: &[u8], _: &mut _| {
            let msg = Self::decode_message(timestamp, data);
            (user_callback)(msg);
        };

        let connection = midi_input.connect(port, Self::MIDI_CONNECTION_NAME, midir_callback, ())?;

        Ok(InputDeviceHandler { connection })
    }

    #[must_use = "If not saved, the connection will be immediately dropped"]
    fn from_port_polling(
        midi_input: MidiInput,
        port: &MidiInputPort,
    ) -> Result<InputDeviceHandlerPolling<Self::Message>, MidiError>
    where
        Self::Message: Send + 'static,
    {
        let (sender, receiver) = std::sync::mpsc::channel();
        let midir_callback = move |timestamp: u64, data: &[u8], _: &mut _| {
            let msg = Self::decode_message(timestamp, data);
            // only fails once the handler, and with it the receiver, is being dropped
            let _ = sender.send(msg);
        };

        let connection = midi_input.connect(port, Self::MIDI_CONNECTION_NAME, midir_callback, ())?;

        Ok(InputDeviceHandlerPolling {
            connection,
            receiver,
        })
    }

    /// Search the midi devices and choose the first midi device matching the wanted device type.
    #[must_use = "If not saved, the connection will be immediately dropped"]
    fn guess<F>(user_callback: F) -> Result<InputDeviceHandler, MidiError>
    where
        F: FnMut(Self::Message) + Send + 'static,
    {
        let midi_input = MidiInput::new(crate::APPLICATION_NAME)?;

        let port = guess_port(&midi_input, Self::MIDI_DEVICE_KEYWORD).ok_or(
            MidiError::NoPortFound {
                keyword: Self::MIDI_DEVICE_KEYWORD,
            },
        )?;

        Self::from_port(midi_input, &port, user_callback)
    }

    /// Search the midi devices and choose the first midi device matching the wanted device type.
    #[must_use = "If not saved, the connection will be immediately dropped"]
    fn guess_polling() -> Result<InputDeviceHandlerPolling<Self::Message>, MidiError>
    where
        Self::Message: Send + 'static,
    {
        let midi_input = MidiInput::new(crate::APPLICATION_NAME)?;

        let port = guess_port(&midi_input, Self::MIDI_DEVICE_KEYWORD).ok_or(
            MidiError::NoPortFound {
                keyword: Self::MIDI_DEVICE_KEYWORD,
            },
        )?;

        Self::from_port_polling(midi_input, &port)
    }
}
