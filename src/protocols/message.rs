use super::Channel;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xB0;

/// The value carried by an outbound Note-On.
///
/// Hosts driving the APC40 MK2 express note values as a normalized number in `0.0..=1.0`. A
/// switched LED is sent as the plain integer 1 or 0 (full velocity or off), while palette
/// colors and multi-level states are sent as `level / 127`. Both forms are kept distinct here
/// so that a sink expecting normalized values receives exactly that fraction.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteValue {
    /// On (1) or off (0)
    Switch(bool),
    /// A level in 0..=127, normalized as `level / 127`
    Level(u8),
}

impl NoteValue {
    /// The value as a fraction of full scale
    ///
    /// ```
    /// # use apcy::NoteValue;
    /// assert_eq!(NoteValue::Switch(true).normalized(), 1.0);
    /// assert_eq!(NoteValue::Level(45).normalized(), 45.0 / 127.0);
    /// ```
    pub fn normalized(self) -> f64 {
        match self {
            Self::Switch(on) => {
                if on {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Level(level) => level as f64 / 127.0,
        }
    }

    /// The velocity byte that goes on the wire
    pub fn velocity(self) -> u8 {
        match self {
            Self::Switch(true) => 127,
            Self::Switch(false) => 0,
            Self::Level(level) => level,
        }
    }
}

/// A message on its way to the device. Every encoder call produces exactly one of these.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutboundMessage {
    NoteOn {
        channel: Channel,
        note: u8,
        value: NoteValue,
    },
    ControlChange {
        channel: Channel,
        controller: u8,
        value: u8,
    },
    /// A complete System-Exclusive message, including the leading `0xF0` and trailing `0xF7`
    SystemExclusive(Vec<u8>),
}

impl OutboundMessage {
    /// Serialize into raw MIDI bytes
    ///
    /// ```
    /// # use apcy::{Channel, NoteValue, OutboundMessage};
    /// let msg = OutboundMessage::NoteOn {
    ///     channel: Channel::new(2)?,
    ///     note: 32,
    ///     value: NoteValue::Level(45),
    /// };
    /// assert_eq!(msg.to_bytes(), [0x91, 32, 45]);
    /// # Ok::<(), apcy::Error>(())
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::NoteOn {
                channel,
                note,
                value,
            } => vec![NOTE_ON | channel.nibble(), *note, value.velocity()],
            Self::ControlChange {
                channel,
                controller,
                value,
            } => vec![CONTROL_CHANGE | channel.nibble(), *controller, *value],
            Self::SystemExclusive(bytes) => bytes.clone(),
        }
    }
}

/// The kinds of inbound channel messages the decoder looks at
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    NoteOn,
    NoteOff,
    ControlChange,
}

/// A single received MIDI event, as handed to the decoder.
///
/// `index` is the note or controller number, `value` the velocity or controller value.
/// `is_input` tells whether the event came in from the device (as opposed to being an echo of
/// something sent to it); the decoder ignores everything that isn't input.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InboundEvent {
    pub kind: MessageKind,
    pub channel: Channel,
    pub index: u8,
    pub value: u8,
    pub is_input: bool,
}

impl InboundEvent {
    /// Parse a raw three-byte channel message received from the device.
    ///
    /// Returns `None` for anything that is not a Note-On, Note-Off or Control-Change, like
    /// SysEx replies. A Note-On with velocity 0 stays a Note-On: the APC40 MK2 sends real
    /// Note-Off messages, and the decoder's release rules depend on telling them apart.
    ///
    /// ```
    /// # use apcy::{InboundEvent, MessageKind};
    /// let event = InboundEvent::parse(&[0x80, 32, 0]).unwrap();
    /// assert_eq!(event.kind, MessageKind::NoteOff);
    /// assert_eq!(event.channel.number(), 1);
    /// assert!(event.is_input);
    /// ```
    pub fn parse(data: &[u8]) -> Option<Self> {
        let (status, index, value) = match *data {
            [status, index, value] if index <= 127 && value <= 127 => (status, index, value),
            _ => return None,
        };

        let kind = match status & 0xF0 {
            NOTE_ON => MessageKind::NoteOn,
            NOTE_OFF => MessageKind::NoteOff,
            CONTROL_CHANGE => MessageKind::ControlChange,
            _ => return None,
        };

        Some(Self {
            kind,
            channel: Channel::from_nibble(status),
            index,
            value,
            is_input: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_change_bytes_use_zero_based_channel() {
        let msg = OutboundMessage::ControlChange {
            channel: Channel::new(9).unwrap(),
            controller: 0x10,
            value: 30,
        };
        assert_eq!(msg.to_bytes(), [0xB8, 0x10, 30]);
    }

    #[test]
    fn switch_values_are_full_scale() {
        assert_eq!(NoteValue::Switch(true).velocity(), 127);
        assert_eq!(NoteValue::Switch(false).velocity(), 0);
        assert_eq!(NoteValue::Switch(false).normalized(), 0.0);
        assert_eq!(NoteValue::Level(2).velocity(), 2);
        assert_eq!(NoteValue::Level(2).normalized(), 2.0 / 127.0);
    }

    #[test]
    fn parse_keeps_zero_velocity_note_on() {
        let event = InboundEvent::parse(&[0x93, 0x30, 0]).unwrap();
        assert_eq!(event.kind, MessageKind::NoteOn);
        assert_eq!(event.channel.number(), 4);
        assert_eq!(event.index, 0x30);
        assert_eq!(event.value, 0);
    }

    #[test]
    fn parse_rejects_other_messages() {
        assert_eq!(InboundEvent::parse(&[0xF0, 0x47, 0xF7]), None);
        assert_eq!(InboundEvent::parse(&[0xE0, 0, 64]), None);
        assert_eq!(InboundEvent::parse(&[0x90, 0x30]), None);
        assert_eq!(InboundEvent::parse(&[0x90, 0x80, 127]), None);
    }
}
