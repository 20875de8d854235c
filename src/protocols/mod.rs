//! Transport-neutral MIDI message shapes shared by the encoder and the decoder.

mod message;
pub use message::*;

mod sink;
pub use sink::*;

/// A MIDI channel, numbered 1 to 16 like on the hardware and in the manuals.
///
/// On the wire, the channel is stored zero-based in the low nibble of the status byte; use
/// [`Channel::nibble`] and [`Channel::from_nibble`] to convert.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct Channel(u8);

impl Channel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 16;

    /// Create a channel from its 1-based number.
    ///
    /// ```
    /// # use apcy::Channel;
    /// assert_eq!(Channel::new(1)?.nibble(), 0);
    /// assert!(Channel::new(17).is_err());
    /// # Ok::<(), apcy::Error>(())
    /// ```
    pub fn new(number: u8) -> Result<Self, crate::Error> {
        crate::errors::check_range("channel", number, Self::MIN, Self::MAX).map(Self)
    }

    /// Build a channel out of the low nibble of a status byte
    pub fn from_nibble(status: u8) -> Self {
        Self((status & 0x0F) + 1)
    }

    /// The 1-based channel number
    pub fn number(self) -> u8 {
        self.0
    }

    /// The zero-based channel as it appears in the status byte
    pub fn nibble(self) -> u8 {
        self.0 - 1
    }

    /// Only for numbers the address table has already checked
    pub(crate) const fn new_unchecked(number: u8) -> Self {
        Self(number)
    }
}

impl TryFrom<u8> for Channel {
    type Error = crate::Error;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

impl From<Channel> for u8 {
    fn from(channel: Channel) -> Self {
        channel.0
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "channel {}", self.0)
    }
}
