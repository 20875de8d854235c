/// Failures of the MIDI transport itself, as opposed to invalid arguments
#[derive(Debug)]
pub enum MidiError {
    InputConnect(midir::ConnectError<midir::MidiInput>),
    OutputConnect(midir::ConnectError<midir::MidiOutput>),
    Init(midir::InitError),
    PortInfo(midir::PortInfoError),
    Send(midir::SendError),
    /// No port name contained the device keyword
    NoPortFound { keyword: &'static str },
}

impl std::fmt::Display for MidiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputConnect(_) => f.write_str("opening the MIDI input port failed"),
            Self::OutputConnect(_) => f.write_str("opening the MIDI output port failed"),
            Self::Init(_) => f.write_str("the MIDI backend couldn't be initialized"),
            Self::PortInfo(_) => f.write_str("reading MIDI port information failed"),
            Self::Send(_) => f.write_str("the MIDI message couldn't be sent"),
            Self::NoPortFound { keyword } => write!(
                f,
                "no MIDI port named like {:?}. Is the controller plugged in?",
                keyword
            ),
        }
    }
}

impl std::error::Error for MidiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InputConnect(e) => Some(e),
            Self::OutputConnect(e) => Some(e),
            Self::Init(e) => Some(e),
            Self::PortInfo(e) => Some(e),
            Self::Send(e) => Some(e),
            Self::NoPortFound { .. } => None,
        }
    }
}

macro_rules! midi_error_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for MidiError {
                fn from(e: $source) -> Self {
                    Self::$variant(e)
                }
            }
        )*
    };
}

midi_error_from! {
    midir::ConnectError<midir::MidiInput> => InputConnect,
    midir::ConnectError<midir::MidiOutput> => OutputConnect,
    midir::InitError => Init,
    midir::PortInfoError => PortInfo,
    midir::SendError => Send,
}

/// Everything that can go wrong when talking to the APC40 MK2.
///
/// All validation variants are raised before a message is handed to the sink, so a failed call
/// never puts anything on the wire.
#[derive(Debug)]
pub enum Error {
    /// A logical coordinate, LED type, state or value lies outside its declared domain
    OutOfRangeParameter {
        parameter: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },
    /// The color name is not one of the named palette colors
    UnknownColorName(String),
    /// The hex string is not six hex digits with an optional leading `#`
    InvalidColorFormat(String),
    /// A resolved palette index lies outside 0..=127
    InvalidColorIndex(u8),
    /// The control can't do what was asked, e.g. lighting a button that has no LED
    Unsupported {
        control: String,
        operation: &'static str,
    },
    /// The message sink failed to deliver the message
    Midi(MidiError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRangeParameter {
                parameter,
                value,
                min,
                max,
            } => write!(
                f,
                "invalid {}: {}. Must be {}-{}",
                parameter, value, min, max
            ),
            Self::UnknownColorName(name) => write!(
                f,
                "unknown color name {:?}. Use a valid name like 'red' or a hex code like '#FF0000'",
                name
            ),
            Self::InvalidColorFormat(hex) => write!(f, "malformed hex color {:?}", hex),
            Self::InvalidColorIndex(index) => {
                write!(f, "invalid palette index {}. Must be 0-127", index)
            }
            Self::Unsupported { control, operation } => {
                write!(f, "{} does not support {}", control, operation)
            }
            Self::Midi(_) => f.write_str("MIDI transport failed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Midi(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MidiError> for Error {
    fn from(e: MidiError) -> Self {
        Self::Midi(e)
    }
}

/// Check that `value` lies in `min..=max`, naming `parameter` in the error otherwise.
pub(crate) fn check_range(parameter: &'static str, value: u8, min: u8, max: u8) -> Result<u8, Error> {
    if value < min || value > max {
        return Err(Error::OutOfRangeParameter {
            parameter,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check_names_the_parameter() {
        assert_eq!(check_range("row", 5, 1, 5).unwrap(), 5);

        let err = check_range("row", 6, 1, 5).unwrap_err();
        assert_eq!(err.to_string(), "invalid row: 6. Must be 1-5");
        assert!(matches!(
            err,
            Error::OutOfRangeParameter { parameter: "row", value: 6, min: 1, max: 5 }
        ));
    }

    #[test]
    fn transport_errors_keep_their_source() {
        use std::error::Error as _;

        let err = Error::from(MidiError::NoPortFound { keyword: "APC40 mkII" });
        assert!(err.source().is_some());
        assert_eq!(
            err.source().unwrap().to_string(),
            "no MIDI port named like \"APC40 mkII\". Is the controller plugged in?"
        );
        assert!(Error::InvalidColorIndex(200).source().is_none());
    }
}
