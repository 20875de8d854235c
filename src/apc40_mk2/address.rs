//! Where every control of the APC40 MK2 lives on the wire.
//!
//! Instead of one hand-written method per control, each control class maps to a `Formula` in a
//! single table. The encoder and the decoder both resolve addresses through that table, so they
//! can't disagree about a number.

use crate::errors::check_range;
use crate::{Channel, Error};

/// A wire address: the channel and note/controller number a message targets
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address {
    pub channel: Channel,
    pub number: u8,
}

impl Address {
    const fn new(channel: u8, number: u8) -> Self {
        Self {
            channel: Channel::new_unchecked(channel),
            number,
        }
    }
}

/// Closed-form mapping from logical coordinates to an [`Address`].
///
/// Every formula takes up to two 1-based coordinates; unused ones are ignored.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Formula {
    /// The clip grid: `base + (rows - row) * columns + column - 1` on channel 1, so row 1 is
    /// the top row
    Grid { base: u8, rows: u8, columns: u8 },
    /// A row of controls on channel 1: `base + index - 1`
    Row {
        parameter: &'static str,
        base: u8,
        count: u8,
    },
    /// One control per track strip; the coordinate picks the channel
    Strip {
        parameter: &'static str,
        number: u8,
        count: u8,
    },
    /// A row of controls repeated on several channels: `base + index - 1` on `channel`
    Bank { base: u8, channels: u8, count: u8 },
    /// A single control on channel 1
    Single { number: u8 },
}

impl Formula {
    pub(crate) fn address(self, first: u8, second: u8) -> Result<Address, Error> {
        let address = match self {
            Self::Grid {
                base,
                rows,
                columns,
            } => {
                let row = check_range("row", first, 1, rows)?;
                let column = check_range("column", second, 1, columns)?;
                Address::new(1, base + (rows - row) * columns + column - 1)
            }
            Self::Row {
                parameter,
                base,
                count,
            } => {
                let index = check_range(parameter, first, 1, count)?;
                Address::new(1, base + index - 1)
            }
            Self::Strip {
                parameter,
                number,
                count,
            } => Address::new(check_range(parameter, first, 1, count)?, number),
            Self::Bank {
                base,
                channels,
                count,
            } => {
                let channel = check_range("channel", first, 1, channels)?;
                let index = check_range("index", second, 1, count)?;
                Address::new(channel, base + index - 1)
            }
            Self::Single { number } => Address::new(1, number),
        };
        Ok(address)
    }
}

/// Which Note-Off velocity the hardware sends when a button is let go.
///
/// Most buttons release with a Note-Off of velocity 127, but the clip and scene launch pads,
/// the clip stop buttons and the foot switch release with velocity 0. That's how the device
/// behaves, so the decoder matches it exactly per button.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum Release {
    NoteOffZero,
    NoteOffFull,
}

impl Release {
    pub fn velocity(self) -> u8 {
        match self {
            Self::NoteOffZero => 0,
            Self::NoteOffFull => 127,
        }
    }
}

/// What kind of LED sits under a button
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum Led {
    /// Full RGB, addressed through the palette
    Palette,
    /// On or off
    Switch,
    /// A few discrete states, `0..=max`
    Level { max: u8 },
    /// No LED, input only
    None,
}

/// The per-track buttons, from top to bottom of a track strip
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackButton {
    Record,
    Solo,
    /// The track activator, labelled with the track number
    Number,
    Select,
    /// Off, on or blinking
    ClipStop,
    /// Off, A or B
    AbAssign,
}

impl TrackButton {
    pub const ALL: [TrackButton; 6] = [
        Self::Record,
        Self::Solo,
        Self::Number,
        Self::Select,
        Self::ClipStop,
        Self::AbAssign,
    ];
}

/// Buttons that exist once on the device
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlobalButton {
    Master,
    StopAllClips,
    Pan,
    Sends,
    User,
    Metronome,
    Play,
    Record,
    Up,
    Down,
    Left,
    Right,
    Shift,
    TapTempo,
    NudgeMinus,
    NudgePlus,
    Session,
    Bank,
    FootSwitch,
}

impl GlobalButton {
    pub const ALL: [GlobalButton; 19] = [
        Self::Master,
        Self::StopAllClips,
        Self::Pan,
        Self::Sends,
        Self::User,
        Self::Metronome,
        Self::Play,
        Self::Record,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Shift,
        Self::TapTempo,
        Self::NudgeMinus,
        Self::NudgePlus,
        Self::Session,
        Self::Bank,
        Self::FootSwitch,
    ];
}

/// A button (or pad) on the APC40 MK2.
///
/// All coordinates are 1-based, the way they're printed on the device. Rows of the clip grid
/// count from the top.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Button {
    /// Row 1-5, column 1-8
    ClipLaunch { row: u8, column: u8 },
    /// Scene 1-5
    SceneLaunch { scene: u8 },
    /// Track 1-8
    Track { button: TrackButton, track: u8 },
    /// The eight buttons of the device control section, index 1-8
    DeviceControl { index: u8 },
    Global(GlobalButton),
}

pub(crate) struct ButtonLayout {
    pub formula: Formula,
    pub release: Release,
    pub led: Led,
}

impl Button {
    pub const FOOT_SWITCH: Self = Self::Global(GlobalButton::FootSwitch);

    pub fn clip_launch(row: u8, column: u8) -> Self {
        Self::ClipLaunch { row, column }
    }

    pub fn scene_launch(scene: u8) -> Self {
        Self::SceneLaunch { scene }
    }

    pub fn track(button: TrackButton, track: u8) -> Self {
        Self::Track { button, track }
    }

    pub fn device_control(index: u8) -> Self {
        Self::DeviceControl { index }
    }

    pub(crate) fn layout(self) -> ButtonLayout {
        use Formula::*;
        use Led::{Level, Palette, Switch};
        use Release::*;

        let layout = |formula, release, led| ButtonLayout {
            formula,
            release,
            led,
        };
        let single = |number, led| layout(Single { number }, NoteOffFull, led);
        let strip = |number, release, led| {
            let formula = Strip {
                parameter: "track",
                number,
                count: 8,
            };
            layout(formula, release, led)
        };

        match self {
            Self::ClipLaunch { .. } => layout(
                Grid {
                    base: 0x00,
                    rows: 5,
                    columns: 8,
                },
                NoteOffZero,
                Palette,
            ),
            Self::SceneLaunch { .. } => layout(
                Row {
                    parameter: "scene",
                    base: 0x52,
                    count: 5,
                },
                NoteOffZero,
                Palette,
            ),
            Self::Track { button, .. } => match button {
                TrackButton::Record => strip(0x30, NoteOffFull, Switch),
                TrackButton::Solo => strip(0x31, NoteOffFull, Switch),
                TrackButton::Number => strip(0x32, NoteOffFull, Switch),
                TrackButton::Select => strip(0x33, NoteOffFull, Switch),
                TrackButton::ClipStop => strip(0x34, NoteOffZero, Level { max: 2 }),
                TrackButton::AbAssign => strip(0x42, NoteOffFull, Level { max: 2 }),
            },
            Self::DeviceControl { .. } => layout(
                Row {
                    parameter: "index",
                    base: 0x3A,
                    count: 8,
                },
                NoteOffFull,
                Switch,
            ),
            Self::Global(button) => match button {
                GlobalButton::Master => single(0x50, Switch),
                GlobalButton::StopAllClips => single(0x51, Led::None),
                GlobalButton::Pan => single(0x57, Switch),
                GlobalButton::Sends => single(0x58, Switch),
                GlobalButton::User => single(0x59, Switch),
                GlobalButton::Metronome => single(0x5A, Switch),
                GlobalButton::Play => single(0x5B, Switch),
                GlobalButton::Record => single(0x5D, Switch),
                GlobalButton::Up => single(0x5E, Led::None),
                GlobalButton::Down => single(0x5F, Led::None),
                GlobalButton::Left => single(0x60, Led::None),
                GlobalButton::Right => single(0x61, Led::None),
                GlobalButton::Shift => single(0x62, Led::None),
                GlobalButton::TapTempo => single(0x63, Led::None),
                GlobalButton::NudgeMinus => single(0x64, Led::None),
                GlobalButton::NudgePlus => single(0x65, Led::None),
                GlobalButton::Session => single(0x66, Switch),
                GlobalButton::Bank => single(0x67, Switch),
                GlobalButton::FootSwitch => layout(Single { number: 0x40 }, NoteOffZero, Led::None),
            },
        }
    }

    fn coordinates(self) -> (u8, u8) {
        match self {
            Self::ClipLaunch { row, column } => (row, column),
            Self::SceneLaunch { scene } => (scene, 0),
            Self::Track { track, .. } => (track, 0),
            Self::DeviceControl { index } => (index, 0),
            Self::Global(_) => (0, 0),
        }
    }

    /// The note this button sends and listens on. Fails if a coordinate is out of range.
    ///
    /// ```
    /// # use apcy::mk2::Button;
    /// let address = Button::clip_launch(1, 1).address()?;
    /// assert_eq!((address.channel.number(), address.number), (1, 32));
    /// # Ok::<(), apcy::Error>(())
    /// ```
    pub fn address(self) -> Result<Address, Error> {
        let (first, second) = self.coordinates();
        self.layout().formula.address(first, second)
    }

    pub fn release(self) -> Release {
        self.layout().release
    }

    pub fn led(self) -> Led {
        self.layout().led
    }

    /// Every button on the device, in a fixed order: clip grid row by row, scenes, track
    /// strips, device control, then the global buttons.
    pub fn all() -> impl Iterator<Item = Button> {
        let clips = (1..=5).flat_map(|row| (1..=8).map(move |column| Self::clip_launch(row, column)));
        let scenes = (1..=5).map(Self::scene_launch);
        let tracks = TrackButton::ALL
            .into_iter()
            .flat_map(|button| (1..=8).map(move |track| Self::track(button, track)));
        let device = (1..=8).map(Self::device_control);
        let globals = GlobalButton::ALL.into_iter().map(Self::Global);

        clips.chain(scenes).chain(tracks).chain(device).chain(globals)
    }
}

impl std::fmt::Display for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClipLaunch { row, column } => write!(f, "clip launch ({}|{})", row, column),
            Self::SceneLaunch { scene } => write!(f, "scene launch {}", scene),
            Self::Track { button, track } => write!(f, "track {} {:?}", track, button),
            Self::DeviceControl { index } => write!(f, "device control button {}", index),
            Self::Global(button) => write!(f, "{:?} button", button),
        }
    }
}

/// A knob. Track and device knobs are endless encoders with an LED ring, cue level and tempo
/// are plain relative encoders.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Knob {
    /// The top row of knobs, index 1-8
    Track { index: u8 },
    /// The device control knobs, index 1-8. Channel 1-8 addresses a track's device and 9 the
    /// master; in the two Ableton Live modes only channel 1 is used.
    Device { channel: u8, index: u8 },
    CueLevel,
    Tempo,
}

impl Knob {
    fn coordinates(self) -> (u8, u8) {
        match self {
            Self::Track { index } => (index, 0),
            Self::Device { channel, index } => (channel, index),
            Self::CueLevel | Self::Tempo => (0, 0),
        }
    }

    pub(crate) fn value_formula(self) -> Formula {
        match self {
            Self::Track { .. } => Formula::Row {
                parameter: "index",
                base: 0x30,
                count: 8,
            },
            Self::Device { .. } => Formula::Bank {
                base: 0x10,
                channels: 9,
                count: 8,
            },
            Self::CueLevel => Formula::Single { number: 0x2F },
            Self::Tempo => Formula::Single { number: 0x0D },
        }
    }

    /// The controller for the LED ring style, and the highest style value it accepts
    pub(crate) fn ring_formula(self) -> Option<(Formula, u8)> {
        match self {
            Self::Track { .. } => Some((
                Formula::Row {
                    parameter: "index",
                    base: 0x38,
                    count: 8,
                },
                127,
            )),
            Self::Device { .. } => Some((
                Formula::Bank {
                    base: 0x18,
                    channels: 9,
                    count: 8,
                },
                3,
            )),
            Self::CueLevel | Self::Tempo => None,
        }
    }

    /// The controller the knob's value travels on, in both directions
    pub fn address(self) -> Result<Address, Error> {
        let (first, second) = self.coordinates();
        self.value_formula().address(first, second)
    }

    /// The controller setting the LED ring style, if the knob has a ring
    pub fn ring_address(self) -> Option<Result<Address, Error>> {
        let (first, second) = self.coordinates();
        self.ring_formula()
            .map(|(formula, _)| formula.address(first, second))
    }

    pub fn all() -> impl Iterator<Item = Knob> {
        let track = (1..=8).map(|index| Self::Track { index });
        let device =
            (1..=9).flat_map(|channel| (1..=8).map(move |index| Self::Device { channel, index }));
        track
            .chain(device)
            .chain([Self::CueLevel, Self::Tempo])
    }
}

impl std::fmt::Display for Knob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Track { index } => write!(f, "track knob {}", index),
            Self::Device { channel, index } => {
                write!(f, "device knob {} on channel {}", index, channel)
            }
            Self::CueLevel => f.write_str("cue level knob"),
            Self::Tempo => f.write_str("tempo knob"),
        }
    }
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fader {
    /// Track 1-8
    Track { track: u8 },
    Master,
    Crossfader,
}

impl Fader {
    pub fn address(self) -> Result<Address, Error> {
        match self {
            Self::Track { track } => Formula::Strip {
                parameter: "track",
                number: 0x07,
                count: 8,
            }
            .address(track, 0),
            Self::Master => Formula::Single { number: 0x0E }.address(0, 0),
            Self::Crossfader => Formula::Single { number: 0x0F }.address(0, 0),
        }
    }

    pub fn all() -> impl Iterator<Item = Fader> {
        (1..=8)
            .map(|track| Self::Track { track })
            .chain([Self::Master, Self::Crossfader])
    }
}
