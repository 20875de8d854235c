use midir::MidiOutputConnection;

use super::address::Led;
use super::{Button, ColorSelector, Knob};
use crate::errors::check_range;
use crate::{Channel, Error, MessageSink, NoteValue, OutboundMessage};

/// The SysEx message switching the device mode. The mode goes into byte [`MODE_BYTE`] as
/// `0x40 + mode`.
const DEVICE_MODE_SYSEX: [u8; 12] = [
    0xF0, 0x47, 0x7F, 0x29, 0x60, 0x00, 0x04, 0x40, 0x01, 0x00, 0x00, 0xF7,
];

/// Position of the mode byte inside the device mode SysEx message
pub const MODE_BYTE: usize = 7;

/// The three global operating modes of the APC40 MK2
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceMode {
    /// Every control just sends MIDI, the device doesn't react on its own
    Generic = 0,
    AbletonLive = 1,
    AlternateAbletonLive = 2,
}

impl From<DeviceMode> for u8 {
    fn from(mode: DeviceMode) -> Self {
        mode as u8
    }
}

impl TryFrom<u8> for DeviceMode {
    type Error = Error;

    fn try_from(mode: u8) -> Result<Self, Error> {
        match check_range("mode", mode, 0, 2)? {
            0 => Ok(Self::Generic),
            1 => Ok(Self::AbletonLive),
            _ => Ok(Self::AlternateAbletonLive),
        }
    }
}

/// LED ring styles of the track and device knobs.
///
/// Track knobs accept any value in 0..=127 and treat unknown ones like `Single`; device knobs
/// only accept these four.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RingStyle {
    Off = 0,
    Single = 1,
    Volume = 2,
    Pan = 3,
}

impl From<RingStyle> for u8 {
    fn from(style: RingStyle) -> Self {
        style as u8
    }
}

/// How the secondary color of a pad behaves, for the `led_type` parameter of the pad lighting
/// methods. `led_type` 0 sets the primary color; everything else sets a secondary color that
/// alternates with the primary one at the given rate.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LedBehavior {
    Primary,
    Oneshot(Rate),
    Pulsing(Rate),
    Blinking(Rate),
}

/// Note lengths, synced to the host's tempo
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rate {
    TwentyFourth,
    Sixteenth,
    Eighth,
    Quarter,
    Half,
}

impl LedBehavior {
    /// The LED type number (0..=15), which is sent as the MIDI channel minus one
    pub fn led_type(self) -> u8 {
        let rate = |rate: Rate| rate as u8;
        match self {
            Self::Primary => 0,
            Self::Oneshot(r) => 1 + rate(r),
            Self::Pulsing(r) => 6 + rate(r),
            Self::Blinking(r) => 11 + rate(r),
        }
    }
}

impl From<LedBehavior> for u8 {
    fn from(behavior: LedBehavior) -> Self {
        behavior.led_type()
    }
}

/// The object handling any messages _to_ the APC40 MK2.
///
/// Every method validates its arguments first and then hands exactly one message to the sink.
/// When validation fails, nothing is sent. To get started with real hardware, initialize with
/// [`Output::guess`](crate::OutputDevice::guess):
/// ```no_run
/// # use apcy::OutputDevice as _;
/// # use apcy::mk2::{Button, DeviceMode, GlobalButton, LedBehavior, Output, Rate};
/// let mut output: Output = Output::guess()?;
///
/// output.enter_mode(DeviceMode::AlternateAbletonLive)?;
///
/// // top left pad blue, the one next to it pulsing red
/// output.clip_launch(1, 1, "blue", 0)?;
/// output.set_pad(Button::clip_launch(1, 2), "#FF0000", LedBehavior::Pulsing(Rate::Eighth))?;
///
/// output.switch(Button::Global(GlobalButton::Play), true)?;
/// # Ok::<(), apcy::Error>(())
/// ```
///
/// Any [`MessageSink`] works, which makes dry runs easy:
/// ```
/// # use apcy::{Channel, NoteValue, OutboundMessage, RecordingSink};
/// # use apcy::mk2::Output;
/// let mut output = Output::new(RecordingSink::new());
/// output.clip_launch(1, 1, "blue", 0)?;
///
/// assert_eq!(output.sink().messages(), [OutboundMessage::NoteOn {
///     channel: Channel::new(1)?,
///     note: 32,
///     value: NoteValue::Level(45),
/// }]);
/// # Ok::<(), apcy::Error>(())
/// ```
pub struct Output<S = MidiOutputConnection> {
    sink: S,
}

impl crate::OutputDevice for Output<MidiOutputConnection> {
    const MIDI_CONNECTION_NAME: &'static str = "Apcy APC40 MK2 output";
    const MIDI_DEVICE_KEYWORD: &'static str = "APC40 mkII";

    fn from_connection(connection: MidiOutputConnection) -> Result<Self, crate::MidiError> {
        Ok(Self::new(connection))
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), crate::MidiError> {
        self.sink.send(bytes)?;
        Ok(())
    }
}

impl<S: MessageSink> Output<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    fn emit(&mut self, message: OutboundMessage) -> Result<(), Error> {
        log::trace!("sending {:?}", message);
        self.sink.send_message(message)?;
        Ok(())
    }

    /// Set the color of an RGB pad (clip launch or scene launch).
    ///
    /// `led_type` (0..=15) selects the primary color (0) or one of the animated secondary
    /// colors, see [`LedBehavior`]. It's transmitted as the MIDI channel.
    pub fn set_led_color<'a>(
        &mut self,
        button: Button,
        color: impl Into<ColorSelector<'a>>,
        led_type: u8,
    ) -> Result<(), Error> {
        if button.led() != Led::Palette {
            return Err(Error::Unsupported {
                control: button.to_string(),
                operation: "palette colors",
            });
        }

        let led_type = check_range("led_type", led_type, 0, 15)?;
        let address = button.address()?;
        let color = color.into().resolve()?;

        self.emit(OutboundMessage::NoteOn {
            channel: Channel::new_unchecked(led_type + 1),
            note: address.number,
            value: NoteValue::Level(color.id()),
        })
    }

    /// Set a clip launch pad. Row 1-5 from the top, column 1-8 from the left.
    ///
    /// `color` can be a color name, a `#RRGGBB` hex code or a palette index.
    pub fn clip_launch<'a>(
        &mut self,
        row: u8,
        column: u8,
        color: impl Into<ColorSelector<'a>>,
        led_type: u8,
    ) -> Result<(), Error> {
        self.set_led_color(Button::clip_launch(row, column), color, led_type)
    }

    /// Set a scene launch pad, scene 1-5 from the top
    pub fn scene_launch<'a>(
        &mut self,
        scene: u8,
        color: impl Into<ColorSelector<'a>>,
        led_type: u8,
    ) -> Result<(), Error> {
        self.set_led_color(Button::scene_launch(scene), color, led_type)
    }

    /// [`set_led_color`](Self::set_led_color) with the LED type spelled out as a
    /// [`LedBehavior`]
    pub fn set_pad<'a>(
        &mut self,
        button: Button,
        color: impl Into<ColorSelector<'a>>,
        behavior: LedBehavior,
    ) -> Result<(), Error> {
        self.set_led_color(button, color, behavior.led_type())
    }

    /// Set a single-color button LED.
    ///
    /// Plain LEDs take 0 (off) or 1 (on). The clip stop LEDs take 0 (off), 1 (on) and 2
    /// (blinking), the A/B assign LEDs 0 (off), 1 (A) and 2 (B).
    pub fn set_led(&mut self, button: Button, state: u8) -> Result<(), Error> {
        let value = match button.led() {
            Led::Switch => NoteValue::Switch(check_range("state", state, 0, 1)? == 1),
            Led::Level { max } => NoteValue::Level(check_range("state", state, 0, max)?),
            Led::Palette => {
                return Err(Error::Unsupported {
                    control: button.to_string(),
                    operation: "plain LED states",
                })
            }
            Led::None => {
                return Err(Error::Unsupported {
                    control: button.to_string(),
                    operation: "LEDs",
                })
            }
        };
        let address = button.address()?;

        self.emit(OutboundMessage::NoteOn {
            channel: address.channel,
            note: address.number,
            value,
        })
    }

    /// Turn a button LED on or off. Shorthand for `set_led(button, on as u8)`.
    pub fn switch(&mut self, button: Button, on: bool) -> Result<(), Error> {
        self.set_led(button, on as u8)
    }

    /// Move the LED ring of a knob to `value` (0..=127)
    pub fn knob_value(&mut self, knob: Knob, value: u8) -> Result<(), Error> {
        if knob.ring_formula().is_none() {
            return Err(Error::Unsupported {
                control: knob.to_string(),
                operation: "setting a value",
            });
        }

        let address = knob.address()?;
        let value = check_range("value", value, 0, 127)?;
        self.emit(OutboundMessage::ControlChange {
            channel: address.channel,
            controller: address.number,
            value,
        })
    }

    /// Set the LED ring style of a knob, see [`RingStyle`]
    pub fn knob_ring(&mut self, knob: Knob, style: u8) -> Result<(), Error> {
        let (max, address) = match (knob.ring_formula(), knob.ring_address()) {
            (Some((_, max)), Some(address)) => (max, address?),
            _ => {
                return Err(Error::Unsupported {
                    control: knob.to_string(),
                    operation: "an LED ring",
                })
            }
        };

        let style = check_range("type", style, 0, max)?;
        self.emit(OutboundMessage::ControlChange {
            channel: address.channel,
            controller: address.number,
            value: style,
        })
    }

    /// [`knob_ring`](Self::knob_ring) taking one of the named styles
    pub fn set_ring_style(&mut self, knob: Knob, style: RingStyle) -> Result<(), Error> {
        self.knob_ring(knob, style.into())
    }

    /// Set the ring style of track knob `index` (1-8). Values above 3 are shown like `Single`.
    pub fn track_knob_type(&mut self, index: u8, style: u8) -> Result<(), Error> {
        self.knob_ring(Knob::Track { index }, style)
    }

    /// Set the ring of track knob `index` (1-8) to `value`
    pub fn track_knob_value(&mut self, index: u8, value: u8) -> Result<(), Error> {
        self.knob_value(Knob::Track { index }, value)
    }

    /// Set the ring style of device knob `index` (1-8) on `channel` (1-9)
    pub fn device_knob_type(
        &mut self,
        channel: u8,
        index: u8,
        style: u8,
    ) -> Result<(), Error> {
        self.knob_ring(Knob::Device { channel, index }, style)
    }

    /// Set the ring of device knob `index` (1-8) on `channel` (1-9) to `value`
    pub fn device_knob_value(&mut self, channel: u8, index: u8, value: u8) -> Result<(), Error> {
        self.knob_value(Knob::Device { channel, index }, value)
    }

    /// Switch the device into one of its three modes, see [`DeviceMode`]. There's no
    /// acknowledgement; the device just changes its behavior.
    pub fn set_device_mode(&mut self, mode: u8) -> Result<(), Error> {
        let mode = DeviceMode::try_from(mode)?;

        let mut bytes = DEVICE_MODE_SYSEX.to_vec();
        bytes[MODE_BYTE] += mode as u8;
        self.emit(OutboundMessage::SystemExclusive(bytes))
    }

    /// [`set_device_mode`](Self::set_device_mode) for a mode known at compile time
    pub fn enter_mode(&mut self, mode: DeviceMode) -> Result<(), Error> {
        self.set_device_mode(mode.into())
    }
}
