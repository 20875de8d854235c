use super::{Address, Button, Fader, Knob};
use crate::{InboundEvent, MessageKind};

/// What a single inbound event means for one particular button
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ButtonState {
    Pressed,
    Released,
    /// The event is about something else
    NotApplicable,
}

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    /// When a button is pressed
    Press { button: Button },
    /// When a button is released
    Release { button: Button },
    /// When a knob has been turned. Track and device knobs send absolute values, the cue level
    /// and tempo knobs send relative steps
    KnobChanged { knob: Knob, value: u8 },
    /// When a fader has been moved
    FaderChanged { fader: Fader, value: u8 },
    /// Anything the decoder doesn't know about, like SysEx replies or an unexpected
    /// velocity
    Unrecognized { data: Vec<u8> },
}

/// The decoding half of the APC40 MK2.
///
/// The per-control queries answer "is this event about that control?", while
/// [`classify`](Self::classify) finds the control an event belongs to. To receive messages from
/// real hardware, use the [`InputDevice`](crate::InputDevice) trait:
/// ```no_run
/// # use apcy::InputDevice as _;
/// # use apcy::mk2::{Input, Message};
/// let input = Input::guess_polling()?;
/// for message in input.iter() {
///     if let Message::Press { button } = message {
///         println!("{} pressed", button);
///     }
/// }
/// # Ok::<(), apcy::MidiError>(())
/// ```
pub struct Input;

fn targets(event: &InboundEvent, address: Address) -> bool {
    event.is_input && event.channel == address.channel && event.index == address.number
}

impl Input {
    /// Check whether `event` presses or releases `button`.
    ///
    /// Presses are Note-On with velocity 127. Releases are Note-Off with the button's release
    /// velocity (see [`Release`](super::Release)); a Note-Off with the other velocity is not a
    /// release. Buttons with out-of-range coordinates never match.
    ///
    /// ```
    /// # use apcy::{Channel, InboundEvent, MessageKind};
    /// # use apcy::mk2::{Button, ButtonState, Input};
    /// let event = InboundEvent {
    ///     kind: MessageKind::NoteOff,
    ///     channel: Channel::new(1)?,
    ///     index: 32,
    ///     value: 0,
    ///     is_input: true,
    /// };
    /// assert_eq!(Input::button_state(&event, Button::clip_launch(1, 1)), ButtonState::Released);
    /// assert_eq!(Input::button_state(&event, Button::clip_launch(1, 2)), ButtonState::NotApplicable);
    /// # Ok::<(), apcy::Error>(())
    /// ```
    pub fn button_state(event: &InboundEvent, button: Button) -> ButtonState {
        let address = match button.address() {
            Ok(address) => address,
            Err(_) => return ButtonState::NotApplicable,
        };
        if !targets(event, address) {
            return ButtonState::NotApplicable;
        }

        match event.kind {
            MessageKind::NoteOn if event.value == 127 => ButtonState::Pressed,
            MessageKind::NoteOff if event.value == button.release().velocity() => {
                ButtonState::Released
            }
            _ => ButtonState::NotApplicable,
        }
    }

    /// The knob value carried by `event`, if it's a Control-Change from that knob
    pub fn knob_value(event: &InboundEvent, knob: Knob) -> Option<u8> {
        let address = knob.address().ok()?;
        Self::control_value(event, address)
    }

    /// The fader position carried by `event`, if it's a Control-Change from that fader
    pub fn fader_value(event: &InboundEvent, fader: Fader) -> Option<u8> {
        let address = fader.address().ok()?;
        Self::control_value(event, address)
    }

    fn control_value(event: &InboundEvent, address: Address) -> Option<u8> {
        if event.kind == MessageKind::ControlChange && targets(event, address) {
            Some(event.value)
        } else {
            None
        }
    }

    /// Find the control `event` belongs to.
    ///
    /// Controls are checked in the order of [`Button::all`], [`Knob::all`] and [`Fader::all`],
    /// and the first match wins. The only overlap on the device is the foot switch sharing its
    /// note with device control button 7; a press on that note is reported as the device
    /// control button.
    pub fn classify(event: &InboundEvent) -> Option<Message> {
        match event.kind {
            MessageKind::NoteOn | MessageKind::NoteOff => {
                Button::all().find_map(|button| match Self::button_state(event, button) {
                    ButtonState::Pressed => Some(Message::Press { button }),
                    ButtonState::Released => Some(Message::Release { button }),
                    ButtonState::NotApplicable => None,
                })
            }
            MessageKind::ControlChange => {
                let knob = Knob::all().find_map(|knob| {
                    Self::knob_value(event, knob).map(|value| Message::KnobChanged { knob, value })
                });
                knob.or_else(|| {
                    Fader::all().find_map(|fader| {
                        Self::fader_value(event, fader)
                            .map(|value| Message::FaderChanged { fader, value })
                    })
                })
            }
        }
    }
}

impl crate::InputDevice for Input {
    const MIDI_CONNECTION_NAME: &'static str = "Apcy APC40 MK2 input";
    const MIDI_DEVICE_KEYWORD: &'static str = "APC40 mkII";
    type Message = Message;

    fn decode_message(_timestamp: u64, data: &[u8]) -> Message {
        let message = InboundEvent::parse(data).and_then(|event| Self::classify(&event));
        match message {
            Some(message) => message,
            None => {
                log::debug!("unrecognized message from the APC40 MK2: {:02X?}", data);
                Message::Unrecognized {
                    data: data.to_vec(),
                }
            }
        }
    }
}
