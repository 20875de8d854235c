/*!
A translation layer for the Akai APC40 MK2, mapping named pads, buttons, knobs, faders, colors
and device modes to the MIDI messages the controller speaks, and back.

# Sending

The [`Output`](mk2::Output) struct writes to any [`MessageSink`]. Every method validates its
arguments and then sends exactly one MIDI message; if validation fails, nothing is sent.

```no_run
use apcy::OutputDevice as _;
use apcy::mk2::{Button, GlobalButton, Output, TrackButton};

let mut output: Output = Output::guess()?;

// Light the whole clip grid, quantizing arbitrary colors onto the device palette
for row in 1..=5 {
    for column in 1..=8 {
        let rgb = apcy::mk2::Rgb::new(row * 50, column * 30, 0);
        output.clip_launch(row, column, rgb, 0)?;
    }
}

output.switch(Button::track(TrackButton::Solo, 3), true)?;
output.switch(Button::Global(GlobalButton::Metronome), false)?;
output.track_knob_value(1, 64)?;
# Ok::<(), apcy::Error>(())
```

# Receiving

Raw MIDI bytes are parsed into an [`InboundEvent`], which the [`Input`](mk2::Input) decoder
answers questions about.

```no_run
use apcy::InputDevice as _;
use apcy::mk2::{Input, Message};

let _connection = Input::guess(|message| match message {
    Message::Press { button } => println!("pressed {}", button),
    Message::KnobChanged { knob, value } => println!("{} is at {}", knob, value),
    _ => {}
})?;
# Ok::<(), apcy::MidiError>(())
```
*/

pub mod util;

mod protocols;
pub use protocols::*;

mod midi_io;
pub use midi_io::*;

mod errors;
pub use errors::*;

pub mod apc40_mk2;
pub use apc40_mk2 as mk2;

pub mod prelude {
    pub use crate::midi_io::{InputDevice, OutputDevice};
    pub use crate::protocols::MessageSink;
}

/// Identifier used for e.g. the midi port names etc.
const APPLICATION_NAME: &str = "Apcy";
