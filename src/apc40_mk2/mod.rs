/*!
# APC40 MK2 low-level API

The APC40 MK2 has a 8x5 grid of RGB clip launch pads, a column of five RGB scene launch pads,
a strip of buttons, a knob and a fader per track, a device control section and a bunch of
transport and navigation buttons.

Controls are named by 1-based coordinates as printed on the device. Each one maps to a fixed
MIDI address (see [`Button::address`], [`Knob::address`], [`Fader::address`]); the [`Output`]
writes to those addresses and the [`Input`] reads from them.
*/

mod address;
pub use address::*;

mod palette;
pub use palette::*;

mod input;
pub use input::*;

mod output;
pub use output::*;
