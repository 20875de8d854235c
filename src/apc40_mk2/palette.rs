//! The 128-entry color palette built into the APC40 MK2's RGB pads.
//!
//! The pads can't show arbitrary colors. They get a palette index in the velocity byte, so every
//! color has to be quantized to one of these entries first.

use crate::Error;

/// An 8-bit-per-component RGB color
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    const fn from_u32(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Parse a `RRGGBB` hex string. The leading `#` is optional and the digits are
    /// case-insensitive.
    ///
    /// ```
    /// # use apcy::mk2::Rgb;
    /// assert_eq!(Rgb::from_hex("#ff8000")?, Rgb::new(255, 128, 0));
    /// assert_eq!(Rgb::from_hex("00A9FF")?, Rgb::new(0, 169, 255));
    /// assert!(Rgb::from_hex("#F00").is_err());
    /// # Ok::<(), apcy::Error>(())
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        // from_str_radix would also accept a sign, so check the digits ourselves
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColorFormat(hex.to_owned()));
        }

        let component = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| Error::InvalidColorFormat(hex.to_owned()))
        };
        Ok(Self::new(component(0)?, component(2)?, component(4)?))
    }

    /// Squared euclidean distance in plain RGB space
    pub fn distance_squared(self, other: Rgb) -> u32 {
        let d = |a: u8, b: u8| {
            let d = a as i32 - b as i32;
            (d * d) as u32
        };
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }
}

#[cfg(feature = "embedded-graphics")]
impl From<embedded_graphics::pixelcolor::Rgb888> for Rgb {
    fn from(color: embedded_graphics::pixelcolor::Rgb888) -> Self {
        use embedded_graphics::pixelcolor::RgbColor;

        Rgb::new(color.r(), color.g(), color.b())
    }
}

#[cfg(feature = "embedded-graphics")]
impl From<Rgb> for embedded_graphics::pixelcolor::Rgb888 {
    fn from(color: Rgb) -> Self {
        Self::new(color.r, color.g, color.b)
    }
}

/// The palette as the hardware defines it. The position in the array is the palette index.
pub const PALETTE: [Rgb; 128] = {
    const HEX: [u32; 128] = [
        0x000000, 0x1E1E1E, 0x7F7F7F, 0xFFFFFF, 0xFF4C4C, 0xFF0000, 0x590000, 0x190000, // 0
        0xFFBD6C, 0xFF5400, 0x591D00, 0x271B00, 0xFFFF4C, 0xFFFF00, 0x595900, 0x191900, // 8
        0x88FF4C, 0x54FF00, 0x1D5900, 0x142B00, 0x4CFF4C, 0x00FF00, 0x005900, 0x001900, // 16
        0x4CFF5E, 0x00FF19, 0x00590D, 0x001902, 0x4CFF88, 0x00FF55, 0x00591D, 0x001F12, // 24
        0x4CFFB7, 0x00FF99, 0x005935, 0x001912, 0x4CC3FF, 0x00A9FF, 0x004152, 0x001019, // 32
        0x4C88FF, 0x0055FF, 0x001D59, 0x000819, 0x4C4CFF, 0x0000FF, 0x000059, 0x000019, // 40
        0x874CFF, 0x5400FF, 0x190064, 0x0F0030, 0xFF4CFF, 0xFF00FF, 0x590059, 0x190019, // 48
        0xFF4C87, 0xFF0054, 0x59001D, 0x220013, 0xFF1500, 0x993500, 0x795100, 0x436400, // 56
        0x033900, 0x005735, 0x00547F, 0x0000FF, 0x00454F, 0x2500CC, 0x7F7F7F, 0x202020, // 64
        0xFF0000, 0xBDFF2D, 0xAFED06, 0x64FF09, 0x108B00, 0x00FF87, 0x00A9FF, 0x002AFF, // 72
        0x3F00FF, 0x7A00FF, 0xB21A7D, 0x402100, 0xFF4A00, 0x88E106, 0x72FF15, 0x00FF00, // 80
        0x3BFF26, 0x59FF71, 0x38FFCC, 0x5B8AFF, 0x3151C6, 0x877FE9, 0xD31DFF, 0xFF005D, // 88
        0xFF7F00, 0xB9B000, 0x90FF00, 0x835D07, 0x392B00, 0x144C10, 0x0D5038, 0x15152A, // 96
        0x16205A, 0x693C1C, 0xA8000A, 0xDE513D, 0xD86A1C, 0xFFE126, 0x9EE12F, 0x67B50F, // 104
        0x1E1E30, 0xDCFF6B, 0x80FFBD, 0x9A99FF, 0x8E66FF, 0x404040, 0x757575, 0xE0FFFF, // 112
        0xA00000, 0x350000, 0x1AD000, 0x074200, 0xB9B000, 0x3F3100, 0xB35F00, 0x4B1502, // 120
    ];

    let mut palette = [Rgb::new(0, 0, 0); 128];
    let mut i = 0;
    while i < 128 {
        palette[i] = Rgb::from_u32(HEX[i]);
        i += 1;
    }
    palette
};

/// A color from the palette above.
///
/// Everywhere a [`ColorSelector`] is expected you can pass a palette index directly; this type
/// is what the selector resolves to.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct PaletteColor {
    pub(crate) id: u8,
}

impl PaletteColor {
    pub const BLACK: PaletteColor = Self { id: 0 };
    pub const DARK_GRAY: PaletteColor = Self { id: 1 };
    pub const GRAY: PaletteColor = Self { id: 2 };
    pub const WHITE: PaletteColor = Self { id: 3 };
    pub const RED: PaletteColor = Self { id: 5 };
    pub const ORANGE: PaletteColor = Self { id: 9 };
    pub const YELLOW: PaletteColor = Self { id: 13 };
    pub const GREEN: PaletteColor = Self { id: 21 };
    pub const CYAN: PaletteColor = Self { id: 37 };
    pub const BLUE: PaletteColor = Self { id: 45 };
    pub const PURPLE: PaletteColor = Self { id: 49 };
    pub const MAGENTA: PaletteColor = Self { id: 53 };
    pub const PINK: PaletteColor = Self { id: 57 };

    pub fn new(id: u8) -> Result<Self, Error> {
        if id > 127 {
            return Err(Error::InvalidColorIndex(id));
        }
        Ok(Self { id })
    }

    pub fn id(self) -> u8 {
        self.id
    }

    /// What the pad actually shows for this entry
    pub fn rgb(self) -> Rgb {
        PALETTE[self.id as usize]
    }
}

impl TryFrom<u8> for PaletteColor {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self, Error> {
        Self::new(id)
    }
}

impl From<PaletteColor> for u8 {
    fn from(color: PaletteColor) -> Self {
        color.id
    }
}

/// The colors that can be asked for by name. Lookup ignores case.
pub const NAMED_COLORS: [(&str, PaletteColor); 13] = [
    ("black", PaletteColor::BLACK),
    ("dark gray", PaletteColor::DARK_GRAY),
    ("gray", PaletteColor::GRAY),
    ("white", PaletteColor::WHITE),
    ("red", PaletteColor::RED),
    ("orange", PaletteColor::ORANGE),
    ("yellow", PaletteColor::YELLOW),
    ("green", PaletteColor::GREEN),
    ("cyan", PaletteColor::CYAN),
    ("blue", PaletteColor::BLUE),
    ("purple", PaletteColor::PURPLE),
    ("magenta", PaletteColor::MAGENTA),
    ("pink", PaletteColor::PINK),
];

/// Look up a named color, ignoring case
pub fn named(name: &str) -> Result<PaletteColor, Error> {
    NAMED_COLORS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|&(_, color)| color)
        .ok_or_else(|| Error::UnknownColorName(name.to_owned()))
}

/// Find the palette entry closest to `target`.
///
/// This is a linear scan using the squared RGB distance. On a tie the lower index wins, which
/// also means that for the handful of duplicated palette entries only the first one is ever
/// returned.
///
/// ```
/// # use apcy::mk2::{nearest_index, PaletteColor, Rgb};
/// assert_eq!(nearest_index(Rgb::new(250, 5, 5)), PaletteColor::RED);
/// ```
pub fn nearest_index(target: Rgb) -> PaletteColor {
    let mut closest = 0;
    let mut closest_distance = u32::MAX;

    for (index, &entry) in PALETTE.iter().enumerate() {
        let distance = target.distance_squared(entry);
        if distance < closest_distance {
            closest_distance = distance;
            closest = index;
        }
    }

    PaletteColor { id: closest as u8 }
}

/// The different ways a pad color can be specified.
///
/// String slices convert into [`ColorSelector::Hex`] when they start with `#` and into
/// [`ColorSelector::Name`] otherwise; integers convert into [`ColorSelector::Index`].
///
/// ```
/// # use apcy::mk2::{ColorSelector, PaletteColor};
/// assert_eq!(ColorSelector::from("RED").resolve()?, PaletteColor::RED);
/// assert_eq!(ColorSelector::from("#FF0000").resolve()?, PaletteColor::RED);
/// assert_eq!(ColorSelector::from(5u8).resolve()?, PaletteColor::RED);
/// # Ok::<(), apcy::Error>(())
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColorSelector<'a> {
    /// One of [`NAMED_COLORS`]
    Name(&'a str),
    /// `RRGGBB`, optionally prefixed with `#`, quantized to the nearest palette entry
    Hex(&'a str),
    /// A raw palette index, used unchanged
    Index(u8),
    /// An arbitrary color, quantized to the nearest palette entry
    Rgb(Rgb),
}

impl ColorSelector<'_> {
    pub fn resolve(self) -> Result<PaletteColor, Error> {
        let color = match self {
            Self::Name(name) => named(name)?,
            Self::Hex(hex) => nearest_index(Rgb::from_hex(hex)?),
            Self::Index(index) => {
                crate::errors::check_range("color", index, 0, 127)?;
                PaletteColor { id: index }
            }
            Self::Rgb(rgb) => nearest_index(rgb),
        };

        // can't fail with a 128 entry palette, but the index goes straight onto the wire
        PaletteColor::new(color.id)
    }
}

impl<'a> From<&'a str> for ColorSelector<'a> {
    fn from(s: &'a str) -> Self {
        if s.starts_with('#') {
            Self::Hex(s)
        } else {
            Self::Name(s)
        }
    }
}

impl<'a> From<&'a String> for ColorSelector<'a> {
    fn from(s: &'a String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<u8> for ColorSelector<'_> {
    fn from(index: u8) -> Self {
        Self::Index(index)
    }
}

impl From<PaletteColor> for ColorSelector<'_> {
    fn from(color: PaletteColor) -> Self {
        Self::Index(color.id)
    }
}

impl From<Rgb> for ColorSelector<'_> {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_index_with(rgb: Rgb) -> u8 {
        PALETTE.iter().position(|&entry| entry == rgb).unwrap() as u8
    }

    #[test]
    fn every_entry_matches_itself() {
        for (index, &rgb) in PALETTE.iter().enumerate() {
            let nearest = nearest_index(rgb);
            assert_eq!(nearest.id(), first_index_with(rgb));
            assert_eq!(nearest.rgb(), rgb);

            if PALETTE.iter().filter(|&&entry| entry == rgb).count() == 1 {
                assert_eq!(nearest.id() as usize, index);
            }
        }
    }

    #[test]
    fn duplicated_entries_resolve_to_the_lower_index() {
        assert_eq!(nearest_index(PALETTE[72]).id(), 5);
        assert_eq!(nearest_index(PALETTE[67]).id(), 45);
        assert_eq!(nearest_index(PALETTE[87]).id(), 21);
        assert_eq!(nearest_index(PALETTE[124]).id(), 97);
    }

    #[test]
    fn equidistant_colors_resolve_to_the_lower_index() {
        // 0x1E1E1E (1) and 0x202020 (71) are both exactly 3 away
        let probe = Rgb::new(31, 31, 31);
        assert_eq!(
            probe.distance_squared(PALETTE[1]),
            probe.distance_squared(PALETTE[71])
        );
        assert_eq!(nearest_index(probe).id(), 1);
    }

    #[test]
    fn names_ignore_case() {
        assert_eq!(named("RED").unwrap(), named("red").unwrap());
        assert_eq!(named("Dark Gray").unwrap(), PaletteColor::DARK_GRAY);
        assert!(matches!(
            named("chartreuse"),
            Err(Error::UnknownColorName(name)) if name == "chartreuse"
        ));
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgb::from_hex("#000000").unwrap(), Rgb::new(0, 0, 0));
        assert_eq!(Rgb::from_hex("aBcDeF").unwrap(), Rgb::new(0xAB, 0xCD, 0xEF));

        for bad in ["", "#", "#12345", "#1234567", "#GG0000", "#+10000", "##FF000", "#ÿÿÿ"] {
            assert!(
                matches!(Rgb::from_hex(bad), Err(Error::InvalidColorFormat(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn selector_resolution() {
        let red = ColorSelector::from("RED").resolve().unwrap();
        assert_eq!(red, ColorSelector::from("red").resolve().unwrap());
        assert_eq!(red, ColorSelector::from(5u8).resolve().unwrap());
        assert_eq!(ColorSelector::from("#FF0000").resolve().unwrap(), red);
        assert_eq!(ColorSelector::Hex("ff0000").resolve().unwrap(), red);
        assert_eq!(ColorSelector::from("blue").resolve().unwrap().id(), 45);
        assert_eq!(ColorSelector::from(127u8).resolve().unwrap().id(), 127);

        assert!(matches!(
            ColorSelector::from(128u8).resolve(),
            Err(Error::OutOfRangeParameter { parameter: "color", value: 128, .. })
        ));
        assert!(matches!(
            ColorSelector::from("#nothex").resolve(),
            Err(Error::InvalidColorFormat(_))
        ));
        // without the '#', a string is taken as a name
        assert!(matches!(
            ColorSelector::from("FF0000").resolve(),
            Err(Error::UnknownColorName(_))
        ));
    }

    #[test]
    fn palette_color_rejects_indices_past_the_palette() {
        assert_eq!(PaletteColor::try_from(127u8).unwrap().id(), 127);
        assert!(matches!(
            PaletteColor::try_from(200u8),
            Err(Error::InvalidColorIndex(200))
        ));
        assert_eq!(u8::from(PaletteColor::BLUE), 45);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn palette_color_deserializes_through_validation() {
        use serde::de::value::{Error as ValueError, U8Deserializer};
        use serde::de::IntoDeserializer;
        use serde::Deserialize;

        let valid: U8Deserializer<ValueError> = 45u8.into_deserializer();
        assert_eq!(PaletteColor::deserialize(valid).unwrap(), PaletteColor::BLUE);

        let past_the_end: U8Deserializer<ValueError> = 200u8.into_deserializer();
        assert!(PaletteColor::deserialize(past_the_end).is_err());
    }

    #[test]
    fn nearest_matches_brute_force_on_random_colors() {
        use nanorand::Rng;

        let mut rng = nanorand::WyRand::new_seed(0xA9C40);
        for _ in 0..2000 {
            let target = Rgb::new(rng.generate(), rng.generate(), rng.generate());
            let nearest = nearest_index(target);

            let best = PALETTE
                .iter()
                .map(|&entry| target.distance_squared(entry))
                .min()
                .unwrap();
            assert_eq!(target.distance_squared(nearest.rgb()), best);
            // lowest index among the equally close ones
            assert!(PALETTE[..nearest.id() as usize]
                .iter()
                .all(|&entry| target.distance_squared(entry) > best));
        }
    }
}
