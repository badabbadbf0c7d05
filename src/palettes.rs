//! Target palettes.
//!
//! Every palette holds exactly four distinct colors in a fixed order. The
//! named registry is a static table (2-bit palettes from lospec.com) and is
//! never mutated; custom palettes go through the same validation.

use palette::Srgb;

use crate::error::ParameterError;

/// Number of colors in every target palette, and the cluster count.
pub const PALETTE_SIZE: usize = 4;

static REGISTRY: &[(&str, [[u8; 3]; PALETTE_SIZE])] = &[
    ("2bit_demichrome", [[33, 30, 32], [85, 85, 104], [160, 160, 139], [233, 239, 236]]),
    ("bicycle", [[22, 22, 22], [171, 70, 70], [143, 155, 246], [240, 240, 240]]),
    ("neon_night_sky", [[19, 22, 38], [76, 76, 127], [230, 161, 207], [255, 230, 234]]),
    ("red-blood_pain", [[126, 31, 35], [196, 24, 31], [18, 10, 25], [94, 64, 105]]),
    ("2_bit_matrix", [[242, 255, 242], [173, 217, 188], [91, 140, 124], [13, 26, 26]]),
    ("b4sement", [[34, 35, 35], [255, 74, 220], [61, 255, 152], [240, 246, 240]]),
    ("pumpkin_gb", [[20, 43, 35], [25, 105, 44], [224, 110, 22], [247, 219, 126]]),
    ("honey_milk", [[33, 18, 16], [94, 45, 32], [199, 107, 42], [240, 194, 96]]),
    ("mangavania", [[176, 62, 128], [255, 138, 205], [74, 237, 255], [255, 255, 255]]),
    ("daybreak", [[8, 5, 12], [130, 45, 48], [235, 117, 77], [248, 181, 129]]),
    ("sunset_lattern", [[82, 50, 55], [171, 100, 90], [227, 155, 127], [249, 205, 166]]),
    ("morning_mist", [[10, 10, 36], [107, 99, 99], [167, 186, 145], [192, 239, 251]]),
    ("hexpress4", [[85, 56, 64], [155, 104, 89], [190, 188, 106], [237, 248, 200]]),
    ("enamored", [[248, 243, 253], [250, 198, 180], [218, 41, 142], [46, 43, 18]]),
    ("voltage_warning", [[28, 20, 18], [99, 86, 80], [211, 174, 33], [212, 201, 195]]),
];

/// An ordered set of four distinct target colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    colors: [Srgb<u8>; PALETTE_SIZE],
}

impl Palette {
    /// Build a palette from exactly four distinct colors.
    pub fn new(colors: &[Srgb<u8>]) -> Result<Self, ParameterError> {
        let colors: [Srgb<u8>; PALETTE_SIZE] = colors
            .try_into()
            .map_err(|_| ParameterError::PaletteLength(colors.len()))?;

        for (index, color) in colors.iter().enumerate() {
            if colors[..index].contains(color) {
                return Err(ParameterError::DuplicateColor { index });
            }
        }

        Ok(Self { colors })
    }

    /// Build a palette from `RRGGBB` strings, with or without a leading `#`.
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, ParameterError> {
        let colors = hex
            .iter()
            .map(|s| parse_hex(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&colors)
    }

    #[inline]
    pub fn colors(&self) -> &[Srgb<u8>; PALETTE_SIZE] {
        &self.colors
    }

    pub fn to_hex(&self) -> Vec<String> {
        self.colors.iter().map(|&c| to_hex(c)).collect()
    }
}

/// Resolve a palette from the named registry.
pub fn lookup(name: &str) -> Result<Palette, ParameterError> {
    REGISTRY
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, rgb)| Palette {
            colors: rgb.map(|[r, g, b]| Srgb::new(r, g, b)),
        })
        .ok_or_else(|| ParameterError::UnknownPalette(name.to_string()))
}

/// Registry names in declaration order.
pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}

pub fn parse_hex(s: &str) -> Result<Srgb<u8>, ParameterError> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(ParameterError::InvalidHex(s.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| ParameterError::InvalidHex(s.to_string()))
    };
    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn to_hex(c: Srgb<u8>) -> String {
    format!("{:02X}{:02X}{:02X}", c.red, c.green, c.blue)
}
