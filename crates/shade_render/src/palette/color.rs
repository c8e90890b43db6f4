use std::fmt;
use std::str::FromStr;

use image::Rgb;

use crate::ShadeError;

/// An opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb(self.channels())
    }

    /// Multiply every channel by `factor`, truncating toward zero.
    pub fn scale(self, factor: f64) -> Color {
        Color::from_real(self.channels().map(|c| f64::from(c) * factor))
    }

    pub(crate) fn real(self) -> [f64; 3] {
        self.channels().map(f64::from)
    }

    /// Clamp real-valued channels into `[0, 255]` and truncate.
    pub(crate) fn from_real(channels: [f64; 3]) -> Color {
        let [r, g, b] = channels.map(|c| c.clamp(0.0, 255.0) as u8);
        Color { r, g, b }
    }
}

pub(crate) fn lerp(from: [f64; 3], to: [f64; 3], t: f64) -> [f64; 3] {
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
        from[2] + (to[2] - from[2]) * t,
    ]
}

impl FromStr for Color {
    type Err = ShadeError;

    /// Parse `#RRGGBB`; the leading `#` is optional.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ShadeError::InvalidColor(value.to_owned()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| ShadeError::InvalidColor(value.to_owned()))
        };

        Ok(Color { r: channel(0..2)?, g: channel(2..4)?, b: channel(4..6)? })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Self {
        color.to_rgb()
    }
}
