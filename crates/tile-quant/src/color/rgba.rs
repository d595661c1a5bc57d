//! 8-bit RGBA color type
//!
//! Every pixel in a [`PixelBuffer`](crate::PixelBuffer) and every palette
//! entry is stored as four 8-bit sRGB channels with straight (not
//! premultiplied) alpha.

use std::fmt;
use std::str::FromStr;

use crate::palette::ParseColorError;

/// An sRGB color with straight alpha, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba8 {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
    /// Alpha channel (0 = fully transparent, 255 = opaque)
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black, the value of the `"transparent"` keyword.
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color (alpha 255).
    ///
    /// # Example
    /// ```
    /// use tile_quant::Rgba8;
    /// let red = Rgba8::opaque(255, 0, 0);
    /// assert_eq!(red.a, 255);
    /// ```
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from a `[R, G, B, A]` byte array.
    #[inline]
    pub const fn from_array(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Convert to a `[R, G, B, A]` byte array.
    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns true if alpha is zero.
    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Squared Euclidean distance over R, G and B. Alpha does not participate.
    #[inline]
    pub fn rgb_distance_squared(self, other: Rgba8) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

impl fmt::Display for Rgba8 {
    /// Formats as `#rrggbb` for opaque colors, `transparent` for
    /// `(0, 0, 0, 0)` and `#rrggbbaa` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.a {
            255 => write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b),
            0 if *self == Rgba8::TRANSPARENT => write!(f, "transparent"),
            a => write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, a),
        }
    }
}

impl FromStr for Rgba8 {
    type Err = ParseColorError;

    /// Parse a palette color string.
    ///
    /// Supports the following formats:
    /// - `transparent` - RGBA (0, 0, 0, 0)
    /// - `#RRGGBB` / `RRGGBB` - 6-digit hex, alpha 255
    /// - `#RGB` / `RGB` - shorthand 3-digit hex, each digit duplicated, alpha 255
    ///
    /// Hex digits are case-insensitive. Nothing else is accepted, including
    /// surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_quant::Rgba8;
    ///
    /// let red: Rgba8 = "f00".parse().unwrap();
    /// assert_eq!(red, Rgba8::new(255, 0, 0, 255));
    ///
    /// let clear: Rgba8 = "transparent".parse().unwrap();
    /// assert_eq!(clear, Rgba8::TRANSPARENT);
    ///
    /// assert!("zzzzzz".parse::<Rgba8>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "transparent" {
            return Ok(Rgba8::TRANSPARENT);
        }
        let s = s.strip_prefix('#').unwrap_or(s);

        // Validate digits up front: from_str_radix would accept a leading '+',
        // and byte slicing below requires ASCII.
        if let Some(bad) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidDigit(bad));
        }

        let digit = |i: usize| (s.as_bytes()[i] as char).to_digit(16).unwrap_or(0) as u8;
        match s.len() {
            3 => Ok(Rgba8::opaque(digit(0) * 17, digit(1) * 17, digit(2) * 17)),
            6 => Ok(Rgba8::opaque(
                digit(0) << 4 | digit(1),
                digit(2) << 4 | digit(3),
                digit(4) << 4 | digit(5),
            )),
            len => Err(ParseColorError::InvalidLength(len)),
        }
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(bytes: [u8; 4]) -> Self {
        Rgba8::from_array(bytes)
    }
}
