//! Palette color mapping.
//!
//! Every non-transparent pixel of a tile grid is replaced by one palette
//! entry. Two strategies are available:
//!
//! - **Classic**: nearest entry by squared Euclidean distance in raw RGB.
//!   Cheap, and the baseline when perceptual matching is off.
//! - **Perceptual**: CIEDE2000 shortlist in CIELAB followed by a contextual
//!   refinement that penalizes lightness/chroma drift, unstable hue and
//!   saturated picks for near-neutral pixels.
//!
//! Both leave pixels with alpha 0 untouched (all four channels) and write
//! the chosen entry's full RGBA, alpha included, to every other pixel.
//!
//! # Architecture
//!
//! Strategies implement the [`ColorMapper`] trait; [`MapperKind`] selects
//! one at runtime.
//!
//! # Example
//!
//! ```
//! use tile_quant::{ColorMapper, IndexedPalette, Palette, Perceptual, PixelBuffer, Rgba8};
//!
//! let palette = IndexedPalette::new(Palette::from_hex(&["#000", "#fff"]).unwrap());
//! let mut tiles = PixelBuffer::filled(2, 2, Rgba8::opaque(30, 30, 30));
//! Perceptual::default().map_colors(&mut tiles, &palette);
//! assert!(tiles.pixels().all(|p| p == Rgba8::opaque(0, 0, 0)));
//! ```

mod classic;
mod params;
mod perceptual;
mod shortlist;

use std::fmt;
use std::str::FromStr;

pub use classic::Classic;
pub use params::PerceptualParams;
pub use perceptual::{hue_stability, Perceptual};
pub use shortlist::{Candidate, Shortlist};

use crate::buffer::PixelBuffer;
use crate::palette::IndexedPalette;

/// A palette mapping strategy.
pub trait ColorMapper {
    /// Replace every pixel with alpha != 0 by its chosen palette entry.
    fn map_colors(&self, pixels: &mut PixelBuffer, palette: &IndexedPalette);
}

/// Mapping strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MapperKind {
    /// Nearest entry in raw RGB ([`Classic`]).
    Classic,
    /// CIEDE2000 shortlist plus contextual refinement ([`Perceptual`]).
    #[default]
    Perceptual,
}

impl MapperKind {
    /// Map `pixels` in place with this strategy and default parameters.
    pub fn map_colors(self, pixels: &mut PixelBuffer, palette: &IndexedPalette) {
        match self {
            MapperKind::Classic => Classic.map_colors(pixels, palette),
            MapperKind::Perceptual => Perceptual::default().map_colors(pixels, palette),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MapperKind::Classic => "classic",
            MapperKind::Perceptual => "perceptual",
        }
    }
}

impl fmt::Display for MapperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown mapper name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMapper(pub String);

impl fmt::Display for UnknownMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown mapper {:?} (expected \"classic\" or \"perceptual\")",
            self.0
        )
    }
}

impl std::error::Error for UnknownMapper {}

impl FromStr for MapperKind {
    type Err = UnknownMapper;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            s if s.eq_ignore_ascii_case("classic") => Ok(MapperKind::Classic),
            s if s.eq_ignore_ascii_case("perceptual") => Ok(MapperKind::Perceptual),
            other => Err(UnknownMapper(other.to_string())),
        }
    }
}
