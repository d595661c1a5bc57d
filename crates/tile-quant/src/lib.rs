#![allow(clippy::excessive_precision, clippy::module_inception)]

//! tile-quant: pixel-art tile downsampling and palette mapping
//!
//! This library reduces an RGBA image to a coarse tile grid by area
//! averaging and optionally re-colors every tile with the nearest entry of a
//! user palette, either by raw RGB distance or by a perceptual CIEDE2000
//! match with contextual penalties.
//!
//! # Quick Start
//!
//! The [`Pixelator`] builder is the primary entry point:
//!
//! ```
//! use tile_quant::{BlockSize, Palette, Pixelator, PixelBuffer, Rgba8};
//!
//! let source = PixelBuffer::filled(64, 48, Rgba8::opaque(90, 140, 200));
//! let palette = Palette::from_hex(&["#1a1c2c", "#41a6f6", "#f4f4f4"]).unwrap();
//!
//! let result = Pixelator::new(BlockSize::new(8).unwrap())
//!     .palette(palette)
//!     .run(&source);
//!
//! assert_eq!(result.pixels.width(), 8);
//! assert_eq!(result.pixels.height(), 6);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! PixelBuffer (W x H, RGBA8)
//!     |
//!     v
//! downsample             (alpha-weighted area average per b x b tile)
//!     |
//!     v
//! PixelBuffer (tiles_x x tiles_y)
//!     |
//!     +---> Classic      (nearest entry, squared RGB distance)
//!     |
//!     +---> Perceptual   (Lab planes -> hue stability -> ΔE00 shortlist -> refinement)
//!     |
//!     v
//! PixelBuffer (palette colors only, transparent tiles untouched)
//! ```
//!
//! # Color Science
//!
//! Perceptual matching works in CIELAB derived from sRGB through
//! linearization (a build-time table, bit-identical to the IEC 61966-2-1
//! formula) and the D65 sRGB-to-XYZ matrix. Distances are CIEDE2000 with
//! unit weighting factors.
//!
//! Raw ΔE00 alone tends to pick colors that are close overall but drift in
//! hue or saturation on near-neutral tones. The refinement stage therefore
//! re-scores the nearest candidates with:
//!
//! | Term | Applies when | Effect |
//! |------|--------------|--------|
//! | Lightness ramp | always | linear beyond 3 units of ΔL |
//! | Chroma ramp | always | linear beyond 3 units of ΔC |
//! | Hue penalty | pixel chroma >= 3 | `1 - cos Δh`, scaled by local hue stability |
//! | Neutral bias | pixel chroma < 6 | proportional to candidate chroma |
//!
//! Hue stability is derived from the spread of a*/b* in the 3x3
//! neighborhood: flat regions keep their hue, noisy or edge regions are
//! free to shift.
//!
//! # Determinism
//!
//! Every stage is a pure function of its inputs. Ties resolve to the lowest
//! palette index (classic) or the earliest shortlist rank (perceptual).

pub mod api;
pub mod buffer;
pub mod color;
pub mod downsample;
pub mod mapper;
pub mod palette;

#[cfg(test)]
mod domain_tests;

pub use api::{Pixelated, Pixelator, QuantError, TileMeta};
pub use buffer::{BlockSize, PixelBuffer, PixelError, TileGrid};
pub use color::{ciede2000, delta_hue, hue_angle, hue_difference, Lab, Rgba8, Xyz};
pub use downsample::{downsample, shrink_to_fit};
pub use mapper::{
    hue_stability, Candidate, Classic, ColorMapper, MapperKind, Perceptual, PerceptualParams,
    Shortlist, UnknownMapper,
};
pub use palette::{IndexedEntry, IndexedPalette, Palette, PaletteError, ParseColorError};
