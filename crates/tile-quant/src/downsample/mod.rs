//! Tile downsampling.
//!
//! Collapses every `block x block` region of the source into one output
//! pixel holding the region's area-weighted average color. The output
//! resolution is the tile grid itself; magnifying it back for display is a
//! presentation concern.
//!
//! # Averaging
//!
//! Colors are averaged with alpha weighting (premultiplied), the way a
//! smoothing canvas resampler does, so fully transparent source pixels
//! contribute no color:
//!
//! ```text
//! alpha = round(Σa / n)
//! rgb   = round(Σ(c·a) / Σa)      (0, 0, 0, 0) when Σa = 0
//! ```
//!
//! A uniform region therefore reproduces its color exactly.

mod area;

pub use area::{downsample, shrink_to_fit};
