//! Color types and conversion utilities
//!
//! This module provides the stateless color math used by the mappers:
//!
//! - [`Rgba8`]: 8-bit sRGB with alpha, the storage format of every pixel
//! - [`Xyz`]: CIE 1931 XYZ under the D65 white point
//! - [`Lab`]: CIELAB, where palette matching happens
//!
//! # Example
//!
//! ```
//! use tile_quant::{Lab, Rgba8};
//!
//! let white = Lab::from_rgba(Rgba8::opaque(255, 255, 255));
//! assert!((white.l - 100.0).abs() < 0.01);
//! ```

mod delta_e;
mod lab;
mod lut;
mod rgba;

pub use delta_e::ciede2000;
pub use lab::{delta_hue, hue_angle, hue_difference, Lab, Xyz};
pub use lut::{srgb_to_linear, srgb_to_linear_exact};
pub use rgba::Rgba8;
