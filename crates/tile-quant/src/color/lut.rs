//! Gamma lookup table access functions
//!
//! The table is generated at compile time by build.rs from the exact
//! IEC 61966-2-1 formula, one entry per 8-bit channel value.

// Include the generated LUT from build.rs
include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Convert an 8-bit sRGB channel value to linear light.
///
/// Equivalent to [`srgb_to_linear_exact`]`(c as f64 / 255.0)`, bit for bit.
#[inline]
pub fn srgb_to_linear(c: u8) -> f64 {
    SRGB8_TO_LINEAR[c as usize]
}

/// IEC 61966-2-1 sRGB decode of a normalized channel value (0.0..=1.0).
#[inline]
pub fn srgb_to_linear_exact(cs: f64) -> f64 {
    if cs <= 0.04045 {
        cs / 12.92
    } else {
        ((cs + 0.055) / 1.055).powf(2.4)
    }
}
