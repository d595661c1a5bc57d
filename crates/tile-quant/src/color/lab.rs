//! CIE XYZ and CIELAB color spaces
//!
//! Conversion path: 8-bit sRGB -> linear RGB (gamma decode) -> XYZ (D65
//! matrix) -> Lab (D65 white normalization and the CIE `f` function).
//!
//! The constants are the textbook sRGB/D65 values. Mapping decisions depend
//! on them directly, so they must not be rounded or replaced by a
//! differently-derived matrix.

use std::f64::consts::PI;

use super::lut::srgb_to_linear;
use super::rgba::Rgba8;

/// D65 reference white, X component.
const XN: f64 = 0.95047;
/// D65 reference white, Y component.
const YN: f64 = 1.0;
/// D65 reference white, Z component.
const ZN: f64 = 1.08883;

/// CIE `f` breakpoint: (6/29)^3.
const EPSILON: f64 = (6.0 / 29.0) * (6.0 / 29.0) * (6.0 / 29.0);

/// A color in CIE 1931 XYZ (D65, Y of white = 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    /// Convert 8-bit sRGB channels to XYZ.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r = srgb_to_linear(r);
        let g = srgb_to_linear(g);
        let b = srgb_to_linear(b);
        Self {
            x: r * 0.4124564 + g * 0.3575761 + b * 0.1804375,
            y: r * 0.2126729 + g * 0.7151522 + b * 0.0721750,
            z: r * 0.0193339 + g * 0.1191920 + b * 0.9503041,
        }
    }
}

/// A color in CIELAB.
///
/// - `l`: lightness, 0 (black) to 100 (diffuse white)
/// - `a`: green (negative) to red (positive)
/// - `b`: blue (negative) to yellow (positive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Convert 8-bit sRGB channels to Lab.
    ///
    /// # Example
    ///
    /// ```
    /// use tile_quant::Lab;
    ///
    /// let black = Lab::from_rgb(0, 0, 0);
    /// assert!(black.l.abs() < 1e-9);
    /// ```
    #[inline]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Lab::from(Xyz::from_rgb(r, g, b))
    }

    /// Convert the color channels of an [`Rgba8`] to Lab. Alpha is ignored.
    #[inline]
    pub fn from_rgba(color: Rgba8) -> Self {
        Self::from_rgb(color.r, color.g, color.b)
    }

    /// Chroma: the distance from the neutral axis, `hypot(a, b)`.
    #[inline]
    pub fn chroma(self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Hue angle in radians, `atan2(b, a)`, in `[-π, π]`.
    #[inline]
    pub fn hue(self) -> f64 {
        hue_angle(self.a, self.b)
    }
}

impl From<Xyz> for Lab {
    fn from(xyz: Xyz) -> Self {
        let fx = lab_f(xyz.x / XN);
        let fy = lab_f(xyz.y / YN);
        let fz = lab_f(xyz.z / ZN);
        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        t / (3.0 * (6.0 / 29.0) * (6.0 / 29.0)) + 4.0 / 29.0
    }
}

/// Hue angle of an (a, b) pair in radians, in `[-π, π]`.
#[inline]
pub fn hue_angle(a: f64, b: f64) -> f64 {
    b.atan2(a)
}

/// Absolute difference between two hue angles, wrapped into `[0, π]`.
#[inline]
pub fn hue_difference(h1: f64, h2: f64) -> f64 {
    let d = (h1 - h2).abs();
    if d > PI {
        2.0 * PI - d
    } else {
        d
    }
}

/// Absolute hue difference between two (a, b) pairs, in `[0, π]`.
#[inline]
pub fn delta_hue(a1: f64, b1: f64, a2: f64, b2: f64) -> f64 {
    hue_difference(hue_angle(a1, b1), hue_angle(a2, b2))
}
