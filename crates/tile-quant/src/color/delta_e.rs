//! CIEDE2000 color difference.
//!
//! Follows Sharma, Wu and Dalal, "The CIEDE2000 Color-Difference Formula:
//! Implementation Notes, Supplementary Test Data, and Mathematical
//! Observations" (2005), with unit weighting factors kL = kC = kH = 1.

use super::lab::Lab;

/// 25^7, the chroma reference in the G and Rc terms.
const POW25_7: f64 = 6_103_515_625.0;

/// Hue of (a', b) in degrees, in `[0, 360)`. Zero for the achromatic case.
#[inline]
fn hue_prime_degrees(b: f64, a_prime: f64) -> f64 {
    if b == 0.0 && a_prime == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a_prime).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

/// CIEDE2000 distance ΔE00 between two Lab colors.
///
/// Symmetric in its arguments and zero for identical colors.
///
/// # Example
///
/// ```
/// use tile_quant::{ciede2000, Lab};
///
/// // First pair of the Sharma et al. test data
/// let x = Lab::new(50.0, 2.6772, -79.7751);
/// let y = Lab::new(50.0, 0.0, -82.7485);
/// assert!((ciede2000(x, y) - 2.0425).abs() < 1e-4);
/// ```
pub fn ciede2000(x: Lab, y: Lab) -> f64 {
    let c1 = x.a.hypot(x.b);
    let c2 = y.a.hypot(y.b);
    let c_bar = (c1 + c2) / 2.0;
    let c_bar7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + POW25_7)).sqrt());

    let a1p = (1.0 + g) * x.a;
    let a2p = (1.0 + g) * y.a;
    let c1p = a1p.hypot(x.b);
    let c2p = a2p.hypot(y.b);
    let h1p = hue_prime_degrees(x.b, a1p);
    let h2p = hue_prime_degrees(y.b, a2p);

    let delta_lp = y.l - x.l;
    let delta_cp = c2p - c1p;

    let chroma_product = c1p * c2p;
    let delta_hp = if chroma_product == 0.0 {
        0.0
    } else {
        let d = h2p - h1p;
        if d > 180.0 {
            d - 360.0
        } else if d < -180.0 {
            d + 360.0
        } else {
            d
        }
    };
    let delta_big_hp = 2.0 * chroma_product.sqrt() * (delta_hp.to_radians() / 2.0).sin();

    let l_bar_p = (x.l + y.l) / 2.0;
    let c_bar_p = (c1p + c2p) / 2.0;
    let h_bar_p = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_p - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar_p).to_radians().cos()
        + 0.32 * (3.0 * h_bar_p + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_bar_p - 63.0).to_radians().cos();

    let delta_theta = 30.0 * (-((h_bar_p - 275.0) / 25.0).powi(2)).exp();
    let c_bar_p7 = c_bar_p.powi(7);
    let rc = 2.0 * (c_bar_p7 / (c_bar_p7 + POW25_7)).sqrt();
    let l50 = (l_bar_p - 50.0).powi(2);
    let sl = 1.0 + 0.015 * l50 / (20.0 + l50).sqrt();
    let sc = 1.0 + 0.045 * c_bar_p;
    let sh = 1.0 + 0.015 * c_bar_p * t;
    let rt = -(2.0 * delta_theta).to_radians().sin() * rc;

    let dl = delta_lp / sl;
    let dc = delta_cp / sc;
    let dh = delta_big_hp / sh;
    (dl * dl + dc * dc + dh * dh + rt * dc * dh).max(0.0).sqrt()
}
