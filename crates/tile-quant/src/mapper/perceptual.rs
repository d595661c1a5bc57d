//! CIEDE2000 shortlist mapping with contextual refinement.
//!
//! Per pixel, stage one ranks every palette entry by raw ΔE00 and keeps the
//! nearest few; stage two re-scores only those with penalties for lightness
//! and chroma drift, hue shifts in flat regions, and saturated picks for
//! near-neutral pixels. Stage one is O(palette) per pixel and dominates.

use super::params::PerceptualParams;
use super::shortlist::Shortlist;
use super::ColorMapper;
use crate::buffer::PixelBuffer;
use crate::color::{ciede2000, hue_difference, Lab};
use crate::palette::{IndexedEntry, IndexedPalette};

/// Perceptual palette mapper.
///
/// # Example
///
/// ```
/// use tile_quant::{ColorMapper, IndexedPalette, Palette, Perceptual, PerceptualParams, PixelBuffer, Rgba8};
///
/// let palette = IndexedPalette::new(Palette::from_hex(&["#ff0000", "#808080"]).unwrap());
/// let mut tiles = PixelBuffer::filled(1, 1, Rgba8::opaque(120, 124, 126));
/// Perceptual::new(PerceptualParams::default()).map_colors(&mut tiles, &palette);
/// assert_eq!(tiles.pixel(0, 0), Rgba8::opaque(128, 128, 128));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Perceptual {
    params: PerceptualParams,
}

impl Perceptual {
    pub fn new(params: PerceptualParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PerceptualParams {
        &self.params
    }

    /// Adjusted cost of one shortlisted entry for a pixel.
    fn refine_cost(&self, pixel: Lab, pixel_chroma: f64, stability: f64, raw: f64, entry: &IndexedEntry) -> f64 {
        let p = &self.params;
        let mut cost = raw;

        let dl = (pixel.l - entry.lab.l).abs();
        cost += p.lightness_weight * (dl - p.lightness_tolerance).max(0.0);

        let dc = (pixel_chroma - entry.chroma).abs();
        cost += p.chroma_weight * (dc - p.chroma_tolerance).max(0.0);

        if pixel_chroma >= p.neutral_gate {
            let dh = hue_difference(pixel.hue(), entry.hue);
            cost += p.hue_weight * stability * (1.0 - dh.cos());
        }

        if pixel_chroma < p.neutral_bias_threshold {
            cost += p.neutral_bias * entry.chroma;
        }

        cost
    }
}

impl ColorMapper for Perceptual {
    fn map_colors(&self, pixels: &mut PixelBuffer, palette: &IndexedPalette) {
        let width = pixels.width() as usize;
        let height = pixels.height() as usize;
        let planes = LabPlanes::from_buffer(pixels);
        let entries = palette.entries();
        let mut shortlist = Shortlist::with_capacity(self.params.shortlist_len);

        for y in 0..height {
            for x in 0..width {
                let i = y * width + x;
                let offset = i * 4;
                if pixels.data()[offset + 3] == 0 {
                    continue;
                }

                let lab = planes.lab(i);
                let chroma = lab.chroma();
                let stability = hue_stability(
                    &planes.a,
                    &planes.b,
                    width,
                    height,
                    x,
                    y,
                    self.params.stability_scale,
                );

                shortlist.clear();
                for (idx, entry) in entries.iter().enumerate() {
                    shortlist.offer(idx, ciede2000(lab, entry.lab));
                }

                // Strict comparison: on equal cost the earlier rank stays.
                let mut best: Option<(usize, f64)> = None;
                for candidate in shortlist.ranked() {
                    let entry = &entries[candidate.index];
                    let cost = self.refine_cost(lab, chroma, stability, candidate.distance, entry);
                    if best.map_or(true, |(_, c)| cost < c) {
                        best = Some((candidate.index, cost));
                    }
                }

                if let Some((idx, _)) = best {
                    pixels.data_mut()[offset..offset + 4]
                        .copy_from_slice(&entries[idx].rgba.to_array());
                }
            }
        }
    }
}

/// Lab of every pixel, as parallel planes.
struct LabPlanes {
    l: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
}

impl LabPlanes {
    fn from_buffer(pixels: &PixelBuffer) -> Self {
        let n = pixels.pixel_count();
        let mut planes = Self {
            l: Vec::with_capacity(n),
            a: Vec::with_capacity(n),
            b: Vec::with_capacity(n),
        };
        for color in pixels.pixels() {
            let lab = Lab::from_rgba(color);
            planes.l.push(lab.l);
            planes.a.push(lab.a);
            planes.b.push(lab.b);
        }
        planes
    }

    #[inline]
    fn lab(&self, i: usize) -> Lab {
        Lab::new(self.l[i], self.a[i], self.b[i])
    }
}

/// Hue stability at `(x, y)` from the a*/b* planes of a `width x height` image.
///
/// Takes the 3x3 neighborhood clipped to the image, computes the population
/// variance of a* and of b*, and returns `1 - min(1, sqrt(var_a + var_b) / scale)`.
/// A flat region gives 1.0; a noisy or edge region approaches 0.0.
///
/// # Panics
///
/// Panics if `(x, y)` is outside the image or the planes are shorter than
/// `width * height`.
pub fn hue_stability(
    a: &[f64],
    b: &[f64],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    scale: f64,
) -> f64 {
    assert!(x < width && y < height, "({x}, {y}) outside {width}x{height}");

    let x0 = x.saturating_sub(1);
    let x1 = (x + 1).min(width - 1);
    let y0 = y.saturating_sub(1);
    let y1 = (y + 1).min(height - 1);

    let mut n = 0.0;
    let (mut sum_a, mut sum_b) = (0.0, 0.0);
    let (mut sq_a, mut sq_b) = (0.0, 0.0);
    for ny in y0..=y1 {
        for nx in x0..=x1 {
            let i = ny * width + nx;
            sum_a += a[i];
            sum_b += b[i];
            sq_a += a[i] * a[i];
            sq_b += b[i] * b[i];
            n += 1.0;
        }
    }

    let mean_a = sum_a / n;
    let mean_b = sum_b / n;
    let var_a = (sq_a / n - mean_a * mean_a).max(0.0);
    let var_b = (sq_b / n - mean_b * mean_b).max(0.0);
    let sigma = (var_a + var_b).sqrt();
    1.0 - (sigma / scale).min(1.0)
}
