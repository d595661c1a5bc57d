//! Nearest-color mapping in raw RGB.

use super::ColorMapper;
use crate::buffer::PixelBuffer;
use crate::color::Rgba8;
use crate::palette::IndexedPalette;

/// Nearest palette entry by squared Euclidean distance over R, G, B.
///
/// Full linear scan per pixel; on exact ties the lowest palette index wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classic;

impl ColorMapper for Classic {
    fn map_colors(&self, pixels: &mut PixelBuffer, palette: &IndexedPalette) {
        let palette = palette.palette();
        for px in pixels.data_mut().chunks_exact_mut(4) {
            if px[3] == 0 {
                continue;
            }
            let color = Rgba8::new(px[0], px[1], px[2], px[3]);
            let idx = palette.find_nearest_rgb(color);
            px.copy_from_slice(&palette.colors()[idx].to_array());
        }
    }
}
