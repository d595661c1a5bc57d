//! Source image intake.
//!
//! A submitted source stays encoded until its job actually runs, so the
//! worker sees requests in the order they arrived regardless of how long
//! each source takes to decode.

use std::fmt;
use tile_quant::{shrink_to_fit, PixelBuffer};

use super::png::decode_png;
use crate::error::ImageError;
use crate::models::SourceImage;

/// A job's source image as submitted.
#[derive(Clone, PartialEq, Eq)]
pub enum JobSource {
    /// RGBA8 samples, already validated against their dimensions
    Pixels(PixelBuffer),
    /// An encoded PNG file
    Png(Vec<u8>),
}

impl JobSource {
    /// Accept a wire source image.
    ///
    /// Raw samples are checked against their dimensions here; PNG files are
    /// kept as-is and decoded by [`prepare`](Self::prepare).
    pub fn from_wire(source: SourceImage) -> Result<Self, ImageError> {
        Ok(match source {
            SourceImage::Raw {
                width,
                height,
                data,
            } => JobSource::Pixels(PixelBuffer::new(width, height, data)?),
            SourceImage::Png { png } => JobSource::Png(png),
        })
    }

    /// Decode if needed and shrink to at most `max_dimension` on either side.
    pub fn prepare(self, max_dimension: u32) -> Result<PixelBuffer, ImageError> {
        let pixels = match self {
            JobSource::Pixels(pixels) => pixels,
            JobSource::Png(png) => decode_png(&png)?,
        };

        let (width, height) = (pixels.width(), pixels.height());
        let pixels = shrink_to_fit(pixels, max_dimension);
        if pixels.width() != width || pixels.height() != height {
            tracing::debug!(
                from = %format!("{width}x{height}"),
                to = %format!("{}x{}", pixels.width(), pixels.height()),
                "Downscaled oversized source"
            );
        }
        Ok(pixels)
    }
}

impl From<PixelBuffer> for JobSource {
    fn from(pixels: PixelBuffer) -> Self {
        JobSource::Pixels(pixels)
    }
}

impl fmt::Debug for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobSource::Pixels(pixels) => {
                write!(f, "Pixels({}x{})", pixels.width(), pixels.height())
            }
            JobSource::Png(png) => write!(f, "Png({} bytes)", png.len()),
        }
    }
}
