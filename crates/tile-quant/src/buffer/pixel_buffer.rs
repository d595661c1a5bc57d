//! RGBA8 pixel buffer.

use super::error::PixelError;
use crate::color::Rgba8;

/// A `width x height` grid of RGBA8 samples in row-major order.
///
/// Invariant: `data.len() == width * height * 4`. Buffers are moved between
/// pipeline stages rather than copied; [`into_data`](Self::into_data) hands
/// the samples back without reallocating.
///
/// # Example
///
/// ```
/// use tile_quant::{PixelBuffer, Rgba8};
///
/// let buffer = PixelBuffer::filled(2, 1, Rgba8::opaque(255, 0, 0));
/// assert_eq!(buffer.data(), &[255, 0, 0, 255, 255, 0, 0, 255]);
/// assert!(PixelBuffer::new(2, 2, vec![0; 15]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap existing RGBA8 samples.
    ///
    /// # Errors
    ///
    /// Returns [`PixelError::LengthMismatch`] if `data.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PixelError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(PixelError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        let count = width as usize * height as usize;
        let data = color.to_array().repeat(count);
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba8) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y).to_array());
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw samples, `[R, G, B, A, ...]`.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer, returning its samples.
    #[inline]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        let i = self.offset(x, y);
        Rgba8::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        )
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&color.to_array());
    }

    /// Iterate over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba8> + '_ {
        self.data
            .chunks_exact(4)
            .map(|c| Rgba8::new(c[0], c[1], c[2], c[3]))
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} buffer",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * 4
    }
}
