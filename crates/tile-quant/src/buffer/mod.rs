//! Pixel storage and tile geometry.
//!
//! [`PixelBuffer`] is the single image representation used by every stage:
//! source images, tile grids and mapped output. [`BlockSize`] and
//! [`TileGrid`] describe how a source is cut into tiles.

mod error;
mod grid;
mod pixel_buffer;

pub use error::PixelError;
pub use grid::{BlockSize, TileGrid};
pub use pixel_buffer::PixelBuffer;
