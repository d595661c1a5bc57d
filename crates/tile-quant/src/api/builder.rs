//! Pixelator builder -- the primary entry point for the crate.
//!
//! [`Pixelator`] runs the tile pipeline: area-average downsample to the tile
//! grid, then (when a palette is set) map every tile to a palette entry.

use std::sync::Arc;

use crate::buffer::{BlockSize, PixelBuffer, TileGrid};
use crate::downsample::downsample;
use crate::mapper::{Classic, ColorMapper, MapperKind, Perceptual, PerceptualParams};
use crate::palette::{IndexedPalette, Palette};

use super::error::QuantError;

/// Geometry of a pixelated result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileMeta {
    /// Output width in pixels (equals `tiles_x`)
    pub out_width: u32,
    /// Output height in pixels (equals `tiles_y`)
    pub out_height: u32,
    pub tiles_x: u32,
    pub tiles_y: u32,
    /// Number of output pixels, `tiles_x * tiles_y`
    pub total_pixels: u64,
    pub block_size: u32,
}

impl TileMeta {
    pub fn new(grid: TileGrid, block: BlockSize) -> Self {
        Self {
            out_width: grid.tiles_x,
            out_height: grid.tiles_y,
            tiles_x: grid.tiles_x,
            tiles_y: grid.tiles_y,
            total_pixels: grid.len() as u64,
            block_size: block.get(),
        }
    }
}

/// Output of [`Pixelator::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixelated {
    pub pixels: PixelBuffer,
    pub meta: TileMeta,
}

/// High-level pixelation builder.
///
/// # Design
///
/// - Constructor requires a validated [`BlockSize`]
/// - Configuration methods consume and return `self`
/// - [`run()`](Self::run) takes `&self`, so one builder serves many images
/// - Without a palette, `run` only downsamples
///
/// # Example
///
/// ```
/// use tile_quant::{BlockSize, MapperKind, Palette, Pixelator, PixelBuffer, Rgba8};
///
/// let source = PixelBuffer::filled(32, 32, Rgba8::opaque(250, 5, 5));
/// let palette = Palette::from_hex(&["#000", "#f00", "#fff"]).unwrap();
///
/// let result = Pixelator::new(BlockSize::new(16).unwrap())
///     .mapper(MapperKind::Classic)
///     .palette(palette)
///     .run(&source);
///
/// assert_eq!((result.meta.tiles_x, result.meta.tiles_y), (2, 2));
/// assert!(result.pixels.pixels().all(|p| p == Rgba8::opaque(255, 0, 0)));
/// ```
#[derive(Debug, Clone)]
pub struct Pixelator {
    block: BlockSize,
    mapper: MapperKind,
    params: PerceptualParams,
    palette: Option<Arc<IndexedPalette>>,
}

impl Pixelator {
    /// Create a pixelator with the perceptual mapper and no palette.
    pub fn new(block: BlockSize) -> Self {
        Self {
            block,
            mapper: MapperKind::default(),
            params: PerceptualParams::default(),
            palette: None,
        }
    }

    /// Like [`new`](Self::new), validating a raw block size.
    ///
    /// # Errors
    ///
    /// Returns [`QuantError::Pixel`] if `block_size` is out of range.
    pub fn try_new(block_size: u32) -> Result<Self, QuantError> {
        Ok(Self::new(BlockSize::new(block_size)?))
    }

    #[inline]
    pub fn mapper(mut self, mapper: MapperKind) -> Self {
        self.mapper = mapper;
        self
    }

    /// Set the perceptual mapper's tuning. Ignored by the classic mapper.
    #[inline]
    pub fn perceptual_params(mut self, params: PerceptualParams) -> Self {
        self.params = params;
        self
    }

    /// Set the palette, indexing it.
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = Some(Arc::new(IndexedPalette::new(palette)));
        self
    }

    /// Set an already-indexed palette, or `None` to skip color mapping.
    #[inline]
    pub fn indexed_palette(mut self, palette: Option<Arc<IndexedPalette>>) -> Self {
        self.palette = palette;
        self
    }

    #[inline]
    pub fn block_size(&self) -> BlockSize {
        self.block
    }

    /// Downsample `source` and, if a palette is set, color-map the tiles.
    pub fn run(&self, source: &PixelBuffer) -> Pixelated {
        let grid = TileGrid::new(source.width(), source.height(), self.block);
        let mut pixels = downsample(source, self.block);

        if let Some(palette) = &self.palette {
            match self.mapper {
                MapperKind::Classic => Classic.map_colors(&mut pixels, palette),
                MapperKind::Perceptual => {
                    Perceptual::new(self.params.clone()).map_colors(&mut pixels, palette)
                }
            }
        }

        Pixelated {
            pixels,
            meta: TileMeta::new(grid, self.block),
        }
    }
}
