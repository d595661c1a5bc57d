//! Block size and tile grid geometry.

use super::error::PixelError;

/// Edge length, in source pixels, of one output tile.
///
/// # Example
///
/// ```
/// use tile_quant::BlockSize;
///
/// assert_eq!(BlockSize::new(16).unwrap().get(), 16);
/// assert!(BlockSize::new(0).is_err());
/// assert!(BlockSize::new(33).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockSize(u32);

impl BlockSize {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 32;

    /// Validate a block size into `MIN..=MAX`.
    pub fn new(size: u32) -> Result<Self, PixelError> {
        if (Self::MIN..=Self::MAX).contains(&size) {
            Ok(Self(size))
        } else {
            Err(PixelError::InvalidBlockSize(size))
        }
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for BlockSize {
    type Error = PixelError;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        BlockSize::new(size)
    }
}

/// Tile grid dimensions for a source image and block size.
///
/// `tiles_x = max(1, ceil(width / block))`, likewise for `tiles_y`, so the
/// grid is at least 1x1 even for an empty source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub tiles_x: u32,
    pub tiles_y: u32,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, block: BlockSize) -> Self {
        Self::with_factor(width, height, block.get())
    }

    /// Grid for an arbitrary positive reduction factor (used by the bounded
    /// resize on load, which is not limited to `BlockSize::MAX`).
    pub(crate) fn with_factor(width: u32, height: u32, factor: u32) -> Self {
        let factor = factor.max(1);
        Self {
            tiles_x: width.div_ceil(factor).max(1),
            tiles_y: height.div_ceil(factor).max(1),
        }
    }

    /// Number of tiles, i.e. output pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles_x as usize * self.tiles_y as usize
    }

    /// Always `false`: a grid has at least one tile.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_size_range() {
        assert!(BlockSize::new(1).is_ok());
        assert!(BlockSize::new(32).is_ok());
        assert_eq!(BlockSize::new(0), Err(PixelError::InvalidBlockSize(0)));
        assert_eq!(BlockSize::new(33), Err(PixelError::InvalidBlockSize(33)));
        assert_eq!(BlockSize::try_from(8).map(BlockSize::get), Ok(8));
    }

    #[test]
    fn test_grid_formula_exhaustive_small() {
        for b in BlockSize::MIN..=BlockSize::MAX {
            let block = BlockSize::new(b).unwrap();
            for w in 1..=70u32 {
                for h in [1u32, 7, 31, 64] {
                    let grid = TileGrid::new(w, h, block);
                    let ex = ((w as f64) / (b as f64)).ceil().max(1.0) as u32;
                    let ey = ((h as f64) / (b as f64)).ceil().max(1.0) as u32;
                    assert_eq!((grid.tiles_x, grid.tiles_y), (ex, ey), "w={w} h={h} b={b}");
                }
            }
        }
    }

    #[test]
    fn test_grid_never_empty() {
        let grid = TileGrid::new(0, 0, BlockSize::new(16).unwrap());
        assert_eq!((grid.tiles_x, grid.tiles_y), (1, 1));
        assert_eq!(grid.len(), 1);
        assert!(!grid.is_empty());
    }

    #[test]
    fn test_grid_scenario_block_16() {
        let grid = TileGrid::new(32, 32, BlockSize::new(16).unwrap());
        assert_eq!((grid.tiles_x, grid.tiles_y), (2, 2));
        let grid = TileGrid::new(33, 17, BlockSize::new(16).unwrap());
        assert_eq!((grid.tiles_x, grid.tiles_y), (3, 2));
    }
}
