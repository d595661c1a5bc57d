//! Integer area averaging over square blocks.

use crate::buffer::{BlockSize, PixelBuffer, TileGrid};

/// Per-tile accumulator. u64 is wide enough for any u32 x u32 source.
#[derive(Debug, Clone, Copy, Default)]
struct TileSum {
    r: u64,
    g: u64,
    b: u64,
    a: u64,
    count: u64,
}

/// Reduce `source` to its tile grid, one averaged pixel per tile.
///
/// Edge tiles cover only the part of the source that remains, and are
/// averaged over that part.
///
/// # Example
///
/// ```
/// use tile_quant::{downsample, BlockSize, PixelBuffer, Rgba8};
///
/// let source = PixelBuffer::filled(32, 32, Rgba8::opaque(255, 0, 0));
/// let tiles = downsample(&source, BlockSize::new(16).unwrap());
/// assert_eq!((tiles.width(), tiles.height()), (2, 2));
/// assert!(tiles.pixels().all(|p| p == Rgba8::opaque(255, 0, 0)));
/// ```
pub fn downsample(source: &PixelBuffer, block: BlockSize) -> PixelBuffer {
    average_blocks(source, block.get())
}

/// Bound a freshly decoded image so neither side exceeds `max_dimension`.
///
/// Uses the smallest integer reduction factor that fits and the same area
/// averaging as [`downsample`]. Images already within bounds are returned
/// unchanged.
pub fn shrink_to_fit(source: PixelBuffer, max_dimension: u32) -> PixelBuffer {
    let max_dimension = max_dimension.max(1);
    let longest = source.width().max(source.height());
    if longest <= max_dimension {
        return source;
    }
    let factor = longest.div_ceil(max_dimension);
    average_blocks(&source, factor)
}

fn average_blocks(source: &PixelBuffer, factor: u32) -> PixelBuffer {
    let grid = TileGrid::with_factor(source.width(), source.height(), factor);
    let mut sums = vec![TileSum::default(); grid.len()];

    let width = source.width() as usize;
    let factor = factor.max(1) as usize;
    let tiles_x = grid.tiles_x as usize;

    // An empty source has no samples, so the max(1) only avoids a zero chunk size
    for (y, row) in source.data().chunks_exact(width.max(1) * 4).enumerate() {
        let tile_row = (y / factor) * tiles_x;
        for (x, px) in row.chunks_exact(4).enumerate() {
            let sum = &mut sums[tile_row + x / factor];
            let a = px[3] as u64;
            sum.r += px[0] as u64 * a;
            sum.g += px[1] as u64 * a;
            sum.b += px[2] as u64 * a;
            sum.a += a;
            sum.count += 1;
        }
    }

    let mut data = Vec::with_capacity(grid.len() * 4);
    for sum in &sums {
        data.extend_from_slice(&resolve(sum));
    }

    PixelBuffer::new(grid.tiles_x, grid.tiles_y, data)
        .unwrap_or_else(|_| unreachable!("tile buffer sized from its own grid"))
}

/// Round-half-up integer division.
#[inline]
fn div_round(num: u64, den: u64) -> u8 {
    ((num + den / 2) / den).min(255) as u8
}

#[inline]
fn resolve(sum: &TileSum) -> [u8; 4] {
    if sum.a == 0 || sum.count == 0 {
        return [0, 0, 0, 0];
    }
    [
        div_round(sum.r, sum.a),
        div_round(sum.g, sum.a),
        div_round(sum.b, sum.a),
        div_round(sum.a, sum.count),
    ]
}
