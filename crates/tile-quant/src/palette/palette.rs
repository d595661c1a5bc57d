//! Palette storage and per-entry perceptual attributes.
//!
//! A [`Palette`] is the ordered list of allowed output colors exactly as the
//! caller supplied it. An [`IndexedPalette`] adds the attributes the
//! perceptual mapper needs (Lab, chroma, hue), computed once per palette.

use std::str::FromStr;

use super::error::PaletteError;
use crate::color::{Lab, Rgba8};

/// An ordered palette of RGBA colors.
///
/// The palette is never deduplicated or sorted: entry order is the
/// tie-break order for every mapper (lower index wins), so it must be
/// preserved exactly as given.
///
/// # Example
///
/// ```
/// use tile_quant::{Palette, Rgba8};
///
/// let palette = Palette::new(vec![Rgba8::opaque(0, 0, 0), Rgba8::opaque(255, 255, 255)]).unwrap();
/// assert_eq!(palette.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba8>,
}

impl Palette {
    /// Create a palette from colors.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::EmptyPalette`] if `colors` is empty.
    pub fn new(colors: Vec<Rgba8>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Create a palette from a flat `[R, G, B, A, R, G, B, A, ...]` array.
    ///
    /// A trailing partial quadruple is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::EmptyPalette`] if fewer than four values are
    /// supplied.
    ///
    /// # Example
    ///
    /// ```
    /// use tile_quant::{Palette, Rgba8};
    ///
    /// let palette = Palette::from_flat(&[255, 0, 0, 255, 9, 9]).unwrap();
    /// assert_eq!(palette.colors(), &[Rgba8::opaque(255, 0, 0)]);
    /// assert!(Palette::from_flat(&[1, 2, 3]).is_err());
    /// ```
    pub fn from_flat(flat: &[u8]) -> Result<Self, PaletteError> {
        let colors = flat
            .chunks_exact(4)
            .map(|c| Rgba8::new(c[0], c[1], c[2], c[3]))
            .collect();
        Self::new(colors)
    }

    /// Create a palette from color strings (see [`Rgba8::from_str`]).
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] for the first invalid string, or
    /// [`PaletteError::EmptyPalette`] for an empty list.
    pub fn from_hex(colors: &[&str]) -> Result<Self, PaletteError> {
        let colors = colors
            .iter()
            .map(|s| Rgba8::from_str(s).map_err(PaletteError::ParseColor))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`: empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn colors(&self) -> &[Rgba8] {
        &self.colors
    }

    /// Flatten back into RGBA quadruples.
    pub fn to_flat(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| c.to_array()).collect()
    }

    /// Find the entry nearest to `color` by squared RGB distance.
    ///
    /// Returns the index of the first entry with the minimal distance.
    #[inline]
    pub fn find_nearest_rgb(&self, color: Rgba8) -> usize {
        let mut best_idx = 0;
        let mut best_dist = u32::MAX;

        for (i, &entry) in self.colors.iter().enumerate() {
            let dist = color.rgb_distance_squared(entry);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        best_idx
    }
}

/// Perceptual attributes of one palette entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedEntry {
    /// The original color, written back to matched pixels.
    pub rgba: Rgba8,
    pub lab: Lab,
    /// `hypot(a, b)`
    pub chroma: f64,
    /// `atan2(b, a)` in radians
    pub hue: f64,
}

/// A palette with Lab, chroma and hue precomputed for every entry.
///
/// Building one costs a Lab conversion per entry; the worker keeps it
/// cached for as long as the palette selection is unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPalette {
    palette: Palette,
    entries: Vec<IndexedEntry>,
}

impl IndexedPalette {
    pub fn new(palette: Palette) -> Self {
        let entries = palette
            .colors()
            .iter()
            .map(|&rgba| {
                let lab = Lab::from_rgba(rgba);
                IndexedEntry {
                    rgba,
                    lab,
                    chroma: lab.chroma(),
                    hue: lab.hue(),
                }
            })
            .collect();
        Self { palette, entries }
    }

    /// The underlying palette, in its original order.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn entries(&self) -> &[IndexedEntry] {
        &self.entries
    }

    #[inline]
    pub fn entry(&self, idx: usize) -> &IndexedEntry {
        &self.entries[idx]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: built from a non-empty [`Palette`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Palette> for IndexedPalette {
    fn from(palette: Palette) -> Self {
        IndexedPalette::new(palette)
    }
}
