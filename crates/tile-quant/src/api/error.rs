//! Unified error type for the tile-quant public API.
//!
//! [`QuantError`] wraps all error types from the crate into a single enum
//! for convenient `?` propagation in application code.

use std::fmt;

use crate::buffer::PixelError;
use crate::palette::{PaletteError, ParseColorError};

/// Unified error type for the tile-quant public API.
///
/// # Example
///
/// ```
/// use tile_quant::{Palette, Pixelator, QuantError};
///
/// fn setup(block: u32) -> Result<Pixelator, QuantError> {
///     let palette = Palette::from_hex(&["#000000", "#ffffff"])?;
///     Ok(Pixelator::try_new(block)?.palette(palette))
/// }
/// assert!(setup(8).is_ok());
/// assert!(setup(0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantError {
    /// Buffer length or block size error
    Pixel(PixelError),
    /// Palette validation error
    Palette(PaletteError),
    /// Color parsing error (invalid hex string)
    ParseColor(ParseColorError),
}

impl fmt::Display for QuantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantError::Pixel(err) => write!(f, "pixel buffer error: {}", err),
            QuantError::Palette(err) => write!(f, "palette error: {}", err),
            QuantError::ParseColor(err) => write!(f, "color parse error: {}", err),
        }
    }
}

impl std::error::Error for QuantError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuantError::Pixel(err) => Some(err),
            QuantError::Palette(err) => Some(err),
            QuantError::ParseColor(err) => Some(err),
        }
    }
}

impl From<PixelError> for QuantError {
    fn from(err: PixelError) -> Self {
        QuantError::Pixel(err)
    }
}

impl From<PaletteError> for QuantError {
    fn from(err: PaletteError) -> Self {
        QuantError::Palette(err)
    }
}

impl From<ParseColorError> for QuantError {
    fn from(err: ParseColorError) -> Self {
        QuantError::ParseColor(err)
    }
}
