//! Error types for palette operations
//!
//! This module provides error types for color parsing and palette validation.

use std::fmt;

/// Error type for parsing palette color strings.
///
/// Returned when a color string is neither `transparent` nor a 3- or
/// 6-digit hex color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength(usize),
    /// Non-hexadecimal character encountered
    InvalidDigit(char),
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength(len) => {
                write!(
                    f,
                    "invalid hex color length {} (expected 3 or 6 characters)",
                    len
                )
            }
            ParseColorError::InvalidDigit(c) => {
                write!(f, "invalid hex character: {:?}", c)
            }
        }
    }
}

impl std::error::Error for ParseColorError {}

/// Error type for palette validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// No complete color provided
    EmptyPalette,
    /// Invalid color string
    ParseColor(ParseColorError),
}

impl From<ParseColorError> for PaletteError {
    fn from(err: ParseColorError) -> Self {
        PaletteError::ParseColor(err)
    }
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyPalette => {
                write!(f, "palette cannot be empty")
            }
            PaletteError::ParseColor(err) => {
                write!(f, "invalid color: {}", err)
            }
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaletteError::ParseColor(err) => Some(err),
            _ => None,
        }
    }
}
