//! Error type for pixel buffer and tile geometry validation.

use std::fmt;

/// Error type for invalid pixel data or tile parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelError {
    /// Sample buffer length does not equal `width * height * 4`
    LengthMismatch {
        /// Required length in bytes
        expected: usize,
        /// Supplied length in bytes
        actual: usize,
    },
    /// Block size outside `BlockSize::MIN..=BlockSize::MAX`
    InvalidBlockSize(u32),
}

impl fmt::Display for PixelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel data length mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
            PixelError::InvalidBlockSize(size) => {
                write!(
                    f,
                    "block size {} out of range ({}..={})",
                    size,
                    super::BlockSize::MIN,
                    super::BlockSize::MAX
                )
            }
        }
    }
}

impl std::error::Error for PixelError {}
