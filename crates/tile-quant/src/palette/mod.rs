//! Palette types and utilities
//!
//! This module provides the ordered palette the mappers choose from, its
//! perceptually indexed form, and error types for parsing and validation.

mod error;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use palette::{IndexedEntry, IndexedPalette, Palette};
