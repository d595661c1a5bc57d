//! Public API for the tile-quant crate.
//!
//! This module provides the high-level API: the [`Pixelator`] builder,
//! its [`Pixelated`] output and the [`QuantError`] unified error type.

mod builder;
mod error;

pub use builder::{Pixelated, Pixelator, TileMeta};
pub use error::QuantError;
