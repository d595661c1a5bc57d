//! pixelforge - pixel-art conversion service
//!
//! Turns images into block-tiled pixel art, optionally snapped to a color
//! palette, behind a single-worker job queue where the newest request wins.
//! This library exposes modules for the binary and for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
