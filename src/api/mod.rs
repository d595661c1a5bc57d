pub mod palettes;
pub mod worker;

pub use palettes::{handle_palettes, PaletteListResponse, __path_handle_palettes};
pub use worker::{handle_worker, __path_handle_worker};
