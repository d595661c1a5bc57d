pub mod png;
pub mod source;

pub use self::png::{decode_png, encode_png, optimize_png};
pub use source::JobSource;
