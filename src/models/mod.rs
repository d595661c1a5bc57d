pub mod config;
pub mod message;
pub mod palette_file;

pub use config::{AppConfig, ConfigError, ExportConfig, JobDefaults, Limits};
pub use message::{
    ExportFile, JobFailure, JobId, JobRef, JobResult, MapperChoice, ProcessRequest, ResultMeta,
    SourceImage, WorkerEvent, WorkerMessage,
};
pub use palette_file::{flatten, load_palette_file, parse_palette_json, PaletteFileError, Swatch};
