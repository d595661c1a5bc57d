//! Worker message protocol.
//!
//! Requests and notifications exchanged with the background worker, as
//! they appear on the wire: JSON objects discriminated by a `"type"` field,
//! camelCase fields, pixel and file buffers as base64 strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use tile_quant::{MapperKind, TileMeta};
use utoipa::ToSchema;

/// Opaque job identifier chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Color mapping strategy as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MapperChoice {
    Classic,
    Perceptual,
}

impl From<MapperChoice> for MapperKind {
    fn from(choice: MapperChoice) -> Self {
        match choice {
            MapperChoice::Classic => MapperKind::Classic,
            MapperChoice::Perceptual => MapperKind::Perceptual,
        }
    }
}

impl From<MapperKind> for MapperChoice {
    fn from(kind: MapperKind) -> Self {
        match kind {
            MapperKind::Classic => MapperChoice::Classic,
            MapperKind::Perceptual => MapperChoice::Perceptual,
        }
    }
}

/// A request to the worker.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerMessage {
    /// Pixelate (and optionally colorize) a source image
    Process(ProcessRequest),
    /// Suppress the result of the given job if it is still the active one
    Cancel(JobRef),
    /// Produce a PNG of the last emitted job
    GenerateExport(JobRef),
}

impl WorkerMessage {
    pub fn job_id(&self) -> JobId {
        match self {
            WorkerMessage::Process(req) => req.job_id,
            WorkerMessage::Cancel(r) | WorkerMessage::GenerateExport(r) => r.job_id,
        }
    }
}

/// Body of a `process` message.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub job_id: JobId,
    /// Tile edge length in source pixels (1..=32)
    pub block_size: u32,
    /// New source image; omitted to reuse the session's last source
    #[serde(default)]
    pub source_image: Option<SourceImage>,
    /// Omitted to reuse the session setting
    #[serde(default)]
    pub colorize_enabled: Option<bool>,
    /// Flat RGBA palette; omitted to reuse the session palette, empty to
    /// disable colorization
    #[serde(default)]
    pub palette: Option<Vec<u8>>,
    #[serde(default)]
    pub mapper: Option<MapperChoice>,
}

/// Source image payload: raw RGBA samples or an encoded PNG.
#[derive(Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SourceImage {
    Raw {
        width: u32,
        height: u32,
        /// Base64 RGBA8 samples, row-major
        #[serde(with = "base64_bytes")]
        #[schema(value_type = String, format = Byte)]
        data: Vec<u8>,
    },
    Png {
        /// Base64 PNG file
        #[serde(with = "base64_bytes")]
        #[schema(value_type = String, format = Byte)]
        png: Vec<u8>,
    },
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceImage::Raw {
                width,
                height,
                data,
            } => write!(f, "Raw({width}x{height}, {} bytes)", data.len()),
            SourceImage::Png { png } => write!(f, "Png({} bytes)", png.len()),
        }
    }
}

/// Body of `cancel` and `generateExport` messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobRef {
    pub job_id: JobId,
}

/// A notification from the worker. At most one is delivered per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerEvent {
    Result(JobResult),
    ExportFile(ExportFile),
    Error(JobFailure),
}

impl WorkerEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            WorkerEvent::Result(r) => r.job_id,
            WorkerEvent::ExportFile(e) => e.job_id,
            WorkerEvent::Error(e) => e.job_id,
        }
    }
}

/// A finished pixelation job.
#[derive(Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub job_id: JobId,
    pub meta: ResultMeta,
    /// Base64 RGBA8 samples of the `outWidth x outHeight` tile grid
    #[serde(with = "base64_bytes")]
    #[schema(value_type = String, format = Byte)]
    pub pixels: Vec<u8>,
}

impl fmt::Debug for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobResult")
            .field("job_id", &self.job_id)
            .field("meta", &self.meta)
            .field("pixels", &format_args!("{} bytes", self.pixels.len()))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultMeta {
    pub out_width: u32,
    pub out_height: u32,
    pub tiles_x: u32,
    pub tiles_y: u32,
    pub total_pixels: u64,
    pub block_size: u32,
}

impl From<TileMeta> for ResultMeta {
    fn from(meta: TileMeta) -> Self {
        Self {
            out_width: meta.out_width,
            out_height: meta.out_height,
            tiles_x: meta.tiles_x,
            tiles_y: meta.tiles_y,
            total_pixels: meta.total_pixels,
            block_size: meta.block_size,
        }
    }
}

/// An exported PNG file.
#[derive(Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub job_id: JobId,
    #[serde(with = "base64_bytes")]
    #[schema(value_type = String, format = Byte)]
    pub file_bytes: Vec<u8>,
}

impl fmt::Debug for ExportFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportFile")
            .field("job_id", &self.job_id)
            .field("file_bytes", &format_args!("{} bytes", self.file_bytes.len()))
            .finish()
    }
}

/// A job that could not produce a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobFailure {
    pub job_id: JobId,
    pub message: String,
}

/// Serde adapter for byte buffers carried as standard base64 strings.
pub mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
