//! Palette files: named swatches in a JSON object.
//!
//! ```json
//! {
//!   "black": { "color": "#000", "is_premium": false },
//!   "glass": { "color": "transparent", "is_premium": true }
//! }
//! ```
//!
//! Key order is preserved. Entries whose color does not parse are dropped.

use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tile_quant::Rgba8;
use utoipa::ToSchema;

/// A named palette color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Swatch {
    pub key: String,
    /// `#rrggbb`, or `transparent`
    #[serde(serialize_with = "serialize_color")]
    #[schema(value_type = String, example = "#ff004d")]
    pub color: Rgba8,
    /// Tier flag for presentation; has no effect on mapping
    pub is_premium: bool,
}

fn serialize_color<S: Serializer>(color: &Rgba8, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(color)
}

#[derive(Debug, Deserialize)]
struct RawSwatch {
    color: String,
    #[serde(default)]
    is_premium: bool,
}

#[derive(Debug, Error)]
pub enum PaletteFileError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid palette file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse palette JSON into swatches, in file order.
///
/// Fails only if the document is not a JSON object. Individual entries that
/// are malformed or carry an unparseable color are skipped.
pub fn parse_palette_json(json: &str) -> Result<Vec<Swatch>, PaletteFileError> {
    let entries: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

    let mut swatches = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let raw: RawSwatch = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(%key, %e, "Skipping malformed palette entry");
                continue;
            }
        };
        match raw.color.parse::<Rgba8>() {
            Ok(color) => swatches.push(Swatch {
                key,
                color,
                is_premium: raw.is_premium,
            }),
            Err(e) => {
                tracing::debug!(%key, color = %raw.color, %e, "Skipping palette entry");
            }
        }
    }
    Ok(swatches)
}

/// Read and parse a palette file.
pub fn load_palette_file(path: &Path) -> Result<Vec<Swatch>, PaletteFileError> {
    let json = std::fs::read_to_string(path).map_err(|source| PaletteFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let swatches = parse_palette_json(&json)?;
    tracing::info!(path = %path.display(), count = swatches.len(), "Loaded palette");
    Ok(swatches)
}

/// Flatten swatches into RGBA quadruples, in order.
pub fn flatten(swatches: &[Swatch]) -> Vec<u8> {
    swatches.iter().flat_map(|s| s.color.to_array()).collect()
}
