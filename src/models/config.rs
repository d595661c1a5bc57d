use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::message::MapperChoice;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to (overridden by `BIND_ADDR`)
    pub bind_addr: String,

    /// Palette JSON file served by `/api/palettes` and used by `render`
    pub palette_file: Option<PathBuf>,

    /// Session defaults for requests that omit a setting
    pub defaults: JobDefaults,

    pub limits: Limits,

    pub export: ExportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            palette_file: None,
            defaults: JobDefaults::default(),
            limits: Limits::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Defaults applied before the first job sets them explicitly
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct JobDefaults {
    /// Block size used by `render` when none is given
    pub block_size: u32,

    pub mapper: MapperChoice,

    pub colorize: bool,
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            block_size: 8,
            mapper: MapperChoice::Perceptual,
            colorize: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Limits {
    /// Decoded sources larger than this on either side are downscaled on load
    pub max_source_dimension: u32,

    /// Maximum request body size for `/api/worker`
    pub max_body_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_source_dimension: 4096,
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Re-compress exported PNGs with oxipng
    pub optimize: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { optimize: true }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl AppConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration, falling back to defaults on any failure
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file set, using defaults");
            return Self::default();
        };
        match Self::from_file(path) {
            Ok(config) => {
                tracing::info!(
                    path = %path.display(),
                    palette_file = ?config.palette_file,
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Apply environment overrides (`BIND_ADDR`)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            self.bind_addr = addr;
        }
        self
    }
}
