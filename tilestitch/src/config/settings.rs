//! Configuration settings structs.

use super::defaults::{
    DEFAULT_BATCH_SIZE, DEFAULT_LOG_FILE, DEFAULT_TILE_SIZE, DEFAULT_URL_TEMPLATE, DEFAULT_ZOOM,
};
use crate::pipeline::OutputFormat;
use std::path::PathBuf;

/// The whole configuration file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub source: SourceSettings,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

/// `[source]` section: where tiles come from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// URL template with `{x}`, `{y}`, `{z}` placeholders
    pub url_template: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }
}

/// `[export]` section: stitch parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Default zoom level for exports
    pub zoom: u8,
    /// Source tile edge length in pixels
    pub tile_size: u32,
    /// Concurrent requests per batch
    pub batch_size: usize,
    /// Output image encoding
    pub format: OutputFormat,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            tile_size: DEFAULT_TILE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            format: OutputFormat::Png,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}
