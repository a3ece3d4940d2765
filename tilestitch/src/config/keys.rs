//! Typed configuration keys for `config get`/`config set`.
//!
//! Keys are addressed as `section.key`, matching the INI layout.

use super::defaults::{MAX_EXPORT_ZOOM, MIN_EXPORT_ZOOM};
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::pipeline::OutputFormat;
use std::path::PathBuf;
use std::str::FromStr;

/// All addressable configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    SourceUrlTemplate,
    ExportZoom,
    ExportTileSize,
    ExportBatchSize,
    ExportFormat,
    LoggingFile,
}

impl ConfigKey {
    /// Every key, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::SourceUrlTemplate,
            ConfigKey::ExportZoom,
            ConfigKey::ExportTileSize,
            ConfigKey::ExportBatchSize,
            ConfigKey::ExportFormat,
            ConfigKey::LoggingFile,
        ]
    }

    /// Full `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::SourceUrlTemplate => "source.url_template",
            ConfigKey::ExportZoom => "export.zoom",
            ConfigKey::ExportTileSize => "export.tile_size",
            ConfigKey::ExportBatchSize => "export.batch_size",
            ConfigKey::ExportFormat => "export.format",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Section part of the name.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::SourceUrlTemplate => "source",
            ConfigKey::ExportZoom
            | ConfigKey::ExportTileSize
            | ConfigKey::ExportBatchSize
            | ConfigKey::ExportFormat => "export",
            ConfigKey::LoggingFile => "logging",
        }
    }

    /// Current value as a display string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::SourceUrlTemplate => config.source.url_template.clone(),
            ConfigKey::ExportZoom => config.export.zoom.to_string(),
            ConfigKey::ExportTileSize => config.export.tile_size.to_string(),
            ConfigKey::ExportBatchSize => config.export.batch_size.to_string(),
            ConfigKey::ExportFormat => config.export.format.name().to_string(),
            ConfigKey::LoggingFile => config.logging.file.display().to_string(),
        }
    }

    /// Parses and applies a new value.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigFileError> {
        match self {
            ConfigKey::SourceUrlTemplate => {
                config.source.url_template = value.to_string();
            }
            ConfigKey::ExportZoom => {
                let zoom: u8 = value.trim().parse().map_err(|_| {
                    ConfigFileError::invalid("export", "zoom", value, "not a valid number")
                })?;
                if !(MIN_EXPORT_ZOOM..=MAX_EXPORT_ZOOM).contains(&zoom) {
                    return Err(ConfigFileError::invalid(
                        "export",
                        "zoom",
                        value,
                        format!("must be between {} and {}", MIN_EXPORT_ZOOM, MAX_EXPORT_ZOOM),
                    ));
                }
                config.export.zoom = zoom;
            }
            ConfigKey::ExportTileSize => {
                let tile_size: u32 = value.trim().parse().map_err(|_| {
                    ConfigFileError::invalid("export", "tile_size", value, "not a valid number")
                })?;
                if tile_size == 0 {
                    return Err(ConfigFileError::invalid(
                        "export",
                        "tile_size",
                        value,
                        "must be at least 1",
                    ));
                }
                config.export.tile_size = tile_size;
            }
            ConfigKey::ExportBatchSize => {
                let batch_size: usize = value.trim().parse().map_err(|_| {
                    ConfigFileError::invalid("export", "batch_size", value, "not a valid number")
                })?;
                if batch_size == 0 {
                    return Err(ConfigFileError::invalid(
                        "export",
                        "batch_size",
                        value,
                        "must be at least 1",
                    ));
                }
                config.export.batch_size = batch_size;
            }
            ConfigKey::ExportFormat => {
                config.export.format = OutputFormat::from_name(value).ok_or_else(|| {
                    ConfigFileError::invalid("export", "format", value, "expected 'png' or 'jpeg'")
                })?;
            }
            ConfigKey::LoggingFile => {
                config.logging.file = PathBuf::from(value);
            }
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or(())
    }
}
