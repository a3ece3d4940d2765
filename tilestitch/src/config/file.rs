//! Configuration file loading and saving.
//!
//! The file lives at `~/.tilestitch/config.ini`. A missing file yields
//! defaults; saving creates the directory as needed.

use super::settings::{ConfigFile, ExportSettings, LoggingSettings, SourceSettings};
use crate::pipeline::OutputFormat;
use ini::Ini;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFileError {
    pub(super) fn invalid(section: &str, key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl ConfigFile {
    /// Load configuration from the default path (~/.tilestitch/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.tilestitch/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
        }
        Ok(path)
    }
}

/// Get the path to the config directory (~/.tilestitch).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tilestitch")
}

/// Get the path to the config file (~/.tilestitch/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut source = SourceSettings::default();
    let mut export = ExportSettings::default();
    let mut logging = LoggingSettings::default();

    if let Some(section) = ini.section(Some("source")) {
        if let Some(value) = section.get("url_template") {
            source.url_template = value.to_string();
        }
    }

    if let Some(section) = ini.section(Some("export")) {
        if let Some(value) = section.get("zoom") {
            export.zoom = parse_number("export", "zoom", value)?;
        }
        if let Some(value) = section.get("tile_size") {
            export.tile_size = parse_number("export", "tile_size", value)?;
            if export.tile_size == 0 {
                return Err(ConfigFileError::invalid(
                    "export",
                    "tile_size",
                    value,
                    "must be at least 1",
                ));
            }
        }
        if let Some(value) = section.get("batch_size") {
            export.batch_size = parse_number("export", "batch_size", value)?;
            if export.batch_size == 0 {
                return Err(ConfigFileError::invalid(
                    "export",
                    "batch_size",
                    value,
                    "must be at least 1",
                ));
            }
        }
        if let Some(value) = section.get("format") {
            export.format = OutputFormat::from_name(value).ok_or_else(|| {
                ConfigFileError::invalid("export", "format", value, "expected 'png' or 'jpeg'")
            })?;
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(value) = section.get("file") {
            logging.file = PathBuf::from(value);
        }
    }

    Ok(ConfigFile {
        source,
        export,
        logging,
    })
}

fn parse_number<T>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError>
where
    T: FromStr,
{
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::invalid(section, key, value, "not a valid number"))
}

fn to_config_string(config: &ConfigFile) -> String {
    format!(
        "# tilestitch configuration\n\
         \n\
         [source]\n\
         # Tile URL template with {{x}}, {{y}}, {{z}} placeholders\n\
         url_template = {}\n\
         \n\
         [export]\n\
         # Default zoom level (1-18)\n\
         zoom = {}\n\
         # Source tile edge length in pixels\n\
         tile_size = {}\n\
         # Concurrent tile requests per batch\n\
         batch_size = {}\n\
         # Output image format: png or jpeg\n\
         format = {}\n\
         \n\
         [logging]\n\
         file = {}\n",
        config.source.url_template,
        config.export.zoom,
        config.export.tile_size,
        config.export.batch_size,
        config.export.format.name(),
        config.logging.file.display(),
    )
}
