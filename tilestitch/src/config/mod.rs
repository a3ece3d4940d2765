//! Configuration handling for ~/.tilestitch/config.ini.
//!
//! Persists the settings the interactive layer would otherwise keep in UI
//! state: the tile URL template, default export zoom, and stitch tuning.

mod defaults;
mod file;
mod keys;
mod settings;

pub use defaults::{
    DEFAULT_BATCH_SIZE, DEFAULT_LOG_FILE, DEFAULT_TILE_SIZE, DEFAULT_URL_TEMPLATE, DEFAULT_ZOOM,
    MAX_EXPORT_ZOOM, MIN_EXPORT_ZOOM,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::ConfigKey;
pub use settings::{ConfigFile, ExportSettings, LoggingSettings, SourceSettings};
