//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization, configuration loading, and output
//! file writing to reduce duplication across command handlers.

use crate::error::CliError;
use std::io::IsTerminal;
use tilestitch::config::ConfigFile;
use tilestitch::export::ExportedImage;
use tilestitch::logging::{init_logging, LoggingGuard};
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// Log lines go to the configured file; they are mirrored to stderr
    /// only when stderr is not an interactive terminal, so progress output
    /// stays readable.
    pub fn new() -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "tilestitch.log".to_string());

        let stderr_enabled = !std::io::stderr().is_terminal();

        let logging_guard = init_logging(&log_dir, &log_file, stderr_enabled, false)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("tilestitch v{}", tilestitch::VERSION);
        info!("tilestitch CLI: {} command", command);
    }

    /// Save an exported image to a file.
    pub fn save_image(&self, path: &str, image: &ExportedImage) -> Result<(), CliError> {
        std::fs::write(path, &image.data).map_err(|e| CliError::FileWrite {
            path: path.to_string(),
            error: e,
        })?;

        let size_mb = image.data.len() as f64 / 1_048_576.0;
        info!(
            path = path,
            bytes = image.data.len(),
            "image saved successfully"
        );
        println!("Saved successfully: {} ({:.2} MB)", path, size_mb);
        println!("  Format: {}", image.format.name());
        println!("  Dimensions: {}x{} px", image.width_px, image.height_px);

        Ok(())
    }
}
