//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use tilestitch::config::ConfigFileError;
use tilestitch::coord::CoordError;
use tilestitch::export::ExportError;
use tilestitch::pipeline::PipelineError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Unknown configuration key
    UnknownKey(String),
    /// Invalid bounding box or zoom
    Bounds(CoordError),
    /// Export failed
    Export(ExportError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
    /// Confirmation prompt failed (e.g., no interactive terminal)
    Prompt(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Export(ExportError::Pipeline(PipelineError::TileFailed { .. })) => {
                eprintln!();
                eprintln!("A tile request failed. Check that:");
                eprintln!("  1. The URL template points at a reachable tile server");
                eprintln!("  2. The template's {{x}}/{{y}}/{{z}} placeholders are intact");
                eprintln!("  3. The server offers tiles at the requested zoom level");
            }
            CliError::UnknownKey(_) => {
                eprintln!();
                eprintln!("Use 'tilestitch config list' to see available keys.");
            }
            CliError::Prompt(_) => {
                eprintln!();
                eprintln!("Pass --yes to skip the confirmation prompt in scripts.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::UnknownKey(key) => write!(f, "Unknown configuration key '{}'", key),
            CliError::Bounds(e) => write!(f, "Invalid selection: {}", e),
            CliError::Export(e) => write!(f, "Export failed: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
            CliError::Prompt(msg) => write!(f, "Confirmation prompt failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Bounds(e) => Some(e),
            CliError::Export(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        CliError::Export(e)
    }
}
