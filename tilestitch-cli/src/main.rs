//! Tilestitch CLI - command-line interface
//!
//! This binary provides a command-line interface to the tilestitch library:
//! exporting stitched map images, estimating export sizes, and managing
//! persisted configuration.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::estimate::EstimateArgs;
use commands::export::ExportArgs;

#[derive(Parser)]
#[command(name = "tilestitch")]
#[command(about = "Export stitched map images from slippy-map tile servers", long_about = None)]
#[command(version = tilestitch::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a stitched image for a geographic bounding box
    Export(ExportArgs),

    /// Estimate an export's size without issuing any request
    Estimate(EstimateArgs),

    /// Manage configuration (get, set, list, path)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export(args) => commands::export::run(args).await,
        Commands::Estimate(args) => commands::estimate::run(args),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
