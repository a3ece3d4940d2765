//! Export command - stitch a bounding box into an image file.

use clap::Args;
use std::io::Write;
use std::sync::Mutex;

use tilestitch::export::Exporter;

use super::common::{
    confirm_large_export, print_estimate, resolve_options, resolve_template, resolve_zoom,
    BoundsArgs, StitchArgs,
};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the export command.
#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub bounds: BoundsArgs,

    #[command(flatten)]
    pub stitch: StitchArgs,

    /// Output file path (format auto-detected from extension: .png/.jpg)
    #[arg(long)]
    pub output: String,

    /// Skip the large-export confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

/// Run the export command.
pub async fn run(args: ExportArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("export");
    let config = runner.config();

    let bbox = args.bounds.bounding_box()?;
    let zoom = resolve_zoom(&args.stitch, config);
    let template = resolve_template(&args.stitch, config);
    let options = resolve_options(&args.stitch, Some(&args.output), config);
    let batch_size = options.batch_size();
    let format = options.format();

    let exporter = Exporter::new(template, options)?;

    let estimate = exporter.estimate(&bbox, zoom).map_err(CliError::Bounds)?;
    print_estimate(&estimate, zoom, batch_size, format);

    if !confirm_large_export(&estimate, args.yes)? {
        println!("Aborted.");
        return Ok(());
    }

    println!();
    println!("Requesting and rendering tiles...");
    let start = std::time::Instant::now();

    // Rewrites one status line per completed tile.
    let progress = Mutex::new(std::io::stdout());
    let sink = |completed: u32, total: u32| {
        let mut stdout = progress.lock().unwrap();
        let _ = write!(stdout, "\r  {}/{} tiles", completed, total);
        let _ = stdout.flush();
    };

    let image = exporter.export(&bbox, zoom, &sink).await?;
    println!();

    let elapsed = start.elapsed();
    println!("Stitched {} tiles in {:.2}s", estimate.tile_count(), elapsed.as_secs_f64());
    println!();

    runner.save_image(&args.output, &image)
}
