//! Estimate command - export size pre-flight without network traffic.

use clap::Args;

use tilestitch::coord::grid_dimensions;
use tilestitch::export::ExportEstimate;

use super::common::{print_estimate, resolve_options, resolve_zoom, BoundsArgs, StitchArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the estimate command.
#[derive(Debug, Args)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub bounds: BoundsArgs,

    #[command(flatten)]
    pub stitch: StitchArgs,
}

/// Run the estimate command.
pub fn run(args: EstimateArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("estimate");
    let config = runner.config();

    let bbox = args.bounds.bounding_box()?;
    let zoom = resolve_zoom(&args.stitch, config);
    let options = resolve_options(&args.stitch, None, config);

    let (width_tiles, height_tiles) = grid_dimensions(&bbox, zoom).map_err(CliError::Bounds)?;
    let tile_size = options.tile_size() as u64;
    let estimate = ExportEstimate {
        width_tiles,
        height_tiles,
        width_px: width_tiles as u64 * tile_size,
        height_px: height_tiles as u64 * tile_size,
    };

    print_estimate(&estimate, zoom, options.batch_size(), options.format());

    Ok(())
}
