//! Shared argument types and resolution helpers for CLI commands.
//!
//! Command-line flags win over persisted configuration; whatever is left
//! unset falls back to the config file's values.

use clap::{Args, ValueEnum};
use dialoguer::Confirm;
use std::path::Path;

use tilestitch::config::{ConfigFile, MAX_EXPORT_ZOOM, MIN_EXPORT_ZOOM};
use tilestitch::coord::BoundingBox;
use tilestitch::export::ExportEstimate;
use tilestitch::pipeline::{OutputFormat, StitchOptions};
use tilestitch::source::TileUrlTemplate;

use crate::error::CliError;

/// Exports above this many tiles require confirmation (or --yes).
pub const LARGE_EXPORT_TILE_THRESHOLD: u64 = 100;

/// Bounding box corner arguments shared by export and estimate.
#[derive(Debug, Args)]
pub struct BoundsArgs {
    /// Northeast corner latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub ne_lat: f64,

    /// Northeast corner longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub ne_lon: f64,

    /// Southwest corner latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub sw_lat: f64,

    /// Southwest corner longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub sw_lon: f64,
}

impl BoundsArgs {
    /// Validates the corners into a bounding box.
    pub fn bounding_box(&self) -> Result<BoundingBox, CliError> {
        BoundingBox::from_corners(self.ne_lat, self.ne_lon, self.sw_lat, self.sw_lon)
            .map_err(CliError::Bounds)
    }
}

/// Stitch tuning arguments shared by export and estimate.
#[derive(Debug, Args)]
pub struct StitchArgs {
    /// Zoom level (1-18); defaults to the configured zoom
    #[arg(long, value_parser = clap::value_parser!(u8).range(MIN_EXPORT_ZOOM as i64..=MAX_EXPORT_ZOOM as i64))]
    pub zoom: Option<u8>,

    /// Tile URL template with {x}, {y}, {z} placeholders
    #[arg(long)]
    pub template: Option<String>,

    /// Concurrent tile requests per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Output image format (defaults to the output file extension,
    /// then the configured format)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

/// Output format flag.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// PNG (lossless)
    Png,
    /// JPEG (quality 90)
    Jpeg,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Jpeg => OutputFormat::Jpeg,
        }
    }
}

/// Resolve the export zoom from flag or config.
pub fn resolve_zoom(args: &StitchArgs, config: &ConfigFile) -> u8 {
    args.zoom.unwrap_or(config.export.zoom)
}

/// Resolve the tile URL template from flag or config.
pub fn resolve_template(args: &StitchArgs, config: &ConfigFile) -> TileUrlTemplate {
    TileUrlTemplate::new(
        args.template
            .clone()
            .unwrap_or_else(|| config.source.url_template.clone()),
    )
}

/// Resolve stitch options from flags, an optional output path, and config.
///
/// Format precedence: explicit flag, then output file extension, then the
/// configured format.
pub fn resolve_options(
    args: &StitchArgs,
    output: Option<&str>,
    config: &ConfigFile,
) -> StitchOptions {
    let format = args
        .format
        .map(OutputFormat::from)
        .or_else(|| output.and_then(|path| OutputFormat::from_path(Path::new(path))))
        .unwrap_or(config.export.format);

    StitchOptions::new()
        .with_tile_size(config.export.tile_size)
        .with_batch_size(args.batch_size.unwrap_or(config.export.batch_size))
        .with_format(format)
}

/// Print the pre-flight summary for an export or estimate.
pub fn print_estimate(estimate: &ExportEstimate, zoom: u8, batch_size: usize, format: OutputFormat) {
    println!("Export estimate:");
    println!("  Zoom:    {}", zoom);
    println!(
        "  Grid:    {} x {} tiles ({} tiles)",
        estimate.width_tiles,
        estimate.height_tiles,
        estimate.tile_count()
    );
    println!(
        "  Output:  {} x {} px ({})",
        estimate.width_px,
        estimate.height_px,
        format.name()
    );
    println!(
        "  Batches: {} of up to {} requests",
        estimate.batch_count(batch_size),
        batch_size
    );
}

/// Ask for confirmation before a large export.
///
/// Small exports and `--yes` skip the prompt. Returns false when the user
/// declines.
pub fn confirm_large_export(estimate: &ExportEstimate, assume_yes: bool) -> Result<bool, CliError> {
    if assume_yes || estimate.tile_count() <= LARGE_EXPORT_TILE_THRESHOLD {
        return Ok(true);
    }

    println!();
    println!(
        "This will make {} requests to the tile server and produce a {} px wide image.",
        estimate.tile_count(),
        estimate.width_px
    );
    println!("Requests are batched, but please check you are not causing the server trouble.");

    Confirm::new()
        .with_prompt("Continue with these requests?")
        .default(false)
        .interact()
        .map_err(|e| CliError::Prompt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stitch_args() -> StitchArgs {
        StitchArgs {
            zoom: None,
            template: None,
            batch_size: None,
            format: None,
        }
    }

    #[test]
    fn test_flags_win_over_config() {
        let mut config = ConfigFile::default();
        config.export.zoom = 12;
        config.export.batch_size = 9;

        let mut args = stitch_args();
        args.zoom = Some(14);
        args.batch_size = Some(3);
        args.template = Some("https://other.example/{z}/{x}/{y}.png".to_string());

        assert_eq!(resolve_zoom(&args, &config), 14);
        assert_eq!(
            resolve_template(&args, &config).as_str(),
            "https://other.example/{z}/{x}/{y}.png"
        );
        assert_eq!(resolve_options(&args, None, &config).batch_size(), 3);
    }

    #[test]
    fn test_config_fills_unset_flags() {
        let mut config = ConfigFile::default();
        config.export.zoom = 12;
        config.export.batch_size = 9;

        let args = stitch_args();

        assert_eq!(resolve_zoom(&args, &config), 12);
        assert_eq!(
            resolve_template(&args, &config).as_str(),
            config.source.url_template
        );
        assert_eq!(resolve_options(&args, None, &config).batch_size(), 9);
    }

    #[test]
    fn test_format_precedence() {
        let mut config = ConfigFile::default();
        config.export.format = OutputFormat::Png;

        // Explicit flag beats the output extension.
        let mut args = stitch_args();
        args.format = Some(FormatArg::Jpeg);
        assert_eq!(
            resolve_options(&args, Some("map.png"), &config).format(),
            OutputFormat::Jpeg
        );

        // Output extension beats the configured format.
        let args = stitch_args();
        assert_eq!(
            resolve_options(&args, Some("map.jpg"), &config).format(),
            OutputFormat::Jpeg
        );

        // Unrecognized extension falls back to config.
        assert_eq!(
            resolve_options(&args, Some("map.out"), &config).format(),
            OutputFormat::Png
        );
    }

    #[test]
    fn test_invalid_bounds_are_reported() {
        let bounds = BoundsArgs {
            ne_lat: 0.0,
            ne_lon: 0.0,
            sw_lat: 10.0,
            sw_lon: 0.0,
        };
        assert!(matches!(bounds.bounding_box(), Err(CliError::Bounds(_))));
    }

    #[test]
    fn test_small_exports_skip_confirmation() {
        let estimate = ExportEstimate {
            width_tiles: 10,
            height_tiles: 10,
            width_px: 2560,
            height_px: 2560,
        };
        // Exactly at the threshold: no prompt needed.
        assert!(confirm_large_export(&estimate, false).unwrap());
    }

    #[test]
    fn test_yes_flag_skips_confirmation() {
        let estimate = ExportEstimate {
            width_tiles: 20,
            height_tiles: 20,
            width_px: 5120,
            height_px: 5120,
        };
        assert!(confirm_large_export(&estimate, true).unwrap());
    }
}
