//! Default configuration values.

/// Default tile source: GSI Japan seamless orthophoto tiles.
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://cyberjapandata.gsi.go.jp/xyz/seamlessphoto/{z}/{x}/{y}.jpg";

/// Default export zoom level.
pub const DEFAULT_ZOOM: u8 = 15;

/// Zoom range the CLI accepts for exports.
pub const MIN_EXPORT_ZOOM: u8 = 1;
pub const MAX_EXPORT_ZOOM: u8 = 18;

/// Default source tile edge length in pixels (slippy-map convention).
pub const DEFAULT_TILE_SIZE: u32 = crate::pipeline::DEFAULT_TILE_SIZE;

/// Default concurrent requests per batch.
pub const DEFAULT_BATCH_SIZE: usize = crate::pipeline::DEFAULT_BATCH_SIZE;

/// Default log file path, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "logs/tilestitch.log";
