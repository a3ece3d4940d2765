//! Tilestitch - stitched raster exports from slippy-map tile servers
//!
//! This library converts a geographic bounding box and zoom level into the
//! rectangular grid of Web Mercator tiles covering it, retrieves each tile
//! over HTTP under bounded concurrency, composites the tiles into one
//! image, and returns the encoded result.
//!
//! # High-Level API
//!
//! For most use cases, the [`export`] module provides a facade:
//!
//! ```ignore
//! use tilestitch::coord::BoundingBox;
//! use tilestitch::export::Exporter;
//! use tilestitch::pipeline::{NoProgress, StitchOptions};
//!
//! let exporter = Exporter::new(
//!     "https://tile.example.org/{z}/{x}/{y}.png".into(),
//!     StitchOptions::new(),
//! )?;
//!
//! let bbox = BoundingBox::from_corners(36.10, 140.12, 36.06, 140.10)?;
//! let image = exporter.export(&bbox, 15, &NoProgress).await?;
//! ```

pub mod config;
pub mod coord;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod source;

/// Version of the tilestitch library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_coord_module_exists() {
        use crate::coord::lat_lng_to_tile;
        let result = lat_lng_to_tile(40.7128, -74.0060, 16);
        assert!(result.is_ok());
    }
}
