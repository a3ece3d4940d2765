//! Error types for the fetch-stitch pipeline.
//!
//! Every error here is fatal to the current run: nothing is retried and no
//! partial image is produced. The first failing tile aborts the run with
//! its coordinates attached, so callers can report exactly which request
//! brought the export down.

use super::surface::SurfaceError;
use crate::coord::TileIndex;
use crate::source::SourceError;
use thiserror::Error;

/// Errors that can occur during a stitch run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The output surface could not be created
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// A single tile failed, aborting the whole run
    #[error("tile ({x}, {y}) at zoom {zoom} failed: {cause}")]
    TileFailed {
        x: i64,
        y: i64,
        zoom: u8,
        cause: TileFailure,
    },

    /// Encoding the finished canvas failed
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

impl PipelineError {
    /// Wraps a per-tile failure with the tile's coordinates.
    pub(super) fn tile_failed(tile: TileIndex, zoom: u8, cause: TileFailure) -> Self {
        Self::TileFailed {
            x: tile.x,
            y: tile.y,
            zoom,
            cause,
        }
    }
}

/// Why a single tile brought the run down.
#[derive(Debug, Error)]
pub enum TileFailure {
    /// Retrieval failed (network error or non-success response)
    #[error("fetch failed: {0}")]
    Fetch(#[from] SourceError),

    /// The response body was not a decodable raster image
    #[error("decode failed: {0}")]
    Decode(String),
}
