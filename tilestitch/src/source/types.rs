//! Source types and traits

use crate::coord::TileIndex;
use std::fmt;
use std::future::Future;

/// Errors that can occur while retrieving a tile from its source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Request failed before producing a response (connect, timeout, body)
    HttpError(String),
    /// Server answered with a non-success status
    HttpStatus { status: u16, url: String },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            SourceError::HttpStatus { status, url } => {
                write!(f, "HTTP {} from {}", status, url)
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// Trait for tile image sources.
///
/// Implementors return the raw encoded image bytes for one tile of the
/// pyramid. Retrieval is non-blocking; many fetches for one stitch run are
/// multiplexed on a single logical task.
pub trait TileSource: Send + Sync {
    /// Retrieves the encoded image data for one tile.
    ///
    /// # Arguments
    ///
    /// * `tile` - Tile index within the pyramid
    /// * `zoom` - Zoom level of the pyramid slice
    ///
    /// # Returns
    ///
    /// Raw image data (typically PNG or JPEG) or an error.
    fn fetch_tile(
        &self,
        tile: TileIndex,
        zoom: u8,
    ) -> impl Future<Output = Result<Vec<u8>, SourceError>> + Send;

    /// Returns the source's name for logging and identification.
    fn name(&self) -> &str;
}
