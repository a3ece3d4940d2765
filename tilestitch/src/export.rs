//! High-level export facade.
//!
//! Wires the coordinate mapper, the templated tile source and the stitch
//! pipeline together behind two entry points: a cheap size estimate for
//! pre-flight confirmation policies, and the export itself.

use crate::coord::{bounding_box_to_grid, grid_dimensions, BoundingBox, CoordError};
use crate::pipeline::{
    OutputFormat, PipelineError, ProgressSink, StitchOptions, StitchPipeline,
};
use crate::source::{
    AsyncHttpClient, ReqwestClient, SourceError, TemplateTileSource, TileUrlTemplate,
};
use std::fmt;
use tracing::info;

/// Pre-flight size estimate for an export.
///
/// Whether a grid of this size is acceptable is the caller's policy; the
/// exporter itself never refuses a large grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportEstimate {
    /// Grid width in tiles
    pub width_tiles: u32,
    /// Grid height in tiles
    pub height_tiles: u32,
    /// Output image width in pixels
    pub width_px: u64,
    /// Output image height in pixels
    pub height_px: u64,
}

impl ExportEstimate {
    /// Total number of tile requests the export would issue.
    pub fn tile_count(&self) -> u64 {
        self.width_tiles as u64 * self.height_tiles as u64
    }

    /// Number of request batches for a given batch size.
    pub fn batch_count(&self, batch_size: usize) -> u64 {
        self.tile_count().div_ceil(batch_size.max(1) as u64)
    }
}

/// A finished export.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    /// Encoded image bytes
    pub data: Vec<u8>,
    /// Encoding of `data`
    pub format: OutputFormat,
    /// Image width in pixels
    pub width_px: u32,
    /// Image height in pixels
    pub height_px: u32,
}

/// Errors that can occur during an export.
#[derive(Debug)]
pub enum ExportError {
    /// The bounding box or zoom could not be mapped to a tile grid
    Coord(CoordError),
    /// The HTTP client could not be created
    HttpClient(SourceError),
    /// The fetch-stitch run failed
    Pipeline(PipelineError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Coord(e) => write!(f, "Coordinate error: {}", e),
            ExportError::HttpClient(e) => write!(f, "HTTP client error: {}", e),
            ExportError::Pipeline(e) => write!(f, "Stitch failed: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Coord(e) => Some(e),
            ExportError::HttpClient(e) => Some(e),
            ExportError::Pipeline(e) => Some(e),
        }
    }
}

impl From<CoordError> for ExportError {
    fn from(e: CoordError) -> Self {
        Self::Coord(e)
    }
}

impl From<PipelineError> for ExportError {
    fn from(e: PipelineError) -> Self {
        Self::Pipeline(e)
    }
}

/// Exports stitched map images from a templated tile server.
pub struct Exporter<C: AsyncHttpClient> {
    pipeline: StitchPipeline<TemplateTileSource<C>>,
}

impl Exporter<ReqwestClient> {
    /// Creates an exporter backed by a real HTTP client.
    pub fn new(template: TileUrlTemplate, options: StitchOptions) -> Result<Self, ExportError> {
        let client = ReqwestClient::new().map_err(ExportError::HttpClient)?;
        Ok(Self::with_client(client, template, options))
    }
}

impl<C: AsyncHttpClient> Exporter<C> {
    /// Creates an exporter over an injected HTTP client.
    pub fn with_client(client: C, template: TileUrlTemplate, options: StitchOptions) -> Self {
        let source = TemplateTileSource::new(client, template);
        Self {
            pipeline: StitchPipeline::new(source, options),
        }
    }

    pub fn options(&self) -> &StitchOptions {
        self.pipeline.options()
    }

    /// The URL template requests are built from.
    pub fn template(&self) -> &TileUrlTemplate {
        self.pipeline.source().template()
    }

    /// Estimates the grid and output size for a bounding box, without
    /// issuing any request.
    pub fn estimate(&self, bbox: &BoundingBox, zoom: u8) -> Result<ExportEstimate, CoordError> {
        let (width_tiles, height_tiles) = grid_dimensions(bbox, zoom)?;
        let tile_size = self.pipeline.options().tile_size() as u64;

        Ok(ExportEstimate {
            width_tiles,
            height_tiles,
            width_px: width_tiles as u64 * tile_size,
            height_px: height_tiles as u64 * tile_size,
        })
    }

    /// Exports one stitched image for a bounding box at a zoom level.
    ///
    /// Computes the covering grid, runs the fetch-stitch pipeline with the
    /// given progress sink, and returns the encoded image. Fails without
    /// partial output if any tile cannot be retrieved or decoded.
    pub async fn export(
        &self,
        bbox: &BoundingBox,
        zoom: u8,
        progress: &dyn ProgressSink,
    ) -> Result<ExportedImage, ExportError> {
        let grid = bounding_box_to_grid(bbox, zoom)?;
        let options = self.pipeline.options();

        info!(
            tiles = grid.len(),
            width = grid.width(),
            height = grid.height(),
            zoom = zoom,
            template = %self.template(),
            "export starting"
        );

        let data = self.pipeline.run(&grid, zoom, progress).await?;

        let (width_px, height_px) = grid.pixel_size(options.tile_size());
        info!(bytes = data.len(), "export finished");

        Ok(ExportedImage {
            data,
            format: options.format(),
            // Pixel sizes fit u32: the surface was allocated with checked
            // 32-bit dimensions.
            width_px: width_px as u32,
            height_px: height_px as u32,
        })
    }
}
