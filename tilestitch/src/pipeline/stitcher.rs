//! Stitch pipeline implementation.
//!
//! One `run` fetches every tile of a grid in sequential batches, draws
//! each tile into its cell as it completes, and encodes the finished
//! canvas. The surface and progress counter are created per run and never
//! shared between runs; callers wanting to serialize overlapping runs must
//! do so themselves.

use super::batch::for_each_batched;
use super::error::{PipelineError, TileFailure};
use super::progress::{ProgressSink, ProgressState};
use super::surface::{OutputFormat, RenderSurface, DEFAULT_TILE_SIZE};
use crate::coord::{TileGrid, TileIndex};
use crate::source::TileSource;
use image::DynamicImage;
use tracing::debug;

/// Default number of tile retrievals issued concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Options for a stitch pipeline.
///
/// # Example
///
/// ```
/// use tilestitch::pipeline::{OutputFormat, StitchOptions};
///
/// let options = StitchOptions::new()
///     .with_tile_size(512)
///     .with_batch_size(8)
///     .with_format(OutputFormat::Jpeg);
/// assert_eq!(options.tile_size(), 512);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StitchOptions {
    /// Pixel edge length of one source tile
    tile_size: u32,
    /// Concurrent retrievals per batch
    batch_size: usize,
    /// Encoding for the finished canvas
    format: OutputFormat,
}

impl StitchOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source tile edge length in pixels. Default: 256.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the number of retrievals issued concurrently per batch.
    /// Default: 5.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the output encoding. Default: PNG.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl Default for StitchOptions {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            format: OutputFormat::Png,
        }
    }
}

/// Concurrency-bounded tile fetch-and-stitch pipeline.
pub struct StitchPipeline<S> {
    source: S,
    options: StitchOptions,
}

impl<S: TileSource> StitchPipeline<S> {
    /// Creates a pipeline over a tile source.
    pub fn new(source: S, options: StitchOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &StitchOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs one stitch over `grid` at `zoom`.
    ///
    /// Retrievals are issued in batches of the configured size; each batch
    /// fully settles before the next is issued. As each tile's fetch and
    /// decode completes, it is drawn synchronously at the pixel offset of
    /// its grid cell and the progress sink is invoked with the updated
    /// completion count.
    ///
    /// The first tile failure aborts the run with the tile's coordinates;
    /// in-flight batch-mates are dropped and no image is produced.
    ///
    /// # Returns
    ///
    /// The encoded output image bytes.
    pub async fn run(
        &self,
        grid: &TileGrid,
        zoom: u8,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<u8>, PipelineError> {
        let mut surface =
            RenderSurface::allocate(grid.width(), grid.height(), self.options.tile_size)?;
        let mut state = ProgressState::new(grid.len() as u32);

        debug!(
            tiles = grid.len(),
            width = grid.width(),
            height = grid.height(),
            zoom = zoom,
            batch_size = self.options.batch_size,
            source = self.source.name(),
            "stitch run starting"
        );

        for_each_batched(
            grid.iter().enumerate(),
            self.options.batch_size,
            |(slot, tile)| self.fetch_and_decode(slot, tile, zoom),
            |(slot, tile_image)| {
                // Draw and count synchronously; completions of one batch
                // interleave on a single task, so the surface needs no lock.
                surface.draw_tile(slot, &tile_image);
                let (completed, total) = state.record_completion();
                progress.tile_completed(completed, total);
                Ok(())
            },
        )
        .await?;

        debug!(tiles = grid.len(), "stitch run complete, encoding");
        Ok(surface.encode(self.options.format)?)
    }

    async fn fetch_and_decode(
        &self,
        slot: usize,
        tile: TileIndex,
        zoom: u8,
    ) -> Result<(usize, DynamicImage), PipelineError> {
        let bytes = self
            .source
            .fetch_tile(tile, zoom)
            .await
            .map_err(|e| PipelineError::tile_failed(tile, zoom, TileFailure::Fetch(e)))?;

        let tile_image = image::load_from_memory(&bytes)
            .map_err(|e| PipelineError::tile_failed(tile, zoom, TileFailure::Decode(e.to_string())))?;

        Ok((slot, tile_image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{bounding_box_to_grid, BoundingBox};
    use crate::source::SourceError;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;
    use std::sync::Mutex;

    fn encoded_tile(size: u32, rgba: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(size, size, Rgba(rgba));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Png)
            .expect("Failed to encode PNG");
        buffer.into_inner()
    }

    /// Source that colors each tile by its coordinates, or fails a chosen
    /// tile.
    struct PatternSource {
        tile_size: u32,
        fail_at: Option<TileIndex>,
        requests: Mutex<Vec<TileIndex>>,
    }

    impl PatternSource {
        fn new(tile_size: u32) -> Self {
            Self {
                tile_size,
                fail_at: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing_at(tile_size: u32, fail_at: TileIndex) -> Self {
            Self {
                fail_at: Some(fail_at),
                ..Self::new(tile_size)
            }
        }
    }

    impl TileSource for PatternSource {
        async fn fetch_tile(&self, tile: TileIndex, _zoom: u8) -> Result<Vec<u8>, SourceError> {
            self.requests.lock().unwrap().push(tile);
            if self.fail_at == Some(tile) {
                return Err(SourceError::HttpError("simulated outage".to_string()));
            }
            Ok(encoded_tile(
                self.tile_size,
                [(tile.x % 256) as u8, (tile.y % 256) as u8, 0, 255],
            ))
        }

        fn name(&self) -> &str {
            "pattern"
        }
    }

    fn small_grid() -> TileGrid {
        // 3x4 grid at zoom 10 around the equator.
        let bbox = BoundingBox::from_corners(1.0, 1.0, 0.0, 0.0).unwrap();
        bounding_box_to_grid(&bbox, 10).unwrap()
    }

    #[tokio::test]
    async fn test_run_fetches_every_tile_once() {
        let source = PatternSource::new(8);
        let pipeline = StitchPipeline::new(source, StitchOptions::new().with_tile_size(8));
        let grid = small_grid();

        pipeline
            .run(&grid, 10, &crate::pipeline::NoProgress)
            .await
            .unwrap();

        let mut requested = pipeline.source().requests.lock().unwrap().clone();
        requested.sort_by_key(|t| (t.y, t.x));
        let mut expected: Vec<TileIndex> = grid.iter().collect();
        expected.sort_by_key(|t| (t.y, t.x));
        assert_eq!(requested, expected);
    }

    #[tokio::test]
    async fn test_run_places_tiles_by_slot() {
        let source = PatternSource::new(8);
        let pipeline = StitchPipeline::new(source, StitchOptions::new().with_tile_size(8));
        let grid = small_grid();

        let bytes = pipeline
            .run(&grid, 10, &crate::pipeline::NoProgress)
            .await
            .unwrap();
        let stitched = image::load_from_memory(&bytes).unwrap().to_rgba8();

        assert_eq!(stitched.dimensions(), (8 * 3, 8 * 4));

        // Sample the center pixel of every cell: it must carry the color of
        // the tile enumerated for that slot.
        for (slot, tile) in grid.iter().enumerate() {
            let (col, row) = grid.cell(slot);
            let px = stitched.get_pixel(col * 8 + 4, row * 8 + 4);
            assert_eq!(
                px,
                &Rgba([(tile.x % 256) as u8, (tile.y % 256) as u8, 0, 255]),
                "wrong tile in cell ({}, {})",
                col,
                row
            );
        }
    }

    #[tokio::test]
    async fn test_progress_counts_every_tile() {
        let source = PatternSource::new(8);
        let pipeline = StitchPipeline::new(source, StitchOptions::new().with_tile_size(8));
        let grid = small_grid();
        let total = grid.len() as u32;

        let seen: Mutex<Vec<(u32, u32)>> = Mutex::new(Vec::new());
        let sink = |completed: u32, total: u32| {
            seen.lock().unwrap().push((completed, total));
        };

        pipeline.run(&grid, 10, &sink).await.unwrap();

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), total as usize);
        // Monotonic 1..=total, each paired with the constant total.
        for (i, (completed, reported_total)) in seen.iter().enumerate() {
            assert_eq!(*completed, i as u32 + 1);
            assert_eq!(*reported_total, total);
        }
    }

    #[tokio::test]
    async fn test_failed_tile_aborts_with_coordinates() {
        let source = PatternSource::failing_at(8, TileIndex { x: 513, y: 510 });
        let pipeline = StitchPipeline::new(source, StitchOptions::new().with_tile_size(8));
        let grid = small_grid();

        let result = pipeline.run(&grid, 10, &crate::pipeline::NoProgress).await;

        match result {
            Err(PipelineError::TileFailed { x, y, zoom, .. }) => {
                assert_eq!((x, y, zoom), (513, 510, 10));
            }
            other => panic!("Expected TileFailed, got {:?}", other.map(|_| "image")),
        }
    }

    #[tokio::test]
    async fn test_undecodable_tile_aborts_with_decode_cause() {
        struct GarbageSource;
        impl TileSource for GarbageSource {
            async fn fetch_tile(&self, _tile: TileIndex, _zoom: u8) -> Result<Vec<u8>, SourceError> {
                Ok(vec![0xDE, 0xAD, 0xBE, 0xEF])
            }
            fn name(&self) -> &str {
                "garbage"
            }
        }

        let pipeline = StitchPipeline::new(GarbageSource, StitchOptions::new().with_tile_size(8));
        let grid = small_grid();

        let result = pipeline.run(&grid, 10, &crate::pipeline::NoProgress).await;
        match result {
            Err(PipelineError::TileFailed {
                cause: TileFailure::Decode(_),
                ..
            }) => {}
            other => panic!("Expected decode failure, got {:?}", other.map(|_| "image")),
        }
    }

    #[tokio::test]
    async fn test_single_tile_grid() {
        let bbox = BoundingBox::from_corners(36.08, 140.11, 36.08, 140.11).unwrap();
        let grid = bounding_box_to_grid(&bbox, 15).unwrap();
        assert_eq!(grid.len(), 1);

        let source = PatternSource::new(8);
        let pipeline = StitchPipeline::new(source, StitchOptions::new().with_tile_size(8));

        let bytes = pipeline
            .run(&grid, 15, &crate::pipeline::NoProgress)
            .await
            .unwrap();
        let stitched = image::load_from_memory(&bytes).unwrap();
        assert_eq!(stitched.width(), 8);
        assert_eq!(stitched.height(), 8);
    }

    #[test]
    fn test_options_builder() {
        let options = StitchOptions::new()
            .with_tile_size(512)
            .with_batch_size(8)
            .with_format(OutputFormat::Jpeg);

        assert_eq!(options.tile_size(), 512);
        assert_eq!(options.batch_size(), 8);
        assert_eq!(options.format(), OutputFormat::Jpeg);
    }

    #[test]
    fn test_default_options() {
        let options = StitchOptions::default();
        assert_eq!(options.tile_size(), DEFAULT_TILE_SIZE);
        assert_eq!(options.batch_size(), DEFAULT_BATCH_SIZE);
        assert_eq!(options.format(), OutputFormat::Png);
    }
}
