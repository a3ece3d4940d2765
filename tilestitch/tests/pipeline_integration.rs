//! Integration tests for the fetch-stitch pipeline's concurrency model.
//!
//! A variable-latency mock source records when each retrieval starts and
//! settles; the assertions check the batch barrier (batch k+1 never starts
//! before all of batch k settled), the batch count, and that out-of-order
//! completion within a batch neither corrupts tile placement nor breaks
//! progress monotonicity.
//!
//! Run with: `cargo test --test pipeline_integration`

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::{Rgba, RgbaImage};

use tilestitch::coord::{bounding_box_to_grid, BoundingBox, TileGrid, TileIndex};
use tilestitch::pipeline::{NoProgress, StitchOptions, StitchPipeline};
use tilestitch::source::{SourceError, TileSource};

// ============================================================================
// Mock Implementations
// ============================================================================

const TILE_SIZE: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Started(TileIndex),
    Settled(TileIndex),
}

/// Source with per-tile artificial latency, recording start/settle events.
struct VariableLatencySource {
    events: Arc<Mutex<Vec<Event>>>,
    /// Latency in milliseconds derived from tile coordinates
    latency_for: fn(TileIndex) -> u64,
}

impl VariableLatencySource {
    fn new(latency_for: fn(TileIndex) -> u64) -> (Self, Arc<Mutex<Vec<Event>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: Arc::clone(&events),
                latency_for,
            },
            events,
        )
    }
}

impl TileSource for VariableLatencySource {
    async fn fetch_tile(&self, tile: TileIndex, _zoom: u8) -> Result<Vec<u8>, SourceError> {
        self.events.lock().unwrap().push(Event::Started(tile));

        tokio::time::sleep(Duration::from_millis((self.latency_for)(tile))).await;

        self.events.lock().unwrap().push(Event::Settled(tile));

        let img = RgbaImage::from_pixel(
            TILE_SIZE,
            TILE_SIZE,
            Rgba([(tile.x % 256) as u8, (tile.y % 256) as u8, 0, 255]),
        );
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Png)
            .expect("Failed to encode tile PNG");
        Ok(buffer.into_inner())
    }

    fn name(&self) -> &str {
        "variable latency"
    }
}

/// 3x4 grid (12 tiles) at zoom 10 around the equator.
fn equator_grid() -> TileGrid {
    let bbox = BoundingBox::from_corners(1.0, 1.0, 0.0, 0.0).unwrap();
    bounding_box_to_grid(&bbox, 10).unwrap()
}

fn slot_of(grid: &TileGrid, tile: TileIndex) -> usize {
    grid.indices()
        .iter()
        .position(|t| *t == tile)
        .expect("tile not in grid")
}

// ============================================================================
// Batch barrier
// ============================================================================

#[tokio::test(start_paused = true)]
async fn batches_never_overlap() {
    let batch_size = 5;
    // Latency varies wildly with position so completion order scrambles.
    let (source, events) = VariableLatencySource::new(|t| ((t.x * 7 + t.y * 13) % 40) as u64 + 1);
    let pipeline = StitchPipeline::new(
        source,
        StitchOptions::new()
            .with_tile_size(TILE_SIZE)
            .with_batch_size(batch_size),
    );
    let grid = equator_grid();

    pipeline.run(&grid, 10, &NoProgress).await.unwrap();

    let events = events.lock().unwrap();

    // Replay the log: when a tile of batch k starts, every tile of earlier
    // batches must have settled.
    let mut settled = 0usize;
    for event in events.iter() {
        match event {
            Event::Started(tile) => {
                let batch = slot_of(&grid, *tile) / batch_size;
                assert!(
                    settled >= batch * batch_size,
                    "tile {} of batch {} started with only {} settled",
                    tile,
                    batch,
                    settled
                );
            }
            Event::Settled(_) => settled += 1,
        }
    }
    assert_eq!(settled, grid.len());
}

#[tokio::test(start_paused = true)]
async fn batch_count_is_ceil_of_tiles_over_batch_size() {
    for batch_size in [1usize, 4, 5, 12, 20] {
        let (source, events) = VariableLatencySource::new(|t| ((t.x + t.y) % 10) as u64 + 1);
        let pipeline = StitchPipeline::new(
            source,
            StitchOptions::new()
                .with_tile_size(TILE_SIZE)
                .with_batch_size(batch_size),
        );
        let grid = equator_grid();
        let tiles = grid.len();

        pipeline.run(&grid, 10, &NoProgress).await.unwrap();

        // A batch begins whenever a retrieval starts with nothing in flight.
        let events = events.lock().unwrap();
        let mut started = 0usize;
        let mut settled = 0usize;
        let mut batches = 0usize;
        for event in events.iter() {
            match event {
                Event::Started(_) => {
                    if started == settled {
                        batches += 1;
                    }
                    started += 1;
                }
                Event::Settled(_) => settled += 1,
            }
        }

        assert_eq!(
            batches,
            tiles.div_ceil(batch_size),
            "batch_size {}",
            batch_size
        );
    }
}

// ============================================================================
// Out-of-order completion
// ============================================================================

#[tokio::test(start_paused = true)]
async fn scrambled_completion_still_places_tiles_correctly() {
    // Earlier slots get the longest latency, so within each batch the
    // completion order is the reverse of enumeration order.
    let (source, events) = VariableLatencySource::new(|t| (200 - (t.x * 3 + t.y * 11) % 100) as u64);
    let pipeline = StitchPipeline::new(
        source,
        StitchOptions::new()
            .with_tile_size(TILE_SIZE)
            .with_batch_size(4),
    );
    let grid = equator_grid();

    let progress: Mutex<Vec<u32>> = Mutex::new(Vec::new());
    let sink = |completed: u32, _total: u32| {
        progress.lock().unwrap().push(completed);
    };

    let bytes = pipeline.run(&grid, 10, &sink).await.unwrap();

    // Completion order differed from enumeration order somewhere.
    let events = events.lock().unwrap();
    let settle_order: Vec<TileIndex> = events
        .iter()
        .filter_map(|e| match e {
            Event::Settled(t) => Some(*t),
            _ => None,
        })
        .collect();
    assert_ne!(
        settle_order,
        grid.indices().to_vec(),
        "latencies should scramble completion order"
    );

    // Progress stayed monotonic regardless.
    let progress = progress.into_inner().unwrap();
    assert_eq!(progress, (1..=grid.len() as u32).collect::<Vec<_>>());

    // Every tile still landed in the cell of its enumeration slot.
    let stitched = image::load_from_memory(&bytes).unwrap().to_rgba8();
    for (slot, tile) in grid.iter().enumerate() {
        let (col, row) = grid.cell(slot);
        let px = stitched.get_pixel(col * TILE_SIZE + TILE_SIZE / 2, row * TILE_SIZE + TILE_SIZE / 2);
        assert_eq!(
            px,
            &Rgba([(tile.x % 256) as u8, (tile.y % 256) as u8, 0, 255]),
            "wrong tile in cell ({}, {})",
            col,
            row
        );
    }
}
