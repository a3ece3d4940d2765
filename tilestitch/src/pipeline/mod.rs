//! Fetch-stitch pipeline module
//!
//! Given a tile grid, retrieves every tile under bounded concurrency,
//! composites each into its cell of an output canvas, reports per-tile
//! progress, and encodes the finished canvas to an image blob.
//!
//! Concurrency is batched: all retrievals of one batch run concurrently,
//! and the next batch is not issued until every member of the current one
//! has settled. All futures are multiplexed on one logical task, so
//! drawing into the shared surface and bumping the progress counter are
//! synchronous steps that need no lock.

mod batch;
mod error;
mod progress;
mod stitcher;
mod surface;

pub use batch::for_each_batched;
pub use error::{PipelineError, TileFailure};
pub use progress::{NoProgress, ProgressSink, ProgressState};
pub use stitcher::{StitchOptions, StitchPipeline, DEFAULT_BATCH_SIZE};
pub use surface::{OutputFormat, RenderSurface, SurfaceError, DEFAULT_TILE_SIZE};
