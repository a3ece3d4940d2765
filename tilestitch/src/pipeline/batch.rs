//! Batched parallel execution with a barrier between batches.
//!
//! Items are processed in sequential batches of a fixed size. Within a
//! batch every future runs concurrently and completions are handed to a
//! synchronous settle callback in completion order; the next batch is not
//! started until the whole current batch has settled. This bounds the
//! number of in-flight operations to the batch size. It is deliberately
//! not a sliding-window limiter: the slowest member of a batch gates the
//! start of the entire next batch.

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

/// Runs `make(item)` for every item in sequential batches of `batch_size`,
/// calling `settle` with each result as it completes.
///
/// The first error - from a future or from `settle` - aborts the whole
/// run; remaining in-flight futures of the batch are dropped and no
/// further batch is issued.
///
/// A `batch_size` of zero is treated as one.
pub async fn for_each_batched<T, R, E, Make, Fut, Settle>(
    items: impl IntoIterator<Item = T>,
    batch_size: usize,
    make: Make,
    mut settle: Settle,
) -> Result<(), E>
where
    Make: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    Settle: FnMut(R) -> Result<(), E>,
{
    let batch_size = batch_size.max(1);
    let mut items = items.into_iter();

    loop {
        let mut in_flight: FuturesUnordered<Fut> =
            items.by_ref().take(batch_size).map(&make).collect();

        if in_flight.is_empty() {
            return Ok(());
        }

        // Barrier: drain the whole batch before the next one is built.
        while let Some(result) = in_flight.next().await {
            settle(result?)?;
        }
    }
}
