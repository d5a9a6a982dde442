use std::any::Any;
use std::sync::{Mutex, PoisonError};

use super::partition::{Plan, plan};
use crate::context::Context;

/// Cancels the batch group if a work function unwinds, so siblings can stop early
struct CancelOnPanic<'a>(&'a Context);

impl Drop for CancelOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.cancel();
        }
    }
}

/// Split `[0, collection_size)` into `num_workers` batches and run `work` over each
/// batch concurrently.
///
/// Blocks until every batch has returned, then yields the first error any batch
/// produced. The context handed to `work` is cancelled as soon as one batch fails;
/// batches that ignore the signal still run to completion and their errors are
/// dropped in favour of the first one.
///
/// When the collection is smaller than `num_workers`, or `num_workers == 1`, `work`
/// runs once on the calling thread with `ctx` itself and `(0, collection_size)`.
///
/// `work` may borrow from the caller, since batches run on scoped threads. A panic
/// inside `work` is re-raised here once all batches have joined.
///
/// ```rust
/// use batchproc::{Context, parallel};
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// let values: Vec<u64> = (1..=100).collect();
/// let total = AtomicU64::new(0);
///
/// parallel::process(&Context::background(), values.len(), 4, |_ctx, start, end| {
///     total.fetch_add(values[start..end].iter().sum(), Ordering::Relaxed);
///     Ok::<_, std::convert::Infallible>(())
/// })
/// .unwrap();
///
/// assert_eq!(total.into_inner(), 5050);
/// ```
pub fn process<E, F>(
    ctx: &Context,
    collection_size: usize,
    num_workers: usize,
    work: F,
) -> Result<(), E>
where
    E: Send,
    F: Fn(&Context, usize, usize) -> Result<(), E> + Sync,
{
    let batches = match plan(collection_size, num_workers) {
        Plan::Serial(batch) => {
            tracing::debug!(collection_size, num_workers, "dispatching serially");
            return work(ctx, batch.start, batch.end);
        }
        Plan::Concurrent(batches) => batches,
    };

    tracing::debug!(
        collection_size,
        num_workers,
        batch_size = collection_size / num_workers,
        "dispatching batches concurrently"
    );

    let group = Context::with_cancel(ctx);
    let first_error: Mutex<Option<E>> = Mutex::new(None);

    let joined = crossbeam::thread::scope(|s| {
        for batch in batches {
            let group = &group;
            let first_error = &first_error;
            let work = &work;

            s.spawn(move |_| {
                let _guard = CancelOnPanic(group);
                tracing::trace!(%batch, "batch started");

                match work(group, batch.start, batch.end) {
                    Ok(()) => tracing::trace!(%batch, "batch finished"),
                    Err(err) => {
                        let mut slot = first_error.lock().unwrap_or_else(PoisonError::into_inner);
                        if slot.is_none() {
                            tracing::debug!(%batch, "batch failed, cancelling remaining batches");
                            *slot = Some(err);
                            group.cancel();
                        } else {
                            tracing::trace!(%batch, "batch failed after first error, discarding");
                        }
                    }
                }
            });
        }
    });

    if let Err(payload) = joined {
        std::panic::resume_unwind(first_panic(payload));
    }

    match first_error.into_inner().unwrap_or_else(PoisonError::into_inner) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// [`process`] with one batch per available CPU.
pub fn parallel<E, F>(ctx: &Context, collection_size: usize, work: F) -> Result<(), E>
where
    E: Send,
    F: Fn(&Context, usize, usize) -> Result<(), E> + Sync,
{
    parallel_with(ctx, collection_size, num_cpus::get, work)
}

/// [`parallel`] with the parallelism query supplied by the caller.
pub fn parallel_with<E, F, P>(
    ctx: &Context,
    collection_size: usize,
    parallelism: P,
    work: F,
) -> Result<(), E>
where
    E: Send,
    F: Fn(&Context, usize, usize) -> Result<(), E> + Sync,
    P: FnOnce() -> usize,
{
    process(ctx, collection_size, parallelism(), work)
}

/// crossbeam reports scoped thread panics as a boxed `Vec` of payloads; unwrap the
/// first so the original panic message survives `resume_unwind`.
fn first_panic(payload: Box<dyn Any + Send + 'static>) -> Box<dyn Any + Send + 'static> {
    match payload.downcast::<Vec<Box<dyn Any + Send + 'static>>>() {
        Ok(mut panics) if !panics.is_empty() => panics.swap_remove(0),
        Ok(panics) => panics as Box<dyn Any + Send + 'static>,
        Err(payload) => payload,
    }
}
