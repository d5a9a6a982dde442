//! Run command implementation
//!
//! Fills a buffer of `size` values in place, one batch per worker, then checks
//! the result. Every index is written by exactly one batch, so the buffer needs
//! no locking beyond per-slot atomics.

use anyhow::{Result, anyhow, bail};
use clap::Args;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use super::resolve_dispatcher;
use crate::cli::Output;
use crate::config::BatchprocConfig;
use crate::context::Context;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Number of items in the collection
    #[arg(short, long)]
    pub size: usize,

    /// Number of batches (defaults to the configured or detected worker count)
    #[arg(short, long)]
    pub workers: Option<NonZeroUsize>,

    /// Make the batch that owns this index fail when it reaches it
    #[arg(long, value_name = "INDEX")]
    pub fail_at: Option<usize>,

    /// Abort the run after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Sleep this long per item, checking for cancellation in between
    #[arg(long, value_name = "MS", default_value_t = 0)]
    pub delay_ms: u64,
}

/// Counters gathered while the batches run
#[derive(Debug, Default)]
struct RunStats {
    batches: AtomicUsize,
    cancelled: AtomicUsize,
    written: AtomicUsize,
}

pub fn execute(args: &RunArgs, config: &BatchprocConfig, output: &Output) -> Result<()> {
    let mut dispatcher = resolve_dispatcher(args.workers.map(NonZeroUsize::get), config);
    if let Some(ms) = args.timeout_ms {
        dispatcher = dispatcher.with_timeout(Duration::from_millis(ms));
    }

    let plan = dispatcher.plan(args.size);
    output.verbose(&format!(
        "Dispatching {} items over {} batch(es) ({})",
        args.size,
        plan.len(),
        if plan.is_serial() { "serial" } else { "concurrent" }
    ));

    let buffer: Vec<AtomicU64> = (0..args.size).map(|_| AtomicU64::new(0)).collect();
    let stats = RunStats::default();
    let delay = Duration::from_millis(args.delay_ms);
    let started = Instant::now();

    let result = dispatcher.run(&Context::background(), args.size, |ctx, start, end| {
        stats.batches.fetch_add(1, Ordering::Relaxed);

        for index in start..end {
            if let Err(err) = ctx.check() {
                stats.cancelled.fetch_add(1, Ordering::Relaxed);
                return Err(anyhow!(err).context(format!("batch [{start}, {end}) stopped at index {index}")));
            }
            if args.fail_at == Some(index) {
                return Err(anyhow!("batch [{start}, {end}) failed at index {index}"));
            }
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
            buffer[index].store(index as u64 + 1, Ordering::Relaxed);
            stats.written.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    });

    let elapsed = started.elapsed();
    let batches = stats.batches.load(Ordering::Relaxed);
    let cancelled = stats.cancelled.load(Ordering::Relaxed);
    let written = stats.written.load(Ordering::Relaxed);

    output.header("Batch run");
    output.key_value("Collection size:", &args.size.to_string(), false);
    output.key_value("Batches:", &batches.to_string(), false);
    output.key_value("Items written:", &written.to_string(), false);
    output.key_value("Elapsed:", &format!("{:.2}ms", elapsed.as_secs_f64() * 1000.0), false);

    if let Err(err) = result {
        output.key_value("Batches cancelled:", &cancelled.to_string(), false);
        return Err(err.context("batch run failed"));
    }

    let sum: u64 = buffer.iter().map(|slot| slot.load(Ordering::Relaxed)).sum();
    let expected = expected_sum(args.size);
    if sum != expected {
        bail!("buffer checksum mismatch: expected {expected}, got {sum}");
    }

    output.key_value("Sum:", &sum.to_string(), true);
    output.success(&format!("Processed {} items in {} batch(es)", args.size, batches));
    Ok(())
}

/// Sum of `1..=size`, the checksum of a fully written buffer
fn expected_sum(size: usize) -> u64 {
    let size = size as u64;
    size * (size + 1) / 2
}
