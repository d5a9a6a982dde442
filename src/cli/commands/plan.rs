//! Plan command implementation
//!
//! Prints the batches a run over a collection would use, without running anything.

use anyhow::Result;
use clap::Args;
use std::num::NonZeroUsize;

use super::resolve_dispatcher;
use crate::cli::Output;
use crate::config::BatchprocConfig;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Number of items in the collection
    #[arg(short, long)]
    pub size: usize,

    /// Number of batches (defaults to the configured or detected worker count)
    #[arg(short, long)]
    pub workers: Option<NonZeroUsize>,
}

pub fn execute(args: &PlanArgs, config: &BatchprocConfig, output: &Output) -> Result<()> {
    let dispatcher = resolve_dispatcher(args.workers.map(NonZeroUsize::get), config);
    let plan = dispatcher.plan(args.size);

    output.header("Batch plan");
    output.key_value("Collection size:", &args.size.to_string(), false);
    output.key_value("Workers:", &dispatcher.workers().to_string(), false);
    output.key_value(
        "Path:",
        if plan.is_serial() { "serial" } else { "concurrent" },
        true,
    );
    output.key_value("Batches:", &plan.len().to_string(), false);

    if plan.is_serial() && dispatcher.workers() > 1 {
        output.warning("Collection smaller than worker count; running as a single batch");
    }

    let mut batches = plan.batches().to_vec();
    batches.sort();

    output.category("Ranges");
    for batch in &batches {
        output.list_item(&format!("{} ({} items)", batch, batch.len()));
    }

    Ok(())
}
