use std::time::Duration;

use super::dispatch::process;
use super::partition::{Plan, plan};
use crate::config::DispatchConfig;
use crate::context::Context;

/// Dispatcher with a worker count and timeout resolved up front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatcher {
    workers: usize,
    timeout: Option<Duration>,
}

impl Dispatcher {
    /// Dispatcher with a fixed worker count and no timeout
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            timeout: None,
        }
    }

    /// Resolve workers and timeout from configuration against the host's CPUs
    pub fn from_config(config: &DispatchConfig) -> Self {
        let workers = calculate_workers(num_cpus::get(), config);
        tracing::debug!(workers, available = num_cpus::get(), "resolved dispatch workers");
        Self {
            workers,
            timeout: (config.timeout_ms > 0).then(|| Duration::from_millis(config.timeout_ms)),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Batches a run over `collection_size` items would use
    pub fn plan(&self, collection_size: usize) -> Plan {
        plan(collection_size, self.workers)
    }

    /// [`process`] with this dispatcher's worker count.
    ///
    /// With a timeout set, `work` receives a context that expires after it,
    /// including on the serial path.
    pub fn run<E, F>(&self, ctx: &Context, collection_size: usize, work: F) -> Result<(), E>
    where
        E: Send,
        F: Fn(&Context, usize, usize) -> Result<(), E> + Sync,
    {
        match self.timeout {
            Some(timeout) => {
                let scoped = Context::with_timeout(ctx, timeout);
                process(&scoped, collection_size, self.workers, work)
            }
            None => process(ctx, collection_size, self.workers, work),
        }
    }
}

/// Worker count for `available` logical CPUs under `config`.
///
/// ```text
/// workers > 0          -> workers
/// otherwise            -> max(1, available * thread_percentage / 100)
/// max_threads > 0      -> min(max_threads, derived)
/// ```
pub fn calculate_workers(available: usize, config: &DispatchConfig) -> usize {
    if config.workers > 0 {
        return config.workers;
    }

    let by_percentage = std::cmp::max(1, (available * config.thread_percentage as usize) / 100);

    if config.max_threads > 0 {
        std::cmp::min(config.max_threads, by_percentage)
    } else {
        by_percentage
    }
}
