//! Command implementations for the batchproc CLI
//!
//! Each command is organized into its own module.

pub mod config;
pub mod plan;
pub mod run;
pub mod version;

use crate::config::BatchprocConfig;
use crate::parallel::Dispatcher;

/// Dispatcher from configuration, with an explicit `--workers` taking precedence
fn resolve_dispatcher(workers: Option<usize>, config: &BatchprocConfig) -> Dispatcher {
    let configured = Dispatcher::from_config(&config.dispatch);
    match workers {
        Some(workers) => {
            let dispatcher = Dispatcher::new(workers);
            match configured.timeout() {
                Some(timeout) => dispatcher.with_timeout(timeout),
                None => dispatcher,
            }
        }
        None => configured,
    }
}
