//! Logging setup for the batchproc binary
//!
//! The library only emits `tracing` events; installing a subscriber is up to the
//! embedding application. The CLI calls [`init_logging`] once at startup.

use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Pick the filter directive: `RUST_LOG` wins, then `--verbose`, then config.
pub fn filter_directive(env_value: Option<&str>, verbose: bool, configured: &str) -> String {
    match env_value {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ if verbose => "debug".to_string(),
        _ => configured.to_string(),
    }
}

/// Install a stderr subscriber. Repeated calls, or an existing global
/// subscriber, leave the current one in place.
pub fn init_logging(verbose: bool, configured_level: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_value = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let directive = filter_directive(env_value.as_deref(), verbose, configured_level);
        let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(filter),
        );

        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }
    });
}
