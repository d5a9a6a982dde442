//! Configuration management for batchproc
//!
//! Settings are layered with figment: embedded defaults, then user and
//! repository files, then an explicit `--config` file, then `BATCHPROC_*`
//! environment variables. See [`BatchprocConfig::load`].

use serde::{Deserialize, Serialize};

mod core;

/// Merged configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchprocConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How many batches to split work into and how long a run may take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Fixed worker count (0 = derive from available CPUs)
    pub workers: usize,
    /// Percentage of CPU cores to use when deriving (1-100)
    pub thread_percentage: u8,
    /// Cap on derived workers (0 = no cap)
    pub max_threads: usize,
    /// Timeout applied to each run in milliseconds (0 = none)
    pub timeout_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            thread_percentage: 100,
            max_threads: 0,
            timeout_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
