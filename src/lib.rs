//! # batchproc - concurrent processing of index-addressable collections
//!
//! Splits the index range `[0, collection_size)` into a fixed number of
//! contiguous, non-overlapping batches and runs a work function over each batch
//! on its own thread. The first error wins; every other batch sees a cancelled
//! [`Context`] and can stop early.
//!
//! ## Quick Start
//!
//! ```rust
//! use batchproc::{Context, parallel};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let words = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"];
//! let letters = AtomicUsize::new(0);
//!
//! parallel::process(&Context::background(), words.len(), 3, |ctx, start, end| {
//!     ctx.check()?;
//!     let count: usize = words[start..end].iter().map(|w| w.len()).sum();
//!     letters.fetch_add(count, Ordering::Relaxed);
//!     Ok::<_, batchproc::ContextError>(())
//! })?;
//!
//! assert_eq!(letters.into_inner(), 30);
//! # Ok::<_, batchproc::ContextError>(())
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod logging;
pub mod parallel;

pub use cli::{Cli, Output};
pub use config::{BatchprocConfig, DispatchConfig};
pub use context::{Context, ContextError};
pub use parallel::{Batch, Dispatcher, Plan};
