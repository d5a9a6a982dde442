//! Batch partitioning and concurrent dispatch
//!
//! This module splits an index range `[0, collection_size)` into contiguous,
//! non-overlapping batches and runs a caller-supplied work function over each
//! batch on its own scoped thread.
//!
//! # Architecture Responsibilities
//!
//! ## What This Module Does:
//! - **Partitioning**: Deterministic batch boundaries from `(collection_size, num_workers)`
//! - **Execution Strategy**: Serial fast path vs one scoped thread per batch
//! - **Error Aggregation**: First error wins, later errors are discarded
//! - **Cancellation**: Cancels the shared [`Context`](crate::Context) on first failure
//!
//! ## What This Module Does NOT Do:
//! - **Domain Logic**: Does not know what the indices address
//! - **Pooling**: No long-lived workers or queues, threads live for one call
//! - **Retries or Progress**: Left to the work function
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   Caller        │    │   parallel       │    │   Batches       │
//! │                 │───▶│                  │───▶│                 │
//! │ • Collection    │    │ • plan()         │    │ • [0, b)        │
//! │ • Work function │    │ • process()      │    │ • [b, 2b)       │
//! │ • Context       │    │ • first error    │    │ • ...           │
//! │                 │◀───│ • cancellation   │    │ • [(n-1)b, len) │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! # Key Methods
//!
//! ## Planning
//! ```rust
//! use batchproc::parallel::plan;
//!
//! let plan = plan(7, 2);
//! assert_eq!(plan.len(), 2);
//! ```
//!
//! ## Dispatch
//! ```rust
//! use batchproc::{Context, parallel};
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! let squares: Vec<AtomicU64> = (0..1_000).map(|_| AtomicU64::new(0)).collect();
//!
//! parallel::parallel(&Context::background(), squares.len(), |ctx, start, end| {
//!     for i in start..end {
//!         ctx.check()?;
//!         squares[i].store((i * i) as u64, Ordering::Relaxed);
//!     }
//!     Ok::<_, batchproc::ContextError>(())
//! })
//! .unwrap();
//!
//! assert_eq!(squares[12].load(Ordering::Relaxed), 144);
//! ```

pub mod dispatch;
pub mod dispatcher;
pub mod partition;

// Re-export main types for easier access
pub use dispatch::{parallel, parallel_with, process};
pub use dispatcher::{Dispatcher, calculate_workers};
pub use partition::{Batch, Plan, plan};
