//! Cooperative cancellation contexts
//!
//! A [`Context`] is threaded through every work function invocation. It carries a
//! sticky cancellation flag and an optional deadline, and it links to its parent so
//! that cancelling an outer context is visible to everything derived from it.
//!
//! Cancellation never interrupts a running thread. Work functions observe it by
//! calling [`Context::is_cancelled`] or [`Context::check`] and returning early.
//!
//! ```rust
//! use batchproc::Context;
//! use std::time::Duration;
//!
//! let root = Context::background();
//! let scoped = Context::with_timeout(&root, Duration::from_secs(30));
//! let child = Context::with_cancel(&scoped);
//!
//! child.cancel();
//! assert!(child.is_cancelled());
//! assert!(!scoped.is_cancelled());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Reason a context reports itself as done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
    parent: Option<Context>,
}

/// Shared, cloneable cancellation scope
#[derive(Debug, Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

impl Context {
    /// Root context: never cancelled on its own, no deadline
    pub fn background() -> Self {
        Self::new(None, None)
    }

    /// Derive a child that can be cancelled independently of `parent`
    pub fn with_cancel(parent: &Context) -> Self {
        Self::new(Some(parent.clone()), None)
    }

    /// Derive a child that expires at `deadline`
    pub fn with_deadline(parent: &Context, deadline: Instant) -> Self {
        Self::new(Some(parent.clone()), Some(deadline))
    }

    /// Derive a child that expires `timeout` from now. A timeout too large to
    /// represent as an `Instant` never expires.
    pub fn with_timeout(parent: &Context, timeout: Duration) -> Self {
        Self::new(Some(parent.clone()), Instant::now().checked_add(timeout))
    }

    fn new(parent: Option<Context>, deadline: Option<Instant>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                deadline,
                parent,
            }),
        }
    }

    /// Raise the cancellation signal for this context and its descendants.
    ///
    /// Safe to call from any thread, any number of times.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether this context, or any ancestor, is done
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.err().is_some()
    }

    /// Why the context is done, or `None` while it is still live
    pub fn err(&self) -> Option<ContextError> {
        if self.inner.cancelled.load(Ordering::SeqCst) {
            return Some(ContextError::Canceled);
        }
        if let Some(deadline) = self.inner.deadline
            && Instant::now() >= deadline
        {
            return Some(ContextError::DeadlineExceeded);
        }
        self.inner.parent.as_ref().and_then(Context::err)
    }

    /// [`Context::err`] as a `Result`, for early returns with `?`
    pub fn check(&self) -> Result<(), ContextError> {
        match self.err() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Earliest deadline along the ancestor chain
    pub fn deadline(&self) -> Option<Instant> {
        let inherited = self.inner.parent.as_ref().and_then(Context::deadline);
        match (self.inner.deadline, inherited) {
            (Some(own), Some(parent)) => Some(own.min(parent)),
            (own, parent) => own.or(parent),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_live() {
        let ctx = Context::background();
        assert!(!ctx.is_cancelled());
        assert_eq!(ctx.err(), None);
        assert!(ctx.check().is_ok());
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn test_cancel_is_sticky_and_idempotent() {
        let ctx = Context::background();
        ctx.cancel();
        ctx.cancel();
        assert_eq!(ctx.err(), Some(ContextError::Canceled));
        assert_eq!(ctx.check(), Err(ContextError::Canceled));
    }

    #[test]
    fn test_parent_cancellation_reaches_child() {
        let parent = Context::background();
        let child = Context::with_cancel(&parent);
        let grandchild = Context::with_cancel(&child);

        parent.cancel();
        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
    }

    #[test]
    fn test_child_cancellation_does_not_reach_parent() {
        let parent = Context::background();
        let child = Context::with_cancel(&parent);

        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[test]
    fn test_clones_share_signal() {
        let ctx = Context::background();
        let clone = ctx.clone();
        clone.cancel();
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_expired_deadline() {
        let root = Context::background();
        let ctx = Context::with_deadline(&root, Instant::now() - Duration::from_millis(1));
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
        assert!(!root.is_cancelled());
    }

    #[test]
    fn test_timeout_elapses() {
        let ctx = Context::with_timeout(&Context::background(), Duration::from_millis(10));
        assert!(!ctx.is_cancelled());
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
    }

    #[test]
    fn test_unbounded_timeout_stays_live() {
        let root = Context::background();
        let ctx = Context::with_timeout(&root, Duration::MAX);
        assert!(!ctx.is_cancelled());
        assert!(ctx.deadline().is_none());

        root.cancel();
        assert_eq!(ctx.err(), Some(ContextError::Canceled));
    }

    #[test]
    fn test_deadline_inherits_earliest() {
        let now = Instant::now();
        let outer = Context::with_deadline(&Context::background(), now + Duration::from_secs(5));
        let inner = Context::with_deadline(&outer, now + Duration::from_secs(60));
        assert_eq!(inner.deadline(), Some(now + Duration::from_secs(5)));

        let child = Context::with_cancel(&outer);
        assert_eq!(child.deadline(), outer.deadline());
    }

    #[test]
    fn test_own_cancel_wins_over_deadline() {
        let ctx = Context::with_deadline(&Context::background(), Instant::now());
        ctx.cancel();
        assert_eq!(ctx.err(), Some(ContextError::Canceled));
    }
}
