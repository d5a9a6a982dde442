use std::fmt;
use std::ops::Range;

/// Half-open index range `[start, end)` handled by one work function call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Batch {
    pub start: usize,
    pub end: usize,
}

impl Batch {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "batch start {start} past end {end}");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// How a collection gets split across workers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// One call over the whole range on the calling thread
    Serial(Batch),
    /// One scoped thread per batch, remainder batch first
    Concurrent(Vec<Batch>),
}

impl Plan {
    pub fn batches(&self) -> &[Batch] {
        match self {
            Plan::Serial(batch) => std::slice::from_ref(batch),
            Plan::Concurrent(batches) => batches,
        }
    }

    /// Number of work function invocations this plan makes
    pub fn len(&self) -> usize {
        self.batches().len()
    }

    /// Always false: even an empty collection gets one `[0, 0)` call
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_serial(&self) -> bool {
        matches!(self, Plan::Serial(_))
    }
}

/// Split `[0, collection_size)` into `num_workers` contiguous batches.
///
/// Collections smaller than the worker count, or a single worker, collapse into
/// one serial batch. Otherwise every batch holds `collection_size / num_workers`
/// items except the last, which also takes the remainder. The last batch is
/// listed first since it is dispatched first.
///
/// `num_workers == 0` is a caller error; it is treated as `1`.
///
/// ```rust
/// use batchproc::parallel::{plan, Batch};
///
/// let plan = plan(51, 4);
/// let mut batches = plan.batches().to_vec();
/// batches.sort();
/// assert_eq!(
///     batches,
///     vec![Batch::new(0, 12), Batch::new(12, 24), Batch::new(24, 36), Batch::new(36, 51)]
/// );
/// ```
pub fn plan(collection_size: usize, num_workers: usize) -> Plan {
    let num_workers = if num_workers == 0 {
        tracing::warn!("num_workers must be at least 1, got 0; running serially");
        1
    } else {
        num_workers
    };

    if collection_size < num_workers || num_workers == 1 {
        return Plan::Serial(Batch::new(0, collection_size));
    }

    let batch_size = collection_size / num_workers;
    let last_worker = num_workers - 1;

    let mut batches = Vec::with_capacity(num_workers);
    batches.push(Batch::new(last_worker * batch_size, collection_size));
    batches.extend((0..last_worker).map(|i| Batch::new(i * batch_size, (i + 1) * batch_size)));

    Plan::Concurrent(batches)
}
