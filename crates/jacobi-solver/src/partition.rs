//! Static row partitioning across workers.

use std::ops::Range;

use tracing::{debug, instrument};

use crate::error::SolverError;

/// Half-open range of matrix rows `[start, end)` owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRange {
    /// First row (inclusive).
    pub start: usize,
    /// One past the last row.
    pub end: usize,
}

impl RowRange {
    /// Number of rows in the range.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// `true` if the range holds no rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The range as a [`Range`] for iteration.
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Ordered, contiguous, non-overlapping row ranges covering `[0, order)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    order: usize,
    ranges: Vec<RowRange>,
}

impl Partition {
    /// Matrix order this partition covers.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of ranges (one per worker).
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// `true` if there are no ranges. Never the case for a partition built by
    /// [`partition`].
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The ranges in worker order.
    pub fn ranges(&self) -> &[RowRange] {
        &self.ranges
    }

    /// Range assigned to `worker`.
    pub fn range(&self, worker: usize) -> Option<RowRange> {
        self.ranges.get(worker).copied()
    }
}

/// Split `[0, order)` into `workers` contiguous ranges.
///
/// Each worker gets `order / workers` rows; the remainder `order % workers`
/// goes to the last worker.
///
/// # Errors
///
/// Returns [`SolverError::InvalidPartition`] if `workers == 0` or
/// `workers > order`.
///
/// # Example
///
/// ```
/// use jacobi_solver::partition::partition;
///
/// let p = partition(10, 3).unwrap();
/// let lens: Vec<usize> = p.ranges().iter().map(|r| r.len()).collect();
/// assert_eq!(lens, vec![3, 3, 4]);
/// ```
#[instrument]
pub fn partition(order: usize, workers: usize) -> Result<Partition, SolverError> {
    if workers == 0 {
        return Err(SolverError::InvalidPartition {
            order,
            workers,
            reason: "at least one worker is required".into(),
        });
    }
    if workers > order {
        return Err(SolverError::InvalidPartition {
            order,
            workers,
            reason: "more workers than rows".into(),
        });
    }

    let workload = order / workers;
    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for w in 0..workers {
        let end = if w + 1 == workers { order } else { start + workload };
        ranges.push(RowRange { start, end });
        start = end;
    }

    debug!(workload, remainder = order % workers, "partitioned rows");
    Ok(Partition { order, ranges })
}
