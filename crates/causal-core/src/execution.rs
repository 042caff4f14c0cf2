//! Batch execution strategy
//!
//! Bootstrap resamples are independent, so fitting the ensemble is a batch of
//! index-addressed tasks. [`execute_batch`] runs such a batch under an
//! [`ExecutionStrategy`], collecting results in task order regardless of
//! completion order. Inputs are shared by reference; tasks own their outputs.

use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Below this batch size, parallel dispatch costs more than it saves.
const AUTO_PARALLEL_THRESHOLD: usize = 8;

/// Execution strategy for batch operations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Process items sequentially
    Sequential,
    /// Process items in parallel
    Parallel,
    /// Automatically choose based on workload
    #[default]
    Auto,
}

impl ExecutionStrategy {
    fn run_parallel(&self, count: usize) -> bool {
        match self {
            ExecutionStrategy::Sequential => false,
            ExecutionStrategy::Parallel => true,
            ExecutionStrategy::Auto => count >= AUTO_PARALLEL_THRESHOLD,
        }
    }
}

/// Execute `count` independent tasks, returning results in task order
pub fn execute_batch<F, R>(strategy: ExecutionStrategy, count: usize, f: F) -> Vec<R>
where
    F: Fn(usize) -> R + Sync + Send,
    R: Send,
{
    if strategy.run_parallel(count) {
        (0..count).into_par_iter().map(f).collect()
    } else {
        (0..count).map(f).collect()
    }
}

/// Cooperative cancellation handle for an in-flight batch
///
/// Cancellation is checked between tasks; a task that has already started
/// runs to completion. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the batch this token is attached to
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
