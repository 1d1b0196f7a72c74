//! Progress reporting for the sweep loop.
//!
//! The optimizer reports through a [`ProgressObserver`] instead of writing
//! to the console, so hosts decide where progress goes. Closures taking
//! `&Progress` are observers too.

use tracing::info;

/// Snapshot of the optimizer state at a reporting point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Completed sweep pairs.
    pub iteration: usize,
    /// Cost after the latest sweep pair: `2^(n+1) - 2·Re Tr(T)`.
    pub cost: f64,
    /// Cost after the sweep pair before it.
    pub previous_cost: f64,
    /// Tensor rebuilds so far, including one at this iteration.
    pub reinitializations: usize,
}

/// Receives periodic progress from the optimizer.
pub trait ProgressObserver {
    /// Called every `log_interval` iterations.
    fn on_progress(&mut self, progress: &Progress);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&Progress),
{
    fn on_progress(&mut self, progress: &Progress) {
        self(progress);
    }
}

/// Emits progress as `tracing` events at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_progress(&mut self, progress: &Progress) {
        info!(
            iteration = progress.iteration,
            cost = progress.cost,
            delta = (progress.previous_cost - progress.cost),
            reinitializations = progress.reinitializations,
            "svd synthesis progress"
        );
    }
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_progress(&mut self, _progress: &Progress) {}
}
