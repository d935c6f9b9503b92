//! The affinity-executor capability.

use crate::WorkItem;

/// An executor that runs submitted work only on the designated context.
///
/// Implementations differ in whether a caller already on the context runs
/// its work in-line or always defers it. `schedule` never reports an error.
pub trait AffinityExecutor: Send + Sync {
    /// Hand a work item to the designated context.
    fn schedule(&self, work: WorkItem);
}

/// Closure-friendly helpers for every [`AffinityExecutor`].
pub trait AffinityExecutorExt: AffinityExecutor {
    /// Schedule a closure without wrapping it in a [`WorkItem`] first.
    fn schedule_fn<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule(WorkItem::new(f));
    }
}

impl<E: AffinityExecutor + ?Sized> AffinityExecutorExt for E {}

impl<E: AffinityExecutor + ?Sized> AffinityExecutor for &E {
    fn schedule(&self, work: WorkItem) {
        (**self).schedule(work);
    }
}

impl<E: AffinityExecutor + ?Sized> AffinityExecutor for std::sync::Arc<E> {
    fn schedule(&self, work: WorkItem) {
        (**self).schedule(work);
    }
}
