//! Affinity executors bound to the designated context.

use std::sync::Arc;

use spindle_core::{AffinityExecutor, MainContext, WorkItem};

/// Always posts work to the designated context and returns immediately.
///
/// Items from one executor reach the context in submission order. A
/// panicking item is handled by the context, never by `schedule`.
#[derive(Clone)]
pub struct DeferredAffinityExecutor {
    context: Arc<dyn MainContext>,
}

impl DeferredAffinityExecutor {
    /// Bind an executor to `context` for its whole lifetime.
    pub fn new(context: Arc<dyn MainContext>) -> Self {
        Self { context }
    }

    /// The context this executor posts to.
    pub fn context(&self) -> &Arc<dyn MainContext> {
        &self.context
    }
}

impl AffinityExecutor for DeferredAffinityExecutor {
    fn schedule(&self, work: WorkItem) {
        self.context.post(work);
    }
}

impl core::fmt::Debug for DeferredAffinityExecutor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeferredAffinityExecutor")
            .field("context", &self.context.name())
            .finish()
    }
}

/// Runs work in-line when called on the designated context, otherwise posts
/// it like [`DeferredAffinityExecutor`].
///
/// On the in-line path the item runs on the caller's stack before
/// `schedule` returns, and a panic unwinds out of `schedule` as if the caller
/// had run the item itself. No lock is held while the item runs, so the item
/// may schedule more work.
#[derive(Clone)]
pub struct ConditionalAffinityExecutor {
    context: Arc<dyn MainContext>,
}

impl ConditionalAffinityExecutor {
    /// Bind an executor to `context` for its whole lifetime.
    pub fn new(context: Arc<dyn MainContext>) -> Self {
        Self { context }
    }

    /// The context this executor targets.
    pub fn context(&self) -> &Arc<dyn MainContext> {
        &self.context
    }
}

impl AffinityExecutor for ConditionalAffinityExecutor {
    fn schedule(&self, work: WorkItem) {
        if self.context.is_current() {
            work.run();
        } else {
            self.context.post(work);
        }
    }
}

impl core::fmt::Debug for ConditionalAffinityExecutor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConditionalAffinityExecutor")
            .field("context", &self.context.name())
            .finish()
    }
}
