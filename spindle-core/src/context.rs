//! The designated-context accessor.
//!
//! Affinity executors never talk to a message loop directly. They go through
//! a [`MainContext`], which knows how to post work to the designated context
//! and whether the calling thread is that context. Hosts with their own UI or
//! event loop implement this trait; `spindle-main` ships a default loop.

use crate::WorkItem;

/// Capability to reach the single designated ("main") execution context.
pub trait MainContext: Send + Sync + 'static {
    /// Enqueue a work item on the context's FIFO queue and return
    /// immediately.
    ///
    /// Items posted from any thread must run on the context one at a time,
    /// in the order they were posted.
    fn post(&self, work: WorkItem);

    /// Whether the calling thread is the designated context's thread.
    fn is_current(&self) -> bool;

    /// Human-readable name, used in logs.
    fn name(&self) -> &str {
        "main"
    }
}
