//! # Spindle Core
//!
//! Core abstractions shared by the Spindle executors.
//!
//! Spindle provides two primitives for a host application's task-dispatch
//! layer: a bounded, elastic worker pool for work that must stay off the
//! designated "main" context, and affinity executors that confine work to
//! that context. This crate holds the pieces both sides agree on:
//!
//! - [`WorkItem`]: an opaque, side-effecting unit of work
//! - [`AffinityExecutor`]: the one-method scheduling capability
//! - [`MainContext`]: the designated-context accessor the executors post to
//! - [`error`]: error types for submission, configuration and context setup
//! - [`platform`]: processor-count derived constants

#![deny(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use core::fmt;

pub mod context;
pub mod error;
pub mod executor;
pub mod platform;

pub use context::MainContext;
pub use error::{
    ConfigError, ConfigResult, ContextError, ContextResult, ExecutorError, ExecutorResult,
    RejectReason,
};
pub use executor::{AffinityExecutor, AffinityExecutorExt};

/// A unit of work with no return value.
///
/// Work items signal failure by panicking. Whoever runs the item decides
/// what happens to that panic; see the executor and pool documentation.
pub struct WorkItem(Box<dyn FnOnce() + Send + 'static>);

impl WorkItem {
    /// Wrap a closure as a work item.
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self(Box::new(f))
    }

    /// Run the work item on the current thread, consuming it.
    pub fn run(self) {
        (self.0)();
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem").finish_non_exhaustive()
    }
}

/// Extract a readable message from a panic payload.
///
/// Used by the pool workers and the main loop when they log a work item
/// that panicked.
#[must_use]
pub fn panic_message(payload: &(dyn core::any::Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic payload>"
    }
}
