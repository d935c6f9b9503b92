//! Main-context affinity executors for Spindle.
//!
//! Two executors confine work to the single designated context:
//!
//! - [`DeferredAffinityExecutor`] always posts and returns immediately.
//! - [`ConditionalAffinityExecutor`] runs work in-line when the caller is
//!   already on the designated context, and posts otherwise.
//!
//! Both reach the context through a [`MainContext`]. [`MainLoop`] is the
//! default one; [`registry`] holds the process-wide instances.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod executor;
pub mod main_loop;
pub mod registry;

pub use executor::{ConditionalAffinityExecutor, DeferredAffinityExecutor};
pub use main_loop::MainLoop;
pub use registry::{
    conditional_executor, deferred_executor, designate_main_context, main_context, main_loop,
};
pub use spindle_core::{AffinityExecutor, AffinityExecutorExt, MainContext, WorkItem};
