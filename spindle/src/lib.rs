//! # Spindle
//!
//! Scheduling primitives for a host application's task-dispatch layer:
//!
//! - a factory for bounded, elastic worker pools that run work off the
//!   designated "main" context ([`new_bounded_elastic_pool`]);
//! - two executors that confine work to that context
//!   ([`DeferredAffinityExecutor`], [`ConditionalAffinityExecutor`]),
//!   available process-wide through [`deferred_executor`] and
//!   [`conditional_executor`].
//!
//! Task composition and the designated context's message loop itself are out
//! of scope; hosts plug their loop in through [`MainContext`], or pump the
//! bundled [`MainLoop`].
//!
//! # Examples
//!
//! ```
//! use spindle::{AffinityExecutorExt, DeferredAffinityExecutor, MainLoop};
//! use std::sync::{mpsc, Arc};
//!
//! let (main_loop, handle) = MainLoop::spawn("ui").unwrap();
//! let ui = DeferredAffinityExecutor::new(Arc::new(main_loop.clone()));
//! let pool = spindle::new_bounded_elastic_pool();
//! let (tx, rx) = mpsc::channel();
//!
//! // heavy work on the pool, result delivered on the main context
//! pool.execute(move || {
//!     let answer = 6 * 7;
//!     ui.schedule_fn(move || tx.send(answer).unwrap());
//! })
//! .unwrap();
//!
//! assert_eq!(rx.recv().unwrap(), 42);
//! main_loop.quit();
//! handle.join().unwrap();
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub use spindle_core::{
    context::MainContext,
    error::*,
    executor::{AffinityExecutor, AffinityExecutorExt},
    panic_message, platform, WorkItem,
};

pub use spindle_pool::{
    new_bounded_elastic_pool, new_bounded_elastic_pool_with, DefaultThreadFactory,
    NamedThreadFactory, PoolBuilder, PoolConfig, QueueKind, ThreadFactory, WorkerPool,
};

pub use spindle_main::{
    conditional_executor, deferred_executor, designate_main_context, main_context, main_loop,
    ConditionalAffinityExecutor, DeferredAffinityExecutor, MainLoop,
};
