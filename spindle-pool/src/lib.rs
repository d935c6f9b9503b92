//! Bounded, elastic worker pools for Spindle.
//!
//! A [`WorkerPool`] runs [`WorkItem`]s on OS threads off the designated main
//! context. The pool spawns one thread per submission until `core_size`
//! threads exist, then queues. It only grows past `core_size` when the
//! queue refuses an item, which an unbounded queue never does. Idle threads,
//! core threads included, retire after `keep_alive`.
//!
//! # Examples
//!
//! ```
//! use spindle_pool::new_bounded_elastic_pool;
//! use std::sync::mpsc;
//!
//! let pool = new_bounded_elastic_pool();
//! let (tx, rx) = mpsc::channel();
//! pool.execute(move || tx.send(6 * 7).unwrap()).unwrap();
//! assert_eq!(rx.recv().unwrap(), 42);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod factory;
pub mod pool;
pub mod thread_factory;

pub use config::{PoolBuilder, PoolConfig, QueueKind};
pub use factory::{new_bounded_elastic_pool, new_bounded_elastic_pool_with};
pub use pool::WorkerPool;
pub use spindle_core::{ExecutorError, ExecutorResult, RejectReason, WorkItem};
pub use thread_factory::{DefaultThreadFactory, NamedThreadFactory, ThreadFactory};
