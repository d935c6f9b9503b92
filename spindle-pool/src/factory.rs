//! Factory functions for the bounded elastic pool.
//!
//! Sizing is fixed per process: `cpus + 1` core threads, `2 * cpus + 1`
//! max threads, one second keep-alive with core-thread timeout enabled, and
//! an unbounded FIFO queue. Because the queue never refuses work, these
//! pools stop growing at the core size; `max_size` only matters for pools
//! built with [`QueueKind::Bounded`](crate::QueueKind::Bounded). Idle pools
//! shrink all the way to zero threads.

use crate::config::PoolConfig;
use crate::thread_factory::{DefaultThreadFactory, ThreadFactory};
use crate::WorkerPool;

/// Create a bounded elastic pool with default thread creation.
#[must_use]
pub fn new_bounded_elastic_pool() -> WorkerPool {
    new_bounded_elastic_pool_with(DefaultThreadFactory::new())
}

/// Create a bounded elastic pool whose threads come from `thread_factory`.
#[must_use]
pub fn new_bounded_elastic_pool_with<F: ThreadFactory>(thread_factory: F) -> WorkerPool {
    WorkerPool::with_config(PoolConfig::bounded_elastic(), Box::new(thread_factory))
}
