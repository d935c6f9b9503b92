//! The worker pool.
//!
//! Dispatch, in order:
//! 1. fewer than `core_size` live workers: spawn a worker for the item;
//! 2. otherwise offer the item to the queue;
//! 3. queue refused (bounded and full): spawn a worker if below `max_size`;
//! 4. otherwise reject.
//!
//! With an unbounded queue step 3 never happens, so the pool tops out at
//! `core_size` threads.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, trace, warn};

use spindle_core::{
    error::{ExecutorError, ExecutorResult, RejectReason},
    panic_message, WorkItem,
};

use crate::config::{PoolConfig, QueueKind};
use crate::thread_factory::ThreadFactory;

/// A bounded, elastic pool of worker threads.
///
/// Each pool is owned by whoever built it. Dropping the pool shuts it down:
/// queued items still run and the workers exit once the queue is empty.
pub struct WorkerPool {
    shared: Arc<Shared>,
}

/// State shared by the pool handle and its workers.
struct Shared {
    config: PoolConfig,
    thread_factory: Box<dyn ThreadFactory>,
    state: Mutex<State>,
    terminated: Condvar,
    receiver: Receiver<WorkItem>,
    active: AtomicUsize,
    completed: AtomicU64,
    panicked: AtomicU64,
}

/// Bookkeeping guarded by the pool lock.
struct State {
    /// Dropped on shutdown, which disconnects the queue once it drains.
    sender: Option<Sender<WorkItem>>,
    workers: usize,
    largest: usize,
}

impl State {
    fn is_terminated(&self) -> bool {
        self.sender.is_none() && self.workers == 0
    }
}

impl WorkerPool {
    /// Build a pool from an already validated configuration.
    pub(crate) fn with_config(config: PoolConfig, thread_factory: Box<dyn ThreadFactory>) -> Self {
        let (sender, receiver) = match config.queue {
            QueueKind::Unbounded => unbounded(),
            QueueKind::Bounded(capacity) => bounded(capacity),
        };

        debug!(
            core_size = config.core_size,
            max_size = config.max_size,
            keep_alive = ?config.keep_alive,
            queue = ?config.queue,
            "created worker pool"
        );

        Self {
            shared: Arc::new(Shared {
                config,
                thread_factory,
                state: Mutex::new(State {
                    sender: Some(sender),
                    workers: 0,
                    largest: 0,
                }),
                terminated: Condvar::new(),
                receiver,
                active: AtomicUsize::new(0),
                completed: AtomicU64::new(0),
                panicked: AtomicU64::new(0),
            }),
        }
    }

    /// Submit a closure for execution on a pool thread.
    ///
    /// Never blocks.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::RejectedExecution`] if the pool has been shut
    /// down, or if a bounded queue is full and the pool is at `max_size`.
    pub fn execute<F>(&self, f: F) -> ExecutorResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.execute_work(WorkItem::new(f))
    }

    /// Submit a work item for execution on a pool thread.
    ///
    /// # Errors
    ///
    /// See [`WorkerPool::execute`].
    pub fn execute_work(&self, work: WorkItem) -> ExecutorResult<()> {
        let shared = &self.shared;
        let mut state = shared.state.lock();

        if state.sender.is_none() {
            debug!("rejected work item: pool is shut down");
            return Err(ExecutorError::RejectedExecution(RejectReason::Shutdown));
        }

        let mut work = work;
        if state.workers < shared.config.core_size {
            match Shared::add_worker(shared, &mut state, Some(work)) {
                Ok(()) => return Ok(()),
                Err(returned) => work = returned,
            }
        }

        let offered = match state.sender.as_ref() {
            Some(sender) => sender.try_send(work),
            None => return Err(ExecutorError::RejectedExecution(RejectReason::Shutdown)),
        };

        match offered {
            Ok(()) => {
                // every worker may have timed out between the size check and the offer
                if state.workers == 0 {
                    let _ = Shared::add_worker(shared, &mut state, None);
                }
                Ok(())
            }
            Err(TrySendError::Full(work)) => {
                if state.workers < shared.config.max_size
                    && Shared::add_worker(shared, &mut state, Some(work)).is_ok()
                {
                    return Ok(());
                }
                let max_size = shared.config.max_size;
                debug!(max_size, "rejected work item: pool saturated");
                Err(ExecutorError::RejectedExecution(RejectReason::Saturated { max_size }))
            }
            Err(TrySendError::Disconnected(_)) => {
                Err(ExecutorError::RejectedExecution(RejectReason::Shutdown))
            }
        }
    }

    /// Stop accepting work. Items already queued still run.
    ///
    /// Calling this more than once has no further effect.
    pub fn shutdown(&self) {
        let mut state = self.shared.state.lock();
        if state.sender.take().is_some() {
            debug!(
                workers = state.workers,
                queued = self.shared.receiver.len(),
                "worker pool shutting down"
            );
        }
        if state.is_terminated() {
            self.shared.terminated.notify_all();
        }
    }

    /// Stop accepting work and return every item that has not started.
    ///
    /// Items already running are not interrupted.
    pub fn shutdown_now(&self) -> Vec<WorkItem> {
        let mut state = self.shared.state.lock();
        state.sender = None;
        let pending: Vec<WorkItem> = self.shared.receiver.try_iter().collect();
        debug!(
            workers = state.workers,
            drained = pending.len(),
            "worker pool shut down immediately"
        );
        if state.is_terminated() {
            self.shared.terminated.notify_all();
        }
        pending
    }

    /// Whether [`shutdown`](Self::shutdown) or
    /// [`shutdown_now`](Self::shutdown_now) has been called.
    pub fn is_shutdown(&self) -> bool {
        self.shared.state.lock().sender.is_none()
    }

    /// Whether the pool is shut down and every worker has exited.
    pub fn is_terminated(&self) -> bool {
        self.shared.state.lock().is_terminated()
    }

    /// Block until the pool terminates or `timeout` elapses.
    ///
    /// Returns `true` if the pool terminated. Only a shut down pool can
    /// terminate.
    pub fn await_termination(&self, timeout: Duration) -> bool {
        let mut state = self.shared.state.lock();
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            while !state.is_terminated() {
                self.shared.terminated.wait(&mut state);
            }
            return true;
        };
        while !state.is_terminated() {
            if self
                .shared
                .terminated
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                return state.is_terminated();
            }
        }
        true
    }

    /// Number of live worker threads.
    pub fn pool_size(&self) -> usize {
        self.shared.state.lock().workers
    }

    /// Highest number of live worker threads ever reached.
    pub fn largest_pool_size(&self) -> usize {
        self.shared.state.lock().largest
    }

    /// Number of workers currently running an item.
    pub fn active_count(&self) -> usize {
        self.shared.active.load(Ordering::Acquire)
    }

    /// Number of items waiting in the queue.
    pub fn queued(&self) -> usize {
        self.shared.receiver.len()
    }

    /// Number of items that finished running, including ones that panicked.
    pub fn completed_count(&self) -> u64 {
        self.shared.completed.load(Ordering::Acquire)
    }

    /// Number of items that panicked.
    pub fn panicked_count(&self) -> u64 {
        self.shared.panicked.load(Ordering::Acquire)
    }

    /// Warm-thread floor.
    pub fn core_size(&self) -> usize {
        self.shared.config.core_size
    }

    /// Thread ceiling.
    pub fn max_size(&self) -> usize {
        self.shared.config.max_size
    }

    /// Idle timeout for worker threads.
    pub fn keep_alive(&self) -> Duration {
        self.shared.config.keep_alive
    }

    /// Whether core threads also retire when idle.
    pub fn allows_core_thread_timeout(&self) -> bool {
        self.shared.config.allow_core_thread_timeout
    }

    /// The configuration this pool was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.shared.config
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl core::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("WorkerPool")
            .field("config", &self.shared.config)
            .field("workers", &state.workers)
            .field("queued", &self.shared.receiver.len())
            .field("shutdown", &state.sender.is_none())
            .finish()
    }
}

impl Shared {
    /// Spawn a worker, optionally handing it its first item.
    ///
    /// Must be called with the pool lock held. If the thread cannot be
    /// spawned the first item is handed back.
    fn add_worker(
        shared: &Arc<Self>,
        state: &mut State,
        first: Option<WorkItem>,
    ) -> Result<(), WorkItem> {
        let slot = Arc::new(Mutex::new(first));
        let worker = Worker {
            shared: Arc::clone(shared),
            first: Arc::clone(&slot),
        };

        match shared.thread_factory.new_thread().spawn(move || worker.run()) {
            Ok(handle) => {
                state.workers += 1;
                state.largest = state.largest.max(state.workers);
                trace!(
                    thread = handle.thread().name().unwrap_or("<unnamed>"),
                    workers = state.workers,
                    "spawned pool worker"
                );
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, workers = state.workers, "failed to spawn pool worker");
                match slot.lock().take() {
                    Some(work) => Err(work),
                    // nothing to hand back; callers ignore the outcome in this case
                    None => Ok(()),
                }
            }
        }
    }

    /// Wait for the next queued item, or retire the calling worker.
    ///
    /// Returns `None` once the worker has been removed from the live count.
    fn next_work(&self) -> Option<WorkItem> {
        loop {
            let timed = self.config.allow_core_thread_timeout
                || self.state.lock().workers > self.config.core_size;

            let outcome = if timed {
                self.receiver.recv_timeout(self.config.keep_alive)
            } else {
                self.receiver
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected)
            };

            match outcome {
                Ok(work) => return Some(work),
                Err(RecvTimeoutError::Timeout) => {
                    let mut state = self.state.lock();
                    // other workers may have retired while this one waited
                    let timed = self.config.allow_core_thread_timeout
                        || state.workers > self.config.core_size;
                    // the last worker stays while items are still queued
                    if timed && (state.workers > 1 || self.receiver.is_empty()) {
                        self.retire(&mut state, "idle");
                        return None;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    let mut state = self.state.lock();
                    self.retire(&mut state, "shutdown");
                    return None;
                }
            }
        }
    }

    fn retire(&self, state: &mut State, reason: &'static str) {
        state.workers -= 1;
        trace!(reason, workers = state.workers, "pool worker retired");
        if state.is_terminated() {
            self.terminated.notify_all();
        }
    }

    fn run_work(&self, work: WorkItem) {
        self.active.fetch_add(1, Ordering::AcqRel);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| work.run()));
        self.active.fetch_sub(1, Ordering::AcqRel);
        self.completed.fetch_add(1, Ordering::AcqRel);

        if let Err(payload) = outcome {
            self.panicked.fetch_add(1, Ordering::AcqRel);
            error!(
                panic = panic_message(payload.as_ref()),
                "work item panicked on pool worker"
            );
        }
    }
}

/// Body of a pool thread.
struct Worker {
    shared: Arc<Shared>,
    first: Arc<Mutex<Option<WorkItem>>>,
}

impl Worker {
    fn run(self) {
        let mut next = self.first.lock().take();
        loop {
            let work = match next.take() {
                Some(work) => work,
                None => match self.shared.next_work() {
                    Some(work) => work,
                    None => break,
                },
            };
            self.shared.run_work(work);
        }
    }
}
