//! Shared helpers for the Spindle benchmarks.

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};
use spindle::{AffinityExecutor, AffinityExecutorExt, ExecutorResult, WorkerPool};

/// Counts down completions of a batch of work items.
#[derive(Clone)]
pub struct Latch {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl Latch {
    /// A latch for `count` completions.
    pub fn new(count: usize) -> Self {
        let (tx, rx) = bounded(count.max(1));
        Self { tx, rx }
    }

    /// Record one completion.
    pub fn count_down(&self) {
        let _ = self.tx.send(());
    }

    /// Wait for `count` completions.
    pub fn wait(&self, count: usize) {
        for _ in 0..count {
            let _ = self.rx.recv();
        }
    }
}

/// Submit `count` trivial items to `pool` and wait for all of them.
///
/// # Errors
///
/// Propagates a rejection from the pool.
pub fn run_pool_batch(pool: &WorkerPool, count: usize) -> ExecutorResult<()> {
    let latch = Latch::new(count);
    for i in 0..count {
        let latch = latch.clone();
        pool.execute(move || {
            std::hint::black_box(i);
            latch.count_down();
        })?;
    }
    latch.wait(count);
    Ok(())
}

/// Schedule `count` trivial items on `exec` and wait for all of them.
pub fn run_affinity_batch(exec: &Arc<dyn AffinityExecutor>, count: usize) {
    let latch = Latch::new(count);
    for i in 0..count {
        let latch = latch.clone();
        exec.schedule_fn(move || {
            std::hint::black_box(i);
            latch.count_down();
        });
    }
    latch.wait(count);
}
