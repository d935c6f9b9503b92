//! Thread-creation policies for pool workers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Process-wide sequence used to tell default-named pools apart.
static POOL_SEQUENCE: AtomicUsize = AtomicUsize::new(1);

/// Decides how each pool thread is created.
///
/// The pool calls [`ThreadFactory::new_thread`] once per worker and spawns
/// the worker body with the returned builder.
pub trait ThreadFactory: Send + Sync + 'static {
    /// Configure the next worker thread (name, stack size).
    fn new_thread(&self) -> thread::Builder;
}

impl<F> ThreadFactory for F
where
    F: Fn() -> thread::Builder + Send + Sync + 'static,
{
    fn new_thread(&self) -> thread::Builder {
        self()
    }
}

/// Names threads `spindle-pool-{pool}-worker-{n}`.
#[derive(Debug)]
pub struct DefaultThreadFactory {
    pool: usize,
    next: AtomicUsize,
}

impl DefaultThreadFactory {
    /// Create a factory with a fresh pool number.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pool: POOL_SEQUENCE.fetch_add(1, Ordering::Relaxed),
            next: AtomicUsize::new(1),
        }
    }
}

impl Default for DefaultThreadFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadFactory for DefaultThreadFactory {
    fn new_thread(&self) -> thread::Builder {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        thread::Builder::new().name(format!("spindle-pool-{}-worker-{n}", self.pool))
    }
}

/// Names threads `{prefix}-{n}` and optionally sets their stack size.
#[derive(Debug)]
pub struct NamedThreadFactory {
    prefix: String,
    stack_size: Option<usize>,
    next: AtomicUsize,
}

impl NamedThreadFactory {
    /// Create a factory for the given name prefix.
    ///
    /// The prefix must not contain null bytes.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            stack_size: None,
            next: AtomicUsize::new(1),
        }
    }

    /// Request a stack size (in bytes) for every thread.
    #[must_use]
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }
}

impl ThreadFactory for NamedThreadFactory {
    fn new_thread(&self) -> thread::Builder {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let mut builder = thread::Builder::new().name(format!("{}-{n}", self.prefix));
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        builder
    }
}
