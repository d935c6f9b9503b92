//! Pool configuration.

use core::time::Duration;

use spindle_core::{
    error::{ConfigError, ConfigResult},
    platform,
};

use crate::thread_factory::{DefaultThreadFactory, ThreadFactory};
use crate::WorkerPool;

/// Backing queue used for work that cannot immediately get a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    /// FIFO queue that never refuses an item.
    ///
    /// With this queue the pool grows only up to `core_size`; `max_size`
    /// is never reached through submission.
    Unbounded,
    /// FIFO queue holding at most the given number of items. Once it is
    /// full the pool grows towards `max_size`, then rejects.
    Bounded(usize),
}

/// Sizing and timeout policy of a [`WorkerPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Threads spawned eagerly (one per submission) before work is queued
    pub core_size: usize,
    /// Absolute thread ceiling
    pub max_size: usize,
    /// How long an idle thread waits for work before it may retire
    pub keep_alive: Duration,
    /// Whether threads within `core_size` may also retire when idle
    pub allow_core_thread_timeout: bool,
    /// Queue for work that cannot get a thread immediately
    pub queue: QueueKind,
}

impl PoolConfig {
    /// The bounded elastic policy for this process:
    /// `cpus + 1` core threads, `2 * cpus + 1` max, one second keep-alive,
    /// core-thread timeout enabled, unbounded FIFO queue.
    #[must_use]
    pub fn bounded_elastic() -> Self {
        Self::for_cpu_count(platform::cpu_count())
    }

    /// The bounded elastic policy for a machine with `cpus` processing units.
    #[must_use]
    pub fn for_cpu_count(cpus: usize) -> Self {
        let cpus = cpus.max(1);
        Self {
            core_size: platform::core_size_for(cpus),
            max_size: platform::max_size_for(cpus),
            keep_alive: platform::KEEP_ALIVE,
            allow_core_thread_timeout: true,
            queue: QueueKind::Unbounded,
        }
    }

    /// Check that the configuration describes a pool that can run work.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_size == 0 {
            return Err(ConfigError::ZeroMaxSize);
        }
        if self.core_size > self.max_size {
            return Err(ConfigError::CoreExceedsMax {
                core: self.core_size,
                max: self.max_size,
            });
        }
        if self.queue == QueueKind::Bounded(0) {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::bounded_elastic()
    }
}

/// Builder for pools that deviate from the bounded elastic defaults.
///
/// # Examples
///
/// ```
/// use spindle_pool::{PoolBuilder, QueueKind};
/// use std::time::Duration;
///
/// let pool = PoolBuilder::new()
///     .core_size(1)
///     .max_size(4)
///     .keep_alive(Duration::from_millis(200))
///     .queue(QueueKind::Bounded(16))
///     .thread_name("render")
///     .build()
///     .unwrap();
///
/// assert_eq!(pool.core_size(), 1);
/// assert_eq!(pool.max_size(), 4);
/// ```
pub struct PoolBuilder {
    config: PoolConfig,
    thread_factory: Option<Box<dyn ThreadFactory>>,
}

impl PoolBuilder {
    /// Start from the bounded elastic defaults of this process.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(PoolConfig::bounded_elastic())
    }

    /// Start from an explicit configuration.
    #[must_use]
    pub fn from_config(config: PoolConfig) -> Self {
        Self {
            config,
            thread_factory: None,
        }
    }

    /// Set the warm-thread floor.
    #[must_use]
    pub fn core_size(mut self, size: usize) -> Self {
        self.config.core_size = size;
        self
    }

    /// Set the thread ceiling.
    #[must_use]
    pub fn max_size(mut self, size: usize) -> Self {
        self.config.max_size = size;
        self
    }

    /// Set the idle timeout.
    #[must_use]
    pub fn keep_alive(mut self, keep_alive: Duration) -> Self {
        self.config.keep_alive = keep_alive;
        self
    }

    /// Allow or forbid core threads to retire when idle.
    #[must_use]
    pub fn allow_core_thread_timeout(mut self, allow: bool) -> Self {
        self.config.allow_core_thread_timeout = allow;
        self
    }

    /// Choose the backing queue.
    #[must_use]
    pub fn queue(mut self, queue: QueueKind) -> Self {
        self.config.queue = queue;
        self
    }

    /// Use a custom thread-creation policy.
    #[must_use]
    pub fn thread_factory<F: ThreadFactory>(mut self, factory: F) -> Self {
        self.thread_factory = Some(Box::new(factory));
        self
    }

    /// Name pool threads `{prefix}-{n}`.
    #[must_use]
    pub fn thread_name(self, prefix: impl Into<String>) -> Self {
        self.thread_factory(crate::NamedThreadFactory::new(prefix))
    }

    /// Build the pool.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn build(self) -> ConfigResult<WorkerPool> {
        self.config.validate()?;
        let factory = self
            .thread_factory
            .unwrap_or_else(|| Box::new(DefaultThreadFactory::new()));
        Ok(WorkerPool::with_config(self.config, factory))
    }
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for PoolBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PoolBuilder")
            .field("config", &self.config)
            .field("custom_thread_factory", &self.thread_factory.is_some())
            .finish()
    }
}
