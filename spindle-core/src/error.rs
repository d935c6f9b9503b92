//! Error types for the Spindle executors.

use thiserror::Error;

/// Why a worker pool refused a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The pool was shut down before the item was submitted
    Shutdown,
    /// The queue refused the item and the pool is already at its ceiling
    Saturated {
        /// Thread ceiling of the pool that refused the item
        max_size: usize,
    },
}

impl core::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Shutdown => write!(f, "pool has been shut down"),
            Self::Saturated { max_size } => {
                write!(f, "queue is full and pool is at its ceiling of {max_size} threads")
            }
        }
    }
}

/// Errors returned when submitting work to an executor.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// The executor did not accept the work item
    #[error("work item rejected: {0}")]
    RejectedExecution(RejectReason),
}

impl ExecutorError {
    /// Whether this rejection was caused by a shut down executor.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        matches!(self, Self::RejectedExecution(RejectReason::Shutdown))
    }
}

/// Errors raised while validating an explicit pool configuration.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A pool must be allowed at least one thread
    #[error("max_size must be at least 1")]
    ZeroMaxSize,
    /// The warm-thread floor cannot exceed the thread ceiling
    #[error("core_size ({core}) cannot exceed max_size ({max})")]
    CoreExceedsMax {
        /// Requested core size
        core: usize,
        /// Requested max size
        max: usize,
    },
    /// A bounded queue needs room for at least one item
    #[error("bounded queue capacity must be at least 1")]
    ZeroQueueCapacity,
}

/// Errors raised while designating or pumping the main context.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// A main context has already been designated for this process
    #[error("a main context has already been designated")]
    AlreadyDesignated,
    /// The loop is already being run by a thread
    #[error("main loop '{name}' is already running")]
    LoopAlreadyBound {
        /// Name of the loop
        name: String,
    },
}

/// A result type for executor submissions.
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// A result type for pool configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A result type for main-context management.
pub type ContextResult<T> = Result<T, ContextError>;
