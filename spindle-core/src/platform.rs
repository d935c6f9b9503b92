//! Processor-count derived constants.
//!
//! The pool sizing policy is derived once per process from the number of
//! available processing units: a warm floor of `cpus + 1` threads and a
//! ceiling of `2 * cpus + 1`, with idle threads expiring after one second.

use core::time::Duration;
use once_cell::sync::Lazy;

static CPU_COUNT: Lazy<usize> = Lazy::new(|| num_cpus::get().max(1));

/// How long an idle pool thread waits for work before it may retire.
pub const KEEP_ALIVE: Duration = Duration::from_secs(1);

/// Number of available processing units, read once and cached.
#[must_use]
pub fn cpu_count() -> usize {
    *CPU_COUNT
}

/// Warm-thread floor for a machine with `cpus` processing units.
#[must_use]
pub const fn core_size_for(cpus: usize) -> usize {
    cpus + 1
}

/// Thread ceiling for a machine with `cpus` processing units.
#[must_use]
pub const fn max_size_for(cpus: usize) -> usize {
    cpus * 2 + 1
}

/// Warm-thread floor for this process.
#[must_use]
pub fn core_pool_size() -> usize {
    core_size_for(cpu_count())
}

/// Thread ceiling for this process.
#[must_use]
pub fn max_pool_size() -> usize {
    max_size_for(cpu_count())
}
