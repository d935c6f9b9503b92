//! Process-wide executor instances.
//!
//! The first call to [`deferred_executor`] or [`conditional_executor`] binds
//! the executor to the designated main context and caches it for the rest of
//! the process. There is no reset and no teardown: these are process-lifetime
//! resources.
//!
//! Designate a custom context with [`designate_main_context`] at process
//! start, before either executor is used. Otherwise the default
//! [`main_loop`] is designated, and the host pumps it from its main thread:
//!
//! ```no_run
//! use spindle_main::registry;
//!
//! // on the host's main thread, after startup
//! registry::main_loop().run().unwrap();
//! ```

use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use tracing::debug;

use spindle_core::{
    error::{ContextError, ContextResult},
    MainContext,
};

use crate::executor::{ConditionalAffinityExecutor, DeferredAffinityExecutor};
use crate::main_loop::MainLoop;

static DEFAULT_LOOP: Lazy<MainLoop> = Lazy::new(|| MainLoop::new("main"));

static MAIN_CONTEXT: OnceCell<Arc<dyn MainContext>> = OnceCell::new();

static DEFERRED: Lazy<DeferredAffinityExecutor> =
    Lazy::new(|| DeferredAffinityExecutor::new(Arc::clone(main_context())));

static CONDITIONAL: Lazy<ConditionalAffinityExecutor> =
    Lazy::new(|| ConditionalAffinityExecutor::new(Arc::clone(main_context())));

/// Designate the process's main context.
///
/// # Errors
///
/// Returns [`ContextError::AlreadyDesignated`] if a context was already
/// designated, including the default one designated lazily on first use.
pub fn designate_main_context(context: Arc<dyn MainContext>) -> ContextResult<()> {
    let name = context.name().to_owned();
    MAIN_CONTEXT
        .set(context)
        .map_err(|_| ContextError::AlreadyDesignated)?;
    debug!(context = %name, "designated main context");
    Ok(())
}

/// The designated main context, falling back to [`main_loop`].
pub fn main_context() -> &'static Arc<dyn MainContext> {
    MAIN_CONTEXT.get_or_init(|| {
        debug!("designating the default main loop");
        Arc::new(main_loop().clone())
    })
}

/// The default main loop. Only used if no other context was designated.
pub fn main_loop() -> &'static MainLoop {
    &DEFAULT_LOOP
}

/// The process-wide deferred executor.
pub fn deferred_executor() -> &'static DeferredAffinityExecutor {
    &DEFERRED
}

/// The process-wide conditional executor.
pub fn conditional_executor() -> &'static ConditionalAffinityExecutor {
    &CONDITIONAL
}
