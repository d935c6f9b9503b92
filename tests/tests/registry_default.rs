//! Process-wide executors bound to the default main loop.
//!
//! The registry is process-global, so every test in this binary shares one
//! main loop, pumped by a dedicated thread that plays the host's main thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use crossbeam_channel::bounded;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use spindle::{
    conditional_executor, deferred_executor, designate_main_context, main_context, main_loop,
    AffinityExecutorExt, ContextError, MainContext, MainLoop,
};

static MAIN_THREAD: Lazy<ThreadId> = Lazy::new(|| {
    spindle_tests::init_tracing();
    let handle = thread::Builder::new()
        .name("host-main".into())
        .spawn(|| {
            let _ = main_loop().run();
        })
        .unwrap();
    handle.thread().id()
});

fn main_thread() -> ThreadId {
    *MAIN_THREAD
}

#[test]
fn test_singletons_are_stable() {
    main_thread();
    assert!(std::ptr::eq(deferred_executor(), deferred_executor()));
    assert!(std::ptr::eq(conditional_executor(), conditional_executor()));
    assert!(Arc::ptr_eq(main_context(), deferred_executor().context()));
    assert_eq!(main_context().name(), "main");
}

#[test]
fn test_late_designation_is_refused() {
    main_thread();
    let _ = deferred_executor();
    let other: Arc<dyn MainContext> = Arc::new(MainLoop::new("other"));
    assert_eq!(
        designate_main_context(other),
        Err(ContextError::AlreadyDesignated)
    );
}

#[test]
fn test_deferred_singleton_keeps_submission_order() {
    let main = main_thread();
    let log = Arc::new(Mutex::new(Vec::new()));
    let (tx, rx) = bounded(1);

    // two accessor calls, one shared queue
    let (first, second) = (deferred_executor(), deferred_executor());
    for i in 0..50 {
        let log = log.clone();
        let exec = if i % 2 == 0 { first } else { second };
        exec.schedule_fn(move || log.lock().push((i, thread::current().id())));
    }
    deferred_executor().schedule_fn(move || tx.send(()).unwrap());
    rx.recv_timeout(Duration::from_secs(5)).unwrap();

    let log = log.lock();
    assert_eq!(log.iter().map(|(i, _)| *i).collect::<Vec<_>>(), (0..50).collect::<Vec<_>>());
    assert!(log.iter().all(|(_, id)| *id == main));
}

#[test]
fn test_conditional_singleton_inline_on_main() {
    main_thread();
    let (tx, rx) = bounded(1);

    deferred_executor().schedule_fn(move || {
        let ran = Arc::new(AtomicBool::new(false));
        let r = ran.clone();
        conditional_executor().schedule_fn(move || r.store(true, Ordering::SeqCst));
        tx.send((ran.load(Ordering::SeqCst), main_context().is_current()))
            .unwrap();
    });

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), (true, true));
    assert!(!main_context().is_current());
}

#[test]
fn test_conditional_singleton_defers_off_main() {
    let main = main_thread();
    let (tx, rx) = bounded(1);

    conditional_executor().schedule_fn(move || tx.send(thread::current().id()).unwrap());
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), main);
}
