//! Process-wide executors bound to a host-designated context.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use once_cell::sync::Lazy;
use spindle::{
    conditional_executor, deferred_executor, designate_main_context, main_context, main_loop,
    AffinityExecutorExt, ContextError, MainContext, WorkItem,
};

/// A host event loop that is not a `MainLoop`.
struct HostLoop {
    tx: Sender<WorkItem>,
    thread: thread::ThreadId,
}

impl MainContext for HostLoop {
    fn post(&self, work: WorkItem) {
        let _ = self.tx.send(work);
    }

    fn is_current(&self) -> bool {
        thread::current().id() == self.thread
    }

    fn name(&self) -> &str {
        "host"
    }
}

fn pump(rx: Receiver<WorkItem>) {
    while let Ok(work) = rx.recv() {
        work.run();
    }
}

static DESIGNATED: Lazy<()> = Lazy::new(|| {
    spindle_tests::init_tracing();
    let (tx, rx) = unbounded();
    let handle = thread::Builder::new()
        .name("host-ui".into())
        .spawn(move || pump(rx))
        .unwrap();
    let host = HostLoop {
        tx,
        thread: handle.thread().id(),
    };
    designate_main_context(Arc::new(host)).unwrap();
});

#[test]
fn test_executors_bind_to_designated_context() {
    Lazy::force(&DESIGNATED);
    assert_eq!(main_context().name(), "host");
    assert_eq!(deferred_executor().context().name(), "host");
    assert_eq!(conditional_executor().context().name(), "host");

    let (tx, rx) = bounded(1);
    deferred_executor().schedule_fn(move || {
        tx.send(thread::current().name().map(str::to_owned)).unwrap();
    });
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap().as_deref(),
        Some("host-ui")
    );
}

#[test]
fn test_default_loop_is_not_used() {
    Lazy::force(&DESIGNATED);
    let (tx, rx) = bounded(1);
    conditional_executor().schedule_fn(move || tx.send(()).unwrap());
    rx.recv_timeout(Duration::from_secs(5)).unwrap();

    assert_eq!(main_loop().pending(), 0);
    assert_eq!(main_loop().processed_count(), 0);
}

#[test]
fn test_second_designation_fails() {
    Lazy::force(&DESIGNATED);
    let (tx, _rx) = unbounded();
    let again = HostLoop {
        tx,
        thread: thread::current().id(),
    };
    assert_eq!(
        designate_main_context(Arc::new(again)),
        Err(ContextError::AlreadyDesignated)
    );
}
