//! A minimal designated-context implementation.
//!
//! [`MainLoop`] is a FIFO work loop pumped by whichever thread calls
//! [`MainLoop::run`]. Hosts that already own an event loop implement
//! [`MainContext`] for it instead.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use spindle_core::{
    error::{ContextError, ContextResult},
    panic_message, MainContext, WorkItem,
};

enum Message {
    Run(WorkItem),
    Quit,
}

#[derive(Default)]
struct LoopState {
    owner: Option<ThreadId>,
    quitting: bool,
    finished: bool,
}

struct Inner {
    name: String,
    sender: Sender<Message>,
    receiver: Receiver<Message>,
    state: Mutex<LoopState>,
    processed: AtomicU64,
    panicked: AtomicU64,
}

/// A single-threaded FIFO work loop.
///
/// Cloning yields another handle to the same loop.
#[derive(Clone)]
pub struct MainLoop {
    inner: Arc<Inner>,
}

impl MainLoop {
    /// Create a loop that nobody pumps yet. Posted items wait until a
    /// thread calls [`run`](Self::run).
    pub fn new(name: impl Into<String>) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                sender,
                receiver,
                state: Mutex::new(LoopState::default()),
                processed: AtomicU64::new(0),
                panicked: AtomicU64::new(0),
            }),
        }
    }

    /// Create a loop and pump it on a new thread with the same name.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the thread could not be spawned.
    pub fn spawn(name: impl Into<String>) -> io::Result<(Self, JoinHandle<()>)> {
        let main_loop = Self::new(name);
        let runner = main_loop.clone();
        let handle = thread::Builder::new()
            .name(main_loop.inner.name.clone())
            .spawn(move || {
                if let Err(err) = runner.run() {
                    warn!(error = %err, "main loop thread exited without running");
                }
            })?;
        Ok((main_loop, handle))
    }

    /// Bind the calling thread and execute posted items, one at a time in
    /// FIFO order, until [`quit`](Self::quit) is processed.
    ///
    /// A panicking item is logged and the loop keeps going. Returns
    /// immediately if the loop has already quit.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::LoopAlreadyBound`] if a thread is already
    /// running this loop.
    pub fn run(&self) -> ContextResult<()> {
        {
            let mut state = self.inner.state.lock();
            if state.owner.is_some() {
                return Err(ContextError::LoopAlreadyBound {
                    name: self.inner.name.clone(),
                });
            }
            if state.finished {
                return Ok(());
            }
            state.owner = Some(thread::current().id());
        }
        let _bound = Binding(&self.inner);
        debug!(name = %self.inner.name, "main loop started");

        while let Ok(message) = self.inner.receiver.recv() {
            match message {
                Message::Run(work) => self.inner.run_work(work),
                Message::Quit => break,
            }
        }

        self.inner.state.lock().finished = true;
        debug!(
            name = %self.inner.name,
            processed = self.processed_count(),
            "main loop quit"
        );
        Ok(())
    }

    /// Ask the loop to stop once the items already posted have run.
    ///
    /// Items posted afterwards are dropped.
    pub fn quit(&self) {
        let mut state = self.inner.state.lock();
        if !state.quitting {
            state.quitting = true;
            let _ = self.inner.sender.send(Message::Quit);
        }
    }

    /// Name given at construction.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Thread currently running the loop, if any.
    pub fn thread_id(&self) -> Option<ThreadId> {
        self.inner.state.lock().owner
    }

    /// Whether [`quit`](Self::quit) has been called.
    pub fn is_quitting(&self) -> bool {
        self.inner.state.lock().quitting
    }

    /// Number of items the loop has run, including ones that panicked.
    pub fn processed_count(&self) -> u64 {
        self.inner.processed.load(Ordering::Acquire)
    }

    /// Number of items that panicked.
    pub fn panicked_count(&self) -> u64 {
        self.inner.panicked.load(Ordering::Acquire)
    }

    /// Number of items waiting to run.
    pub fn pending(&self) -> usize {
        self.inner.receiver.len()
    }
}

impl MainContext for MainLoop {
    fn post(&self, work: WorkItem) {
        let state = self.inner.state.lock();
        if state.quitting {
            warn!(name = %self.inner.name, "dropping work item posted to a quitting main loop");
            return;
        }
        // the loop owns a receiver, so the channel cannot be disconnected
        let _ = self.inner.sender.send(Message::Run(work));
    }

    fn is_current(&self) -> bool {
        self.inner.state.lock().owner == Some(thread::current().id())
    }

    fn name(&self) -> &str {
        &self.inner.name
    }
}

impl core::fmt::Debug for MainLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("MainLoop")
            .field("name", &self.inner.name)
            .field("owner", &state.owner)
            .field("quitting", &state.quitting)
            .field("pending", &self.inner.receiver.len())
            .finish()
    }
}

impl Inner {
    fn run_work(&self, work: WorkItem) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| work.run()));
        self.processed.fetch_add(1, Ordering::AcqRel);
        if let Err(payload) = outcome {
            self.panicked.fetch_add(1, Ordering::AcqRel);
            error!(
                name = %self.name,
                panic = panic_message(payload.as_ref()),
                "work item panicked on main loop"
            );
        }
    }
}

/// Unbinds the running thread when the loop stops.
struct Binding<'a>(&'a Inner);

impl Drop for Binding<'_> {
    fn drop(&mut self) {
        self.0.state.lock().owner = None;
    }
}
