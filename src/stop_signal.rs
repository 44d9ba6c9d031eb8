use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct Inner {
    stopped: AtomicBool,
    lock: Mutex<()>,
    condvar: Condvar,
}

/// One-way termination request shared between the interrupt handler and the run loop.
#[derive(Clone, Debug, Default)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag and wakes every thread blocked in [`StopSignal::wait_timeout`].
    pub fn stop(&self) {
        self.inner.stopped.store(true, Ordering::Release);
        // Taken so a waiter cannot miss the notification between its check and its wait.
        let _guard = self.inner.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.inner.condvar.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::Acquire)
    }

    /// Blocks for `timeout` or until a stop is requested. Returns whether a stop was requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.inner.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let _wait = self.inner.condvar.wait_timeout_while(guard, timeout, |_| !self.is_stopped());
        self.is_stopped()
    }
}
