//! Trailing-edge debounce on a Tokio task.

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Delay between the last edit and the autosave write.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(350);

/// Runs only the most recently scheduled job, `delay` after it was scheduled.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `job`, cancelling the job still waiting, if any.
    ///
    /// Returns `false` (and drops `job`) outside a Tokio runtime.
    pub fn schedule<F>(&self, job: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return false;
        };
        let delay = self.delay;
        let next = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            job.await;
        });
        if let Some(previous) = self.pending.lock().replace(next) {
            previous.abort();
        }
        true
    }

    /// Drop the waiting job without running it.
    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().take() {
            pending.abort();
        }
    }

    /// Whether a scheduled job has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
