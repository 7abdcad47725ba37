use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// Delay applied to search input before it is used for filtering
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Single-slot, latest-wins timer for search input.
///
/// Each scheduled query replaces the pending one; a query is published
/// on the watch channel only once it has stood for the full delay.
/// Must be driven from within a tokio runtime.
pub struct SearchDebouncer {
    delay: Duration,
    settled: Arc<watch::Sender<String>>,
    receiver: watch::Receiver<String>,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        let (settled, receiver) = watch::channel(String::new());
        Self {
            delay,
            settled: Arc::new(settled),
            receiver,
            pending: None,
        }
    }

    pub fn schedule(&mut self, query: String) {
        self.cancel_pending();

        let settled = Arc::clone(&self.settled);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            trace!(query = %query, "Search query settled");
            settled.send_replace(query);
        }));
    }

    /// Drop any pending query and publish the empty query right away.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.settled.send_replace(String::new());
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    /// Last settled query
    pub fn current(&self) -> String {
        self.receiver.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.settled.subscribe()
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
