//! Rate-limited lookup dispatch.
//!
//! [`ThrottledDispatcher`] decides *when* a lookup happens: triggers open a fixed window and
//! the lookup fires once, on the trailing edge. [`LookupInvoker`] decides *how*: it runs the
//! gateway call on a spawned task, bounded by a timeout, and reports back through
//! [`AppEvent::LookupCompleted`].
//!
//! The dispatcher never captures the query. At the trailing edge it reads the text through a
//! [`LiveQuery`], so the lookup always uses the latest text no matter how many triggers were
//! absorbed by the window.

use std::sync::Arc;
use std::time::Duration;

use artist_search_lookup::LookupError;
use artist_search_lookup::LookupGateway;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::query_state::LiveQuery;
use crate::suggestions::DispatchSeq;

/// Identifies one throttle window so late timer events can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleWindowId(u64);

struct OpenWindow {
    id: ThrottleWindowId,
    timer: JoinHandle<()>,
}

/// Trailing-edge throttle: at most one fire per window, and only if something triggered it.
pub struct ThrottledDispatcher {
    window: Duration,
    query: LiveQuery,
    app_event_tx: AppEventSender,
    open_window: Option<OpenWindow>,
    next_window_id: u64,
}

impl ThrottledDispatcher {
    pub fn new(window: Duration, query: LiveQuery, app_event_tx: AppEventSender) -> Self {
        Self {
            window,
            query,
            app_event_tx,
            open_window: None,
            next_window_id: 0,
        }
    }

    /// Request a lookup. Cheap to call on every keystroke.
    pub fn trigger(&mut self) {
        if let Some(open) = &self.open_window {
            tracing::trace!(window = open.id.0, "trigger absorbed by open throttle window");
            return;
        }

        let id = ThrottleWindowId(self.next_window_id);
        self.next_window_id += 1;

        let deadline = Instant::now() + self.window;
        let tx = self.app_event_tx.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tx.send(AppEvent::ThrottleWindowElapsed { window: id });
        });
        self.open_window = Some(OpenWindow { id, timer });
    }

    /// Close the window identified by `id` and return the query to look up.
    ///
    /// Returns `None` when `id` does not name the open window. The returned text is read at this
    /// moment, not when the window was opened.
    pub fn on_window_elapsed(&mut self, id: ThrottleWindowId) -> Option<String> {
        if self.open_window.as_ref().map(|open| open.id) != Some(id) {
            return None;
        }
        self.open_window = None;
        Some(self.query.current())
    }

    pub fn is_window_open(&self) -> bool {
        self.open_window.is_some()
    }
}

impl Drop for ThrottledDispatcher {
    fn drop(&mut self) {
        if let Some(open) = self.open_window.take() {
            open.timer.abort();
        }
    }
}

/// Runs gateway calls off the event loop and reports their outcome as app events.
pub struct LookupInvoker {
    gateway: Arc<dyn LookupGateway>,
    timeout: Duration,
    app_event_tx: AppEventSender,
}

impl LookupInvoker {
    pub fn new(
        gateway: Arc<dyn LookupGateway>,
        timeout: Duration,
        app_event_tx: AppEventSender,
    ) -> Self {
        Self {
            gateway,
            timeout,
            app_event_tx,
        }
    }

    /// Start a lookup tagged with `seq`. In-flight lookups are never aborted; a response that has
    /// been overtaken is dropped by whoever accepts it.
    pub fn spawn(&self, seq: DispatchSeq, query: String) {
        tracing::debug!(seq = seq.get(), query = %query, "dispatching artist lookup");
        let lookup = self.gateway.lookup(&query);
        let timeout = self.timeout;
        let deadline = Instant::now() + timeout;
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let result = match tokio::time::timeout_at(deadline, lookup).await {
                Ok(result) => result,
                Err(_) => Err(LookupError::TimedOut(timeout)),
            };
            tx.send(AppEvent::LookupCompleted { seq, query, result });
        });
    }
}
