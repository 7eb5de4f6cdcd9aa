//! Dropdown open/closed state machine.
//!
//! ```text
//! Closed --(focus, suggestions non-empty)--> Open
//! Closed --(non-empty suggestions accepted)--> Open
//! Open   --(blur, grace delay elapsed, no focus in between)--> Closed
//! ```
//!
//! The grace delay lets a click on a dropdown row (which blurs the input) land before the
//! dropdown disappears. There is at most one pending close per widget: a new blur replaces it and
//! a focus cancels it. Cancelled timers are aborted and, should their event already be queued,
//! no longer match the pending id.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownState {
    Closed,
    Open,
}

/// Identifies one scheduled blur close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseTimerId(u64);

struct PendingClose {
    id: CloseTimerId,
    timer: JoinHandle<()>,
}

pub struct VisibilityController {
    state: DropdownState,
    grace: Duration,
    pending_close: Option<PendingClose>,
    next_timer_id: u64,
    app_event_tx: AppEventSender,
}

impl VisibilityController {
    pub fn new(grace: Duration, app_event_tx: AppEventSender) -> Self {
        Self {
            state: DropdownState::Closed,
            grace,
            pending_close: None,
            next_timer_id: 0,
            app_event_tx,
        }
    }

    pub fn state(&self) -> DropdownState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DropdownState::Open
    }

    pub fn has_pending_close(&self) -> bool {
        self.pending_close.is_some()
    }

    pub fn on_focus(&mut self, has_suggestions: bool) {
        self.cancel_pending_close();
        if has_suggestions {
            self.transition(DropdownState::Open, "focus");
        }
    }

    pub fn on_blur(&mut self) {
        self.cancel_pending_close();

        let id = CloseTimerId(self.next_timer_id);
        self.next_timer_id += 1;

        let deadline = Instant::now() + self.grace;
        let tx = self.app_event_tx.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tx.send(AppEvent::BlurGraceElapsed { timer: id });
        });
        self.pending_close = Some(PendingClose { id, timer });
    }

    pub fn on_grace_elapsed(&mut self, id: CloseTimerId) {
        if self.pending_close.as_ref().map(|pending| pending.id) != Some(id) {
            tracing::trace!(timer = id.0, "ignoring cancelled blur close");
            return;
        }
        self.pending_close = None;
        self.transition(DropdownState::Closed, "blur");
    }

    pub fn on_suggestions_accepted(&mut self, non_empty: bool) {
        if non_empty {
            self.transition(DropdownState::Open, "results");
        }
    }

    /// Close right away, e.g. after a selection or an explicit close request.
    pub fn close_now(&mut self) {
        self.cancel_pending_close();
        self.transition(DropdownState::Closed, "close request");
    }

    fn cancel_pending_close(&mut self) {
        if let Some(pending) = self.pending_close.take() {
            pending.timer.abort();
        }
    }

    fn transition(&mut self, next: DropdownState, cause: &'static str) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, cause, "dropdown transition");
            self.state = next;
        }
    }
}

impl Drop for VisibilityController {
    fn drop(&mut self) {
        self.cancel_pending_close();
    }
}
