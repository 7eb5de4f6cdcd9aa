//! Owner of the text the user has typed.
//!
//! The text lives in a `watch` channel. Deferred work (the throttled dispatcher) holds a
//! [`LiveQuery`] and reads through it when it finally runs, so it always sees the text as of
//! execution time rather than whatever was current when it was scheduled.

use artist_search_lookup::is_blank_query;
use tokio::sync::watch;

pub struct QueryState {
    tx: watch::Sender<String>,
}

impl QueryState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(String::new());
        Self { tx }
    }

    /// Replace the query text. Every [`LiveQuery`] observes the new value immediately.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.tx.send_replace(text.into());
    }

    pub fn text(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Whether the current text means "no active query".
    pub fn is_blank(&self) -> bool {
        is_blank_query(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> LiveQuery {
        LiveQuery {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only handle to the current query text.
#[derive(Clone, Debug)]
pub struct LiveQuery {
    rx: watch::Receiver<String>,
}

impl LiveQuery {
    pub fn current(&self) -> String {
        self.rx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn live_query_reads_text_at_call_time() {
        let mut state = QueryState::new();
        let live = state.subscribe();
        assert_eq!(live.current(), "");

        state.set_query("Bruno");
        state.set_query("Bruno Mars");
        assert_eq!(live.current(), "Bruno Mars");
    }

    #[test]
    fn whitespace_is_kept_but_blank() {
        let mut state = QueryState::new();
        state.set_query("   ");
        assert_eq!(state.text(), "   ");
        assert!(state.is_blank());

        state.set_query(" a");
        assert!(!state.is_blank());
    }
}
