//! Artist search box: the coordination engine behind search-as-you-type.
//!
//! The box owns the query text, the throttled dispatcher, the suggestion list and the dropdown
//! visibility state machine. It runs on a single logical thread: every method takes `&mut self`
//! and all asynchronous work (throttle timers, lookups, blur grace timers) reports back as
//! [`AppEvent`]s that the owner feeds into the matching `on_*` method.
//!
//! ```text
//! keystroke -> on_query_change -> dispatcher.trigger
//!   ... trailing edge -> on_throttle_window_elapsed -> lookup (seq n)
//!   ... response      -> on_lookup_completed(seq n) -> accepted if n is the newest dispatch
//!                                                   -> dropdown opens if non-empty
//! ```

use std::sync::Arc;
use std::time::Duration;

use artist_search_lookup::LookupError;
use artist_search_lookup::LookupGateway;
use artist_search_lookup::is_blank_query;
use artist_search_protocol::ArtistMbid;
use artist_search_protocol::Candidate;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::dispatcher::LookupInvoker;
use crate::dispatcher::ThrottleWindowId;
use crate::dispatcher::ThrottledDispatcher;
use crate::query_state::QueryState;
use crate::search_dropdown::SearchDropdown;
use crate::suggestions::AcceptOutcome;
use crate::suggestions::DispatchSeq;
use crate::suggestions::SuggestionState;
use crate::visibility::CloseTimerId;
use crate::visibility::DropdownState;
use crate::visibility::VisibilityController;

pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_millis(800);
pub const DEFAULT_BLUR_GRACE: Duration = Duration::from_millis(100);
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SearchBoxParams {
    pub gateway: Arc<dyn LookupGateway>,
    pub app_event_tx: AppEventSender,
    pub throttle_window: Duration,
    pub blur_grace: Duration,
    pub lookup_timeout: Duration,
}

impl SearchBoxParams {
    pub fn new(gateway: Arc<dyn LookupGateway>, app_event_tx: AppEventSender) -> Self {
        Self {
            gateway,
            app_event_tx,
            throttle_window: DEFAULT_THROTTLE_WINDOW,
            blur_grace: DEFAULT_BLUR_GRACE,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

pub struct SearchBox {
    query: QueryState,
    dispatcher: ThrottledDispatcher,
    lookups: LookupInvoker,
    suggestions: SuggestionState,
    visibility: VisibilityController,
    dropdown: SearchDropdown,
    app_event_tx: AppEventSender,
}

impl SearchBox {
    pub fn new(params: SearchBoxParams) -> Self {
        let SearchBoxParams {
            gateway,
            app_event_tx,
            throttle_window,
            blur_grace,
            lookup_timeout,
        } = params;

        let query = QueryState::new();
        let dispatcher =
            ThrottledDispatcher::new(throttle_window, query.subscribe(), app_event_tx.clone());
        let lookups = LookupInvoker::new(gateway, lookup_timeout, app_event_tx.clone());

        Self {
            query,
            dispatcher,
            lookups,
            suggestions: SuggestionState::new(),
            visibility: VisibilityController::new(blur_grace, app_event_tx.clone()),
            dropdown: SearchDropdown::new(),
            app_event_tx,
        }
    }

    /// The user edited the input.
    pub fn on_query_change(&mut self, text: impl Into<String>) {
        self.query.set_query(text);
        if self.query.is_blank() {
            self.clear_suggestions();
        }
        self.dispatcher.trigger();
    }

    pub fn on_throttle_window_elapsed(&mut self, window: ThrottleWindowId) {
        let Some(query) = self.dispatcher.on_window_elapsed(window) else {
            return;
        };

        if is_blank_query(&query) {
            self.clear_suggestions();
            return;
        }

        let seq = self.suggestions.begin_dispatch();
        self.lookups.spawn(seq, query);
    }

    pub fn on_lookup_completed(
        &mut self,
        seq: DispatchSeq,
        query: &str,
        result: Result<Vec<Candidate>, LookupError>,
    ) {
        let candidates = match result {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::warn!(seq = seq.get(), query, "artist lookup failed: {err}");
                Vec::new()
            }
        };

        match self.suggestions.accept(seq, candidates) {
            AcceptOutcome::Applied { non_empty } => {
                tracing::debug!(
                    seq = seq.get(),
                    query,
                    count = self.suggestions.candidates().len(),
                    "accepted artist suggestions"
                );
                self.dropdown
                    .on_candidates_replaced(self.suggestions.candidates().len());
                self.visibility.on_suggestions_accepted(non_empty);
            }
            AcceptOutcome::Stale { latest } => {
                tracing::debug!(
                    seq = seq.get(),
                    latest = latest.get(),
                    query,
                    "discarding stale artist suggestions"
                );
            }
        }
    }

    pub fn on_focus(&mut self) {
        self.visibility.on_focus(!self.suggestions.is_empty());
    }

    pub fn on_blur(&mut self) {
        self.visibility.on_blur();
    }

    pub fn on_blur_grace_elapsed(&mut self, timer: CloseTimerId) {
        self.visibility.on_grace_elapsed(timer);
    }

    /// Choose the candidate with `id`: the parent is notified and the dropdown closes. Query and
    /// suggestions are left as they are.
    pub fn select(&mut self, id: ArtistMbid) {
        tracing::debug!(artist = %id, "artist selected");
        self.app_event_tx.send(AppEvent::ArtistSelected(id));
        self.visibility.close_now();
    }

    /// Choose the highlighted row, if the dropdown is open and has one.
    pub fn select_highlighted(&mut self) -> bool {
        if !self.visibility.is_open() {
            return false;
        }
        let Some(candidate) = self
            .dropdown
            .selected_index()
            .and_then(|idx| self.suggestions.candidates().get(idx))
        else {
            return false;
        };
        let id = candidate.id.clone();
        self.select(id);
        true
    }

    /// The display surface asked to close the dropdown.
    pub fn request_close(&mut self) {
        self.visibility.close_now();
    }

    pub fn move_selection_up(&mut self) {
        self.dropdown.move_up(self.suggestions.candidates().len());
    }

    pub fn move_selection_down(&mut self) {
        self.dropdown.move_down(self.suggestions.candidates().len());
    }

    pub fn query_text(&self) -> String {
        self.query.text()
    }

    pub fn candidates(&self) -> &[Candidate] {
        self.suggestions.candidates()
    }

    pub fn dropdown_state(&self) -> DropdownState {
        self.visibility.state()
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.visibility.is_open()
    }

    pub fn dropdown_height(&self) -> u16 {
        SearchDropdown::required_height(self.suggestions.candidates().len())
    }

    pub fn render_dropdown(&self, area: Rect, buf: &mut Buffer) {
        if self.visibility.is_open() {
            self.dropdown
                .render(area, buf, self.suggestions.candidates());
        }
    }

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.dropdown.on_candidates_replaced(0);
    }
}
