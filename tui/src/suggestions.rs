//! Holder of the suggestion list shown in the dropdown.
//!
//! Lookups complete in whatever order the network delivers them. Each dispatch is tagged with a
//! [`DispatchSeq`] and only the most recently issued dispatch may replace the list, so a slow
//! response to an old query can never overwrite a newer one.

use artist_search_protocol::Candidate;

/// Monotonic tag identifying the order in which lookups were dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DispatchSeq(u64);

impl DispatchSeq {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// The list was replaced.
    Applied { non_empty: bool },
    /// The response was overtaken by `latest` and dropped.
    Stale { latest: DispatchSeq },
}

#[derive(Debug, Default)]
pub struct SuggestionState {
    candidates: Vec<Candidate>,
    latest: u64,
}

impl SuggestionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the tag for a new dispatch. Every earlier tag becomes stale.
    pub fn begin_dispatch(&mut self) -> DispatchSeq {
        self.latest += 1;
        DispatchSeq(self.latest)
    }

    /// Replace the list with the response to dispatch `seq`, unless a newer dispatch exists.
    pub fn accept(&mut self, seq: DispatchSeq, candidates: Vec<Candidate>) -> AcceptOutcome {
        if seq.0 != self.latest {
            return AcceptOutcome::Stale {
                latest: DispatchSeq(self.latest),
            };
        }

        let non_empty = !candidates.is_empty();
        self.candidates = candidates;
        AcceptOutcome::Applied { non_empty }
    }

    /// Empty the list and invalidate every in-flight dispatch.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.latest += 1;
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(state: &SuggestionState) -> Vec<&str> {
        state
            .candidates()
            .iter()
            .map(|c| c.display_name.as_str())
            .collect()
    }

    #[test]
    fn newer_dispatch_wins_regardless_of_completion_order() {
        let mut state = SuggestionState::new();
        let older = state.begin_dispatch();
        let newer = state.begin_dispatch();

        assert_eq!(
            state.accept(newer, vec![Candidate::new("1", "Bruno Mars")]),
            AcceptOutcome::Applied { non_empty: true }
        );
        assert_eq!(
            state.accept(older, vec![Candidate::new("2", "Bruno")]),
            AcceptOutcome::Stale { latest: newer }
        );
        assert_eq!(names(&state), vec!["Bruno Mars"]);
    }

    #[test]
    fn older_response_is_dropped_once_newer_dispatch_started() {
        let mut state = SuggestionState::new();
        let older = state.begin_dispatch();
        let _newer = state.begin_dispatch();

        assert!(matches!(
            state.accept(older, vec![Candidate::new("2", "Bruno")]),
            AcceptOutcome::Stale { .. }
        ));
        assert!(state.is_empty());
    }

    #[test]
    fn clear_invalidates_in_flight_dispatches() {
        let mut state = SuggestionState::new();
        let seq = state.begin_dispatch();
        state.clear();

        assert!(matches!(
            state.accept(seq, vec![Candidate::new("1", "Bruno Mars")]),
            AcceptOutcome::Stale { .. }
        ));
        assert!(state.is_empty());
    }

    #[test]
    fn accepting_empty_list_replaces_previous_results() {
        let mut state = SuggestionState::new();
        let first = state.begin_dispatch();
        state.accept(first, vec![Candidate::new("1", "Bruno Mars")]);

        let second = state.begin_dispatch();
        assert_eq!(
            state.accept(second, Vec::new()),
            AcceptOutcome::Applied { non_empty: false }
        );
        assert!(state.is_empty());
    }
}
