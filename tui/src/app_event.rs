//! Application-level events used to coordinate the search box and its parent.

use artist_search_lookup::LookupError;
use artist_search_protocol::ArtistMbid;
use artist_search_protocol::Candidate;

use crate::dispatcher::ThrottleWindowId;
use crate::suggestions::DispatchSeq;
use crate::visibility::CloseTimerId;

#[derive(Debug)]
pub enum AppEvent {
    /// Trailing edge of a throttle window opened by the dispatcher.
    ThrottleWindowElapsed { window: ThrottleWindowId },

    /// Result of an asynchronous artist lookup. `seq` identifies the dispatch so the search box
    /// can drop responses that were overtaken by a newer dispatch; `query` echoes the text that
    /// was looked up.
    LookupCompleted {
        seq: DispatchSeq,
        query: String,
        result: Result<Vec<Candidate>, LookupError>,
    },

    /// The grace delay after a blur ran out without an intervening focus.
    BlurGraceElapsed { timer: CloseTimerId },

    /// A dropdown row was chosen. Handled by the parent.
    ArtistSelected(ArtistMbid),

    /// The size stepper asks the parent to commit a new similar-artists limit.
    SimilarArtistsLimitChanged(i64),
}
