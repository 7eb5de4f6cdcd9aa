use serde::Deserialize;
use serde::Serialize;

use crate::ArtistMbid;

/// Result of an interactive search session, reported to whoever launched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Last artist chosen from the dropdown, if any.
    pub selected_artist: Option<ArtistMbid>,
    /// Final value of the parent-owned similar-artists limit ("web size").
    pub similar_artists_limit: i64,
}
