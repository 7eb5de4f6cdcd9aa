use artist_search_protocol::SearchOutcome;

/// Summary information produced when an artist search session exits.
#[derive(Debug, Clone)]
pub struct AppExitInfo {
    /// Selection and final web size handed back to the caller.
    pub outcome: SearchOutcome,
    /// Why the session ended.
    pub exit_reason: ExitReason,
}

/// Reason why the artist search session terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// The user requested exit (Ctrl-C).
    UserRequested,
    /// The terminal stopped delivering input events.
    InputClosed,
}
