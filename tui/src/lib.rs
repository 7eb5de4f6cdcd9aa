// Forbid accidental stdout/stderr writes in the library portion of the TUI.
#![deny(clippy::print_stdout, clippy::print_stderr)]

mod app;
mod app_event;
mod app_event_sender;
mod dispatcher;
mod exit;
mod query_state;
mod scroll_state;
mod search_box;
mod search_dropdown;
mod size_stepper;
mod suggestions;
mod terminal_cleanup;
mod text_formatting;
mod version;
mod visibility;

#[cfg(test)]
mod test_support;

pub use app::AppConfig;
pub use app::run_artist_search;
pub use app_event::AppEvent;
pub use app_event_sender::AppEventSender;
pub use dispatcher::ThrottleWindowId;
pub use exit::AppExitInfo;
pub use exit::ExitReason;
pub use search_box::DEFAULT_BLUR_GRACE;
pub use search_box::DEFAULT_LOOKUP_TIMEOUT;
pub use search_box::DEFAULT_THROTTLE_WINDOW;
pub use search_box::SearchBox;
pub use search_box::SearchBoxParams;
pub use size_stepper::SizeInputError;
pub use size_stepper::SizeStepper;
pub use suggestions::DispatchSeq;
pub use version::ARTIST_SEARCH_VERSION;
pub use visibility::CloseTimerId;
pub use visibility::DropdownState;
