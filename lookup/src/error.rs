use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid lookup endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("lookup request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("lookup service returned HTTP {status}")]
    Status { status: u16 },

    #[error("failed to decode lookup response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("lookup timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
}
