//! Artist lookup gateway.
//!
//! The gateway is the boundary to the remote lookup service: it turns free text into an ordered
//! list of [`Candidate`]s. Ranking, pagination and transport are its business; callers only see
//! the final list or a [`LookupError`].

use std::future::Future;
use std::pin::Pin;

use artist_search_protocol::Candidate;

mod error;
mod http;

pub use error::LookupError;
pub use http::DEFAULT_LOOKUP_ENDPOINT;
pub use http::HttpLookupGateway;

/// Future returned by [`LookupGateway::lookup`].
///
/// Boxed and `'static` so the caller can move it onto a spawned task without borrowing the
/// gateway.
pub type LookupFuture = Pin<Box<dyn Future<Output = Result<Vec<Candidate>, LookupError>> + Send>>;

/// Looks up candidates for a free-text query.
pub trait LookupGateway: Send + Sync {
    fn lookup(&self, query: &str) -> LookupFuture;
}

/// Whether `query` carries no search terms (empty or whitespace-only).
pub fn is_blank_query(query: &str) -> bool {
    query.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_queries_are_blank() {
        assert!(is_blank_query(""));
        assert!(is_blank_query("   "));
        assert!(is_blank_query("\t\n"));
        assert!(!is_blank_query(" a "));
    }
}
