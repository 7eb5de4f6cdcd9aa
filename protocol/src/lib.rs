mod candidate;
mod outcome;
pub use candidate::ArtistMbid;
pub use candidate::Candidate;
pub use outcome::SearchOutcome;
