//! Error types for feed parsing.

use thiserror::Error;

/// An error that aborts parsing of a calendar feed.
///
/// Malformed lines are skipped silently and never produce an error; only a
/// property whose value must be interpreted (a timestamp) can fail.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A `DTSTART`/`DTEND` value is not a `YYYYMMDDTHHMMSS` timestamp.
    #[error("invalid {tag} timestamp '{value}': {source}")]
    InvalidTimestamp {
        tag: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A specialized Result type for feed parsing.
pub type FeedResult<T> = Result<T, FeedError>;
