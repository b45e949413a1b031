//! Feed error types.

use thiserror::Error;

/// Errors raised by a single retrieval attempt.
///
/// The fetcher contains these per strategy; they never escape
/// [`FeedFetcher::fetch`](crate::FeedFetcher).
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP transport error, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// HTTP status code returned by the source.
        status: u16,
        /// URL that was requested.
        url: String,
    },

    /// The body was not a readable RSS document.
    #[error("Failed to parse RSS feed: {0}")]
    Parse(String),
}
