//! Summarizer error types.
//!
//! Only hard failures live here. A response that cannot be parsed is a soft
//! failure reported through [`SummaryOutcome::error`](crate::SummaryOutcome).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummarizeError {
    /// No API key is configured. Never retried.
    #[error("anthropic.api_key is not set; add DEVPULSE_ANTHROPIC__API_KEY to the environment or .env")]
    MissingApiKey,

    /// HTTP transport error, including timeouts.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The model endpoint answered with an error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// Error message or response body.
        message: String,
    },
}
