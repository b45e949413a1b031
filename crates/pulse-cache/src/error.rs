//! Cache error types.
//!
//! Errors are `Clone` so a single refresh outcome can be handed to every
//! caller waiting on it.

use std::sync::Arc;

use pulse_summarize::SummarizeError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// Every feed strategy came back empty.
    #[error("No posts found in the last {window_days} days")]
    NoData { window_days: u32 },

    /// The summarizer failed hard; the cache was left unchanged.
    #[error("Summarization failed: {0}")]
    Summarize(#[source] Arc<SummarizeError>),
}

impl From<SummarizeError> for CacheError {
    fn from(error: SummarizeError) -> Self {
        Self::Summarize(Arc::new(error))
    }
}
