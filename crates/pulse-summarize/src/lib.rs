//! # pulse-summarize
//!
//! Turns the formatted feed text into structured [`UpdateRecord`]s by asking
//! a language model for a JSON array and reading it back tolerantly.
//!
//! Failures come in two kinds. Hard failures (no API key, transport errors,
//! non-success responses) are [`SummarizeError`]s. Soft failures (empty
//! input, unreadable output) are a successful [`SummaryOutcome`] with no
//! records and `error` set.

mod claude;
mod error;
pub mod extract;
pub mod prompt;

use std::future::Future;

use pulse_core::UpdateRecord;

pub use claude::AnthropicClient;
pub use error::SummarizeError;
pub use extract::{NO_INPUT, PARSE_FAILURE};

/// Result of one summarization call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryOutcome {
    pub summaries: Vec<UpdateRecord>,
    /// Soft error description; `None` on success.
    pub error: Option<String>,
    /// Raw model text, kept for diagnostics.
    pub raw_response: Option<String>,
    /// Array elements that failed validation and were discarded.
    pub dropped: usize,
}

impl SummaryOutcome {
    #[must_use]
    pub fn soft_error(error: &str, raw_response: Option<String>) -> Self {
        Self {
            summaries: Vec::new(),
            error: Some(error.to_string()),
            raw_response,
            dropped: 0,
        }
    }
}

pub trait Summarizer: Send + Sync {
    fn summarize(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<SummaryOutcome, SummarizeError>> + Send;
}
