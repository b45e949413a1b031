//! # pulse-feed
//!
//! Retrieves the tracked account's RSS feed through an ordered list of
//! fallback strategies:
//! - each configured mirror directly (the first mirror is the primary)
//! - the leading mirrors again through each pass-through relay
//!
//! Strategies are attempted one at a time. Each failure is logged and
//! contained; the first strategy that yields at least one item inside the
//! lookback window wins. When every strategy fails the result is an empty
//! list, never an error.
//!
//! [`format_for_summary`] renders the fetched items as the text block handed
//! to the summarizer.

mod error;
mod fetcher;
mod format;
pub mod parse;
pub mod strategy;
mod transport;
pub mod window;

pub use error::FeedError;
pub use fetcher::{FeedFetcher, FeedSource};
pub use format::format_for_summary;
pub use strategy::{Strategy, StrategyKind, build_strategies};
pub use transport::{FeedTransport, HttpTransport};
