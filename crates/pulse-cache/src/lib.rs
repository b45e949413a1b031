//! # pulse-cache
//!
//! Holds the one summarized payload the service serves and decides when to
//! rebuild it.
//!
//! The slot moves through `EMPTY -> FRESH -> STALE -> FRESH` and back to
//! `EMPTY` on [`UpdateCache::clear`]. Staleness is detected lazily on read;
//! nothing refreshes in the background.
//!
//! Refreshes are single-flight. The first caller to need one runs the
//! fetch, format and summarize pipeline; callers arriving meanwhile wait for
//! that run's outcome instead of starting their own.

mod cache;
mod error;

pub use cache::{CacheSettings, UpdateCache};
pub use error::CacheError;
