//! # pulse-core
//!
//! Core types shared across the devpulse crates:
//! - [`FeedItem`](feed::FeedItem), the normalized post produced by the fetcher
//! - [`UpdateRecord`](update::UpdateRecord) and its category/impact enums
//! - JSON response envelopes served by the HTTP surface
//! - A [`Clock`](clock::Clock) abstraction so cache freshness can be tested

pub mod clock;
pub mod feed;
pub mod responses;
pub mod update;

pub use clock::{Clock, ManualClock, SystemClock};
pub use feed::FeedItem;
pub use update::{Category, Impact, UpdateRecord};
