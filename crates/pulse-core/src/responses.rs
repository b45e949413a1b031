//! JSON response envelopes served by the HTTP surface.
//!
//! Field names follow the front end's expectations, which mix `camelCase`
//! metadata with the `snake_case` `tweet_count`. Durations are milliseconds.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::feed::FeedItem;
use crate::update::UpdateRecord;

/// Generic `{ success, data }` wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{ success, message }` returned by administrative endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// ── Developments ───────────────────────────────────────────────────

/// Time range covered by a summary run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DevelopmentsData {
    pub summaries: Vec<UpdateRecord>,
    pub period: Period,
    pub tweet_count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMetadata {
    pub last_updated: DateTime<Utc>,
    pub cache_hit: bool,
    /// Milliseconds until the cached copy goes stale.
    pub cache_expires_in: u64,
}

/// The unit stored in the update cache and returned by `GET /developments`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResponsePayload {
    pub success: bool,
    pub data: DevelopmentsData,
    pub metadata: PayloadMetadata,
}

impl ResponsePayload {
    /// Build a freshly computed payload (`cacheHit = false`).
    #[must_use]
    pub const fn fresh(
        summaries: Vec<UpdateRecord>,
        period: Period,
        tweet_count: usize,
        last_updated: DateTime<Utc>,
        ttl_ms: u64,
    ) -> Self {
        Self {
            success: true,
            data: DevelopmentsData {
                summaries,
                period,
                tweet_count,
            },
            metadata: PayloadMetadata {
                last_updated,
                cache_hit: false,
                cache_expires_in: ttl_ms,
            },
        }
    }

    /// Copy of this payload annotated as served from cache.
    #[must_use]
    pub fn as_cache_hit(&self, expires_in_ms: u64) -> Self {
        let mut copy = self.clone();
        copy.metadata.cache_hit = true;
        copy.metadata.cache_expires_in = expires_in_ms;
        copy
    }
}

// ── Cache status ───────────────────────────────────────────────────

/// Introspection data for `GET /developments/cache/status`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub has_cache: bool,
    pub age_ms: Option<u64>,
    /// Age in minutes, rounded to one decimal.
    pub age_mins: Option<f64>,
    pub ttl_ms: u64,
    pub is_expired: bool,
    pub expires_in: Option<u64>,
}

impl CacheStatus {
    #[must_use]
    pub const fn empty(ttl_ms: u64) -> Self {
        Self {
            has_cache: false,
            age_ms: None,
            age_mins: None,
            ttl_ms,
            is_expired: false,
            expires_in: None,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn occupied(age_ms: u64, ttl_ms: u64) -> Self {
        let age_mins = (age_ms as f64 / 60_000.0 * 10.0).round() / 10.0;
        Self {
            has_cache: true,
            age_ms: Some(age_ms),
            age_mins: Some(age_mins),
            ttl_ms,
            is_expired: age_ms >= ttl_ms,
            expires_in: Some(ttl_ms.saturating_sub(age_ms)),
        }
    }
}

// ── Raw feed ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RawFeedData {
    pub tweets: Vec<FeedItem>,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RawFeedMetadata {
    pub timestamp: DateTime<Utc>,
}

/// Response for `GET /developments/raw`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RawFeedPayload {
    pub success: bool,
    pub data: RawFeedData,
    pub metadata: RawFeedMetadata,
}

impl RawFeedPayload {
    #[must_use]
    pub fn new(tweets: Vec<FeedItem>, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            data: RawFeedData {
                count: tweets.len(),
                tweets,
            },
            metadata: RawFeedMetadata { timestamp },
        }
    }
}
