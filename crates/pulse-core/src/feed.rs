//! Normalized feed items.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One post from the tracked account, normalized from a raw RSS item.
///
/// `id` is the source `guid` when present, otherwise the link. Uniqueness is
/// best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    /// Plain-text body with markup stripped. Empty when the source had none.
    pub content: String,
    pub published_at: DateTime<Utc>,
    pub link: String,
}
