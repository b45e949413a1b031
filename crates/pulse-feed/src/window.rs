//! Time-window filtering and normalization.

use chrono::{DateTime, TimeDelta, Utc};
use pulse_core::FeedItem;

use crate::parse::{RawEntry, html_to_text};

/// Parse an RSS date: RFC 2822 first, RFC 3339 as a fallback.
#[must_use]
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Normalize one entry. Entries without a parseable date yield `None`.
#[must_use]
pub fn normalize(entry: RawEntry) -> Option<FeedItem> {
    let published_at = entry.published.as_deref().and_then(parse_published)?;
    let link = entry.link.unwrap_or_default();
    Some(FeedItem {
        id: entry.guid.unwrap_or_else(|| link.clone()),
        title: entry.title.unwrap_or_default(),
        content: entry.body.as_deref().map(html_to_text).unwrap_or_default(),
        published_at,
        link,
    })
}

/// Start of a `window_days` lookback ending at `now`, saturating at the
/// earliest representable instant.
#[must_use]
pub fn window_start(now: DateTime<Utc>, window_days: u32) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(window_days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Keep entries published strictly after `now - window_days`, in document
/// order, truncated to the first `max_items`.
#[must_use]
pub fn select_recent(
    entries: Vec<RawEntry>,
    now: DateTime<Utc>,
    window_days: u32,
    max_items: usize,
) -> Vec<FeedItem> {
    let cutoff = window_start(now, window_days);
    entries
        .into_iter()
        .filter_map(normalize)
        .filter(|item| item.published_at > cutoff)
        .take(max_items)
        .collect()
}
