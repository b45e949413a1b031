//! Feed source configuration.
//!
//! `mirrors` are base URLs serving `{mirror}/{account}/rss`. The first mirror
//! is the primary source. `relays` are pass-through endpoints whose template
//! contains a `{url}` placeholder for the percent-encoded target.

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the encoded mirror URL in relay templates.
pub const RELAY_URL_PLACEHOLDER: &str = "{url}";

fn default_mirrors() -> Vec<String> {
    vec![
        String::from("https://nitter.net"),
        String::from("https://nitter.poast.org"),
        String::from("https://nitter.1d4.us"),
    ]
}

fn default_relays() -> Vec<String> {
    vec![
        String::from("https://api.allorigins.win/raw?url={url}"),
        String::from("https://corsproxy.io/?{url}"),
    ]
}

const fn default_relay_mirror_limit() -> usize {
    2
}

/// Upper bound on any lookback window, in days (about a century).
pub const MAX_WINDOW_DAYS: u32 = 36_500;

const fn default_window_days() -> u32 {
    30
}

const fn default_max_items() -> usize {
    50
}

const fn default_request_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Account handle whose feed is tracked (without `@`).
    #[serde(default)]
    pub account: String,

    #[serde(default = "default_mirrors")]
    pub mirrors: Vec<String>,

    #[serde(default = "default_relays")]
    pub relays: Vec<String>,

    /// How many leading mirrors are retried through each relay.
    #[serde(default = "default_relay_mirror_limit")]
    pub relay_mirror_limit: usize,

    /// Lookback window in days.
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Maximum items returned by one fetch.
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Timeout for each individual strategy attempt, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            mirrors: default_mirrors(),
            relays: default_relays(),
            relay_mirror_limit: default_relay_mirror_limit(),
            window_days: default_window_days(),
            max_items: default_max_items(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl FeedConfig {
    /// Check if there is an account and at least one mirror to read from.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.account.trim().is_empty() && !self.mirrors.is_empty()
    }

    /// RSS URL of the tracked account on `mirror`.
    #[must_use]
    pub fn feed_url(&self, mirror: &str) -> String {
        format!(
            "{}/{}/rss",
            mirror.trim_end_matches('/'),
            self.account.trim().trim_start_matches('@')
        )
    }
}
