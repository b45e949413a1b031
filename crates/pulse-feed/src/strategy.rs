//! Retrieval strategy descriptors.
//!
//! The fallback matrix is plain data: every mirror on its own, then the
//! leading mirrors again through each relay (relay-major). Adding or removing
//! a source is a configuration change.

use pulse_config::{FeedConfig, RELAY_URL_PLACEHOLDER};

/// How a strategy reaches the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Request the mirror directly.
    Direct,
    /// Request the mirror through a pass-through relay.
    Relayed,
}

/// One concrete way to retrieve the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    /// Human-readable label used in logs (e.g. `mirror:https://a via relay:https://r`).
    pub label: String,
    /// Fully resolved URL to request.
    pub url: String,
    pub kind: StrategyKind,
}

impl Strategy {
    #[must_use]
    pub fn direct(mirror: &str, feed_url: String) -> Self {
        Self {
            label: format!("mirror:{mirror}"),
            url: feed_url,
            kind: StrategyKind::Direct,
        }
    }

    /// Wrap `feed_url` in a relay template, percent-encoding the target.
    #[must_use]
    pub fn relayed(mirror: &str, relay_template: &str, feed_url: &str) -> Self {
        let url = relay_template.replace(
            RELAY_URL_PLACEHOLDER,
            &urlencoding::encode(feed_url),
        );
        let relay_host = relay_template
            .split(RELAY_URL_PLACEHOLDER)
            .next()
            .unwrap_or(relay_template);
        Self {
            label: format!("mirror:{mirror} via relay:{relay_host}"),
            url,
            kind: StrategyKind::Relayed,
        }
    }
}

/// Build the ordered fallback list for `config`.
#[must_use]
pub fn build_strategies(config: &FeedConfig) -> Vec<Strategy> {
    let direct = config
        .mirrors
        .iter()
        .map(|mirror| Strategy::direct(mirror, config.feed_url(mirror)));

    let relayed = config.relays.iter().flat_map(|relay| {
        config
            .mirrors
            .iter()
            .take(config.relay_mirror_limit)
            .map(move |mirror| Strategy::relayed(mirror, relay, &config.feed_url(mirror)))
    });

    direct.chain(relayed).collect()
}
