//! Ordered-fallback feed fetcher.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pulse_config::FeedConfig;
use pulse_core::{Clock, FeedItem, SystemClock};

use crate::error::FeedError;
use crate::parse::parse_feed;
use crate::strategy::{Strategy, build_strategies};
use crate::transport::{FeedTransport, HttpTransport};
use crate::window::select_recent;

/// Anything that can produce the recent items of the tracked feed.
///
/// An empty vector means every source was exhausted; it is not an error.
pub trait FeedSource: Send + Sync {
    fn fetch(&self, window_days: u32) -> impl Future<Output = Vec<FeedItem>> + Send;
}

/// Tries each [`Strategy`] strictly in order and returns the first non-empty,
/// window-filtered result.
pub struct FeedFetcher<T = HttpTransport> {
    strategies: Vec<Strategy>,
    transport: T,
    clock: Arc<dyn Clock>,
    max_items: usize,
}

impl FeedFetcher<HttpTransport> {
    /// Build the production fetcher from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &FeedConfig) -> Result<Self, FeedError> {
        let transport = HttpTransport::new(Duration::from_secs(config.request_timeout_secs))?;
        Ok(Self::new(
            build_strategies(config),
            transport,
            Arc::new(SystemClock),
            config.max_items,
        ))
    }
}

impl<T: FeedTransport> FeedFetcher<T> {
    #[must_use]
    pub fn new(
        strategies: Vec<Strategy>,
        transport: T,
        clock: Arc<dyn Clock>,
        max_items: usize,
    ) -> Self {
        Self {
            strategies,
            transport,
            clock,
            max_items,
        }
    }

    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    async fn attempt(
        &self,
        strategy: &Strategy,
        window_days: u32,
    ) -> Result<Vec<FeedItem>, FeedError> {
        let body = self.transport.get(strategy).await?;
        let entries = parse_feed(&body)?;
        let total = entries.len();
        let items = select_recent(entries, self.clock.now(), window_days, self.max_items);
        tracing::debug!(strategy = %strategy.label, total, recent = items.len(), "parsed feed");
        Ok(items)
    }
}

impl<T: FeedTransport> FeedSource for FeedFetcher<T> {
    async fn fetch(&self, window_days: u32) -> Vec<FeedItem> {
        for strategy in &self.strategies {
            tracing::info!(strategy = %strategy.label, "trying feed strategy");
            match self.attempt(strategy, window_days).await {
                Ok(items) if !items.is_empty() => {
                    tracing::info!(
                        strategy = %strategy.label,
                        items = items.len(),
                        "fetched feed"
                    );
                    return items;
                }
                Ok(_) => {
                    tracing::warn!(strategy = %strategy.label, window_days, "no recent items");
                }
                Err(error) => {
                    tracing::warn!(strategy = %strategy.label, %error, "feed strategy failed");
                }
            }
        }

        tracing::error!(
            strategies = self.strategies.len(),
            "failed to fetch feed from all sources"
        );
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::StrategyKind;
    use chrono::{DateTime, TimeDelta, Utc};
    use pretty_assertions::assert_eq;
    use pulse_core::ManualClock;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn rss(items: &[(&str, DateTime<Utc>)]) -> Vec<u8> {
        let body: String = items
            .iter()
            .map(|(id, date)| {
                format!(
                    "<item><guid>{id}</guid><title>{id}</title><link>https://x/{id}</link>\
                     <description>text {id}</description><pubDate>{}</pubDate></item>",
                    date.to_rfc2822()
                )
            })
            .collect();
        format!("<rss><channel>{body}</channel></rss>").into_bytes()
    }

    /// Transport that answers from a script and records every URL requested.
    struct ScriptedTransport {
        script: HashMap<String, Result<Vec<u8>, u16>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<(&str, Result<Vec<u8>, u16>)>) -> Self {
            Self {
                script: script
                    .into_iter()
                    .map(|(url, res)| (url.to_string(), res))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl FeedTransport for ScriptedTransport {
        async fn get(&self, strategy: &Strategy) -> Result<Vec<u8>, FeedError> {
            self.calls.lock().unwrap().push(strategy.url.clone());
            match self.script.get(&strategy.url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(FeedError::Status {
                    status: *status,
                    url: strategy.url.clone(),
                }),
                None => Err(FeedError::Parse("unscripted".into())),
            }
        }
    }

    fn strategy(url: &str) -> Strategy {
        Strategy {
            label: url.to_string(),
            url: url.to_string(),
            kind: StrategyKind::Direct,
        }
    }

    fn fetcher(urls: &[&str], transport: ScriptedTransport) -> FeedFetcher<ScriptedTransport> {
        FeedFetcher::new(
            urls.iter().map(|u| strategy(u)).collect(),
            transport,
            Arc::new(ManualClock::new(now())),
            50,
        )
    }

    #[tokio::test]
    async fn stops_at_first_success_in_order() {
        let recent = rss(&[("k", now() - TimeDelta::days(1))]);
        let transport = ScriptedTransport::new(vec![
            ("s1", Err(500)),
            ("s2", Ok(b"<html>oops</html>".to_vec())),
            ("s3", Ok(recent)),
            ("s4", Ok(rss(&[("never", now())]))),
        ]);
        let fetcher = fetcher(&["s1", "s2", "s3", "s4"], transport);

        let items = fetcher.fetch(30).await;

        assert_eq!(fetcher.transport.calls(), vec!["s1", "s2", "s3"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "k");
        assert_eq!(items[0].content, "text k");
    }

    #[tokio::test]
    async fn stale_only_feed_counts_as_failure() {
        let transport = ScriptedTransport::new(vec![
            ("old", Ok(rss(&[("ancient", now() - TimeDelta::days(60))]))),
            ("new", Ok(rss(&[("fresh", now() - TimeDelta::hours(2))]))),
        ]);
        let fetcher = fetcher(&["old", "new"], transport);

        let items = fetcher.fetch(30).await;

        assert_eq!(fetcher.transport.calls(), vec!["old", "new"]);
        assert_eq!(items[0].id, "fresh");
    }

    #[tokio::test]
    async fn exhausting_every_strategy_returns_empty() {
        let transport = ScriptedTransport::new(vec![("a", Err(502)), ("b", Err(404))]);
        let fetcher = fetcher(&["a", "b", "c"], transport);

        let items = fetcher.fetch(30).await;

        assert!(items.is_empty());
        assert_eq!(fetcher.transport.calls(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn results_are_not_merged_across_strategies() {
        let transport = ScriptedTransport::new(vec![
            ("a", Ok(rss(&[("a1", now())]))),
            ("b", Ok(rss(&[("b1", now())]))),
        ]);
        let fetcher = fetcher(&["a", "b"], transport);
        let ids: Vec<String> = fetcher.fetch(30).await.into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["a1"]);
    }

    #[tokio::test]
    async fn truncates_to_max_items() {
        let items: Vec<(String, DateTime<Utc>)> = (0..75)
            .map(|n| (format!("p{n}"), now() - TimeDelta::minutes(n)))
            .collect();
        let borrowed: Vec<(&str, DateTime<Utc>)> =
            items.iter().map(|(id, d)| (id.as_str(), *d)).collect();
        let transport = ScriptedTransport::new(vec![("a", Ok(rss(&borrowed)))]);
        let fetcher = fetcher(&["a"], transport);

        let fetched = fetcher.fetch(30).await;

        assert_eq!(fetched.len(), 50);
        assert_eq!(fetched[0].id, "p0");
        assert_eq!(fetched[49].id, "p49");
    }

    #[test]
    fn from_config_builds_full_matrix() {
        let config = FeedConfig {
            account: "Acme".into(),
            ..Default::default()
        };
        let fetcher = FeedFetcher::from_config(&config).unwrap();
        assert_eq!(fetcher.strategies().len(), 3 + 2 * 2);
    }
}
