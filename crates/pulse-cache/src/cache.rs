//! The update cache and its single-flight refresh.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use pulse_config::PulseConfig;
use pulse_core::Clock;
use pulse_core::responses::{CacheStatus, Period, ResponsePayload};
use pulse_feed::window::window_start;
use pulse_feed::{FeedSource, format_for_summary};
use pulse_summarize::Summarizer;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::error::CacheError;

type RefreshResult = Result<ResponsePayload, CacheError>;

/// Knobs the cache reads on every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub window_days: u32,
}

impl CacheSettings {
    #[must_use]
    pub const fn from_config(config: &PulseConfig) -> Self {
        Self {
            ttl: config.cache.ttl(),
            window_days: config.feed.window_days,
        }
    }

    fn ttl_ms(&self) -> u64 {
        u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: ResponsePayload,
    stored_at: DateTime<Utc>,
}

/// Clears the in-flight marker when the leading refresh finishes or is
/// dropped mid-run. Dropping the sender wakes any waiters with `Closed`.
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<Option<broadcast::Sender<RefreshResult>>>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

enum Role {
    Leader(broadcast::Sender<RefreshResult>),
    Follower(broadcast::Receiver<RefreshResult>),
}

pub struct UpdateCache<F, S> {
    source: F,
    summarizer: S,
    clock: Arc<dyn Clock>,
    settings: CacheSettings,
    slot: RwLock<Option<CacheEntry>>,
    in_flight: Mutex<Option<broadcast::Sender<RefreshResult>>>,
}

impl<F: FeedSource, S: Summarizer> UpdateCache<F, S> {
    #[must_use]
    pub fn new(source: F, summarizer: S, clock: Arc<dyn Clock>, settings: CacheSettings) -> Self {
        Self {
            source,
            summarizer,
            clock,
            settings,
            slot: RwLock::new(None),
            in_flight: Mutex::new(None),
        }
    }

    /// The feed source, for callers that want unsummarized items.
    pub const fn source(&self) -> &F {
        &self.source
    }

    pub const fn summarizer(&self) -> &S {
        &self.summarizer
    }

    pub const fn settings(&self) -> CacheSettings {
        self.settings
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Serve the cached payload if fresh, otherwise refresh.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NoData`] when the feed is empty and
    /// [`CacheError::Summarize`] when the model call fails hard. The stored
    /// entry is untouched in both cases.
    pub async fn get(&self, force_refresh: bool) -> RefreshResult {
        if !force_refresh && let Some(hit) = self.fresh_hit() {
            return Ok(hit);
        }
        self.refresh_single_flight(!force_refresh).await
    }

    /// Rebuild the payload unconditionally, joining a refresh already in
    /// flight if there is one.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`].
    pub async fn refresh(&self) -> RefreshResult {
        self.refresh_single_flight(false).await
    }

    /// Drop the stored entry. Safe to call on an empty cache.
    pub fn clear(&self) {
        let had_entry = self.write_slot().take().is_some();
        tracing::info!(had_entry, "cache cleared");
    }

    /// Describe the slot without refreshing it.
    pub fn status(&self) -> CacheStatus {
        let ttl_ms = self.settings.ttl_ms();
        self.read_slot().as_ref().map_or_else(
            || CacheStatus::empty(ttl_ms),
            |entry| CacheStatus::occupied(self.age_ms(entry), ttl_ms),
        )
    }

    fn fresh_hit(&self) -> Option<ResponsePayload> {
        let ttl_ms = self.settings.ttl_ms();
        let slot = self.read_slot();
        let entry = slot.as_ref()?;
        let age_ms = self.age_ms(entry);
        if age_ms >= ttl_ms {
            tracing::debug!(age_ms, ttl_ms, "cached payload is stale");
            return None;
        }
        tracing::debug!(age_ms, "serving cached payload");
        Some(entry.payload.as_cache_hit(ttl_ms - age_ms))
    }

    fn age_ms(&self, entry: &CacheEntry) -> u64 {
        let age = self.clock.now() - entry.stored_at;
        u64::try_from(age.num_milliseconds()).unwrap_or(0)
    }

    /// Lead a refresh or wait on the one in flight.
    ///
    /// With `serve_fresh`, a caller that becomes leader first re-checks the
    /// slot, since a refresh may have landed between its freshness check and
    /// here.
    async fn refresh_single_flight(&self, serve_fresh: bool) -> RefreshResult {
        loop {
            let role = {
                let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(sender) = in_flight.as_ref() {
                    Role::Follower(sender.subscribe())
                } else {
                    let (sender, _) = broadcast::channel(1);
                    *in_flight = Some(sender.clone());
                    Role::Leader(sender)
                }
            };

            match role {
                Role::Follower(mut receiver) => match receiver.recv().await {
                    Ok(result) => {
                        tracing::debug!("joined in-flight refresh");
                        return result;
                    }
                    Err(RecvError::Closed | RecvError::Lagged(_)) => {
                        tracing::warn!("in-flight refresh was abandoned; retrying");
                    }
                },
                Role::Leader(sender) => {
                    let guard = InFlightGuard {
                        in_flight: &self.in_flight,
                    };
                    let hit = if serve_fresh { self.fresh_hit() } else { None };
                    let result = match hit {
                        Some(hit) => Ok(hit),
                        None => self.run_pipeline().await,
                    };
                    drop(guard);
                    let _ = sender.send(result.clone());
                    return result;
                }
            }
        }
    }

    async fn run_pipeline(&self) -> RefreshResult {
        let window_days = self.settings.window_days;
        tracing::info!(window_days, "refreshing development updates");

        let items = self.source.fetch(window_days).await;
        if items.is_empty() {
            tracing::error!(window_days, "no posts available; keeping previous cache state");
            return Err(CacheError::NoData { window_days });
        }

        let text = format_for_summary(&items);
        let outcome = self.summarizer.summarize(&text).await.map_err(|error| {
            tracing::error!(%error, "summarization failed; keeping previous cache state");
            CacheError::from(error)
        })?;
        if let Some(error) = &outcome.error {
            tracing::warn!(%error, "summarizer reported a soft error; storing empty result");
        }

        let now = self.clock.now();
        let period = Period {
            start: window_start(now, window_days),
            end: now,
        };
        let payload = ResponsePayload::fresh(
            outcome.summaries,
            period,
            items.len(),
            now,
            self.settings.ttl_ms(),
        );
        *self.write_slot() = Some(CacheEntry {
            payload: payload.clone(),
            stored_at: now,
        });

        tracing::info!(
            items = items.len(),
            summaries = payload.data.summaries.len(),
            dropped = outcome.dropped,
            "development updates refreshed"
        );
        Ok(payload)
    }

    fn read_slot(&self) -> std::sync::RwLockReadGuard<'_, Option<CacheEntry>> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_slot(&self) -> std::sync::RwLockWriteGuard<'_, Option<CacheEntry>> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use pretty_assertions::assert_eq;
    use pulse_core::{Category, FeedItem, Impact, ManualClock, UpdateRecord};
    use pulse_summarize::{PARSE_FAILURE, SummarizeError, SummaryOutcome};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn item(id: &str) -> FeedItem {
        FeedItem {
            id: id.into(),
            title: id.into(),
            content: format!("post {id}"),
            published_at: start() - TimeDelta::hours(3),
            link: format!("https://x/{id}"),
        }
    }

    fn record(title: &str) -> UpdateRecord {
        UpdateRecord {
            title: title.into(),
            category: Category::Technical,
            impact: Impact::Medium,
            summary: "s".into(),
            key_points: vec![],
        }
    }

    #[derive(Default)]
    struct FakeSource {
        items: Mutex<Vec<FeedItem>>,
    }

    impl FakeSource {
        fn with(items: Vec<FeedItem>) -> Self {
            Self {
                items: Mutex::new(items),
            }
        }
    }

    impl FeedSource for FakeSource {
        async fn fetch(&self, _window_days: u32) -> Vec<FeedItem> {
            self.items.lock().unwrap().clone()
        }
    }

    #[derive(Default)]
    struct FakeSummarizer {
        calls: AtomicUsize,
        fail: AtomicBool,
        soft: AtomicBool,
        last_text: Mutex<String>,
    }

    impl Summarizer for FakeSummarizer {
        async fn summarize(&self, text: &str) -> Result<SummaryOutcome, SummarizeError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            *self.last_text.lock().unwrap() = text.to_string();
            if self.fail.load(Ordering::SeqCst) {
                return Err(SummarizeError::Api {
                    status: 500,
                    message: "boom".into(),
                });
            }
            if self.soft.load(Ordering::SeqCst) {
                return Ok(SummaryOutcome::soft_error(PARSE_FAILURE, Some("nope".into())));
            }
            Ok(SummaryOutcome {
                summaries: vec![record(&format!("run {n}"))],
                ..Default::default()
            })
        }
    }

    const TTL: Duration = Duration::from_secs(6 * 60 * 60);

    fn cache(
        source: FakeSource,
        clock: &Arc<ManualClock>,
    ) -> UpdateCache<FakeSource, FakeSummarizer> {
        UpdateCache::new(
            source,
            FakeSummarizer::default(),
            clock.clone(),
            CacheSettings {
                ttl: TTL,
                window_days: 30,
            },
        )
    }

    #[tokio::test]
    async fn first_get_refreshes_then_serves_from_cache() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(FakeSource::with(vec![item("a"), item("b")]), &clock);

        let first = cache.get(false).await.unwrap();
        assert!(!first.metadata.cache_hit);
        assert_eq!(first.metadata.cache_expires_in, 21_600_000);
        assert_eq!(first.data.tweet_count, 2);
        assert_eq!(first.data.period.end, start());
        assert_eq!(first.data.period.start, start() - TimeDelta::days(30));
        assert_eq!(first.metadata.last_updated, start());

        clock.advance(TimeDelta::minutes(10));
        let second = cache.get(false).await.unwrap();
        assert!(second.metadata.cache_hit);
        assert_eq!(second.metadata.cache_expires_in, 21_600_000 - 600_000);
        assert_eq!(second.data, first.data);
        assert_eq!(cache.summarizer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn formatted_text_reaches_the_summarizer() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(FakeSource::with(vec![item("a")]), &clock);
        cache.get(false).await.unwrap();
        assert_eq!(
            *cache.summarizer.last_text.lock().unwrap(),
            format_for_summary(&[item("a")])
        );
    }

    #[tokio::test]
    async fn entry_expires_at_ttl() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(FakeSource::with(vec![item("a")]), &clock);
        cache.get(false).await.unwrap();

        clock.advance(TimeDelta::hours(6));
        assert!(cache.status().is_expired);

        let refreshed = cache.get(false).await.unwrap();
        assert!(!refreshed.metadata.cache_hit);
        assert_eq!(refreshed.data.summaries[0].title, "run 2");
        assert_eq!(refreshed.metadata.last_updated, start() + TimeDelta::hours(6));
    }

    #[tokio::test]
    async fn force_refresh_bypasses_fresh_entry() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(FakeSource::with(vec![item("a")]), &clock);
        cache.get(false).await.unwrap();

        let forced = cache.get(true).await.unwrap();
        assert!(!forced.metadata.cache_hit);
        assert_eq!(cache.summarizer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(FakeSource::with(vec![item("a")]), &clock);
        cache.get(false).await.unwrap();
        assert!(cache.status().has_cache);

        cache.clear();
        cache.clear();
        assert_eq!(cache.status(), CacheStatus::empty(21_600_000));

        cache.get(false).await.unwrap();
        assert_eq!(cache.summarizer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn status_never_refreshes() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(FakeSource::with(vec![item("a")]), &clock);
        let status = cache.status();
        assert!(!status.has_cache);
        assert!(!status.is_expired);
        assert_eq!(cache.summarizer.calls.load(Ordering::SeqCst), 0);

        cache.get(false).await.unwrap();
        clock.advance(TimeDelta::minutes(30));
        let status = cache.status();
        assert_eq!(status.age_ms, Some(1_800_000));
        assert_eq!(status.age_mins, Some(30.0));
        assert_eq!(status.expires_in, Some(21_600_000 - 1_800_000));
        assert_eq!(cache.summarizer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_data_fails_and_leaves_cache_unchanged() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(FakeSource::default(), &clock);

        let err = cache.get(false).await.unwrap_err();
        assert!(matches!(err, CacheError::NoData { window_days: 30 }));
        assert_eq!(err.to_string(), "No posts found in the last 30 days");
        assert!(!cache.status().has_cache);
        assert_eq!(cache.summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stale_entry_is_not_served_when_refresh_fails() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(FakeSource::with(vec![item("a")]), &clock);
        cache.get(false).await.unwrap();

        clock.advance(TimeDelta::hours(7));
        cache.summarizer.fail.store(true, Ordering::SeqCst);

        let err = cache.get(false).await.unwrap_err();
        assert!(matches!(err, CacheError::Summarize(_)));
        let status = cache.status();
        assert!(status.has_cache);
        assert!(status.is_expired);
        assert_eq!(status.age_ms, Some(7 * 3_600_000));
    }

    #[tokio::test]
    async fn soft_error_result_is_still_stored() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(FakeSource::with(vec![item("a")]), &clock);
        cache.summarizer.soft.store(true, Ordering::SeqCst);

        let payload = cache.get(false).await.unwrap();
        assert!(payload.data.summaries.is_empty());
        assert_eq!(payload.data.tweet_count, 1);

        let again = cache.get(false).await.unwrap();
        assert!(again.metadata.cache_hit);
        assert_eq!(cache.summarizer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn oversized_window_period_starts_at_earliest_instant() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = UpdateCache::new(
            FakeSource::with(vec![item("a")]),
            FakeSummarizer::default(),
            clock,
            CacheSettings {
                ttl: TTL,
                window_days: u32::MAX,
            },
        );
        let payload = cache.get(false).await.unwrap();
        assert_eq!(payload.data.period.start, DateTime::<Utc>::MIN_UTC);
        assert_eq!(payload.data.period.end, start());
    }

    #[test]
    fn settings_follow_config() {
        let mut config = PulseConfig::default();
        config.cache.ttl_secs = 60;
        config.feed.window_days = 7;
        let settings = CacheSettings::from_config(&config);
        assert_eq!(settings.ttl, Duration::from_secs(60));
        assert_eq!(settings.window_days, 7);
        assert_eq!(settings.ttl_ms(), 60_000);
    }
}
