//! Router and request handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use pulse_config::MAX_WINDOW_DAYS;
use pulse_core::responses::{ApiResponse, CacheStatus, MessageResponse, RawFeedPayload, ResponsePayload};
use pulse_feed::FeedSource;
use pulse_summarize::Summarizer;
use serde::{Deserialize, Serialize};

use crate::error::HttpError;
use crate::state::AppState;

/// Build the application router.
///
/// The developments endpoints live under `api_prefix`; `/health` is always
/// at the root.
pub fn router<F, S>(state: AppState<F, S>, api_prefix: &str) -> Router
where
    F: FeedSource + 'static,
    S: Summarizer + 'static,
{
    let developments = Router::new()
        .route("/developments", get(developments::<F, S>))
        .route("/developments/raw", get(raw_feed::<F, S>))
        .route("/developments/cache/clear", post(clear_cache::<F, S>))
        .route("/developments/cache/status", get(cache_status::<F, S>));

    let root = Router::new().route("/health", get(health::<F, S>));
    let prefix = api_prefix.trim_end_matches('/');
    let root = if prefix.is_empty() {
        root.merge(developments)
    } else {
        root.nest(prefix, developments)
    };
    root.with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct DevelopmentsQuery {
    refresh: Option<String>,
}

impl DevelopmentsQuery {
    fn force_refresh(&self) -> bool {
        self.refresh.as_deref() == Some("true")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawQuery {
    days: Option<String>,
}

impl RawQuery {
    /// Requested lookback in days, capped at [`MAX_WINDOW_DAYS`]; anything
    /// unusable falls back to `default`.
    fn window_days(&self, default: u32) -> u32 {
        self.days
            .as_deref()
            .and_then(|days| days.trim().parse::<u32>().ok())
            .filter(|days| *days > 0)
            .map_or(default, |days| days.min(MAX_WINDOW_DAYS))
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub env: String,
}

async fn developments<F: FeedSource, S: Summarizer>(
    State(state): State<AppState<F, S>>,
    Query(query): Query<DevelopmentsQuery>,
) -> Result<Json<ResponsePayload>, HttpError> {
    let force = query.force_refresh();
    tracing::info!(force, "developments requested");
    let payload = state
        .cache
        .get(force)
        .await
        .map_err(|error| state.reject(error))?;
    Ok(Json(payload))
}

async fn raw_feed<F: FeedSource, S: Summarizer>(
    State(state): State<AppState<F, S>>,
    Query(query): Query<RawQuery>,
) -> Json<RawFeedPayload> {
    let days = query.window_days(state.cache.settings().window_days);
    let items = state.cache.source().fetch(days).await;
    tracing::info!(days, items = items.len(), "raw feed served");
    Json(RawFeedPayload::new(items, state.cache.now()))
}

async fn clear_cache<F: FeedSource, S: Summarizer>(
    State(state): State<AppState<F, S>>,
) -> Json<MessageResponse> {
    state.cache.clear();
    Json(MessageResponse::ok("Cache cleared successfully"))
}

async fn cache_status<F: FeedSource, S: Summarizer>(
    State(state): State<AppState<F, S>>,
) -> Json<ApiResponse<CacheStatus>> {
    Json(ApiResponse::ok(state.cache.status()))
}

async fn health<F: FeedSource, S: Summarizer>(
    State(state): State<AppState<F, S>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: state.cache.now(),
        env: state.environment.to_string(),
    })
}
