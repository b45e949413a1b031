//! Network access for a single strategy attempt.

use std::future::Future;
use std::time::Duration;

use reqwest::header::ACCEPT;

use crate::error::FeedError;
use crate::strategy::{Strategy, StrategyKind};

const RSS_ACCEPT: &str = "application/rss+xml, application/xml";

/// Retrieves the raw body behind a [`Strategy`].
///
/// The production implementation is [`HttpTransport`]; tests substitute a
/// scripted transport to observe attempt order.
pub trait FeedTransport: Send + Sync {
    fn get(&self, strategy: &Strategy) -> impl Future<Output = Result<Vec<u8>, FeedError>> + Send;
}

/// reqwest-backed transport with a per-request timeout.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("devpulse/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }
}

impl FeedTransport for HttpTransport {
    async fn get(&self, strategy: &Strategy) -> Result<Vec<u8>, FeedError> {
        let mut request = self.http.get(&strategy.url);
        if strategy.kind == StrategyKind::Relayed {
            request = request.header(ACCEPT, RSS_ACCEPT);
        }

        let resp = check_response(request.send().await?)?;
        Ok(resp.bytes().await?.to_vec())
    }
}

/// Map a non-success status to [`FeedError::Status`].
fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, FeedError> {
    if !resp.status().is_success() {
        return Err(FeedError::Status {
            status: resp.status().as_u16(),
            url: resp.url().to_string(),
        });
    }
    Ok(resp)
}
