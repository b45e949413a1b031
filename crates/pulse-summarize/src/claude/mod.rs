//! Anthropic Messages API client.

mod models;

use std::time::Duration;

use pulse_config::AnthropicConfig;

use crate::claude::models::{ErrorEnvelope, Message, MessagesRequest, MessagesResponse};
use crate::error::SummarizeError;
use crate::extract::{NO_INPUT, parse_response};
use crate::prompt::{PromptContext, build_prompt};
use crate::{SummaryOutcome, Summarizer};

pub struct AnthropicClient {
    client: reqwest::Client,
    config: AnthropicConfig,
    context: PromptContext,
}

impl AnthropicClient {
    /// Build a client for the given account and lookback window.
    ///
    /// A missing API key is not an error here; every `summarize` call reports
    /// it instead so the server can start without credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SummarizeError::Request`] if the HTTP client cannot be built.
    pub fn new(
        config: &AnthropicConfig,
        account: &str,
        window_days: u32,
    ) -> Result<Self, SummarizeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("devpulse/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
            context: PromptContext {
                account: account.trim_start_matches('@').to_string(),
                window_days,
            },
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.endpoint.trim_end_matches('/'))
    }

    async fn complete(&self, prompt: &str) -> Result<String, SummarizeError> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.version)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, %body, "anthropic API error");
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map_or(body, |envelope| envelope.error.message);
            return Err(SummarizeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response = response.json::<MessagesResponse>().await?;
        Ok(response.first_text().unwrap_or_default().to_string())
    }
}

impl Summarizer for AnthropicClient {
    async fn summarize(&self, text: &str) -> Result<SummaryOutcome, SummarizeError> {
        if !self.config.is_configured() {
            return Err(SummarizeError::MissingApiKey);
        }
        if text.trim().is_empty() {
            return Ok(SummaryOutcome::soft_error(NO_INPUT, None));
        }

        let prompt = build_prompt(&self.context, text);
        tracing::info!(
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "requesting summary"
        );
        let raw = self.complete(&prompt).await?;
        let outcome = parse_response(&raw);
        tracing::info!(
            summaries = outcome.summaries.len(),
            dropped = outcome.dropped,
            "summary parsed"
        );
        Ok(outcome)
    }
}
