//! Anthropic Messages API configuration.

use serde::{Deserialize, Serialize};

fn default_model() -> String {
    String::from("claude-sonnet-4-5")
}

const fn default_max_tokens() -> u32 {
    2000
}

fn default_endpoint() -> String {
    String::from("https://api.anthropic.com")
}

fn default_version() -> String {
    String::from("2023-06-01")
}

const fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnthropicConfig {
    /// API key sent as `x-api-key`. Required for any summarization call.
    #[serde(default)]
    pub api_key: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on generated tokens per call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Base URL; `/v1/messages` is appended.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Value of the `anthropic-version` header.
    #[serde(default = "default_version")]
    pub version: String,

    /// Request timeout for one model call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            endpoint: default_endpoint(),
            version: default_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AnthropicConfig {
    /// Check if an API key is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
