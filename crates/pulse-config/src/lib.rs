//! # pulse-config
//!
//! Layered configuration loading for devpulse using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DEVPULSE_*` prefix, `__` as separator)
//! 2. Project-level `.devpulse/config.toml`
//! 3. User-level `~/.config/devpulse/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DEVPULSE_ANTHROPIC__API_KEY` -> `anthropic.api_key`,
//! `DEVPULSE_FEED__WINDOW_DAYS` -> `feed.window_days`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use pulse_config::PulseConfig;
//!
//! let config = PulseConfig::load_with_dotenv().expect("config");
//! if !config.anthropic.is_configured() {
//!     eprintln!("summaries are disabled until an API key is set");
//! }
//! ```

mod anthropic;
mod cache;
mod error;
mod feed;
mod server;

pub use anthropic::AnthropicConfig;
pub use cache::CacheConfig;
pub use error::ConfigError;
pub use feed::{FeedConfig, MAX_WINDOW_DAYS, RELAY_URL_PLACEHOLDER};
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PulseConfig {
    #[serde(default)]
    pub anthropic: AnthropicConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl PulseConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".devpulse/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("DEVPULSE_").split("__"))
    }

    /// Reject values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.window_days == 0 {
            return Err(invalid("feed.window_days", "must be at least 1"));
        }
        if self.feed.window_days > MAX_WINDOW_DAYS {
            return Err(invalid(
                "feed.window_days",
                &format!("must be at most {MAX_WINDOW_DAYS}"),
            ));
        }
        if self.feed.max_items == 0 {
            return Err(invalid("feed.max_items", "must be at least 1"));
        }
        if self.cache.ttl_secs == 0 {
            return Err(invalid("cache.ttl_secs", "must be at least 1"));
        }
        if let Some(relay) = self
            .feed
            .relays
            .iter()
            .find(|r| !r.contains(RELAY_URL_PLACEHOLDER))
        {
            return Err(invalid(
                "feed.relays",
                &format!("'{relay}' has no {RELAY_URL_PLACEHOLDER} placeholder"),
            ));
        }
        let prefix = &self.server.api_prefix;
        if !prefix.starts_with('/') {
            return Err(invalid("server.api_prefix", "must start with '/'"));
        }
        if prefix.len() == 1 || prefix.ends_with('/') {
            return Err(invalid(
                "server.api_prefix",
                "must name a path segment and not end with '/'",
            ));
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("devpulse").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
