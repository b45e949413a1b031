//! Update cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Six hours.
const fn default_ttl_secs() -> u64 {
    6 * 60 * 60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// How long a summarized payload stays fresh, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}
