//! HTTP server configuration.

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    3001
}

fn default_environment() -> String {
    String::from("development")
}

fn default_api_prefix() -> String {
    String::from("/api/updates")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment name. `production` masks error details.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Path prefix for the developments endpoints.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            api_prefix: default_api_prefix(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Socket address string in `host:port` form.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
