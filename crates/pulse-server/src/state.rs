use std::sync::Arc;

use pulse_cache::UpdateCache;
use pulse_config::ServerConfig;

use crate::error::{AppError, HttpError};

/// Shared handler state.
pub struct AppState<F, S> {
    pub cache: Arc<UpdateCache<F, S>>,
    pub environment: Arc<str>,
    production: bool,
}

impl<F, S> Clone for AppState<F, S> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            environment: Arc::clone(&self.environment),
            production: self.production,
        }
    }
}

impl<F, S> AppState<F, S> {
    pub fn new(cache: UpdateCache<F, S>, server: &ServerConfig) -> Self {
        Self {
            cache: Arc::new(cache),
            environment: Arc::from(server.environment.as_str()),
            production: server.is_production(),
        }
    }

    /// Wrap an error with this deployment's masking policy.
    pub fn reject(&self, error: impl Into<AppError>) -> HttpError {
        HttpError::new(error, self.production)
    }
}
