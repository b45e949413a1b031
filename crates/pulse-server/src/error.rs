//! HTTP error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pulse_cache::CacheError;
use serde::Serialize;
use thiserror::Error;

/// Message shown instead of error details in production.
pub const MASKED_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// An [`AppError`] bound to the deployment's disclosure policy.
#[derive(Debug)]
pub struct HttpError {
    error: AppError,
    masked: bool,
}

impl HttpError {
    pub fn new(error: impl Into<AppError>, masked: bool) -> Self {
        Self {
            error: error.into(),
            masked,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self.error {
            AppError::Cache(CacheError::NoData { .. } | CacheError::Summarize(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        tracing::error!(error = %self.error, %status, "request failed");

        let error = if self.masked {
            MASKED_MESSAGE.to_string()
        } else {
            self.error.to_string()
        };
        (
            status,
            Json(ErrorBody {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}
