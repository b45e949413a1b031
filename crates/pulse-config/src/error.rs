//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the expected shape.
    #[error("Failed to load configuration: {0}")]
    Figment(#[from] figment::Error),

    /// A field parsed but holds a value the service cannot run with.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
