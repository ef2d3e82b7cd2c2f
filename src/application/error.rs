//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::ApiError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("Connection to XL-Deploy failed at {server}: {source}")]
    ConnectionFailed {
        server: String,
        #[source]
        source: ApiError,
    },

    #[error("encountered a fatal error {context}: {source}")]
    Remote {
        context: String,
        #[source]
        source: ApiError,
    },

    #[error("cannot serialize output: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("{0}")]
    Usage(String),

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// Wrap an API failure with a description of what was being done.
    pub fn remote(context: impl Into<String>, source: ApiError) -> Self {
        Self::Remote {
            context: context.into(),
            source,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
