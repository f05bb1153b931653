use thiserror::Error;

use crate::infra::error::InfraError;

/// Top-level error returned from the server entry point. Request-scoped
/// failures never reach this type; they are rendered by the HTTP layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
