use thiserror::Error;

/// Raised when input breaks a domain rule before anything touches the
/// store. The only rule enforced at this layer today is field validation;
/// everything else (missing rows, duplicates) surfaces from the adapters.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DomainError {
    message: String,
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
