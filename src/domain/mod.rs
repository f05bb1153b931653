pub mod attachment;
pub mod entities;
pub mod error;

pub use error::DomainError;

/// Reject blank required fields before anything touches the store.
pub fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("`{field}` is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_field_is_rejected() {
        assert!(ensure_non_empty("", "title").is_err());
        assert!(ensure_non_empty("   ", "title").is_err());
        assert!(ensure_non_empty("Hello", "title").is_ok());
    }

    #[test]
    fn validation_error_names_the_field() {
        let err = ensure_non_empty("", "excerpt").unwrap_err();
        assert_eq!(err.to_string(), "`excerpt` is required");
    }
}
