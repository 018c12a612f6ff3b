use thiserror::Error;

/// Errors surfaced by reserve validation, accrual and formatting.
///
/// Every failure is returned to the caller; a computed zero is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReserveError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid snapshot field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReserveError {
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        ReserveError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by caller-supplied input rather than the arithmetic layer.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ReserveError::InvalidTimestamp(_) | ReserveError::InvalidField { .. }
        )
    }
}
