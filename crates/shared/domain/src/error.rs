//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (storage, tokens, transport).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Construction-time invariant violated (negative money, empty field, unknown role)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Comparison attempted between two different currencies
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },

    /// Offer price is not strictly below the original price
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// State-machine operation not permitted from the current state
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Password-related errors
    #[error("Password error: {0}")]
    Password(String),

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a currency mismatch error
    pub fn currency_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        DomainError::CurrencyMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create an invalid price error
    pub fn invalid_price(msg: impl Into<String>) -> Self {
        DomainError::InvalidPrice(msg.into())
    }

    /// Create an invalid transition error, e.g.
    /// `cannot update details of offer while PENDING_VALIDATION`
    pub fn transition(entity: &str, action: &str, state: impl std::fmt::Display) -> Self {
        DomainError::InvalidStateTransition(format!(
            "cannot {} {} while {}",
            action, entity, state
        ))
    }

    /// Create a password error
    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Reject empty or whitespace-only text fields.
pub(crate) fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
