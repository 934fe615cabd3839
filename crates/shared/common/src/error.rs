//! Unified error handling for the catalog core.
//!
//! `AppError` is what every repository and handler returns. Domain failures
//! are carried unchanged inside [`AppError::Domain`]; storage failures are
//! classified into `Conflict`, `Unavailable` or a raw storage error when they
//! are converted.

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Domain rule violations, propagated as raised
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Authentication & Authorization
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied: {0}")]
    Forbidden(String),

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    // Request shape
    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Infrastructure
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(sea_orm::DbErr),

    #[cfg(feature = "document")]
    #[error("Document store error")]
    Document(mongodb::error::Error),

    #[cfg(feature = "jwt")]
    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code for callers to map onto their own responses.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Domain(err) => match err {
                DomainError::Validation(_) | DomainError::Password(_) => "VALIDATION_ERROR",
                DomainError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
                DomainError::InvalidPrice(_) => "INVALID_PRICE",
                DomainError::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
                DomainError::Internal(_) => "INTERNAL_ERROR",
            },
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unavailable(_) => "UNAVAILABLE",
            AppError::Cancelled => "CANCELLED",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            #[cfg(feature = "document")]
            AppError::Document(_) => "DOCUMENT_STORE_ERROR",
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Domain(DomainError::Internal(msg)) | AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Unavailable(detail) => {
                tracing::error!("Storage unavailable: {}", detail);
                "The service is temporarily unavailable".to_string()
            }
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            #[cfg(feature = "document")]
            AppError::Document(e) => {
                tracing::error!("Document store error: {:?}", e);
                "A database error occurred".to_string()
            }
            #[cfg(feature = "jwt")]
            AppError::Jwt(e) => {
                tracing::error!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }

            // Client-facing kinds keep their message
            _ => self.to_string(),
        }
    }

    /// True for infrastructure failures a caller may retry.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AppError::Unavailable(_))
    }
}

// =============================================================================
// Storage Error Conversion
// =============================================================================

#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        use sea_orm::{DbErr, SqlErr};

        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            tracing::debug!("Unique constraint violation: {}", detail);
            return AppError::conflict("Record");
        }

        match err {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => AppError::Unavailable(err.to_string()),
            DbErr::RecordNotFound(what) => AppError::NotFound(what),
            other => AppError::Database(other),
        }
    }
}

#[cfg(feature = "document")]
impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        const DUPLICATE_KEY: i32 = 11000;

        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
                AppError::conflict("Record")
            }
            ErrorKind::Command(command) if command.code == DUPLICATE_KEY => {
                AppError::conflict("Record")
            }
            ErrorKind::ServerSelection { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::Io(_) => AppError::Unavailable(err.to_string()),
            _ => AppError::Document(err),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(entity))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound(entity.into())
    }

    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        AppError::Forbidden(reason.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        AppError::Unavailable(detail.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
