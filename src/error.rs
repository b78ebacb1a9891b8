//! Error handling module
//!
//! Application error type wrapping domain, configuration and internal failures.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Domain errors
    #[error(transparent)]
    Domain(#[from] crate::domain::DomainError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        use crate::domain::DomainError;

        match self {
            AppError::Domain(domain_err) => match domain_err {
                DomainError::DuplicateId { .. } => "duplicate_id",
                DomainError::NotFound { .. } => "not_found",
                DomainError::BookUnavailable { .. } => "book_unavailable",
                DomainError::NoOpenLoan { .. } => "no_open_loan",
                DomainError::InvalidInput(_) => "invalid_input",
            },
            AppError::Config(_) => "config_error",
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "internal_error"
            }
        }
    }

    /// The domain error, if this is one
    pub fn as_domain(&self) -> Option<&crate::domain::DomainError> {
        match self {
            AppError::Domain(e) => Some(e),
            _ => None,
        }
    }

    /// Lending rejection the caller should present rather than report
    pub fn is_business_rejection(&self) -> bool {
        self.as_domain()
            .is_some_and(|e| e.is_business_rejection())
    }

    pub(crate) fn lock_poisoned(what: &str) -> Self {
        AppError::Internal(format!("{what} lock poisoned"))
    }
}

pub(crate) fn read_lock<'a, T>(lock: &'a RwLock<T>, what: &str) -> AppResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| AppError::lock_poisoned(what))
}

pub(crate) fn write_lock<'a, T>(lock: &'a RwLock<T>, what: &str) -> AppResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| AppError::lock_poisoned(what))
}
