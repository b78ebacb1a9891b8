//! Book entity
//!
//! A catalog record plus its lending status. Status only changes through
//! `check_out` / `check_in`, which the ledger calls while it holds the
//! catalog write lock.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Isbn};

/// Book status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Available,
    OnLoan,
}

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// ISBN (unique)
    id: Isbn,

    title: String,

    author: String,

    /// Lending status
    status: BookStatus,
}

impl Book {
    /// Create a new, available book
    pub fn new(id: Isbn, title: String, author: String) -> Result<Self, DomainError> {
        if id.is_blank() {
            return Err(DomainError::invalid_input("ISBN must not be blank"));
        }
        if title.trim().is_empty() {
            return Err(DomainError::invalid_input("Book title must not be blank"));
        }
        if author.trim().is_empty() {
            return Err(DomainError::invalid_input("Book author must not be blank"));
        }

        Ok(Self {
            id,
            title,
            author,
            status: BookStatus::Available,
        })
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Available -> OnLoan
    pub(crate) fn check_out(&mut self) -> Result<(), DomainError> {
        if self.status == BookStatus::OnLoan {
            return Err(DomainError::BookUnavailable {
                isbn: self.id.clone(),
            });
        }
        self.status = BookStatus::OnLoan;
        Ok(())
    }

    /// OnLoan -> Available
    pub(crate) fn check_in(&mut self) {
        if self.status == BookStatus::Available {
            tracing::error!("Book {} checked in while already available", self.id);
        }
        self.status = BookStatus::Available;
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> &Isbn {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn status(&self) -> BookStatus {
        self.status
    }

    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }
}
