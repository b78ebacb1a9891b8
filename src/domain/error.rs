//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::{Isbn, MemberId};

/// Kind of record a lookup or insert refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Book,
    Member,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Book => write!(f, "Book"),
            RecordKind::Member => write!(f, "Member"),
        }
    }
}

/// Lending errors
///
/// Every variant is recoverable and leaves catalog, membership and
/// ledger state exactly as it was before the failed call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Insert with an id that is already taken
    #[error("{kind} already exists: {id}")]
    DuplicateId { kind: RecordKind, id: String },

    /// Lookup of an unknown id
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    /// Book is currently on loan
    #[error("Book is unavailable: {isbn} is already on loan")]
    BookUnavailable { isbn: Isbn },

    /// Return with no matching open loan
    #[error("No open loan for book {isbn} and member {member_id}")]
    NoOpenLoan { isbn: Isbn, member_id: MemberId },

    /// Malformed input (non-positive duration, return before start, blank fields)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DomainError {
    pub fn book_not_found(isbn: &Isbn) -> Self {
        Self::NotFound {
            kind: RecordKind::Book,
            id: isbn.to_string(),
        }
    }

    pub fn member_not_found(member_id: MemberId) -> Self {
        Self::NotFound {
            kind: RecordKind::Member,
            id: member_id.to_string(),
        }
    }

    pub fn duplicate_book(isbn: &Isbn) -> Self {
        Self::DuplicateId {
            kind: RecordKind::Book,
            id: isbn.to_string(),
        }
    }

    pub fn duplicate_member(member_id: MemberId) -> Self {
        Self::DuplicateId {
            kind: RecordKind::Member,
            id: member_id.to_string(),
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// Normal lending rejections a caller is expected to handle
    /// (show "unavailable", "nothing to return") rather than report.
    pub fn is_business_rejection(&self) -> bool {
        matches!(self, Self::BookUnavailable { .. } | Self::NoOpenLoan { .. })
    }

    /// Check if this is a client error (caller supplied bad data)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateId { .. } | Self::NotFound { .. } | Self::InvalidInput(_)
        )
    }
}
