//! Domain module
//!
//! Core domain types: identifiers, money and lending errors.

pub mod amount;
pub mod error;
pub mod ids;

pub use amount::{AmountError, DailyRate, Fine};
pub use error::{DomainError, RecordKind};
pub use ids::{Isbn, LoanId, MemberId};
