//! library_lending Library
//!
//! Re-exports modules for integration testing and external use.

pub mod aggregate;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod domain;
pub mod ledger;
pub mod library;
pub mod membership;
pub mod notification;

mod error;

pub use config::Config;
pub use domain::{AmountError, DailyRate, DomainError, Fine, Isbn, LoanId, MemberId};
pub use error::{AppError, AppResult};
pub use library::{Library, LibraryBuilder, Snapshot};
