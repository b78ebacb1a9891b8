//! Entity module
//!
//! Books, members and loans. Each entity validates its own fields at
//! construction; cross-entity rules live in the ledger.

pub mod book;
pub mod loan;
pub mod member;

pub use book::{Book, BookStatus};
pub use loan::Loan;
pub use member::Member;
