//! Loan record
//!
//! A loan is open until its return time is recorded. Closing is one-way:
//! a closed loan is a historical record and is never reopened.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Fine, Isbn, LoanId, MemberId};

/// Loan Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    id: LoanId,

    book_id: Isbn,

    member_id: MemberId,

    /// When the book left the library
    start_time: DateTime<Utc>,

    /// start_time + loan duration
    due_time: DateTime<Utc>,

    /// Set exactly once, on return
    return_time: Option<DateTime<Utc>>,

    /// Fine assessed on return
    fine: Option<Fine>,
}

impl Loan {
    // =========================================================================
    // Loan::open()
    // =========================================================================

    /// Open a loan of `duration_days` starting at `start_time`
    pub fn open(
        book_id: Isbn,
        member_id: MemberId,
        start_time: DateTime<Utc>,
        duration_days: u32,
    ) -> Result<Self, DomainError> {
        if duration_days == 0 {
            return Err(DomainError::invalid_input(
                "Loan duration must be at least one day",
            ));
        }

        let due_time = TimeDelta::try_days(i64::from(duration_days))
            .and_then(|d| start_time.checked_add_signed(d))
            .ok_or_else(|| {
                DomainError::invalid_input(format!(
                    "Loan duration of {duration_days} days is out of range"
                ))
            })?;

        Ok(Self {
            id: LoanId::new(),
            book_id,
            member_id,
            start_time,
            due_time,
            return_time: None,
            fine: None,
        })
    }

    // =========================================================================
    // Loan::close()
    // =========================================================================

    /// Record the return. `fine` must already be assessed for `returned_at`.
    pub(crate) fn close(&mut self, returned_at: DateTime<Utc>, fine: Fine) -> Result<(), DomainError> {
        if self.return_time.is_some() {
            return Err(DomainError::NoOpenLoan {
                isbn: self.book_id.clone(),
                member_id: self.member_id,
            });
        }

        self.check_return_time(returned_at)?;

        self.return_time = Some(returned_at);
        self.fine = Some(fine);
        Ok(())
    }

    /// Validate a return time without mutating the loan
    pub(crate) fn check_return_time(&self, returned_at: DateTime<Utc>) -> Result<(), DomainError> {
        if returned_at < self.start_time {
            return Err(DomainError::invalid_input(format!(
                "Return time {returned_at} is before loan start {}",
                self.start_time
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> LoanId {
        self.id
    }

    pub fn book_id(&self) -> &Isbn {
        &self.book_id
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn due_time(&self) -> DateTime<Utc> {
        self.due_time
    }

    pub fn return_time(&self) -> Option<DateTime<Utc>> {
        self.return_time
    }

    /// Fine recorded at return; `None` while the loan is open
    pub fn fine(&self) -> Option<Fine> {
        self.fine
    }

    pub fn is_open(&self) -> bool {
        self.return_time.is_none()
    }

    /// Open and past its due time at `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && now > self.due_time
    }

    pub(crate) fn matches(&self, book_id: &Isbn, member_id: MemberId) -> bool {
        self.book_id == *book_id && self.member_id == member_id
    }
}
