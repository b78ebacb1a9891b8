//! Lending Ledger
//!
//! The loan state machine. Each book is either `Available` or `OnLoan`:
//!
//! - `open_loan`:  Available -> OnLoan, appends an open Loan
//! - `close_loan`: OnLoan -> Available, records the return and the fine
//!
//! The ledger owns the loan history and shares the catalog and membership
//! with the rest of the library. A failed call never leaves partial state
//! behind: every precondition is checked before the first write.
//!
//! The ledger never delivers messages itself. Each mutation hands back the
//! notifications it produced and the caller sends them once the ledger is
//! released.

mod fine;

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::aggregate::{Loan, Member};
use crate::catalog::Catalog;
use crate::domain::{DomainError, Fine, Isbn, MemberId};
use crate::error::{read_lock, write_lock, AppResult};
use crate::membership::Membership;
use crate::notification::Notification;

pub use fine::FinePolicy;

/// Loan state machine over a shared catalog and membership
pub struct LendingLedger {
    catalog: Arc<RwLock<Catalog>>,
    membership: Arc<RwLock<Membership>>,
    policy: FinePolicy,
    /// Every loan ever opened, in open order
    loans: Vec<Loan>,
}

impl std::fmt::Debug for LendingLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LendingLedger")
            .field("policy", &self.policy)
            .field("loans", &self.loans.len())
            .finish_non_exhaustive()
    }
}

impl LendingLedger {
    pub fn new(
        catalog: Arc<RwLock<Catalog>>,
        membership: Arc<RwLock<Membership>>,
        policy: FinePolicy,
    ) -> Self {
        Self {
            catalog,
            membership,
            policy,
            loans: Vec::new(),
        }
    }

    // =========================================================================
    // open_loan
    // =========================================================================

    /// Lend `book_id` to `member_id` for `duration_days`, starting at `now`.
    /// Returns the loan with the confirmation email and SMS to send.
    ///
    /// # Errors
    /// - `InvalidInput` for a zero or out-of-range duration
    /// - `NotFound` for an unknown book or member
    /// - `BookUnavailable` if the book is already on loan
    pub fn open_loan(
        &mut self,
        member_id: MemberId,
        book_id: &Isbn,
        duration_days: u32,
        now: DateTime<Utc>,
    ) -> AppResult<(Loan, Vec<Notification>)> {
        let loan = Loan::open(book_id.clone(), member_id, now, duration_days)?;

        let (book, member) = {
            let mut catalog = write_lock(&self.catalog, "catalog")?;
            let membership = read_lock(&self.membership, "membership")?;

            let book = catalog.find_book_mut(book_id)?;
            let member = membership.find_member(member_id)?.clone();

            if let Err(e) = book.check_out() {
                tracing::warn!("Loan of {} to member {} rejected: {}", book_id, member_id, e);
                return Err(e.into());
            }
            (book.clone(), member)
        };

        self.loans.push(loan.clone());
        tracing::info!(
            loan_id = %loan.id(),
            "Book {} lent to member {} until {}",
            book_id,
            member_id,
            loan.due_time()
        );

        let notices = vec![
            Notification::loan_confirmation(&member, &book, &loan),
            Notification::loan_summary(&member, &book, &loan),
        ];
        Ok((loan, notices))
    }

    // =========================================================================
    // close_loan
    // =========================================================================

    /// Record the return of `book_id` by `member_id` at `now` and assess the fine.
    /// A non-zero fine comes back with the fine notice to send.
    ///
    /// # Errors
    /// - `NoOpenLoan` if the member has no open loan for the book
    /// - `InvalidInput` if `now` is before the loan started
    pub fn close_loan(
        &mut self,
        book_id: &Isbn,
        member_id: MemberId,
        now: DateTime<Utc>,
    ) -> AppResult<(Fine, Vec<Notification>)> {
        let Some(loan) = self
            .loans
            .iter_mut()
            .find(|l| l.is_open() && l.matches(book_id, member_id))
        else {
            tracing::warn!("Return of {} by member {} has no open loan", book_id, member_id);
            return Err(DomainError::NoOpenLoan {
                isbn: book_id.clone(),
                member_id,
            }
            .into());
        };

        loan.check_return_time(now)?;
        let fine = self.policy.assess(loan.due_time(), now);

        let book = {
            let mut catalog = write_lock(&self.catalog, "catalog")?;
            let book = catalog.find_book_mut(book_id)?;
            loan.close(now, fine)?;
            book.check_in();
            book.clone()
        };

        tracing::info!(
            loan_id = %loan.id(),
            "Book {} returned by member {}, fine {}",
            book_id,
            member_id,
            fine
        );

        let mut notices = Vec::new();
        if !fine.is_zero() {
            match self.member(member_id) {
                Ok(member) => notices.push(Notification::overdue_fine(&member, &book, fine)),
                Err(e) => tracing::error!("Fine notice for member {} skipped: {}", member_id, e),
            }
        }

        Ok((fine, notices))
    }

    fn member(&self, member_id: MemberId) -> AppResult<Member> {
        let membership = read_lock(&self.membership, "membership")?;
        Ok(membership.find_member(member_id)?.clone())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Full loan history, open order
    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn open_loans(&self) -> Vec<Loan> {
        self.loans.iter().filter(|l| l.is_open()).cloned().collect()
    }

    /// The open loan for a book, if it is on loan
    pub fn open_loan_for(&self, book_id: &Isbn) -> Option<&Loan> {
        self.loans
            .iter()
            .find(|l| l.is_open() && l.book_id() == book_id)
    }

    pub fn loans_for_member(&self, member_id: MemberId) -> Vec<Loan> {
        self.loans
            .iter()
            .filter(|l| l.member_id() == member_id)
            .cloned()
            .collect()
    }

    /// Open loans past their due time at `now`
    pub fn overdue_loans(&self, now: DateTime<Utc>) -> Vec<Loan> {
        self.loans
            .iter()
            .filter(|l| l.is_overdue(now))
            .cloned()
            .collect()
    }

    /// Fine the loan would incur if returned at `now`.
    /// Closed loans report the fine recorded at return.
    pub fn fine_for(&self, loan: &Loan, now: DateTime<Utc>) -> Fine {
        loan.fine()
            .unwrap_or_else(|| self.policy.assess(loan.due_time(), now))
    }

    /// Sum of fines recorded on the member's returned loans
    pub fn total_fines_for_member(&self, member_id: MemberId) -> Fine {
        self.loans
            .iter()
            .filter(|l| l.member_id() == member_id)
            .filter_map(Loan::fine)
            .sum()
    }

    pub fn policy(&self) -> FinePolicy {
        self.policy
    }
}
