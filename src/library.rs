//! Library facade
//!
//! Wires one catalog, one membership and one ledger together for the
//! lifetime of a session. `Library` is `Send + Sync`: every lending
//! mutation runs under the ledger mutex, and reads take atomic snapshots.
//! Notifications go out only after the ledger mutex is released, so a slow
//! notifier never holds up other callers.

use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::{DateTime, Utc};

use crate::aggregate::{Book, Loan, Member};
use crate::catalog::Catalog;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::domain::{DailyRate, DomainError, Fine, Isbn, MemberId};
use crate::error::{read_lock, write_lock, AppError, AppResult};
use crate::ledger::{FinePolicy, LendingLedger};
use crate::membership::Membership;
use crate::notification::{deliver, ConsoleNotifier, Notification, Notifier};

/// The lending system
pub struct Library {
    catalog: Arc<RwLock<Catalog>>,
    membership: Arc<RwLock<Membership>>,
    ledger: Mutex<LendingLedger>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    default_loan_days: u32,
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("default_loan_days", &self.default_loan_days)
            .finish_non_exhaustive()
    }
}

impl Library {
    pub fn builder() -> LibraryBuilder {
        LibraryBuilder::new()
    }

    fn ledger(&self) -> AppResult<MutexGuard<'_, LendingLedger>> {
        self.ledger
            .lock()
            .map_err(|_| AppError::lock_poisoned("ledger"))
    }

    fn deliver_all(&self, notices: Vec<Notification>) {
        for notice in notices {
            deliver(self.notifier.as_ref(), notice);
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn add_book(
        &self,
        title: impl Into<String>,
        author: impl Into<String>,
        id: impl Into<Isbn>,
    ) -> AppResult<Book> {
        let mut catalog = write_lock(&self.catalog, "catalog")?;
        Ok(catalog.add_book(title, author, id)?)
    }

    pub fn find_book(&self, id: &Isbn) -> AppResult<Book> {
        let catalog = read_lock(&self.catalog, "catalog")?;
        Ok(catalog.find_book(id)?.clone())
    }

    pub fn list_books(&self) -> AppResult<Vec<Book>> {
        Ok(read_lock(&self.catalog, "catalog")?.list_books())
    }

    pub fn available_books(&self) -> AppResult<Vec<Book>> {
        Ok(read_lock(&self.catalog, "catalog")?.available_books())
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Register a member and send the welcome email
    pub fn add_member(&self, name: impl Into<String>, id: MemberId) -> AppResult<Member> {
        let member = write_lock(&self.membership, "membership")?.add_member(name, id)?;
        deliver(self.notifier.as_ref(), Notification::welcome(&member));
        Ok(member)
    }

    pub fn find_member(&self, id: MemberId) -> AppResult<Member> {
        let membership = read_lock(&self.membership, "membership")?;
        Ok(membership.find_member(id)?.clone())
    }

    pub fn list_members(&self) -> AppResult<Vec<Member>> {
        Ok(read_lock(&self.membership, "membership")?.list_members())
    }

    // =========================================================================
    // Lending
    // =========================================================================

    /// Lend a book starting now
    pub fn lend_book(&self, member_id: MemberId, isbn: &Isbn, duration_days: u32) -> AppResult<Loan> {
        let (loan, notices) = {
            let mut ledger = self.ledger()?;
            let now = self.clock.now();
            ledger.open_loan(member_id, isbn, duration_days, now)?
        };
        self.deliver_all(notices);
        Ok(loan)
    }

    /// Lend a book for the configured default duration
    pub fn lend_book_default(&self, member_id: MemberId, isbn: &Isbn) -> AppResult<Loan> {
        self.lend_book(member_id, isbn, self.default_loan_days)
    }

    /// Return a book now. Resolves to the fine owed (zero when on time).
    pub fn return_book(&self, isbn: &Isbn, member_id: MemberId) -> AppResult<Fine> {
        let (fine, notices) = {
            let mut ledger = self.ledger()?;
            let now = self.clock.now();
            ledger.close_loan(isbn, member_id, now)?
        };
        self.deliver_all(notices);
        Ok(fine)
    }

    /// Return a book at an explicit instant
    pub fn return_book_at(
        &self,
        isbn: &Isbn,
        member_id: MemberId,
        now: DateTime<Utc>,
    ) -> AppResult<Fine> {
        let (fine, notices) = self.ledger()?.close_loan(isbn, member_id, now)?;
        self.deliver_all(notices);
        Ok(fine)
    }

    /// Fine the member would owe returning the book now
    pub fn preview_fine(&self, isbn: &Isbn, member_id: MemberId) -> AppResult<Fine> {
        let ledger = self.ledger()?;
        let now = self.clock.now();
        match ledger.open_loan_for(isbn) {
            Some(loan) if loan.member_id() == member_id => Ok(ledger.fine_for(loan, now)),
            _ => Err(DomainError::NoOpenLoan {
                isbn: isbn.clone(),
                member_id,
            }
            .into()),
        }
    }

    // =========================================================================
    // Loan queries
    // =========================================================================

    /// Books and open loans read together, so availability always matches
    pub fn snapshot(&self) -> AppResult<Snapshot> {
        let ledger = self.ledger()?;
        let books = read_lock(&self.catalog, "catalog")?.list_books();
        Ok(Snapshot {
            books,
            open_loans: ledger.open_loans(),
        })
    }

    pub fn loans(&self) -> AppResult<Vec<Loan>> {
        Ok(self.ledger()?.loans().to_vec())
    }

    pub fn open_loans(&self) -> AppResult<Vec<Loan>> {
        Ok(self.ledger()?.open_loans())
    }

    pub fn overdue_loans(&self) -> AppResult<Vec<Loan>> {
        let ledger = self.ledger()?;
        Ok(ledger.overdue_loans(self.clock.now()))
    }

    pub fn member_loans(&self, member_id: MemberId) -> AppResult<Vec<Loan>> {
        Ok(self.ledger()?.loans_for_member(member_id))
    }

    pub fn total_fines(&self, member_id: MemberId) -> AppResult<Fine> {
        Ok(self.ledger()?.total_fines_for_member(member_id))
    }

    pub fn daily_rate(&self) -> AppResult<DailyRate> {
        Ok(self.ledger()?.policy().daily_rate())
    }

    pub fn default_loan_days(&self) -> u32 {
        self.default_loan_days
    }
}

/// Point-in-time view of the catalog and its open loans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub books: Vec<Book>,
    pub open_loans: Vec<Loan>,
}

impl Snapshot {
    /// Open loan holding the book, if any
    pub fn loan_for(&self, isbn: &Isbn) -> Option<&Loan> {
        self.open_loans.iter().find(|l| l.book_id() == isbn)
    }
}

// =========================================================================
// LibraryBuilder
// =========================================================================

/// Builder for [`Library`]
pub struct LibraryBuilder {
    notifier: Option<Arc<dyn Notifier>>,
    clock: Option<Arc<dyn Clock>>,
    daily_rate: DailyRate,
    default_loan_days: u32,
}

impl LibraryBuilder {
    pub fn new() -> Self {
        Self {
            notifier: None,
            clock: None,
            daily_rate: DailyRate::default(),
            default_loan_days: 7,
        }
    }

    /// Start from loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_daily_rate(config.daily_fine_rate)
            .with_default_loan_days(config.default_loan_days)
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_daily_rate(mut self, daily_rate: DailyRate) -> Self {
        self.daily_rate = daily_rate;
        self
    }

    pub fn with_default_loan_days(mut self, days: u32) -> Self {
        self.default_loan_days = days;
        self
    }

    pub fn build(self) -> AppResult<Library> {
        if self.default_loan_days == 0 {
            return Err(DomainError::invalid_input("Default loan duration must be at least one day").into());
        }

        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(ConsoleNotifier));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let catalog = Arc::new(RwLock::new(Catalog::new()));
        let membership = Arc::new(RwLock::new(Membership::new()));
        let ledger = LendingLedger::new(
            catalog.clone(),
            membership.clone(),
            FinePolicy::new(self.daily_rate),
        );

        tracing::debug!(
            "Library ready: {} per overdue day, {} day default loans",
            self.daily_rate,
            self.default_loan_days
        );

        Ok(Library {
            catalog,
            membership,
            ledger: Mutex::new(ledger),
            notifier,
            clock,
            default_loan_days: self.default_loan_days,
        })
    }
}

impl Default for LibraryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
