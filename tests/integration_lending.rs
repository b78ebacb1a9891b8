//! Integration tests for the lending workflow

use chrono::TimeDelta;
use library_lending::notification::Channel;
use library_lending::{AppError, DomainError, MemberId};
use rust_decimal_macros::dec;

mod common;

use common::{assert_availability_matches_loans, isbn, setup_library, CLEAN_CODE, DESIGN_PATTERNS};

#[test]
fn test_overdue_return_scenario() {
    let t = setup_library();
    let book = isbn(CLEAN_CODE);

    let loan = t.library.lend_book(MemberId::new(1), &book, 7).unwrap();
    assert!(!t.library.find_book(&book).unwrap().is_available());
    assert_availability_matches_loans(&t.library);

    t.clock.advance_days(10);
    let fine = t.library.return_book(&book, MemberId::new(1)).unwrap();

    assert_eq!(fine.value(), dec!(3.0));
    assert!(t.library.find_book(&book).unwrap().is_available());
    assert_availability_matches_loans(&t.library);

    let history = t.library.loans().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id(), loan.id());
    assert_eq!(history[0].return_time(), Some(loan.start_time() + TimeDelta::days(10)));
    assert_eq!(history[0].fine(), Some(fine));
}

#[test]
fn test_return_at_due_time_round_trip() {
    let t = setup_library();
    let book = isbn(DESIGN_PATTERNS);

    let loan = t.library.lend_book(MemberId::new(2), &book, 14).unwrap();
    let fine = t
        .library
        .return_book_at(&book, MemberId::new(2), loan.due_time())
        .unwrap();

    assert!(fine.is_zero());
    assert!(t.library.find_book(&book).unwrap().is_available());
    assert_availability_matches_loans(&t.library);
}

#[test]
fn test_repeat_lend_is_rejected_and_original_untouched() {
    let t = setup_library();
    let book = isbn(CLEAN_CODE);

    let original = t.library.lend_book(MemberId::new(1), &book, 7).unwrap();
    t.clock.advance_days(1);

    for member in [1, 2] {
        let result = t.library.lend_book(MemberId::new(member), &book, 3);
        match result {
            Err(AppError::Domain(DomainError::BookUnavailable { isbn })) => {
                assert_eq!(isbn, book);
            }
            other => panic!("Expected BookUnavailable, got: {:?}", other),
        }
    }

    assert_eq!(t.library.loans().unwrap(), vec![original]);
    assert_availability_matches_loans(&t.library);
}

#[test]
fn test_double_return_signals_no_open_loan() {
    let t = setup_library();
    let book = isbn(CLEAN_CODE);

    t.library.lend_book(MemberId::new(1), &book, 7).unwrap();
    t.clock.advance_days(2);
    let first = t.library.return_book(&book, MemberId::new(1)).unwrap();
    assert!(first.is_zero());

    let second = t.library.return_book(&book, MemberId::new(1));
    let err = second.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::NoOpenLoan { .. })
    ));
    assert!(err.is_business_rejection());
    assert_eq!(err.error_code(), "no_open_loan");
}

#[test]
fn test_return_without_any_loan_is_not_a_zero_fine() {
    let t = setup_library();

    let result = t.library.return_book(&isbn(DESIGN_PATTERNS), MemberId::new(1));
    assert!(result.is_err());
    assert_eq!(result.unwrap_err().error_code(), "no_open_loan");
}

#[test]
fn test_fine_is_monotonic_after_due_time() {
    let t = setup_library();
    let book = isbn(CLEAN_CODE);
    let loan = t.library.lend_book(MemberId::new(1), &book, 7).unwrap();

    let mut previous = None;
    for hours in (0..=24 * 30).step_by(5) {
        let now = loan.start_time() + TimeDelta::hours(hours);
        t.clock.set(now);
        let fine = t.library.preview_fine(&book, MemberId::new(1)).unwrap();

        if now <= loan.due_time() {
            assert!(fine.is_zero(), "fine before due time at +{hours}h");
        }
        if let Some(previous) = previous {
            assert!(fine >= previous, "fine decreased at +{hours}h");
        }
        previous = Some(fine);
    }
    assert_eq!(previous.map(|f| f.value()), Some(dec!(23)));
}

#[test]
fn test_notifications_follow_lending_events() {
    let t = setup_library();
    let book = isbn(CLEAN_CODE);

    t.library.lend_book(MemberId::new(1), &book, 7).unwrap();
    let sent = t.notifier.sent();
    assert_eq!(
        sent.iter().map(|n| n.channel).collect::<Vec<_>>(),
        vec![Channel::Email, Channel::Sms]
    );
    t.notifier.clear();

    t.clock.advance_days(7);
    t.library.return_book(&book, MemberId::new(1)).unwrap();
    assert!(t.notifier.sent().is_empty(), "on-time return must not notify");

    t.library.lend_book(MemberId::new(2), &book, 1).unwrap();
    t.notifier.clear();
    t.clock.advance_days(3);
    let fine = t.library.return_book(&book, MemberId::new(2)).unwrap();

    let sent = t.notifier.sent();
    assert_eq!(fine.value(), dec!(2));
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, MemberId::new(2));
    assert!(sent[0].body.contains("2.00"));
}

#[test]
fn test_failed_operations_leave_state_unchanged() {
    let t = setup_library();
    let book = isbn(CLEAN_CODE);
    let books_before = t.library.list_books().unwrap();

    assert!(t.library.lend_book(MemberId::new(1), &book, 0).is_err());
    assert!(t.library.lend_book(MemberId::new(9), &book, 7).is_err());
    assert!(t.library.lend_book(MemberId::new(1), &isbn("000"), 7).is_err());
    assert!(t.library.add_book("Dup", "Someone", CLEAN_CODE).is_err());

    assert_eq!(t.library.list_books().unwrap(), books_before);
    assert!(t.library.loans().unwrap().is_empty());
    assert_eq!(t.notifier.attempts(), 0);
}

#[test]
fn test_notification_outage_does_not_block_lending() {
    let t = setup_library();
    let book = isbn(DESIGN_PATTERNS);
    t.notifier.set_failing(true);

    t.library.lend_book(MemberId::new(2), &book, 7).unwrap();
    t.clock.advance_days(8);
    let fine = t.library.return_book(&book, MemberId::new(2)).unwrap();

    assert_eq!(fine.value(), dec!(1));
    assert_eq!(t.notifier.attempts(), 3);
    assert!(t.notifier.sent().is_empty());
    assert_availability_matches_loans(&t.library);
}

#[test]
fn test_member_history_and_totals() {
    let t = setup_library();

    t.library.lend_book(MemberId::new(1), &isbn(CLEAN_CODE), 7).unwrap();
    t.library.lend_book(MemberId::new(1), &isbn(DESIGN_PATTERNS), 7).unwrap();
    t.clock.advance_days(9);
    assert_eq!(t.library.overdue_loans().unwrap().len(), 2);

    t.library.return_book(&isbn(CLEAN_CODE), MemberId::new(1)).unwrap();
    t.clock.advance_days(1);
    t.library.return_book(&isbn(DESIGN_PATTERNS), MemberId::new(1)).unwrap();

    assert_eq!(t.library.member_loans(MemberId::new(1)).unwrap().len(), 2);
    assert_eq!(t.library.total_fines(MemberId::new(1)).unwrap().value(), dec!(5));
    assert!(t.library.total_fines(MemberId::new(2)).unwrap().is_zero());
    assert_eq!(t.library.available_books().unwrap().len(), 2);
}
