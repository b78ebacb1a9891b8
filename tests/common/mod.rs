//! Common test utilities

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use library_lending::clock::ManualClock;
use library_lending::notification::RecordingNotifier;
use library_lending::{Isbn, Library, MemberId};

pub const CLEAN_CODE: &str = "978-0132350884";
pub const DESIGN_PATTERNS: &str = "978-0201633610";

pub struct TestLibrary {
    pub library: Library,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<ManualClock>,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 0).unwrap()
}

/// Library seeded with the two sample books and members
pub fn setup_library() -> TestLibrary {
    let notifier = Arc::new(RecordingNotifier::new());
    let clock = Arc::new(ManualClock::new(start_time()));
    let library = Library::builder()
        .with_notifier(notifier.clone())
        .with_clock(clock.clone())
        .build()
        .expect("Failed to build library");

    library
        .add_book("Clean Code", "Robert C. Martin", CLEAN_CODE)
        .expect("Failed to seed book");
    library
        .add_book("Design Patterns", "Erich Gamma", DESIGN_PATTERNS)
        .expect("Failed to seed book");
    library
        .add_member("João Silva", MemberId::new(1))
        .expect("Failed to seed member");
    library
        .add_member("Maria Oliveira", MemberId::new(2))
        .expect("Failed to seed member");

    notifier.clear();
    TestLibrary {
        library,
        notifier,
        clock,
    }
}

pub fn isbn(s: &str) -> Isbn {
    Isbn::new(s)
}

/// Every book is unavailable exactly when one open loan references it
pub fn assert_availability_matches_loans(library: &Library) {
    let open = library.open_loans().unwrap();
    for book in library.list_books().unwrap() {
        let count = open.iter().filter(|l| l.book_id() == book.id()).count();
        assert!(count <= 1, "{} has {} open loans", book.id(), count);
        assert_eq!(
            book.is_available(),
            count == 0,
            "availability of {} does not match its loans",
            book.id()
        );
    }
}
