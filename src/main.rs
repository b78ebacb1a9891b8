//! library_lending - demo driver
//!
//! Builds a library from the environment, registers two books and two
//! members, lends a book for a week and returns it ten days later.

use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_lending::clock::ManualClock;
use library_lending::notification::{spawn_delivery, ConsoleNotifier, Notifier, QueuedNotifier};
use library_lending::{Config, Isbn, LibraryBuilder, MemberId};

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_lending=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;
    tracing::info!(
        "Starting library_lending ({}), fine rate {} per day",
        config.environment,
        config.daily_fine_rate
    );

    // Notifications go straight to the log, or through a background queue
    let (notifier, delivery): (Arc<dyn Notifier>, _) = if config.async_notifications {
        let (queued, receiver) = QueuedNotifier::new();
        let handle = spawn_delivery(receiver, Arc::new(ConsoleNotifier));
        (Arc::new(queued) as Arc<dyn Notifier>, Some(handle))
    } else {
        (Arc::new(ConsoleNotifier) as Arc<dyn Notifier>, None)
    };

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let library = LibraryBuilder::from_config(&config)
        .with_notifier(notifier)
        .with_clock(clock.clone())
        .build()?;

    let clean_code = Isbn::new("978-0132350884");
    library.add_book("Clean Code", "Robert C. Martin", clean_code.clone())?;
    library.add_book("Design Patterns", "Erich Gamma", "978-0201633610")?;

    library.add_member("João Silva", MemberId::new(1))?;
    library.add_member("Maria Oliveira", MemberId::new(2))?;

    let loan = library.lend_book(MemberId::new(1), &clean_code, 7)?;
    println!("Loan {} due {}", loan.id(), loan.due_time().format("%Y-%m-%d"));

    // Simulated late return
    clock.advance_days(10);
    let fine = library.return_book(&clean_code, MemberId::new(1))?;
    println!("Overdue fine: {fine}");

    println!("{}", serde_json::to_string_pretty(&library.loans()?)?);

    drop(library);
    if let Some(handle) = delivery {
        let delivered = handle.await?;
        tracing::info!("{} notifications delivered", delivered);
    }

    Ok(())
}
