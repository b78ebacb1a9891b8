//! Notification port
//!
//! The ledger tells members about registrations, loans and fines through
//! the [`Notifier`] trait. Delivery is someone else's problem: a failed
//! send is logged and never affects lending state.

mod adapters;
mod queue;

use serde::{Deserialize, Serialize};

use crate::aggregate::{Book, Loan, Member};
use crate::domain::{Fine, MemberId};

pub use adapters::{ConsoleNotifier, RecordingNotifier};
pub use queue::{spawn_delivery, QueuedNotifier};

/// Delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Sms,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Email => write!(f, "email"),
            Channel::Sms => write!(f, "sms"),
        }
    }
}

/// A message for one member on one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub channel: Channel,
    pub recipient: MemberId,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(
        channel: Channel,
        recipient: MemberId,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            recipient,
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Email sent on registration
    pub fn welcome(member: &Member) -> Self {
        Self::new(
            Channel::Email,
            member.id(),
            "Welcome to the Library",
            format!("Hello {}, you are now registered with the library.", member.name()),
        )
    }

    /// Email sent when a loan opens
    pub fn loan_confirmation(member: &Member, book: &Book, loan: &Loan) -> Self {
        Self::new(
            Channel::Email,
            member.id(),
            "Loan Confirmed",
            format!(
                "Hello {}, you borrowed \"{}\" by {}. Please return it by {}.",
                member.name(),
                book.title(),
                book.author(),
                loan.due_time().format("%Y-%m-%d %H:%M UTC"),
            ),
        )
    }

    /// Short SMS sent when a loan opens
    pub fn loan_summary(member: &Member, book: &Book, loan: &Loan) -> Self {
        Self::new(
            Channel::Sms,
            member.id(),
            "Loan",
            format!(
                "Loan of \"{}\", due {}",
                book.title(),
                loan.due_time().format("%Y-%m-%d")
            ),
        )
    }

    /// Email sent when a return incurs a fine
    pub fn overdue_fine(member: &Member, book: &Book, fine: Fine) -> Self {
        Self::new(
            Channel::Email,
            member.id(),
            "Overdue Fine",
            format!(
                "Hello {}, \"{}\" was returned late. You have a fine of {}.",
                member.name(),
                book.title(),
                fine
            ),
        )
    }
}

/// Notification delivery errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("Delivery failed on {channel}: {reason}")]
    DeliveryFailed { channel: Channel, reason: String },

    #[error("Notification queue is closed")]
    QueueClosed,
}

/// Outbound notification capability
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Send and swallow. Failures are logged, never returned.
pub(crate) fn deliver(notifier: &dyn Notifier, notification: Notification) {
    if let Err(e) = notifier.notify(&notification) {
        tracing::warn!(
            "Notification to member {} via {} not delivered: {}",
            notification.recipient,
            notification.channel,
            e
        );
    }
}
