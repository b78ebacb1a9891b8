//! Asynchronous delivery
//!
//! `QueuedNotifier` hands messages to an unbounded channel and returns
//! at once, so lending never waits on delivery. A background task drains
//! the channel into a real notifier.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{Notification, Notifier, NotifyError};

/// Notifier that enqueues instead of sending
#[derive(Debug, Clone)]
pub struct QueuedNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl QueuedNotifier {
    /// Create the notifier and the receiving end of its queue
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for QueuedNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sender
            .send(notification.clone())
            .map_err(|_| NotifyError::QueueClosed)
    }
}

/// Drain `receiver` into `sink` until every sender is dropped.
///
/// Resolves to the number of notifications the sink accepted.
pub fn spawn_delivery(
    mut receiver: mpsc::UnboundedReceiver<Notification>,
    sink: Arc<dyn Notifier>,
) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut delivered = 0;
        while let Some(notification) = receiver.recv().await {
            match sink.notify(&notification) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    "Queued notification to member {} dropped: {}",
                    notification.recipient,
                    e
                ),
            }
        }
        tracing::debug!("Notification queue closed after {} deliveries", delivered);
        delivered
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MemberId;
    use crate::notification::{Channel, RecordingNotifier};

    #[tokio::test]
    async fn test_queue_delivers_in_order() {
        let (notifier, receiver) = QueuedNotifier::new();
        let sink = Arc::new(RecordingNotifier::new());
        let handle = spawn_delivery(receiver, sink.clone());

        for i in 0..3 {
            notifier
                .notify(&Notification::new(Channel::Sms, MemberId::new(i), "s", "b"))
                .unwrap();
        }
        drop(notifier);

        assert_eq!(handle.await.unwrap(), 3);
        let recipients: Vec<_> = sink.sent().iter().map(|n| n.recipient.value()).collect();
        assert_eq!(recipients, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_failed_sink_is_not_counted() {
        let (notifier, receiver) = QueuedNotifier::new();
        let handle = spawn_delivery(receiver, Arc::new(RecordingNotifier::failing()));

        notifier
            .notify(&Notification::new(Channel::Email, MemberId::new(1), "s", "b"))
            .unwrap();
        drop(notifier);

        assert_eq!(handle.await.unwrap(), 0);
    }

    #[test]
    fn test_closed_queue_reports_error() {
        let (notifier, receiver) = QueuedNotifier::new();
        drop(receiver);

        let result = notifier.notify(&Notification::new(Channel::Email, MemberId::new(1), "s", "b"));
        assert_eq!(result, Err(NotifyError::QueueClosed));
    }
}
