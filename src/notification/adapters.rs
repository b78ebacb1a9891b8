//! Synchronous notifier adapters

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{Notification, Notifier, NotifyError};

/// Writes notifications to the log instead of sending them
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            channel = %notification.channel,
            recipient = %notification.recipient,
            subject = %notification.subject,
            "{}",
            notification.body
        );
        Ok(())
    }
}

/// Keeps every delivered notification in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    attempts: AtomicUsize,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every delivery fails
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.set_failing(true);
        notifier
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Successfully delivered notifications, in send order
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of notify calls, including failed ones
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.attempts.store(0, Ordering::SeqCst);
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::DeliveryFailed {
                channel: notification.channel,
                reason: "recording notifier set to fail".to_string(),
            });
        }

        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MemberId;
    use crate::notification::Channel;

    fn message() -> Notification {
        Notification::new(Channel::Email, MemberId::new(1), "Hi", "Body")
    }

    #[test]
    fn test_recording_notifier_records() {
        let notifier = RecordingNotifier::new();
        notifier.notify(&message()).unwrap();

        assert_eq!(notifier.sent(), vec![message()]);
        assert_eq!(notifier.attempts(), 1);

        notifier.clear();
        assert!(notifier.sent().is_empty());
        assert_eq!(notifier.attempts(), 0);
    }

    #[test]
    fn test_failing_notifier() {
        let notifier = RecordingNotifier::failing();
        let result = notifier.notify(&message());

        assert!(matches!(result, Err(NotifyError::DeliveryFailed { .. })));
        assert!(notifier.sent().is_empty());

        notifier.set_failing(false);
        assert!(notifier.notify(&message()).is_ok());
    }

    #[test]
    fn test_console_notifier_never_fails() {
        assert!(ConsoleNotifier.notify(&message()).is_ok());
    }
}
