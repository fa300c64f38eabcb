//! Notifier port
//!
//! Delivery of a message to a user. Lives in its own failure domain: the
//! transfer core never waits on it.

use async_trait::async_trait;

/// Errors a Notifier can report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Delivery timed out after {0} ms")]
    Timeout(u128),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_notification(
        &self,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError>;
}

/// Notifier that writes each message to the log.
///
/// Used when no mail transport is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send_notification(
        &self,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        if !address.contains('@') {
            return Err(NotificationError::InvalidAddress(address.to_string()));
        }

        tracing::info!(to = %address, subject = %subject, body = %body, "Notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tracing_notifier() {
        let notifier = TracingNotifier;
        assert!(notifier
            .send_notification("a@example.com", "Hi", "Body")
            .await
            .is_ok());

        let err = notifier
            .send_notification("not-an-address", "Hi", "Body")
            .await
            .unwrap_err();
        assert_eq!(err, NotificationError::InvalidAddress("not-an-address".to_string()));
    }
}
