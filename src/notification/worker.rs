//! Notification worker
//!
//! Committed transfers hand their notification to a bounded queue; a
//! background task drains it and talks to the Notifier. Each attempt is
//! bounded by a timeout and retried a fixed number of times.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use super::{NotificationError, NotificationMessage, Notifier};

/// Configuration for the notification queue and worker
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Messages that can wait in the queue (default: 1024)
    pub queue_capacity: usize,
    /// Upper bound on a single delivery attempt (default: 5 seconds)
    pub delivery_timeout: Duration,
    /// Attempts per message before giving up (default: 3)
    pub max_attempts: u32,
    /// Base delay between attempts, multiplied by the attempt number (default: 200 ms)
    pub retry_backoff: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            delivery_timeout: Duration::from_secs(5),
            max_attempts: 3,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

/// Result of handing a message to the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    Queued,
    /// Queue at capacity; message dropped
    QueueFull,
    /// Worker gone; message dropped
    Closed,
}

/// Sending half of the notification queue. Never blocks.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<NotificationMessage>,
}

impl NotificationDispatcher {
    pub fn dispatch(&self, message: NotificationMessage) -> DispatchStatus {
        match self.sender.try_send(message) {
            Ok(()) => DispatchStatus::Queued,
            Err(mpsc::error::TrySendError::Full(message)) => {
                tracing::warn!(
                    to = %message.address,
                    subject = %message.subject,
                    "Notification queue full, dropping message"
                );
                DispatchStatus::QueueFull
            }
            Err(mpsc::error::TrySendError::Closed(message)) => {
                tracing::warn!(
                    to = %message.address,
                    subject = %message.subject,
                    "Notification worker stopped, dropping message"
                );
                DispatchStatus::Closed
            }
        }
    }
}

/// What happened to one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { attempts: u32 },
    GaveUp { attempts: u32, last_error: NotificationError },
}

/// Background task that delivers queued notifications
pub struct NotificationWorker {
    notifier: Arc<dyn Notifier>,
    receiver: mpsc::Receiver<NotificationMessage>,
    config: NotificationConfig,
}

/// Create a connected dispatcher/worker pair
pub fn notification_channel(
    notifier: Arc<dyn Notifier>,
    config: NotificationConfig,
) -> (NotificationDispatcher, NotificationWorker) {
    let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
    (
        NotificationDispatcher { sender },
        NotificationWorker {
            notifier,
            receiver,
            config,
        },
    )
}

impl NotificationWorker {
    /// Start the worker in the background.
    /// The task ends once every dispatcher is dropped and the queue is empty.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(mut self) {
        tracing::info!("Notification worker started");

        while let Some(message) = self.receiver.recv().await {
            self.deliver(&message).await;
        }

        tracing::info!("Notification worker stopped");
    }

    /// Deliver one message, retrying on failure or timeout
    pub async fn deliver(&self, message: &NotificationMessage) -> DeliveryOutcome {
        let max_attempts = self.config.max_attempts.max(1);
        let mut last_error = NotificationError::Delivery("not attempted".to_string());

        for attempt in 1..=max_attempts {
            let send = self.notifier.send_notification(
                &message.address,
                &message.subject,
                &message.body,
            );

            match timeout(self.config.delivery_timeout, send).await {
                Ok(Ok(())) => {
                    tracing::debug!(to = %message.address, attempt, "Notification delivered");
                    return DeliveryOutcome::Delivered { attempts: attempt };
                }
                Ok(Err(e)) => last_error = e,
                Err(_) => {
                    last_error =
                        NotificationError::Timeout(self.config.delivery_timeout.as_millis())
                }
            }

            tracing::warn!(
                to = %message.address,
                attempt,
                max_attempts,
                error = %last_error,
                "Notification attempt failed"
            );

            if attempt < max_attempts {
                tokio::time::sleep(self.config.retry_backoff * attempt).await;
            }
        }

        tracing::error!(
            to = %message.address,
            subject = %message.subject,
            error = %last_error,
            "Giving up on notification"
        );

        DeliveryOutcome::GaveUp {
            attempts: max_attempts,
            last_error,
        }
    }
}
