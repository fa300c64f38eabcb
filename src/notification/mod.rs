//! Notification module
//!
//! Best-effort messages to account owners after a transfer commits.
//! Delivery happens on a background worker, outside the ledger's unit of work.

mod message;
mod notifier;
mod worker;

pub use message::{format_money, NotificationMessage, TransferDirection, DEFAULT_CURRENCY_SYMBOL};
pub use notifier::{NotificationError, Notifier, TracingNotifier};
pub use worker::{
    notification_channel, DeliveryOutcome, DispatchStatus, NotificationConfig,
    NotificationDispatcher, NotificationWorker,
};
