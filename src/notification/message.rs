//! Notification messages
//!
//! Builds the subject and body sent to an account owner after a transfer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::TransferAmount;

const RECEIVED_SUBJECT: &str = "You've received money";
const RECEIVED_BODY: &str =
    "have been transferred to your account. Please log in your account for additional information.";

const SENT_SUBJECT: &str = "You've sent money";
const SENT_BODY: &str = "have been transferred from your account. If it was not you, please contact our support center as fast as possible!";

/// Default currency symbol for amounts shown to users
pub const DEFAULT_CURRENCY_SYMBOL: &str = "€";

/// Which side of the account the money moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferDirection {
    Received,
    Sent,
}

impl TransferDirection {
    pub fn of(amount: &TransferAmount) -> Self {
        if amount.is_credit() {
            Self::Received
        } else {
            Self::Sent
        }
    }
}

/// One message for the Notifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub address: String,
    pub subject: String,
    pub body: String,
    pub direction: TransferDirection,
}

impl NotificationMessage {
    /// Message telling the owner of `address` about a committed transfer.
    /// The amount is always shown as a positive value.
    pub fn for_transfer(
        address: impl Into<String>,
        amount: &TransferAmount,
        currency_symbol: &str,
    ) -> Self {
        let direction = TransferDirection::of(amount);
        let money = format_money(currency_symbol, amount.magnitude());

        let (subject, body) = match direction {
            TransferDirection::Received => (RECEIVED_SUBJECT, RECEIVED_BODY),
            TransferDirection::Sent => (SENT_SUBJECT, SENT_BODY),
        };

        Self {
            address: address.into(),
            subject: subject.to_string(),
            body: format!("{money} {body}"),
            direction,
        }
    }
}

/// Currency display form: symbol followed by exactly two decimals
pub fn format_money(currency_symbol: &str, value: Decimal) -> String {
    format!("{currency_symbol}{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_received_message() {
        let amount = TransferAmount::new(dec!(50.00)).unwrap();
        let message = NotificationMessage::for_transfer("a@example.com", &amount, "€");

        assert_eq!(message.address, "a@example.com");
        assert_eq!(message.subject, "You've received money");
        assert_eq!(message.direction, TransferDirection::Received);
        assert!(message.body.starts_with("€50.00 have been transferred to your account."));
    }

    #[test]
    fn test_sent_message_uses_absolute_value() {
        let amount = TransferAmount::new(dec!(-50)).unwrap();
        let message = NotificationMessage::for_transfer("a@example.com", &amount, "€");

        assert_eq!(message.subject, "You've sent money");
        assert_eq!(message.direction, TransferDirection::Sent);
        assert!(message.body.contains("50.00"));
        assert!(!message.body.contains("-50"));
        assert!(message.body.contains("contact our support center"));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("€", dec!(7.5)), "€7.50");
        assert_eq!(format_money("$", dec!(1234)), "$1234.00");
        assert_eq!(format_money("£", dec!(0.01)), "£0.01");
    }
}
