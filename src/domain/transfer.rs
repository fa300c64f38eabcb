//! Transfer and account models
//!
//! A transfer is an immutable, signed-amount record attached to exactly one
//! account. Accounts carry the balance and the owner's notification address.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::amount::{Balance, TransferAmount};

/// Descriptive data supplied by the caller with every transfer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferMetadata {
    pub description: String,

    /// Originating account reference (e.g. an IBAN)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,

    /// Destination account reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

impl TransferMetadata {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self
    }

    pub fn with_recipient_name(mut self, name: impl Into<String>) -> Self {
        self.recipient_name = Some(name.into());
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }
}

/// A request to record a transfer against one account.
///
/// The amount is kept as a raw decimal here; it only becomes a
/// `TransferAmount` once the validator has accepted the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub account_id: Uuid,
    pub amount: Decimal,
    pub metadata: TransferMetadata,
}

impl TransferRequest {
    pub fn new(account_id: Uuid, amount: Decimal, metadata: TransferMetadata) -> Self {
        Self {
            account_id,
            amount,
            metadata,
        }
    }
}

/// A persisted transfer. Never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: Uuid,
    pub account_id: Uuid,
    pub amount: TransferAmount,
    pub made_on: DateTime<Utc>,
    pub metadata: TransferMetadata,
}

/// An account as seen by the transfer core: balance plus who to notify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub owner_email: String,
    pub balance: Balance,
}
