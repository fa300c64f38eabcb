//! Read views
//!
//! Fixed projections of a `Transfer` for callers that don't want to supply
//! their own mapping. Each is built with a plain `From<Transfer>`, so
//! `TransferSummary::from` can be handed straight to the list operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transfer::{Transfer, TransferMetadata};

/// Compact row for history listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSummary {
    pub id: Uuid,
    pub amount: Decimal,
    pub made_on: DateTime<Utc>,
    pub description: String,
}

impl From<Transfer> for TransferSummary {
    fn from(transfer: Transfer) -> Self {
        Self {
            id: transfer.id,
            amount: transfer.amount.value(),
            made_on: transfer.made_on,
            description: transfer.metadata.description,
        }
    }
}

/// Every canonical field of a transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDetail {
    pub id: Uuid,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub made_on: DateTime<Utc>,
    #[serde(flatten)]
    pub metadata: TransferMetadata,
}

impl From<Transfer> for TransferDetail {
    fn from(transfer: Transfer) -> Self {
        Self {
            id: transfer.id,
            account_id: transfer.account_id,
            amount: transfer.amount.value(),
            made_on: transfer.made_on,
            metadata: transfer.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransferAmount;
    use rust_decimal_macros::dec;

    fn sample() -> Transfer {
        Transfer {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            amount: TransferAmount::new(dec!(-20.00)).unwrap(),
            made_on: Utc::now(),
            metadata: TransferMetadata::new("Coffee").with_destination("NL91ABNA0417164300"),
        }
    }

    #[test]
    fn test_summary_projection() {
        let transfer = sample();
        let summary = TransferSummary::from(transfer.clone());

        assert_eq!(summary.id, transfer.id);
        assert_eq!(summary.amount, dec!(-20.00));
        assert_eq!(summary.description, "Coffee");
    }

    #[test]
    fn test_detail_serializes_flat_metadata() {
        let detail = TransferDetail::from(sample());
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["description"], "Coffee");
        assert_eq!(json["destination"], "NL91ABNA0417164300");
        assert!(json.get("source").is_none());
        assert!(json.get("metadata").is_none());
    }
}
