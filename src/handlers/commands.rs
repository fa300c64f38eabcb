//! Command outcomes
//!
//! What a transfer command can come back with, short of a storage failure.

use serde::Serialize;

use crate::domain::{DomainError, Transfer};

/// Default page size for "recent transfers" listings
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Outcome of `TransferService::create_transfer`.
///
/// Storage failures are not an outcome: they come back as
/// `Err(LedgerError)` and leave no partial state, so the caller may retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransferOutcome {
    /// Balance and record committed; notification handed off
    Completed { transfer: Transfer },
    /// Turned down before anything was written
    Rejected {
        #[serde(serialize_with = "serialize_reason")]
        reason: DomainError,
    },
}

fn serialize_reason<S: serde::Serializer>(
    reason: &DomainError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&reason.to_string())
}

impl TransferOutcome {
    pub fn completed(transfer: Transfer) -> Self {
        Self::Completed { transfer }
    }

    pub fn rejected(reason: DomainError) -> Self {
        Self::Rejected { reason }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub fn transfer(&self) -> Option<&Transfer> {
        match self {
            Self::Completed { transfer } => Some(transfer),
            Self::Rejected { .. } => None,
        }
    }

    pub fn rejection(&self) -> Option<&DomainError> {
        match self {
            Self::Completed { .. } => None,
            Self::Rejected { reason } => Some(reason),
        }
    }
}
