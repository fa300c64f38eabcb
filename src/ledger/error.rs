//! Ledger Store Errors
//!
//! Error types for ledger store operations.

use uuid::Uuid;

use crate::domain::AmountError;

/// Errors that can occur in the ledger store
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Concurrent unit of work on the same account could not be serialized
    #[error("Concurrency conflict on account {account_id}")]
    ConcurrencyConflict { account_id: Uuid },

    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Balance arithmetic failed
    #[error("Balance error: {0}")]
    Balance(#[from] AmountError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored row could not be turned back into a domain value
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),

    /// Non-database storage failure (lock poisoning, injected faults)
    #[error("Storage failure: {0}")]
    Storage(String),

    /// Maximum retries exceeded
    #[error("Maximum retries exceeded for transfer commit")]
    MaxRetriesExceeded,
}

impl LedgerError {
    /// Nothing was committed and the whole operation may be run again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LedgerError::ConcurrencyConflict { .. }
                | LedgerError::MaxRetriesExceeded
                | LedgerError::Database(_)
                | LedgerError::Storage(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let conflict = LedgerError::ConcurrencyConflict {
            account_id: Uuid::nil(),
        };
        assert!(conflict.is_retryable());

        assert!(LedgerError::Storage("disk full".to_string()).is_retryable());
        assert!(!LedgerError::AccountNotFound(Uuid::nil()).is_retryable());
        assert!(!LedgerError::InvalidRecord("amount 0".to_string()).is_retryable());
    }
}
