//! Ledger Store port
//!
//! The storage boundary the transfer core depends on. Implementations must
//! make `apply_transfer` a single unit of work: the balance update and the
//! record insert are both visible or neither is.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Account, Balance, Transfer, TransferAmount, TransferMetadata};

use super::LedgerError;

/// A validated transfer waiting to be written
#[derive(Debug, Clone)]
pub struct NewTransfer {
    pub account_id: Uuid,
    pub amount: TransferAmount,
    pub metadata: TransferMetadata,
}

/// Result of a committed unit of work
#[derive(Debug, Clone)]
pub struct AppliedTransfer {
    pub transfer: Transfer,
    /// Account balance right after this transfer
    pub balance: Balance,
}

/// Which transfers a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferScope {
    /// Every account owned by the user
    User(Uuid),
    Account(Uuid),
}

/// Filter for transfer listings. Results are always newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferFilter {
    pub scope: TransferScope,
    pub limit: Option<usize>,
}

impl TransferFilter {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            scope: TransferScope::User(user_id),
            limit: None,
        }
    }

    pub fn for_account(account_id: Uuid) -> Self {
        Self {
            scope: TransferScope::Account(account_id),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Durable storage for accounts and their transfer history.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Point lookup of an account, including its owner's email
    async fn find_account(&self, account_id: Uuid) -> Result<Option<Account>, LedgerError>;

    /// Add the amount to the account balance and append the transfer record
    /// as one atomic unit. `made_on` is assigned by the store at write time.
    async fn apply_transfer(&self, transfer: NewTransfer) -> Result<AppliedTransfer, LedgerError>;

    /// Transfers matching the filter, ordered by `made_on` descending
    async fn list_transfers(&self, filter: TransferFilter) -> Result<Vec<Transfer>, LedgerError>;
}
