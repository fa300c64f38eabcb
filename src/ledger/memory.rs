//! In-Memory Ledger Store
//!
//! Balance update and record append happen under one write lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{Account, Balance, Transfer};

use super::{AppliedTransfer, LedgerError, LedgerStore, NewTransfer, TransferFilter, TransferScope};

/// In-memory ledger for tests, local demos, and embedding.
///
/// Every unit of work runs under one write lock, so concurrent transfers
/// against the same account apply one after another.
#[derive(Default)]
pub struct InMemoryLedgerStore {
    inner: RwLock<LedgerState>,
    fail_next_commit: AtomicBool,
}

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<Uuid, Account>,
    /// Append-only, in commit order
    transfers: Vec<Transfer>,
    last_made_on: Option<DateTime<Utc>>,
}

impl LedgerState {
    /// Wall-clock time, nudged forward so no two transfers share a timestamp
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let made_on = match self.last_made_on {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_made_on = Some(made_on);
        made_on
    }
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account with an opening balance.
    pub fn open_account(
        &self,
        user_id: Uuid,
        owner_email: impl Into<String>,
        opening_balance: Decimal,
    ) -> Result<Account, LedgerError> {
        let account = Account {
            id: Uuid::new_v4(),
            user_id,
            owner_email: owner_email.into(),
            balance: Balance::new(opening_balance),
        };

        let mut state = self.write()?;
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    /// Make the next `apply_transfer` fail after its balance write has been
    /// staged but before anything is published.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Total number of transfer records across all accounts
    pub fn transfer_count(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.transfers.len())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .read()
            .map_err(|_| LedgerError::Storage("ledger lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .write()
            .map_err(|_| LedgerError::Storage("ledger lock poisoned".into()))
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn find_account(&self, account_id: Uuid) -> Result<Option<Account>, LedgerError> {
        Ok(self.read()?.accounts.get(&account_id).cloned())
    }

    async fn apply_transfer(&self, transfer: NewTransfer) -> Result<AppliedTransfer, LedgerError> {
        let mut guard = self.write()?;
        let state = &mut *guard;

        // Stage both writes before touching shared state
        let staged_balance = state
            .accounts
            .get(&transfer.account_id)
            .ok_or(LedgerError::AccountNotFound(transfer.account_id))?
            .balance
            .apply(&transfer.amount)?;

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::Storage("injected commit failure".into()));
        }

        let record = Transfer {
            id: Uuid::new_v4(),
            account_id: transfer.account_id,
            amount: transfer.amount,
            made_on: state.next_timestamp(),
            metadata: transfer.metadata,
        };

        // Publish
        if let Some(account) = state.accounts.get_mut(&transfer.account_id) {
            account.balance = staged_balance;
        }
        state.transfers.push(record.clone());

        Ok(AppliedTransfer {
            transfer: record,
            balance: staged_balance,
        })
    }

    async fn list_transfers(&self, filter: TransferFilter) -> Result<Vec<Transfer>, LedgerError> {
        let state = self.read()?;
        let limit = filter.limit.unwrap_or(usize::MAX);

        let matches = |transfer: &&Transfer| match filter.scope {
            TransferScope::Account(account_id) => transfer.account_id == account_id,
            TransferScope::User(user_id) => state
                .accounts
                .get(&transfer.account_id)
                .is_some_and(|account| account.user_id == user_id),
        };

        // Commit order equals timestamp order, so newest first is a reverse walk
        Ok(state
            .transfers
            .iter()
            .rev()
            .filter(matches)
            .take(limit)
            .cloned()
            .collect())
    }
}
