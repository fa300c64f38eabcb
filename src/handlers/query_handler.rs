//! Transfer history reads
//!
//! Every listing is newest first and projected through a caller-supplied
//! mapping, e.g. `TransferSummary::from` or a closure.

use uuid::Uuid;

use crate::domain::Transfer;
use crate::ledger::{LedgerError, TransferFilter};

use super::TransferService;

impl TransferService {
    /// All transfers on every account the user owns
    pub async fn list_transfers_for_user<V, F>(
        &self,
        user_id: Uuid,
        view: F,
    ) -> Result<Vec<V>, LedgerError>
    where
        F: FnMut(Transfer) -> V,
    {
        self.list(TransferFilter::for_user(user_id), view).await
    }

    /// All transfers on one account
    pub async fn list_transfers_for_account<V, F>(
        &self,
        account_id: Uuid,
        view: F,
    ) -> Result<Vec<V>, LedgerError>
    where
        F: FnMut(Transfer) -> V,
    {
        self.list(TransferFilter::for_account(account_id), view).await
    }

    /// The `limit` most recent transfers for the user; a prefix of
    /// `list_transfers_for_user`. See `DEFAULT_RECENT_LIMIT`.
    pub async fn list_recent_transfers_for_user<V, F>(
        &self,
        user_id: Uuid,
        limit: usize,
        view: F,
    ) -> Result<Vec<V>, LedgerError>
    where
        F: FnMut(Transfer) -> V,
    {
        self.list(TransferFilter::for_user(user_id).with_limit(limit), view)
            .await
    }

    async fn list<V, F>(&self, filter: TransferFilter, view: F) -> Result<Vec<V>, LedgerError>
    where
        F: FnMut(Transfer) -> V,
    {
        let transfers = self.store.list_transfers(filter).await?;
        tracing::debug!(?filter, count = transfers.len(), "Listed transfers");
        Ok(transfers.into_iter().map(view).collect())
    }
}
