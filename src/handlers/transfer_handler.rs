//! Transfer Service
//!
//! Records a transfer against one account: validation, the atomic balance
//! update plus record append, then a best-effort owner notification.

use std::sync::Arc;

use crate::domain::{DomainError, OperationContext, TransferAmount, TransferRequest};
use crate::ledger::{LedgerError, LedgerStore, NewTransfer};
use crate::notification::{
    NotificationDispatcher, NotificationMessage, DEFAULT_CURRENCY_SYMBOL,
};
use crate::validation::{TransferValidator, Violation};

use super::TransferOutcome;

/// Orchestrates transfer creation and transfer history reads
pub struct TransferService {
    pub(super) store: Arc<dyn LedgerStore>,
    validator: TransferValidator,
    notifications: NotificationDispatcher,
    currency_symbol: String,
}

impl TransferService {
    pub fn new(store: Arc<dyn LedgerStore>, notifications: NotificationDispatcher) -> Self {
        Self {
            store,
            validator: TransferValidator::new(),
            notifications,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    pub fn with_currency_symbol(mut self, currency_symbol: impl Into<String>) -> Self {
        self.currency_symbol = currency_symbol.into();
        self
    }

    /// Create a transfer.
    ///
    /// Validation and unknown-account failures come back as
    /// `TransferOutcome::Rejected` with nothing written. A failed commit is
    /// `Err` and is safe to retry.
    pub async fn create_transfer(
        &self,
        request: TransferRequest,
        context: &OperationContext,
    ) -> Result<TransferOutcome, LedgerError> {
        let account_id = request.account_id;
        let correlation_id = context.correlation_id;

        let validation = self.validator.validate(&request);
        if !validation.is_valid() {
            tracing::info!(
                %account_id,
                ?correlation_id,
                violations = validation.violations().len(),
                "Transfer rejected: invalid request"
            );
            return Ok(TransferOutcome::rejected(DomainError::invalid(
                validation.into_violations(),
            )));
        }

        let amount = match TransferAmount::new(request.amount) {
            Ok(amount) => amount,
            Err(e) => {
                return Ok(TransferOutcome::rejected(DomainError::invalid(vec![
                    Violation::new("amount", e.to_string()),
                ])))
            }
        };

        let Some(account) = self.store.find_account(account_id).await? else {
            tracing::info!(%account_id, ?correlation_id, "Transfer rejected: account not found");
            return Ok(TransferOutcome::rejected(DomainError::AccountNotFound(
                account_id,
            )));
        };

        let applied = match self
            .store
            .apply_transfer(NewTransfer {
                account_id,
                amount,
                metadata: request.metadata,
            })
            .await
        {
            Ok(applied) => applied,
            Err(LedgerError::AccountNotFound(id)) => {
                return Ok(TransferOutcome::rejected(DomainError::AccountNotFound(id)));
            }
            Err(e) => {
                tracing::error!(
                    %account_id,
                    ?correlation_id,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Transfer commit failed"
                );
                return Err(e);
            }
        };

        tracing::info!(
            transfer_id = %applied.transfer.id,
            %account_id,
            amount = %amount,
            balance = %applied.balance,
            ?correlation_id,
            "Transfer committed"
        );

        // Post-commit: nothing below may turn this into a failure
        let message = NotificationMessage::for_transfer(
            account.owner_email,
            &applied.transfer.amount,
            &self.currency_symbol,
        );
        let status = self.notifications.dispatch(message);
        tracing::debug!(transfer_id = %applied.transfer.id, ?status, "Notification dispatched");

        Ok(TransferOutcome::completed(applied.transfer))
    }
}
