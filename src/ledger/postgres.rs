//! PostgreSQL Ledger Store
//!
//! Balance update and transfer insert run inside one database transaction.
//! The `UPDATE ... RETURNING` takes the account row lock, so concurrent
//! transfers against the same account queue behind each other instead of
//! overwriting one another's balance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::{Account, Balance, Transfer, TransferAmount, TransferMetadata};

use super::{
    AppliedTransfer, LedgerError, LedgerStore, NewTransfer, TransferFilter, TransferScope,
};

const MAX_RETRIES: u32 = 3;

/// SQLSTATEs that mean "nothing committed, run it again"
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Ledger Store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct TransferRow {
    id: Uuid,
    account_id: Uuid,
    amount: Decimal,
    made_on: DateTime<Utc>,
    description: String,
    source: Option<String>,
    sender_name: Option<String>,
    recipient_name: Option<String>,
    destination: Option<String>,
}

impl TryFrom<TransferRow> for Transfer {
    type Error = LedgerError;

    fn try_from(row: TransferRow) -> Result<Self, Self::Error> {
        let amount = TransferAmount::new(row.amount).map_err(|e| {
            LedgerError::InvalidRecord(format!("transfer {} amount: {}", row.id, e))
        })?;

        Ok(Transfer {
            id: row.id,
            account_id: row.account_id,
            amount,
            made_on: row.made_on,
            metadata: TransferMetadata {
                description: row.description,
                source: row.source,
                sender_name: row.sender_name,
                recipient_name: row.recipient_name,
                destination: row.destination,
            },
        })
    }
}

impl PgLedgerStore {
    /// Create a new PgLedgerStore with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Single attempt at the unit of work
    async fn try_apply_transfer(
        &self,
        transfer: &NewTransfer,
    ) -> Result<AppliedTransfer, LedgerError> {
        let mut tx = self.pool.begin().await?;

        let balance: Option<Decimal> = sqlx::query_scalar(
            r#"
            UPDATE accounts
            SET balance = balance + $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING balance
            "#,
        )
        .bind(transfer.account_id)
        .bind(transfer.amount.value())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| classify(e, transfer.account_id))?;

        let Some(balance) = balance else {
            tx.rollback().await?;
            return Err(LedgerError::AccountNotFound(transfer.account_id));
        };

        let transfer_id = Uuid::new_v4();
        let metadata = &transfer.metadata;

        // clock_timestamp(), not NOW(): the time of this write, not of BEGIN
        let made_on: DateTime<Utc> = sqlx::query_scalar(
            r#"
            INSERT INTO transfers (
                id, account_id, amount, made_on,
                description, source, sender_name, recipient_name, destination
            )
            VALUES ($1, $2, $3, clock_timestamp(), $4, $5, $6, $7, $8)
            RETURNING made_on
            "#,
        )
        .bind(transfer_id)
        .bind(transfer.account_id)
        .bind(transfer.amount.value())
        .bind(&metadata.description)
        .bind(&metadata.source)
        .bind(&metadata.sender_name)
        .bind(&metadata.recipient_name)
        .bind(&metadata.destination)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify(e, transfer.account_id))?;

        tx.commit()
            .await
            .map_err(|e| classify(e, transfer.account_id))?;

        Ok(AppliedTransfer {
            transfer: Transfer {
                id: transfer_id,
                account_id: transfer.account_id,
                amount: transfer.amount,
                made_on,
                metadata: transfer.metadata.clone(),
            },
            balance: Balance::new(balance),
        })
    }
}

/// Map serialization and deadlock failures to a conflict; keep the rest
fn classify(error: sqlx::Error, account_id: Uuid) -> LedgerError {
    if let sqlx::Error::Database(ref db) = error {
        if matches!(
            db.code().as_deref(),
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
        ) {
            return LedgerError::ConcurrencyConflict { account_id };
        }
    }
    LedgerError::Database(error)
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn find_account(&self, account_id: Uuid) -> Result<Option<Account>, LedgerError> {
        let row: Option<(Uuid, Uuid, String, Decimal)> = sqlx::query_as(
            r#"
            SELECT a.id, a.user_id, u.email, a.balance
            FROM accounts a
            JOIN users u ON u.id = a.user_id
            WHERE a.id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, user_id, owner_email, balance)| Account {
            id,
            user_id,
            owner_email,
            balance: Balance::new(balance),
        }))
    }

    async fn apply_transfer(&self, transfer: NewTransfer) -> Result<AppliedTransfer, LedgerError> {
        for attempt in 0..MAX_RETRIES {
            match self.try_apply_transfer(&transfer).await {
                Ok(applied) => return Ok(applied),
                Err(LedgerError::ConcurrencyConflict { .. }) if attempt < MAX_RETRIES - 1 => {
                    let delay = Duration::from_millis(50 * (attempt as u64 + 1));
                    tracing::warn!(
                        account_id = %transfer.account_id,
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        "Concurrency conflict, retrying transfer commit"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }

        Err(LedgerError::MaxRetriesExceeded)
    }

    async fn list_transfers(&self, filter: TransferFilter) -> Result<Vec<Transfer>, LedgerError> {
        // NULL limit means no limit
        let limit = filter.limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));

        let rows: Vec<TransferRow> = match filter.scope {
            TransferScope::User(user_id) => {
                sqlx::query_as(
                    r#"
                    SELECT t.id, t.account_id, t.amount, t.made_on,
                           t.description, t.source, t.sender_name, t.recipient_name, t.destination
                    FROM transfers t
                    JOIN accounts a ON a.id = t.account_id
                    WHERE a.user_id = $1
                    ORDER BY t.made_on DESC, t.seq DESC
                    LIMIT $2
                    "#,
                )
                .bind(user_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            TransferScope::Account(account_id) => {
                sqlx::query_as(
                    r#"
                    SELECT t.id, t.account_id, t.amount, t.made_on,
                           t.description, t.source, t.sender_name, t.recipient_name, t.destination
                    FROM transfers t
                    WHERE t.account_id = $1
                    ORDER BY t.made_on DESC, t.seq DESC
                    LIMIT $2
                    "#,
                )
                .bind(account_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Transfer::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(amount: Decimal) -> TransferRow {
        TransferRow {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            amount,
            made_on: Utc::now(),
            description: "Deposit".to_string(),
            source: None,
            sender_name: Some("Employer".to_string()),
            recipient_name: None,
            destination: None,
        }
    }

    #[test]
    fn test_row_into_transfer() {
        let transfer = Transfer::try_from(row(dec!(250.00))).unwrap();
        assert_eq!(transfer.amount.value(), dec!(250.00));
        assert_eq!(transfer.metadata.sender_name.as_deref(), Some("Employer"));
    }

    #[test]
    fn test_zero_row_is_invalid_record() {
        let result = Transfer::try_from(row(Decimal::ZERO));
        assert!(matches!(result, Err(LedgerError::InvalidRecord(_))));
    }

    #[test]
    fn test_classify_keeps_non_database_errors() {
        let err = classify(sqlx::Error::RowNotFound, Uuid::nil());
        assert!(matches!(err, LedgerError::Database(sqlx::Error::RowNotFound)));
    }
}
