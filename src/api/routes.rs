//! API Routes
//!
//! HTTP endpoint definitions.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{
    DomainError, OperationContext, TransferDetail, TransferMetadata, TransferRequest,
    TransferSummary,
};
use crate::error::AppError;
use crate::handlers::{TransferOutcome, TransferService, DEFAULT_RECENT_LIMIT};

/// Upper bound for `?limit=` on the recent-transfers endpoint
pub const MAX_RECENT_LIMIT: usize = 100;

/// Shared router state
#[derive(Clone)]
pub struct AppState {
    pub transfers: Arc<TransferService>,
}

impl AppState {
    pub fn new(transfers: Arc<TransferService>) -> Self {
        Self { transfers }
    }
}

// =========================================================================
// Request types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    pub account_id: Uuid,
    /// Signed decimal string, e.g. "-25.50"
    pub amount: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub recipient_name: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
}

impl CreateTransferRequest {
    fn into_transfer_request(self) -> Result<TransferRequest, AppError> {
        let amount = Decimal::from_str(self.amount.trim())
            .map_err(|_| AppError::InvalidRequest(format!("amount '{}' is not a decimal", self.amount)))?;

        let metadata = TransferMetadata {
            description: self.description,
            source: self.source,
            sender_name: self.sender_name,
            recipient_name: self.recipient_name,
            destination: self.destination,
        };

        Ok(TransferRequest::new(self.account_id, amount, metadata))
    }
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

impl RecentQuery {
    fn limit(&self) -> Result<usize, AppError> {
        match self.limit {
            None => Ok(DEFAULT_RECENT_LIMIT),
            Some(0) => Err(AppError::InvalidRequest(
                "limit must be greater than zero".to_string(),
            )),
            Some(limit) => Ok(limit.min(MAX_RECENT_LIMIT)),
        }
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/transfers", post(create_transfer))
        .route("/users/:user_id/transfers", get(list_user_transfers))
        .route("/users/:user_id/transfers/recent", get(list_recent_user_transfers))
        .route("/accounts/:account_id/transfers", get(list_account_transfers))
}

// =========================================================================
// POST /transfers
// =========================================================================

/// Record a transfer against one account
async fn create_transfer(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<CreateTransferRequest>,
) -> Result<(StatusCode, Json<TransferDetail>), AppError> {
    let request = request.into_transfer_request()?;

    match state.transfers.create_transfer(request, &context).await? {
        TransferOutcome::Completed { transfer } => {
            Ok((StatusCode::CREATED, Json(TransferDetail::from(transfer))))
        }
        TransferOutcome::Rejected { reason } => {
            Err(AppError::Domain(with_body_field_names(reason)))
        }
    }
}

/// Metadata travels flat in `CreateTransferRequest`, so violations name the
/// body field (`description`) rather than the nested one (`metadata.description`).
fn with_body_field_names(reason: DomainError) -> DomainError {
    match reason {
        DomainError::InvalidTransfer { mut violations } => {
            for violation in &mut violations {
                if let Some(field) = violation.field.strip_prefix("metadata.") {
                    violation.field = field.to_string();
                }
            }
            DomainError::InvalidTransfer { violations }
        }
        other => other,
    }
}

// =========================================================================
// GET /users/:user_id/transfers
// =========================================================================

/// Full transfer history for a user, newest first
async fn list_user_transfers(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<TransferSummary>>, AppError> {
    let transfers = state
        .transfers
        .list_transfers_for_user(user_id, TransferSummary::from)
        .await?;

    Ok(Json(transfers))
}

// =========================================================================
// GET /users/:user_id/transfers/recent
// =========================================================================

/// Most recent transfers for a user
async fn list_recent_user_transfers(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<TransferSummary>>, AppError> {
    let limit = query.limit()?;

    let transfers = state
        .transfers
        .list_recent_transfers_for_user(user_id, limit, TransferSummary::from)
        .await?;

    Ok(Json(transfers))
}

// =========================================================================
// GET /accounts/:account_id/transfers
// =========================================================================

/// Full transfer history for one account, newest first
async fn list_account_transfers(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Vec<TransferDetail>>, AppError> {
    let transfers = state
        .transfers
        .list_transfers_for_account(account_id, TransferDetail::from)
        .await?;

    Ok(Json(transfers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Violation;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_transfer_request_deserialize() {
        let json = r#"{
            "account_id": "550e8400-e29b-41d4-a716-446655440001",
            "amount": "-100.50",
            "description": "Rent",
            "recipient_name": "Landlord Ltd"
        }"#;

        let request: CreateTransferRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount, "-100.50");
        assert!(request.source.is_none());

        let request = request.into_transfer_request().unwrap();
        assert_eq!(request.amount, dec!(-100.50));
        assert_eq!(request.metadata.description, "Rent");
        assert_eq!(request.metadata.recipient_name.as_deref(), Some("Landlord Ltd"));
    }

    #[test]
    fn test_unparseable_amount_is_invalid_request() {
        let request = CreateTransferRequest {
            account_id: Uuid::new_v4(),
            amount: "ten euros".to_string(),
            description: "Gift".to_string(),
            source: None,
            sender_name: None,
            recipient_name: None,
            destination: None,
        };

        assert!(matches!(
            request.into_transfer_request(),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_violations_use_body_field_names() {
        let reason = DomainError::invalid(vec![
            Violation::new("amount", "must not be zero"),
            Violation::new("metadata.description", "must not be blank"),
            Violation::new("metadata.sender_name", "must not contain control characters"),
        ]);

        let fields: Vec<String> = with_body_field_names(reason)
            .violations()
            .iter()
            .map(|v| v.field.clone())
            .collect();
        assert_eq!(fields, vec!["amount", "description", "sender_name"]);

        let id = Uuid::new_v4();
        assert_eq!(
            with_body_field_names(DomainError::AccountNotFound(id)),
            DomainError::AccountNotFound(id)
        );
    }

    #[test]
    fn test_recent_query_limit() {
        let query: RecentQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit().unwrap(), DEFAULT_RECENT_LIMIT);

        let query = RecentQuery { limit: Some(500) };
        assert_eq!(query.limit().unwrap(), MAX_RECENT_LIMIT);

        let query = RecentQuery { limit: Some(0) };
        assert!(query.limit().is_err());
    }
}
