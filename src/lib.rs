//! bank_transfers Library
//!
//! Money transfers against bank accounts: an atomic balance update plus an
//! immutable transfer record, then a best-effort owner notification.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod handlers;
pub mod ledger;
pub mod notification;
pub mod validation;

pub use config::Config;
pub use error::{AppError, ErrorResponse};
pub use domain::{
    Account, AmountError, Balance, DomainError, OperationContext, Transfer, TransferAmount,
    TransferDetail, TransferMetadata, TransferRequest, TransferSummary,
};
pub use handlers::{TransferOutcome, TransferService};
pub use ledger::{InMemoryLedgerStore, LedgerError, LedgerStore, PgLedgerStore};
