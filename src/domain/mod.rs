//! Domain module
//!
//! Core domain types and business rules.

pub mod amount;
pub mod context;
pub mod error;
pub mod transfer;
pub mod views;

pub use amount::{AmountError, Balance, TransferAmount};
pub use context::OperationContext;
pub use error::DomainError;
pub use transfer::{Account, Transfer, TransferMetadata, TransferRequest};
pub use views::{TransferDetail, TransferSummary};
