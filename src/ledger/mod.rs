//! Ledger Store module
//!
//! Durable storage for accounts and their immutable transfer history.

mod error;
mod memory;
mod postgres;
mod store;

pub use error::LedgerError;
pub use memory::InMemoryLedgerStore;
pub use postgres::PgLedgerStore;
pub use store::{AppliedTransfer, LedgerStore, NewTransfer, TransferFilter, TransferScope};
