//! Handlers module
//!
//! The transfer core: command handling for new transfers and the
//! read-side listings of transfer history.

mod commands;
mod query_handler;
mod transfer_handler;


pub use commands::{TransferOutcome, DEFAULT_RECENT_LIMIT};
pub use transfer_handler::TransferService;
