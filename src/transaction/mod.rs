//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the `Amount` and `TransactionType` value types
//! - Database functions for storing, reading and deleting transactions
//! - Route handlers for listing, fetching, recording, deleting and exporting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod export;
mod get_endpoint;
mod list_endpoint;

pub use core::{
    Amount, NewTransaction, Transaction, TransactionType, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, load_snapshot,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use export::export_transactions_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::get_transactions_endpoint;
