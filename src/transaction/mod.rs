//! Transaction management for the personal finance API.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and database functions
//! - Route handlers for the transaction endpoints
//!
//! Transactions never participate in the default account flag logic, but
//! every transaction must reference an account that belongs to its owner.

mod core;
mod create_endpoint;
mod get_endpoint;
mod list_endpoint;
mod update_endpoint;

pub use core::{
    Transaction, TransactionKind, create_transaction_table, get_transaction, map_transaction_row,
};
pub use create_endpoint::{NewTransactionData, create_transaction, create_transaction_endpoint};
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::{get_owner_transactions, list_transactions_endpoint};
pub use update_endpoint::{UpdateTransactionData, update_transaction, update_transaction_endpoint};
