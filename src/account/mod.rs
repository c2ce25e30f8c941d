//! Account management for the personal finance API.
//!
//! This module contains everything related to accounts:
//! - The `Account` model and database functions
//! - The single default account rule: once an owner has any account, exactly
//!   one of them is flagged as the default
//! - Route handlers for the account endpoints

mod core;
mod create_endpoint;
mod list_endpoint;
mod set_default_endpoint;

pub use core::{Account, AccountKind, create_account_table, get_account, map_row_to_account};
pub use create_endpoint::{NewAccountData, create_account, create_account_endpoint};
pub use list_endpoint::{AccountSummary, list_accounts, list_accounts_endpoint};
pub use set_default_endpoint::{set_default_account, set_default_account_endpoint};
