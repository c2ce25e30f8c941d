//! Database initialisation for the application's SQLite schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, account::create_account_table, owner::create_owner_table,
    transaction::create_transaction_table,
};

/// Create the application tables if they do not already exist.
///
/// The tables are created inside a single exclusive transaction so a partially
/// initialised schema is never left behind.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_owner_table(&transaction)?;
    create_account_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
