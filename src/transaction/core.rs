//! Defines the core data model and database queries for transactions.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{AccountId, TransactionId},
    owner::OwnerId,
};

/// Whether a transaction adds money to an account or spends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in, e.g. a salary payment.
    Income,
    /// Money going out, e.g. a purchase.
    Expense,
}

impl TransactionKind {
    /// The string stored in the database for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// An expense or income recorded against one of an owner's accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the account the transaction was recorded against.
    pub account_id: AccountId,
    /// The ID of the owner of the account.
    pub owner_id: OwnerId,
    /// The amount of money spent or earned, in dollars.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// A label used to group transactions in reports, e.g. "groceries".
    pub category: String,
    /// Free text describing the transaction.
    pub description: Option<String>,
}

/// Create the transaction table.
///
/// # Errors
/// This function will return an error if the SQL query failed.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            account_id INTEGER NOT NULL,
            owner_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            kind TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT,
            FOREIGN KEY (account_id) REFERENCES account (id),
            FOREIGN KEY (owner_id) REFERENCES owner (id)
        )",
        (),
    )?;

    Ok(())
}

/// Convert a row from the transaction table into a [Transaction].
///
/// **Note:** This function expects the row to contain all the transaction
/// columns in the order they were defined.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        owner_id: OwnerId::new(row.get(2)?),
        amount: row.get(3)?,
        date: row.get(4)?,
        kind: row.get(5)?,
        category: row.get(6)?,
        description: row.get(7)?,
    })
}

/// Get the transaction with the ID `id` if it belongs to `owner_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist or belongs to
/// a different owner.
pub fn get_transaction(
    id: TransactionId,
    owner_id: OwnerId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, account_id, owner_id, amount, date, kind, category, description
             FROM \"transaction\"
             WHERE id = :id AND owner_id = :owner_id",
        )?
        .query_row(
            &[(":id", &id), (":owner_id", &owner_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}
