//! Defines the core data model and database queries for accounts.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::AccountId, owner::OwnerId};

/// The kind of financial account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// An everyday spending account.
    Checking,
    /// An interest bearing savings account.
    Savings,
}

impl AccountKind {
    /// The string stored in the database for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
        }
    }
}

impl ToSql for AccountKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AccountKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "checking" => Ok(AccountKind::Checking),
            "savings" => Ok(AccountKind::Savings),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// A financial account held by an owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The ID of the owner the account belongs to.
    pub owner_id: OwnerId,
    /// The display name of the account, unique per owner.
    pub name: String,
    /// The kind of account.
    pub kind: AccountKind,
    /// The balance in dollars.
    pub balance: f64,
    /// Whether this account is the owner's default account.
    ///
    /// At most one account per owner has this flag set, and exactly one once
    /// the owner has any account.
    pub is_default: bool,
    /// When the account was created.
    pub created_at: OffsetDateTime,
}

/// Create the account table.
///
/// # Errors
/// This function will return an error if the SQL query failed.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            owner_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            balance REAL NOT NULL,
            is_default INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            UNIQUE (owner_id, name),
            FOREIGN KEY (owner_id) REFERENCES owner (id)
        )",
        (),
    )?;

    Ok(())
}

/// Convert a row from the account table into an [Account].
///
/// **Note:** This function expects the row to contain all the account columns
/// in the order they were defined.
pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        owner_id: OwnerId::new(row.get(1)?),
        name: row.get(2)?,
        kind: row.get(3)?,
        balance: row.get(4)?,
        is_default: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Get the account with the ID `id` if it belongs to `owner_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist or belongs to a
/// different owner.
pub fn get_account(
    id: AccountId,
    owner_id: OwnerId,
    connection: &Connection,
) -> Result<Account, Error> {
    let account = connection
        .prepare(
            "SELECT id, owner_id, name, kind, balance, is_default, created_at
             FROM account
             WHERE id = :id AND owner_id = :owner_id",
        )?
        .query_row(
            &[(":id", &id), (":owner_id", &owner_id.as_i64())],
            map_row_to_account,
        )?;

    Ok(account)
}

#[cfg(test)]
pub(crate) fn count_default_accounts(owner_id: OwnerId, connection: &Connection) -> i64 {
    connection
        .query_row(
            "SELECT COUNT(id) FROM account WHERE owner_id = ?1 AND is_default = 1",
            rusqlite::params![owner_id.as_i64()],
            |row| row.get(0),
        )
        .expect("could not count default accounts")
}
