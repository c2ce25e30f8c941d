//! Code for creating the owner table and resolving owners from the database.
//!
//! An owner is whoever the hosting environment authenticated. This service
//! never checks passwords; it only maps an opaque API key back to an owner ID
//! so that every query can be scoped to that owner.

use std::fmt::Display;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A newtype wrapper for integer owner IDs.
///
/// This helps disambiguate owner IDs from other types of IDs, leading to
/// better compile time errors, and more flexible generics that can have
/// distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct OwnerId(i64);

impl OwnerId {
    /// Create a new owner ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the owner ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An owner of accounts and transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    /// The owner's ID in the application database.
    pub id: OwnerId,
    /// The opaque credential that maps requests back to this owner.
    pub api_key: String,
}

/// Create the owner table.
///
/// # Errors
/// This function will return an error if the SQL query failed.
pub fn create_owner_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS owner (
            id INTEGER PRIMARY KEY,
            api_key TEXT NOT NULL UNIQUE
        )",
        (),
    )?;

    Ok(())
}

/// Create a new owner with the given API key.
///
/// There is no public route for this. Owners are provisioned by the hosting
/// environment, the seeding binary, or tests.
///
/// # Errors
/// Returns an error if `api_key` is already in use or there is an SQL error.
pub fn create_owner(api_key: &str, connection: &Connection) -> Result<Owner, Error> {
    connection.execute("INSERT INTO owner (api_key) VALUES (?1)", (api_key,))?;

    let id = connection.last_insert_rowid();

    Ok(Owner {
        id: OwnerId::new(id),
        api_key: api_key.to_owned(),
    })
}

/// Get the owner with the ID `id`.
///
/// # Errors
/// Returns [Error::NotFound] if no owner has the ID `id`.
pub fn get_owner(id: OwnerId, connection: &Connection) -> Result<Owner, Error> {
    let owner = connection
        .prepare("SELECT id, api_key FROM owner WHERE id = :id")?
        .query_row(&[(":id", &id.as_i64())], |row| {
            Ok(Owner {
                id: OwnerId::new(row.get(0)?),
                api_key: row.get(1)?,
            })
        })?;

    Ok(owner)
}

/// Resolve an API key to the ID of the owner it belongs to.
///
/// # Errors
/// Returns [Error::Unauthenticated] if the API key does not match any owner.
pub fn resolve_owner(api_key: &str, connection: &Connection) -> Result<OwnerId, Error> {
    connection
        .prepare("SELECT id FROM owner WHERE api_key = :api_key")?
        .query_row(&[(":api_key", &api_key)], |row| {
            row.get(0).map(OwnerId::new)
        })
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::Unauthenticated,
            error => error.into(),
        })
}
