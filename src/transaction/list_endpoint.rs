//! Defines the endpoint for listing an owner's transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    owner::OwnerId,
    response::ok_response,
    transaction::core::{Transaction, map_transaction_row},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing the owner's transactions.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Extension(owner_id): Extension<OwnerId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_owner_transactions(owner_id, &connection) {
        Ok(transactions) => ok_response(transactions),
        Err(error) => error.into_response(),
    }
}

/// List all of the owner's transactions, most recent date first.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_owner_transactions(
    owner_id: OwnerId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, account_id, owner_id, amount, date, kind, category, description
             FROM \"transaction\"
             WHERE owner_id = :owner_id
             ORDER BY date DESC, id DESC",
        )?
        .query_map(&[(":owner_id", &owner_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}
