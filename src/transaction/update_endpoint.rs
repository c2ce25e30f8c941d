//! Defines the endpoint for updating an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior, params};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    owner::OwnerId,
    response::ok_response,
    transaction::core::{Transaction, TransactionKind, get_transaction},
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for updating a transaction.
///
/// Fields that are left out keep their current value. The transaction cannot
/// be moved to a different account.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionData {
    /// A new amount in dollars.
    #[serde(default)]
    pub amount: Option<f64>,
    /// A new transaction date.
    #[serde(default)]
    pub date: Option<Date>,
    /// A new transaction kind.
    #[serde(default)]
    pub kind: Option<TransactionKind>,
    /// A new category label.
    #[serde(default)]
    pub category: Option<String>,
    /// A new description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A route handler for updating one of the owner's transactions.
pub async fn update_transaction_endpoint(
    State(state): State<UpdateTransactionState>,
    Extension(owner_id): Extension<OwnerId>,
    Path(transaction_id): Path<TransactionId>,
    Json(data): Json<UpdateTransactionData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match update_transaction(owner_id, transaction_id, data, &connection) {
        Ok(transaction) => ok_response(transaction),
        Err(error) => error.into_response(),
    }
}

/// Apply a partial update to the transaction with the ID `id`.
///
/// The read and the write run inside one transaction so the update cannot
/// interleave with another write to the same row.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist or belongs to
/// a different owner.
pub fn update_transaction(
    owner_id: OwnerId,
    id: TransactionId,
    data: UpdateTransactionData,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let existing = get_transaction(id, owner_id, &sql_transaction)?;

    let updated = Transaction {
        id: existing.id,
        account_id: existing.account_id,
        owner_id: existing.owner_id,
        amount: data.amount.unwrap_or(existing.amount),
        date: data.date.unwrap_or(existing.date),
        kind: data.kind.unwrap_or(existing.kind),
        category: data.category.unwrap_or(existing.category),
        description: data.description.or(existing.description),
    };

    sql_transaction.execute(
        "UPDATE \"transaction\"
         SET amount = ?1, date = ?2, kind = ?3, category = ?4, description = ?5
         WHERE id = ?6",
        params![
            updated.amount,
            updated.date,
            updated.kind,
            updated.category,
            updated.description,
            updated.id
        ],
    )?;

    sql_transaction.commit()?;

    Ok(updated)
}
