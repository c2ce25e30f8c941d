//! Defines the endpoint for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    database_id::AccountId,
    owner::OwnerId,
    response::with_status,
    transaction::core::{Transaction, TransactionKind},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct NewTransactionData {
    /// The ID of the account to record the transaction against.
    pub account_id: AccountId,
    /// The amount of money spent or earned, in dollars.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// A label used to group transactions in reports.
    pub category: String,
    /// Free text describing the transaction.
    #[serde(default)]
    pub description: Option<String>,
}

/// A route handler for recording a new transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(owner_id): Extension<OwnerId>,
    Json(data): Json<NewTransactionData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_transaction(owner_id, data, &connection) {
        Ok(transaction) => with_status(StatusCode::CREATED, transaction),
        Err(error) => error.into_response(),
    }
}

/// Record a transaction against one of the owner's accounts.
///
/// # Errors
/// Returns [Error::InvalidAccount] if the referenced account does not exist
/// or belongs to a different owner. No row is written in that case.
pub fn create_transaction(
    owner_id: OwnerId,
    data: NewTransactionData,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let account_owner: Option<i64> = connection
        .prepare("SELECT owner_id FROM account WHERE id = :id")?
        .query_row(&[(":id", &data.account_id)], |row| row.get(0))
        .optional()?;

    match account_owner {
        Some(id) if id == owner_id.as_i64() => {}
        // Do not reveal whether the account exists under another owner.
        _ => return Err(Error::InvalidAccount),
    }

    // TODO: decide whether recording a transaction should also adjust the
    // account balance. Right now the balance only changes when the owner
    // edits the account itself.
    connection.execute(
        "INSERT INTO \"transaction\" (account_id, owner_id, amount, date, kind, category, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            data.account_id,
            owner_id.as_i64(),
            data.amount,
            data.date,
            data.kind,
            data.category,
            data.description
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Transaction {
        id,
        account_id: data.account_id,
        owner_id,
        amount: data.amount,
        date: data.date,
        kind: data.kind,
        category: data.category,
        description: data.description,
    })
}
