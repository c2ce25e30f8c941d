//! Defines the endpoint for marking an account as the owner's default.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior, params};

use crate::{
    AppState, Error,
    account::core::{Account, get_account},
    database_id::AccountId,
    owner::OwnerId,
    response::ok_response,
};

/// The state needed to change the default account.
#[derive(Debug, Clone)]
pub struct SetDefaultAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SetDefaultAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for marking an account as the owner's default.
pub async fn set_default_account_endpoint(
    State(state): State<SetDefaultAccountState>,
    Extension(owner_id): Extension<OwnerId>,
    Path(account_id): Path<AccountId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match set_default_account(owner_id, account_id, &connection) {
        Ok(account) => ok_response(account),
        Err(error) => error.into_response(),
    }
}

/// Mark `account_id` as the owner's default account.
///
/// Uses the same clear-then-set sequence as account creation, inside one
/// `IMMEDIATE` transaction, so the owner ends up with exactly one default
/// account no matter where the operation fails.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist or belongs to a
/// different owner.
pub fn set_default_account(
    owner_id: OwnerId,
    account_id: AccountId,
    connection: &Connection,
) -> Result<Account, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let account = get_account(account_id, owner_id, &transaction)?;

    transaction.execute(
        "UPDATE account SET is_default = 0 WHERE owner_id = ?1 AND is_default = 1",
        params![owner_id.as_i64()],
    )?;
    transaction.execute(
        "UPDATE account SET is_default = 1 WHERE id = ?1",
        params![account_id],
    )?;

    transaction.commit()?;

    Ok(Account {
        is_default: true,
        ..account
    })
}
