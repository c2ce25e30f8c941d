//! Defines the endpoint for fetching a single transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    owner::OwnerId,
    response::ok_response,
    transaction::core::{Transaction, get_transaction},
};

/// The state needed to fetch a transaction.
#[derive(Debug, Clone)]
pub struct GetTransactionState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for fetching one of the owner's transactions.
///
/// A missing transaction is reported as a successful response with a null
/// result rather than an error, since reads have nothing to roll back and the
/// client treats "not there" as an empty state.
pub async fn get_transaction_endpoint(
    State(state): State<GetTransactionState>,
    Extension(owner_id): Extension<OwnerId>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_transaction(transaction_id, owner_id, &connection) {
        Ok(transaction) => ok_response(Some(transaction)),
        Err(Error::NotFound) => ok_response(None::<Transaction>),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        account::{AccountKind, NewAccountData, create_account},
        db::initialize,
        owner::{OwnerId, create_owner},
        transaction::{NewTransactionData, TransactionKind, create_transaction},
    };

    use super::{GetTransactionState, get_transaction_endpoint};

    fn get_test_state() -> (GetTransactionState, OwnerId, i64) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let owner = create_owner("test-key", &conn).unwrap();
        let account = create_account(
            owner.id,
            NewAccountData {
                name: "Checking".to_owned(),
                kind: AccountKind::Checking,
                balance: "100".to_owned(),
                is_default: None,
            },
            &conn,
        )
        .unwrap();
        let transaction = create_transaction(
            owner.id,
            NewTransactionData {
                account_id: account.id,
                amount: 9.99,
                date: date!(2025 - 06 - 01),
                kind: TransactionKind::Expense,
                category: "misc".to_owned(),
                description: None,
            },
            &conn,
        )
        .unwrap();

        let state = GetTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        (state, owner.id, transaction.id)
    }

    #[tokio::test]
    async fn returns_transaction_in_envelope() {
        let (state, owner_id, transaction_id) = get_test_state();

        let response =
            get_transaction_endpoint(State(state), Extension(owner_id), Path(transaction_id))
                .await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], serde_json::json!(true));
        assert_eq!(json["data"]["amount"], serde_json::json!(9.99));
    }

    #[tokio::test]
    async fn missing_transaction_degrades_to_null_result() {
        let (state, owner_id, _) = get_test_state();

        let response = get_transaction_endpoint(State(state), Extension(owner_id), Path(1337))
            .await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], serde_json::json!(true));
        assert_eq!(json["data"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn another_owners_transaction_is_not_visible() {
        let (state, _, transaction_id) = get_test_state();
        let other_owner = {
            let connection = state.db_connection.lock().unwrap();
            create_owner("other-key", &connection).unwrap()
        };

        let response =
            get_transaction_endpoint(State(state), Extension(other_owner.id), Path(transaction_id))
                .await;

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["data"], serde_json::Value::Null);
    }
}
