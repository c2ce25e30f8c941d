//! Defines the endpoint for creating a new account.
//!
//! Account creation is where the single default account rule is enforced: the
//! owner's first account always becomes the default, and marking a later
//! account as default clears the flag on every other account. The clear and
//! the insert run inside one database transaction so a failure part way
//! through never leaves the owner with zero or two defaults.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior, params};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    account::core::{Account, AccountKind},
    owner::{OwnerId, get_owner},
    response::with_status,
};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct NewAccountData {
    /// The account name.
    pub name: String,
    /// The kind of account.
    pub kind: AccountKind,
    /// The opening balance in dollars, sent by clients as a string.
    pub balance: String,
    /// Whether the owner wants this account to be their default.
    ///
    /// Ignored for the owner's first account, which is always made default.
    #[serde(default)]
    pub is_default: Option<bool>,
}

/// A route handler for creating a new account.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Extension(owner_id): Extension<OwnerId>,
    Json(data): Json<NewAccountData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_account(owner_id, data, &connection) {
        Ok(account) => with_status(StatusCode::CREATED, account),
        Err(error) => error.into_response(),
    }
}

/// Create an account for `owner_id` while keeping the single default account
/// rule intact.
///
/// The first account for an owner is always made the default, overriding the
/// caller's `is_default` preference. For later accounts the preference is
/// honoured, and when it is true the previous default loses its flag. The
/// clear and insert steps run inside one `IMMEDIATE` transaction, which also
/// serializes them against concurrent default flag changes for the same
/// owner.
///
/// # Errors
/// Returns [Error::InvalidBalance] if the balance does not parse to a finite
/// number, [Error::NotFound] if `owner_id` does not exist, and
/// [Error::DuplicateAccountName] if the owner already has an account with the
/// same name.
pub fn create_account(
    owner_id: OwnerId,
    data: NewAccountData,
    connection: &Connection,
) -> Result<Account, Error> {
    let balance = parse_balance(&data.balance)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    get_owner(owner_id, &transaction)?;

    let account_count: i64 = transaction.query_row(
        "SELECT COUNT(id) FROM account WHERE owner_id = ?1",
        params![owner_id.as_i64()],
        |row| row.get(0),
    )?;

    let should_be_default = account_count == 0 || data.is_default.unwrap_or(false);

    if should_be_default {
        // Clear before inserting so the table never holds two defaults.
        transaction.execute(
            "UPDATE account SET is_default = 0 WHERE owner_id = ?1 AND is_default = 1",
            params![owner_id.as_i64()],
        )?;
    }

    let created_at = OffsetDateTime::now_utc();

    transaction
        .execute(
            "INSERT INTO account (owner_id, name, kind, balance, is_default, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                owner_id.as_i64(),
                data.name,
                data.kind,
                balance,
                should_be_default,
                created_at
            ],
        )
        .map_err(|error| match error {
            // Handle the unique account name constraint violation.
            rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 2067 => {
                Error::DuplicateAccountName(data.name.clone())
            }
            error => error.into(),
        })?;

    let id = transaction.last_insert_rowid();

    transaction.commit()?;

    Ok(Account {
        id,
        owner_id,
        name: data.name,
        kind: data.kind,
        balance,
        is_default: should_be_default,
        created_at,
    })
}

fn parse_balance(raw: &str) -> Result<f64, Error> {
    match raw.trim().parse::<f64>() {
        Ok(balance) if balance.is_finite() => Ok(balance),
        _ => Err(Error::InvalidBalance(raw.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Json, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        Error,
        account::{core::count_default_accounts, get_account},
        db::initialize,
        owner::{OwnerId, create_owner},
    };

    use super::{
        AccountKind, CreateAccountState, NewAccountData, create_account, create_account_endpoint,
    };

    fn get_test_connection() -> (Connection, OwnerId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let owner = create_owner("test-key", &conn).unwrap();

        (conn, owner.id)
    }

    fn new_account_data(name: &str, balance: &str, is_default: Option<bool>) -> NewAccountData {
        NewAccountData {
            name: name.to_owned(),
            kind: AccountKind::Checking,
            balance: balance.to_owned(),
            is_default,
        }
    }

    #[test]
    fn first_account_is_always_default() {
        let (conn, owner_id) = get_test_connection();

        let account = create_account(
            owner_id,
            new_account_data("Checking", "100.50", Some(false)),
            &conn,
        )
        .unwrap();

        assert!(account.is_default);
        assert_eq!(account.balance, 100.5);
        assert_eq!(account.name, "Checking");
        assert_eq!(count_default_accounts(owner_id, &conn), 1);
    }

    #[test]
    fn later_account_defaults_to_non_default() {
        let (conn, owner_id) = get_test_connection();
        create_account(owner_id, new_account_data("Checking", "100", None), &conn).unwrap();

        let account =
            create_account(owner_id, new_account_data("Savings", "50", None), &conn).unwrap();

        assert!(!account.is_default);
        assert_eq!(count_default_accounts(owner_id, &conn), 1);
    }

    #[test]
    fn non_default_account_leaves_existing_default_untouched() {
        let (conn, owner_id) = get_test_connection();
        let first = create_account(owner_id, new_account_data("Checking", "100", None), &conn)
            .unwrap();

        create_account(
            owner_id,
            new_account_data("Savings", "50", Some(false)),
            &conn,
        )
        .unwrap();

        let first = get_account(first.id, owner_id, &conn).unwrap();
        assert!(first.is_default);
        assert_eq!(count_default_accounts(owner_id, &conn), 1);
    }

    #[test]
    fn new_default_account_clears_previous_default() {
        let (conn, owner_id) = get_test_connection();
        let first = create_account(
            owner_id,
            new_account_data("Checking", "100.50", Some(false)),
            &conn,
        )
        .unwrap();

        let second = create_account(
            owner_id,
            new_account_data("Savings", "50", Some(true)),
            &conn,
        )
        .unwrap();

        assert!(second.is_default);
        let first = get_account(first.id, owner_id, &conn).unwrap();
        assert!(!first.is_default);
        assert_eq!(count_default_accounts(owner_id, &conn), 1);
    }

    #[test]
    fn every_create_sequence_keeps_exactly_one_default() {
        let (conn, owner_id) = get_test_connection();
        let requests = [None, Some(true), Some(false), Some(true), None];

        for (i, is_default) in requests.into_iter().enumerate() {
            create_account(
                owner_id,
                new_account_data(&format!("Account {i}"), "10", is_default),
                &conn,
            )
            .unwrap();

            assert_eq!(count_default_accounts(owner_id, &conn), 1);
        }
    }

    #[test]
    fn defaults_are_tracked_per_owner() {
        let (conn, owner_id) = get_test_connection();
        let other_owner = create_owner("other-key", &conn).unwrap();
        create_account(owner_id, new_account_data("Checking", "100", None), &conn).unwrap();

        create_account(
            other_owner.id,
            new_account_data("Checking", "25", Some(true)),
            &conn,
        )
        .unwrap();

        assert_eq!(count_default_accounts(owner_id, &conn), 1);
        assert_eq!(count_default_accounts(other_owner.id, &conn), 1);
    }

    #[test]
    fn rejects_unparseable_balance() {
        let (conn, owner_id) = get_test_connection();

        let got = create_account(
            owner_id,
            new_account_data("Checking", "lots of money", None),
            &conn,
        );

        assert_eq!(got, Err(Error::InvalidBalance("lots of money".to_owned())));
    }

    #[test]
    fn rejects_non_finite_balance() {
        let (conn, owner_id) = get_test_connection();

        let got = create_account(owner_id, new_account_data("Checking", "inf", None), &conn);

        assert_eq!(got, Err(Error::InvalidBalance("inf".to_owned())));
    }

    #[test]
    fn fails_for_missing_owner() {
        let (conn, _) = get_test_connection();

        let got = create_account(
            OwnerId::new(1337),
            new_account_data("Checking", "100", None),
            &conn,
        );

        assert_eq!(got, Err(Error::NotFound));
    }

    #[test]
    fn failed_insert_rolls_back_default_clearing() {
        let (conn, owner_id) = get_test_connection();
        let first = create_account(owner_id, new_account_data("Checking", "100", None), &conn)
            .unwrap();
        assert!(first.is_default);

        // The duplicate name makes the insert fail after the clear step ran.
        let got = create_account(
            owner_id,
            new_account_data("Checking", "50", Some(true)),
            &conn,
        );

        assert_eq!(
            got,
            Err(Error::DuplicateAccountName("Checking".to_owned()))
        );
        let first = get_account(first.id, owner_id, &conn).unwrap();
        assert!(
            first.is_default,
            "the previous default must keep its flag after the rollback"
        );
        assert_eq!(count_default_accounts(owner_id, &conn), 1);
    }

    #[tokio::test]
    async fn endpoint_returns_created_account_in_envelope() {
        let (conn, owner_id) = get_test_connection();
        let state = CreateAccountState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = create_account_endpoint(
            State(state.clone()),
            Extension(owner_id),
            Json(new_account_data("Checking", "100.50", Some(false))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], serde_json::json!(true));
        assert_eq!(json["data"]["name"], serde_json::json!("Checking"));
        assert_eq!(json["data"]["balance"], serde_json::json!(100.5));
        assert_eq!(json["data"]["is_default"], serde_json::json!(true));
    }

    #[tokio::test]
    async fn endpoint_reports_invalid_balance() {
        let (conn, owner_id) = get_test_connection();
        let state = CreateAccountState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = create_account_endpoint(
            State(state),
            Extension(owner_id),
            Json(new_account_data("Checking", "NaN", None)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
