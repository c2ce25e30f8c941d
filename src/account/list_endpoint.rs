//! Defines the endpoint for listing an owner's accounts.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    account::core::{Account, map_row_to_account},
    owner::OwnerId,
    response::ok_response,
};

/// The state needed to list accounts.
#[derive(Debug, Clone)]
pub struct ListAccountsState {
    /// The database connection for reading accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListAccountsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// An account annotated with how many transactions reference it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    /// The account.
    #[serde(flatten)]
    pub account: Account,
    /// The number of transactions recorded against the account.
    pub transaction_count: i64,
}

/// A route handler for listing the owner's accounts.
pub async fn list_accounts_endpoint(
    State(state): State<ListAccountsState>,
    Extension(owner_id): Extension<OwnerId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match list_accounts(owner_id, &connection) {
        Ok(accounts) => ok_response(accounts),
        Err(error) => error.into_response(),
    }
}

/// List the owner's accounts, newest first, with their transaction counts.
///
/// This is a pure read, no default flag logic runs here.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn list_accounts(
    owner_id: OwnerId,
    connection: &Connection,
) -> Result<Vec<AccountSummary>, Error> {
    connection
        .prepare(
            "SELECT a.id, a.owner_id, a.name, a.kind, a.balance, a.is_default, a.created_at,
                    COUNT(t.id)
             FROM account a
             LEFT JOIN \"transaction\" t ON t.account_id = a.id
             WHERE a.owner_id = :owner_id
             GROUP BY a.id
             ORDER BY a.created_at DESC, a.id DESC",
        )?
        .query_map(&[(":owner_id", &owner_id.as_i64())], |row| {
            Ok(AccountSummary {
                account: map_row_to_account(row)?,
                transaction_count: row.get(7)?,
            })
        })?
        .map(|maybe_summary| maybe_summary.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        account::{AccountKind, NewAccountData, create_account},
        db::initialize,
        owner::{OwnerId, create_owner},
        transaction::{NewTransactionData, TransactionKind, create_transaction},
    };

    use super::list_accounts;

    fn get_test_connection() -> (Connection, OwnerId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let owner = create_owner("test-key", &conn).unwrap();

        (conn, owner.id)
    }

    fn new_account_data(name: &str) -> NewAccountData {
        NewAccountData {
            name: name.to_owned(),
            kind: AccountKind::Savings,
            balance: "100".to_owned(),
            is_default: None,
        }
    }

    #[test]
    fn returns_empty_list_for_new_owner() {
        let (conn, owner_id) = get_test_connection();

        let accounts = list_accounts(owner_id, &conn).unwrap();

        assert_eq!(accounts, vec![]);
    }

    #[test]
    fn returns_accounts_newest_first() {
        let (conn, owner_id) = get_test_connection();
        create_account(owner_id, new_account_data("Oldest"), &conn).unwrap();
        create_account(owner_id, new_account_data("Middle"), &conn).unwrap();
        create_account(owner_id, new_account_data("Newest"), &conn).unwrap();

        let accounts = list_accounts(owner_id, &conn).unwrap();

        let names: Vec<&str> = accounts
            .iter()
            .map(|summary| summary.account.name.as_str())
            .collect();
        assert_eq!(names, vec!["Newest", "Middle", "Oldest"]);
    }

    #[test]
    fn annotates_accounts_with_transaction_counts() {
        let (conn, owner_id) = get_test_connection();
        let busy = create_account(owner_id, new_account_data("Busy"), &conn).unwrap();
        create_account(owner_id, new_account_data("Quiet"), &conn).unwrap();

        for amount in [12.50, 3.99] {
            create_transaction(
                owner_id,
                NewTransactionData {
                    account_id: busy.id,
                    amount,
                    date: date!(2025 - 06 - 01),
                    kind: TransactionKind::Expense,
                    category: "groceries".to_owned(),
                    description: None,
                },
                &conn,
            )
            .unwrap();
        }

        let accounts = list_accounts(owner_id, &conn).unwrap();

        let busy_summary = accounts
            .iter()
            .find(|summary| summary.account.id == busy.id)
            .unwrap();
        assert_eq!(busy_summary.transaction_count, 2);

        let quiet_summary = accounts
            .iter()
            .find(|summary| summary.account.id != busy.id)
            .unwrap();
        assert_eq!(quiet_summary.transaction_count, 0);
    }

    #[test]
    fn does_not_return_other_owners_accounts() {
        let (conn, owner_id) = get_test_connection();
        let other_owner = create_owner("other-key", &conn).unwrap();
        create_account(owner_id, new_account_data("Mine"), &conn).unwrap();
        create_account(other_owner.id, new_account_data("Theirs"), &conn).unwrap();

        let accounts = list_accounts(owner_id, &conn).unwrap();

        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account.name, "Mine");
    }
}
