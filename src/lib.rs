//! Pocketbook is a web service for managing your personal finances.
//!
//! Owners hold financial accounts and record income and expenses against
//! them. This library provides a JSON REST API plus the underlying account
//! and transaction logic, most notably the rule that each owner has exactly
//! one default account once they have any account at all.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod account;
mod app_state;
mod auth_middleware;
mod database_id;
mod db;
mod endpoints;
mod error;
mod owner;
mod response;
mod routing;
mod transaction;

pub use account::{
    Account, AccountKind, AccountSummary, NewAccountData, create_account, list_accounts,
    set_default_account,
};
pub use app_state::AppState;
pub use database_id::{AccountId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use owner::{Owner, OwnerId, create_owner, get_owner, resolve_owner};
pub use response::ApiEnvelope;
pub use routing::build_router;
pub use transaction::{
    NewTransactionData, Transaction, TransactionKind, UpdateTransactionData, create_transaction,
    get_owner_transactions, get_transaction, update_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
