//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Response,
    routing::{get, put},
};

use crate::{
    AppState,
    account::{create_account_endpoint, list_accounts_endpoint, set_default_account_endpoint},
    auth_middleware::auth_guard,
    endpoints,
    response::ok_response,
    transaction::{
        create_transaction_endpoint, get_transaction_endpoint, list_transactions_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every route except the health check requires a resolvable API key.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            endpoints::ACCOUNTS,
            get(list_accounts_endpoint).post(create_account_endpoint),
        )
        .route(endpoints::ACCOUNT_DEFAULT, put(set_default_account_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint).put(update_transaction_endpoint),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .merge(protected_routes)
        .with_state(state)
}

/// A route handler reporting that the server is running.
async fn get_health() -> Response {
    ok_response("ok")
}
