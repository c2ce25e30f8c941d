//! Middleware that resolves the API key on each request to an owner ID.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, owner::resolve_owner};

/// The state needed to resolve owners.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The database connection for looking up API keys.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Middleware function that checks for a valid `Authorization: Bearer` header.
///
/// The owner ID is placed into the request and then the request executed
/// normally if the API key maps to a known owner, otherwise a
/// `401 Unauthorized` response is returned before any handler runs.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(owner_id): Extension<OwnerId>` to receive the owner ID.
pub async fn auth_guard(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    let api_key = match extract_api_key(&request) {
        Some(api_key) => api_key,
        None => return Error::Unauthenticated.into_response(),
    };

    let owner_id = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("Could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match resolve_owner(&api_key, &connection) {
            Ok(owner_id) => owner_id,
            Err(error) => return error.into_response(),
        }
    };

    let (mut parts, body) = request.into_parts();
    parts.extensions.insert(owner_id);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

fn extract_api_key(request: &Request) -> Option<String> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;

    header
        .strip_prefix("Bearer ")
        .map(|api_key| api_key.to_owned())
}
