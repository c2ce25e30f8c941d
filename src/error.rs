//! Defines the app level error type and its conversion to JSON API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::error_response;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry an API key that maps to a known owner.
    ///
    /// Identity is established outside this service, so there is nothing to
    /// retry here other than sending a valid `Authorization` header.
    #[error("the request could not be matched to a known owner")]
    Unauthenticated,

    /// The requested resource could not be found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The balance sent by the client could not be parsed as a finite number.
    #[error("\"{0}\" is not a valid balance amount")]
    InvalidBalance(String),

    /// A transaction referenced an account that does not exist or that
    /// belongs to another owner.
    ///
    /// The two cases are deliberately indistinguishable so the error does not
    /// leak whether someone else's account ID is in use.
    #[error("the account ID does not refer to one of your accounts")]
    InvalidAccount,

    /// The specified account name already exists for this owner.
    #[error("the account \"{0}\" already exists")]
    DuplicateAccountName(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {error}");
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Unauthenticated => {
                error_response(StatusCode::UNAUTHORIZED, &self.to_string())
            }
            Error::NotFound => error_response(StatusCode::NOT_FOUND, &self.to_string()),
            Error::InvalidBalance(_) | Error::InvalidAccount | Error::DuplicateAccountName(_) => {
                error_response(StatusCode::BAD_REQUEST, &self.to_string())
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details.",
                )
            }
        }
    }
}
