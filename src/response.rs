//! The uniform JSON result envelope returned by every API endpoint.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The body shape shared by every API response.
///
/// Successful responses carry `data`, failed ones carry `error`. The unused
/// field is omitted from the serialized JSON.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T: Serialize> {
    /// Whether the operation completed.
    pub success: bool,
    /// The operation result, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// A description of the failure suitable for showing to the client,
    /// present on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Wrap `data` in a success envelope with the status code `200 OK`.
pub fn ok_response<T: Serialize>(data: T) -> Response {
    with_status(StatusCode::OK, data)
}

/// Wrap `data` in a success envelope with `status`.
pub fn with_status<T: Serialize>(status: StatusCode, data: T) -> Response {
    (
        status,
        Json(ApiEnvelope {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
        .into_response()
}

/// Create a failure envelope with `status` and a message for the client.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiEnvelope::<()> {
            success: false,
            data: None,
            error: Some(message.to_owned()),
        }),
    )
        .into_response()
}
