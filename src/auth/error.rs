use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Terminal request errors for the auth surface. Each maps to exactly one
/// status code; there is no retry or partial success.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Bad credentials, inactive account, or an invalid/expired/reused
    /// refresh token. The message never distinguishes an unknown email
    /// from a wrong password.
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// Authenticated, but the role does not allow the operation.
    #[error("{0}")]
    Forbidden(&'static str),

    /// Malformed request field, rejected before any business logic runs.
    #[error("{0}")]
    InvalidInput(&'static str),

    /// Store or signing failure. Details stay server-side.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AuthError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::Internal(err) => {
                error!(error = %err, "internal error in auth operation");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
