//! Mapping store failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tictactoe_session::SessionError;
use tracing::warn;

/// Handler error: a [`SessionError`] rendered as a plain-text response.
///
/// Content problems (bad dimension, undecodable body) map to
/// `422 Unprocessable Entity`; everything else is a `500`.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub struct ApiError(SessionError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_invalid_input() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        warn!(%status, error = %self.0, "Request failed");
        (status, self.0.kind.to_string()).into_response()
    }
}
