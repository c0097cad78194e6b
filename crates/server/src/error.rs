//! Maps chain errors to HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use starchain_chain::ChainError;
use thiserror::Error;

/// Error returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Status code and a stable machine-readable kind.
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            ApiError::Chain(err) => match err {
                ChainError::ChallengeExpired { .. } => {
                    (StatusCode::UNAUTHORIZED, "challenge_expired")
                }
                ChainError::InvalidProof => (StatusCode::FORBIDDEN, "invalid_proof"),
                ChainError::MalformedChallenge(_) => {
                    (StatusCode::BAD_REQUEST, "malformed_challenge")
                }
                ChainError::ChainCorruption(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "chain_corruption")
                }
                ChainError::Payload(_) => (StatusCode::INTERNAL_SERVER_ERROR, "payload"),
                ChainError::Verifier(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "verifier_unavailable")
                }
            },
        }
    }
}

/// Malformed or mistyped request bodies share the regular error envelope.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.classify();
        if status.is_server_error() {
            tracing::error!(kind, error = %self, "request failed");
        }
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "kind": kind,
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}
