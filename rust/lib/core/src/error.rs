use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Clients match on these, never on the message text.

/// Stable error code constants.
///
/// Every error response has the shape `{"code": "NOT_FOUND", "message": "..."}`.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const READ_ONLY: &str = "READ_ONLY";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Error type shared by every module at the HTTP boundary.
///
/// Module-level errors (`AuthError`, `TravelError`, ...) convert into this
/// type; handlers return it directly so axum renders the JSON body.
///
/// Lookups that simply find nothing are not errors inside the services
/// (they return `Option`); `NotFound` only appears where an HTTP route must
/// answer 404.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Row already exists (unique constraint). HTTP 409.
    #[error("{0}")]
    Conflict(String),

    /// Rejected input, e.g. a malformed email or unknown MBTI code. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Missing, expired or revoked session. HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Write against seeded catalog data. HTTP 403.
    #[error("{0}")]
    ReadOnly(String),

    /// Persistence backend failure. HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Conflict(_) => error_code::ALREADY_EXISTS,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::Unauthorized(_) => error_code::UNAUTHENTICATED,
            ServiceError::ReadOnly(_) => error_code::READ_ONLY,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::ReadOnly(_) => StatusCode::FORBIDDEN,
            ServiceError::Storage(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "request failed: {}", self);
        }
        let body = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_code_mapping() {
        let cases = [
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT, "ALREADY_EXISTS"),
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            (ServiceError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            (ServiceError::ReadOnly("x".into()), StatusCode::FORBIDDEN, "READ_ONLY"),
            (ServiceError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            (ServiceError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.error_code(), code);
        }
    }

    #[tokio::test]
    async fn renders_code_and_message() {
        let resp = ServiceError::Conflict("destination d1 already saved".into()).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "ALREADY_EXISTS");
        assert_eq!(json["message"], "destination d1 already saved");
    }

    #[test]
    fn display_is_just_message() {
        assert_eq!(ServiceError::NotFound("destination x".into()).to_string(), "destination x");
        assert_eq!(ServiceError::Unauthorized("no session".into()).to_string(), "no session");
    }
}
