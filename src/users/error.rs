//! Error taxonomy for the user proxy.
//!
//! Two layers:
//! - [`TransportError`]: what the downstream client observed, uninterpreted.
//! - [`ProxyError`]: the classified error handed to callers, with a closed
//!   [`ErrorCode`] and the HTTP status the gateway answers with.
//!
//! Classification is a pure function of the transport status; see
//! [`classify_validate_error`] and [`classify_register_error`].

use std::fmt;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Raw failure reported by the downstream client.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The user service answered with a non-success status.
    #[error("{status} {message}")]
    Status { status: u16, message: String },

    /// No response: connection refused, DNS failure, reset.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The call did not complete within the configured deadline.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// A success response whose body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// The HTTP status the user service responded with, if it responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for downstream client calls.
pub type TransportResult<T> = Result<T, TransportError>;

/// Closed set of machine-readable error codes exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UserNotFound,
    InvalidRequest,
    Unauthorized,
    UnknownError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// HTTP status the gateway answers with for this code.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::UserNotFound => 404,
            ErrorCode::InvalidRequest => 400,
            ErrorCode::Unauthorized => 401,
            ErrorCode::UnknownError => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure returned by [`UserProxyService`](crate::users::UserProxyService).
///
/// The message is diagnostic text only; callers branch on `code` or
/// `http_status`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ProxyError {
    pub code: ErrorCode,
    pub message: String,
    pub http_status: u16,
}

impl ProxyError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            http_status: code.http_status(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnknownError, message)
    }
}

/// Result type for proxy service operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Wire shape of a [`ProxyError`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody<'a> {
    pub error_code: ErrorCode,
    pub message: &'a str,
    pub status: u16,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error_code: self.code,
            message: &self.message,
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

/// Map a failed validate call onto the gateway taxonomy.
///
/// | downstream | code            | status |
/// |------------|-----------------|--------|
/// | 404        | USER_NOT_FOUND  | 404    |
/// | 400        | INVALID_REQUEST | 400    |
/// | 401        | UNAUTHORIZED    | 401    |
/// | other/none | UNKNOWN_ERROR   | 500    |
pub fn classify_validate_error(user_id: &str, error: &TransportError) -> ProxyError {
    match error.status() {
        Some(404) => ProxyError::new(ErrorCode::UserNotFound, format!("User Not Found: {user_id}")),
        Some(400) => ProxyError::invalid_request(format!("Invalid Request: {user_id}")),
        Some(401) => ProxyError::new(ErrorCode::Unauthorized, "Unauthorized access"),
        _ => ProxyError::unknown(format!("Unexpected error: {error}")),
    }
}

/// Map a failed register call onto the gateway taxonomy.
///
/// The registration endpoint only distinguishes malformed input (400) from
/// everything else.
pub fn classify_register_error(email: &str, error: &TransportError) -> ProxyError {
    match error.status() {
        Some(400) => ProxyError::invalid_request(format!("Invalid Request: {email}")),
        _ => ProxyError::unknown(format!("Unexpected error: {error}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> TransportError {
        TransportError::Status {
            status: code,
            message: "downstream said no".to_string(),
        }
    }

    #[test]
    fn test_validate_classification_table() {
        let cases = [
            (status(404), ErrorCode::UserNotFound, 404),
            (status(400), ErrorCode::InvalidRequest, 400),
            (status(401), ErrorCode::Unauthorized, 401),
            (status(403), ErrorCode::UnknownError, 500),
            (status(500), ErrorCode::UnknownError, 500),
            (status(503), ErrorCode::UnknownError, 500),
            (TransportError::Connect("refused".into()), ErrorCode::UnknownError, 500),
            (TransportError::Timeout(Duration::from_millis(5)), ErrorCode::UnknownError, 500),
        ];

        for (error, code, http_status) in cases {
            let mapped = classify_validate_error("u1", &error);
            assert_eq!(mapped.code, code, "for {error:?}");
            assert_eq!(mapped.http_status, http_status, "for {error:?}");
        }
    }

    #[test]
    fn test_register_classification_is_narrower() {
        assert_eq!(
            classify_register_error("a@b.c", &status(400)).code,
            ErrorCode::InvalidRequest
        );
        // 404 and 401 carry no special meaning for registration
        assert_eq!(
            classify_register_error("a@b.c", &status(404)).code,
            ErrorCode::UnknownError
        );
        assert_eq!(
            classify_register_error("a@b.c", &status(401)).code,
            ErrorCode::UnknownError
        );
        assert_eq!(
            classify_register_error("a@b.c", &TransportError::Decode("eof".into())).http_status,
            500
        );
    }

    #[test]
    fn test_messages_carry_diagnostics() {
        assert!(classify_validate_error("u1", &status(404)).message.contains("u1"));
        assert!(classify_validate_error("u9", &status(400)).message.contains("u9"));
        assert!(classify_register_error("ada@example.com", &status(400))
            .message
            .contains("ada@example.com"));

        let unknown = classify_validate_error("u1", &TransportError::Connect("refused".into()));
        assert!(unknown.message.contains("refused"));
    }

    #[test]
    fn test_error_code_serializes_as_wire_name() {
        for code in [
            ErrorCode::UserNotFound,
            ErrorCode::InvalidRequest,
            ErrorCode::Unauthorized,
            ErrorCode::UnknownError,
        ] {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, serde_json::Value::String(code.to_string()));
        }
    }

    #[test]
    fn test_error_display() {
        let err = TransportError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "request timed out after 250ms");
        assert_eq!(err.status(), None);

        let err = ProxyError::new(ErrorCode::Unauthorized, "Unauthorized access");
        assert_eq!(err.to_string(), "UNAUTHORIZED: Unauthorized access");
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = ProxyError::new(ErrorCode::UserNotFound, "User Not Found: u1").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "errorCode": "USER_NOT_FOUND",
                "message": "User Not Found: u1",
                "status": 404,
            })
        );
    }
}
