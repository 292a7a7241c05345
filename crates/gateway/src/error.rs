use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Proxy pipeline errors with their wire-format classification.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Credential acquisition failed at any stage.
    #[error("Failed to acquire token: {0}")]
    Token(String),

    /// The inbound body is not a valid chat-completion document.
    #[error("Failed to parse request body: {0}")]
    InvalidRequest(String),

    /// Local serialization or parse failure not otherwise classified.
    #[error("Internal error: {0}")]
    Internal(String),

    /// The backend could not be reached.
    #[error("Failed to forward request: {0}")]
    Downstream(String),

    /// Failure while relaying an active event stream.
    #[error("Failed to relay stream: {0}")]
    Stream(String),
}

impl ProxyError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Downstream(_) => StatusCode::BAD_GATEWAY,
            Self::Token(_) | Self::Internal(_) | Self::Stream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string for the response envelope.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Token(_) => "token_error",
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::Internal(_) => "internal_error",
            Self::Downstream(_) => "downstream_error",
            Self::Stream(_) => "stream_error",
        }
    }
}

/// Error response envelope returned to clients.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    message: String,
    r#type: &'static str,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("Request failed ({}): {self}", self.error_type());
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                message: self.to_string(),
                r#type: self.error_type(),
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            ProxyError::Token("no".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::InvalidRequest("no".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::Internal("no".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ProxyError::Downstream("no".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ProxyError::Stream("no".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_types() {
        assert_eq!(ProxyError::Token("no".into()).error_type(), "token_error");
        assert_eq!(ProxyError::InvalidRequest("no".into()).error_type(), "invalid_request_error");
        assert_eq!(ProxyError::Internal("no".into()).error_type(), "internal_error");
        assert_eq!(ProxyError::Downstream("no".into()).error_type(), "downstream_error");
        assert_eq!(ProxyError::Stream("no".into()).error_type(), "stream_error");
    }

    #[test]
    fn envelope_shape() {
        let body = ErrorResponse {
            error: ErrorDetails {
                message: "backend unreachable".to_string(),
                r#type: ProxyError::Downstream("backend unreachable".into()).error_type(),
            },
        };

        let json = serde_json::to_string(&body).unwrap();

        assert_eq!(
            json,
            r#"{"error":{"message":"backend unreachable","type":"downstream_error"}}"#
        );
    }
}
