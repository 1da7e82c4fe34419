//! Error types for the Photon API server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use photon_search::SearchError;
use serde::{Deserialize, Serialize};

/// Top-level error type for startup and configuration.
#[derive(Debug, thiserror::Error)]
pub enum PhotonError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Search backend error.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, PhotonError>;

/// JSON error body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The error details.
    pub error: ErrorBody,
}

/// Error details within an [`ErrorResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub message: String,
    /// Error type (`invalid_request_error`, `upstream_error`, ...).
    #[serde(rename = "type")]
    pub error_type: String,
}

/// A request failure, rendered as an HTTP status plus [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError(pub SearchError);

impl ApiError {
    /// HTTP status for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match self.0 {
            SearchError::Validation(_) => StatusCode::BAD_REQUEST,
            SearchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            SearchError::Http(_) | SearchError::Parse(_) => StatusCode::BAD_GATEWAY,
            SearchError::DataShape(_) | SearchError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_type(&self) -> &'static str {
        match self.0 {
            SearchError::Validation(_) => "invalid_request_error",
            SearchError::Timeout(_) => "upstream_timeout",
            SearchError::Http(_) | SearchError::Parse(_) => "upstream_error",
            SearchError::DataShape(_) | SearchError::Config(_) => "server_error",
        }
    }

    fn message(&self) -> String {
        match &self.0 {
            SearchError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.0, "request rejected");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                message: self.message(),
                error_type: self.error_type().to_owned(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_bad_request() {
        let err = ApiError(SearchError::Validation("missing search term 'q'".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "missing search term 'q'");
    }

    #[test]
    fn engine_failures_are_gateway_errors() {
        assert_eq!(
            ApiError(SearchError::Timeout("10s".into())).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError(SearchError::Http("refused".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError(SearchError::Parse("not json".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn malformed_hits_are_internal_errors() {
        let err = ApiError(SearchError::DataShape("coordinate".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_type(), "server_error");
    }

    #[test]
    fn display_config() {
        let err = PhotonError::Config("bad port".into());
        assert_eq!(err.to_string(), "config error: bad port");
    }

    #[test]
    fn search_error_is_transparent() {
        let err = PhotonError::from(SearchError::Config("timeout_seconds must be > 0".into()));
        assert_eq!(err.to_string(), "config error: timeout_seconds must be > 0");
    }

    #[test]
    fn error_response_uses_type_key() {
        let body = ErrorResponse {
            error: ErrorBody {
                message: "boom".into(),
                error_type: "server_error".into(),
            },
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["error"]["type"], "server_error");
        assert_eq!(json["error"]["message"], "boom");
    }
}
