//! Error types: the normalized request error and client construction errors.

use serde::Serialize;
use thiserror::Error;

use crate::network::SESSION_REDIRECT_PATH;

/// Error codes produced by the client itself. Service-supplied codes are
/// passed through verbatim.
pub mod codes {
    /// No response reached the caller: timeout, DNS, CORS, refused connection.
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    /// A response was received but carried no `errorCode`.
    pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";
    /// A success response whose body did not decode into the requested type.
    pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";
}

/// How a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No response was received.
    Network,
    /// A non-success response was received.
    Response,
    /// `401` with body `"Unauthorized"`: the application should navigate to
    /// the root path.
    SessionInvalidated,
    /// A success response could not be decoded.
    Decode,
}

/// The single error shape every request failure is converted to.
///
/// `error_code` is never empty.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{error_code}: {}", .message.as_deref().unwrap_or("request failed"))]
pub struct NormalizedError {
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub kind: FailureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NormalizedError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            error_code: codes::NETWORK_ERROR.to_string(),
            message: Some(message.into()),
            kind: FailureKind::Network,
            status: None,
            data: None,
            url: None,
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind == FailureKind::Network
    }

    pub fn is_session_invalidated(&self) -> bool {
        self.kind == FailureKind::SessionInvalidated
    }

    /// Where the application should navigate, if anywhere.
    pub fn redirect_to(&self) -> Option<&'static str> {
        self.is_session_invalidated().then_some(SESSION_REDIRECT_PATH)
    }
}

/// Errors raised while building an `ApiClient`.
#[derive(Error, Debug)]
pub enum BuildError {
    #[cfg(feature = "http")]
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_shape() {
        let err = NormalizedError::network("connection refused");
        assert_eq!(err.error_code, "NETWORK_ERROR");
        assert!(err.is_network());
        assert!(err.redirect_to().is_none());
        assert!(err.url.is_none());
        assert_eq!(err.to_string(), "NETWORK_ERROR: connection refused");
    }

    #[test]
    fn test_display_without_message() {
        let err = NormalizedError {
            message: None,
            ..NormalizedError::network("ignored")
        };
        assert_eq!(err.to_string(), "NETWORK_ERROR: request failed");
    }

    #[test]
    fn test_serializes_camel_case() {
        let err = NormalizedError {
            error_code: "VALIDATION_FAILED".to_string(),
            message: Some("bad email".to_string()),
            kind: FailureKind::Response,
            status: Some(422),
            data: Some(serde_json::json!({ "errorCode": "VALIDATION_FAILED" })),
            url: None,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["errorCode"], "VALIDATION_FAILED");
        assert_eq!(json["message"], "bad email");
        assert_eq!(json["kind"], "response");
        assert_eq!(json["status"], 422);
        assert!(json.get("url").is_none());
    }

    #[test]
    fn test_session_invalidated_redirects_to_root() {
        let err = NormalizedError {
            kind: FailureKind::SessionInvalidated,
            ..NormalizedError::network("x")
        };
        assert_eq!(err.redirect_to(), Some("/"));
    }
}
