//! Failure interception — turns a failed request into a [`NormalizedError`].
//!
//! Pure classification with logging only; the session side effect is left to
//! the client (see [`crate::http::session`]). Successful responses never get
//! here.

use serde_json::Value;

use crate::error::{codes, FailureKind, NormalizedError};

/// Message used when a network failure carries none of its own.
pub const DEFAULT_NETWORK_MESSAGE: &str = "Network error: unable to reach the server";

/// Body text that, together with a `401`, marks the session as invalidated.
pub const UNAUTHORIZED_BODY: &str = "Unauthorized";

/// A failed request as reported by the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// No response was received (connection refused, DNS, CORS, malformed
    /// URL, timeout).
    NoResponse {
        message: Option<String>,
        url: Option<String>,
    },
    /// A non-success response was received.
    Response(FailedResponse),
}

/// A non-success HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedResponse {
    pub status: u16,
    /// JSON body, or a JSON string holding the raw text when it isn't JSON.
    pub data: Value,
    pub url: Option<String>,
}

impl FailedResponse {
    pub fn new(status: u16, data: Value) -> Self {
        Self {
            status,
            data,
            url: None,
        }
    }

    pub fn from_text(status: u16, text: &str, url: Option<String>) -> Self {
        let data = serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()));
        Self { status, data, url }
    }

    /// `401` whose body is exactly `"Unauthorized"`.
    pub fn is_session_invalidation(&self) -> bool {
        self.status == 401 && self.data.as_str() == Some(UNAUTHORIZED_BODY)
    }
}

/// Normalize a failure. Called once per failed request.
pub fn normalize(failure: Failure) -> NormalizedError {
    match failure {
        Failure::NoResponse { message, url } => {
            let message = message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_NETWORK_MESSAGE.to_string());
            tracing::error!(url = url.as_deref().unwrap_or(""), "Network error: {}", message);

            NormalizedError {
                url,
                ..NormalizedError::network(message)
            }
        }
        Failure::Response(response) => {
            let kind = if response.is_session_invalidation() {
                tracing::warn!(
                    url = response.url.as_deref().unwrap_or(""),
                    "Session invalidated, redirecting to root"
                );
                FailureKind::SessionInvalidated
            } else {
                tracing::debug!(
                    status = response.status,
                    url = response.url.as_deref().unwrap_or(""),
                    "Request failed"
                );
                FailureKind::Response
            };

            NormalizedError {
                error_code: error_code_of(&response.data),
                message: Some(message_of(&response)),
                kind,
                status: Some(response.status),
                data: Some(response.data),
                url: response.url,
            }
        }
    }
}

/// The body's `errorCode` when present and non-empty, else `UNKNOWN_ERROR`.
fn error_code_of(data: &Value) -> String {
    match data.get("errorCode") {
        Some(Value::String(code)) if !code.is_empty() => code.clone(),
        Some(Value::Number(code)) => code.to_string(),
        _ => codes::UNKNOWN_ERROR.to_string(),
    }
}

fn message_of(response: &FailedResponse) -> String {
    response
        .data
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status code {}", response.status))
}
