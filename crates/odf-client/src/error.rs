//! Typed API errors.
//!
//! Every failure is classified exactly once, where the HTTP response (or the
//! transport error) is observed, and logged there. Callers only ever inspect
//! the typed fields.

use odf_api_models::ServerErrorBody;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{error, warn};

/// Result alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a request against the documents API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server could not be reached.
    #[error("could not connect to the server: {message}")]
    Transport {
        /// Transport-level description.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request to {path} timed out")]
    Timeout {
        /// Request path.
        path: String,
    },
    /// The server answered with a non-success status.
    #[error("request failed with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// `message` field of the error body, if any.
        server_message: Option<String>,
        /// `error` field of the error body, if any.
        server_error: Option<String>,
        /// `code` field of the error body, if any.
        server_code: Option<String>,
    },
    /// The response body did not match the expected shape.
    #[error("failed to decode response from {path}: {message}")]
    Decode {
        /// Request path.
        path: String,
        /// Decoder message.
        message: String,
    },
    /// The request URL could not be built.
    #[error("invalid request URL: {message}")]
    InvalidUrl {
        /// Description of the problem.
        message: String,
    },
}

impl ApiError {
    /// Build a status error from a response body, decoding the server's error
    /// fields when the body is JSON.
    #[must_use]
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let server = serde_json::from_slice::<ServerErrorBody>(body).unwrap_or_default();
        Self::Status {
            status,
            server_message: server.message_text(),
            server_error: server.error_text(),
            server_code: server.code.filter(|code| !code.trim().is_empty()),
        }
    }

    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        let err = Self::from_status(status.as_u16(), &body);
        log_status(status, &body);
        err
    }

    pub(crate) fn from_transport(err: &reqwest::Error, path: &str) -> Self {
        if err.is_timeout() {
            warn!(path, "request timed out");
            Self::Timeout {
                path: path.to_string(),
            }
        } else if err.is_decode() {
            error!(path, error = %err, "response body could not be decoded");
            Self::Decode {
                path: path.to_string(),
                message: err.to_string(),
            }
        } else {
            warn!(path, error = %err, "could not connect to the server; check the connection");
            Self::Transport {
                message: err.to_string(),
            }
        }
    }

    /// HTTP status, for status errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode { .. } | Self::InvalidUrl { .. } => false,
        }
    }

    /// Best message to show a user: the server's `message`, then its `error`,
    /// then a generic description.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Status {
                server_message: Some(message),
                ..
            } => message.clone(),
            Self::Status {
                server_error: Some(label),
                ..
            } => label.clone(),
            other => other.to_string(),
        }
    }
}

fn log_status(status: StatusCode, body: &[u8]) {
    match status {
        StatusCode::UNAUTHORIZED => warn!(status = status.as_u16(), "unauthorized; check credentials"),
        StatusCode::FORBIDDEN => warn!(status = status.as_u16(), "access forbidden"),
        StatusCode::NOT_FOUND => warn!(status = status.as_u16(), "resource not found"),
        StatusCode::INTERNAL_SERVER_ERROR => {
            error!(status = status.as_u16(), "internal server error");
        }
        _ => warn!(
            status = status.as_u16(),
            body = %String::from_utf8_lossy(body),
            "request failed"
        ),
    }
}
