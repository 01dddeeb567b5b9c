/*
[INPUT]:  Error sources (connectivity, backend responses, serialization, configuration)
[OUTPUT]: Tagged transport errors separating "unreachable" from "rejected"
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Main error type for the linkflow transport
#[derive(Error, Debug)]
pub enum TransportError {
    /// The backend could not be reached at all (refused, DNS, connect timeout)
    #[error("Backend unreachable: {message}")]
    Connectivity { message: String },

    /// The backend answered with a non-2xx status
    #[error("Backend rejected request (status {status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Application { status: u16, detail: Option<String> },

    /// A 2xx response whose body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TransportError {
    /// Check if the backend was never reached.
    ///
    /// This is the only condition under which callers may substitute a
    /// locally simulated outcome.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportError::Connectivity { .. })
    }

    /// Backend-provided detail, if the backend sent one
    pub fn reason(&self) -> Option<&str> {
        match self {
            TransportError::Application { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Create an application error from status code and detail
    pub fn application(status: StatusCode, detail: Option<String>) -> Self {
        TransportError::Application {
            status: status.as_u16(),
            detail,
        }
    }

    /// Build an application error from a raw error body.
    ///
    /// Accepts `{"detail": "..."}` and `{"message": "..."}`, preferring
    /// `detail` when both are present; a non-string `detail` (validation
    /// error lists) is kept as compact JSON.
    pub fn from_error_body(status: StatusCode, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| {
                parsed
                    .detail
                    .and_then(detail_text)
                    .or_else(|| parsed.message.and_then(detail_text))
            });
        Self::application(status, detail)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            TransportError::Connectivity {
                message: err.to_string(),
            }
        } else if err.is_builder() {
            TransportError::Config(err.to_string())
        } else {
            TransportError::InvalidResponse(err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

fn detail_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) if text.trim().is_empty() => None,
        serde_json::Value::String(text) => Some(text),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Result type alias for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;
