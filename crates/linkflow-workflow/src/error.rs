/*
[INPUT]:  Client-side validation failures, transport errors, storage errors
[OUTPUT]: AuthError / WorkflowError surfaced to callers and notifications
[POS]:    Error handling layer - taxonomy shared by auth and task workflow
[UPDATE]: When adding new failure modes or changing error codes
*/

use linkflow_adapter::TransportError;
use thiserror::Error;

use crate::session::StoreError;

/// Failures detected locally, before any request is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please enter a valid URL")]
    InvalidUrl,
}

impl ValidationError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "missing_fields",
            ValidationError::PasswordMismatch => "password_mismatch",
            ValidationError::InvalidUrl => "invalid_url",
        }
    }
}

/// Login / registration failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend answered and refused
    #[error("{reason}")]
    Rejected { status: u16, reason: String },

    /// The backend could not be reached and offline mode is off
    #[error("Unable to reach the server: {0}")]
    TransportUnavailable(String),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    #[error("Session storage failed: {0}")]
    Storage(#[from] StoreError),
}

impl AuthError {
    /// Map a transport failure, using `default_reason` when the backend sent no detail
    pub fn from_transport(err: TransportError, default_reason: &str) -> Self {
        match err {
            TransportError::Connectivity { message } => AuthError::TransportUnavailable(message),
            TransportError::Application { status, detail } => AuthError::Rejected {
                status,
                reason: detail.unwrap_or_else(|| default_reason.to_string()),
            },
            other => AuthError::InvalidResponse(other.to_string()),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AuthError::Validation(_))
    }
}

/// Reasons a submission did not start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No active session, please log in")]
    Unauthenticated,

    #[error("A task is already in progress")]
    Busy,
}
