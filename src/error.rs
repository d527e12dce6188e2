//! Error types for codepractice operations.
//!
//! Defines the error types for the subsystems that can fail:
//! - Backend API interactions (transport, HTTP status, missing analysis)
//! - Workspace actions (auth, session and problem preconditions)
//!
//! Both enums are `Clone` so a failure can be stored as per-action state and
//! rendered later without consuming it.

use thiserror::Error;

/// Errors that can occur while talking to the practice backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, TLS, reset).
    #[error("Network request failed: {0}")]
    NetworkFailure(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// `GET /sessions/:id/analysis` found no saved analysis for the session.
    #[error("Analysis not generated: {0}")]
    AnalysisNotGenerated(String),

    /// The response body did not match the expected shape.
    #[error("Failed to decode API response: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors that can occur while handling a workspace action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("You need to sign in before {action}.")]
    AuthRequired { action: &'static str },

    #[error("Submit at least once to create a session before analyzing.")]
    MissingSession,

    #[error("Missing problem slug.")]
    MissingSlug,

    #[error("No supported language available.")]
    NoLanguageAvailable,

    #[error("Attempt {0} is not part of the current session")]
    UnknownAttempt(i64),
}
