//! Error types for the session layer.
//!
//! The pure pipeline stages (extractor, estimator, policy) are total and
//! never fail; only the session store's storage boundary surfaces errors.

use thiserror::Error;

/// Errors surfaced by the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session exists for the given id. The caller is expected to
    /// re-create the session via `create_or_resume`.
    #[error("Session not found: {session_id}")]
    NotFound { session_id: String },

    /// The durable storage backend failed.
    #[error("Session storage error: {message}")]
    Storage { message: String },
}

impl SessionError {
    /// Build a `NotFound` error for the given session id.
    pub fn not_found(session_id: impl ToString) -> Self {
        Self::NotFound {
            session_id: session_id.to_string(),
        }
    }

    /// Build a `Storage` error from any displayable cause.
    pub fn storage(cause: impl std::fmt::Display) -> Self {
        Self::Storage {
            message: cause.to_string(),
        }
    }
}
