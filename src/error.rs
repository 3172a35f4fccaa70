//! Error types for the storefront synchronization layer.

use crate::types::{EntityId, EntityKind, SurfaceId};
use thiserror::Error;

/// Errors raised by the synchronization layer.
///
/// Transport and server failures are handled by the coordinator that issued the
/// request and never travel further. `LocalInconsistency` is the exception: it
/// means the client view no longer mirrors the server and is always returned to
/// the caller.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Server returned {status}: {detail}")]
    Server { status: u16, detail: String },

    #[error("Malformed response body: {0}")]
    Decode(String),

    #[error("Local inconsistency: confirmed {kind} '{id}' is not present in its view")]
    LocalInconsistency { kind: EntityKind, id: EntityId },

    #[error("No view bound for {0}")]
    ViewNotBound(EntityKind),

    #[error("View for {0} is already bound")]
    ViewAlreadyBound(EntityKind),

    #[error("Search surface '{0}' is already bound")]
    SurfaceAlreadyBound(SurfaceId),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// True for errors that signal a client/server divergence.
    pub fn is_local_inconsistency(&self) -> bool {
        matches!(self, SyncError::LocalInconsistency { .. })
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::Transport(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            SyncError::Transport(format!("Connection error: {}", err))
        } else {
            SyncError::Transport(format!("HTTP error: {}", err))
        }
    }
}
