//! Error types for casegate

use thiserror::Error;

/// The main error type for casegate operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown module: {0}")]
    UnknownModule(String),

    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// Name does not have the `module.resource.action` shape
    #[error("malformed permission name: {0}")]
    MalformedName(String),

    #[error("resource {resource} does not belong to module {module}")]
    ResourceNotInModule { module: String, resource: String },

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("session expired")]
    SessionExpired,

    /// Auth API answered with a non-success status
    #[error("auth api returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for casegate operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "client")]
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}
