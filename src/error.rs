//! Error types for rolescope

use thiserror::Error;

/// The main error type for rolescope operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Role (or base role of a clone) does not exist
    #[error("role not found: {0}")]
    NotFound(String),

    /// Target role name is already taken
    #[error("role already exists: {0}")]
    Conflict(String),

    /// System roles cannot be deleted, renamed or created by hand
    #[error("system role is protected: {0}")]
    Protected(String),

    /// A gate check failed. This is a normal negative result, not a fault.
    #[error("role '{role}' lacks permission '{key}'")]
    InsufficientPermission { role: String, key: String },

    /// Role or actor name rejected before touching storage
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    /// Persistence failed; the permission could not be determined
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Stable code surfaced to callers alongside a rejection
    pub fn reason_code(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "not_found",
            Error::Conflict(_) => "conflict",
            Error::Protected(_) => "protected",
            Error::InsufficientPermission { .. } => "insufficient_permission",
            Error::InvalidName(_) => "invalid_name",
            Error::Storage(_) => "storage_unavailable",
        }
    }

    /// True for failures of the persistence layer rather than of the caller
    pub fn is_systemic(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}

/// Result type alias for rolescope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Convert any backend error to a storage error
pub fn err<E: std::error::Error>(e: E) -> Error {
    Error::Storage(e.to_string())
}

/// Map a poisoned lock into a storage error
pub(crate) fn poisoned<T>(_: std::sync::PoisonError<T>) -> Error {
    Error::Storage("lock poisoned".into())
}
