//! Error types for the credential and record-store core.
//!
//! The core never produces user-facing text; each failure is a classified
//! outcome and the boundary decides how to render it.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the credential lifecycle or the record store.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Entity not found")]
    NotFound,

    #[error("Entity already exists")]
    AlreadyExists,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Missing or malformed credential header")]
    MissingCredential,

    #[error("Malformed token")]
    Malformed,

    #[error("Token signature mismatch")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Body is {length} characters, limit is {max}")]
    BodyTooLong { length: usize, max: usize },

    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::StorageUnavailable(err.to_string())
    }
}

impl Error {
    /// Check if this error means the caller failed to prove who they are.
    #[inline]
    #[must_use]
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            Error::Unauthorized
                | Error::MissingCredential
                | Error::Malformed
                | Error::BadSignature
                | Error::Expired
        )
    }

    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }

    /// Check if this error is infrastructural rather than caused by the request.
    #[inline]
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::HashingFailure(_) | Error::StorageUnavailable(_) | Error::Config(_)
        )
    }
}
