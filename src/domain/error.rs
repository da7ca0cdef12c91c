//! Error types for the Galleria plugin.
//!
//! This module defines the centralized error type [`GalleryError`] and a type alias
//! [`Result`] used throughout the crate. Variants follow the error taxonomy of the
//! gallery backend contract: input rejected by the backend, bad credentials, an
//! expired session, transport failures, and responses that do not match the
//! expected schema.

use thiserror::Error;

/// The main error type for Galleria operations.
///
/// Form-level operations surface these inline, list fetches log them and degrade
/// to an empty list, and [`GalleryError::SessionExpired`] triggers the global
/// session reset.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Input was rejected, either by local form checks or by the backend.
    ///
    /// The string is the user-facing message, taken from the backend `error`
    /// field when one is present.
    #[error("{0}")]
    Validation(String),

    /// Login credentials were refused.
    #[error("{0}")]
    Authentication(String),

    /// An authorized call was refused because the bearer token is no longer valid.
    #[error("session expired, please sign in again")]
    SessionExpired,

    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("Backend error ({status}): {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or a generic description.
        message: String,
    },

    /// A success response did not match the expected schema.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Reading or writing persisted session data failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for Galleria operations.
pub type Result<T> = std::result::Result<T, GalleryError>;
