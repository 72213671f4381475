//! auth::errors
//!
//! Credential resolution error types.
//!
//! # Design
//!
//! Error messages carry the URL or key path so the caller can act, but
//! never a passphrase.
//!
//! # Example
//!
//! ```
//! use repokit::auth::AuthError;
//! use repokit::core::ErrorKind;
//!
//! let err = AuthError::InvalidUrl { url: "/invalid/url.value@".into() };
//! assert_eq!(err.kind(), ErrorKind::InputValidation);
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::core::ErrorKind;
use crate::secrets::SecretError;

/// Errors from credential resolution.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No hostname could be extracted from the remote URL.
    #[error("the given URL is invalid: {url}")]
    InvalidUrl { url: String },

    /// The selected private key does not exist.
    #[error("cannot find configured private key: {}", path.display())]
    KeyNotFound { path: PathBuf },

    /// The keystore had no passphrase to offer.
    #[error("failed to get password for ssh private key: {}", path.display())]
    SecretUnavailable { path: PathBuf },

    /// Every passphrase attempt failed to unlock the key.
    #[error(
        "failed to decrypt private key {} after {attempts} attempt(s), likely an invalid password: {reason}",
        path.display()
    )]
    Decryption {
        path: PathBuf,
        attempts: u32,
        /// Printable form of the last unlock failure
        reason: String,
    },

    /// The private key exists but could not be read.
    #[error("cannot read private key {}: {message}", path.display())]
    KeyRead { path: PathBuf, message: String },

    /// The SSH configuration exists but could not be read.
    #[error("cannot read ssh config {}: {message}", path.display())]
    ConfigRead { path: PathBuf, message: String },

    /// The keystore failed (not merely empty).
    #[error("keystore error: {0}")]
    Store(#[from] SecretError),
}

impl AuthError {
    /// Category of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidUrl { .. } => ErrorKind::InputValidation,
            AuthError::KeyNotFound { .. } => ErrorKind::NotFound,
            AuthError::SecretUnavailable { .. }
            | AuthError::Decryption { .. }
            | AuthError::KeyRead { .. }
            | AuthError::ConfigRead { .. }
            | AuthError::Store(_) => ErrorKind::Authentication,
        }
    }
}
