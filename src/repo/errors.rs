//! repo::errors
//!
//! Repository facade error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::ErrorKind;
use crate::git::GitError;
use crate::sync::SyncError;

/// Errors from repository facade operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Empty or malformed argument.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A named branch, source or repository is missing.
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Filesystem failure outside the Git engine.
    #[error("cannot remove {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepoError::InvalidInput(_) => ErrorKind::InputValidation,
            RepoError::NotFound(_) => ErrorKind::NotFound,
            RepoError::Git(e) => e.kind(),
            RepoError::Sync(e) => e.kind(),
            RepoError::Io { .. } => ErrorKind::InternalConsistency,
        }
    }

    /// Route a network failure through the sync error split so credential
    /// and rejection failures keep their type.
    pub(crate) fn network(err: GitError) -> Self {
        RepoError::Sync(SyncError::from(err))
    }
}
