//! sync::engine
//!
//! The synchronization state machine.

use thiserror::Error;
use tracing::{debug, info};

use crate::auth::AuthError;
use crate::core::identity::Identity;
use crate::core::types::{Oid, RefName};
use crate::core::ErrorKind;
use crate::git::{Git, GitError, MergeAnalysis, TransportError, TransportHooks};

/// Message prefix of merge commits created by pull.
pub const MERGE_MESSAGE_PREFIX: &str = "Pull from remote of";

/// Errors from synchronization operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Git(GitError),

    /// Credential resolution failed during a network operation.
    #[error(transparent)]
    Auth(AuthError),

    /// The network operation itself failed.
    #[error(transparent)]
    Transport(TransportError),

    /// The remote refused to update a ref.
    #[error("failed to push {refname} to remote: {message}")]
    PushRejected { refname: String, message: String },

    /// The merge left unresolved conflicts in the index.
    #[error("merge of {target} into {branch} has conflicts; resolve them and commit")]
    Conflict { branch: String, target: String },

    /// HEAD has no commit yet.
    #[error("HEAD has no commits; cannot {operation}")]
    UnbornHead { operation: &'static str },

    /// Merging HEAD into itself.
    #[error("cannot merge HEAD ({oid}) into itself")]
    SelfMerge { oid: String },

    /// HEAD is not on a branch.
    #[error("HEAD is detached; cannot {operation}")]
    DetachedHead { operation: &'static str },

    /// Merge analysis reported nothing recognizable.
    #[error("merge analysis of {target} returned no recognized result")]
    UnknownAnalysis { target: String },

    /// Fetch did not produce the expected remote-tracking ref.
    #[error("remote-tracking ref not found: {refname}")]
    RemoteTrackingMissing { refname: String },
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::Git(e) => e.kind(),
            SyncError::Auth(e) => e.kind(),
            SyncError::Transport(e) => e.kind(),
            SyncError::PushRejected { .. } => ErrorKind::RemoteOperation,
            SyncError::Conflict { .. } => ErrorKind::MergeConflict,
            SyncError::UnbornHead { .. }
            | SyncError::SelfMerge { .. }
            | SyncError::DetachedHead { .. } => ErrorKind::Precondition,
            SyncError::UnknownAnalysis { .. } => ErrorKind::InternalConsistency,
            SyncError::RemoteTrackingMissing { .. } => ErrorKind::NotFound,
        }
    }
}

impl From<GitError> for SyncError {
    fn from(err: GitError) -> Self {
        match err {
            GitError::Transport(TransportError::Auth(e)) => SyncError::Auth(e),
            GitError::Transport(TransportError::PushRejected { refname, message }) => {
                SyncError::PushRejected { refname, message }
            }
            GitError::Transport(e) => SyncError::Transport(e),
            other => SyncError::Git(other),
        }
    }
}

/// Which path a pull took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// The branch already contained the remote target.
    UpToDate,
    /// The branch and HEAD moved to the remote target.
    FastForwarded { to: Oid },
    /// A clean three-way merge; `commit` is set when one was created.
    Merged { commit: Option<Oid> },
}

/// Runs fetch, pull, merge and push against one repository.
///
/// Every network call goes through `hooks`; each operation gets its own
/// callback set.
pub struct SyncEngine<'a> {
    git: &'a Git,
    hooks: &'a dyn TransportHooks,
}

impl<'a> SyncEngine<'a> {
    pub fn new(git: &'a Git, hooks: &'a dyn TransportHooks) -> Self {
        Self { git, hooks }
    }

    /// Fetch one remote, or every configured remote in order.
    ///
    /// Returns the names of the remotes fetched.
    pub fn fetch(&self, remote: Option<&str>) -> Result<Vec<String>, SyncError> {
        let remotes = match remote {
            Some(name) => vec![name.to_string()],
            None => self.git.remote_names()?,
        };

        for name in &remotes {
            debug!(remote = %name, "fetch");
            self.git.fetch(name, self.hooks)?;
        }
        Ok(remotes)
    }

    /// Fetch `remote` and integrate `<remote>/<branch>` into the current
    /// branch.
    ///
    /// When the histories diverged and merge cleanly, a merge commit is
    /// created only if `merge_commit` names the identity to stamp it with.
    /// Without it the merged index and working tree are left uncommitted.
    ///
    /// # Errors
    ///
    /// - [`SyncError::DetachedHead`] if HEAD is not on a branch
    /// - [`SyncError::RemoteTrackingMissing`] if the remote has no such branch
    /// - [`SyncError::Conflict`] if the merge left conflicts; the repository
    ///   stays in the merge state
    /// - [`SyncError::UnbornHead`] / [`SyncError::UnknownAnalysis`] for the
    ///   remaining analysis results
    pub fn pull(&self, remote: &str, merge_commit: Option<&Identity>) -> Result<PullOutcome, SyncError> {
        let branch_ref = self
            .git
            .head_branch_ref()?
            .ok_or(SyncError::DetachedHead { operation: "pull" })?;
        let branch = branch_ref
            .branch_name()
            .ok_or(SyncError::DetachedHead { operation: "pull" })?;

        self.fetch(Some(remote))?;

        let tracking = RefName::for_remote_branch(remote, &branch).map_err(GitError::from)?;
        let target = self.git.try_resolve_ref(tracking.as_str())?.ok_or_else(|| {
            SyncError::RemoteTrackingMissing {
                refname: tracking.to_string(),
            }
        })?;

        let analysis = self.git.merge_analysis(&target)?;
        debug!(branch = %branch, target = %target.short(7), %analysis, "merge analysis");

        match analysis {
            MergeAnalysis::UpToDate => {
                info!(branch = %branch, "already up to date");
                Ok(PullOutcome::UpToDate)
            }
            MergeAnalysis::FastForward => {
                self.git.fast_forward(&branch_ref, &target)?;
                info!(branch = %branch, to = %target.short(7), "fast-forwarded");
                Ok(PullOutcome::FastForwarded { to: target })
            }
            MergeAnalysis::Normal => {
                self.git.merge(&target)?;
                if self.git.has_conflicts()? {
                    return Err(SyncError::Conflict {
                        branch: branch.to_string(),
                        target: target.to_string(),
                    });
                }

                let commit = match merge_commit {
                    Some(identity) => {
                        let message = format!("{} {}", MERGE_MESSAGE_PREFIX, branch);
                        Some(self.git.commit_index(&message, identity, &[target])?)
                    }
                    None => None,
                };
                self.git.state_cleanup()?;

                info!(branch = %branch, committed = commit.is_some(), "merged");
                Ok(PullOutcome::Merged { commit })
            }
            MergeAnalysis::Unborn => Err(SyncError::UnbornHead { operation: "pull" }),
            MergeAnalysis::Unknown => Err(SyncError::UnknownAnalysis {
                target: target.to_string(),
            }),
        }
    }

    /// Three-way merge `target` into HEAD without committing.
    ///
    /// # Errors
    ///
    /// - [`SyncError::UnbornHead`] if HEAD has no commit
    /// - [`SyncError::SelfMerge`] if `target` is HEAD
    /// - [`SyncError::Conflict`] if the merge left conflicts
    pub fn merge(&self, target: &Oid) -> Result<(), SyncError> {
        let head = self
            .git
            .head()?
            .ok_or(SyncError::UnbornHead { operation: "merge" })?;
        if head.oid == *target {
            return Err(SyncError::SelfMerge {
                oid: target.to_string(),
            });
        }

        debug!(head = %head.oid.short(7), target = %target.short(7), "merge");
        self.git.merge(target)?;

        if self.git.has_conflicts()? {
            return Err(SyncError::Conflict {
                branch: head.shorthand,
                target: target.to_string(),
            });
        }
        Ok(())
    }

    /// Push the current branch to `remote`.
    ///
    /// The remote's push URL is first reset to its fetch URL.
    pub fn push(&self, remote: &str) -> Result<(), SyncError> {
        let head = self
            .git
            .head()?
            .ok_or(SyncError::UnbornHead { operation: "push" })?;
        if head.detached {
            return Err(SyncError::DetachedHead { operation: "push" });
        }

        let info = self.git.remote(remote)?;
        self.git.set_push_url(remote, &info.url)?;

        debug!(remote, refname = %head.refname, "push");
        self.git.push(remote, &head.refname, self.hooks)?;
        info!(remote, branch = %head.shorthand, "pushed");
        Ok(())
    }
}
