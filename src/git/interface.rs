//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module is the **single doorway** to the Git engine. Every
//! repository read and write goes through [`Git`], which returns strong
//! types and normalizes engine failures into [`GitError`] variants.
//!
//! # Error Handling
//!
//! - [`GitError::NotARepo`]: no repository at or above the path
//! - [`GitError::BranchNotFound`] / [`GitError::RemoteNotFound`]: named
//!   object missing
//! - [`GitError::Transport`]: a network operation failed, including
//!   credential and push-rejection failures raised by transport hooks
//!
//! # Example
//!
//! ```ignore
//! use repokit::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! if let Some(head) = git.head()? {
//!     println!("{} at {}", head.shorthand, head.oid.short(7));
//! }
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::analysis::MergeAnalysis;
use super::status::{StatusEntry, StatusFlags};
use super::transport::{self, FailureSlot, TransportError, TransportHooks};
use crate::core::identity::Identity;
use crate::core::types::{BranchName, Oid, RefName, TypeError};
use crate::core::ErrorKind;

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {}", path.display())]
    NotARepo { path: PathBuf },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound { refname: String },

    /// Named branch does not exist.
    #[error("branch doesn't exist: {name}")]
    BranchNotFound { name: String },

    /// A branch with that name already exists.
    #[error("branch already exists: {name}")]
    BranchExists { name: String },

    /// Named remote does not exist.
    #[error("remote not found: {name}")]
    RemoteNotFound { name: String },

    /// A remote with that name already exists.
    #[error("remote already exists: {name}")]
    RemoteExists { name: String },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound { oid: String },

    /// Path is not in the working tree or index.
    #[error("path not found: {path}")]
    PathNotFound { path: String },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid { oid: String },

    /// Invalid ref name format.
    #[error("invalid ref name: {message}")]
    InvalidRefName { message: String },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError { message: String },

    /// Network operation failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal { message: String },
}

impl GitError {
    /// Create a GitError from a git2::Error with context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => {
                if context.starts_with("refs/") || context == "HEAD" {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::InvalidSpec => GitError::InvalidRefName {
                message: format!("{}: {}", context, err.message()),
            },
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }

    /// Category of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GitError::NotARepo { .. }
            | GitError::RefNotFound { .. }
            | GitError::BranchNotFound { .. }
            | GitError::RemoteNotFound { .. }
            | GitError::ObjectNotFound { .. }
            | GitError::PathNotFound { .. } => ErrorKind::NotFound,
            GitError::BranchExists { .. }
            | GitError::RemoteExists { .. }
            | GitError::InvalidOid { .. }
            | GitError::InvalidRefName { .. } => ErrorKind::InputValidation,
            GitError::BareRepo => ErrorKind::Precondition,
            GitError::Transport(e) => e.kind(),
            GitError::AccessError { .. } | GitError::Internal { .. } => {
                ErrorKind::InternalConsistency
            }
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidRefName(msg) | TypeError::InvalidBranchName(msg) => {
                GitError::InvalidRefName { message: msg }
            }
        }
    }
}

/// State of in-progress Git operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitState {
    Clean,
    Merge,
    Rebase,
    CherryPick,
    Revert,
    Bisect,
    ApplyMailbox,
}

impl GitState {
    /// Check if any operation is in progress.
    ///
    /// # Example
    ///
    /// ```
    /// use repokit::git::GitState;
    ///
    /// assert!(!GitState::Clean.is_in_progress());
    /// assert!(GitState::Merge.is_in_progress());
    /// ```
    pub fn is_in_progress(&self) -> bool {
        !matches!(self, GitState::Clean)
    }

    pub fn description(&self) -> &'static str {
        match self {
            GitState::Clean => "clean",
            GitState::Merge => "merge",
            GitState::Rebase => "rebase",
            GitState::CherryPick => "cherry-pick",
            GitState::Revert => "revert",
            GitState::Bisect => "bisect",
            GitState::ApplyMailbox => "apply-mailbox",
        }
    }
}

impl std::fmt::Display for GitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Which branches to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchKind {
    Local,
    Remote,
    #[default]
    All,
}

impl BranchKind {
    fn filter(self) -> Option<git2::BranchType> {
        match self {
            BranchKind::Local => Some(git2::BranchType::Local),
            BranchKind::Remote => Some(git2::BranchType::Remote),
            BranchKind::All => None,
        }
    }
}

/// Where HEAD points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadInfo {
    /// Full ref name, or `HEAD` when detached
    pub refname: String,
    /// Branch short name, or `HEAD` when detached
    pub shorthand: String,
    pub oid: Oid,
    pub detached: bool,
}

/// One entry of the commit log.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CommitLogEntry {
    pub oid: Oid,
    pub committer_name: String,
    pub committer_email: String,
    pub message: String,
    pub time: chrono::DateTime<chrono::Utc>,
}

/// A configured remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    pub name: String,
    pub url: String,
    /// Explicit push URL, if one is configured
    pub push_url: Option<String>,
    pub fetch_refspecs: Vec<String>,
}

/// The Git interface.
///
/// Owns exactly one `git2::Repository` for its lifetime. No other module
/// imports `git2` except the transport callbacks, status flags and merge
/// analysis in this module's siblings.
pub struct Git {
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

fn to_oid(id: git2::Oid) -> Result<Oid, GitError> {
    Ok(Oid::new(id.to_string())?)
}

fn to_git2_oid(oid: &Oid) -> Result<git2::Oid, GitError> {
    git2::Oid::from_str(oid.as_str()).map_err(|_| GitError::InvalidOid {
        oid: oid.to_string(),
    })
}

impl Git {
    // =========================================================================
    // Repository Lifecycle
    // =========================================================================

    /// Open the repository containing `path`.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Initialize a new repository at `path`.
    pub fn init(path: &Path, description: Option<&str>) -> Result<Self, GitError> {
        let mut options = git2::RepositoryInitOptions::new();
        options.mkpath(true);
        if let Some(description) = description {
            options.description(description);
        }
        let repo = git2::Repository::init_opts(path, &options).map_err(|e| GitError::AccessError {
            message: format!("cannot initialize {}: {}", path.display(), e.message()),
        })?;
        Ok(Self { repo })
    }

    /// Clone `url` into `path`, authenticating through `hooks`.
    pub fn clone(url: &str, path: &Path, hooks: &dyn TransportHooks) -> Result<Self, GitError> {
        let slot = FailureSlot::default();
        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(transport::remote_callbacks(hooks, &slot));

        let repo = git2::build::RepoBuilder::new()
            .fetch_options(fetch_options)
            .clone(url, path)
            .map_err(|e| slot.error_for(e, "clone"))?;
        Ok(Self { repo })
    }

    /// Path of the `.git` directory of the repository containing `path`.
    pub fn discover(path: &Path) -> Result<PathBuf, GitError> {
        git2::Repository::discover(path)
            .map(|repo| repo.path().to_path_buf())
            .map_err(|_| GitError::NotARepo {
                path: path.to_path_buf(),
            })
    }

    /// Whether `path` is (inside) a repository.
    pub fn is_repository(path: &Path) -> bool {
        git2::Repository::discover(path).is_ok()
    }

    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    // =========================================================================
    // State Detection
    // =========================================================================

    /// Get the current Git state (merge, rebase, ...).
    pub fn state(&self) -> GitState {
        match self.repo.state() {
            git2::RepositoryState::Clean => GitState::Clean,
            git2::RepositoryState::Merge => GitState::Merge,
            git2::RepositoryState::Rebase
            | git2::RepositoryState::RebaseInteractive
            | git2::RepositoryState::RebaseMerge => GitState::Rebase,
            git2::RepositoryState::CherryPick | git2::RepositoryState::CherryPickSequence => {
                GitState::CherryPick
            }
            git2::RepositoryState::Revert | git2::RepositoryState::RevertSequence => {
                GitState::Revert
            }
            git2::RepositoryState::Bisect => GitState::Bisect,
            git2::RepositoryState::ApplyMailbox | git2::RepositoryState::ApplyMailboxOrRebase => {
                GitState::ApplyMailbox
            }
        }
    }

    /// Check if there are unresolved conflicts in the index.
    pub fn has_conflicts(&self) -> Result<bool, GitError> {
        Ok(self.repo.index()?.has_conflicts())
    }

    /// Clear in-progress operation state (MERGE_HEAD, MERGE_MSG, ...).
    pub fn state_cleanup(&self) -> Result<(), GitError> {
        Ok(self.repo.cleanup_state()?)
    }

    // =========================================================================
    // HEAD and Refs
    // =========================================================================

    /// Where HEAD points, or `None` if HEAD is unborn.
    pub fn head(&self) -> Result<Option<HeadInfo>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                return Ok(None)
            }
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };

        let oid = head
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?
            .id();
        let detached = !head.is_branch();

        Ok(Some(HeadInfo {
            refname: head.name().unwrap_or("HEAD").to_string(),
            shorthand: head.shorthand().unwrap_or("HEAD").to_string(),
            oid: to_oid(oid)?,
            detached,
        }))
    }

    /// HEAD commit, or `None` if HEAD is unborn.
    pub fn head_oid(&self) -> Result<Option<Oid>, GitError> {
        Ok(self.head()?.map(|h| h.oid))
    }

    /// The branch ref HEAD names, even when that branch is unborn.
    ///
    /// Returns `None` when HEAD is detached.
    pub fn head_branch_ref(&self) -> Result<Option<RefName>, GitError> {
        let head = self
            .repo
            .find_reference("HEAD")
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;
        match head.symbolic_target() {
            Some(target) => Ok(Some(RefName::new(target)?)),
            None => Ok(None),
        }
    }

    /// Get the current branch name, if on a branch with commits.
    ///
    /// Returns `None` if HEAD is detached or unborn.
    pub fn current_branch(&self) -> Result<Option<BranchName>, GitError> {
        match self.head()? {
            Some(head) if !head.detached => Ok(Some(BranchName::new(head.shorthand)?)),
            _ => Ok(None),
        }
    }

    /// Resolve a ref to the commit it points at.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if the ref doesn't exist
    pub fn resolve_ref(&self, refname: &str) -> Result<Oid, GitError> {
        let reference = self
            .repo
            .find_reference(refname)
            .map_err(|e| GitError::from_git2(e, refname))?;
        let oid = reference
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, refname))?
            .id();
        to_oid(oid)
    }

    /// Resolve a ref, returning None if it doesn't exist.
    pub fn try_resolve_ref(&self, refname: &str) -> Result<Option<Oid>, GitError> {
        match self.resolve_ref(refname) {
            Ok(oid) => Ok(Some(oid)),
            Err(GitError::RefNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Branches
    // =========================================================================

    /// Branch short names (`main`, `origin/main`), sorted.
    pub fn list_branches(&self, kind: BranchKind) -> Result<Vec<String>, GitError> {
        let mut names = Vec::new();
        for branch in self.repo.branches(kind.filter())? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                // origin/HEAD is a symbolic pointer, not a branch
                if !name.ends_with("/HEAD") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Commit a local or remote-tracking branch points at, if it exists.
    pub fn branch_target(&self, name: &str, kind: BranchKind) -> Result<Option<Oid>, GitError> {
        let types: &[git2::BranchType] = match kind {
            BranchKind::Local => &[git2::BranchType::Local],
            BranchKind::Remote => &[git2::BranchType::Remote],
            BranchKind::All => &[git2::BranchType::Local, git2::BranchType::Remote],
        };
        for branch_type in types {
            match self.repo.find_branch(name, *branch_type) {
                Ok(branch) => {
                    let commit = branch
                        .get()
                        .peel_to_commit()
                        .map_err(|e| GitError::from_git2(e, name))?;
                    return Ok(Some(to_oid(commit.id())?));
                }
                Err(e) if e.code() == git2::ErrorCode::NotFound => continue,
                Err(e) if e.code() == git2::ErrorCode::InvalidSpec => continue,
                Err(e) => return Err(GitError::from_git2(e, name)),
            }
        }
        Ok(None)
    }

    /// Create a local branch at `target`.
    pub fn create_branch(&self, name: &BranchName, target: &Oid) -> Result<(), GitError> {
        let commit = self
            .repo
            .find_commit(to_git2_oid(target)?)
            .map_err(|e| GitError::from_git2(e, target.as_str()))?;
        match self.repo.branch(name.as_str(), &commit, false) {
            Ok(_) => Ok(()),
            Err(e) if e.code() == git2::ErrorCode::Exists => Err(GitError::BranchExists {
                name: name.to_string(),
            }),
            Err(e) => Err(GitError::from_git2(e, name.as_str())),
        }
    }

    /// Delete a local branch.
    pub fn delete_branch(&self, name: &str) -> Result<(), GitError> {
        let mut branch = self
            .repo
            .find_branch(name, git2::BranchType::Local)
            .map_err(|_| GitError::BranchNotFound {
                name: name.to_string(),
            })?;
        branch
            .delete()
            .map_err(|e| GitError::from_git2(e, name))
    }

    /// Check out `refname` and point HEAD at it.
    pub fn checkout(&self, refname: &RefName) -> Result<(), GitError> {
        let target = self
            .repo
            .revparse_single(refname.as_str())
            .map_err(|e| GitError::from_git2(e, refname.as_str()))?;
        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.safe();
        self.repo.checkout_tree(&target, Some(&mut checkout))?;
        self.repo
            .set_head(refname.as_str())
            .map_err(|e| GitError::from_git2(e, refname.as_str()))
    }

    // =========================================================================
    // Index
    // =========================================================================

    /// Stage one path (relative to the working directory).
    pub fn add_path(&self, path: &str) -> Result<(), GitError> {
        let mut index = self.repo.index()?;
        index.add_path(Path::new(path)).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => GitError::PathNotFound {
                path: path.to_string(),
            },
            _ => GitError::from_git2(e, path),
        })?;
        Ok(index.write()?)
    }

    /// Stage everything matching `pathspecs` (everything when empty).
    pub fn add_all(&self, pathspecs: &[String]) -> Result<(), GitError> {
        let mut index = self.repo.index()?;
        let specs: Vec<&str> = if pathspecs.is_empty() {
            vec!["*"]
        } else {
            pathspecs.iter().map(String::as_str).collect()
        };
        index.add_all(specs, git2::IndexAddOption::DEFAULT, None)?;
        Ok(index.write()?)
    }

    /// Unstage a path: its index entry goes back to the HEAD version, or
    /// is removed before the first commit. The working tree is untouched.
    ///
    /// A staged deletion of a tracked path is undone the same way.
    pub fn remove_path(&self, path: &str) -> Result<(), GitError> {
        let mut index = self.repo.index()?;
        let staged = index.get_path(Path::new(path), 0).is_some();

        match self.head_oid()? {
            Some(head) => {
                let commit = self.repo.find_commit(to_git2_oid(&head)?)?;
                let in_head = commit.tree()?.get_path(Path::new(path)).is_ok();
                if !staged && !in_head {
                    return Err(GitError::PathNotFound {
                        path: path.to_string(),
                    });
                }
                self.repo.reset_default(Some(commit.as_object()), [path])?;
            }
            None => {
                if !staged {
                    return Err(GitError::PathNotFound {
                        path: path.to_string(),
                    });
                }
                index.remove_path(Path::new(path))?;
                index.write()?;
            }
        }
        Ok(())
    }

    /// Commit the index onto HEAD.
    ///
    /// Parents are the current HEAD (if born) followed by `extra_parents`.
    /// Both author and committer are `identity`.
    pub fn commit_index(
        &self,
        message: &str,
        identity: &Identity,
        extra_parents: &[Oid],
    ) -> Result<Oid, GitError> {
        let signature = git2::Signature::now(identity.name(), identity.email())?;
        let tree_id = self.repo.index()?.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let mut parent_ids = Vec::new();
        if let Some(head) = self.head_oid()? {
            parent_ids.push(to_git2_oid(&head)?);
        }
        for parent in extra_parents {
            parent_ids.push(to_git2_oid(parent)?);
        }
        let parents = parent_ids
            .iter()
            .map(|id| {
                self.repo
                    .find_commit(*id)
                    .map_err(|e| GitError::from_git2(e, &id.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parent_refs,
        )?;
        debug!(oid = %oid, parents = parent_refs.len(), "created commit");
        to_oid(oid)
    }

    /// Git-configured identity (`user.name`/`user.email`), if complete.
    pub fn configured_identity(&self) -> Option<Identity> {
        let config = self.repo.config().ok()?;
        let name = config.get_string("user.name").ok()?;
        let email = config.get_string("user.email").ok()?;
        Identity::new(name, email).ok()
    }

    // =========================================================================
    // Status and History
    // =========================================================================

    /// Status of every changed, untracked or ignored path.
    pub fn statuses(&self) -> Result<Vec<StatusEntry>, GitError> {
        let mut options = git2::StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(true);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses
            .iter()
            .filter_map(|entry| {
                let path = entry.path()?.to_string();
                Some(StatusEntry::new(path, StatusFlags::from(entry.status())))
            })
            .collect())
    }

    /// Commits reachable from HEAD, oldest first (topological, reversed).
    ///
    /// Empty when HEAD is unborn.
    pub fn commit_log(&self) -> Result<Vec<CommitLogEntry>, GitError> {
        let Some(head) = self.head_oid()? else {
            return Ok(Vec::new());
        };

        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::REVERSE)?;
        walk.push(to_git2_oid(&head)?)?;

        let mut log = Vec::new();
        for id in walk {
            let commit = self.repo.find_commit(id?)?;
            let committer = commit.committer();
            let time = chrono::DateTime::from_timestamp(commit.time().seconds(), 0)
                .unwrap_or_default();
            log.push(CommitLogEntry {
                oid: to_oid(commit.id())?,
                committer_name: committer.name().unwrap_or_default().to_string(),
                committer_email: committer.email().unwrap_or_default().to_string(),
                message: commit.message().unwrap_or_default().to_string(),
                time,
            });
        }
        Ok(log)
    }

    /// Parent commits of `oid`, in order.
    pub fn commit_parents(&self, oid: &Oid) -> Result<Vec<Oid>, GitError> {
        let commit = self
            .repo
            .find_commit(to_git2_oid(oid)?)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))?;
        commit.parent_ids().map(to_oid).collect()
    }

    // =========================================================================
    // Remotes
    // =========================================================================

    fn find_remote(&self, name: &str) -> Result<git2::Remote<'_>, GitError> {
        self.repo.find_remote(name).map_err(|_| GitError::RemoteNotFound {
            name: name.to_string(),
        })
    }

    /// Names of configured remotes, in configuration order.
    pub fn remote_names(&self) -> Result<Vec<String>, GitError> {
        Ok(self
            .repo
            .remotes()?
            .iter()
            .flatten()
            .map(String::from)
            .collect())
    }

    /// A configured remote.
    pub fn remote(&self, name: &str) -> Result<RemoteInfo, GitError> {
        let remote = self.find_remote(name)?;
        let fetch_refspecs = remote
            .fetch_refspecs()?
            .iter()
            .flatten()
            .map(String::from)
            .collect();
        Ok(RemoteInfo {
            name: name.to_string(),
            url: remote.url().unwrap_or_default().to_string(),
            push_url: remote.pushurl().map(String::from),
            fetch_refspecs,
        })
    }

    /// Add a remote with the default fetch refspec.
    pub fn create_remote(&self, name: &str, url: &str) -> Result<(), GitError> {
        match self.repo.remote(name, url) {
            Ok(_) => Ok(()),
            Err(e) if e.code() == git2::ErrorCode::Exists => Err(GitError::RemoteExists {
                name: name.to_string(),
            }),
            Err(e) => Err(GitError::from_git2(e, name)),
        }
    }

    pub fn set_push_url(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.find_remote(name)?;
        Ok(self.repo.remote_set_pushurl(name, Some(url))?)
    }

    /// Fetch the remote's configured refspecs.
    ///
    /// Updates only remote-tracking refs (and FETCH_HEAD).
    pub fn fetch(&self, name: &str, hooks: &dyn TransportHooks) -> Result<(), GitError> {
        let mut remote = self.find_remote(name)?;
        let refspecs: Vec<String> = remote
            .fetch_refspecs()?
            .iter()
            .flatten()
            .map(String::from)
            .collect();

        let slot = FailureSlot::default();
        let mut options = git2::FetchOptions::new();
        options.remote_callbacks(transport::remote_callbacks(hooks, &slot));

        debug!(remote = name, ?refspecs, "fetching");
        remote
            .fetch(&refspecs, Some(&mut options), None)
            .map_err(|e| slot.error_for(e, "fetch"))?;
        Ok(())
    }

    /// Push one refspec to the remote.
    pub fn push(&self, name: &str, refspec: &str, hooks: &dyn TransportHooks) -> Result<(), GitError> {
        let mut remote = self.find_remote(name)?;

        let slot = FailureSlot::default();
        let mut options = git2::PushOptions::new();
        options.remote_callbacks(transport::remote_callbacks(hooks, &slot));

        debug!(remote = name, refspec, "pushing");
        remote
            .push(&[refspec], Some(&mut options))
            .map_err(|e| slot.error_for(e, "push"))?;

        // A rejection reported after the engine considered the push done
        match slot.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Merging
    // =========================================================================

    /// How `target` relates to HEAD.
    pub fn merge_analysis(&self, target: &Oid) -> Result<MergeAnalysis, GitError> {
        let annotated = self
            .repo
            .find_annotated_commit(to_git2_oid(target)?)
            .map_err(|e| GitError::from_git2(e, target.as_str()))?;
        let (flags, _preference) = self.repo.merge_analysis(&[&annotated])?;
        Ok(MergeAnalysis::classify(flags))
    }

    /// Check out `target`, then move `branch` and HEAD to it.
    ///
    /// Creates `branch` when it does not exist yet (unborn HEAD).
    pub fn fast_forward(&self, branch: &RefName, target: &Oid) -> Result<(), GitError> {
        let commit = self
            .repo
            .find_commit(to_git2_oid(target)?)
            .map_err(|e| GitError::from_git2(e, target.as_str()))?;

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.safe();
        self.repo
            .checkout_tree(commit.as_object(), Some(&mut checkout))?;

        self.repo.reference(
            branch.as_str(),
            commit.id(),
            true,
            &format!("fast-forward to {}", target.short(7)),
        )?;
        self.repo
            .set_head(branch.as_str())
            .map_err(|e| GitError::from_git2(e, branch.as_str()))
    }

    /// Three-way merge `target` into the index and working tree.
    ///
    /// Leaves the repository in the merge state; the caller commits or
    /// cleans up.
    pub fn merge(&self, target: &Oid) -> Result<(), GitError> {
        let annotated = self
            .repo
            .find_annotated_commit(to_git2_oid(target)?)
            .map_err(|e| GitError::from_git2(e, target.as_str()))?;
        self.repo.merge(&[&annotated], None, None)?;
        Ok(())
    }
}
