//! repo::repository
//!
//! The [`Repository`] facade.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::errors::RepoError;
use crate::auth::CredentialResolver;
use crate::core::identity::Identity;
use crate::core::types::{BranchName, Oid, RefName};
use crate::git::{
    AuthCallbacks, BranchKind, CommitLogEntry, Git, GitState, HeadInfo, RemoteInfo, StatusEntry,
};
use crate::secrets::Keystore;
use crate::sync::{PullOutcome, SyncEngine};
use crate::ui::output;

/// Name of the metadata directory inside a working tree.
const GIT_DIR_NAME: &str = ".git";

fn require_path(path: &Path) -> Result<(), RepoError> {
    if path.as_os_str().is_empty() {
        return Err(RepoError::InvalidInput(
            "repository path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn branch_name(name: &str) -> Result<BranchName, RepoError> {
    BranchName::new(name).map_err(|e| RepoError::InvalidInput(e.to_string()))
}

/// A working-tree repository with credentials for its remotes.
///
/// Owns one [`Git`] handle for its lifetime. Remote operations authenticate
/// through the held [`CredentialResolver`].
///
/// # Example
///
/// ```ignore
/// use repokit::auth::CredentialResolver;
/// use repokit::repo::Repository;
///
/// let repo = Repository::open(Path::new("."), CredentialResolver::new(keystore))?;
/// repo.add("README.md")?;
/// repo.create_commit("Update readme", &identity)?;
/// repo.push("origin")?;
/// ```
pub struct Repository<K> {
    git: Git,
    resolver: CredentialResolver<K>,
}

impl<K> std::fmt::Debug for Repository<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").field("git", &self.git).finish()
    }
}

impl<K: Keystore> Repository<K> {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open the repository containing `path`.
    ///
    /// # Errors
    ///
    /// - [`RepoError::InvalidInput`] if `path` is empty
    /// - [`GitError::NotARepo`](crate::git::GitError::NotARepo) if there is no repository at or above `path`
    pub fn open(path: &Path, resolver: CredentialResolver<K>) -> Result<Self, RepoError> {
        require_path(path)?;
        let git = Git::open(path)?;
        Ok(Self { git, resolver })
    }

    /// Initialize a new repository at `path`, creating directories as needed.
    pub fn create_repository(
        path: &Path,
        description: Option<&str>,
        resolver: CredentialResolver<K>,
    ) -> Result<Self, RepoError> {
        require_path(path)?;
        let git = Git::init(path, description)?;
        info!(path = %path.display(), "initialized repository");
        Ok(Self { git, resolver })
    }

    /// Clone `url` into `path`.
    pub fn clone(url: &str, path: &Path, resolver: CredentialResolver<K>) -> Result<Self, RepoError> {
        if url.trim().is_empty() {
            return Err(RepoError::InvalidInput("clone URL cannot be empty".to_string()));
        }
        require_path(path)?;

        let git = Git::clone(url, path, &AuthCallbacks::new(&resolver)).map_err(RepoError::network)?;
        info!(url, path = %path.display(), "cloned repository");
        Ok(Self { git, resolver })
    }

    pub fn resolver(&self) -> &CredentialResolver<K> {
        &self.resolver
    }

    /// Path of the `.git` directory.
    pub fn path(&self) -> &Path {
        self.git.git_dir()
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.git.work_dir()
    }

    /// In-progress operation, if any (a conflicting pull leaves `Merge`).
    pub fn state(&self) -> GitState {
        self.git.state()
    }

    // =========================================================================
    // HEAD and Branches
    // =========================================================================

    /// Where HEAD points, or `None` before the first commit.
    pub fn head(&self) -> Result<Option<HeadInfo>, RepoError> {
        Ok(self.git.head()?)
    }

    /// Current branch, or `None` when detached or before the first commit.
    pub fn current_branch(&self) -> Result<Option<BranchName>, RepoError> {
        Ok(self.git.current_branch()?)
    }

    pub fn list_branches(&self, kind: BranchKind) -> Result<Vec<String>, RepoError> {
        Ok(self.git.list_branches(kind)?)
    }

    /// Create branch `name` at `from` (a local or remote-tracking branch),
    /// or at HEAD when `from` is `None`.
    ///
    /// # Errors
    ///
    /// - [`RepoError::NotFound`] if the source branch does not exist, or
    ///   HEAD has no commit
    /// - [`GitError::BranchExists`](crate::git::GitError::BranchExists) if `name` is taken
    pub fn create_branch(&self, name: &str, from: Option<&str>) -> Result<Oid, RepoError> {
        let name = branch_name(name)?;
        let target = match from {
            Some(source) => self
                .git
                .branch_target(source, BranchKind::All)?
                .ok_or_else(|| RepoError::NotFound(format!("cannot find branch {}", source)))?,
            None => self
                .git
                .head_oid()?
                .ok_or_else(|| RepoError::NotFound("HEAD has no commit to branch from".into()))?,
        };

        self.git.create_branch(&name, &target)?;
        debug!(branch = %name, at = %target.short(7), "created branch");
        Ok(target)
    }

    /// Delete local branch `name`.
    pub fn delete_branch(&self, name: &str) -> Result<(), RepoError> {
        self.git.delete_branch(name)?;
        debug!(branch = name, "deleted branch");
        Ok(())
    }

    /// Check out local branch `name`, creating it from `<remote>/<name>`
    /// when it only exists on the remote.
    pub fn checkout_branch(&self, name: &str, remote: &str) -> Result<(), RepoError> {
        let branch = branch_name(name)?;

        if self.git.branch_target(name, BranchKind::Local)?.is_none() {
            let tracking = format!("{}/{}", remote, name);
            let target = self
                .git
                .branch_target(&tracking, BranchKind::Remote)?
                .ok_or_else(|| RepoError::NotFound(format!("cannot find branch {}", name)))?;
            self.git.create_branch(&branch, &target)?;
            debug!(branch = name, from = %tracking, "created local branch from remote");
        }

        self.git.checkout(&RefName::for_branch(&branch))?;
        info!(branch = name, "checked out");
        Ok(())
    }

    // =========================================================================
    // Index and Commits
    // =========================================================================

    /// Stage one path (relative to the working directory).
    pub fn add(&self, path: &str) -> Result<(), RepoError> {
        Ok(self.git.add_path(path)?)
    }

    /// Stage every change matching `pathspecs`, or everything when empty.
    pub fn add_all(&self, pathspecs: &[String]) -> Result<(), RepoError> {
        Ok(self.git.add_all(pathspecs)?)
    }

    /// Remove a path from the index; the working tree keeps the file.
    pub fn unstage(&self, path: &str) -> Result<(), RepoError> {
        Ok(self.git.remove_path(path)?)
    }

    /// Commit the index onto HEAD, stamped with `identity`.
    ///
    /// # Errors
    ///
    /// - [`RepoError::InvalidInput`] if `message` is blank
    pub fn create_commit(&self, message: &str, identity: &Identity) -> Result<Oid, RepoError> {
        if message.trim().is_empty() {
            return Err(RepoError::InvalidInput(
                "commit message cannot be empty".to_string(),
            ));
        }
        let oid = self.git.commit_index(message, identity, &[])?;
        info!(oid = %oid.short(7), "committed");
        Ok(oid)
    }

    /// Git-configured identity, if `user.name` and `user.email` are set.
    pub fn configured_identity(&self) -> Option<Identity> {
        self.git.configured_identity()
    }

    // =========================================================================
    // Status and History
    // =========================================================================

    /// Status of every changed, untracked or ignored path.
    pub fn status(&self) -> Result<Vec<StatusEntry>, RepoError> {
        Ok(self.git.statuses()?)
    }

    /// Human-readable status report; ignored paths are omitted.
    pub fn display_status(&self) -> Result<String, RepoError> {
        let branch = match self.git.head()? {
            Some(head) => head.shorthand,
            None => self
                .git
                .head_branch_ref()?
                .and_then(|r| r.branch_name())
                .map(|b| b.to_string())
                .unwrap_or_else(|| "HEAD".to_string()),
        };
        Ok(output::format_status(&branch, &self.status()?))
    }

    /// Commits reachable from HEAD, oldest first.
    pub fn commit_log(&self) -> Result<Vec<CommitLogEntry>, RepoError> {
        Ok(self.git.commit_log()?)
    }

    // =========================================================================
    // Remotes
    // =========================================================================

    pub fn remote_names(&self) -> Result<Vec<String>, RepoError> {
        Ok(self.git.remote_names()?)
    }

    pub fn remote(&self, name: &str) -> Result<RemoteInfo, RepoError> {
        Ok(self.git.remote(name)?)
    }

    /// Fetch URL of remote `name`.
    pub fn remote_url(&self, name: &str) -> Result<String, RepoError> {
        Ok(self.git.remote(name)?.url)
    }

    pub fn create_remote(&self, name: &str, url: &str) -> Result<(), RepoError> {
        if name.trim().is_empty() || url.trim().is_empty() {
            return Err(RepoError::InvalidInput(
                "remote name and URL cannot be empty".to_string(),
            ));
        }
        self.git.create_remote(name, url)?;
        debug!(remote = name, "created remote");
        Ok(())
    }

    // =========================================================================
    // Synchronization
    // =========================================================================

    /// Fetch `remote`, or every configured remote when `None`.
    pub fn fetch(&self, remote: Option<&str>) -> Result<Vec<String>, RepoError> {
        let hooks = AuthCallbacks::new(&self.resolver);
        Ok(SyncEngine::new(&self.git, &hooks).fetch(remote)?)
    }

    /// Fetch `remote` and integrate it into the current branch.
    ///
    /// A clean three-way merge is committed only when `merge_commit` is set.
    pub fn pull(&self, remote: &str, merge_commit: Option<&Identity>) -> Result<PullOutcome, RepoError> {
        let hooks = AuthCallbacks::new(&self.resolver);
        Ok(SyncEngine::new(&self.git, &hooks).pull(remote, merge_commit)?)
    }

    /// Three-way merge commit `oid` into HEAD without committing.
    pub fn merge(&self, oid: &str) -> Result<(), RepoError> {
        let target = Oid::new(oid).map_err(|e| RepoError::InvalidInput(e.to_string()))?;
        let hooks = AuthCallbacks::new(&self.resolver);
        Ok(SyncEngine::new(&self.git, &hooks).merge(&target)?)
    }

    /// Push the current branch to `remote`.
    pub fn push(&self, remote: &str) -> Result<(), RepoError> {
        let hooks = AuthCallbacks::new(&self.resolver);
        Ok(SyncEngine::new(&self.git, &hooks).push(remote)?)
    }
}

// =============================================================================
// Path-level operations
// =============================================================================

/// Whether `path` is inside a repository. Errors count as "no".
pub fn is_repository(path: &Path) -> bool {
    !path.as_os_str().is_empty() && Git::is_repository(path)
}

/// `.git` directory of the repository containing `path`.
///
/// # Errors
///
/// - [`RepoError::InvalidInput`] if `path` is empty
/// - [`GitError::NotARepo`](crate::git::GitError::NotARepo) if no repository contains `path`
pub fn find_git_repo(path: &Path) -> Result<PathBuf, RepoError> {
    require_path(path)?;
    Ok(Git::discover(path)?)
}

/// Remove `<path>/.git`, leaving the working files.
///
/// # Errors
///
/// - [`RepoError::NotFound`] if `path` has no `.git` directory
pub fn delete_repository(path: &Path) -> Result<(), RepoError> {
    require_path(path)?;
    let git_dir = path.join(GIT_DIR_NAME);
    if !git_dir.is_dir() {
        return Err(RepoError::NotFound(format!(
            "no repository at {}",
            path.display()
        )));
    }
    std::fs::remove_dir_all(&git_dir).map_err(|e| RepoError::Io {
        path: git_dir.clone(),
        source: e,
    })?;
    info!(path = %path.display(), "deleted repository");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::secrets::SecretError;
    use tempfile::TempDir;

    struct EmptyKeystore;

    impl Keystore for EmptyKeystore {
        fn get_password(
            &self,
            _namespace: &str,
            _key_id: &str,
            _interactive: bool,
            _prompt: &str,
        ) -> Result<Option<String>, SecretError> {
            Ok(None)
        }

        fn delete_password(&self, _namespace: &str, _key_id: &str) -> Result<(), SecretError> {
            Ok(())
        }
    }

    fn resolver() -> CredentialResolver<EmptyKeystore> {
        CredentialResolver::new(EmptyKeystore).interactive(false)
    }

    #[test]
    fn empty_path_rejected() {
        let err = Repository::open(Path::new(""), resolver()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputValidation);

        assert_eq!(
            find_git_repo(Path::new("")).unwrap_err().kind(),
            ErrorKind::InputValidation
        );
        assert!(!is_repository(Path::new("")));
    }

    #[test]
    fn open_non_repository_is_not_found() {
        let temp = TempDir::new().expect("temp");
        let err = Repository::open(temp.path(), resolver()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn empty_commit_message_rejected() {
        let temp = TempDir::new().expect("temp");
        let repo = Repository::create_repository(temp.path(), None, resolver()).expect("init");
        let identity = Identity::new("Dev", "dev@example.com").expect("identity");

        let err = repo.create_commit("   ", &identity).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputValidation);
    }

    #[test]
    fn malformed_merge_target() {
        let temp = TempDir::new().expect("temp");
        let repo = Repository::create_repository(temp.path(), None, resolver()).expect("init");

        assert_eq!(
            repo.merge("not-a-sha").unwrap_err().kind(),
            ErrorKind::InputValidation
        );
    }

    #[test]
    fn delete_without_git_dir() {
        let temp = TempDir::new().expect("temp");
        let err = delete_repository(temp.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
