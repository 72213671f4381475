//! Shared fixtures for integration tests.
//!
//! Repositories are created through repokit itself; bare remotes through
//! git2 directly, since the facade only manages working trees.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use repokit::auth::CredentialResolver;
use repokit::core::identity::Identity;
use repokit::core::types::Oid;
use repokit::repo::Repository;
use repokit::secrets::{Keystore, SecretError};

/// Keystore that never has a passphrase and records every call.
#[derive(Default)]
pub struct RecordingKeystore {
    pub answer: Option<String>,
    pub calls: RefCell<Vec<String>>,
}

impl RecordingKeystore {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Keystore for RecordingKeystore {
    fn get_password(
        &self,
        namespace: &str,
        key_id: &str,
        _interactive: bool,
        _prompt: &str,
    ) -> Result<Option<String>, SecretError> {
        self.calls
            .borrow_mut()
            .push(format!("get {}/{}", namespace, key_id));
        Ok(self.answer.clone())
    }

    fn delete_password(&self, namespace: &str, key_id: &str) -> Result<(), SecretError> {
        self.calls
            .borrow_mut()
            .push(format!("delete {}/{}", namespace, key_id));
        Ok(())
    }
}

pub type TestRepository = Repository<RecordingKeystore>;

pub fn resolver() -> CredentialResolver<RecordingKeystore> {
    CredentialResolver::new(RecordingKeystore::default()).interactive(false)
}

pub fn identity() -> Identity {
    Identity::new("Test User", "test@example.com").expect("identity")
}

/// A working-tree repository in its own temporary directory.
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: TestRepository,
}

impl TestRepo {
    /// Empty repository (unborn HEAD).
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let repo =
            Repository::create_repository(dir.path(), None, resolver()).expect("init repository");
        Self { dir, repo }
    }

    /// Repository with one commit of `README.md`.
    pub fn new() -> Self {
        let fixture = Self::empty();
        fixture.commit_file("README.md", "# Test Repo\n", "Initial commit");
        fixture
    }

    /// Clone of `remote` into a fresh directory.
    pub fn clone_of(remote: &Path) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let target = dir.path().join("work");
        let repo = Repository::clone(&remote.to_string_lossy(), &target, resolver())
            .expect("clone");
        Self { dir, repo }
    }

    pub fn work_dir(&self) -> PathBuf {
        self.repo.work_dir().expect("work dir").to_path_buf()
    }

    pub fn write(&self, path: &str, content: &str) {
        let full = self.work_dir().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("mkdir");
        }
        std::fs::write(full, content).expect("write file");
    }

    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.work_dir().join(path)).expect("read file")
    }

    /// Write, stage and commit one file, returning the new commit.
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> Oid {
        self.write(path, content);
        self.repo.add(path).expect("add");
        self.repo.create_commit(message, &identity()).expect("commit")
    }

    pub fn head_oid(&self) -> Oid {
        self.repo.head().expect("head").expect("born head").oid
    }

    pub fn branch(&self) -> String {
        self.repo
            .current_branch()
            .expect("branch")
            .expect("on a branch")
            .to_string()
    }
}

/// A bare repository to act as `origin`.
pub struct BareRemote {
    pub dir: TempDir,
}

impl BareRemote {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        git2::Repository::init_bare(dir.path()).expect("init bare");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn url(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }

    /// Commit a ref points at, if the ref exists.
    pub fn resolve(&self, refname: &str) -> Option<String> {
        let repo = git2::Repository::open_bare(self.dir.path()).ok()?;
        let reference = repo.find_reference(refname).ok()?;
        reference.target().map(|oid| oid.to_string())
    }
}

/// An upstream working repo pushed to a bare remote, and a clone of it.
pub struct SyncFixture {
    pub remote: BareRemote,
    pub upstream: TestRepo,
    pub local: TestRepo,
}

impl SyncFixture {
    pub fn new() -> Self {
        let remote = BareRemote::new();
        let upstream = TestRepo::new();
        upstream
            .repo
            .create_remote("origin", &remote.url())
            .expect("add origin");
        upstream.repo.push("origin").expect("initial push");
        let local = TestRepo::clone_of(remote.path());
        Self {
            remote,
            upstream,
            local,
        }
    }

    /// Commit on upstream and push it.
    pub fn upstream_commit(&self, path: &str, content: &str) -> Oid {
        let oid = self.upstream.commit_file(path, content, &format!("upstream {path}"));
        self.upstream.repo.push("origin").expect("push upstream");
        oid
    }
}
