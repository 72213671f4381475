//! Integration tests for the repository facade.

mod common;

use std::path::Path;

use common::{identity, resolver, SyncFixture, TestRepo};

use repokit::core::ErrorKind;
use repokit::git::{BranchKind, StatusLabel};
use repokit::repo::{self, Repository};

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn fresh_repository_has_no_head() {
    let fixture = TestRepo::empty();

    assert!(fixture.repo.head().expect("head").is_none());
    assert!(fixture.repo.current_branch().expect("branch").is_none());
    assert!(fixture.repo.commit_log().expect("log").is_empty());
}

#[test]
fn init_creates_missing_directories_and_description() {
    let temp = tempfile::TempDir::new().expect("temp");
    let path = temp.path().join("nested/project");

    let created = Repository::create_repository(&path, Some("nested project"), resolver())
        .expect("init");

    assert!(repo::is_repository(&path));
    let description =
        std::fs::read_to_string(created.path().join("description")).expect("description");
    assert!(description.contains("nested project"));
}

#[test]
fn discovery_from_subdirectory() {
    let fixture = TestRepo::new();
    fixture.write("src/deep/file.txt", "x");
    let deep = fixture.work_dir().join("src/deep");

    let git_dir = repo::find_git_repo(&deep).expect("discover");
    let reopened = Repository::open(&deep, resolver()).expect("open from subdir");

    assert_eq!(
        git_dir.canonicalize().expect("canonical"),
        reopened.path().canonicalize().expect("canonical")
    );
}

#[test]
fn is_repository_false_for_missing_and_plain_paths() {
    let temp = tempfile::TempDir::new().expect("temp");
    assert!(!repo::is_repository(&temp.path().join("does-not-exist")));
    assert!(!repo::is_repository(temp.path()));
}

#[test]
fn open_errors() {
    assert_eq!(
        Repository::open(Path::new(""), resolver()).unwrap_err().kind(),
        ErrorKind::InputValidation
    );

    let temp = tempfile::TempDir::new().expect("temp");
    assert_eq!(
        Repository::open(temp.path(), resolver()).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn delete_repository_keeps_working_files() {
    let fixture = TestRepo::new();
    let work = fixture.work_dir();

    repo::delete_repository(&work).expect("delete");

    assert!(!work.join(".git").exists());
    assert!(work.join("README.md").exists());
    assert!(!repo::is_repository(&work));
    assert_eq!(
        repo::delete_repository(&work).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

// =============================================================================
// Branches
// =============================================================================

#[test]
fn branch_lifecycle() {
    let fixture = TestRepo::new();
    let head = fixture.head_oid();

    let at = fixture.repo.create_branch("feature/x", None).expect("create");
    assert_eq!(at, head);
    assert!(fixture
        .repo
        .list_branches(BranchKind::Local)
        .expect("list")
        .contains(&"feature/x".to_string()));

    fixture.repo.delete_branch("feature/x").expect("delete");
    assert_eq!(
        fixture.repo.delete_branch("feature/x").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn create_branch_from_source() {
    let fixture = TestRepo::new();
    let first = fixture.head_oid();
    fixture.repo.create_branch("base", None).expect("base");
    fixture.commit_file("two.txt", "2", "second");

    assert_eq!(
        fixture.repo.create_branch("from-base", Some("base")).expect("create"),
        first
    );
    assert_eq!(
        fixture
            .repo
            .create_branch("orphan", Some("missing"))
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        fixture.repo.create_branch("bad..name", None).unwrap_err().kind(),
        ErrorKind::InputValidation
    );
}

#[test]
fn create_branch_on_unborn_head() {
    let fixture = TestRepo::empty();
    assert_eq!(
        fixture.repo.create_branch("x", None).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn checkout_switches_working_tree() {
    let fixture = TestRepo::new();
    let main = fixture.branch();
    fixture.repo.create_branch("feature", None).expect("create");

    fixture.repo.checkout_branch("feature", "origin").expect("checkout");
    fixture.commit_file("feature.txt", "f", "feature work");
    assert_eq!(fixture.branch(), "feature");

    fixture.repo.checkout_branch(&main, "origin").expect("checkout back");
    assert_eq!(fixture.branch(), main);
    assert!(!fixture.work_dir().join("feature.txt").exists());
}

#[test]
fn checkout_creates_local_branch_from_remote() {
    let fx = SyncFixture::new();
    fx.upstream.repo.create_branch("release", None).expect("branch");
    fx.upstream
        .repo
        .checkout_branch("release", "origin")
        .expect("checkout");
    let tip = fx.upstream_commit("release.txt", "r\n");
    fx.local.repo.fetch(Some("origin")).expect("fetch");

    fx.local
        .repo
        .checkout_branch("release", "origin")
        .expect("checkout");

    assert_eq!(fx.local.branch(), "release");
    assert_eq!(fx.local.head_oid(), tip);
    assert_eq!(fx.local.read("release.txt"), "r\n");
    assert!(fx
        .local
        .repo
        .list_branches(BranchKind::Remote)
        .expect("remote branches")
        .contains(&"origin/release".to_string()));
}

#[test]
fn checkout_missing_branch() {
    let fixture = TestRepo::new();
    assert_eq!(
        fixture
            .repo
            .checkout_branch("nowhere", "origin")
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
}

// =============================================================================
// Index, Commits and Status
// =============================================================================

#[test]
fn status_labels_follow_changes() {
    let fixture = TestRepo::new();
    fixture.write("untracked.txt", "u");
    fixture.write("README.md", "# changed\n");
    fixture.write("staged.txt", "s");
    fixture.repo.add("staged.txt").expect("add");

    let status = fixture.repo.status().expect("status");
    let labels = |path: &str| {
        status
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.labels.clone())
            .unwrap_or_default()
    };

    assert_eq!(labels("untracked.txt"), vec![StatusLabel::WorkTreeNew]);
    assert_eq!(labels("README.md"), vec![StatusLabel::WorkTreeModified]);
    assert_eq!(labels("staged.txt"), vec![StatusLabel::IndexNew]);
}

#[test]
fn display_status_skips_ignored() {
    let fixture = TestRepo::new();
    fixture.commit_file(".gitignore", "*.log\n", "ignore logs");
    fixture.write("debug.log", "noise");
    fixture.write("notes.txt", "n");

    let text = fixture.repo.display_status().expect("display");

    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(format!("# On branch {}", fixture.branch()).as_str()));
    assert!(text.contains("notes.txt: New working tree"));
    assert!(!text.contains("debug.log"));

    assert!(fixture
        .repo
        .status()
        .expect("status")
        .iter()
        .any(|e| e.path == "debug.log" && e.is_ignored()));
}

#[test]
fn display_status_before_first_commit() {
    let fixture = TestRepo::empty();
    fixture.write("a.txt", "a");

    let text = fixture.repo.display_status().expect("display");

    assert!(text.starts_with("# On branch "));
    assert!(text.contains("a.txt: New working tree"));
}

#[test]
fn add_all_and_unstage() {
    let fixture = TestRepo::new();
    fixture.write("a.txt", "a");
    fixture.write("dir/b.txt", "b");

    fixture.repo.add_all(&[]).expect("add all");
    let staged: Vec<_> = fixture
        .repo
        .status()
        .expect("status")
        .into_iter()
        .filter(|e| e.labels == vec![StatusLabel::IndexNew])
        .map(|e| e.path)
        .collect();
    assert_eq!(staged, vec!["a.txt".to_string(), "dir/b.txt".to_string()]);

    fixture.repo.unstage("a.txt").expect("unstage");
    assert!(fixture.work_dir().join("a.txt").exists());
    assert_eq!(
        fixture.repo.unstage("never-staged.txt").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn commits_are_logged_oldest_first() {
    let fixture = TestRepo::empty();
    let first = fixture.commit_file("one.txt", "1", "first");
    let second = fixture.commit_file("two.txt", "2", "second");

    let log = fixture.repo.commit_log().expect("log");

    let oids: Vec<_> = log.iter().map(|e| e.oid.clone()).collect();
    assert_eq!(oids, vec![first, second]);
    assert_eq!(log[0].committer_email, "test@example.com");
    assert_eq!(log[1].message, "second");
}

#[test]
fn first_commit_has_no_parent_and_sets_branch() {
    let fixture = TestRepo::empty();
    fixture.commit_file("one.txt", "1", "first");

    let head = fixture.repo.head().expect("head").expect("born");
    assert!(!head.detached);
    assert_eq!(fixture.repo.commit_log().expect("log").len(), 1);
    assert_eq!(
        fixture.repo.current_branch().expect("branch").map(|b| b.to_string()),
        Some(head.shorthand)
    );
}

#[test]
fn empty_commit_message_rejected() {
    let fixture = TestRepo::new();
    assert_eq!(
        fixture.repo.create_commit("", &identity()).unwrap_err().kind(),
        ErrorKind::InputValidation
    );
}

// =============================================================================
// Remotes
// =============================================================================

#[test]
fn remote_management() {
    let fixture = TestRepo::new();
    fixture
        .repo
        .create_remote("origin", "git@example.com:owner/repo.git")
        .expect("create");

    assert_eq!(
        fixture.repo.remote_url("origin").expect("url"),
        "git@example.com:owner/repo.git"
    );
    assert_eq!(fixture.repo.remote_names().expect("names"), vec!["origin"]);
    assert_eq!(
        fixture
            .repo
            .create_remote("origin", "elsewhere")
            .unwrap_err()
            .kind(),
        ErrorKind::InputValidation
    );
    assert_eq!(
        fixture.repo.remote_url("upstream").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn clone_sets_up_origin() {
    let fx = SyncFixture::new();

    assert_eq!(fx.local.head_oid(), fx.upstream.head_oid());
    assert_eq!(fx.local.repo.remote_url("origin").expect("url"), fx.remote.url());
    assert_eq!(fx.local.read("README.md"), "# Test Repo\n");
}
