//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to the Git engine. All repository
//! reads and writes flow through [`Git`]. No other module imports `git2`.
//!
//! # Responsibilities
//!
//! - Repository discovery, init, clone and opening
//! - Ref, branch and HEAD operations
//! - Index staging and commit creation
//! - Status and history queries
//! - Remotes, fetch and push through [`transport`] hooks
//! - Merge analysis, fast-forward and three-way merge
//!
//! # Invariants
//!
//! - All operations return strong types (Oid, BranchName, RefName)
//! - Engine failures raised inside transport callbacks surface as typed
//!   [`TransportError`]s, never as opaque engine strings
//!
//! # Example
//!
//! ```ignore
//! use repokit::git::{BranchKind, Git};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! for branch in git.list_branches(BranchKind::Local)? {
//!     println!("{branch}");
//! }
//! ```

mod analysis;
mod interface;
mod status;
pub mod transport;

pub use analysis::MergeAnalysis;
pub use interface::{
    BranchKind, CommitLogEntry, Git, GitError, GitState, HeadInfo, RemoteInfo,
};
pub use status::{StatusEntry, StatusFlags, StatusLabel};
pub use transport::{AuthCallbacks, TransportError, TransportHooks};
