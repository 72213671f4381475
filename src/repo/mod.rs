//! repo
//!
//! The repository facade: the everyday surface over [`git`](crate::git)
//! and [`sync`](crate::sync).
//!
//! # Operations
//!
//! - Lifecycle: open, init, clone, delete, discover
//! - Branches: list, create, delete, checkout (creating from a remote
//!   branch when needed)
//! - Index and commits: add, add-all, unstage, commit
//! - Status, display status and commit log
//! - Remotes, fetch, pull, merge and push
//!
//! Path arguments are validated here; empty paths, messages and URLs are
//! input errors before anything touches the Git engine.

mod errors;
mod repository;

pub use errors::RepoError;
pub use repository::{delete_repository, find_git_repo, is_repository, Repository};
