//! sync
//!
//! Synchronization with remotes: fetch, pull, merge and push.
//!
//! # Pull
//!
//! ```text
//! Fetch -> Analyze -> { up-to-date | fast-forward | merge | error }
//! ```
//!
//! Analysis results are checked in a fixed order: up-to-date,
//! fast-forward, normal, unborn, unknown. Nothing is rolled back on
//! failure; a conflicting merge leaves the repository mid-merge for the
//! caller to resolve.
//!
//! # Invariants
//!
//! - Fetch writes only remote-tracking refs
//! - Fast-forward never creates a commit
//! - A conflicting merge never creates a commit

mod engine;

pub use engine::{PullOutcome, SyncEngine, SyncError, MERGE_MESSAGE_PREFIX};
