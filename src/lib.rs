//! repokit - repository control with SSH-authenticated synchronization
//!
//! repokit drives a Git working tree without shelling out: branches,
//! staging, commits, status and history, plus fetch, pull and push over
//! SSH with passphrase-protected keys.
//!
//! # Architecture
//!
//! The codebase is layered, leaf modules first:
//!
//! - [`core`] - Strong types, identity, paths and configuration
//! - [`secrets`] - Secret storage and the passphrase [`Keystore`](secrets::Keystore)
//! - [`auth`] - SSH credential resolution with a bounded passphrase loop
//! - [`git`] - Single interface for all Git operations, and transport hooks
//! - [`sync`] - Fetch, pull, merge and push state machine
//! - [`repo`] - The [`Repository`](repo::Repository) facade
//! - [`ui`] - Prompts and output formatting
//! - [`cli`] - Command-line interface for the `rk` binary
//!
//! # Correctness Invariants
//!
//! 1. Fetch never moves local branches
//! 2. A pull either leaves the branch unchanged, fast-forwards it, or
//!    merges; a conflicting merge is left for the caller and never committed
//! 3. Passphrase retries are bounded, and each rejected passphrase is
//!    evicted from the cache
//! 4. Secrets never appear in logs, errors or `Debug` output

pub mod auth;
pub mod cli;
pub mod core;
pub mod git;
pub mod repo;
pub mod secrets;
pub mod sync;
pub mod ui;
