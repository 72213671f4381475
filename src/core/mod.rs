//! core
//!
//! Core domain types and configuration for repokit.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, Oid, RefName, ErrorKind
//! - [`identity`] - Developer identity stamped on commits
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Well-known locations and home expansion
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at construction time
//! - Schemas are strict and self-describing
//! - Nothing here touches the git engine

pub mod config;
pub mod identity;
pub mod paths;
pub mod types;

pub use types::ErrorKind;
