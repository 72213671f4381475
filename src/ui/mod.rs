//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Masked passphrase prompts
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All terminal output and prompts go through this module so interactive
//! and non-interactive runs behave consistently.

pub mod output;
pub mod prompts;
