//! cli
//!
//! Command-line interface layer for repokit.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and build the credential resolver
//! - Delegate to the [`Repository`](crate::repo::Repository) facade
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and calls the
//! facade; errors are converted to `anyhow` here and nowhere else.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::ui::output::Verbosity;

/// Settings shared by every command handler.
#[derive(Debug)]
pub struct Context {
    /// Directory commands operate in.
    pub cwd: PathBuf,
    pub debug: bool,
    pub quiet: bool,
    /// Passphrase prompts allowed.
    pub interactive: bool,
    pub config: Config,
}

impl Context {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs` after logging is
/// installed.
pub fn run(cli: Cli) -> Result<()> {
    let cwd = match &cli.cwd {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let config = Config::load().context("failed to load configuration")?;

    let ctx = Context {
        cwd,
        debug: cli.debug,
        quiet: cli.quiet,
        interactive: cli.interactive(),
        config,
    };

    commands::dispatch(cli.command, &ctx)
}
