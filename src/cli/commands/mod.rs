//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the repository (or creates one) through [`open_repo`]
//! 2. Calls one facade operation
//! 3. Formats and displays output
//!
//! Handlers never touch the Git engine directly.

mod branch;
mod checkout;
mod completion;
mod index;
mod init;
mod log_cmd;
mod remote;
mod status;
mod sync;

pub use branch::branch;
pub use checkout::checkout;
pub use completion::completion;
pub use index::{add, commit, unstage};
pub use init::{clone, init};
pub use log_cmd::log;
pub use remote::remote;
pub use status::status;
pub use sync::{fetch, merge, pull, push};

use anyhow::{Context as _, Result};

use crate::auth::CredentialResolver;
use crate::cli::args::Command;
use crate::cli::Context;
use crate::core::identity::{Identity, IdentityError};
use crate::core::paths;
use crate::repo::Repository;
use crate::secrets::{self, PromptingKeystore};
use crate::ui::prompts::{NoPrompter, Prompter, TerminalPrompter};

/// Repository type used by every command.
pub type CliRepository = Repository<PromptingKeystore>;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Init { path, description } => init(ctx, &path, description.as_deref()),
        Command::Clone { url, path } => clone(ctx, &url, &path),
        Command::Status { json } => status(ctx, json),
        Command::Branch { action } => branch(ctx, action),
        Command::Checkout { name, remote } => checkout(ctx, &name, remote.as_deref()),
        Command::Add { paths, all } => add(ctx, &paths, all),
        Command::Unstage { path } => unstage(ctx, &path),
        Command::Commit { message } => commit(ctx, &message),
        Command::Log => log(ctx),
        Command::Remote { action } => remote(ctx, action),
        Command::Fetch { remote } => fetch(ctx, remote.as_deref()),
        Command::Pull { remote, commit } => pull(ctx, remote.as_deref(), commit),
        Command::Push { remote } => push(ctx, remote.as_deref()),
        Command::Merge { oid } => merge(ctx, &oid),
        Command::Completion { shell } => completion(shell),
    }
}

/// Credential resolver configured from `[ssh]` and `[secrets]`.
pub fn build_resolver(ctx: &Context) -> Result<CredentialResolver<PromptingKeystore>> {
    let store = secrets::create_store(ctx.config.secrets_provider())
        .context("failed to open secret store")?;
    let prompter: Box<dyn Prompter> = if ctx.interactive {
        Box::new(TerminalPrompter)
    } else {
        Box::new(NoPrompter)
    };

    let mut resolver = CredentialResolver::new(PromptingKeystore::new(store, prompter))
        .ssh_config_path(ctx.config.ssh_config_path())
        .default_identity(ctx.config.default_identity_file())
        .max_attempts(ctx.config.passphrase_attempts())
        .interactive(ctx.interactive);
    if let Some(home) = paths::home_dir() {
        resolver = resolver.home(home);
    }
    Ok(resolver)
}

/// Open the repository containing the working directory.
pub fn open_repo(ctx: &Context) -> Result<CliRepository> {
    let resolver = build_resolver(ctx)?;
    Repository::open(&ctx.cwd, resolver)
        .with_context(|| format!("failed to open repository at {}", ctx.cwd.display()))
}

/// Identity for new commits: `[identity]` config, then git config.
pub fn resolve_identity(ctx: &Context, repo: &CliRepository) -> Result<Identity> {
    ctx.config
        .identity()
        .or_else(|| repo.configured_identity())
        .ok_or_else(|| IdentityError::Unconfigured.into())
}

/// Remote argument, falling back to `pull.remote`.
fn remote_or_default<'a>(ctx: &'a Context, remote: Option<&'a str>) -> &'a str {
    remote.unwrap_or_else(|| ctx.config.remote())
}
