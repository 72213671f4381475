//! fetch, pull, push and merge commands - Synchronize with remotes

use anyhow::{Context as _, Result};

use super::{open_repo, remote_or_default, resolve_identity};
use crate::cli::Context;
use crate::sync::PullOutcome;
use crate::ui::output;

/// Fetch one remote, or all of them.
pub fn fetch(ctx: &Context, remote: Option<&str>) -> Result<()> {
    let repo = open_repo(ctx)?;

    let fetched = repo.fetch(remote).context("fetch failed")?;
    if fetched.is_empty() {
        output::warn("no remotes configured", ctx.verbosity());
    }
    for name in fetched {
        output::print(format!("Fetched {}", name), ctx.verbosity());
    }
    Ok(())
}

/// Fetch and integrate the current branch's remote counterpart.
pub fn pull(ctx: &Context, remote: Option<&str>, commit: bool) -> Result<()> {
    let repo = open_repo(ctx)?;
    let remote = remote_or_default(ctx, remote);

    let identity = if commit || ctx.config.merge_commit() {
        Some(resolve_identity(ctx, &repo)?)
    } else {
        None
    };

    let outcome = repo
        .pull(remote, identity.as_ref())
        .with_context(|| format!("pull from '{}' failed", remote))?;

    let message = match outcome {
        PullOutcome::UpToDate => "Already up to date.".to_string(),
        PullOutcome::FastForwarded { to } => format!("Fast-forwarded to {}", to.short(7)),
        PullOutcome::Merged { commit: Some(oid) } => format!("Merged; created {}", oid.short(7)),
        PullOutcome::Merged { commit: None } => {
            "Merged into the working tree; review and commit".to_string()
        }
    };
    output::print(message, ctx.verbosity());
    Ok(())
}

/// Push the current branch.
pub fn push(ctx: &Context, remote: Option<&str>) -> Result<()> {
    let repo = open_repo(ctx)?;
    let remote = remote_or_default(ctx, remote);

    repo.push(remote)
        .with_context(|| format!("push to '{}' failed", remote))?;
    output::print(format!("Pushed to {}", remote), ctx.verbosity());
    Ok(())
}

/// Merge a commit into HEAD, leaving the result uncommitted.
pub fn merge(ctx: &Context, oid: &str) -> Result<()> {
    let repo = open_repo(ctx)?;

    repo.merge(oid)
        .with_context(|| format!("merge of {} failed", oid))?;
    output::print("Merged into the working tree; review and commit", ctx.verbosity());
    Ok(())
}
