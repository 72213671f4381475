//! add, unstage and commit commands - Stage and record changes

use anyhow::{bail, Context as _, Result};

use super::{open_repo, resolve_identity};
use crate::cli::Context;
use crate::ui::output;

/// Stage paths, or everything with `--all`.
pub fn add(ctx: &Context, paths: &[String], all: bool) -> Result<()> {
    let repo = open_repo(ctx)?;

    if all {
        repo.add_all(paths)?;
    } else {
        if paths.is_empty() {
            bail!("nothing specified to add; pass paths or --all");
        }
        for path in paths {
            repo.add(path)
                .with_context(|| format!("failed to stage '{}'", path))?;
        }
    }
    Ok(())
}

pub fn unstage(ctx: &Context, path: &str) -> Result<()> {
    let repo = open_repo(ctx)?;
    repo.unstage(path)
        .with_context(|| format!("failed to unstage '{}'", path))?;
    Ok(())
}

/// Commit the index with the resolved identity.
pub fn commit(ctx: &Context, message: &str) -> Result<()> {
    let repo = open_repo(ctx)?;
    let identity = resolve_identity(ctx, &repo)?;

    let oid = repo.create_commit(message, &identity)?;
    let branch = repo
        .current_branch()?
        .map(|b| b.to_string())
        .unwrap_or_else(|| "HEAD".to_string());

    let subject = message.lines().next().unwrap_or_default();
    output::print(
        format!("[{} {}] {}", branch, oid.short(7), subject),
        ctx.verbosity(),
    );
    Ok(())
}
