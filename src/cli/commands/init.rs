//! init and clone commands - Create repositories

use std::path::Path;

use anyhow::{Context as _, Result};

use super::build_resolver;
use crate::cli::Context;
use crate::repo::Repository;
use crate::ui::output;

fn absolute(ctx: &Context, path: &Path) -> std::path::PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        ctx.cwd.join(path)
    }
}

/// Initialize an empty repository.
pub fn init(ctx: &Context, path: &Path, description: Option<&str>) -> Result<()> {
    let path = absolute(ctx, path);
    let repo = Repository::create_repository(&path, description, build_resolver(ctx)?)
        .with_context(|| format!("failed to initialize repository at {}", path.display()))?;

    output::print(
        format!("Initialized empty repository in {}", repo.path().display()),
        ctx.verbosity(),
    );
    Ok(())
}

/// Clone a remote repository.
pub fn clone(ctx: &Context, url: &str, path: &Path) -> Result<()> {
    let path = absolute(ctx, path);
    let repo = Repository::clone(url, &path, build_resolver(ctx)?)
        .with_context(|| format!("failed to clone {}", url))?;

    let branch = repo
        .current_branch()?
        .map(|b| b.to_string())
        .unwrap_or_else(|| "(no branch)".to_string());
    output::print(
        format!("Cloned {} into {} on {}", url, path.display(), branch),
        ctx.verbosity(),
    );
    Ok(())
}
