//! checkout command - Switch branches

use anyhow::{Context as _, Result};

use super::{open_repo, remote_or_default};
use crate::cli::Context;
use crate::ui::output;

/// Switch to `name`, creating it from `<remote>/<name>` when it is not a
/// local branch.
pub fn checkout(ctx: &Context, name: &str, remote: Option<&str>) -> Result<()> {
    let repo = open_repo(ctx)?;
    let remote = remote_or_default(ctx, remote);

    repo.checkout_branch(name, remote)
        .with_context(|| format!("failed to check out '{}'", name))?;

    output::print(format!("Switched to branch '{}'", name), ctx.verbosity());
    Ok(())
}
