//! remote command - Manage remotes

use anyhow::{Context as _, Result};

use super::open_repo;
use crate::cli::args::RemoteAction;
use crate::cli::Context;

pub fn remote(ctx: &Context, action: RemoteAction) -> Result<()> {
    let repo = open_repo(ctx)?;

    match action {
        RemoteAction::Add { name, url } => {
            repo.create_remote(&name, &url)
                .with_context(|| format!("failed to add remote '{}'", name))?;
        }
        RemoteAction::Url { name } => {
            println!("{}", repo.remote_url(&name)?);
        }
    }
    Ok(())
}
