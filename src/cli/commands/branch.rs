//! branch command - List, create and delete branches

use anyhow::{Context as _, Result};

use super::open_repo;
use crate::cli::args::BranchAction;
use crate::cli::Context;
use crate::git::BranchKind;
use crate::ui::output;

pub fn branch(ctx: &Context, action: BranchAction) -> Result<()> {
    let repo = open_repo(ctx)?;

    match action {
        BranchAction::List { remote, all } => {
            let kind = if all {
                BranchKind::All
            } else if remote {
                BranchKind::Remote
            } else {
                BranchKind::Local
            };
            let current = repo.current_branch()?.map(|b| b.to_string());
            for name in repo.list_branches(kind)? {
                let marker = if current.as_deref() == Some(name.as_str()) {
                    "* "
                } else {
                    "  "
                };
                println!("{}{}", marker, name);
            }
        }
        BranchAction::Create { name, from } => {
            let at = repo
                .create_branch(&name, from.as_deref())
                .with_context(|| format!("failed to create branch '{}'", name))?;
            output::print(
                format!("Created branch '{}' at {}", name, at.short(7)),
                ctx.verbosity(),
            );
        }
        BranchAction::Delete { name } => {
            repo.delete_branch(&name)
                .with_context(|| format!("failed to delete branch '{}'", name))?;
            output::print(format!("Deleted branch '{}'", name), ctx.verbosity());
        }
    }
    Ok(())
}
