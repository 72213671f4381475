//! log command - Show commit history

use anyhow::Result;

use super::open_repo;
use crate::cli::Context;
use crate::ui::output;

/// Show commits reachable from HEAD, oldest first.
pub fn log(ctx: &Context) -> Result<()> {
    let repo = open_repo(ctx)?;

    let entries = repo.commit_log()?;
    let rendered: Vec<String> = entries.iter().map(output::format_commit).collect();
    if !rendered.is_empty() {
        println!("{}", rendered.join("\n\n"));
    }
    Ok(())
}
