//! status command - Show working tree status

use anyhow::Result;

use super::open_repo;
use crate::cli::Context;

/// Show working tree status.
///
/// Text output omits ignored files; `--json` includes every entry.
pub fn status(ctx: &Context, json: bool) -> Result<()> {
    let repo = open_repo(ctx)?;

    if json {
        let entries = repo.status()?;
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{}", repo.display_status()?);
    }
    Ok(())
}
