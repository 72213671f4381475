//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Plain-text rendering for the CLI. Messages respect the quiet flag;
//! errors are always shown.

use std::fmt::Display;

use crate::git::{CommitLogEntry, StatusEntry};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Render a status report.
///
/// ```text
/// # On branch main
/// src/lib.rs: Index modified | Working tree modified
/// notes.txt: New working tree
/// ```
///
/// Ignored entries are skipped.
pub fn format_status(branch: &str, entries: &[StatusEntry]) -> String {
    let mut out = format!("# On branch {}", branch);
    for entry in entries.iter().filter(|e| !e.is_ignored()) {
        let labels: Vec<&str> = entry.labels.iter().map(|l| l.as_str()).collect();
        out.push('\n');
        out.push_str(&format!("{}: {}", entry.path, labels.join(" | ")));
    }
    out
}

/// Render one commit log entry.
pub fn format_commit(entry: &CommitLogEntry) -> String {
    format!(
        "commit {}\nAuthor: {} <{}>\nDate:   {}\n\n    {}",
        entry.oid,
        entry.committer_name,
        entry.committer_email,
        entry.time.format("%Y-%m-%d %H:%M:%S %z"),
        entry.message.trim_end().replace('\n', "\n    ")
    )
}
