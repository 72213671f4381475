//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--no-interactive`: Never prompt for passphrases
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// repokit - repository control with SSH-authenticated sync
#[derive(Parser, Debug)]
#[command(name = "rk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if rk was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Never prompt; passphrases must already be cached
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Whether passphrase prompts are allowed.
    ///
    /// False with `--no-interactive` or `--quiet`, or when stdin is not a
    /// terminal.
    pub fn interactive(&self) -> bool {
        !(self.no_interactive || self.quiet) && std::io::stdin().is_terminal()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty repository
    #[command(
        name = "init",
        after_help = "\
WORKFLOW EXAMPLES:
    # New repository in ./project
    rk init project

    # With a description (written to .git/description)
    rk init --description \"scratch space\" project"
    )]
    Init {
        /// Directory to initialize (created if missing)
        path: PathBuf,

        /// Repository description
        #[arg(long)]
        description: Option<String>,
    },

    /// Clone a remote repository
    #[command(
        name = "clone",
        long_about = "Clone a remote repository.\n\n\
            SSH remotes authenticate with the identity file configured for the host \
            in ~/.ssh/config (falling back to ~/.ssh/id_rsa). Encrypted keys are \
            unlocked with a cached passphrase or an interactive prompt."
    )]
    Clone {
        /// Remote URL (ssh://, scp-like user@host:path, or a local path)
        url: String,

        /// Destination directory
        path: PathBuf,
    },

    /// Show working tree status
    Status {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List, create or delete branches
    Branch {
        #[command(subcommand)]
        action: BranchAction,
    },

    /// Switch to a branch
    #[command(
        name = "checkout",
        after_help = "\
WORKFLOW EXAMPLES:
    # Switch to an existing local branch
    rk checkout feature

    # Branch exists only on the remote: creates it locally first
    rk fetch && rk checkout release-2.0"
    )]
    Checkout {
        /// Branch name
        name: String,

        /// Remote to create the branch from when it is not local
        #[arg(long)]
        remote: Option<String>,
    },

    /// Stage changes
    Add {
        /// Paths to stage
        paths: Vec<String>,

        /// Stage everything (or everything matching PATHS as pathspecs)
        #[arg(long, short = 'A')]
        all: bool,
    },

    /// Remove a path from the index
    Unstage {
        /// Path to unstage
        path: String,
    },

    /// Record staged changes
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Show commit history, oldest first
    Log,

    /// Manage remotes
    Remote {
        #[command(subcommand)]
        action: RemoteAction,
    },

    /// Download objects and refs from a remote
    Fetch {
        /// Remote to fetch (default: every remote)
        remote: Option<String>,
    },

    /// Fetch and integrate the current branch's remote counterpart
    #[command(
        name = "pull",
        long_about = "Fetch a remote and integrate <remote>/<branch> into the current branch.\n\n\
            Already contained: nothing happens. Behind: the branch is fast-forwarded. \
            Diverged: a three-way merge is performed; with --commit (or pull.merge_commit \
            in config) a merge commit is recorded. Conflicts are left in the working \
            tree for you to resolve.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Pull from the configured default remote
    rk pull

    # Pull from upstream and commit a clean merge
    rk pull upstream --commit"
    )]
    Pull {
        /// Remote to pull from (default: pull.remote or \"origin\")
        remote: Option<String>,

        /// Record a merge commit after a clean three-way merge
        #[arg(long)]
        commit: bool,
    },

    /// Push the current branch
    Push {
        /// Remote to push to (default: pull.remote or \"origin\")
        remote: Option<String>,
    },

    /// Merge a commit into HEAD without committing
    Merge {
        /// Full object id of the commit to merge
        oid: String,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
INSTALLATION:
    # Bash
    rk completion bash > ~/.local/share/bash-completion/completions/rk

    # Zsh
    rk completion zsh > ~/.zfunc/_rk

    # Fish
    rk completion fish > ~/.config/fish/completions/rk.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// `rk branch` actions.
#[derive(Subcommand, Debug)]
pub enum BranchAction {
    /// List branches (local by default)
    List {
        /// Remote-tracking branches only
        #[arg(long, conflicts_with = "all")]
        remote: bool,

        /// Local and remote-tracking branches
        #[arg(long)]
        all: bool,
    },

    /// Create a branch
    Create {
        /// New branch name
        name: String,

        /// Source branch (default: HEAD)
        #[arg(long)]
        from: Option<String>,
    },

    /// Delete a local branch
    Delete {
        /// Branch name
        name: String,
    },
}

/// `rk remote` actions.
#[derive(Subcommand, Debug)]
pub enum RemoteAction {
    /// Add a remote
    Add {
        /// Remote name
        name: String,

        /// Remote URL
        url: String,
    },

    /// Print a remote's URL
    Url {
        /// Remote name
        name: String,
    },
}

/// Supported shells for completion.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
