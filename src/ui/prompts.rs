//! ui::prompts
//!
//! Interactive prompts.
//!
//! # Design
//!
//! Prompting sits behind the [`Prompter`] trait so the keystore can be
//! driven by a terminal in the CLI and by a scripted source in tests.
//! A prompter that cannot reach a user reports [`PromptError::NotInteractive`]
//! rather than blocking.

use std::io::IsTerminal;

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Source of masked user input.
pub trait Prompter: Send + Sync {
    /// Ask for a secret. The input must not be echoed.
    fn password(&self, message: &str) -> Result<String, PromptError>;
}

/// Reads from the controlling terminal with echo disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn password(&self, message: &str) -> Result<String, PromptError> {
        if !std::io::stdin().is_terminal() {
            return Err(PromptError::NotInteractive);
        }
        let prompt = if message.ends_with(char::is_whitespace) {
            message.to_string()
        } else {
            format!("{} ", message)
        };
        rpassword::prompt_password(prompt).map_err(|e| match e.kind() {
            std::io::ErrorKind::Interrupted | std::io::ErrorKind::UnexpectedEof => {
                PromptError::Cancelled
            }
            _ => PromptError::IoError(e.to_string()),
        })
    }
}

/// A prompter that never reaches a user.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompter;

impl Prompter for NoPrompter {
    fn password(&self, _message: &str) -> Result<String, PromptError> {
        Err(PromptError::NotInteractive)
    }
}
