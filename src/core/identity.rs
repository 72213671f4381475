//! core::identity
//!
//! Developer identity used to stamp commits.
//!
//! The identity is always handed to commit creation explicitly. Nothing in
//! the library reads it from process-wide state; the CLI resolves it once
//! from configuration (or git config) and passes it down.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from identity construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("identity name cannot be empty")]
    EmptyName,

    #[error("identity email cannot be empty")]
    EmptyEmail,

    #[error("no identity configured: set [identity] in config or user.name/user.email in git config")]
    Unconfigured,
}

/// Name and email of the developer creating commits.
///
/// # Example
///
/// ```
/// use repokit::core::identity::Identity;
///
/// let dev = Identity::new("Ada Lovelace", "ada@example.com").unwrap();
/// assert_eq!(dev.to_string(), "Ada Lovelace <ada@example.com>");
/// assert!(Identity::new("", "ada@example.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    name: String,
    email: String,
}

impl Identity {
    /// Create an identity, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if either field is empty after trimming.
    pub fn new(name: impl AsRef<str>, email: impl AsRef<str>) -> Result<Self, IdentityError> {
        let name = name.as_ref().trim();
        let email = email.as_ref().trim();
        if name.is_empty() {
            return Err(IdentityError::EmptyName);
        }
        if email.is_empty() {
            return Err(IdentityError::EmptyEmail);
        }
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
