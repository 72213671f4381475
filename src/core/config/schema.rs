//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! [identity]
//! name = "Ada Lovelace"
//! email = "ada@example.com"
//!
//! [ssh]
//! config_path = "~/.ssh/config"
//! default_identity = "~/.ssh/id_ed25519"
//! passphrase_attempts = 5
//!
//! [secrets]
//! provider = "file"
//!
//! [pull]
//! remote = "origin"
//! merge_commit = true
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing; unknown keys are rejected at parse
//! time so typos surface immediately.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::identity::Identity;

/// Global configuration (user scope).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Developer identity stamped on commits
    pub identity: Option<IdentityConfig>,

    /// Credential resolution settings
    pub ssh: Option<SshSettings>,

    /// Secret storage settings
    pub secrets: Option<SecretsConfig>,

    /// Pull defaults
    pub pull: Option<PullDefaults>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(identity) = &self.identity {
            identity.validate()?;
        }
        if let Some(ssh) = &self.ssh {
            ssh.validate()?;
        }
        if let Some(secrets) = &self.secrets {
            secrets.validate()?;
        }
        if let Some(pull) = &self.pull {
            pull.validate()?;
        }
        Ok(())
    }
}

/// `[identity]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl IdentityConfig {
    /// Both fields, if both are present and non-empty.
    pub fn to_identity(&self) -> Option<Identity> {
        match (&self.name, &self.email) {
            (Some(name), Some(email)) => Identity::new(name, email).ok(),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_some() != self.email.is_some() {
            return Err(ConfigError::InvalidValue(
                "identity requires both name and email".to_string(),
            ));
        }
        if let (Some(name), Some(email)) = (&self.name, &self.email) {
            Identity::new(name, email)
                .map_err(|e| ConfigError::InvalidValue(format!("invalid identity: {}", e)))?;
        }
        Ok(())
    }
}

/// `[ssh]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SshSettings {
    /// Host SSH configuration file (default: `~/.ssh/config`)
    pub config_path: Option<String>,

    /// Private key used when the host profile names none (default: `~/.ssh/id_rsa`)
    pub default_identity: Option<String>,

    /// Passphrase attempts before giving up (default: 5)
    pub passphrase_attempts: Option<u32>,
}

impl SshSettings {
    /// Bounds for `passphrase_attempts`.
    pub const ATTEMPTS_RANGE: std::ops::RangeInclusive<u32> = 1..=20;

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(attempts) = self.passphrase_attempts {
            if !Self::ATTEMPTS_RANGE.contains(&attempts) {
                return Err(ConfigError::InvalidValue(format!(
                    "passphrase_attempts must be between {} and {}, got {}",
                    Self::ATTEMPTS_RANGE.start(),
                    Self::ATTEMPTS_RANGE.end(),
                    attempts
                )));
            }
        }
        for (field, value) in [
            ("config_path", &self.config_path),
            ("default_identity", &self.default_identity),
        ] {
            if value.as_deref() == Some("") {
                return Err(ConfigError::InvalidValue(format!(
                    "ssh.{} cannot be empty",
                    field
                )));
            }
        }
        Ok(())
    }
}

/// `[secrets]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SecretsConfig {
    /// Provider to use ("file" or "keychain")
    pub provider: Option<String>,
}

impl SecretsConfig {
    /// Valid secret providers.
    pub const VALID_PROVIDERS: &'static [&'static str] = &["file", "keychain"];

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(provider) = &self.provider {
            if !Self::VALID_PROVIDERS.contains(&provider.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid secrets provider '{}', must be one of: {}",
                    provider,
                    Self::VALID_PROVIDERS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// `[pull]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PullDefaults {
    /// Remote to pull from and push to (default: "origin")
    pub remote: Option<String>,

    /// Create a merge commit after a clean three-way merge (default: false)
    pub merge_commit: Option<bool>,
}

impl PullDefaults {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.remote.as_deref() == Some("") {
            return Err(ConfigError::InvalidValue(
                "remote cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
