//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! The global config is searched in order:
//! 1. `$REPOKIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/repokit/config.toml`
//! 3. `~/.repokit/config.toml` (canonical write location)
//!
//! Missing files are not an error; defaults apply.
//!
//! # Example
//!
//! ```no_run
//! use repokit::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("Remote: {}", config.remote());
//! println!("Passphrase attempts: {}", config.passphrase_attempts());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, IdentityConfig, PullDefaults, SecretsConfig, SshSettings};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::identity::Identity;
use crate::core::paths;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "REPOKIT_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed global configuration
    pub global: GlobalConfig,
    /// Path the configuration was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Default number of passphrase attempts.
    pub const DEFAULT_PASSPHRASE_ATTEMPTS: u32 = 5;

    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let global: GlobalConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        global.validate()?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Self {
            global,
            path: Some(path.to_path_buf()),
        })
    }

    /// Find the first existing config file.
    fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("repokit/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        paths::data_dir()
            .map(|dir| dir.join("config.toml"))
            .filter(|path| path.exists())
    }

    /// Canonical path for the global config (`~/.repokit/config.toml`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoHomeDir` if the home directory is unknown.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        paths::data_dir()
            .map(|dir| dir.join("config.toml"))
            .ok_or(ConfigError::NoHomeDir)
    }

    /// Path the configuration was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write a config file atomically (temp file, then rename).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem step fails.
    pub fn write(path: &Path, config: &GlobalConfig) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(contents.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    // =========================================================================
    // Accessors with defaults
    // =========================================================================

    /// Configured identity, if complete.
    pub fn identity(&self) -> Option<Identity> {
        self.global
            .identity
            .as_ref()
            .and_then(IdentityConfig::to_identity)
    }

    /// Host SSH configuration path (unexpanded). Defaults to `~/.ssh/config`.
    pub fn ssh_config_path(&self) -> &str {
        self.global
            .ssh
            .as_ref()
            .and_then(|s| s.config_path.as_deref())
            .unwrap_or(paths::SSH_CONFIG)
    }

    /// Fallback private key (unexpanded). Defaults to `~/.ssh/id_rsa`.
    pub fn default_identity_file(&self) -> &str {
        self.global
            .ssh
            .as_ref()
            .and_then(|s| s.default_identity.as_deref())
            .unwrap_or(paths::DEFAULT_IDENTITY)
    }

    /// Passphrase attempts. Defaults to 5.
    pub fn passphrase_attempts(&self) -> u32 {
        self.global
            .ssh
            .as_ref()
            .and_then(|s| s.passphrase_attempts)
            .unwrap_or(Self::DEFAULT_PASSPHRASE_ATTEMPTS)
    }

    /// Secrets provider. Defaults to "file".
    pub fn secrets_provider(&self) -> &str {
        self.global
            .secrets
            .as_ref()
            .and_then(|s| s.provider.as_deref())
            .unwrap_or(crate::secrets::DEFAULT_PROVIDER)
    }

    /// Remote name. Defaults to "origin".
    pub fn remote(&self) -> &str {
        self.global
            .pull
            .as_ref()
            .and_then(|p| p.remote.as_deref())
            .unwrap_or("origin")
    }

    /// Whether pull creates a merge commit. Defaults to `false`.
    pub fn merge_commit(&self) -> bool {
        self.global
            .pull
            .as_ref()
            .and_then(|p| p.merge_commit)
            .unwrap_or(false)
    }
}
