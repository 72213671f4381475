//! auth - SSH credential resolution
//!
//! Produces keypair credentials for remote operations.
//!
//! # Architecture
//!
//! - [`url`] - hostname extraction from remote URLs
//! - [`ssh_config`] - read-only host configuration lookup
//! - [`keyfile`] - private key encryption detection and passphrase checks
//! - [`CredentialResolver`] - ties the above to a [`Keystore`](crate::secrets::Keystore)
//!
//! # Security
//!
//! Passphrases never appear in logs, error messages or `Debug` output.
//! Host identity is not verified at this layer; see
//! [`git::transport`](crate::git::transport).
//!
//! # Example
//!
//! ```ignore
//! use repokit::auth::CredentialResolver;
//! use repokit::secrets::{create_store, PromptingKeystore};
//! use repokit::ui::prompts::TerminalPrompter;
//!
//! let keystore = PromptingKeystore::new(create_store("file")?, Box::new(TerminalPrompter));
//! let resolver = CredentialResolver::new(keystore);
//! let cred = resolver.resolve("git@github.com:owner/repo.git", "git")?;
//! ```

mod errors;
pub mod keyfile;
mod resolver;
pub mod ssh_config;
pub mod url;

pub use errors::AuthError;
pub use resolver::{
    public_key_path, CredentialResolver, KeypairCredential, DEFAULT_MAX_ATTEMPTS,
    KEYSTORE_NAMESPACE, PUBLIC_KEY_SUFFIX,
};
