//! secrets
//!
//! Secret storage and passphrase retrieval.
//!
//! # Architecture
//!
//! Two layers:
//!
//! - [`SecretStore`] persists values: [`FileSecretStore`] in
//!   `~/.repokit/secrets.toml` (default) or [`KeychainSecretStore`] in the
//!   OS keychain (feature-gated).
//! - [`Keystore`] is the passphrase source handed to credential resolution.
//!   [`PromptingKeystore`] layers a [`Prompter`](crate::ui::prompts::Prompter)
//!   over a store, so a passphrase typed once is reused until it is found
//!   to be wrong and evicted.
//!
//! # Security
//!
//! - Secrets are never logged or included in error messages
//! - The file store uses 0600 permissions on Unix
//! - All file writes are atomic (temp file + rename)
//!
//! # Example
//!
//! ```ignore
//! use repokit::secrets::{create_store, Keystore, PromptingKeystore};
//! use repokit::ui::prompts::TerminalPrompter;
//!
//! let store = create_store("file")?;
//! let keystore = PromptingKeystore::new(store, Box::new(TerminalPrompter));
//! let pass = keystore.get_password("ns", "/home/me/.ssh/id_rsa", true, "passphrase:")?;
//! ```

mod file_store;
mod keychain_store;
mod keystore;
mod traits;

pub use file_store::FileSecretStore;
pub use keychain_store::KeychainSecretStore;
pub use keystore::PromptingKeystore;
pub use traits::{Keystore, SecretError, SecretStore};

/// Create a secret store based on the provider name.
///
/// # Providers
///
/// - `"file"` (default): [`FileSecretStore`] storing in `~/.repokit/secrets.toml`
/// - `"keychain"`: [`KeychainSecretStore`] using the OS keychain (requires feature)
///
/// # Errors
///
/// - Unknown provider name
/// - Keychain provider without the `keychain` feature enabled
/// - Initialization errors from the store
pub fn create_store(provider: &str) -> Result<Box<dyn SecretStore>, SecretError> {
    match provider {
        "file" => Ok(Box::new(FileSecretStore::new()?)),
        "keychain" => Ok(Box::new(KeychainSecretStore::new()?)),
        other => Err(SecretError::ProviderNotAvailable(format!(
            "unknown secret provider: '{}' (valid: file, keychain)",
            other
        ))),
    }
}

/// The default secret store provider name.
pub const DEFAULT_PROVIDER: &str = "file";
