//! secrets::traits
//!
//! Storage and passphrase-source traits.
//!
//! # Layers
//!
//! - [`SecretStore`] is plain key/value persistence (file, OS keychain).
//! - [`Keystore`] is what credential resolution talks to: it is scoped by a
//!   consumer namespace plus a key id, may prompt the user, and can forget a
//!   cached value that turned out to be wrong.
//!
//! # Security
//!
//! Implementations must never log, print, or include secret values in
//! error messages.

use thiserror::Error;

/// Errors from secret storage operations.
///
/// Messages never include secret values.
#[derive(Debug, Error)]
pub enum SecretError {
    /// Failed to read from secret storage.
    #[error("failed to read secret: {0}")]
    ReadError(String),

    /// Failed to write to secret storage.
    #[error("failed to write secret: {0}")]
    WriteError(String),

    /// Failed to delete from secret storage.
    #[error("failed to delete secret: {0}")]
    DeleteError(String),

    /// Failed to obtain a value from the user.
    #[error("failed to prompt for secret: {0}")]
    PromptError(String),

    /// Provider not available or not configured.
    #[error("secret provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// Key/value persistence for secrets.
///
/// Keys are stored as-is without interpretation. Implementations must be
/// thread-safe; the store may be shared by every repository in a process.
pub trait SecretStore: Send + Sync {
    /// `Ok(None)` when the key is absent; `Err` only for access failures.
    fn get(&self, key: &str) -> Result<Option<String>, SecretError>;

    /// Store a value, overwriting any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), SecretError>;

    /// Remove a value. Idempotent: deleting a missing key succeeds.
    fn delete(&self, key: &str) -> Result<(), SecretError>;

    /// Check if a secret exists.
    fn exists(&self, key: &str) -> Result<bool, SecretError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Passphrase source used by credential resolution.
///
/// Entries are addressed by `(namespace, key_id)`. The namespace identifies
/// the consumer (for SSH keys, the auth callback), the key id identifies
/// the secret (for SSH keys, the private key path).
pub trait Keystore {
    /// Fetch a password, prompting with `prompt` when it is not cached and
    /// `interactive` is set.
    ///
    /// Returns `Ok(None)` when no password is available (not cached and
    /// the prompt was declined, unavailable, or disabled).
    fn get_password(
        &self,
        namespace: &str,
        key_id: &str,
        interactive: bool,
        prompt: &str,
    ) -> Result<Option<String>, SecretError>;

    /// Forget any cached password for the entry.
    fn delete_password(&self, namespace: &str, key_id: &str) -> Result<(), SecretError>;
}

impl<K: Keystore + ?Sized> Keystore for &K {
    fn get_password(
        &self,
        namespace: &str,
        key_id: &str,
        interactive: bool,
        prompt: &str,
    ) -> Result<Option<String>, SecretError> {
        (**self).get_password(namespace, key_id, interactive, prompt)
    }

    fn delete_password(&self, namespace: &str, key_id: &str) -> Result<(), SecretError> {
        (**self).delete_password(namespace, key_id)
    }
}

impl<K: Keystore + ?Sized> Keystore for Box<K> {
    fn get_password(
        &self,
        namespace: &str,
        key_id: &str,
        interactive: bool,
        prompt: &str,
    ) -> Result<Option<String>, SecretError> {
        (**self).get_password(namespace, key_id, interactive, prompt)
    }

    fn delete_password(&self, namespace: &str, key_id: &str) -> Result<(), SecretError> {
        (**self).delete_password(namespace, key_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        assert!(SecretError::ReadError("disk".into())
            .to_string()
            .contains("read"));
        assert!(SecretError::WriteError("disk".into())
            .to_string()
            .contains("write"));
        assert!(SecretError::DeleteError("io".into())
            .to_string()
            .contains("delete"));
        assert!(SecretError::PromptError("no tty".into())
            .to_string()
            .contains("prompt"));
        assert!(SecretError::ProviderNotAvailable("keychain".into())
            .to_string()
            .contains("provider"));
    }
}
