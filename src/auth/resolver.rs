//! auth::resolver
//!
//! Turns a remote URL into an SSH keypair credential.
//!
//! # Flow
//!
//! 1. Extract the hostname from the URL (scp-like URLs get `ssh://`).
//! 2. Look the host up in the SSH configuration; a missing file is an
//!    empty profile.
//! 3. Take the first configured identity file, or the default identity.
//! 4. If the key is encrypted, ask the keystore for a passphrase and check
//!    it against the key, evicting and asking again on failure, up to
//!    `max_attempts` times.
//! 5. Pair the private key with `<private key>.pub`.
//!
//! The hostname is validated before anything touches the file system.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::errors::AuthError;
use super::keyfile::KeyFile;
use super::ssh_config::SshConfig;
use super::url;
use crate::core::paths;
use crate::secrets::Keystore;

/// Keystore namespace for SSH key passphrases.
pub const KEYSTORE_NAMESPACE: &str = "repokit.auth.AuthCallback";

/// Passphrase attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Appended to the private key path to find the public key.
pub const PUBLIC_KEY_SUFFIX: &str = ".pub";

/// A resolved SSH keypair credential.
///
/// Built fresh for every authentication challenge.
#[derive(Clone, PartialEq, Eq)]
pub struct KeypairCredential {
    pub username: String,
    pub public_key: PathBuf,
    pub private_key: PathBuf,
    /// `None` for unencrypted keys
    pub passphrase: Option<String>,
}

impl std::fmt::Debug for KeypairCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeypairCredential")
            .field("username", &self.username)
            .field("public_key", &self.public_key)
            .field("private_key", &self.private_key)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// `<private_key>.pub`.
pub fn public_key_path(private_key: &Path) -> PathBuf {
    let mut path = private_key.as_os_str().to_os_string();
    path.push(PUBLIC_KEY_SUFFIX);
    PathBuf::from(path)
}

/// Resolves SSH credentials for remote URLs.
///
/// # Example
///
/// ```ignore
/// use repokit::auth::CredentialResolver;
///
/// let resolver = CredentialResolver::new(keystore).max_attempts(3);
/// let cred = resolver.resolve("git@github.com:owner/repo.git", "git")?;
/// ```
#[derive(Debug)]
pub struct CredentialResolver<K> {
    keystore: K,
    ssh_config: String,
    default_identity: String,
    home: Option<PathBuf>,
    max_attempts: u32,
    interactive: bool,
}

impl<K: Keystore> CredentialResolver<K> {
    /// Resolver with the standard locations and attempt limit.
    pub fn new(keystore: K) -> Self {
        Self {
            keystore,
            ssh_config: paths::SSH_CONFIG.to_string(),
            default_identity: paths::DEFAULT_IDENTITY.to_string(),
            home: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interactive: true,
        }
    }

    /// SSH configuration file (`~` is expanded).
    pub fn ssh_config_path(mut self, path: impl Into<String>) -> Self {
        self.ssh_config = path.into();
        self
    }

    /// Key used when the host profile names none (`~` is expanded).
    pub fn default_identity(mut self, path: impl Into<String>) -> Self {
        self.default_identity = path.into();
        self
    }

    /// Home directory used for `~` and `%d` (default: the user's home).
    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Passphrase attempts; values below 1 are raised to 1.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Whether the keystore may prompt the user.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn keystore(&self) -> &K {
        &self.keystore
    }

    /// Produce a credential for `url`, authenticating as `username`.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidUrl`] if the URL has no hostname
    /// - [`AuthError::KeyNotFound`] if the selected private key is missing
    /// - [`AuthError::SecretUnavailable`] if the keystore has no passphrase
    /// - [`AuthError::Decryption`] if every attempt used a wrong passphrase
    pub fn resolve(&self, remote_url: &str, username: &str) -> Result<KeypairCredential, AuthError> {
        let host = url::extract_host(remote_url).ok_or_else(|| AuthError::InvalidUrl {
            url: remote_url.to_string(),
        })?;

        let home = self
            .home
            .clone()
            .or_else(paths::home_dir)
            .unwrap_or_default();

        let config_path = paths::expand_home(&self.ssh_config, &home);
        let config = SshConfig::load(&config_path).map_err(|e| AuthError::ConfigRead {
            path: config_path.clone(),
            message: e.to_string(),
        })?;
        let profile = config.lookup(&host, &home);

        let identity = profile
            .identity_files()
            .first()
            .map(String::as_str)
            .unwrap_or(&self.default_identity);
        let private_key = paths::expand_home(identity, &home);
        debug!(host = %host, key = %private_key.display(), "resolving ssh credential");

        if !private_key.is_file() {
            return Err(AuthError::KeyNotFound { path: private_key });
        }

        let key = KeyFile::read(&private_key)?;
        let passphrase = if key.is_encrypted() {
            Some(self.unlock(&key)?)
        } else {
            None
        };

        Ok(KeypairCredential {
            username: username.to_string(),
            public_key: public_key_path(&private_key),
            private_key,
            passphrase,
        })
    }

    fn unlock(&self, key: &KeyFile) -> Result<String, AuthError> {
        let key_id = key.path().to_string_lossy();
        let prompt = format!("enter passphrase for private key:\n{}", key_id);

        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(key = %key_id, attempt, max = self.max_attempts, "requesting passphrase");

            let passphrase = self
                .keystore
                .get_password(KEYSTORE_NAMESPACE, &key_id, self.interactive, &prompt)?
                .ok_or_else(|| AuthError::SecretUnavailable {
                    path: key.path().to_path_buf(),
                })?;

            match key.unlock(&passphrase) {
                Ok(()) => return Ok(passphrase),
                Err(err) => {
                    warn!(key = %key_id, attempt, "passphrase did not unlock private key");
                    self.keystore.delete_password(KEYSTORE_NAMESPACE, &key_id)?;
                    if attempt >= self.max_attempts {
                        return Err(AuthError::Decryption {
                            path: key.path().to_path_buf(),
                            attempts: attempt,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretError;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Keystore that hands out a fixed answer and records every call.
    #[derive(Default)]
    struct RecordingKeystore {
        answer: Option<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl RecordingKeystore {
        fn answering(answer: &'static str) -> Self {
            Self {
                answer: Some(answer),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Keystore for RecordingKeystore {
        fn get_password(
            &self,
            namespace: &str,
            key_id: &str,
            interactive: bool,
            prompt: &str,
        ) -> Result<Option<String>, SecretError> {
            assert_eq!(namespace, KEYSTORE_NAMESPACE);
            assert!(interactive);
            assert!(prompt.starts_with("enter passphrase for private key:\n"));
            assert!(prompt.ends_with(key_id));
            self.calls.borrow_mut().push("get".into());
            Ok(self.answer.map(String::from))
        }

        fn delete_password(&self, namespace: &str, _key_id: &str) -> Result<(), SecretError> {
            assert_eq!(namespace, KEYSTORE_NAMESPACE);
            self.calls.borrow_mut().push("delete".into());
            Ok(())
        }
    }

    fn write_key(home: &Path, name: &str, passphrase: Option<&[u8]>) -> PathBuf {
        use openssl::pkey::PKey;
        use openssl::rsa::Rsa;
        use openssl::symm::Cipher;

        let key = PKey::from_rsa(Rsa::generate(2048).expect("rsa")).expect("pkey");
        let pem = match passphrase {
            Some(pass) => key
                .private_key_to_pem_pkcs8_passphrase(Cipher::aes_256_cbc(), pass)
                .expect("pem"),
            None => key.private_key_to_pem_pkcs8().expect("pem"),
        };
        let dir = home.join(".ssh");
        fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join(name);
        fs::write(&path, pem).expect("write key");
        path
    }

    fn resolver(home: &TempDir, keystore: RecordingKeystore) -> CredentialResolver<RecordingKeystore> {
        CredentialResolver::new(keystore).home(home.path())
    }

    #[test]
    fn unencrypted_default_key() {
        let home = TempDir::new().expect("temp");
        let key = write_key(home.path(), "id_rsa", None);
        let resolver = resolver(&home, RecordingKeystore::default());

        let cred = resolver.resolve("git@example.com:o/r.git", "git").expect("resolve");

        assert_eq!(cred.username, "git");
        assert_eq!(cred.private_key, key);
        assert_eq!(cred.public_key, public_key_path(&key));
        assert!(cred.passphrase.is_none());
        assert!(resolver.keystore().calls().is_empty());
    }

    #[test]
    fn identity_from_ssh_config() {
        let home = TempDir::new().expect("temp");
        let key = write_key(home.path(), "work", None);
        write_key(home.path(), "id_rsa", None);
        fs::write(
            home.path().join(".ssh/config"),
            "Host example.com\n  IdentityFile ~/.ssh/work\n",
        )
        .expect("write config");

        let cred = resolver(&home, RecordingKeystore::default())
            .resolve("ssh://git@example.com/o/r.git", "git")
            .expect("resolve");
        assert_eq!(cred.private_key, key);
    }

    #[test]
    fn invalid_url_fails_before_file_access() {
        let home = TempDir::new().expect("temp");
        // An unreadable config path would fail if it were touched.
        let resolver = resolver(&home, RecordingKeystore::default())
            .ssh_config_path(home.path().join("config-is-a-dir").to_string_lossy());
        fs::create_dir(home.path().join("config-is-a-dir")).expect("mkdir");

        let err = resolver.resolve("/invalid/url.value@", "git").unwrap_err();
        assert!(matches!(err, AuthError::InvalidUrl { .. }));
    }

    #[test]
    fn missing_key_is_not_found() {
        let home = TempDir::new().expect("temp");
        let err = resolver(&home, RecordingKeystore::default())
            .resolve("git@example.com:o/r.git", "git")
            .unwrap_err();
        assert!(matches!(err, AuthError::KeyNotFound { .. }));
    }

    #[test]
    fn encrypted_key_right_passphrase() {
        let home = TempDir::new().expect("temp");
        write_key(home.path(), "id_rsa", Some(b"open sesame"));
        let resolver = resolver(&home, RecordingKeystore::answering("open sesame"));

        let cred = resolver.resolve("git@example.com:o/r.git", "me").expect("resolve");

        assert_eq!(cred.passphrase.as_deref(), Some("open sesame"));
        assert_eq!(resolver.keystore().calls(), vec!["get"]);
    }

    #[test]
    fn wrong_passphrase_exhausts_attempts() {
        let home = TempDir::new().expect("temp");
        write_key(home.path(), "id_rsa", Some(b"open sesame"));
        let resolver = resolver(&home, RecordingKeystore::answering("wrong"));

        let err = resolver.resolve("git@example.com:o/r.git", "git").unwrap_err();

        match err {
            AuthError::Decryption { attempts, ref reason, .. } => {
                assert_eq!(attempts, DEFAULT_MAX_ATTEMPTS);
                assert!(!reason.is_empty());
            }
            other => panic!("expected decryption error, got {:?}", other),
        }
        let expected: Vec<String> = (0..DEFAULT_MAX_ATTEMPTS)
            .flat_map(|_| ["get".to_string(), "delete".to_string()])
            .collect();
        assert_eq!(resolver.keystore().calls(), expected);
    }

    #[test]
    fn custom_attempt_limit() {
        let home = TempDir::new().expect("temp");
        write_key(home.path(), "id_rsa", Some(b"open sesame"));
        let resolver = resolver(&home, RecordingKeystore::answering("wrong")).max_attempts(2);

        assert!(matches!(
            resolver.resolve("git@example.com:o/r.git", "git"),
            Err(AuthError::Decryption { attempts: 2, .. })
        ));
        assert_eq!(resolver.keystore().calls().len(), 4);
    }

    #[test]
    fn empty_keystore_is_secret_unavailable() {
        let home = TempDir::new().expect("temp");
        write_key(home.path(), "id_rsa", Some(b"open sesame"));
        let resolver = resolver(&home, RecordingKeystore::default());

        let err = resolver.resolve("git@example.com:o/r.git", "git").unwrap_err();

        assert!(matches!(err, AuthError::SecretUnavailable { .. }));
        assert_eq!(resolver.keystore().calls(), vec!["get"]);
    }

    #[test]
    fn public_key_suffix() {
        assert_eq!(
            public_key_path(Path::new("/home/me/.ssh/id_rsa")),
            PathBuf::from("/home/me/.ssh/id_rsa.pub")
        );
    }

    #[test]
    fn debug_redacts_passphrase() {
        let cred = KeypairCredential {
            username: "git".into(),
            public_key: "/k.pub".into(),
            private_key: "/k".into(),
            passphrase: Some("hunter2".into()),
        };
        assert!(!format!("{:?}", cred).contains("hunter2"));
    }
}
