//! End-to-end tests for SSH credential resolution.
//!
//! Keys are generated with OpenSSL into a temporary home directory; the
//! keystore is the real prompting keystore over a file-backed secret
//! store, with a scripted prompter standing in for the terminal.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use openssl::symm::Cipher;
use tempfile::TempDir;

use repokit::auth::{AuthError, CredentialResolver, KEYSTORE_NAMESPACE};
use repokit::core::ErrorKind;
use repokit::git::{AuthCallbacks, TransportHooks};
use repokit::secrets::{FileSecretStore, PromptingKeystore, SecretStore};
use repokit::ui::prompts::{PromptError, Prompter};

/// Answers prompts from a script and counts them.
#[derive(Clone, Default)]
struct Scripted {
    answers: Arc<Mutex<Vec<String>>>,
    asked: Arc<Mutex<u32>>,
}

impl Scripted {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: Arc::new(Mutex::new(
                answers.iter().rev().map(|a| a.to_string()).collect(),
            )),
            asked: Arc::default(),
        }
    }

    fn asked(&self) -> u32 {
        *self.asked.lock().unwrap()
    }
}

impl Prompter for Scripted {
    fn password(&self, message: &str) -> Result<String, PromptError> {
        assert!(message.starts_with("enter passphrase for private key:\n"));
        *self.asked.lock().unwrap() += 1;
        self.answers
            .lock()
            .unwrap()
            .pop()
            .ok_or(PromptError::Cancelled)
    }
}

struct Home {
    dir: TempDir,
}

impl Home {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp home"),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn secrets(&self) -> PathBuf {
        self.path().join(".repokit/secrets.toml")
    }

    fn write_key(&self, name: &str, passphrase: Option<&str>) -> PathBuf {
        let key = PKey::from_rsa(Rsa::generate(2048).expect("rsa")).expect("pkey");
        let pem = match passphrase {
            Some(pass) => key
                .private_key_to_pem_pkcs8_passphrase(Cipher::aes_256_cbc(), pass.as_bytes())
                .expect("pem"),
            None => key.private_key_to_pem_pkcs8().expect("pem"),
        };
        let dir = self.path().join(".ssh");
        fs::create_dir_all(&dir).expect("mkdir .ssh");
        let path = dir.join(name);
        fs::write(&path, pem).expect("write key");
        path
    }

    fn write_ssh_config(&self, contents: &str) {
        let dir = self.path().join(".ssh");
        fs::create_dir_all(&dir).expect("mkdir .ssh");
        fs::write(dir.join("config"), contents).expect("write config");
    }

    fn resolver(&self, prompter: &Scripted, interactive: bool) -> CredentialResolver<PromptingKeystore> {
        let store = FileSecretStore::with_path(self.secrets());
        CredentialResolver::new(PromptingKeystore::new(
            Box::new(store),
            Box::new(prompter.clone()),
        ))
        .home(self.path())
        .interactive(interactive)
    }

    fn cached(&self, key: &Path) -> Option<String> {
        FileSecretStore::with_path(self.secrets())
            .get(&PromptingKeystore::cache_key(
                KEYSTORE_NAMESPACE,
                &key.to_string_lossy(),
            ))
            .expect("read cache")
    }
}

#[test]
fn unencrypted_key_needs_no_passphrase() {
    let home = Home::new();
    let key = home.write_key("id_rsa", None);
    let prompter = Scripted::new(&[]);

    let cred = home
        .resolver(&prompter, true)
        .resolve("git@github.com:owner/repo.git", "git")
        .expect("resolve");

    assert_eq!(cred.private_key, key);
    assert_eq!(cred.public_key, PathBuf::from(format!("{}.pub", key.display())));
    assert_eq!(cred.username, "git");
    assert!(cred.passphrase.is_none());
    assert_eq!(prompter.asked(), 0);
}

#[test]
fn prompted_passphrase_is_cached_for_next_resolution() {
    let home = Home::new();
    let key = home.write_key("id_rsa", Some("correct horse"));
    let prompter = Scripted::new(&["correct horse"]);

    let first = home
        .resolver(&prompter, true)
        .resolve("ssh://git@example.com/repo.git", "git")
        .expect("resolve");
    assert_eq!(first.passphrase.as_deref(), Some("correct horse"));
    assert_eq!(home.cached(&key).as_deref(), Some("correct horse"));

    let silent = Scripted::new(&[]);
    let second = home
        .resolver(&silent, false)
        .resolve("ssh://git@example.com/repo.git", "git")
        .expect("resolve from cache");
    assert_eq!(second.passphrase.as_deref(), Some("correct horse"));
    assert_eq!(silent.asked(), 0);
}

#[test]
fn wrong_passphrase_is_evicted_then_retried() {
    let home = Home::new();
    let key = home.write_key("id_rsa", Some("right"));
    let prompter = Scripted::new(&["wrong", "right"]);

    let cred = home
        .resolver(&prompter, true)
        .resolve("git@example.com:repo.git", "git")
        .expect("resolve");

    assert_eq!(cred.passphrase.as_deref(), Some("right"));
    assert_eq!(prompter.asked(), 2);
    assert_eq!(home.cached(&key).as_deref(), Some("right"));
}

#[test]
fn exhausted_attempts_fail_with_decryption_error() {
    let home = Home::new();
    let key = home.write_key("id_rsa", Some("right"));
    let prompter = Scripted::new(&["a", "b", "c", "d", "e", "f"]);

    let err = home
        .resolver(&prompter, true)
        .resolve("git@example.com:repo.git", "git")
        .unwrap_err();

    match &err {
        AuthError::Decryption { path, attempts, .. } => {
            assert_eq!(path, &key);
            assert_eq!(*attempts, 5);
        }
        other => panic!("expected decryption error, got {:?}", other),
    }
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(prompter.asked(), 5);
    assert!(home.cached(&key).is_none());
}

#[test]
fn non_interactive_without_cache_is_unavailable() {
    let home = Home::new();
    home.write_key("id_rsa", Some("right"));
    let prompter = Scripted::new(&["right"]);

    let err = home
        .resolver(&prompter, false)
        .resolve("git@example.com:repo.git", "git")
        .unwrap_err();

    assert!(matches!(err, AuthError::SecretUnavailable { .. }));
    assert_eq!(prompter.asked(), 0);
}

#[test]
fn host_profile_selects_identity() {
    let home = Home::new();
    home.write_key("id_rsa", None);
    let work = home.write_key("work_key", None);
    home.write_ssh_config(
        "Host *.corp.example\n    IdentityFile ~/.ssh/work_key\n\nHost *\n    IdentityFile ~/.ssh/id_rsa\n",
    );
    let prompter = Scripted::new(&[]);
    let resolver = home.resolver(&prompter, false);

    let scp = resolver
        .resolve("deploy@git.corp.example:team/app.git", "deploy")
        .expect("scp-like");
    let ssh = resolver
        .resolve("ssh://deploy@git.corp.example/team/app.git", "deploy")
        .expect("ssh url");

    assert_eq!(scp.private_key, work);
    assert_eq!(ssh.private_key, work);
    assert_eq!(scp.username, "deploy");
}

#[test]
fn missing_key_and_bad_url() {
    let home = Home::new();
    let prompter = Scripted::new(&[]);
    let resolver = home.resolver(&prompter, false);

    let missing = resolver.resolve("git@example.com:repo.git", "git").unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);

    let invalid = resolver.resolve("/invalid/url.value@", "git").unwrap_err();
    assert_eq!(invalid.kind(), ErrorKind::InputValidation);
}

#[test]
fn transport_hooks_delegate_to_resolver() {
    let home = Home::new();
    let key = home.write_key("id_rsa", None);
    let prompter = Scripted::new(&[]);
    let resolver = home.resolver(&prompter, false);
    let hooks = AuthCallbacks::new(&resolver);

    let cred = hooks
        .supply_credential("ssh://git@example.com/repo.git", "git")
        .expect("credential");

    assert_eq!(cred.private_key, key);
    assert!(hooks.verify_host("example.com"));
    let err = hooks
        .report_push_rejection("refs/heads/main", "pre-receive hook declined")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to push refs/heads/main to remote: pre-receive hook declined"
    );
}
