//! secrets::keystore
//!
//! [`Keystore`] backed by a [`SecretStore`] cache and a [`Prompter`].
//!
//! # Flow
//!
//! `get_password` looks the entry up in the cache first. On a miss it asks
//! the prompter (only when `interactive` is set) and caches a non-empty
//! answer so the next resolution for the same key does not prompt again.
//! `delete_password` evicts the cached entry; callers use it when a cached
//! passphrase turns out to be wrong.
//!
//! Entries are cached under `<namespace>/<key_id>`.

use super::traits::{Keystore, SecretError, SecretStore};
use crate::ui::prompts::{PromptError, Prompter};

/// Caching, prompting passphrase source.
pub struct PromptingKeystore {
    store: Box<dyn SecretStore>,
    prompter: Box<dyn Prompter>,
}

impl std::fmt::Debug for PromptingKeystore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptingKeystore").finish_non_exhaustive()
    }
}

impl PromptingKeystore {
    pub fn new(store: Box<dyn SecretStore>, prompter: Box<dyn Prompter>) -> Self {
        Self { store, prompter }
    }

    /// Cache key for an entry.
    pub fn cache_key(namespace: &str, key_id: &str) -> String {
        format!("{}/{}", namespace, key_id)
    }
}

impl Keystore for PromptingKeystore {
    fn get_password(
        &self,
        namespace: &str,
        key_id: &str,
        interactive: bool,
        prompt: &str,
    ) -> Result<Option<String>, SecretError> {
        let key = Self::cache_key(namespace, key_id);
        if let Some(cached) = self.store.get(&key)? {
            tracing::debug!(namespace, key_id, "passphrase served from cache");
            return Ok(Some(cached));
        }

        if !interactive {
            return Ok(None);
        }

        match self.prompter.password(prompt) {
            Ok(answer) if answer.is_empty() => Ok(None),
            Ok(answer) => {
                self.store.set(&key, &answer)?;
                Ok(Some(answer))
            }
            Err(PromptError::Cancelled | PromptError::NotInteractive) => Ok(None),
            Err(PromptError::IoError(msg)) => Err(SecretError::PromptError(msg)),
        }
    }

    fn delete_password(&self, namespace: &str, key_id: &str) -> Result<(), SecretError> {
        self.store.delete(&Self::cache_key(namespace, key_id))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryStore(Mutex<HashMap<String, String>>);

    impl SecretStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }
        fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
            self.0.lock().unwrap().insert(key.into(), value.into());
            Ok(())
        }
        fn delete(&self, key: &str) -> Result<(), SecretError> {
            self.0.lock().unwrap().remove(key);
            Ok(())
        }
    }

    struct Answer(Result<&'static str, fn() -> PromptError>, Mutex<usize>);

    impl Answer {
        fn ok(value: &'static str) -> Self {
            Self(Ok(value), Mutex::new(0))
        }
        fn err(make: fn() -> PromptError) -> Self {
            Self(Err(make), Mutex::new(0))
        }
    }

    impl Prompter for std::sync::Arc<Answer> {
        fn password(&self, _message: &str) -> Result<String, PromptError> {
            *self.1.lock().unwrap() += 1;
            match &self.0 {
                Ok(v) => Ok(v.to_string()),
                Err(make) => Err(make()),
            }
        }
    }

    fn keystore(answer: Answer) -> (PromptingKeystore, std::sync::Arc<Answer>) {
        let answer = std::sync::Arc::new(answer);
        let ks = PromptingKeystore::new(
            Box::new(MemoryStore::default()),
            Box::new(answer.clone()),
        );
        (ks, answer)
    }

    #[test]
    fn prompts_once_then_caches() {
        let (ks, answer) = keystore(Answer::ok("secret"));

        let first = ks.get_password("ns", "/k", true, "p").unwrap();
        let second = ks.get_password("ns", "/k", true, "p").unwrap();

        assert_eq!(first.as_deref(), Some("secret"));
        assert_eq!(second.as_deref(), Some("secret"));
        assert_eq!(*answer.1.lock().unwrap(), 1);
    }

    #[test]
    fn delete_forces_new_prompt() {
        let (ks, answer) = keystore(Answer::ok("secret"));

        ks.get_password("ns", "/k", true, "p").unwrap();
        ks.delete_password("ns", "/k").unwrap();
        ks.get_password("ns", "/k", true, "p").unwrap();

        assert_eq!(*answer.1.lock().unwrap(), 2);
    }

    #[test]
    fn non_interactive_miss_is_none() {
        let (ks, answer) = keystore(Answer::ok("secret"));
        assert!(ks.get_password("ns", "/k", false, "p").unwrap().is_none());
        assert_eq!(*answer.1.lock().unwrap(), 0);
    }

    #[test]
    fn empty_answer_is_none_and_not_cached() {
        let (ks, _answer) = keystore(Answer::ok(""));
        assert!(ks.get_password("ns", "/k", true, "p").unwrap().is_none());
        assert!(ks.get_password("ns", "/k", false, "p").unwrap().is_none());
    }

    #[test]
    fn cancelled_prompt_is_none() {
        let (ks, _answer) = keystore(Answer::err(|| PromptError::Cancelled));
        assert!(ks.get_password("ns", "/k", true, "p").unwrap().is_none());
    }

    #[test]
    fn io_failure_is_error() {
        let (ks, _answer) = keystore(Answer::err(|| PromptError::IoError("tty gone".into())));
        assert!(matches!(
            ks.get_password("ns", "/k", true, "p"),
            Err(SecretError::PromptError(_))
        ));
    }

    #[test]
    fn namespaces_do_not_collide() {
        assert_ne!(
            PromptingKeystore::cache_key("a", "/k"),
            PromptingKeystore::cache_key("b", "/k")
        );
    }
}
