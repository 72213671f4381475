//! git::transport
//!
//! Callbacks for network operations.
//!
//! # Design
//!
//! A remote operation needs three hooks: credential supply, host identity
//! verification and push rejection reporting. They form the
//! [`TransportHooks`] trait; [`AuthCallbacks`] is the production
//! implementation over a [`CredentialResolver`].
//!
//! libgit2 only sees a string when a callback fails, so
//! [`remote_callbacks`] records the first typed failure in a
//! [`FailureSlot`] and the operation reports that instead of the engine's
//! message.
//!
//! # Host identity
//!
//! [`AuthCallbacks`] accepts every host identity it is shown. Host keys
//! and certificates are not verified at this layer; this is a standing
//! trust policy, and callers needing verification supply their own hooks.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::{AuthError, CredentialResolver, KeypairCredential};
use crate::core::ErrorKind;
use crate::secrets::Keystore;

/// Username used when the URL carries none.
pub const DEFAULT_USERNAME: &str = "git";

/// Credential challenges answered per operation before giving up.
///
/// libgit2 asks again whenever the server refuses a key, and resolution
/// is deterministic, so an unbounded loop would never end.
pub const MAX_CREDENTIAL_CHALLENGES: u32 = 3;

/// Failures raised by transport hooks or the transport itself.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Credential resolution failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The remote refused to update a ref.
    #[error("failed to push {refname} to remote: {message}")]
    PushRejected { refname: String, message: String },

    /// The hooks refused the host's identity.
    #[error("host identity rejected: {host}")]
    HostRejected { host: String },

    /// The server kept refusing the supplied credential.
    #[error("credentials for {url} rejected after {attempts} attempt(s)")]
    CredentialsRejected { url: String, attempts: u32 },

    /// Any other transport failure.
    #[error("{operation} failed: {message}")]
    Network {
        operation: &'static str,
        message: String,
    },
}

impl TransportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::Auth(e) => e.kind(),
            TransportError::CredentialsRejected { .. } => ErrorKind::Authentication,
            TransportError::PushRejected { .. }
            | TransportError::HostRejected { .. }
            | TransportError::Network { .. } => ErrorKind::RemoteOperation,
        }
    }
}

/// Hooks invoked by the transport during fetch, push and clone.
pub trait TransportHooks {
    /// Produce a credential for `url`. Failures abort the operation.
    fn supply_credential(&self, url: &str, username: &str) -> Result<KeypairCredential, AuthError>;

    /// Whether to continue connecting to `host`.
    fn verify_host(&self, host: &str) -> bool;

    /// Called when the remote refuses to update `refname`.
    fn report_push_rejection(&self, refname: &str, message: &str) -> Result<(), TransportError>;
}

/// Production hooks: resolver-backed credentials, trusted hosts, and
/// push rejections as hard failures.
#[derive(Debug)]
pub struct AuthCallbacks<'a, K> {
    resolver: &'a CredentialResolver<K>,
}

impl<'a, K: Keystore> AuthCallbacks<'a, K> {
    pub fn new(resolver: &'a CredentialResolver<K>) -> Self {
        Self { resolver }
    }
}

impl<K: Keystore> TransportHooks for AuthCallbacks<'_, K> {
    fn supply_credential(&self, url: &str, username: &str) -> Result<KeypairCredential, AuthError> {
        self.resolver.resolve(url, username)
    }

    fn verify_host(&self, host: &str) -> bool {
        debug!(host, "accepting host identity without verification");
        true
    }

    fn report_push_rejection(&self, refname: &str, message: &str) -> Result<(), TransportError> {
        Err(TransportError::PushRejected {
            refname: refname.to_string(),
            message: message.to_string(),
        })
    }
}

/// First failure raised inside a callback during one operation.
#[derive(Debug, Default, Clone)]
pub struct FailureSlot(Rc<RefCell<Option<TransportError>>>);

impl FailureSlot {
    fn record(&self, err: TransportError) -> git2::Error {
        let engine_error = git2::Error::from_str(&err.to_string());
        let mut slot = self.0.borrow_mut();
        if slot.is_none() {
            *slot = Some(err);
        }
        engine_error
    }

    pub fn take(&self) -> Option<TransportError> {
        self.0.borrow_mut().take()
    }

    /// The recorded failure, or `err` as a generic transport failure.
    pub fn error_for(&self, err: git2::Error, operation: &'static str) -> TransportError {
        self.take().unwrap_or_else(|| TransportError::Network {
            operation,
            message: err.message().to_string(),
        })
    }
}

/// Build libgit2 callbacks that delegate to `hooks`.
pub fn remote_callbacks<'a>(
    hooks: &'a dyn TransportHooks,
    failure: &FailureSlot,
) -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();

    let slot = failure.clone();
    let mut challenges = 0u32;
    callbacks.credentials(move |url, username_from_url, allowed| {
        let username = username_from_url.unwrap_or(DEFAULT_USERNAME);

        if allowed.contains(git2::CredentialType::USERNAME)
            && !allowed.contains(git2::CredentialType::SSH_KEY)
        {
            return git2::Cred::username(username);
        }

        challenges += 1;
        if challenges > MAX_CREDENTIAL_CHALLENGES {
            return Err(slot.record(TransportError::CredentialsRejected {
                url: url.to_string(),
                attempts: MAX_CREDENTIAL_CHALLENGES,
            }));
        }

        match hooks.supply_credential(url, username) {
            Ok(cred) => git2::Cred::ssh_key(
                &cred.username,
                Some(cred.public_key.as_path()),
                cred.private_key.as_path(),
                cred.passphrase.as_deref(),
            ),
            Err(err) => {
                warn!(url, error = %err, "credential resolution failed");
                Err(slot.record(err.into()))
            }
        }
    });

    let slot = failure.clone();
    callbacks.certificate_check(move |_cert, host| {
        if hooks.verify_host(host) {
            Ok(git2::CertificateCheckStatus::CertificateOk)
        } else {
            Err(slot.record(TransportError::HostRejected {
                host: host.to_string(),
            }))
        }
    });

    let slot = failure.clone();
    callbacks.push_update_reference(move |refname, status| match status {
        None => Ok(()),
        Some(message) => hooks
            .report_push_rejection(refname, message)
            .map_err(|err| slot.record(err)),
    });

    callbacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretError;

    struct NoKeystore;

    impl Keystore for NoKeystore {
        fn get_password(
            &self,
            _namespace: &str,
            _key_id: &str,
            _interactive: bool,
            _prompt: &str,
        ) -> Result<Option<String>, SecretError> {
            Ok(None)
        }

        fn delete_password(&self, _namespace: &str, _key_id: &str) -> Result<(), SecretError> {
            Ok(())
        }
    }

    #[test]
    fn push_rejection_message_embeds_ref_and_text() {
        let resolver = CredentialResolver::new(NoKeystore);
        let hooks = AuthCallbacks::new(&resolver);

        let err = hooks
            .report_push_rejection("refs/heads/main", "non-fast-forward")
            .unwrap_err();

        assert!(matches!(err, TransportError::PushRejected { .. }));
        assert_eq!(
            err.to_string(),
            "failed to push refs/heads/main to remote: non-fast-forward"
        );
        assert_eq!(err.kind(), ErrorKind::RemoteOperation);
    }

    #[test]
    fn every_host_is_trusted() {
        let resolver = CredentialResolver::new(NoKeystore);
        let hooks = AuthCallbacks::new(&resolver);
        assert!(hooks.verify_host("github.com"));
        assert!(hooks.verify_host("evil.example"));
    }

    #[test]
    fn credential_failure_propagates() {
        let resolver = CredentialResolver::new(NoKeystore);
        let hooks = AuthCallbacks::new(&resolver);
        let err = hooks.supply_credential("/invalid/url.value@", "git").unwrap_err();
        assert!(matches!(err, AuthError::InvalidUrl { .. }));
    }

    #[test]
    fn slot_keeps_first_failure() {
        let slot = FailureSlot::default();
        slot.record(TransportError::HostRejected { host: "a".into() });
        slot.record(TransportError::HostRejected { host: "b".into() });

        match slot.take() {
            Some(TransportError::HostRejected { host }) => assert_eq!(host, "a"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(slot.take().is_none());
    }

    #[test]
    fn slot_falls_back_to_engine_message() {
        let slot = FailureSlot::default();
        let err = slot.error_for(git2::Error::from_str("connection reset"), "fetch");
        assert_eq!(err.to_string(), "fetch failed: connection reset");
    }
}
