//! Login flow over the credential persistence layer.
//!
//! The engine owns no storage. It reads stored hashes through
//! [`CredentialStore`], verifies them, and writes back a current-format hash
//! when a legacy one matched.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::KdfParams;
use crate::error::AuthError;
use crate::password::{CredentialHasher, CredentialVerifier, LegacyVerifier, Verification};

/// Read/write access to stored password hashes, keyed by principal.
pub trait CredentialStore: Send + Sync {
    /// The stored hash for `principal`, or `None` if the principal is unknown.
    fn load_hash(&self, principal: &str) -> Result<Option<String>, AuthError>;

    /// Replace the stored hash for `principal`.
    fn store_hash(&self, principal: &str, hash: &str) -> Result<(), AuthError>;
}

/// Result of [`CredentialEngine::login`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Password matched. `upgraded` is true when a legacy hash was replaced.
    Accepted { upgraded: bool },
    /// Unknown principal or wrong password. The two are indistinguishable.
    Rejected,
}

impl LoginOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, LoginOutcome::Accepted { .. })
    }
}

/// Hasher and verifier sharing one set of KDF parameters.
#[derive(Clone)]
pub struct CredentialEngine {
    hasher: CredentialHasher,
    verifier: CredentialVerifier,
    /// Verified against when the principal is unknown, so both paths cost
    /// one KDF evaluation.
    dummy_hash: String,
}

impl CredentialEngine {
    /// Engine with the bundled legacy verifier, if the `legacy-bcrypt`
    /// feature is enabled.
    pub fn new(params: KdfParams) -> Result<Self, AuthError> {
        Self::with_legacy(params, default_legacy())
    }

    /// Engine with an explicit legacy capability (or none).
    pub fn with_legacy(
        params: KdfParams,
        legacy: Option<Arc<dyn LegacyVerifier>>,
    ) -> Result<Self, AuthError> {
        let hasher = CredentialHasher::new(params)?;
        let verifier = match legacy {
            Some(legacy) => CredentialVerifier::with_legacy(params, legacy)?,
            None => CredentialVerifier::new(params)?,
        };
        let dummy_hash = hasher.hash("")?;
        Ok(Self {
            hasher,
            verifier,
            dummy_hash,
        })
    }

    pub fn params(&self) -> KdfParams {
        self.hasher.params()
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        self.hasher.hash(password)
    }

    pub fn verify(&self, password: &str, stored: &str) -> Verification {
        self.verifier.verify(password, stored)
    }

    /// Verify, and on a legacy match produce the current-format replacement.
    pub fn verify_and_upgrade(
        &self,
        password: &str,
        stored: &str,
    ) -> Result<(Verification, Option<String>), AuthError> {
        let verification = self.verifier.verify(password, stored);
        if verification.matches && verification.needs_upgrade {
            let replacement = self.hasher.hash(password)?;
            return Ok((verification, Some(replacement)));
        }
        Ok((verification, None))
    }

    /// Authenticate `principal` against `store`.
    ///
    /// A legacy hash that matches is re-hashed and persisted. Failing to
    /// persist it is logged and does not fail the login.
    pub fn login(
        &self,
        store: &dyn CredentialStore,
        principal: &str,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let Some(stored) = store.load_hash(principal)? else {
            std::hint::black_box(self.verifier.verify(password, &self.dummy_hash));
            debug!(principal, "login rejected: unknown principal");
            return Ok(LoginOutcome::Rejected);
        };

        let verification = self.verifier.verify(password, &stored);
        if !verification.matches {
            debug!(principal, "login rejected: credential mismatch");
            return Ok(LoginOutcome::Rejected);
        }
        if !verification.needs_upgrade {
            return Ok(LoginOutcome::Accepted { upgraded: false });
        }

        let upgraded = match self
            .hasher
            .hash(password)
            .and_then(|hash| store.store_hash(principal, &hash))
        {
            Ok(()) => {
                info!(principal, "upgraded legacy credential to current format");
                true
            }
            Err(e) => {
                warn!(principal, error = %e, "failed to persist upgraded credential");
                false
            }
        };
        Ok(LoginOutcome::Accepted { upgraded })
    }
}

#[cfg(feature = "legacy-bcrypt")]
fn default_legacy() -> Option<Arc<dyn LegacyVerifier>> {
    Some(Arc::new(crate::password::BcryptVerifier))
}

#[cfg(not(feature = "legacy-bcrypt"))]
fn default_legacy() -> Option<Arc<dyn LegacyVerifier>> {
    None
}
