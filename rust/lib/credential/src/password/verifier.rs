use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::compare::constant_time_eq;
use crate::config::KdfParams;
use crate::error::AuthError;
use crate::password::format::StoredCredential;
use crate::password::hasher::CredentialHasher;
use crate::password::legacy::LegacyVerifier;

/// Outcome of a password check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verification {
    /// The password matches the stored hash.
    pub matches: bool,
    /// The stored hash is legacy format and should be re-hashed and persisted.
    /// Only ever set together with `matches`.
    pub needs_upgrade: bool,
}

impl Verification {
    pub const REJECTED: Verification = Verification {
        matches: false,
        needs_upgrade: false,
    };
}

/// Verifies passwords against stored hashes of either format.
///
/// Fail-closed: malformed or unrecognized hashes, KDF failures and an absent
/// legacy capability all yield `matches = false`. `verify` never errors.
#[derive(Clone)]
pub struct CredentialVerifier {
    hasher: CredentialHasher,
    legacy: Option<Arc<dyn LegacyVerifier>>,
}

impl CredentialVerifier {
    /// A verifier for current-format hashes only.
    pub fn new(params: KdfParams) -> Result<Self, AuthError> {
        Ok(Self {
            hasher: CredentialHasher::new(params)?,
            legacy: None,
        })
    }

    /// A verifier that also accepts legacy hashes through `legacy`.
    pub fn with_legacy(
        params: KdfParams,
        legacy: Arc<dyn LegacyVerifier>,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            hasher: CredentialHasher::new(params)?,
            legacy: Some(legacy),
        })
    }

    pub fn has_legacy(&self) -> bool {
        self.legacy.is_some()
    }

    /// Check `password` against `stored`.
    pub fn verify(&self, password: &str, stored: &str) -> Verification {
        let parsed = StoredCredential::parse(stored);
        debug!(format = parsed.kind(), "verifying stored credential");

        match parsed {
            StoredCredential::Current(hash) => match self.hasher.derive(password, hash.salt()) {
                Ok(key) => Verification {
                    matches: constant_time_eq(&key, hash.key()),
                    needs_upgrade: false,
                },
                Err(e) => {
                    warn!(error = %e, "key derivation failed during verification");
                    Verification::REJECTED
                }
            },
            StoredCredential::Legacy(hash) => {
                let Some(legacy) = &self.legacy else {
                    warn!("legacy credential presented but no legacy verifier is configured");
                    return Verification::REJECTED;
                };
                // The legacy verifier is injected; a panic in it must not escape.
                let matches = catch_unwind(AssertUnwindSafe(|| legacy.verify(password, &hash)))
                    .unwrap_or_else(|_| {
                        warn!("legacy verifier panicked; treating as mismatch");
                        false
                    });
                if matches {
                    debug!("legacy credential verified; upgrade required");
                }
                Verification {
                    matches,
                    needs_upgrade: matches,
                }
            }
            StoredCredential::Unrecognized => {
                warn!("stored credential has an unrecognized format");
                Verification::REJECTED
            }
        }
    }
}
