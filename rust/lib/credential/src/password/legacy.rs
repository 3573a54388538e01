/// Read-only verification of pre-migration password hashes.
///
/// Injected into [`crate::password::CredentialVerifier`] at construction.
/// A verifier without one simply rejects legacy hashes.
pub trait LegacyVerifier: Send + Sync {
    /// True iff `password` matches `hash`. Any internal failure is `false`.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// bcrypt verification for `$2a$` / `$2b$` / `$2x$` / `$2y$` hashes.
#[cfg(feature = "legacy-bcrypt")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BcryptVerifier;

#[cfg(feature = "legacy-bcrypt")]
impl LegacyVerifier for BcryptVerifier {
    fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}

#[cfg(all(test, feature = "legacy-bcrypt"))]
mod tests {
    use super::*;

    #[test]
    fn test_bcrypt_match() {
        let hash = bcrypt::hash("old password", 4).unwrap();
        assert!(BcryptVerifier.verify("old password", &hash));
        assert!(!BcryptVerifier.verify("new password", &hash));
    }

    #[test]
    fn test_bcrypt_garbage_is_false() {
        assert!(!BcryptVerifier.verify("x", "$2b$10$tooshort"));
        assert!(!BcryptVerifier.verify("x", ""));
    }
}
