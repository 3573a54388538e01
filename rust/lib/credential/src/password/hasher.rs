use argon2::Argon2;

use crate::config::KdfParams;
use crate::error::AuthError;
use crate::password::format::{CurrentHash, KEY_LEN, SALT_LEN};
use crate::random::fill_random;

/// Derives current-format password hashes with argon2id.
///
/// Holds only immutable parameters; share freely across threads.
#[derive(Clone)]
pub struct CredentialHasher {
    params: KdfParams,
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Create a hasher, validating the KDF parameters up front.
    pub fn new(params: KdfParams) -> Result<Self, AuthError> {
        params.validate()?;
        let argon2 = params.argon2()?;
        Ok(Self { params, argon2 })
    }

    pub fn params(&self) -> KdfParams {
        self.params
    }

    /// Hash a password under a fresh 32-byte salt.
    ///
    /// Returns `base64(salt):base64(key)`.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let mut salt = [0u8; SALT_LEN];
        fill_random(&mut salt)?;
        let key = self.derive(password, &salt)?;
        Ok(CurrentHash::new(salt, key).encode())
    }

    /// Run the KDF over `(password, salt)`.
    pub(crate) fn derive(&self, password: &str, salt: &[u8]) -> Result<[u8; KEY_LEN], AuthError> {
        let mut key = [0u8; KEY_LEN];
        self.argon2.hash_password_into(password.as_bytes(), salt, &mut key)?;
        Ok(key)
    }
}
