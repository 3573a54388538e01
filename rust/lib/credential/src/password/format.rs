use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Salt length of a current-format hash, in bytes.
pub const SALT_LEN: usize = 32;

/// Derived key length of a current-format hash, in bytes.
pub const KEY_LEN: usize = 64;

/// Modular-crypt prefixes of bcrypt, the pre-migration scheme.
const LEGACY_PREFIXES: &[&str] = &["$2a$", "$2b$", "$2x$", "$2y$"];

/// A decoded current-format hash.
#[derive(Clone, PartialEq, Eq)]
pub struct CurrentHash {
    salt: [u8; SALT_LEN],
    key: [u8; KEY_LEN],
}

impl CurrentHash {
    pub fn new(salt: [u8; SALT_LEN], key: [u8; KEY_LEN]) -> Self {
        Self { salt, key }
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// Serialize as `base64(salt):base64(key)` (standard alphabet, padded).
    pub fn encode(&self) -> String {
        format!("{}:{}", STANDARD.encode(self.salt), STANDARD.encode(self.key))
    }

    fn decode(stored: &str) -> Option<Self> {
        let (salt_b64, key_b64) = stored.split_once(':')?;
        let salt: [u8; SALT_LEN] = STANDARD.decode(salt_b64).ok()?.try_into().ok()?;
        let key: [u8; KEY_LEN] = STANDARD.decode(key_b64).ok()?.try_into().ok()?;
        Some(Self { salt, key })
    }
}

impl fmt::Debug for CurrentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CurrentHash(..)")
    }
}

/// A stored credential classified by format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredCredential {
    /// `base64(salt):base64(key)` with exact component lengths.
    Current(CurrentHash),
    /// A bcrypt string, verifiable only through a legacy verifier.
    Legacy(String),
    /// Anything else. Never authenticates.
    Unrecognized,
}

impl StoredCredential {
    /// Classify a stored hash. Current format is tried first; anything that
    /// fails it is legacy only if it carries a bcrypt prefix.
    pub fn parse(stored: &str) -> Self {
        if let Some(hash) = CurrentHash::decode(stored) {
            return StoredCredential::Current(hash);
        }
        if LEGACY_PREFIXES.iter().any(|p| stored.starts_with(p)) {
            return StoredCredential::Legacy(stored.to_string());
        }
        StoredCredential::Unrecognized
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StoredCredential::Current(_) => "current",
            StoredCredential::Legacy(_) => "legacy",
            StoredCredential::Unrecognized => "unrecognized",
        }
    }
}
