//! Password hashing and verification.
//!
//! Stored credentials come in two shapes:
//!
//! - **current**: `base64(salt):base64(key)`, a 32-byte salt and a 64-byte
//!   argon2id key, written by [`CredentialHasher`]
//! - **legacy**: bcrypt modular-crypt strings (`$2b$...`) from before the
//!   migration, only ever read
//!
//! [`CredentialVerifier`] accepts both and reports `needs_upgrade` after a
//! successful legacy match so the caller can re-hash and persist.

pub mod format;
pub mod hasher;
pub mod legacy;
pub mod verifier;

pub use format::{CurrentHash, KEY_LEN, SALT_LEN, StoredCredential};
pub use hasher::CredentialHasher;
#[cfg(feature = "legacy-bcrypt")]
pub use legacy::BcryptVerifier;
pub use legacy::LegacyVerifier;
pub use verifier::{CredentialVerifier, Verification};
