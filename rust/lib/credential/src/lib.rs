//! Credential engine. Password hashing, legacy migration, role authorization.
//!
//! # Pieces
//!
//! - **random**: OS-backed bytes, URL-safe tokens, human-typed invite codes
//! - **compare**: fixed-time equality for secret-derived material
//! - **password**: argon2id hashing, stored-hash parsing, verification with
//!   transparent bcrypt migration
//! - **integrity**: SHA-256 digests for tamper evidence (never for passwords)
//! - **model**: `Role`, a weighted permission set
//! - **authorizer**: permission / role / weight checks over a role set
//! - **engine**: login with transparent hash upgrade over a pluggable store
//!
//! # Usage
//!
//! ```ignore
//! use openerp_credential::{CredentialEngine, KdfParams, Requirement, RoleAuthorizer};
//!
//! let engine = CredentialEngine::new(KdfParams::default())?;
//! let stored = engine.hash("hunter2")?;
//! assert!(engine.verify("hunter2", &stored).matches);
//!
//! let allowed = RoleAuthorizer::satisfies_requirement(&roles, &Requirement::MinWeight(5));
//! ```
//!
//! Every operation is a pure computation over its arguments. Hashing and
//! verification are deliberately slow; run them off latency-sensitive paths.

pub mod authorizer;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod integrity;
pub mod model;
pub mod password;
pub mod random;

pub use authorizer::{CheckResult, Requirement, RoleAuthorizer, RoleSource};
pub use compare::constant_time_eq;
pub use config::{CredentialConfig, KdfParams, RetryPolicy};
pub use engine::{CredentialEngine, CredentialStore, LoginOutcome};
pub use error::AuthError;
pub use integrity::{digest, digest_str};
pub use model::{CreateRole, Role};
pub use password::{
    CredentialHasher, CredentialVerifier, CurrentHash, LegacyVerifier, StoredCredential,
    Verification,
};
#[cfg(feature = "legacy-bcrypt")]
pub use password::BcryptVerifier;
pub use random::{
    DEFAULT_CODE_LEN, DEFAULT_TOKEN_LEN, generate_secure_code, generate_secure_token, random_bytes,
};
