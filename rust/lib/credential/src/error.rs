use thiserror::Error;

/// Stable error code constants.
///
/// The request layer matches on these, never on the message text.
pub mod error_code {
    pub const ENTROPY_UNAVAILABLE: &str = "ENTROPY_UNAVAILABLE";
    pub const HASHING_FAILED: &str = "HASHING_FAILED";
    pub const INVALID_CONFIG: &str = "INVALID_CONFIG";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

/// Errors surfaced by the credential engine.
///
/// Only resource-class failures are errors. A wrong password, a malformed
/// stored hash or a missing role are ordinary `false` results.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The OS randomness source is absent or failed. Not retried.
    #[error("entropy unavailable: {0}")]
    EntropyUnavailable(String),

    /// The key-derivation function rejected its inputs or ran out of resources.
    #[error("hashing failed: {0}")]
    HashingFailed(String),

    /// Configuration could not be read, parsed, or holds out-of-range values.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Administrative input (e.g. a new role) is malformed.
    #[error("validation: {0}")]
    Validation(String),

    /// Failure reported by an external credential or role store.
    #[error("storage: {0}")]
    Storage(String),
}

impl AuthError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::EntropyUnavailable(_) => error_code::ENTROPY_UNAVAILABLE,
            AuthError::HashingFailed(_) => error_code::HASHING_FAILED,
            AuthError::InvalidConfig(_) => error_code::INVALID_CONFIG,
            AuthError::Validation(_) => error_code::VALIDATION_FAILED,
            AuthError::Storage(_) => error_code::STORAGE_ERROR,
        }
    }
}

impl From<getrandom::Error> for AuthError {
    fn from(e: getrandom::Error) -> Self {
        AuthError::EntropyUnavailable(e.to_string())
    }
}

impl From<argon2::Error> for AuthError {
    fn from(e: argon2::Error) -> Self {
        AuthError::HashingFailed(e.to_string())
    }
}
