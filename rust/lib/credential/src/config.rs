//! Credential engine configuration.
//!
//! Loaded from a TOML file with optional `[kdf]` and `[retry]` sections:
//!
//! ```toml
//! [kdf]
//! memory_kib = 19456
//! iterations = 2
//! parallelism = 1
//!
//! [retry]
//! max_attempts = 3
//! base_delay_ms = 100
//! max_delay_ms = 2000
//! ```

use std::path::Path;
use std::time::Duration;

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::password::KEY_LEN;

/// Upper bound on `memory_kib`: 1 GiB per hash.
pub const MAX_MEMORY_KIB: u32 = 1_048_576;

/// Upper bound on `iterations`.
pub const MAX_ITERATIONS: u32 = 64;

/// Upper bound on `parallelism`.
pub const MAX_PARALLELISM: u32 = 64;

/// Argon2id cost parameters.
///
/// These are not embedded in stored hashes, so a deployment must keep the
/// same values for as long as hashes produced under them are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    /// Memory cost in KiB (argon2 `m_cost`).
    pub memory_kib: u32,
    /// Number of passes (argon2 `t_cost`).
    pub iterations: u32,
    /// Degree of parallelism (argon2 `p_cost`).
    pub parallelism: u32,
}

impl Default for KdfParams {
    /// OWASP baseline for argon2id: 19 MiB, 2 passes, 1 lane.
    fn default() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// Reject parameters argon2 would refuse at hashing time, and costs
    /// above [`MAX_MEMORY_KIB`], [`MAX_ITERATIONS`] or [`MAX_PARALLELISM`]
    /// that would let one login exhaust the host.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.parallelism == 0 {
            return Err(AuthError::InvalidConfig("kdf parallelism must be at least 1".into()));
        }
        if self.parallelism > MAX_PARALLELISM {
            return Err(AuthError::InvalidConfig(format!(
                "kdf parallelism must be at most {}",
                MAX_PARALLELISM
            )));
        }
        if self.iterations == 0 {
            return Err(AuthError::InvalidConfig("kdf iterations must be at least 1".into()));
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(AuthError::InvalidConfig(format!(
                "kdf iterations must be at most {}",
                MAX_ITERATIONS
            )));
        }
        if self.memory_kib > MAX_MEMORY_KIB {
            return Err(AuthError::InvalidConfig(format!(
                "kdf memory_kib must be at most {}",
                MAX_MEMORY_KIB
            )));
        }
        if self.memory_kib < 8 * self.parallelism {
            return Err(AuthError::InvalidConfig(format!(
                "kdf memory_kib must be at least {} for parallelism {}",
                8 * self.parallelism,
                self.parallelism
            )));
        }
        self.argon2().map(|_| ())
    }

    /// Build the argon2id context producing a `KEY_LEN`-byte key.
    pub(crate) fn argon2(&self) -> Result<Argon2<'static>, AuthError> {
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| AuthError::InvalidConfig(format!("kdf parameters rejected: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Retry and backoff policy for the request layer wrapping this crate.
///
/// Owned by the caller and passed down explicitly; nothing here keeps
/// retry state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based), doubling each time and
    /// capped at `max_delay_ms`. `None` once attempts are exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let ms = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Some(Duration::from_millis(ms))
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialConfig {
    #[serde(default)]
    pub kdf: KdfParams,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl CredentialConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, AuthError> {
        let config: CredentialConfig =
            toml::from_str(content).map_err(|e| AuthError::InvalidConfig(e.to_string()))?;
        config.kdf.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AuthError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}
