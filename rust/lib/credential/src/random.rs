//! Cryptographically strong randomness: raw bytes, tokens, invite codes.
//!
//! Everything here draws from the OS source via `getrandom`. Nothing is
//! derived from time or counters.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::AuthError;

/// Default token size in random bytes (not characters).
pub const DEFAULT_TOKEN_LEN: usize = 32;

/// Default invite code length in characters.
pub const DEFAULT_CODE_LEN: usize = 9;

/// Symbols an invite code is drawn from.
pub const CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Largest multiple of the alphabet size that fits in a byte (36 * 7).
/// Bytes at or above this are rejected so every symbol is equally likely.
const CODE_REJECT_AT: u8 = 252;

/// Fill `buf` from the OS entropy source.
pub fn fill_random(buf: &mut [u8]) -> Result<(), AuthError> {
    getrandom::fill(buf)?;
    Ok(())
}

/// Return `n` random bytes from the OS entropy source.
pub fn random_bytes(n: usize) -> Result<Vec<u8>, AuthError> {
    let mut buf = vec![0u8; n];
    fill_random(&mut buf)?;
    Ok(buf)
}

/// URL-safe, unpadded base64 of `length` random bytes.
///
/// The output contains only `A-Z a-z 0-9 - _` and never needs escaping.
pub fn generate_secure_token(length: usize) -> Result<String, AuthError> {
    let bytes = random_bytes(length)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// `length` characters drawn uniformly from [`CODE_ALPHABET`].
///
/// Uses rejection sampling over random bytes, so there is no modulo bias.
pub fn generate_secure_code(length: usize) -> Result<String, AuthError> {
    let mut code = String::with_capacity(length);
    // Acceptance rate is 252/256; a small surplus usually finishes in one draw.
    let mut buf = vec![0u8; length + length / 8 + 4];
    while code.len() < length {
        fill_random(&mut buf)?;
        for &b in buf.iter().filter(|&&b| b < CODE_REJECT_AT) {
            code.push(CODE_ALPHABET[(b % 36) as usize] as char);
            if code.len() == length {
                break;
            }
        }
    }
    Ok(code)
}
