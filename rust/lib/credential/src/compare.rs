//! Fixed-time equality for secret-derived bytes.

use std::hint::black_box;

/// Return true iff `a` and `b` are byte-identical.
///
/// Running time depends only on the length of the inputs, never on where
/// they first differ. Inputs of different length return early; lengths of
/// derived keys and digests are public.
///
/// Only for secret material (derived keys, token digests).
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= black_box(x ^ y);
    }
    black_box(diff) == 0
}
