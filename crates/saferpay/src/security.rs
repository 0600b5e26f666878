//! Comparison helpers for callback verification.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Exact string equality whose timing depends on neither content nor length.
///
/// Both sides are reduced to SHA-256 digests first, then compared with
/// `subtle`. No trimming, case folding or numeric coercion is applied.
pub fn secure_str_eq(a: &str, b: &str) -> bool {
    let da = Sha256::digest(a.as_bytes());
    let db = Sha256::digest(b.as_bytes());
    da.ct_eq(&db).into()
}

/// Compare an optional field from the original request with the value
/// echoed back by the gateway. Two absent values match; a value on one
/// side only does not.
pub fn field_matches(original: Option<&str>, echoed: Option<&str>) -> bool {
    match (original, echoed) {
        (Some(a), Some(b)) => secure_str_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
