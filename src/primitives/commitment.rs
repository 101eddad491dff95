use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{Error, Result, COMMITMENT_KEY_B64_LEN};

type HmacSha256 = Hmac<Sha256>;

/// A value that can be committed to: `Com(v, r) = HMAC-SHA256(key=r, msg=v)`.
///
/// Strings and bignums are coerced to bytes by the caller before reaching
/// this function; this module only ever sees raw bytes (spec.md §4.1).
pub fn commit(value: &[u8], key_b64: &str) -> Result<String> {
    if key_b64.len() != COMMITMENT_KEY_B64_LEN {
        return Err(Error::InvalidCommitmentKeyLength {
            expected: COMMITMENT_KEY_B64_LEN,
            actual: key_b64.len(),
        });
    }
    let key_bytes = STANDARD.decode(key_b64)?;
    let mut mac = HmacSha256::new_from_slice(&key_bytes)
        .expect("HMAC accepts keys of any length");
    mac.update(value);
    let tag = mac.finalize().into_bytes();
    Ok(STANDARD.encode(tag))
}
