use sha2::{Digest, Sha256};

const LOG_TARGET: &str = "svv::primitives::hashing";

/// Return the SHA-256 hash of `(tweaked) x`, as a 32-byte array.
///
/// The `tweak` value (0-255) perturbs `x`'s first byte before hashing,
/// giving independent-looking hashes of the same input for different
/// tweaks. Tweak 0 is plain SHA-256. See spec.md §4.1.
pub fn tweaked_hash(x: &[u8], tweak: u8) -> [u8; 32] {
    let digest = if tweak == 0 {
        Sha256::digest(x)
    } else {
        let mut buf = x.to_vec();
        if let Some(first) = buf.first_mut() {
            *first = first.wrapping_add(tweak);
        } else {
            // Empty input: tweaking has nothing to perturb, but we still
            // want tweak-dependent output, so fold the tweak in as a
            // single byte. Not exercised on the protocol's critical path
            // (every hashed value here is non-empty), but keeps the
            // function total rather than panicking.
            buf.push(tweak);
        }
        Sha256::digest(&buf)
    };
    tracing::trace!(target: LOG_TARGET, tweak, len = x.len(), "tweaked_hash");
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_abc_matches_golden_prefix() {
        let h = tweaked_hash(b"abc", 0);
        assert_eq!(hex::encode(h), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn tweak_zero_is_plain_sha256() {
        let plain = Sha256::digest(b"hello world");
        let tweaked = tweaked_hash(b"hello world", 0);
        assert_eq!(&plain[..], &tweaked[..]);
    }

    #[test]
    fn tweak_changes_output() {
        let a = tweaked_hash(b"hello world", 0);
        let b = tweaked_hash(b"hello world", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn tweak_only_perturbs_first_byte_before_hashing() {
        let mut manual = b"hello world".to_vec();
        manual[0] = manual[0].wrapping_add(7);
        let expected = Sha256::digest(&manual);
        let actual = tweaked_hash(b"hello world", 7);
        assert_eq!(&expected[..], &actual[..]);
    }
}
