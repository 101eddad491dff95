use num_bigint::BigUint;
use num_traits::Zero;

/// Convert a non-negative bignum to little-endian bytes.
///
/// With `desired_length = None`, returns the minimal-length representation
/// (zero encodes as a single zero byte). With `desired_length = Some(n)`,
/// zero-pads or truncates high-order bytes to exactly `n` bytes.
pub fn int_to_bytes(x: &BigUint, desired_length: Option<usize>) -> Vec<u8> {
    let mut bytes = x.to_bytes_le();
    match desired_length {
        None => {
            if bytes.is_empty() {
                bytes.push(0);
            }
            bytes
        }
        Some(n) => {
            bytes.resize(n, 0);
            bytes
        }
    }
}

/// Convert little-endian bytes to a bignum (first byte is least-significant).
pub fn bytes_to_int(x: &[u8]) -> BigUint {
    if x.is_empty() {
        return BigUint::zero();
    }
    BigUint::from_bytes_le(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_minimal_length() {
        let x = BigUint::from(134827781332u64);
        let bytes = int_to_bytes(&x, None);
        assert_eq!(bytes_to_int(&bytes), x);
    }

    #[test]
    fn zero_is_one_zero_byte() {
        assert_eq!(int_to_bytes(&BigUint::zero(), None), vec![0u8]);
    }

    #[test]
    fn fixed_length_pads_and_truncates() {
        let x = BigUint::from(513u32); // 0x0201 -> LE bytes [1, 2]
        assert_eq!(int_to_bytes(&x, Some(4)), vec![1, 2, 0, 0]);
        assert_eq!(int_to_bytes(&x, Some(1)), vec![1]); // truncates high byte
    }

    #[test]
    fn bytes_to_int_little_endian() {
        assert_eq!(bytes_to_int(&[1, 2]), BigUint::from(513u32));
    }
}
