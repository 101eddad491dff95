use num_bigint::BigUint;
use num_traits::Zero;

use crate::primitives::RandomnessRegistry;

use super::{Error, Result};

/// One point `(x, y)` of a Shamir-shared polynomial evaluated mod `M`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Share {
    pub x: u64,
    pub y: BigUint,
}

/// Split `secret` into `n` shares such that any `t` of them reconstruct it
/// and fewer don't, working modulo the prime `modulus`.
///
/// Shares are `(x, f(x))` for `x = 1..=n`, where `f` is a degree-`(t-1)`
/// polynomial with `secret` as its constant term and the remaining
/// coefficients drawn from `rand_name`. Downstream code (the mix network)
/// relies on this exact evaluation scheme: shares are points of one
/// consistent polynomial, not independently-chosen values.
pub fn share(
    secret: &BigUint,
    n: u64,
    t: u64,
    rand_name: &str,
    modulus: &BigUint,
    registry: &mut RandomnessRegistry,
) -> Result<Vec<Share>> {
    if modulus <= &BigUint::from(1u32) {
        return Err(Error::ModulusTooSmall(modulus.to_string()));
    }
    if secret >= modulus {
        return Err(Error::ModulusTooSmall(format!(
            "secret {secret} must be < modulus {modulus}"
        )));
    }
    let m_minus_1 = modulus - BigUint::from(1u32);
    if n <= 1 || BigUint::from(n) > m_minus_1 {
        return Err(Error::InvalidShareCount { n });
    }
    if t < 1 || t > n {
        return Err(Error::InvalidThreshold { t, n });
    }

    let mut coefs = Vec::with_capacity(t as usize);
    coefs.push(secret.clone());
    for _ in 1..t {
        coefs.push(registry.next_mod(rand_name, modulus)?);
    }

    let mut shares = Vec::with_capacity(n as usize);
    for x in 1..=n {
        let x_big = BigUint::from(x);
        let mut y = BigUint::zero();
        for j in (0..t as usize).rev() {
            y = (y * &x_big + &coefs[j]) % modulus;
        }
        shares.push(Share { x, y });
    }
    Ok(shares)
}

/// Reconstruct the secret from (at least) `t` of the `n` shares via Lagrange
/// interpolation at `x = 0`, working modulo the prime `modulus`.
pub fn lagrange(share_list: &[Share], n: u64, t: u64, modulus: &BigUint) -> Result<BigUint> {
    if t < 1 || t > n {
        return Err(Error::InvalidThreshold { t, n });
    }
    if BigUint::from(n) > modulus - BigUint::from(1u32) {
        return Err(Error::InvalidShareCount { n });
    }
    if (share_list.len() as u64) < t {
        return Err(Error::NotEnoughShares {
            need: t,
            have: share_list.len(),
        });
    }
    let shares = &share_list[..t as usize];

    let mut secret = BigUint::zero();
    for i in 0..t as usize {
        let mut numerator = BigUint::from(1u32);
        let mut denominator = BigUint::from(1u32);
        for j in 0..t as usize {
            if i == j {
                continue;
            }
            let xj = BigUint::from(shares[j].x);
            // (-x_j) mod M
            numerator = (numerator * (modulus - &xj)) % modulus;
            let xi = BigUint::from(shares[i].x);
            let diff = if xi >= xj {
                &xi - &xj
            } else {
                modulus - (&xj - &xi)
            };
            denominator = (denominator * diff) % modulus;
        }
        if denominator.is_zero() {
            return Err(Error::NonInvertibleDenominator(shares[i].x));
        }
        let exponent = modulus - BigUint::from(2u32);
        let denom_inv = denominator.modpow(&exponent, modulus);
        debug_assert_eq!((&denominator * &denom_inv) % modulus, BigUint::from(1u32));
        secret = (secret + &shares[i].y * &numerator * &denom_inv) % modulus;
    }
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_matches_golden_vector() {
        let mut reg = RandomnessRegistry::new();
        reg.init("test_share", None);
        let m = BigUint::from(11u32);
        let shares = share(&BigUint::from(3u32), 5, 3, "test_share", &m, &mut reg).unwrap();
        let expected: [(u64, u32); 5] = [(1, 1), (2, 9), (3, 5), (4, 0), (5, 5)];
        for (s, (x, y)) in shares.iter().zip(expected) {
            assert_eq!(s.x, x);
            assert_eq!(s.y, BigUint::from(y));
        }
    }

    #[test]
    fn lagrange_round_trips_with_first_t_shares() {
        let mut reg = RandomnessRegistry::new();
        reg.init("test_lagrange", None);
        let m = BigUint::from(11u32);
        let secret = BigUint::from(3u32);
        let shares = share(&secret, 5, 3, "test_lagrange", &m, &mut reg).unwrap();
        assert_eq!(lagrange(&shares, 5, 3, &m).unwrap(), secret);
    }

    #[test]
    fn lagrange_round_trips_with_last_t_shares_reversed() {
        let mut reg = RandomnessRegistry::new();
        reg.init("test_lagrange", None);
        let m = BigUint::from(11u32);
        let secret = BigUint::from(3u32);
        let mut shares = share(&secret, 5, 3, "test_lagrange", &m, &mut reg).unwrap();
        shares.reverse();
        assert_eq!(lagrange(&shares, 5, 3, &m).unwrap(), secret);
    }

    #[test]
    fn rejects_too_few_shares() {
        let mut reg = RandomnessRegistry::new();
        reg.init("s", None);
        let m = BigUint::from(11u32);
        let shares = share(&BigUint::from(3u32), 5, 3, "s", &m, &mut reg).unwrap();
        let err = lagrange(&shares[..2], 5, 3, &m).unwrap_err();
        assert!(matches!(err, Error::NotEnoughShares { .. }));
    }
}
