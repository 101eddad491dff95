use num_bigint::BigUint;

use crate::primitives::{commit, RandomnessRegistry};

use super::{Error, Result};

/// Return a random split-value representation of `x`: a pair `(u, v)` with
/// `u + v = x (mod M)`, drawing `u` from the named randomness source.
pub fn sv_pair(
    x: &BigUint,
    rand_name: &str,
    modulus: &BigUint,
    registry: &mut RandomnessRegistry,
) -> Result<(BigUint, BigUint)> {
    if modulus < &BigUint::from(2u32) {
        return Err(Error::ModulusTooSmall(modulus.to_string()));
    }
    let u = registry.next_mod(rand_name, modulus)?;
    let v = if x >= &u {
        (x - &u) % modulus
    } else {
        (modulus + x - &u) % modulus
    };
    Ok((u, v))
}

/// Commit to a split-value pair `(u, v)` with independent randomness keys
/// `ru`, `rv` (each a base64-encoded commitment key). Returns `(Com(u), Com(v))`.
pub fn commit_sv_pair(
    pair: &(BigUint, BigUint),
    ru: &str,
    rv: &str,
) -> std::result::Result<(String, String), crate::primitives::Error> {
    let u_bytes = crate::primitives::int_to_bytes(&pair.0, None);
    let v_bytes = crate::primitives::int_to_bytes(&pair.1, None);
    Ok((commit(&u_bytes, ru)?, commit(&v_bytes, rv)?))
}
