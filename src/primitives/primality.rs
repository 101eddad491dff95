use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use super::random::RandomnessRegistry;

const LOG_TARGET: &str = "svv::primitives::primality";
const MILLER_RABIN_ROUNDS: u32 = 20;
const MILLER_RABIN_SOURCE: &str = "Miller_Rabin";

const SMALL_PRIMES: &[u64] = &[
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101,
];

/// Probabilistic (for large `n`) primality test: small-prime sieve followed
/// by 20 rounds of Miller-Rabin, matching spec.md §4.1.
///
/// Uses the process's `"Miller_Rabin"` named randomness source for witness
/// selection, reinitializing it fresh on every call so that `is_prime` is a
/// pure function of `n` (matching the original prototype's behavior of
/// calling `init_randomness_source("Miller_Rabin")` at the top of every
/// `miller_rabin` invocation).
pub fn is_prime(n: &BigUint) -> bool {
    let small: Vec<BigUint> = SMALL_PRIMES.iter().map(|&p| BigUint::from(p)).collect();
    if small.iter().any(|p| p == n) {
        return true;
    }
    let max_small = BigUint::from(*SMALL_PRIMES.last().unwrap());
    if n < &max_small {
        return false;
    }
    for p in &small {
        if (n % p).is_zero() {
            return false;
        }
    }
    miller_rabin(n, MILLER_RABIN_ROUNDS)
}

fn miller_rabin(n: &BigUint, rounds: u32) -> bool {
    let mut reg = RandomnessRegistry::new();
    reg.init(MILLER_RABIN_SOURCE, None);
    let n_minus_1 = n - BigUint::one();
    for round in 0..rounds {
        let a = reg
            .next_mod(MILLER_RABIN_SOURCE, &n_minus_1)
            .expect("source just initialized")
            + BigUint::one();
        if witness(&a, n) {
            tracing::trace!(target: LOG_TARGET, round, "composite witness found");
            return false;
        }
    }
    true
}

/// Return true if `a` witnesses the compositeness of `n` (CLRS 3e, p. 970).
fn witness(a: &BigUint, n: &BigUint) -> bool {
    let n_minus_1 = n - BigUint::one();
    let mut u = n_minus_1.clone();
    let mut t = 0u32;
    while u.is_even() {
        u /= 2u32;
        t += 1;
    }
    let mut x = vec![a.modpow(&u, n)];
    for _ in 1..=t {
        let prev = x.last().unwrap().clone();
        let cur = (&prev * &prev) % n;
        if cur.is_one() && prev != BigUint::one() && prev != n_minus_1 {
            return true;
        }
        x.push(cur);
    }
    if !x.last().unwrap().is_one() {
        return true;
    }
    false
}

/// Smallest integer strictly greater than `n` that is prime.
pub fn next_prime(n: &BigUint) -> BigUint {
    let mut candidate = n + BigUint::one();
    if candidate <= BigUint::from(2u32) {
        return BigUint::from(2u32);
    }
    if candidate.is_even() {
        candidate += BigUint::one();
    }
    while !is_prime(&candidate) {
        candidate += BigUint::from(2u32);
    }
    tracing::debug!(target: LOG_TARGET, "next_prime found");
    candidate
}

/// Largest integer strictly less than `n` that is prime. Panics if `n <= 2`
/// (there is no prime below 2), matching the original's assertion.
pub fn prev_prime(n: &BigUint) -> BigUint {
    assert!(*n > BigUint::from(2u32), "prev_prime requires n > 2");
    if *n == BigUint::from(3u32) {
        return BigUint::from(2u32);
    }
    let mut candidate = n - BigUint::one();
    if candidate.is_even() {
        candidate -= BigUint::one();
    }
    while !is_prime(&candidate) {
        candidate -= BigUint::from(2u32);
    }
    candidate
}

/// Return `n` if it is already prime, else `next_prime(n)`.
pub fn make_prime(n: &BigUint) -> BigUint {
    if is_prime(n) {
        n.clone()
    } else {
        next_prime(n)
    }
}
