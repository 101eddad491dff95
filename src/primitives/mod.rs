//! Cryptographic primitives: tweaked SHA-256, HMAC commitments, bignum/byte
//! conversions, base64/hex, primality testing, and named deterministic
//! randomness sources.
//!
//! This is a deterministic PRG registry seeded by name, suitable for
//! reproducible simulation and testing. It is **not** a source of real
//! entropy: a production deployment must seed each named source from an
//! independent true-random source, ideally living inside the logical node
//! that owns it (spec.md §9, "Global named-randomness table").

mod bignum;
mod commitment;
mod hashing;
mod primality;
mod random;

pub use bignum::{bytes_to_int, int_to_bytes};
pub use commitment::commit;
pub use hashing::tweaked_hash;
pub use primality::{is_prime, make_prime, next_prime, prev_prime};
pub use random::RandomnessRegistry;

use thiserror::Error;

/// Errors raised by the primitives layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("commitment key must be exactly {expected} base64 characters, got {actual}")]
    InvalidCommitmentKeyLength { expected: usize, actual: usize },

    #[error("hash tweak {0} out of range [0, 255]")]
    InvalidTweak(u8),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("unknown randomness source: {0}")]
    UnknownSource(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Bit length of the symmetric/commitment key and hash output (spec.md §4.1).
pub const SECPARAM_SYMMETRIC_BITS: usize = 256;
pub const SECPARAM_HASH_OUTPUT_BITS: usize = 256;

/// Length, in base64 characters, of a commitment key (`r_b64`): `256/6 + 2`.
pub const COMMITMENT_KEY_B64_LEN: usize = SECPARAM_SYMMETRIC_BITS / 6 + 2;
