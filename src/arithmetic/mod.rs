//! Modular arithmetic building blocks: split-value pairs, Shamir secret
//! sharing, Lagrange reconstruction, random permutations, and the naming
//! conventions used to index voters, rows, and passes.

mod indexing;
mod permutation;
mod sharing;
mod sv_pair;

pub use indexing::{k_list, p_list, row_list};
pub use permutation::{apply_permutation, inverse_permutation, random_permutation};
pub use sharing::{lagrange, share, Share};
pub use sv_pair::{commit_sv_pair, sv_pair};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("modulus must be >= 2, got {0}")]
    ModulusTooSmall(String),

    #[error("share count n must satisfy 1 < n <= M-1, got n={n}")]
    InvalidShareCount { n: u64 },

    #[error("threshold t must satisfy 1 <= t <= n, got t={t}, n={n}")]
    InvalidThreshold { t: u64, n: u64 },

    #[error("need at least {need} shares to reconstruct, got {have}")]
    NotEnoughShares { need: u64, have: usize },

    #[error("lagrange denominator was zero for share index {0}")]
    NonInvertibleDenominator(u64),

    #[error("row count {0} exceeds the 26 available row labels")]
    RowCountTooLarge(usize),

    #[error("pass count {0} exceeds the 26 available pass labels")]
    PassCountTooLarge(usize),

    #[error(transparent)]
    Randomness(#[from] crate::primitives::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
