//! Voter-side ballot casting: choosing (or, in simulation, randomly
//! generating) a choice, secret-sharing it across the mix server grid's
//! rows, and split-value-committing each share.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use num_bigint::BigUint;
use thiserror::Error;

use crate::arithmetic::{commit_sv_pair, lagrange, share, sv_pair};
use crate::primitives::{self, RandomnessRegistry};
use crate::race::Race;

const LOG_TARGET: &str = "svv::voter";

#[derive(Debug, Error)]
pub enum Error {
    #[error("secret-shared choice did not reconstruct to the original choice")]
    ShareReconstructionMismatch,

    #[error(transparent)]
    Arithmetic(#[from] crate::arithmetic::Error),

    #[error(transparent)]
    Race(#[from] crate::race::Error),

    #[error(transparent)]
    Randomness(#[from] primitives::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// One row's worth of a cast vote: the split-value pair for that row's
/// share, each half committed with independently-drawn randomness.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CastVote {
    pub ballot_id: String,
    pub x: BigUint,
    pub u: BigUint,
    pub v: BigUint,
    pub ru: String,
    pub rv: String,
    pub cu: String,
    pub cv: String,
}

pub struct Voter {
    pub voter_id: String,
    pub px: String,
    pub rand_name: String,
}

impl Voter {
    pub fn new(voter_id: impl Into<String>, px: impl Into<String>, registry: &mut RandomnessRegistry) -> Self {
        let voter_id = voter_id.into();
        let rand_name = format!("voter:{voter_id}");
        registry.init(&rand_name, None);
        Voter {
            voter_id,
            px: px.into(),
            rand_name,
        }
    }

    /// Cast a (simulated, randomly-chosen) vote for `race`, returning one
    /// [`CastVote`] per grid row, indices `1..=rows` stripped off since they
    /// equal `row + 1` by construction of [`share`].
    pub fn cast_vote(
        &self,
        race: &Race,
        rows: usize,
        threshold: usize,
        ballot_id_len: usize,
        registry: &mut RandomnessRegistry,
    ) -> Result<Vec<CastVote>> {
        let choice_str = race.random_choice(registry)?;
        let choice_int = race.choice_str_to_int(&choice_str)?;

        let ballot_id_bytes = registry.next_bytes(&self.rand_name)?;
        let ballot_id: String = hex::encode(ballot_id_bytes)
            .chars()
            .take(ballot_id_len)
            .collect();

        let share_list = share(
            &choice_int,
            rows as u64,
            threshold as u64,
            &self.rand_name,
            &race.race_modulus,
            registry,
        )?;

        if lagrange(&share_list, rows as u64, threshold as u64, &race.race_modulus)? != choice_int {
            return Err(Error::ShareReconstructionMismatch);
        }
        for (row, s) in share_list.iter().enumerate() {
            debug_assert_eq!(s.x, (row + 1) as u64);
        }

        let mut votes = Vec::with_capacity(rows);
        for s in &share_list {
            let (u, v) = sv_pair(&s.y, &self.rand_name, &race.race_modulus, registry)?;
            let ru = STANDARD.encode(registry.next_bytes(&self.rand_name)?);
            let rv = STANDARD.encode(registry.next_bytes(&self.rand_name)?);
            let (cu, cv) = commit_sv_pair(&(u.clone(), v.clone()), &ru, &rv)?;
            votes.push(CastVote {
                ballot_id: ballot_id.clone(),
                x: s.y.clone(),
                u,
                v,
                ru,
                rv,
                cu,
                cv,
            });
        }

        tracing::debug!(target: LOG_TARGET, voter_id = %self.voter_id, race_id = %race.race_id, "cast vote");
        Ok(votes)
    }
}
