//! Vote tallying: reconstruct every voter's choice from each pass's final
//! column, cross-check that every pass agrees (a tamper-evident invariant,
//! since an honest mix never changes the underlying multiset of votes), and
//! accumulate the result into per-choice counts.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::arithmetic::{lagrange, Share};
use crate::mix::RaceGrid;
use crate::race::Race;

const LOG_TARGET: &str = "svv::tally";

#[derive(Debug, Error)]
pub enum Error {
    #[error("race {race_id:?}: pass {pass_a} and pass {pass_b} disagree on the tallied choices")]
    PassDisagreement {
        race_id: String,
        pass_a: usize,
        pass_b: usize,
    },

    #[error("race {race_id:?}: choice integer did not decode to a valid choice: {source}")]
    InvalidChoiceEncoding {
        race_id: String,
        #[source]
        source: crate::race::Error,
    },

    #[error(transparent)]
    Arithmetic(#[from] crate::arithmetic::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reconstruct every voter's choice from every pass's output column,
/// verify all passes agree, and return the per-choice tally (write-ins
/// included, keyed by their literal text).
pub fn compute_tally(grid: &RaceGrid, race: &Race, n_voters: usize) -> Result<BTreeMap<String, u64>> {
    let last_col = grid.cols - 1;
    let mut reference: Option<Vec<String>> = None;

    for k in 0..grid.n_reps {
        let mut choice_strs = Vec::with_capacity(n_voters);
        for voter in 0..n_voters {
            let shares: Vec<Share> = (0..grid.rows)
                .map(|row| Share {
                    x: (row + 1) as u64,
                    y: grid.cells[row][last_col].passes[k].y[voter].clone(),
                })
                .collect();
            let choice_int = lagrange(&shares, n_voters as u64, grid.threshold as u64, &race.race_modulus)?;
            let choice_str = race
                .choice_int_to_str(&choice_int)
                .map_err(|source| Error::InvalidChoiceEncoding {
                    race_id: race.race_id.clone(),
                    source,
                })?;
            choice_strs.push(choice_str);
        }
        choice_strs.sort();

        match &reference {
            None => reference = Some(choice_strs),
            Some(expected) if expected == &choice_strs => {}
            Some(_) => {
                return Err(Error::PassDisagreement {
                    race_id: race.race_id.clone(),
                    pass_a: 0,
                    pass_b: k,
                })
            }
        }
    }

    let mut tally: BTreeMap<String, u64> = BTreeMap::new();
    for choice in &race.choices {
        if !choice.chars().all(|c| c == '*') {
            tally.insert(choice.clone(), 0);
        }
    }
    for choice_str in reference.unwrap_or_default() {
        *tally.entry(choice_str).or_insert(0) += 1;
    }

    tracing::debug!(target: LOG_TARGET, race_id = %race.race_id, n_reps = grid.n_reps, "tally computed");
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mix::Mixnet;
    use crate::primitives::RandomnessRegistry;
    use crate::voter::Voter;

    #[test]
    fn tally_counts_match_cast_choices() {
        let mut reg = RandomnessRegistry::new();
        let race = Race::new("taxes", vec!["yes".into(), "no".into()], &mut reg).unwrap();
        let mut net = Mixnet::new(std::slice::from_ref(&race), 0, 0, 2, &mut reg).unwrap();
        let rows = net.rows;
        let threshold = net.threshold;
        let grid = net.grid_mut("taxes").unwrap();

        let n_voters = 6;
        let mut expected: BTreeMap<String, u64> = BTreeMap::new();
        expected.insert("yes".to_string(), 0);
        expected.insert("no".to_string(), 0);
        for v in 0..n_voters {
            let voter = Voter::new(format!("v{v}"), format!("p{v}"), &mut reg);
            let votes = voter.cast_vote(&race, rows, threshold, 20, &mut reg).unwrap();
            grid.deposit_cast_votes(v, votes).unwrap();
        }
        grid.mix(&race, n_voters, &mut reg).unwrap();

        let tally = compute_tally(grid, &race, n_voters).unwrap();
        let total: u64 = tally.values().sum();
        assert_eq!(total, n_voters as u64);
    }
}
