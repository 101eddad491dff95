//! The mix-server grid: a `rows x cols` array of servers that secret-shared
//! ballots flow through left to right, each column permuting and additively
//! re-randomizing ("fuzzing") every race's shares, replicated across
//! `n_reps` independent passes for the later cut-and-choose proof.

use std::collections::BTreeMap;

use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;

use crate::arithmetic::{apply_permutation, random_permutation, row_list, share};
use crate::primitives::{self, RandomnessRegistry};
use crate::race::Race;
use crate::voter::CastVote;

const LOG_TARGET: &str = "svv::mix";

#[derive(Debug, Error)]
pub enum Error {
    #[error("row count {0} exceeds 26 available row labels")]
    RowCountTooLarge(usize),

    #[error("n_reps must be even and positive, got {0}")]
    PassCountInvalid(usize),

    #[error("race {0:?} is not part of this grid")]
    UnknownRace(String),

    #[error("expected {expected} cast votes for race {race_id:?} voter {voter}, got {actual}")]
    RowCountMismatch {
        race_id: String,
        voter: usize,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Arithmetic(#[from] crate::arithmetic::Error),

    #[error(transparent)]
    Randomness(#[from] primitives::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Plaintext column-0 state for one row: the shares (and split-value pairs)
/// voters deposited directly, one entry per voter position.
#[derive(Debug, Clone, Default)]
pub struct Column0 {
    pub ballot_id: Vec<String>,
    pub x: Vec<BigUint>,
    pub u: Vec<BigUint>,
    pub v: Vec<BigUint>,
    pub ru: Vec<String>,
    pub rv: Vec<String>,
    pub cu: Vec<String>,
    pub cv: Vec<String>,
}

/// One pass's (permute, fuzz) state for a single `(row, col)` cell.
#[derive(Debug, Clone, Default)]
pub struct PassCell {
    pub pi: Vec<usize>,
    pub pi_inv: Vec<usize>,
    pub fuzz: Vec<BigUint>,
    pub x: Vec<BigUint>,
    pub y: Vec<BigUint>,
}

/// A single `(row, col)` mix-server cell: one [`PassCell`] per replicated
/// pass, plus the randomness-source name owning all draws at this cell.
#[derive(Debug, Clone)]
pub struct Cell {
    pub rand_name: String,
    pub passes: Vec<PassCell>,
}

/// The full grid for one race: `rows x cols` cells, `n_reps` passes each.
pub struct RaceGrid {
    pub race_id: String,
    pub rows: usize,
    pub cols: usize,
    pub threshold: usize,
    pub n_reps: usize,
    pub column0: Vec<Column0>,
    pub cells: Vec<Vec<Cell>>,
}

impl RaceGrid {
    pub fn new(race_id: &str, rows: usize, cols: usize, threshold: usize, n_reps: usize, registry: &mut RandomnessRegistry) -> Result<Self> {
        let row_labels = row_list(rows).map_err(|_| Error::RowCountTooLarge(rows))?;
        if n_reps == 0 || n_reps % 2 != 0 {
            return Err(Error::PassCountInvalid(n_reps));
        }
        let mut cells = Vec::with_capacity(rows);
        for row_label in &row_labels {
            let mut row_cells = Vec::with_capacity(cols);
            for col in 0..cols {
                let rand_name = format!("server:{race_id}:{row_label}:{col}");
                registry.init(&rand_name, None);
                row_cells.push(Cell {
                    rand_name,
                    passes: vec![PassCell::default(); n_reps],
                });
            }
            cells.push(row_cells);
        }
        Ok(RaceGrid {
            race_id: race_id.to_string(),
            rows,
            cols,
            threshold,
            n_reps,
            column0: vec![Column0::default(); rows],
            cells,
        })
    }

    /// Place one voter's per-row cast-vote shares into column 0.
    pub fn deposit_cast_votes(&mut self, voter_index: usize, votes: Vec<CastVote>) -> Result<()> {
        if votes.len() != self.rows {
            return Err(Error::RowCountMismatch {
                race_id: self.race_id.clone(),
                voter: voter_index,
                expected: self.rows,
                actual: votes.len(),
            });
        }
        for (row, vote) in votes.into_iter().enumerate() {
            let col0 = &mut self.column0[row];
            grow_to(&mut col0.ballot_id, voter_index);
            grow_to(&mut col0.x, voter_index);
            grow_to(&mut col0.u, voter_index);
            grow_to(&mut col0.v, voter_index);
            grow_to(&mut col0.ru, voter_index);
            grow_to(&mut col0.rv, voter_index);
            grow_to(&mut col0.cu, voter_index);
            grow_to(&mut col0.cv, voter_index);
            col0.ballot_id[voter_index] = vote.ballot_id;
            col0.x[voter_index] = vote.x;
            col0.u[voter_index] = vote.u;
            col0.v[voter_index] = vote.v;
            col0.ru[voter_index] = vote.ru;
            col0.rv[voter_index] = vote.rv;
            col0.cu[voter_index] = vote.cu;
            col0.cv[voter_index] = vote.cv;
        }
        Ok(())
    }

    /// Run the full 2D mix: permute-and-fuzz every column, left to right,
    /// independently for every one of the `n_reps` passes.
    pub fn mix(&mut self, race: &Race, n_voters: usize, registry: &mut RandomnessRegistry) -> Result<()> {
        // Column 0's plaintext x's seed every pass's input.
        for row in 0..self.rows {
            let x = self.column0[row].x.clone();
            for k in 0..self.n_reps {
                self.cells[row][0].passes[k].x = x.clone();
            }
        }

        for col in 0..self.cols {
            let rand_name = self.cells[0][col].rand_name.clone();

            let mut pis = Vec::with_capacity(self.n_reps);
            for _ in 0..self.n_reps {
                let pi = random_permutation(n_voters, &rand_name, registry)?;
                let pi_inv = crate::arithmetic::inverse_permutation(&pi);
                pis.push((pi, pi_inv));
            }
            for row in 0..self.rows {
                for (k, (pi, pi_inv)) in pis.iter().enumerate() {
                    self.cells[row][col].passes[k].pi = pi.clone();
                    self.cells[row][col].passes[k].pi_inv = pi_inv.clone();
                }
            }

            let mut fuzz_lists = vec![vec![Vec::with_capacity(n_voters); self.rows]; self.n_reps];
            for k in 0..self.n_reps {
                for _ in 0..n_voters {
                    let shares = share(
                        &BigUint::zero(),
                        self.rows as u64,
                        self.threshold as u64,
                        &rand_name,
                        &race.race_modulus,
                        registry,
                    )?;
                    for (row, s) in shares.iter().enumerate() {
                        fuzz_lists[k][row].push(s.y.clone());
                    }
                }
            }
            for row in 0..self.rows {
                for k in 0..self.n_reps {
                    self.cells[row][col].passes[k].fuzz = fuzz_lists[k][row].clone();
                }
            }

            for row in 0..self.rows {
                for k in 0..self.n_reps {
                    let pass = &self.cells[row][col].passes[k];
                    let xp = apply_permutation(&pass.pi, &pass.x);
                    let mut y = Vec::with_capacity(n_voters);
                    for v in 0..n_voters {
                        y.push((&xp[v] + &pass.fuzz[v]) % &race.race_modulus);
                    }
                    self.cells[row][col].passes[k].y = y.clone();
                    if col < self.cols - 1 {
                        self.cells[row][col + 1].passes[k].x = y;
                    }
                }
            }
        }

        tracing::debug!(target: LOG_TARGET, race_id = %self.race_id, rows = self.rows, cols = self.cols, n_reps = self.n_reps, "mix complete");
        Ok(())
    }
}

fn grow_to<T: Default + Clone>(v: &mut Vec<T>, index: usize) {
    if v.len() <= index {
        v.resize(index + 1, T::default());
    }
}

/// Grids for every race in an election, keyed by race id.
pub struct Mixnet {
    pub races: BTreeMap<String, RaceGrid>,
    pub rows: usize,
    pub cols: usize,
    pub threshold: usize,
}

impl Mixnet {
    /// Compute `(rows, cols, threshold)` from `n_fail`/`n_leak` exactly as
    /// the original: with no tolerated server failure, one row/column
    /// suffices (plus leak-tolerance replicas); tolerating failures adds two
    /// extra rows so reconstruction survives both a failure and a leak.
    pub fn dimensions(n_fail: usize, n_leak: usize) -> (usize, usize, usize) {
        if n_fail > 0 {
            (2 + n_fail + n_leak, 1 + n_leak, 2 + n_leak)
        } else {
            (1 + n_leak, 1 + n_leak, 1 + n_leak)
        }
    }

    pub fn new(races: &[Race], n_fail: usize, n_leak: usize, n_reps: usize, registry: &mut RandomnessRegistry) -> Result<Self> {
        let (rows, cols, threshold) = Self::dimensions(n_fail, n_leak);
        let mut grids = BTreeMap::new();
        for race in races {
            let grid = RaceGrid::new(&race.race_id, rows, cols, threshold, n_reps, registry)?;
            grids.insert(race.race_id.clone(), grid);
        }
        Ok(Mixnet {
            races: grids,
            rows,
            cols,
            threshold,
        })
    }

    pub fn grid(&self, race_id: &str) -> Result<&RaceGrid> {
        self.races.get(race_id).ok_or_else(|| Error::UnknownRace(race_id.to_string()))
    }

    pub fn grid_mut(&mut self, race_id: &str) -> Result<&mut RaceGrid> {
        self.races.get_mut(race_id).ok_or_else(|| Error::UnknownRace(race_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voter::Voter;

    fn setup(n_voters: usize, n_fail: usize, n_leak: usize, n_reps: usize) -> (Race, Mixnet, RandomnessRegistry, usize) {
        let mut reg = RandomnessRegistry::new();
        let race = Race::new("taxes", vec!["yes".into(), "no".into()], &mut reg).unwrap();
        let net = Mixnet::new(std::slice::from_ref(&race), n_fail, n_leak, n_reps, &mut reg).unwrap();
        (race, net, reg, n_voters)
    }

    #[test]
    fn dimensions_match_original_formula() {
        assert_eq!(Mixnet::dimensions(0, 0), (1, 1, 1));
        assert_eq!(Mixnet::dimensions(0, 1), (2, 2, 2));
        assert_eq!(Mixnet::dimensions(1, 1), (4, 2, 3));
    }

    #[test]
    fn mix_preserves_the_multiset_of_choices() {
        let (race, mut net, mut reg, n_voters) = setup(4, 1, 1, 2);
        let rows = net.rows;
        let threshold = net.threshold;
        let grid = net.grid_mut("taxes").unwrap();

        let mut choices = Vec::new();
        for v in 0..n_voters {
            let voter = Voter::new(format!("v{v}"), format!("p{v}"), &mut reg);
            let votes = voter.cast_vote(&race, rows, threshold, 20, &mut reg).unwrap();
            let shares: Vec<_> = votes
                .iter()
                .enumerate()
                .map(|(i, cv)| crate::arithmetic::Share { x: (i + 1) as u64, y: cv.x.clone() })
                .collect();
            let reconstructed = crate::arithmetic::lagrange(&shares, rows as u64, threshold as u64, &race.race_modulus).unwrap();
            choices.push(reconstructed);
            grid.deposit_cast_votes(v, votes).unwrap();
        }

        grid.mix(&race, n_voters, &mut reg).unwrap();

        for k in 0..grid.n_reps {
            let mut out_choices: Vec<BigUint> = Vec::new();
            for v in 0..n_voters {
                let shares: Vec<_> = (0..rows)
                    .map(|row| crate::arithmetic::Share {
                        x: (row + 1) as u64,
                        y: grid.cells[row][grid.cols - 1].passes[k].y[v].clone(),
                    })
                    .collect();
                out_choices.push(crate::arithmetic::lagrange(&shares, rows as u64, threshold as u64, &race.race_modulus).unwrap());
            }
            let mut expected_sorted = choices.clone();
            let mut actual_sorted = out_choices.clone();
            expected_sorted.sort();
            actual_sorted.sort();
            assert_eq!(expected_sorted, actual_sorted, "pass {k} did not preserve the multiset of votes");
        }
    }
}
