//! Top-level orchestration: turn a declared ballot style and a handful of
//! simulation parameters into a fully cast, mixed, tallied, and proven
//! election, posted entry by entry to a [`Sbb`].

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::arithmetic::p_list;
use crate::mix::Mixnet;
use crate::primitives::{self, RandomnessRegistry};
use crate::prover;
use crate::race::Race;
use crate::sbb::Sbb;
use crate::tally::{self, compute_tally};
use crate::voter::Voter;

const LOG_TARGET: &str = "svv::election";

#[derive(Debug, Error)]
pub enum Error {
    #[error("election parameters invalid: {0}")]
    InvalidParameters(String),

    #[error(transparent)]
    Race(#[from] crate::race::Error),

    #[error(transparent)]
    Voter(#[from] crate::voter::Error),

    #[error(transparent)]
    Arithmetic(#[from] crate::arithmetic::Error),

    #[error(transparent)]
    Mix(#[from] crate::mix::Error),

    #[error(transparent)]
    Tally(#[from] tally::Error),

    #[error(transparent)]
    Prover(#[from] prover::Error),

    #[error(transparent)]
    Sbb(#[from] crate::sbb::Error),

    #[error(transparent)]
    Randomness(#[from] primitives::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// One race's declared choices, in ballot-style order.
pub type BallotStyle = Vec<(String, Vec<String>)>;

/// The full set of inputs needed to run a simulated election, mirroring the
/// `election_id.parameters.txt` JSON file the original reads from disk.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ElectionParameters {
    pub election_id: String,
    pub ballot_style: BallotStyle,
    pub n_voters: usize,
    pub n_reps: usize,
    pub n_fail: usize,
    pub n_leak: usize,
    #[serde(default = "default_ballot_id_len")]
    pub ballot_id_len: usize,
    #[serde(default)]
    pub json_indent: usize,
}

fn default_ballot_id_len() -> usize {
    32
}

impl ElectionParameters {
    /// The parameters `sv_main.py` falls back to when no `election_id` is
    /// given on the command line: a 3-voter, 2-race demo election.
    pub fn default_election() -> Self {
        ElectionParameters {
            election_id: "default_election".to_string(),
            ballot_style: vec![
                ("taxes".to_string(), vec!["yes".to_string(), "no".to_string()]),
                (
                    "mayor".to_string(),
                    vec!["tom".to_string(), "rufus".to_string(), "*".repeat(16)],
                ),
            ],
            n_voters: 3,
            n_reps: 4,
            n_fail: 1,
            n_leak: 1,
            ballot_id_len: 32,
            json_indent: 1,
        }
    }

    /// Validate every invariant the original enforces with `assert`, before
    /// any SBB entry is posted.
    pub fn validate(&self) -> Result<()> {
        if self.election_id.is_empty() {
            return Err(Error::InvalidParameters("election_id must be non-empty".to_string()));
        }
        if self.ballot_style.is_empty() {
            return Err(Error::InvalidParameters("ballot_style must declare at least one race".to_string()));
        }
        if self.n_voters == 0 {
            return Err(Error::InvalidParameters("n_voters must be positive".to_string()));
        }
        if self.n_reps == 0 || self.n_reps > 26 || self.n_reps % 2 != 0 {
            return Err(Error::InvalidParameters(format!(
                "n_reps must be even and in 1..=26, got {}",
                self.n_reps
            )));
        }
        if self.ballot_id_len == 0 {
            return Err(Error::InvalidParameters("ballot_id_len must be positive".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        for (race_id, _) in &self.ballot_style {
            if !seen.insert(race_id) {
                return Err(Error::InvalidParameters(format!("duplicate race_id {race_id:?}")));
            }
        }
        Ok(())
    }
}

/// A fully wired simulated election: races, voters, a mix-server grid per
/// race, and the bulletin board everything gets posted to.
pub struct Election {
    pub params: ElectionParameters,
    pub sbb: Sbb,
    pub races: Vec<Race>,
    pub voters: Vec<Voter>,
    pub net: Mixnet,
    registry: RandomnessRegistry,
}

impl Election {
    /// Set up a new election: open the bulletin board, build every race and
    /// voter, and size the mix-server grid. Casting, mixing, tallying, and
    /// proving happen in [`Election::run`].
    pub fn new(params: ElectionParameters) -> Result<Self> {
        params.validate()?;

        let mut registry = RandomnessRegistry::new();
        let mut sbb = Sbb::open(params.election_id.clone())?;
        sbb.post(
            "setup:start",
            as_map(json!({
                "about": [
                    "Secure Bulletin Board for Split-Value Voting Method Demo.",
                    "by Michael O. Rabin and Ronald L. Rivest",
                ],
                "election_id": params.election_id,
                "legend": [
                    "Indices between 0 and n_voters-1 indicated by p0, p1, ...",
                    "Rows of server array indicated by a, b, c, d, ...",
                    "Copies (n_reps = 2m passes) indicated by A, B, C, D, ...",
                    "'x' (or 'y') equals u+v (mod race_modulus), and is a share of the vote.",
                    "'icl' stands for 'input comparison list', 'opl' for 'output production list'.",
                ],
            })),
            true,
        )?;

        let mut races = Vec::with_capacity(params.ballot_style.len());
        for (race_id, choices) in &params.ballot_style {
            races.push(Race::new(race_id.clone(), choices.clone(), &mut registry)?);
        }
        let race_list: Vec<Value> = races
            .iter()
            .map(|race| {
                json!({
                    "race_id": race.race_id,
                    "choices": race.choices,
                    "race_modulus": race.race_modulus.to_string(),
                })
            })
            .collect();
        sbb.post(
            "setup:races",
            as_map(json!({ "ballot_style_race_list": race_list })),
            false,
        )?;

        let px = p_list(params.n_voters);
        let mut voters = Vec::with_capacity(params.n_voters);
        for (i, px) in px.into_iter().enumerate() {
            voters.push(Voter::new(format!("voter:{i}"), px, &mut registry));
        }
        sbb.post(
            "setup:voters",
            as_map(json!({ "n_voters": params.n_voters, "ballot_id_len": params.ballot_id_len })),
            false,
        )?;

        let net = Mixnet::new(&races, params.n_fail, params.n_leak, params.n_reps, &mut registry)?;
        sbb.post(
            "setup:server-array",
            as_map(json!({
                "rows": net.rows,
                "cols": net.cols,
                "n_reps": params.n_reps,
                "threshold": net.threshold,
            })),
            false,
        )?;

        sbb.post("setup:finished", None, false)?;

        tracing::debug!(
            target: LOG_TARGET,
            election_id = %params.election_id,
            n_voters = params.n_voters,
            n_races = races.len(),
            "election set up"
        );

        Ok(Election {
            params,
            sbb,
            races,
            voters,
            net,
            registry,
        })
    }

    /// Cast, mix, tally, and prove: the full election lifecycle, ending with
    /// a closed bulletin board.
    pub fn run(&mut self) -> Result<()> {
        self.cast_votes()?;
        self.mix()?;
        self.tally()?;
        self.prove()?;

        self.sbb.post(
            "election:done.",
            as_map(json!({ "election_id": self.params.election_id })),
            true,
        )?;
        self.sbb.close()?;
        Ok(())
    }

    fn cast_votes(&mut self) -> Result<()> {
        for race in &self.races {
            let grid = self.net.grid_mut(&race.race_id)?;
            for (i, voter) in self.voters.iter().enumerate() {
                let votes = voter.cast_vote(race, grid.rows, grid.threshold, self.params.ballot_id_len, &mut self.registry)?;
                grid.deposit_cast_votes(i, votes)?;
            }
            let cast_votes_view: Vec<Vec<Value>> = (0..grid.rows)
                .map(|row| {
                    let col0 = &grid.column0[row];
                    (0..self.voters.len())
                        .map(|voter| {
                            json!({
                                "ballot_id": col0.ballot_id[voter],
                                "cu": col0.cu[voter],
                                "cv": col0.cv[voter],
                            })
                        })
                        .collect()
                })
                .collect();
            self.sbb.post(
                "casting:votes",
                as_map(json!({ "race_id": race.race_id, "cast_votes": cast_votes_view })),
                true,
            )?;
        }
        Ok(())
    }

    fn mix(&mut self) -> Result<()> {
        for race in &self.races {
            let grid = self.net.grid_mut(&race.race_id)?;
            grid.mix(race, self.voters.len(), &mut self.registry)?;
        }
        Ok(())
    }

    fn tally(&mut self) -> Result<()> {
        for race in &self.races {
            let grid = self.net.grid(&race.race_id)?;
            let counts = compute_tally(grid, race, self.voters.len())?;
            let counts_json: Map<String, Value> = counts
                .into_iter()
                .map(|(choice, n)| (choice, Value::from(n)))
                .collect();
            self.sbb.post(
                "tally:results",
                as_map(json!({ "race_id": race.race_id, "tally": counts_json })),
                true,
            )?;
            tracing::debug!(target: LOG_TARGET, race_id = %race.race_id, "tally posted");
        }
        Ok(())
    }

    fn prove(&mut self) -> Result<()> {
        prover::make_proof(&mut self.sbb, &self.races, &self.net, self.voters.len(), &mut self.registry)?;
        Ok(())
    }
}

fn as_map(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_parameters() -> ElectionParameters {
        ElectionParameters {
            election_id: "test_election".to_string(),
            ballot_style: vec![("taxes".to_string(), vec!["yes".to_string(), "no".to_string()])],
            n_voters: 3,
            n_reps: 2,
            n_fail: 0,
            n_leak: 0,
            ballot_id_len: 8,
            json_indent: 0,
        }
    }

    #[test]
    fn rejects_odd_n_reps() {
        let mut params = small_parameters();
        params.n_reps = 3;
        assert!(matches!(params.validate(), Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn rejects_duplicate_race_ids() {
        let mut params = small_parameters();
        params.ballot_style.push(("taxes".to_string(), vec!["x".to_string(), "y".to_string()]));
        assert!(matches!(params.validate(), Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn runs_a_small_election_end_to_end() {
        let mut election = Election::new(small_parameters()).unwrap();
        election.run().unwrap();
        assert!(election.sbb.is_closed());
        assert!(election.sbb.entries().iter().any(|e| e.header == "sbb:open"));
        assert!(election.sbb.entries().iter().any(|e| e.header == "proof:pik_list" || e.header.starts_with("proof:")));
    }

    #[test]
    fn default_election_parameters_validate() {
        ElectionParameters::default_election().validate().unwrap();
    }
}
