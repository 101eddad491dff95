//! Proof production: commit to every pass's output, trace each cast vote's
//! `(u, v)` halves through the mix to compute t-values, derive Fiat-Shamir
//! cut-and-choose and left/right challenges from the transcript hash, then
//! open exactly the commitments the challenges call for.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use num_bigint::BigUint;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Map;
use thiserror::Error;

use crate::arithmetic::{commit_sv_pair, random_permutation, sv_pair};
use crate::mix::{Mixnet, RaceGrid};
use crate::primitives::{self, RandomnessRegistry};
use crate::race::Race;
use crate::sbb::Sbb;

const LOG_TARGET: &str = "svv::prover";
const CHALLENGE_SOURCE: &str = "verifier_challenges";

#[derive(Debug, Error)]
pub enum Error {
    #[error("race {0:?} is missing from the mix grid")]
    MissingRace(String),

    #[error(transparent)]
    Arithmetic(#[from] crate::arithmetic::Error),

    #[error(transparent)]
    Mix(#[from] crate::mix::Error),

    #[error(transparent)]
    Randomness(#[from] primitives::Error),

    #[error(transparent)]
    Sbb(#[from] crate::sbb::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Serialize)]
pub struct OutputCommitment {
    pub y: BigUint,
    pub u: BigUint,
    pub v: BigUint,
    pub ru: String,
    pub rv: String,
    pub cu: String,
    pub cv: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitmentPair {
    pub cu: String,
    pub cv: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TValue {
    pub tu: BigUint,
    pub tv: BigUint,
}

/// `outputs[race_id][pass][row][voter]`.
pub type Outputs = BTreeMap<String, Vec<Vec<Vec<OutputCommitment>>>>;
/// `t_values[race_id][pass][row][voter]`.
pub type TValues = BTreeMap<String, Vec<Vec<Vec<TValue>>>>;

#[derive(Debug, Clone)]
pub struct Challenges {
    /// Pass indices opened for output-production comparison.
    pub opl: Vec<usize>,
    /// Pass indices used for input-consistency (cut-and-choose) proof.
    pub icl: Vec<usize>,
    /// `true` = left (reveal the `u` half), `false` = right (reveal `v`).
    pub leftright: BTreeMap<String, Vec<bool>>,
}

/// Compose `pi_inv` across every column, starting from input position `px`
/// (column 0), to find the position the same vote lands at in pass `k`'s
/// final-column output. Shared by t-value computation, output-opening, and
/// the `pik` map, since all three need the same input-to-output trace.
fn trace_forward(grid: &RaceGrid, k: usize, px: usize) -> usize {
    let mut py = px;
    for col in 0..grid.cols {
        py = grid.cells[0][col].passes[k].pi_inv[py];
    }
    py
}

/// Commit to every pass's final-column output shares.
pub fn make_full_output(races: &[Race], net: &Mixnet, n_voters: usize, registry: &mut RandomnessRegistry) -> Result<Outputs> {
    let mut outputs = Outputs::new();
    for race in races {
        let grid = net.grid(&race.race_id)?;
        let last_col = grid.cols - 1;
        let mut per_pass = Vec::with_capacity(grid.n_reps);
        for k in 0..grid.n_reps {
            let mut per_row = Vec::with_capacity(grid.rows);
            for row in 0..grid.rows {
                let rand_name = grid.cells[row][last_col].rand_name.clone();
                let mut per_voter = Vec::with_capacity(n_voters);
                for voter in 0..n_voters {
                    let y = grid.cells[row][last_col].passes[k].y[voter].clone();
                    let (u, v) = sv_pair(&y, &rand_name, &race.race_modulus, registry)?;
                    let ru = STANDARD.encode(registry.next_bytes(&rand_name)?);
                    let rv = STANDARD.encode(registry.next_bytes(&rand_name)?);
                    let (cu, cv) = commit_sv_pair(&(u.clone(), v.clone()), &ru, &rv)?;
                    per_voter.push(OutputCommitment { y, u, v, ru, rv, cu, cv });
                }
                per_row.push(per_voter);
            }
            per_pass.push(per_row);
        }
        outputs.insert(race.race_id.clone(), per_pass);
    }
    tracing::debug!(target: LOG_TARGET, races = races.len(), "full output committed");
    Ok(outputs)
}

pub fn post_output_commitments(sbb: &mut Sbb, outputs: &Outputs) -> Result<()> {
    // Stripping secrets down to (cu, cv) pairs is pure, independent work per
    // race; races mix independently, so there is no shared-state hazard.
    let entries: Vec<(&String, Vec<Vec<Vec<CommitmentPair>>>)> = outputs
        .par_iter()
        .map(|(race_id, per_pass)| {
            let view = per_pass
                .par_iter()
                .map(|per_row| {
                    per_row
                        .iter()
                        .map(|per_voter| {
                            per_voter
                                .iter()
                                .map(|oc| CommitmentPair { cu: oc.cu.clone(), cv: oc.cv.clone() })
                                .collect()
                        })
                        .collect()
                })
                .collect();
            (race_id, view)
        })
        .collect();
    let coms: BTreeMap<&String, Vec<Vec<Vec<CommitmentPair>>>> = entries.into_iter().collect();
    let mut payload = Map::new();
    payload.insert("commitments".to_string(), serde_json::to_value(&coms)?);
    sbb.post("proof:output_commitments", Some(payload), false)?;
    Ok(())
}

/// Trace every cast vote's `(u, v)` halves from column 0 through to the
/// final column of every pass, recording the additive difference (`t`
/// value). An honest mix yields `(tu, tv)` that Lagrange-combine to a pair
/// of the form `(t, -t)`; the verifier checks this without ever learning the
/// vote itself.
pub fn compute_and_post_t_values(sbb: &mut Sbb, races: &[Race], net: &Mixnet, outputs: &Outputs, n_voters: usize) -> Result<TValues> {
    let mut t_values = TValues::new();
    for race in races {
        let grid = net.grid(&race.race_id)?;
        let per_race_outputs = outputs
            .get(&race.race_id)
            .ok_or_else(|| Error::MissingRace(race.race_id.clone()))?;
        let mut per_pass = Vec::with_capacity(grid.n_reps);
        for k in 0..grid.n_reps {
            let mut per_row = Vec::with_capacity(grid.rows);
            for row in 0..grid.rows {
                let mut per_voter = Vec::with_capacity(n_voters);
                for px in 0..n_voters {
                    let ux = &grid.column0[row].u[px];
                    let vx = &grid.column0[row].v[px];
                    let py = trace_forward(grid, k, px);
                    let uy = &per_race_outputs[k][row][py].u;
                    let vy = &per_race_outputs[k][row][py].v;
                    let tu = if uy >= ux { uy - ux } else { &race.race_modulus + uy - ux } % &race.race_modulus;
                    let tv = if vy >= vx { vy - vx } else { &race.race_modulus + vy - vx } % &race.race_modulus;
                    per_voter.push(TValue { tu, tv });
                }
                per_row.push(per_voter);
            }
            per_pass.push(per_row);
        }
        t_values.insert(race.race_id.clone(), per_pass);
    }
    let mut payload = Map::new();
    payload.insert("t_values".to_string(), serde_json::to_value(&t_values)?);
    sbb.post("proof:output_commitment_t_values", Some(payload), false)?;
    Ok(t_values)
}

/// Derive the Fiat-Shamir challenges (cut-and-choose pass split, left/right
/// per-voter bits) from the transcript hash-so-far, and post them.
pub fn make_verifier_challenges(sbb: &mut Sbb, n_reps: usize, race_ids: &[String], n_voters: usize, registry: &mut RandomnessRegistry) -> Result<Challenges> {
    let sbb_hash = sbb.hash()?;
    registry.init(CHALLENGE_SOURCE, Some(sbb_hash));

    let m = n_reps / 2;
    let pi = random_permutation(n_reps, CHALLENGE_SOURCE, registry)?;
    let mut icl: Vec<usize> = pi[..m].to_vec();
    let mut opl: Vec<usize> = pi[m..].to_vec();
    icl.sort_unstable();
    opl.sort_unstable();

    let mut sorted_race_ids = race_ids.to_vec();
    sorted_race_ids.sort();
    let mut leftright = BTreeMap::new();
    for race_id in &sorted_race_ids {
        let mut bits = Vec::with_capacity(n_voters);
        for _ in 0..n_voters {
            bits.push(registry.next_below(CHALLENGE_SOURCE, 2)? != 0);
        }
        leftright.insert(race_id.clone(), bits);
    }

    let mut payload = Map::new();
    payload.insert("sbb_hash".to_string(), serde_json::Value::String(hex::encode(sbb_hash)));
    payload.insert(
        "challenges".to_string(),
        serde_json::json!({
            "cut": {"icl": icl, "opl": opl},
            "leftright": leftright,
        }),
    );
    sbb.post("proof:verifier_challenges", Some(payload), false)?;

    tracing::debug!(target: LOG_TARGET, m, "verifier challenges derived");
    Ok(Challenges { opl, icl, leftright })
}

/// Fully open every commitment for the `opl` passes: these passes are never
/// used for the input-consistency proof, so revealing them entirely lets
/// the verifier recompute the tally directly from the transcript.
pub fn prove_outcome_correct(sbb: &mut Sbb, outputs: &Outputs, opl: &[usize]) -> Result<()> {
    let mut opened: BTreeMap<&String, BTreeMap<usize, &Vec<Vec<OutputCommitment>>>> = BTreeMap::new();
    for (race_id, per_pass) in outputs {
        let mut by_pass = BTreeMap::new();
        for &k in opl {
            by_pass.insert(k, &per_pass[k]);
        }
        opened.insert(race_id, by_pass);
    }
    let mut payload = Map::new();
    payload.insert("opened_commitments".to_string(), serde_json::to_value(&opened)?);
    sbb.post("proof:outcome_check", Some(payload), false)?;
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
struct HalfOpening {
    ballot_id: Option<String>,
    value: BigUint,
    randomness: String,
    commitment: String,
    side: &'static str,
}

/// Half-open the input commitments (one side per voter, chosen by
/// `leftright`) and the corresponding `icl`-pass output commitments, so the
/// verifier can check that mixing didn't change any vote's value without
/// ever learning a full `(u, v)` pair.
pub fn prove_input_consistent(sbb: &mut Sbb, races: &[Race], net: &Mixnet, outputs: &Outputs, challenges: &Challenges, n_voters: usize) -> Result<()> {
    let mut input_openings: BTreeMap<&String, Vec<Vec<HalfOpening>>> = BTreeMap::new();
    for race in races {
        let grid = net.grid(&race.race_id)?;
        let leftright = &challenges.leftright[&race.race_id];
        let mut per_row = Vec::with_capacity(grid.rows);
        for row in 0..grid.rows {
            let col0 = &grid.column0[row];
            let mut per_voter = Vec::with_capacity(n_voters);
            for px in 0..n_voters {
                per_voter.push(if leftright[px] {
                    HalfOpening {
                        ballot_id: Some(col0.ballot_id[px].clone()),
                        value: col0.u[px].clone(),
                        randomness: col0.ru[px].clone(),
                        commitment: col0.cu[px].clone(),
                        side: "u",
                    }
                } else {
                    HalfOpening {
                        ballot_id: Some(col0.ballot_id[px].clone()),
                        value: col0.v[px].clone(),
                        randomness: col0.rv[px].clone(),
                        commitment: col0.cv[px].clone(),
                        side: "v",
                    }
                });
            }
            per_row.push(per_voter);
        }
        input_openings.insert(&race.race_id, per_row);
    }
    let mut payload = Map::new();
    payload.insert("opened_commitments".to_string(), serde_json::to_value(&input_openings)?);
    sbb.post("proof:input_consistency:input_openings", Some(payload), false)?;

    let mut output_openings: BTreeMap<&String, BTreeMap<usize, Vec<Vec<HalfOpening>>>> = BTreeMap::new();
    for race in races {
        let grid = net.grid(&race.race_id)?;
        let leftright = &challenges.leftright[&race.race_id];
        let per_race_outputs = &outputs[&race.race_id];
        let mut by_pass = BTreeMap::new();
        for &k in &challenges.icl {
            let mut per_row = Vec::with_capacity(grid.rows);
            for row in 0..grid.rows {
                let mut per_voter: Vec<Option<HalfOpening>> = (0..n_voters).map(|_| None).collect();
                for px in 0..n_voters {
                    let py = trace_forward(grid, k, px);
                    let oc = &per_race_outputs[k][row][py];
                    per_voter[py] = Some(if leftright[px] {
                        HalfOpening { ballot_id: None, value: oc.u.clone(), randomness: oc.ru.clone(), commitment: oc.cu.clone(), side: "u" }
                    } else {
                        HalfOpening { ballot_id: None, value: oc.v.clone(), randomness: oc.rv.clone(), commitment: oc.cv.clone(), side: "v" }
                    });
                }
                let per_voter: Vec<HalfOpening> = per_voter
                    .into_iter()
                    .map(|o| o.expect("trace_forward is a bijection over voter positions"))
                    .collect();
                per_row.push(per_voter);
            }
            by_pass.insert(k, per_row);
        }
        output_openings.insert(&race.race_id, by_pass);
    }
    let mut payload = Map::new();
    payload.insert("opened_commitments".to_string(), serde_json::to_value(&output_openings)?);
    sbb.post("proof:input_consistency:output_openings", Some(payload), false)?;
    Ok(())
}

/// For every `icl` pass, record `pik[py] = px`: keyed by that pass's
/// final-column output position, giving the original cast-vote input
/// position it traces back to (no row dependence: the permutation is
/// shared across every row in a column).
pub fn compute_and_post_pik_list(sbb: &mut Sbb, races: &[Race], net: &Mixnet, icl: &[usize], n_voters: usize) -> Result<()> {
    let mut pik_list = Vec::new();
    for race in races {
        let grid = net.grid(&race.race_id)?;
        for &k in icl {
            let mut pik = vec![0usize; n_voters];
            for px in 0..n_voters {
                let py = trace_forward(grid, k, px);
                pik[py] = px;
            }
            pik_list.push(serde_json::json!({
                "race_id": race.race_id,
                "k": k,
                "pik": pik,
            }));
        }
    }
    let mut payload = Map::new();
    payload.insert("list".to_string(), serde_json::Value::Array(pik_list));
    sbb.post("proof:input_consistency:pik_for_k_in_icl", Some(payload), false)?;
    Ok(())
}

/// Run the full proof-production pipeline end to end. Unlike the original
/// prototype (which returns before part 2), this always completes the
/// input-consistency proof too.
pub fn make_proof(sbb: &mut Sbb, races: &[Race], net: &Mixnet, n_voters: usize, registry: &mut RandomnessRegistry) -> Result<()> {
    let outputs = make_full_output(races, net, n_voters, registry)?;
    post_output_commitments(sbb, &outputs)?;
    compute_and_post_t_values(sbb, races, net, &outputs, n_voters)?;

    let race_ids: Vec<String> = races.iter().map(|r| r.race_id.clone()).collect();
    let n_reps = net.races.values().next().map(|g| g.n_reps).unwrap_or(0);
    let challenges = make_verifier_challenges(sbb, n_reps, &race_ids, n_voters, registry)?;

    prove_outcome_correct(sbb, &outputs, &challenges.opl)?;
    prove_input_consistent(sbb, races, net, &outputs, &challenges, n_voters)?;
    compute_and_post_pik_list(sbb, races, net, &challenges.icl, n_voters)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arithmetic::{lagrange, Share};
    use crate::primitives::RandomnessRegistry;
    use crate::voter::Voter;

    fn run_small_election() -> (Vec<Race>, Mixnet, Sbb, RandomnessRegistry, usize) {
        let mut reg = RandomnessRegistry::new();
        let race = Race::new("taxes", vec!["yes".into(), "no".into()], &mut reg).unwrap();
        let mut net = Mixnet::new(std::slice::from_ref(&race), 0, 1, 2, &mut reg).unwrap();
        let rows = net.rows;
        let threshold = net.threshold;
        let n_voters = 3;
        {
            let grid = net.grid_mut("taxes").unwrap();
            for v in 0..n_voters {
                let voter = Voter::new(format!("v{v}"), format!("p{v}"), &mut reg);
                let votes = voter.cast_vote(&race, rows, threshold, 20, &mut reg).unwrap();
                grid.deposit_cast_votes(v, votes).unwrap();
            }
            grid.mix(&race, n_voters, &mut reg).unwrap();
        }
        let sbb = Sbb::open("e1").unwrap();
        (vec![race], net, sbb, reg, n_voters)
    }

    /// Per I3, individual-row t-values are only shares of a zero-secret
    /// fuzz polynomial, not zero themselves once `threshold > 1` — only the
    /// Lagrange reconstruction of the `tu`/`tv` row-vectors is guaranteed to
    /// cancel.
    #[test]
    fn t_values_cancel_out_for_honest_mix() {
        let (races, net, mut sbb, mut reg, n_voters) = run_small_election();
        let outputs = make_full_output(&races, &net, n_voters, &mut reg).unwrap();
        let t_values = compute_and_post_t_values(&mut sbb, &races, &net, &outputs, n_voters).unwrap();
        let grid = net.grid("taxes").unwrap();
        let m = &races[0].race_modulus;
        for k in 0..grid.n_reps {
            for px in 0..n_voters {
                let tu_shares: Vec<Share> = (0..grid.rows)
                    .map(|row| Share { x: (row + 1) as u64, y: t_values["taxes"][k][row][px].tu.clone() })
                    .collect();
                let tv_shares: Vec<Share> = (0..grid.rows)
                    .map(|row| Share { x: (row + 1) as u64, y: t_values["taxes"][k][row][px].tv.clone() })
                    .collect();
                let t = lagrange(&tu_shares, grid.rows as u64, grid.threshold as u64, m).unwrap();
                let t_prime = lagrange(&tv_shares, grid.rows as u64, grid.threshold as u64, m).unwrap();
                assert_eq!((&t + &t_prime) % m, num_bigint::BigUint::from(0u32));
            }
        }
    }

    #[test]
    fn make_proof_runs_the_full_pipeline() {
        let (races, net, mut sbb, mut reg, n_voters) = run_small_election();
        make_proof(&mut sbb, &races, &net, n_voters, &mut reg).unwrap();
        assert!(sbb.entries().iter().any(|e| e.header == "proof:input_consistency:pik_for_k_in_icl"));
    }
}
