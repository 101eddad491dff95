//! Independent re-derivation of a posted election transcript: given nothing
//! but a closed [`Sbb`], recompute every check a skeptical observer could
//! perform and fail loudly, with a coordinate-qualified error, at the first
//! thing that doesn't line up.

use std::collections::BTreeMap;

use num_bigint::BigUint;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::arithmetic::{lagrange, random_permutation, Share};
use crate::primitives::{self, commit, int_to_bytes, RandomnessRegistry};
use crate::sbb::Sbb;

const LOG_TARGET: &str = "svv::verifier";
const CHALLENGE_SOURCE: &str = "verifier_challenges";
const CHALLENGE_HEADER: &str = "proof:verifier_challenges";

/// The exact, ordered header sequence spec §6 mandates. Every entry in a
/// closed transcript must name a header from this list, and headers must
/// appear in non-decreasing position within it.
const HEADER_ORDER: &[&str] = &[
    "sbb:open",
    "setup:start",
    "setup:races",
    "setup:voters",
    "setup:server-array",
    "setup:finished",
    "casting:votes",
    "tally:results",
    "proof:output_commitments",
    "proof:output_commitment_t_values",
    "proof:verifier_challenges",
    "proof:outcome_check",
    "proof:input_consistency:input_openings",
    "proof:input_consistency:output_openings",
    "proof:input_consistency:pik_for_k_in_icl",
    "election:done.",
    "sbb:close",
];

#[derive(Debug, Error)]
pub enum Error {
    #[error("expected header {0:?} is missing from the transcript")]
    MissingHeader(String),

    #[error("transcript field {field:?} missing from header {header:?}")]
    MissingField { header: String, field: String },

    #[error("header {0:?} is not one of the headers spec §6 permits")]
    UnexpectedHeader(String),

    #[error("header {header:?} appears out of the canonical spec §6 order (after {after:?})")]
    HeaderOutOfOrder { header: String, after: String },

    #[error("timestamps are not non-decreasing: {previous:?} precedes {before}")]
    TimestampRegression { before: String, previous: String },

    #[error("election id mismatch: entry {header:?} claims {got:?}, expected {expected:?}")]
    ElectionIdMismatch { header: String, expected: String, got: String },

    #[error("recomputed challenge-derivation hash does not match the posted sbb_hash")]
    ChallengeHashMismatch,

    #[error("recomputed cut-and-choose challenges do not match the posted ones")]
    ChallengeCutMismatch,

    #[error("recomputed left/right challenges do not match the posted ones for race {0:?}")]
    ChallengeLeftRightMismatch(String),

    #[error("race {race_id:?} pass {k} row {row} voter {voter}: commitment {side} does not open to the claimed value")]
    CommitmentMismatch { race_id: String, k: usize, row: usize, voter: usize, side: &'static str },

    #[error("race {race_id:?} pass {k} row {row} voter {voter}: y != (u + v) mod race_modulus")]
    OutputShareMismatch { race_id: String, k: usize, row: usize, voter: usize },

    #[error("race {race_id:?} pass {k} row {row} voter {voter}: t-value out of range [0, race_modulus)")]
    TValueOutOfRange { race_id: String, k: usize, row: usize, voter: usize },

    #[error("race {race_id:?} pass {k} voter {voter}: Lagrange-reconstructed tu + tv != 0 mod race_modulus")]
    TValueDoesNotCancel { race_id: String, k: usize, voter: usize },

    #[error("race {race_id:?} pass {k}: pik is not a permutation of the voter positions")]
    PikNotAPermutation { race_id: String, k: usize },

    #[error("race {race_id:?} pass {k} row {row} voter {voter}: output opening does not match the posted output commitment")]
    OutputOpeningMismatch { race_id: String, k: usize, row: usize, voter: usize },

    #[error("race {race_id:?} row {row} voter {voter}: input opening does not match the posted cast-vote commitment")]
    InputOpeningMismatch { race_id: String, row: usize, voter: usize },

    #[error("race {race_id:?} pass {k} row {row} voter {voter}: opened side does not match the posted left/right challenge")]
    LeftRightSideMismatch { race_id: String, k: usize, row: usize, voter: usize },

    #[error("race {race_id:?} pass {k} row {row} voter {voter}: t-value does not equal the opened output/input difference")]
    TValueEqualityMismatch { race_id: String, k: usize, row: usize, voter: usize },

    #[error("race {race_id:?} pass {k}: tally recomputed from opened outputs disagrees with the posted tally")]
    TallyMismatch { race_id: String, k: usize },

    #[error("choice integer did not decode to valid UTF-8: race {0:?}")]
    InvalidChoiceEncoding(String),

    #[error(transparent)]
    Arithmetic(#[from] crate::arithmetic::Error),

    #[error(transparent)]
    Randomness(#[from] primitives::Error),

    #[error(transparent)]
    Sbb(#[from] crate::sbb::Error),

    #[error("malformed transcript JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Deserialize)]
struct RaceInfo {
    race_id: String,
    choices: Vec<String>,
    race_modulus: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CommitmentPair {
    cu: String,
    cv: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TValueRaw {
    tu: BigUint,
    tv: BigUint,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenedOutput {
    y: BigUint,
    u: BigUint,
    v: BigUint,
    ru: String,
    rv: String,
    cu: String,
    cv: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PikEntry {
    race_id: String,
    k: usize,
    pik: Vec<usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct CastVoteRaw {
    #[allow(dead_code)]
    ballot_id: String,
    cu: String,
    cv: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CastVotesEntry {
    race_id: String,
    cast_votes: Vec<Vec<CastVoteRaw>>,
}

#[derive(Debug, Clone, Deserialize)]
struct HalfOpeningRaw {
    #[allow(dead_code)]
    ballot_id: Option<String>,
    value: BigUint,
    randomness: String,
    commitment: String,
    side: String,
}

fn payload<'a>(entries: &'a [crate::sbb::Entry], header: &str) -> Result<&'a Map<String, Value>> {
    entries
        .iter()
        .find(|e| e.header == header)
        .ok_or_else(|| Error::MissingHeader(header.to_string()))?
        .payload
        .as_ref()
        .ok_or_else(|| Error::MissingField {
            header: header.to_string(),
            field: "<payload>".to_string(),
        })
}

fn payloads<'a>(entries: &'a [crate::sbb::Entry], header: &str) -> Vec<&'a Map<String, Value>> {
    entries.iter().filter(|e| e.header == header).filter_map(|e| e.payload.as_ref()).collect()
}

fn field<'a>(map: &'a Map<String, Value>, header: &str, field: &str) -> Result<&'a Value> {
    map.get(field).ok_or_else(|| Error::MissingField {
        header: header.to_string(),
        field: field.to_string(),
    })
}

/// Check timestamp monotonicity, election-id consistency, and header-name/
/// order conformance to spec §6's canonical sequence, independent of any
/// particular entry's meaning.
fn check_transcript_shape(sbb: &Sbb) -> Result<()> {
    let mut last_time: Option<String> = None;
    let mut election_id: Option<String> = None;
    let mut last_position: usize = 0;
    let mut last_header: &str = HEADER_ORDER[0];
    for entry in sbb.entries() {
        let position = HEADER_ORDER
            .iter()
            .position(|h| *h == entry.header)
            .ok_or_else(|| Error::UnexpectedHeader(entry.header.clone()))?;
        if position < last_position {
            return Err(Error::HeaderOutOfOrder {
                header: entry.header.clone(),
                after: last_header.to_string(),
            });
        }
        last_position = position;
        last_header = &entry.header;

        let Some(payload) = &entry.payload else { continue };
        if let Some(Value::String(t)) = payload.get("time") {
            if let Some(prev) = &last_time {
                if t < prev {
                    return Err(Error::TimestampRegression {
                        before: entry.header.clone(),
                        previous: prev.clone(),
                    });
                }
            }
            last_time = Some(t.clone());
        }
        if let Some(Value::String(eid)) = payload.get("election_id") {
            match &election_id {
                None => election_id = Some(eid.clone()),
                Some(expected) if expected != eid => {
                    return Err(Error::ElectionIdMismatch {
                        header: entry.header.clone(),
                        expected: expected.clone(),
                        got: eid.clone(),
                    })
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

fn parse_races(sbb: &Sbb) -> Result<Vec<RaceInfo>> {
    let races_payload = payload(sbb.entries(), "setup:races")?;
    let race_list = field(races_payload, "setup:races", "ballot_style_race_list")?;
    Ok(serde_json::from_value(race_list.clone())?)
}

fn parse_n_voters(sbb: &Sbb) -> Result<usize> {
    let voters_payload = payload(sbb.entries(), "setup:voters")?;
    let n_voters = field(voters_payload, "setup:voters", "n_voters")?;
    Ok(serde_json::from_value(n_voters.clone())?)
}

/// `(rows, threshold)`, needed to Lagrange-reconstruct a choice from opened
/// output shares exactly as the mix server originally secret-shared it.
fn parse_rows_and_threshold(sbb: &Sbb) -> Result<(usize, usize)> {
    let server_array = payload(sbb.entries(), "setup:server-array")?;
    let rows: usize = serde_json::from_value(field(server_array, "setup:server-array", "rows")?.clone())?;
    let threshold: usize = serde_json::from_value(field(server_array, "setup:server-array", "threshold")?.clone())?;
    Ok((rows, threshold))
}

/// Every `casting:votes` entry, keyed by `race_id`, row-major (row outer,
/// voter position inner), exactly as `election::cast_votes` posts it.
fn parse_cast_votes(sbb: &Sbb) -> Result<BTreeMap<String, Vec<Vec<CastVoteRaw>>>> {
    let mut out = BTreeMap::new();
    for entry in payloads(sbb.entries(), "casting:votes") {
        let parsed: CastVotesEntry = serde_json::from_value(Value::Object(entry.clone()))?;
        out.insert(parsed.race_id, parsed.cast_votes);
    }
    Ok(out)
}

/// Re-derive the Fiat-Shamir challenges from the transcript hash-so-far and
/// check them against what was posted, then verify every proof obligation
/// the challenges imply: opened outputs commit correctly and tally
/// consistently for `opl` passes, t-values stay in range for every pass and
/// Lagrange-reconstruct to cancel for every `icl` pass, `pik` is a bijection
/// for every `icl` pass, and every `icl` input/output opening reopens
/// correctly, matches its posted commitment, respects the left/right
/// challenge, and agrees with its t-value.
pub fn verify(sbb: &Sbb) -> Result<()> {
    check_transcript_shape(sbb)?;

    let races = parse_races(sbb)?;
    let n_voters = parse_n_voters(sbb)?;
    let (rows, threshold) = parse_rows_and_threshold(sbb)?;
    let cast_votes = parse_cast_votes(sbb)?;

    let challenges_payload = payload(sbb.entries(), CHALLENGE_HEADER)?;
    let posted_hash_hex = field(challenges_payload, CHALLENGE_HEADER, "sbb_hash")?
        .as_str()
        .ok_or_else(|| Error::MissingField {
            header: CHALLENGE_HEADER.to_string(),
            field: "sbb_hash".to_string(),
        })?
        .to_string();
    let recomputed_hash = sbb.hash_before(CHALLENGE_HEADER)?;
    if hex::encode(recomputed_hash) != posted_hash_hex {
        return Err(Error::ChallengeHashMismatch);
    }

    let mut registry = RandomnessRegistry::new();
    registry.init(CHALLENGE_SOURCE, Some(recomputed_hash));
    let cut = field(challenges_payload, CHALLENGE_HEADER, "challenges")?
        .get("cut")
        .ok_or_else(|| Error::MissingField { header: CHALLENGE_HEADER.to_string(), field: "challenges.cut".to_string() })?;
    let posted_icl: Vec<usize> = serde_json::from_value(
        cut.get("icl").cloned().ok_or_else(|| Error::MissingField { header: CHALLENGE_HEADER.to_string(), field: "cut.icl".to_string() })?,
    )?;
    let posted_opl: Vec<usize> = serde_json::from_value(
        cut.get("opl").cloned().ok_or_else(|| Error::MissingField { header: CHALLENGE_HEADER.to_string(), field: "cut.opl".to_string() })?,
    )?;
    let n_reps = posted_icl.len() + posted_opl.len();
    let m = n_reps / 2;
    let pi = random_permutation(n_reps, CHALLENGE_SOURCE, &mut registry)?;
    let mut icl: Vec<usize> = pi[..m].to_vec();
    let mut opl: Vec<usize> = pi[m..].to_vec();
    icl.sort_unstable();
    opl.sort_unstable();
    if icl != posted_icl || opl != posted_opl {
        return Err(Error::ChallengeCutMismatch);
    }

    let posted_leftright: BTreeMap<String, Vec<bool>> = serde_json::from_value(
        field(challenges_payload, CHALLENGE_HEADER, "challenges")?
            .get("leftright")
            .cloned()
            .ok_or_else(|| Error::MissingField { header: CHALLENGE_HEADER.to_string(), field: "challenges.leftright".to_string() })?,
    )?;
    let mut sorted_race_ids: Vec<String> = races.iter().map(|r| r.race_id.clone()).collect();
    sorted_race_ids.sort();
    for race_id in &sorted_race_ids {
        let mut bits = Vec::with_capacity(n_voters);
        for _ in 0..n_voters {
            bits.push(registry.next_below(CHALLENGE_SOURCE, 2)? != 0);
        }
        if posted_leftright.get(race_id) != Some(&bits) {
            return Err(Error::ChallengeLeftRightMismatch(race_id.clone()));
        }
    }

    let commitments_payload = payload(sbb.entries(), "proof:output_commitments")?;
    let commitments: BTreeMap<String, Vec<Vec<Vec<CommitmentPair>>>> =
        serde_json::from_value(field(commitments_payload, "proof:output_commitments", "commitments")?.clone())?;

    let t_values_payload = payload(sbb.entries(), "proof:output_commitment_t_values")?;
    let t_values: BTreeMap<String, Vec<Vec<Vec<TValueRaw>>>> =
        serde_json::from_value(field(t_values_payload, "proof:output_commitment_t_values", "t_values")?.clone())?;

    let outcome_payload = payload(sbb.entries(), "proof:outcome_check")?;
    let opened_outputs: BTreeMap<String, BTreeMap<usize, Vec<Vec<OpenedOutput>>>> =
        serde_json::from_value(field(outcome_payload, "proof:outcome_check", "opened_commitments")?.clone())?;

    let input_openings_payload = payload(sbb.entries(), "proof:input_consistency:input_openings")?;
    let input_openings: BTreeMap<String, Vec<Vec<HalfOpeningRaw>>> = serde_json::from_value(
        field(input_openings_payload, "proof:input_consistency:input_openings", "opened_commitments")?.clone(),
    )?;

    let output_openings_payload = payload(sbb.entries(), "proof:input_consistency:output_openings")?;
    let output_openings: BTreeMap<String, BTreeMap<usize, Vec<Vec<HalfOpeningRaw>>>> = serde_json::from_value(
        field(output_openings_payload, "proof:input_consistency:output_openings", "opened_commitments")?.clone(),
    )?;

    let pik_payload = payload(sbb.entries(), "proof:input_consistency:pik_for_k_in_icl")?;
    let pik_list: Vec<PikEntry> =
        serde_json::from_value(field(pik_payload, "proof:input_consistency:pik_for_k_in_icl", "list")?.clone())?;
    for entry in &pik_list {
        let mut seen = vec![false; entry.pik.len()];
        for &px in &entry.pik {
            if px >= seen.len() || seen[px] {
                return Err(Error::PikNotAPermutation { race_id: entry.race_id.clone(), k: entry.k });
            }
            seen[px] = true;
        }
    }

    let tally_payloads = payloads(sbb.entries(), "tally:results");

    for race in &races {
        let race_modulus: BigUint = race.race_modulus.parse().map_err(|_| Error::InvalidChoiceEncoding(race.race_id.clone()))?;
        let coms = commitments.get(&race.race_id).ok_or_else(|| Error::MissingHeader(format!("commitments for {}", race.race_id)))?;
        let tvs = t_values.get(&race.race_id).ok_or_else(|| Error::MissingHeader(format!("t-values for {}", race.race_id)))?;

        for (k, per_row) in tvs.iter().enumerate() {
            for (row, per_voter) in per_row.iter().enumerate() {
                for (voter, tv) in per_voter.iter().enumerate() {
                    if tv.tu >= race_modulus || tv.tv >= race_modulus {
                        return Err(Error::TValueOutOfRange { race_id: race.race_id.clone(), k, row, voter });
                    }
                }
            }
        }

        // I3: individual rows of an honest mix's t-values are shares of a
        // zero-secret fuzz polynomial, not zero themselves once
        // threshold > 1 — only the Lagrange reconstruction across rows is
        // guaranteed to cancel, and only for the icl passes this proof
        // obligation covers.
        for &k in &icl {
            let per_row = &tvs[k];
            for voter in 0..n_voters {
                let tu_shares: Vec<Share> = (0..rows)
                    .map(|row| Share { x: (row + 1) as u64, y: per_row[row][voter].tu.clone() })
                    .collect();
                let tv_shares: Vec<Share> = (0..rows)
                    .map(|row| Share { x: (row + 1) as u64, y: per_row[row][voter].tv.clone() })
                    .collect();
                let t = lagrange(&tu_shares, rows as u64, threshold as u64, &race_modulus)?;
                let t_prime = lagrange(&tv_shares, rows as u64, threshold as u64, &race_modulus)?;
                if (&t + &t_prime) % &race_modulus != BigUint::from(0u32) {
                    return Err(Error::TValueDoesNotCancel { race_id: race.race_id.clone(), k, voter });
                }
            }
        }

        let opened = opened_outputs.get(&race.race_id).ok_or_else(|| Error::MissingHeader(format!("opened outputs for {}", race.race_id)))?;
        let mut reference_tally: Option<BTreeMap<String, u64>> = None;
        for &k in &opl {
            let per_row = opened.get(&k).ok_or_else(|| Error::MissingHeader(format!("opened outputs for {} pass {}", race.race_id, k)))?;
            let mut tally_k: BTreeMap<String, u64> = BTreeMap::new();
            for choice in &race.choices {
                if !choice.chars().all(|c| c == '*') {
                    tally_k.insert(choice.clone(), 0);
                }
            }
            for (row, per_voter) in per_row.iter().enumerate() {
                for (voter, oc) in per_voter.iter().enumerate() {
                    let expected = &coms[k][row][voter];
                    let cu = commit(&int_to_bytes(&oc.u, None), &oc.ru)?;
                    if cu != oc.cu || oc.cu != expected.cu {
                        return Err(Error::CommitmentMismatch { race_id: race.race_id.clone(), k, row, voter, side: "u" });
                    }
                    let cv = commit(&int_to_bytes(&oc.v, None), &oc.rv)?;
                    if cv != oc.cv || oc.cv != expected.cv {
                        return Err(Error::CommitmentMismatch { race_id: race.race_id.clone(), k, row, voter, side: "v" });
                    }
                    if oc.y != (&oc.u + &oc.v) % &race_modulus {
                        return Err(Error::OutputShareMismatch { race_id: race.race_id.clone(), k, row, voter });
                    }
                }
            }
            let n_voters_k = per_row.first().map(|r| r.len()).unwrap_or(0);
            for voter in 0..n_voters_k {
                let shares: Vec<Share> = (0..rows)
                    .map(|row| Share { x: (row + 1) as u64, y: per_row[row][voter].y.clone() })
                    .collect();
                let w = lagrange(&shares, rows as u64, threshold as u64, &race_modulus)?;
                let choice_bytes = int_to_bytes(&w, None);
                let choice_str = String::from_utf8(choice_bytes).map_err(|_| Error::InvalidChoiceEncoding(race.race_id.clone()))?;
                *tally_k.entry(choice_str).or_insert(0) += 1;
            }
            match &reference_tally {
                None => reference_tally = Some(tally_k),
                Some(expected) if expected == &tally_k => {}
                Some(_) => return Err(Error::TallyMismatch { race_id: race.race_id.clone(), k }),
            }
        }
        if let Some(reference_tally) = reference_tally {
            let posted = tally_payloads
                .iter()
                .find(|p| p.get("race_id").and_then(Value::as_str) == Some(race.race_id.as_str()))
                .ok_or_else(|| Error::MissingHeader(format!("tally for {}", race.race_id)))?;
            let posted_tally: BTreeMap<String, u64> = serde_json::from_value(
                field(posted, "tally:results", "tally")?.clone(),
            )?;
            if posted_tally != reference_tally {
                return Err(Error::TallyMismatch { race_id: race.race_id.clone(), k: opl.first().copied().unwrap_or(0) });
            }
        }

        // §4.9 step 6 bullets 2-3: for every icl pass, every voter's opened
        // input half must reopen to its posted cast-vote commitment, its
        // opened output half (at the traced py = the voter's position under
        // that pass) must reopen to its posted output commitment, both
        // openings must agree with the posted left/right challenge, and the
        // t-value at (k, row, px) must equal the actual opened difference.
        let race_cast_votes = cast_votes.get(&race.race_id).ok_or_else(|| Error::MissingHeader(format!("cast votes for {}", race.race_id)))?;
        let race_input_openings = input_openings.get(&race.race_id).ok_or_else(|| Error::MissingHeader(format!("input openings for {}", race.race_id)))?;
        let race_output_openings = output_openings.get(&race.race_id).ok_or_else(|| Error::MissingHeader(format!("output openings for {}", race.race_id)))?;
        let leftright = posted_leftright.get(&race.race_id).ok_or_else(|| Error::MissingHeader(format!("leftright for {}", race.race_id)))?;

        for &k in &icl {
            let pik_entry = pik_list
                .iter()
                .find(|e| e.race_id == race.race_id && e.k == k)
                .ok_or_else(|| Error::MissingHeader(format!("pik for {} pass {}", race.race_id, k)))?;
            let per_row_outputs = race_output_openings.get(&k).ok_or_else(|| Error::MissingHeader(format!("output openings for {} pass {}", race.race_id, k)))?;
            // pik is keyed by py (pik[py] = px); invert it once per pass so
            // the per-voter loop below can go from px to its traced py.
            let mut px_to_py = vec![0usize; pik_entry.pik.len()];
            for (py, &px) in pik_entry.pik.iter().enumerate() {
                px_to_py[px] = py;
            }

            for row in 0..rows {
                for px in 0..n_voters {
                    let py = px_to_py[px];
                    let side = if leftright[px] { "u" } else { "v" };

                    let in_open = &race_input_openings[row][px];
                    if in_open.side != side {
                        return Err(Error::LeftRightSideMismatch { race_id: race.race_id.clone(), k, row, voter: px });
                    }
                    let recommitted = commit(&int_to_bytes(&in_open.value, None), &in_open.randomness)?;
                    let expected_cast = &race_cast_votes[row][px];
                    let expected_commitment = if side == "u" { &expected_cast.cu } else { &expected_cast.cv };
                    if recommitted != in_open.commitment || &in_open.commitment != expected_commitment {
                        return Err(Error::InputOpeningMismatch { race_id: race.race_id.clone(), row, voter: px });
                    }

                    let out_open = &per_row_outputs[row][py];
                    if out_open.side != side {
                        return Err(Error::LeftRightSideMismatch { race_id: race.race_id.clone(), k, row, voter: px });
                    }
                    let recommitted = commit(&int_to_bytes(&out_open.value, None), &out_open.randomness)?;
                    let expected_output = &coms[k][row][py];
                    let expected_commitment = if side == "u" { &expected_output.cu } else { &expected_output.cv };
                    if recommitted != out_open.commitment || &out_open.commitment != expected_commitment {
                        return Err(Error::OutputOpeningMismatch { race_id: race.race_id.clone(), k, row, voter: py });
                    }

                    let diff = if out_open.value >= in_open.value {
                        &out_open.value - &in_open.value
                    } else {
                        &race_modulus + &out_open.value - &in_open.value
                    } % &race_modulus;
                    let tv = &tvs[k][row][px];
                    let expected_t = if side == "u" { &tv.tu } else { &tv.tv };
                    if &diff != expected_t {
                        return Err(Error::TValueEqualityMismatch { race_id: race.race_id.clone(), k, row, voter: px });
                    }
                }
            }
        }
    }

    tracing::debug!(target: LOG_TARGET, races = races.len(), n_voters, "transcript verified");
    Ok(())
}
