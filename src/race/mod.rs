//! A single race within an election: its declared choices, write-in policy,
//! and the modular arithmetic domain its choices are encoded into.

use std::collections::HashSet;

use num_bigint::BigUint;
use thiserror::Error;

use crate::primitives::{self, bytes_to_int, int_to_bytes, make_prime, RandomnessRegistry};

const LOG_TARGET: &str = "svv::race";

/// Built-in pool of write-in candidates (max 13 chars), used only by the
/// voter simulator so that simulated elections are reproducible.
pub const WRITE_INS: &[&str] = &["Donald Duck", "Lizard People", "Mickey Mouse"];

#[derive(Debug, Error)]
pub enum Error {
    #[error("race_id must be non-empty")]
    EmptyRaceId,

    #[error("race must declare at least one choice")]
    EmptyChoices,

    #[error("race choices must be distinct, found duplicate {0:?}")]
    DuplicateChoice(String),

    #[error("choice {0:?} is not valid for this race")]
    InvalidChoice(String),

    #[error(transparent)]
    Randomness(#[from] primitives::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A choice string consisting entirely of `*` marks the write-in slot; its
/// length caps the allowed write-in length.
fn is_write_in_marker(choice: &str) -> bool {
    !choice.is_empty() && choice.chars().all(|c| c == '*')
}

pub struct Race {
    pub race_id: String,
    pub choices: Vec<String>,
    pub race_modulus: BigUint,
    pub rand_name: String,
}

impl Race {
    /// Construct a race, deriving `race_modulus` as the smallest prime at
    /// least `256^max_choice_len` so every allowed choice (and every
    /// write-in up to the declared max length) encodes to a distinct
    /// integer mod `race_modulus`.
    pub fn new(race_id: impl Into<String>, choices: Vec<String>, registry: &mut RandomnessRegistry) -> Result<Self> {
        let race_id = race_id.into();
        if race_id.is_empty() {
            return Err(Error::EmptyRaceId);
        }
        if choices.is_empty() {
            return Err(Error::EmptyChoices);
        }
        if choices.len() == 1 && !is_write_in_marker(&choices[0]) {
            return Err(Error::EmptyChoices);
        }
        let mut seen = HashSet::new();
        for choice in &choices {
            if !seen.insert(choice.clone()) {
                return Err(Error::DuplicateChoice(choice.clone()));
            }
        }

        let max_choice_len = choices.iter().map(|c| c.as_bytes().len()).max().unwrap_or(0);
        let floor = BigUint::from(256u32).pow(max_choice_len as u32);
        let race_modulus = make_prime(&floor);

        let rand_name = format!("random:{race_id}");
        registry.init(&rand_name, None);

        tracing::debug!(target: LOG_TARGET, race_id = %race_id, max_choice_len, "race initialized");

        Ok(Race {
            race_id,
            choices,
            race_modulus,
            rand_name,
        })
    }

    /// Return a random choice for this race: a declared choice, or (if the
    /// declared choice is a write-in marker) an entry from [`WRITE_INS`]
    /// truncated to fit. Used only by the voter simulator.
    pub fn random_choice(&self, registry: &mut RandomnessRegistry) -> Result<String> {
        let index = registry.next_below(&self.rand_name, self.choices.len() as u64)? as usize;
        let choice = &self.choices[index];
        if !is_write_in_marker(choice) {
            return Ok(choice.clone());
        }
        let max_len_write_in = choice.chars().count();
        let write_in_index = registry.next_below(&self.rand_name, WRITE_INS.len() as u64)? as usize;
        let candidate = WRITE_INS[write_in_index];
        let truncated: String = candidate.chars().take(max_len_write_in).collect();
        Ok(truncated)
    }

    /// True iff `choice` is a declared choice, or fits within some declared
    /// write-in slot's maximum length.
    pub fn is_valid_choice(&self, choice: &str) -> bool {
        if self.choices.iter().any(|c| c == choice) {
            return true;
        }
        for valid_choice in &self.choices {
            if is_write_in_marker(valid_choice) && choice.chars().count() <= valid_choice.chars().count() {
                return true;
            }
        }
        false
    }

    /// Encode a choice string as an integer modulo `race_modulus`.
    pub fn choice_str_to_int(&self, choice: &str) -> Result<BigUint> {
        let choice_int = bytes_to_int(choice.as_bytes());
        if choice_int >= self.race_modulus {
            return Err(Error::InvalidChoice(choice.to_string()));
        }
        Ok(choice_int)
    }

    /// Decode an integer modulo `race_modulus` back to a choice string,
    /// rejecting it if it doesn't correspond to a valid choice.
    pub fn choice_int_to_str(&self, choice_int: &BigUint) -> Result<String> {
        if choice_int >= &self.race_modulus {
            return Err(Error::InvalidChoice(choice_int.to_string()));
        }
        let bytes = int_to_bytes(choice_int, None);
        let choice = String::from_utf8(bytes).map_err(|_| Error::InvalidChoice(choice_int.to_string()))?;
        if !self.is_valid_choice(&choice) {
            return Err(Error::InvalidChoice(choice));
        }
        Ok(choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxes_race(registry: &mut RandomnessRegistry) -> Race {
        Race::new(
            "taxes",
            vec!["yes".to_string(), "no".to_string()],
            registry,
        )
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_choices() {
        let mut reg = RandomnessRegistry::new();
        let err = Race::new(
            "r",
            vec!["a".to_string(), "a".to_string()],
            &mut reg,
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateChoice(_)));
    }

    #[test]
    fn encodes_and_decodes_choices() {
        let mut reg = RandomnessRegistry::new();
        let race = taxes_race(&mut reg);
        for choice in ["yes", "no"] {
            let encoded = race.choice_str_to_int(choice).unwrap();
            assert_eq!(race.choice_int_to_str(&encoded).unwrap(), choice);
        }
    }

    #[test]
    fn write_in_marker_accepts_short_strings() {
        let mut reg = RandomnessRegistry::new();
        let race = Race::new(
            "write_in_race",
            vec!["********".to_string()],
            &mut reg,
        )
        .unwrap();
        assert!(race.is_valid_choice("abc"));
        assert!(race.is_valid_choice("abcdefgh"));
        assert!(!race.is_valid_choice("abcdefghi"));
    }

    #[test]
    fn random_choice_is_always_valid() {
        let mut reg = RandomnessRegistry::new();
        let race = Race::new(
            "mixed",
            vec!["Smith".to_string(), "Jones".to_string(), "********".to_string()],
            &mut reg,
        )
        .unwrap();
        for _ in 0..20 {
            let choice = race.random_choice(&mut reg).unwrap();
            assert!(race.is_valid_choice(&choice));
        }
    }

    #[test]
    fn race_modulus_is_prime_and_covers_max_choice_length() {
        let mut reg = RandomnessRegistry::new();
        let race = taxes_race(&mut reg);
        assert!(race.race_modulus >= BigUint::from(256u32).pow(3));
        assert!(crate::primitives::is_prime(&race.race_modulus));
    }
}
