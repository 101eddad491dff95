//! The shared bulletin board: an append-only, timestamped transcript of
//! every step of the election, plus the canonical serialization and tweaked
//! hash that let prover and verifier agree byte-for-byte on what was posted.

mod canonical;

pub use canonical::canonicalize;

use serde_json::{Map, Value};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::primitives::tweaked_hash;

const LOG_TARGET: &str = "svv::sbb";

/// First byte of the ASCII string `"hash_sbb"`, used as the tweak for the
/// transcript-wide hash (see [`Sbb::hash`]).
const HASH_SBB_TWEAK: u8 = b'h';

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot post to a closed bulletin board")]
    Closed,

    #[error("message payload must not itself contain a \"time\" or \"time_str\" field")]
    ReservedFieldPresent,

    #[error("timestamp regression: new entry's time {new} precedes previous {previous}")]
    TimestampRegression { previous: String, new: String },

    #[error("election id mismatch: board opened for {opened:?}, got {got:?}")]
    ElectionIdMismatch { opened: String, got: String },

    #[error("serialization failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O failure writing transcript: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// One posted transcript entry: `[header]` or `[header, payload]`, matching
/// the original's two-element-list-or-one-element-list wire shape.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Entry {
    pub header: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
}

/// Controls pretty-printing of the transcript file. Does not affect the
/// bytes fed to [`Sbb::hash`], which are always canonical/compact.
#[derive(Debug, Clone, Copy, Default)]
pub enum JsonIndent {
    #[default]
    Compact,
    Pretty(usize),
}

pub struct Sbb {
    pub election_id: String,
    entries: Vec<Entry>,
    closed: bool,
    last_time: Option<String>,
}

impl Sbb {
    /// Open a new bulletin board, immediately posting the `sbb:open` entry.
    pub fn open(election_id: impl Into<String>) -> Result<Self> {
        let election_id = election_id.into();
        let mut sbb = Sbb {
            election_id: election_id.clone(),
            entries: Vec::new(),
            closed: false,
            last_time: None,
        };
        let mut payload = Map::new();
        payload.insert("election_id".to_string(), Value::String(election_id));
        sbb.post("sbb:open", Some(payload), true)?;
        Ok(sbb)
    }

    /// Append a message. `time_stamp` mirrors the original's per-call opt-out
    /// (used for entries whose ordering doesn't need to be proven, e.g.
    /// "setup:server-array").
    pub fn post(&mut self, header: &str, payload: Option<Map<String, Value>>, time_stamp: bool) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        let mut payload = payload.unwrap_or_default();
        if payload.contains_key("time") || payload.contains_key("time_str") {
            return Err(Error::ReservedFieldPresent);
        }
        if time_stamp {
            let now = OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .expect("RFC 3339 formatting cannot fail for a valid OffsetDateTime");
            if let Some(prev) = &self.last_time {
                if &now < prev {
                    return Err(Error::TimestampRegression {
                        previous: prev.clone(),
                        new: now,
                    });
                }
            }
            payload.insert("time".to_string(), Value::String(now.clone()));
            self.last_time = Some(now);
        }
        let payload = if payload.is_empty() { None } else { Some(payload) };
        tracing::trace!(target: LOG_TARGET, header, "post");
        self.entries.push(Entry {
            header: header.to_string(),
            payload,
        });
        Ok(())
    }

    /// Close the board: post `sbb:close`, then refuse any further posting.
    pub fn close(&mut self) -> Result<()> {
        self.post("sbb:close", None, true)?;
        self.closed = true;
        Ok(())
    }

    /// Reconstruct a board directly from a previously-recorded entry list,
    /// bypassing `post`'s stamping/validation. Used to load a transcript
    /// read back from storage (or, in tests, to replay one with a single
    /// entry perturbed) rather than to build one live.
    pub fn from_entries(election_id: impl Into<String>, entries: Vec<Entry>, closed: bool) -> Self {
        let last_time = entries
            .iter()
            .rev()
            .find_map(|e| e.payload.as_ref()?.get("time")?.as_str().map(str::to_string));
        Sbb {
            election_id: election_id.into(),
            entries,
            closed,
            last_time,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Canonical (sorted-key, compact) JSON serialization of the whole
    /// board, the exact byte string both prover and verifier hash.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        let value = serde_json::to_value(&self.entries)?;
        Ok(canonicalize(&value).into_bytes())
    }

    /// Tweaked SHA-256 of the board's canonical serialization.
    pub fn hash(&self) -> Result<[u8; 32]> {
        Ok(tweaked_hash(&self.canonical_bytes()?, HASH_SBB_TWEAK))
    }

    /// Tweaked SHA-256 of the canonical serialization of every entry posted
    /// strictly before the first one headed `stop_before_header`. Lets the
    /// verifier recompute the exact hash [`crate::prover::make_verifier_challenges`]
    /// drew its challenges from, without re-hashing entries posted after it.
    pub fn hash_before(&self, stop_before_header: &str) -> Result<[u8; 32]> {
        let prefix: Vec<&Entry> = self.entries.iter().take_while(|e| e.header != stop_before_header).collect();
        let value = serde_json::to_value(&prefix)?;
        Ok(tweaked_hash(canonicalize(&value).as_bytes(), HASH_SBB_TWEAK))
    }

    /// Write the transcript to `writer`, pretty-printed per `indent` (this
    /// never changes [`Sbb::hash`], which always hashes the canonical form).
    pub fn write(&self, writer: &mut impl std::io::Write, indent: JsonIndent) -> Result<()> {
        match indent {
            JsonIndent::Compact => serde_json::to_writer(writer, &self.entries)?,
            JsonIndent::Pretty(width) => {
                let formatter = serde_json::ser::PrettyFormatter::with_indent(" ".repeat(width).as_bytes());
                let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
                serde::Serialize::serialize(&self.entries, &mut ser)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_posts_election_id() {
        let sbb = Sbb::open("e1").unwrap();
        assert_eq!(sbb.entries().len(), 1);
        assert_eq!(sbb.entries()[0].header, "sbb:open");
    }

    #[test]
    fn post_after_close_errors() {
        let mut sbb = Sbb::open("e1").unwrap();
        sbb.close().unwrap();
        let err = sbb.post("late", None, false).unwrap_err();
        assert!(matches!(err, Error::Closed));
    }

    #[test]
    fn hash_is_deterministic_for_identical_content() {
        let mut a = Sbb::open("e1").unwrap();
        let mut b = Sbb::open("e1").unwrap();
        a.post("x", None, false).unwrap();
        b.post("x", None, false).unwrap();
        assert_eq!(a.hash().unwrap(), b.hash().unwrap());
    }

    #[test]
    fn hash_changes_if_content_differs() {
        let mut a = Sbb::open("e1").unwrap();
        let mut b = Sbb::open("e1").unwrap();
        a.post("x", None, false).unwrap();
        b.post("y", None, false).unwrap();
        assert_ne!(a.hash().unwrap(), b.hash().unwrap());
    }

    #[test]
    fn rejects_reserved_time_field() {
        let mut sbb = Sbb::open("e1").unwrap();
        let mut payload = Map::new();
        payload.insert("time".to_string(), Value::String("x".to_string()));
        let err = sbb.post("bad", Some(payload), false).unwrap_err();
        assert!(matches!(err, Error::ReservedFieldPresent));
    }
}
