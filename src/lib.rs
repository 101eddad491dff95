//! `svv`: the cryptographic core of an end-to-end verifiable election system
//! implementing the Rabin-Rivest split-value (SV) voting method.
//!
//! A ballot's choices are split into `(u, v)` pairs with `u + v = choice
//! (mod M)`, each half is Shamir-shared across a grid of mix servers, the
//! grid runs `n_reps` independent shuffle-and-reencrypt passes, and a
//! cut-and-choose Fiat-Shamir protocol proves the mix was performed honestly
//! without ever revealing which pass is "real" until after the servers have
//! committed. Every step is recorded on an append-only transcript (the
//! shared bulletin board, [`sbb`]) that a verifier can replay independently.

pub mod arithmetic;
pub mod election;
pub mod mix;
pub mod primitives;
pub mod prover;
pub mod race;
pub mod sbb;
pub mod tally;
pub mod verifier;
pub mod voter;
