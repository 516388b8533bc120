//! Deterministic, replay-capable cryptographic RNG.
//!
//! Weighted tier/prize sampling needs actual unpredictability (fairness
//! guarantees would be worthless against a predictable stream), so this
//! wraps a ChaCha20 CSPRNG rather than a plain xorshift generator. The
//! snapshot/restore contract mirrors a deterministic generator exactly:
//! record the stream's word position before each decision and a replay
//! seeks back to it, consuming the identical bytes the original draw did.

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::models::draw_decision::RngSnapshot;

/// Wraps a ChaCha20 stream and counts how many draws each decision consumes.
pub struct RngManager {
    seed: [u8; 32],
    rng: ChaCha20Rng,
    draws_this_decision: u32,
}

impl RngManager {
    /// Seed the stream. `seed` should come from a cryptographically random
    /// source at campaign/session start and is itself recorded for full
    /// replay from the beginning of a session.
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            seed,
            rng: ChaCha20Rng::from_seed(seed),
            draws_this_decision: 0,
        }
    }

    /// Restore a stream at an exact word position, e.g. to replay one
    /// decision without re-running every draw before it.
    pub fn restore(seed: [u8; 32], word_pos: u64) -> Self {
        let mut rng = ChaCha20Rng::from_seed(seed);
        rng.set_word_pos(word_pos as u128);
        Self {
            seed,
            rng,
            draws_this_decision: 0,
        }
    }

    pub fn seed(&self) -> [u8; 32] {
        self.seed
    }

    /// Snapshot the current position, to be stamped onto a `DrawDecision`
    /// before consuming any randomness for it. Resets the per-decision
    /// consumption counter.
    pub fn begin_decision(&mut self) -> RngSnapshot {
        self.draws_this_decision = 0;
        RngSnapshot {
            stream_position: self.rng.get_word_pos() as u64,
            draws_consumed: 0,
        }
    }

    pub fn end_decision(&mut self, snapshot: RngSnapshot) -> RngSnapshot {
        RngSnapshot {
            draws_consumed: self.draws_this_decision,
            ..snapshot
        }
    }

    /// A uniform `f64` in `[0, 1)`, the unit the weighted sampler works in.
    pub fn next_unit(&mut self) -> f64 {
        self.draws_this_decision += 1;
        (self.rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform integer in `[0, bound)`. `bound` must be positive.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        assert!(bound > 0, "bound must be positive");
        self.draws_this_decision += 1;
        self.rng.next_u64() % bound
    }
}
