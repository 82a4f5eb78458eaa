//! Randomness seam for the battle core.
//!
//! Every random draw the resolver makes goes through [`RollSource`], so the
//! host injects real entropy while tests script exact sequences. `RandRolls`
//! wraps any `rand` generator (the game uses `thread_rng`, tests use a seeded
//! `ChaCha8Rng`).

use rand::Rng;
use std::collections::VecDeque;

/// A source of uniform random draws. All methods must be total: any input
/// yields a defined value.
pub trait RollSource {
    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform draw in `[lo, hi)`.
    fn between(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.unit() * (hi - lo)
    }

    /// Uniform integer in `[lo, hi]` (inclusive). Returns `lo` when the range
    /// is empty or inverted.
    fn int_between(&mut self, lo: i32, hi: i32) -> i32;

    /// Uniform index in `[0, len)`. Returns 0 for an empty range; callers
    /// check emptiness before indexing.
    fn index(&mut self, len: usize) -> usize;
}

/// Adapter over any `rand` generator.
pub struct RandRolls<R>(pub R);

impl<R: Rng> RollSource for RandRolls<R> {
    fn unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn between(&mut self, lo: f64, hi: f64) -> f64 {
        if !(lo < hi) {
            return lo;
        }
        self.0.gen_range(lo..hi)
    }

    fn int_between(&mut self, lo: i32, hi: i32) -> i32 {
        if lo >= hi {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.0.gen_range(0..len)
    }
}

/// Deterministic source fed from a fixed queue of unit draws. Once the queue
/// runs dry every draw yields 0.5, keeping behavior defined for any call
/// count. Integer and index draws consume one unit draw each.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    queue: VecDeque<f64>,
}

impl ScriptedRolls {
    pub fn new(rolls: &[f64]) -> Self {
        Self {
            queue: rolls.iter().map(|r| r.clamp(0.0, 0.999_999)).collect(),
        }
    }

    pub fn push(&mut self, roll: f64) {
        self.queue.push_back(roll.clamp(0.0, 0.999_999));
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl RollSource for ScriptedRolls {
    fn unit(&mut self) -> f64 {
        self.queue.pop_front().unwrap_or(0.5)
    }

    fn int_between(&mut self, lo: i32, hi: i32) -> i32 {
        if lo >= hi {
            return lo;
        }
        let span = (hi - lo + 1) as f64;
        lo + (self.unit() * span).floor().min(span - 1.0) as i32
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let pick = (self.unit() * len as f64).floor() as usize;
        pick.min(len - 1)
    }
}
