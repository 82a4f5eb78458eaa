//! Walk-distance encounter pacing and opponent picks.
//!
//! The host feeds walked distance into the counter each field tick; when the
//! accumulated distance crosses a randomized threshold an encounter triggers
//! and the counter re-arms with a shorter follow-up window.

use serde::{Deserialize, Serialize};

use crate::combat::roll::RollSource;
use crate::core::constants::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterCounter {
    acc: f64,
    threshold: f64,
}

impl EncounterCounter {
    pub fn new(rng: &mut impl RollSource) -> Self {
        Self {
            acc: 0.0,
            threshold: rng.between(ENCOUNTER_FIRST_THRESHOLD_MIN, ENCOUNTER_FIRST_THRESHOLD_MAX),
        }
    }

    /// Accumulates walked distance. Returns true when an encounter triggers;
    /// the counter resets itself with a follow-up threshold.
    pub fn add_steps(&mut self, distance: f64, rng: &mut impl RollSource) -> bool {
        if distance.is_finite() && distance > 0.0 {
            self.acc += distance;
        }
        if self.acc >= self.threshold {
            self.acc = 0.0;
            self.threshold =
                rng.between(ENCOUNTER_NEXT_THRESHOLD_MIN, ENCOUNTER_NEXT_THRESHOLD_MAX);
            return true;
        }
        false
    }
}

/// Weighted opponent pick: one rare id at a fixed low chance, the rest
/// uniform. Returns `None` only when the common pool is empty.
pub fn pick_opponent_id(
    rare: Option<&str>,
    common: &[&str],
    rng: &mut impl RollSource,
) -> Option<String> {
    if let Some(rare) = rare {
        if rng.unit() < RARE_OPPONENT_CHANCE {
            return Some(rare.to_string());
        }
    }
    if common.is_empty() {
        return None;
    }
    Some(common[rng.index(common.len())].to_string())
}
