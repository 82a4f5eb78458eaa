//! Pure damage math.
//!
//! These functions have no side effects: they take combatant stats and a roll
//! source and return values. The resolver owns all state mutation.

use crate::core::constants::*;

use super::roll::RollSource;
use super::types::{Combatant, Outcome};

/// Result of one damage computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRoll {
    pub amount: i32,
    pub is_crit: bool,
    pub is_miss: bool,
}

/// Computes attack damage: evasion roll first (a miss short-circuits), then
/// crit roll, then `max(1, floor((atk - def) * power * rand))` with jitter in
/// `[0.90, 1.10)`. Crits multiply by 1.6, floored, minimum 1.
///
/// Negative or non-finite `power` is clamped to 0 — combat never faults on
/// bad table data.
pub fn compute_damage(
    attacker: &Combatant,
    defender: &Combatant,
    power: f64,
    rng: &mut impl RollSource,
) -> DamageRoll {
    let power = if power.is_finite() { power.max(0.0) } else { 0.0 };

    if rng.unit() < defender.evasion_rate {
        return DamageRoll {
            amount: 0,
            is_crit: false,
            is_miss: true,
        };
    }

    let is_crit = rng.unit() < attacker.crit_rate;
    let jitter = rng.between(DAMAGE_RAND_MIN, DAMAGE_RAND_MAX);

    let raw = (attacker.atk - defender.def) as f64 * power * jitter;
    let mut amount = (raw.floor() as i32).max(1);
    if is_crit {
        amount = ((amount as f64 * CRIT_MULTIPLIER).floor() as i32).max(1);
    }

    DamageRoll {
        amount,
        is_crit,
        is_miss: false,
    }
}

/// Miss and crit chances for the boss-tier secondary outcome roll, from the
/// attacker/defender speed differential. Both are clamped and then scaled
/// down proportionally so their sum never exceeds the 0.40 budget.
pub fn outcome_chances(spd_diff: i32) -> (f64, f64) {
    let diff = spd_diff as f64;
    let mut miss =
        (OUTCOME_MISS_BASE - diff * OUTCOME_SPD_STEP).clamp(OUTCOME_MISS_MIN, OUTCOME_MISS_MAX);
    let mut crit =
        (OUTCOME_CRIT_BASE + diff * OUTCOME_SPD_STEP).clamp(OUTCOME_CRIT_MIN, OUTCOME_CRIT_MAX);

    let sum = miss + crit;
    if sum > OUTCOME_CHANCE_BUDGET {
        let scale = sum / OUTCOME_CHANCE_BUDGET;
        miss /= scale;
        crit /= scale;
    }
    (miss, crit)
}

/// Boss-tier outcome roll, layered on top of the base evasion/crit roll.
/// One uniform draw decides miss, crit or plain hit.
pub fn roll_outcome(
    attacker: &Combatant,
    defender: &Combatant,
    rng: &mut impl RollSource,
) -> Outcome {
    let (miss, crit) = outcome_chances(attacker.spd - defender.spd);
    let r = rng.unit();
    if r < miss {
        Outcome::Miss
    } else if r < miss + crit {
        Outcome::Crit
    } else {
        Outcome::Hit
    }
}

/// Rebalances a boss-tier opponent against the player once at encounter
/// start, returning a fresh combatant. Clamps keep authored stat tables from
/// producing unwinnable or trivial fights. The input is never mutated, so
/// cached profiles cannot leak adjustments across encounters.
pub fn rebalance(opponent: &Combatant, player: &Combatant) -> Combatant {
    let mut out = opponent.clone();

    let hp_min = (player.max_hp as f64 * REBALANCE_HP_MIN_RATIO).floor() as i32;
    let hp_max = (player.max_hp as f64 * REBALANCE_HP_MAX_RATIO).floor() as i32;
    out.max_hp = out.max_hp.clamp(hp_min, hp_max);
    out.hp = out.hp.clamp(hp_min, hp_max).min(out.max_hp);

    out.atk = out.atk.min(player.atk).max(REBALANCE_ATK_FLOOR);
    out.def = out.def.min(player.def).max(REBALANCE_DEF_FLOOR);

    let spd_min = (player.spd - REBALANCE_SPD_BELOW).max(REBALANCE_SPD_FLOOR);
    let spd_max = player.spd + REBALANCE_SPD_ABOVE;
    out.spd = out.spd.clamp(spd_min, spd_max.max(spd_min));

    out
}

/// Player attack bonus from the host's renown/nomination count, applied once
/// at encounter start. Diminishing: 0 -> 1.0, grows toward but never reaches
/// +67%.
pub fn renown_bonus(renown: u32) -> f64 {
    let n = renown as f64;
    1.0 + (n * RENOWN_BONUS_NUM) / (1.0 + n * RENOWN_BONUS_DEN)
}
