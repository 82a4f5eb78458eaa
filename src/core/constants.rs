//! Tuning constants for the battle core.
//!
//! All of these are hand-tuned balance values. Treat them as configuration:
//! change them here, never inline.

// Damage formula
pub const DAMAGE_RAND_MIN: f64 = 0.90;
pub const DAMAGE_RAND_MAX: f64 = 1.10;
pub const CRIT_MULTIPLIER: f64 = 1.6;

// Streak economy: index = consecutive repeats of the same tag (capped).
// Repeating a tag weakens it, switching grants a small bonus.
pub const STREAK_TABLE: [f64; 5] = [1.0, 0.88, 0.78, 0.70, 0.64];
pub const STREAK_CAP: u8 = 4;
pub const TAG_SWITCH_BONUS: f64 = 1.05;

// Mood multipliers, rows indexed by Mood (calm, irritated, embarrassed,
// aggressive), columns by Tag (push, break, flow).
pub const MOOD_DAMAGE_MULTIPLIERS: [[f64; 3]; 4] = [
    [0.95, 1.00, 1.05], // calm
    [0.90, 1.05, 1.12], // irritated
    [1.12, 0.92, 1.00], // embarrassed
    [1.02, 1.10, 0.88], // aggressive
];

// Counter-attack scaling per mood (same row order).
pub const MOOD_COUNTER_MULTIPLIERS: [f64; 4] = [0.92, 1.00, 0.96, 1.10];

// Damage-dealt thresholds for mood escalation tiers.
pub const HIT_LEVEL_HIGH: i32 = 18;
pub const HIT_LEVEL_LOW: i32 = 10;

// Boss-tier secondary outcome roll (speed differential based).
pub const OUTCOME_MISS_BASE: f64 = 0.10;
pub const OUTCOME_MISS_MIN: f64 = 0.05;
pub const OUTCOME_MISS_MAX: f64 = 0.20;
pub const OUTCOME_CRIT_BASE: f64 = 0.12;
pub const OUTCOME_CRIT_MIN: f64 = 0.06;
pub const OUTCOME_CRIT_MAX: f64 = 0.25;
pub const OUTCOME_SPD_STEP: f64 = 0.01;
/// miss + crit may never exceed this; both scale down proportionally past it.
pub const OUTCOME_CHANCE_BUDGET: f64 = 0.40;

// Boss-tier rebalance bounds, relative to the player's stats. Keeps authored
// profiles from producing unwinnable or trivial encounters.
pub const REBALANCE_HP_MIN_RATIO: f64 = 0.95;
pub const REBALANCE_HP_MAX_RATIO: f64 = 1.20;
pub const REBALANCE_ATK_FLOOR: i32 = 6;
pub const REBALANCE_DEF_FLOOR: i32 = 2;
pub const REBALANCE_SPD_BELOW: i32 = 2;
pub const REBALANCE_SPD_ABOVE: i32 = 3;
pub const REBALANCE_SPD_FLOOR: i32 = 6;

// Counter-attack defaults when the profile does not supply one.
pub const BOSS_COUNTER_MULTIPLIER: f64 = 0.85;
pub const REGULAR_COUNTER_MULTIPLIER: f64 = 1.0;

// One-shot ally assist.
pub const ASSIST_CHANCE_REGULAR: f64 = 0.40;
pub const ASSIST_CHANCE_BOSS: f64 = 0.30;
pub const ASSIST_ATK_SCALE: f64 = 0.35;
pub const ASSIST_ROLL_MIN: i32 = 2;
pub const ASSIST_ROLL_MAX: i32 = 7;
pub const ASSIST_DAMAGE_MIN: i32 = 6;
pub const ASSIST_DAMAGE_MAX: i32 = 22;

// Renown attack bonus: 1 + (n * NUM) / (1 + n * DEN), applied once at
// encounter start. Diminishing, asymptote below +67%.
pub const RENOWN_BONUS_NUM: f64 = 0.2;
pub const RENOWN_BONUS_DEN: f64 = 0.3;

// Walk-distance encounter pacing.
pub const ENCOUNTER_FIRST_THRESHOLD_MIN: f64 = 420.0;
pub const ENCOUNTER_FIRST_THRESHOLD_MAX: f64 = 840.0;
pub const ENCOUNTER_NEXT_THRESHOLD_MIN: f64 = 180.0;
pub const ENCOUNTER_NEXT_THRESHOLD_MAX: f64 = 420.0;
pub const RARE_OPPONENT_CHANCE: f64 = 0.02;
