//! Opponent mood model (boss-tier only).
//!
//! A four-state machine fed once per turn with the chosen tag, the outcome
//! roll and the damage dealt. Mood is never shown directly; it only bends the
//! next turn's damage and counter multipliers.

use serde::{Deserialize, Serialize};

use crate::core::constants::*;

use super::types::{Outcome, Tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Calm,
    Irritated,
    Embarrassed,
    Aggressive,
}

impl Mood {
    /// Row index into the mood multiplier tables.
    pub fn index(self) -> usize {
        match self {
            Mood::Calm => 0,
            Mood::Irritated => 1,
            Mood::Embarrassed => 2,
            Mood::Aggressive => 3,
        }
    }
}

/// Seeds the initial mood from a free-text personality trait. Substring
/// keyword match; anything unrecognized starts calm.
pub fn initial_mood(personality: &str) -> Mood {
    let p = personality.to_lowercase();
    if p.is_empty() {
        return Mood::Calm;
    }
    if p.contains("queen") || p.contains("proud") {
        Mood::Calm
    } else if p.contains("shy") || p.contains("soft") {
        Mood::Embarrassed
    } else if p.contains("hot") || p.contains("aggr") {
        Mood::Aggressive
    } else if p.contains("clingy") || p.contains("jealous") {
        Mood::Irritated
    } else {
        Mood::Calm
    }
}

/// Coarse damage tier used to gate mood escalation: 2 for big hits, 1 for
/// solid hits, 0 otherwise.
pub fn hit_level(damage_dealt: i32) -> u8 {
    if damage_dealt >= HIT_LEVEL_HIGH {
        2
    } else if damage_dealt >= HIT_LEVEL_LOW {
        1
    } else {
        0
    }
}

/// Pure per-turn transition: tag-based table first, then the outcome
/// override (a miss emboldens her, a crit rattles her).
pub fn next_mood(current: Mood, tag: Option<Tag>, outcome: Outcome, damage_dealt: i32) -> Mood {
    let level = hit_level(damage_dealt);

    let mut next = match tag {
        Some(Tag::Push) => match current {
            Mood::Calm if level >= 1 => Mood::Irritated,
            Mood::Calm => Mood::Calm,
            Mood::Irritated if level >= 2 => Mood::Aggressive,
            Mood::Irritated => Mood::Irritated,
            Mood::Embarrassed => Mood::Irritated,
            Mood::Aggressive => Mood::Aggressive,
        },
        Some(Tag::Break) => match current {
            Mood::Calm if level >= 1 => Mood::Embarrassed,
            Mood::Calm => Mood::Calm,
            Mood::Irritated => Mood::Embarrassed,
            Mood::Embarrassed if level >= 2 => Mood::Irritated,
            Mood::Embarrassed => Mood::Embarrassed,
            Mood::Aggressive if level >= 2 => Mood::Irritated,
            Mood::Aggressive => Mood::Aggressive,
        },
        Some(Tag::Flow) => match current {
            Mood::Aggressive => Mood::Irritated,
            _ => Mood::Calm,
        },
        None => current,
    };

    match outcome {
        Outcome::Miss => {
            next = match next {
                Mood::Calm => Mood::Irritated,
                Mood::Irritated => Mood::Aggressive,
                Mood::Embarrassed => Mood::Irritated,
                Mood::Aggressive => Mood::Aggressive,
            };
        }
        Outcome::Crit => {
            next = match next {
                Mood::Calm => Mood::Embarrassed,
                Mood::Irritated => Mood::Embarrassed,
                Mood::Aggressive => Mood::Irritated,
                Mood::Embarrassed => Mood::Embarrassed,
            };
        }
        Outcome::Hit => {}
    }

    next
}

/// How well a tag lands against the current mood.
pub fn damage_multiplier(mood: Mood, tag: Option<Tag>) -> f64 {
    match tag {
        Some(tag) => MOOD_DAMAGE_MULTIPLIERS[mood.index()][tag.index()],
        None => 1.0,
    }
}

/// How hard the counter-attack comes back in the current mood.
pub fn counter_multiplier(mood: Mood) -> f64 {
    MOOD_COUNTER_MULTIPLIERS[mood.index()]
}
