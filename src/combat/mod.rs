//! Battle system: types, damage math, mood model and the turn resolver.

pub mod damage;
pub mod lines;
pub mod mood;
pub mod resolver;
pub mod roll;
pub mod types;

pub use damage::*;
pub use lines::{fmt, pick, LineBank};
pub use mood::{initial_mood, Mood};
pub use resolver::{CombatResolver, EncounterSetup};
pub use roll::{RandRolls, RollSource, ScriptedRolls};
pub use types::*;
