//! Banter - Turn-Resolution Core for a Narrative Combat Minigame
//!
//! Pure, host-driven battle logic: the UI layer feeds player commands and
//! "tap to continue" advances in, reads phases and narration back out, and
//! owns everything else (rendering, input, scene flow, persistence).
//! Every random draw goes through an injected [`combat::RollSource`] so
//! encounters replay deterministically under a fixed seed.

pub mod combat;
pub mod core;
pub mod encounter;

pub use combat::{CombatResolver, EncounterSetup};
