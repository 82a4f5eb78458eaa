//! Core tuning data shared across the battle system.

pub mod constants;

pub use constants::*;
