//! Narration line banks and template formatting.
//!
//! Line text is authored data supplied by the host; this module only picks
//! and formats. Missing banks degrade to empty strings so a thin data table
//! never breaks the turn flow.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::roll::RollSource;

/// Player-side line banks, keyed by action id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineBank {
    #[serde(default)]
    pub player: HashMap<String, Vec<String>>,
}

impl LineBank {
    /// Picks a player line for the chosen action. Empty bank yields a silent
    /// beat rather than an error.
    pub fn player_line(&self, action_id: &str, rng: &mut impl RollSource) -> String {
        match self.player.get(action_id) {
            Some(lines) => pick(lines, rng).unwrap_or_default(),
            None => String::new(),
        }
    }
}

/// Uniform pick from a bank. Empty banks yield nothing.
pub fn pick(lines: &[String], rng: &mut impl RollSource) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    Some(lines[rng.index(lines.len())].clone())
}

/// Replaces `{key}` placeholders with values. Unknown placeholders are left
/// verbatim so authoring typos stay visible.
pub fn fmt(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}
