use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::constants::*;

/// Category label attached to a player action. Keys the resistance, streak
/// and mood multiplier tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Push,
    Break,
    Flow,
}

impl Tag {
    /// Column index into the mood damage table.
    pub fn index(self) -> usize {
        match self {
            Tag::Push => 0,
            Tag::Break => 1,
            Tag::Flow => 2,
        }
    }
}

/// One side of an encounter. `hp` is the only field that mutates during play
/// and is always held in `[0, max_hp]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    #[serde(default)]
    pub crit_rate: f64,
    #[serde(default)]
    pub evasion_rate: f64,
}

impl Combatant {
    pub fn new(name: impl Into<String>, max_hp: i32, atk: i32, def: i32, spd: i32) -> Self {
        let mut c = Self {
            name: name.into(),
            hp: max_hp,
            max_hp,
            atk,
            def,
            spd,
            crit_rate: 0.0,
            evasion_rate: 0.0,
        };
        c.sanitize();
        c
    }

    /// Clamps stats into sane ranges. Host tables are trusted but a bad row
    /// must never crash an encounter, so garbage is floored instead.
    pub fn sanitize(&mut self) {
        self.max_hp = self.max_hp.max(1);
        self.hp = self.hp.clamp(0, self.max_hp);
        self.atk = self.atk.max(0);
        self.def = self.def.max(0);
        self.spd = self.spd.max(0);
        self.crit_rate = sanitize_rate(self.crit_rate);
        self.evasion_rate = sanitize_rate(self.evasion_rate);
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount.max(0)).clamp(0, self.max_hp);
    }
}

fn sanitize_rate(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// A player-selectable action. `power` scales base damage; `tag` drives the
/// streak and mood interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDef {
    pub id: String,
    pub label: String,
    pub power: f64,
    #[serde(default)]
    pub tag: Option<Tag>,
}

/// The command table supplied by the host. Unknown ids resolve to the first
/// action in the table (or the built-in Jab when the table is empty) — a
/// missing id is a data bug, not a runtime fault.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandTable {
    pub actions: Vec<ActionDef>,
}

impl CommandTable {
    pub fn builtin() -> Self {
        Self {
            actions: vec![
                action("jab", "Jab", 1.0, Some(Tag::Push)),
                action("taunt", "Taunt", 1.05, Some(Tag::Break)),
                action("flatter", "Flattery", 0.95, Some(Tag::Flow)),
                action("riposte", "Riposte", 1.1, Some(Tag::Break)),
            ],
        }
    }

    pub fn resolve(&self, id: &str) -> ActionDef {
        self.actions
            .iter()
            .find(|a| a.id == id)
            .or_else(|| self.actions.first())
            .cloned()
            .unwrap_or_else(|| action("jab", "Jab", 1.0, Some(Tag::Push)))
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

fn action(id: &str, label: &str, power: f64, tag: Option<Tag>) -> ActionDef {
    ActionDef {
        id: id.to_string(),
        label: label.to_string(),
        power,
        tag,
    }
}

/// Tracks consecutive use of the same tag within one encounter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowState {
    #[serde(default)]
    pub last_tag: Option<Tag>,
    #[serde(default)]
    pub streak_count: u8,
}

impl FlowState {
    /// Records the chosen tag and returns the streak multiplier for it.
    /// Untagged actions leave the streak untouched.
    pub fn advance(&mut self, tag: Option<Tag>) -> f64 {
        let Some(tag) = tag else { return 1.0 };

        match self.last_tag {
            None => {
                self.last_tag = Some(tag);
                self.streak_count = 0;
                1.0
            }
            Some(last) if last == tag => {
                self.streak_count = (self.streak_count + 1).min(STREAK_CAP);
                STREAK_TABLE[self.streak_count as usize]
            }
            Some(_) => {
                self.last_tag = Some(tag);
                self.streak_count = 0;
                TAG_SWITCH_BONUS
            }
        }
    }
}

/// Opponent category. Boss-tier opponents get stat rebalancing, the mood
/// model and the secondary outcome roll; regular opponents skip all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentTier {
    Regular,
    BossTier,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpponentTraits {
    /// Per-tag damage resistance, e.g. 0.85 (resistant) to 1.15 (weak).
    /// Missing tags default to 1.0.
    #[serde(default)]
    pub tag_resist: HashMap<Tag, f64>,
    /// Free-text personality. Keyword-matched to seed the initial mood.
    #[serde(default)]
    pub personality: String,
}

impl OpponentTraits {
    pub fn resist(&self, tag: Option<Tag>) -> f64 {
        tag.and_then(|t| self.tag_resist.get(&t))
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(1.0)
    }
}

/// Authored opponent definition supplied by the host. Immutable during an
/// encounter; boss-tier stats are rebalanced into a fresh `Combatant` at
/// encounter start, the profile itself is never touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpponentProfile {
    pub id: String,
    pub name: String,
    pub max_hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    #[serde(default)]
    pub crit_rate: f64,
    #[serde(default)]
    pub evasion_rate: f64,
    #[serde(default)]
    pub traits: OpponentTraits,
    /// Counter-attack scaling. `None` falls back to the tier default
    /// (0.85 boss-tier, 1.0 regular).
    #[serde(default)]
    pub counter_multiplier: Option<f64>,
    /// Reply lines keyed by action id, shown in the OpponentReply beat.
    /// An empty bank skips the beat entirely.
    #[serde(default)]
    pub replies: HashMap<String, Vec<String>>,
    /// Closing line when the opponent wins the encounter.
    #[serde(default)]
    pub win_lines: Vec<String>,
    /// Closing line when the opponent is defeated.
    #[serde(default)]
    pub lose_lines: Vec<String>,
}

impl OpponentProfile {
    pub fn to_combatant(&self) -> Combatant {
        let mut c = Combatant::new(self.name.clone(), self.max_hp, self.atk, self.def, self.spd);
        c.crit_rate = self.crit_rate;
        c.evasion_rate = self.evasion_rate;
        c.sanitize();
        c
    }
}

/// A previously-defeated opponent eligible to assist the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistCandidate {
    pub id: String,
    pub name: String,
}

/// One-shot ally assist. Candidate and chance are fixed at encounter start;
/// `used` flips false -> true at most once and never back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistState {
    #[serde(default)]
    pub candidate: Option<AssistCandidate>,
    #[serde(default)]
    pub chance: f64,
    #[serde(default)]
    pub used: bool,
}

impl AssistState {
    pub fn disabled() -> Self {
        Self::default()
    }
}

/// Per-turn roll result. Regular encounters only ever produce `Hit` here;
/// boss-tier encounters layer a secondary miss/crit roll on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Hit,
    Miss,
    Crit,
}

/// Turn phase. `select_command` is only valid in `Select`; `advance` drives
/// everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Select,
    PlayerLine,
    OpponentReply,
    ApplyDamage,
    TurnEnd,
}

/// Terminal result of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncounterOutcome {
    Win,
    Lose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Opponent,
}

/// Read-only HUD view of one combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantView {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
}

impl From<&Combatant> for CombatantView {
    fn from(c: &Combatant) -> Self {
        Self {
            name: c.name.clone(),
            hp: c.hp,
            max_hp: c.max_hp,
        }
    }
}

/// Scratch state for the turn in flight. Rebuilt when a command is selected
/// and discarded at turn end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub action_id: String,
    pub label: String,
    pub power: f64,
    pub tag: Option<Tag>,
    pub player_line: String,
    pub reply_line: String,
    pub dmg_to_opponent: i32,
    pub dmg_to_player: i32,
    pub outcome: Outcome,
    pub narration: Vec<String>,
}

impl Default for TurnRecord {
    fn default() -> Self {
        Self {
            action_id: String::new(),
            label: String::new(),
            power: 1.0,
            tag: None,
            player_line: String::new(),
            reply_line: String::new(),
            dmg_to_opponent: 0,
            dmg_to_player: 0,
            outcome: Outcome::Hit,
            narration: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combatant_hp_clamped() {
        let mut c = Combatant::new("Rei", 100, 16, 8, 10);
        c.take_damage(30);
        assert_eq!(c.hp, 70);
        c.take_damage(200);
        assert_eq!(c.hp, 0);
        assert!(!c.is_alive());
        // Negative damage must not heal
        c.take_damage(-50);
        assert_eq!(c.hp, 0);
    }

    #[test]
    fn test_combatant_sanitize_garbage_stats() {
        let mut c = Combatant {
            name: "Bad Row".to_string(),
            hp: 999,
            max_hp: -5,
            atk: -3,
            def: -1,
            spd: -2,
            crit_rate: f64::NAN,
            evasion_rate: 2.5,
        };
        c.sanitize();
        assert_eq!(c.max_hp, 1);
        assert_eq!(c.hp, 1);
        assert_eq!(c.atk, 0);
        assert_eq!(c.crit_rate, 0.0);
        assert_eq!(c.evasion_rate, 1.0);
    }

    #[test]
    fn test_streak_first_action_is_neutral() {
        let mut flow = FlowState::default();
        assert_eq!(flow.advance(Some(Tag::Push)), 1.0);
        assert_eq!(flow.last_tag, Some(Tag::Push));
        assert_eq!(flow.streak_count, 0);
    }

    #[test]
    fn test_streak_repeats_decay_and_cap() {
        let mut flow = FlowState::default();
        flow.advance(Some(Tag::Push));
        assert_eq!(flow.advance(Some(Tag::Push)), 0.88);
        assert_eq!(flow.advance(Some(Tag::Push)), 0.78);
        assert_eq!(flow.advance(Some(Tag::Push)), 0.70);
        assert_eq!(flow.advance(Some(Tag::Push)), 0.64);
        // Capped: further repeats stay at the floor
        assert_eq!(flow.advance(Some(Tag::Push)), 0.64);
        assert_eq!(flow.streak_count, STREAK_CAP);
    }

    #[test]
    fn test_streak_switch_resets_and_grants_bonus() {
        let mut flow = FlowState::default();
        flow.advance(Some(Tag::Push));
        flow.advance(Some(Tag::Push));
        flow.advance(Some(Tag::Push));
        assert_eq!(flow.advance(Some(Tag::Break)), TAG_SWITCH_BONUS);
        assert_eq!(flow.streak_count, 0);
        assert_eq!(flow.last_tag, Some(Tag::Break));
    }

    #[test]
    fn test_streak_untagged_action_leaves_state() {
        let mut flow = FlowState::default();
        flow.advance(Some(Tag::Flow));
        assert_eq!(flow.advance(None), 1.0);
        assert_eq!(flow.last_tag, Some(Tag::Flow));
    }

    #[test]
    fn test_command_table_resolves_and_falls_back() {
        let table = CommandTable::builtin();
        let taunt = table.resolve("taunt");
        assert_eq!(taunt.label, "Taunt");
        assert_eq!(taunt.tag, Some(Tag::Break));

        // Unknown id falls back to the first action
        let fallback = table.resolve("no_such_action");
        assert_eq!(fallback.id, "jab");

        // Empty table falls back to the built-in Jab
        let empty = CommandTable::default();
        assert_eq!(empty.resolve("anything").id, "jab");
    }

    #[test]
    fn test_tables_deserialize_from_json() {
        let json = r#"{
            "id": "mirei",
            "name": "Mirei",
            "max_hp": 120, "atk": 18, "def": 8, "spd": 10,
            "traits": {
                "tag_resist": { "push": 0.9, "flow": 1.1 },
                "personality": "proud queen type"
            },
            "lose_lines": ["...fine. You win."]
        }"#;
        let profile: OpponentProfile = serde_json::from_str(json).expect("profile parses");
        assert_eq!(profile.traits.resist(Some(Tag::Push)), 0.9);
        assert_eq!(profile.traits.resist(Some(Tag::Break)), 1.0);
        assert_eq!(profile.traits.resist(None), 1.0);
        assert!(profile.counter_multiplier.is_none());

        let cmds: CommandTable = serde_json::from_str(
            r#"[{ "id": "quip", "label": "Quip", "power": 1.2, "tag": "flow" }]"#,
        )
        .expect("command table parses");
        assert_eq!(cmds.resolve("quip").tag, Some(Tag::Flow));
    }
}
