//! Turn resolution for one encounter.
//!
//! `CombatResolver` owns all per-encounter state (both combatants, streak,
//! mood, assist, phase) and sequences a turn through the phase machine:
//!
//! ```text
//! Select --select_command--> PlayerLine
//! PlayerLine --advance--> OpponentReply     (reply line exists)
//! PlayerLine --advance--> ApplyDamage       (no reply line)
//! OpponentReply --advance--> ApplyDamage
//! ApplyDamage --advance--> TurnEnd          (damage, assist, counter, mood)
//! TurnEnd --advance--> Select | terminal win/lose
//! ```
//!
//! Calls that make no sense for the current phase are no-ops; the host gates
//! input itself but duplicate triggers must never corrupt an encounter.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::constants::*;

use super::damage::{compute_damage, rebalance, renown_bonus, roll_outcome};
use super::lines::{fmt, pick, LineBank};
use super::mood::{self, Mood};
use super::roll::RollSource;
use super::types::{
    AssistCandidate, AssistState, Combatant, CombatantView, CommandTable, EncounterOutcome,
    FlowState, OpponentProfile, OpponentTier, Outcome, Phase, Side, Tag, TurnRecord,
};

/// Everything the host supplies to start an encounter. All of it is read
/// once; the resolver never writes back to host data.
#[derive(Debug, Clone)]
pub struct EncounterSetup {
    pub player: Combatant,
    /// Host-tracked nomination/renown count; scales player atk once.
    pub renown: u32,
    pub opponent: OpponentProfile,
    pub tier: OpponentTier,
    /// Empty table falls back to the built-in command set.
    pub commands: CommandTable,
    pub lines: LineBank,
    /// Previously-defeated boss-tier opponents, for assist eligibility.
    pub defeated: Vec<AssistCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatResolver {
    player: Combatant,
    opponent: Combatant,
    tier: OpponentTier,
    tag_resist: HashMap<Tag, f64>,
    counter_multiplier: f64,
    replies: HashMap<String, Vec<String>>,
    win_lines: Vec<String>,
    lose_lines: Vec<String>,
    commands: CommandTable,
    lines: LineBank,
    mood: Option<Mood>,
    flow: FlowState,
    assist: AssistState,
    phase: Phase,
    turn: TurnRecord,
    outcome: Option<EncounterOutcome>,
}

impl CombatResolver {
    /// Starts an encounter: rebalances boss-tier stats, applies the renown
    /// bonus, seeds the mood from the personality trait and fixes the assist
    /// candidate for the whole encounter.
    pub fn start_encounter(setup: EncounterSetup, rng: &mut impl RollSource) -> Self {
        let EncounterSetup {
            mut player,
            renown,
            opponent: profile,
            tier,
            commands,
            lines,
            defeated,
        } = setup;

        player.sanitize();
        player.atk = ((player.atk as f64 * renown_bonus(renown)).floor() as i32).max(0);

        let mut opponent = profile.to_combatant();
        let mood = match tier {
            OpponentTier::BossTier => {
                opponent = rebalance(&opponent, &player);
                Some(mood::initial_mood(&profile.traits.personality))
            }
            OpponentTier::Regular => None,
        };

        let tier_default = match tier {
            OpponentTier::BossTier => BOSS_COUNTER_MULTIPLIER,
            OpponentTier::Regular => REGULAR_COUNTER_MULTIPLIER,
        };
        let counter_multiplier = profile
            .counter_multiplier
            .filter(|m| m.is_finite() && *m >= 0.0)
            .unwrap_or(tier_default);

        let commands = if commands.is_empty() {
            CommandTable::builtin()
        } else {
            commands
        };

        Self {
            player,
            opponent,
            tier,
            tag_resist: profile.traits.tag_resist.clone(),
            counter_multiplier,
            replies: profile.replies.clone(),
            win_lines: profile.win_lines.clone(),
            lose_lines: profile.lose_lines.clone(),
            commands,
            lines,
            mood,
            flow: FlowState::default(),
            assist: Self::init_assist(&profile.id, tier, defeated, rng),
            phase: Phase::Select,
            turn: TurnRecord::default(),
            outcome: None,
        }
    }

    /// Fixes the assist candidate at encounter start. The current opponent
    /// never assists against herself; an empty pool disables the mechanic.
    fn init_assist(
        current_id: &str,
        tier: OpponentTier,
        defeated: Vec<AssistCandidate>,
        rng: &mut impl RollSource,
    ) -> AssistState {
        let pool: Vec<AssistCandidate> = defeated
            .into_iter()
            .filter(|c| !c.id.is_empty() && c.id != current_id)
            .collect();
        if pool.is_empty() {
            return AssistState::disabled();
        }

        let chance = match tier {
            OpponentTier::Regular => ASSIST_CHANCE_REGULAR,
            OpponentTier::BossTier => ASSIST_CHANCE_BOSS,
        };
        let candidate = pool[rng.index(pool.len())].clone();
        AssistState {
            candidate: Some(candidate),
            chance,
            used: false,
        }
    }

    /// Player picks an action. Valid only in `Select`; anywhere else this is
    /// a no-op. Computes both damage numbers up front (the boss-tier outcome
    /// roll happens later, in the apply step) and advances the streak.
    pub fn select_command(&mut self, action_id: &str, rng: &mut impl RollSource) {
        if self.phase != Phase::Select || self.outcome.is_some() {
            return;
        }

        let action = self.commands.resolve(action_id);
        let tag = action.tag;

        let mut turn = TurnRecord {
            action_id: action.id.clone(),
            label: action.label.clone(),
            power: action.power,
            tag,
            ..TurnRecord::default()
        };

        turn.player_line = self.lines.player_line(&action.id, rng);
        turn.reply_line = self
            .replies
            .get(&action.id)
            .and_then(|bank| pick(bank, rng))
            .unwrap_or_default();

        let tag_resist = tag
            .and_then(|t| self.tag_resist.get(&t))
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(1.0);
        let streak = self.flow.advance(tag);
        let mood_mult = self
            .mood
            .map(|m| mood::damage_multiplier(m, tag))
            .unwrap_or(1.0);
        let effective_power = action.power * tag_resist * streak * mood_mult;

        turn.dmg_to_opponent = compute_damage(&self.player, &self.opponent, effective_power, rng).amount;

        // Flat counter, scaled by the profile multiplier and the current mood
        let raw_counter = compute_damage(&self.opponent, &self.player, 1.0, rng).amount;
        let mood_counter = self.mood.map(mood::counter_multiplier).unwrap_or(1.0);
        let counter_mul = self.counter_multiplier * mood_counter;
        turn.dmg_to_player = ((raw_counter as f64 * counter_mul).floor() as i32).max(0);

        self.turn = turn;
        self.phase = Phase::PlayerLine;
    }

    /// Moves past the current narration beat. With nothing pending (in
    /// `Select`, or after the encounter ended) this is a no-op.
    pub fn advance(&mut self, rng: &mut impl RollSource) {
        if self.outcome.is_some() {
            return;
        }

        match self.phase {
            Phase::Select => {}
            Phase::PlayerLine => {
                self.phase = if self.turn.reply_line.is_empty() {
                    Phase::ApplyDamage
                } else {
                    Phase::OpponentReply
                };
            }
            Phase::OpponentReply => {
                self.phase = Phase::ApplyDamage;
            }
            Phase::ApplyDamage => {
                self.resolve_turn(rng);
                self.phase = Phase::TurnEnd;
            }
            Phase::TurnEnd => {
                if !self.opponent.is_alive() {
                    self.outcome = Some(EncounterOutcome::Win);
                    self.turn.narration.push("Victory!".to_string());
                } else if !self.player.is_alive() {
                    self.outcome = Some(EncounterOutcome::Lose);
                    self.turn.narration.push("Defeat...".to_string());
                } else {
                    self.turn = TurnRecord::default();
                    self.phase = Phase::Select;
                }
            }
        }
    }

    /// The damage application step: boss-tier outcome roll, opponent damage,
    /// one-shot assist, counter-attack, mood transition, narration.
    fn resolve_turn(&mut self, rng: &mut impl RollSource) {
        let mut narration = Vec::new();

        let mut outcome = Outcome::Hit;
        let mut dmg = self.turn.dmg_to_opponent;

        if self.tier == OpponentTier::BossTier {
            outcome = roll_outcome(&self.player, &self.opponent, rng);
            match outcome {
                Outcome::Miss => dmg = 0,
                Outcome::Crit => dmg = ((dmg as f64 * CRIT_MULTIPLIER).floor() as i32).max(1),
                Outcome::Hit => {}
            }
        }
        self.turn.outcome = outcome;
        self.turn.dmg_to_opponent = dmg;

        narration.push(match outcome {
            Outcome::Miss => fmt(
                "{name}'s {label} misses!",
                &[("name", &self.player.name), ("label", &self.turn.label)],
            ),
            Outcome::Crit => fmt(
                "{name}'s {label} lands a CRITICAL HIT for {dmg} damage!",
                &[
                    ("name", &self.player.name),
                    ("label", &self.turn.label),
                    ("dmg", &dmg.to_string()),
                ],
            ),
            Outcome::Hit => fmt(
                "{name}'s {label} hits for {dmg} damage",
                &[
                    ("name", &self.player.name),
                    ("label", &self.turn.label),
                    ("dmg", &dmg.to_string()),
                ],
            ),
        });

        self.opponent.take_damage(dmg);

        if self.opponent.is_alive() && self.player.is_alive() {
            if let Some(line) = self.maybe_assist(rng) {
                narration.extend(line);
            }
        }

        if self.opponent.is_alive() {
            let counter = self.turn.dmg_to_player;
            self.player.take_damage(counter);
            narration.push(fmt(
                "{name}'s counter hits for {dmg} damage",
                &[("name", &self.opponent.name), ("dmg", &counter.to_string())],
            ));
        }

        if let Some(current) = self.mood {
            self.mood = Some(mood::next_mood(current, self.turn.tag, outcome, dmg));
        }

        if self.tier == OpponentTier::BossTier {
            if !self.opponent.is_alive() {
                if let Some(line) = pick(&self.lose_lines, rng) {
                    narration.push(line);
                }
            } else if !self.player.is_alive() {
                if let Some(line) = pick(&self.win_lines, rng) {
                    narration.push(line);
                }
            }
        }

        self.turn.narration = narration;
    }

    /// Rolls the one-shot ally assist. Fires at most once per encounter and
    /// only while both sides are still standing.
    fn maybe_assist(&mut self, rng: &mut impl RollSource) -> Option<Vec<String>> {
        if self.assist.used {
            return None;
        }
        let candidate = self.assist.candidate.clone()?;
        if rng.unit() >= self.assist.chance {
            return None;
        }

        self.assist.used = true;

        let base = (self.player.atk as f64 * ASSIST_ATK_SCALE).floor() as i32;
        let roll = rng.int_between(ASSIST_ROLL_MIN, ASSIST_ROLL_MAX);
        let dmg = (base + roll).clamp(ASSIST_DAMAGE_MIN, ASSIST_DAMAGE_MAX);
        self.opponent.take_damage(dmg);

        Some(vec![
            fmt("{name} steps in to help!", &[("name", &candidate.name)]),
            fmt(
                "{name}'s assist hits for {dmg} damage",
                &[("name", &candidate.name), ("dmg", &dmg.to_string())],
            ),
        ])
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<EncounterOutcome> {
        self.outcome
    }

    /// The turn in flight: the host reads `player_line`/`reply_line` during
    /// the narration beats and `narration` once damage has been applied.
    pub fn turn(&self) -> &TurnRecord {
        &self.turn
    }

    pub fn turn_narration(&self) -> &[String] {
        &self.turn.narration
    }

    pub fn combatant_view(&self, side: Side) -> CombatantView {
        match side {
            Side::Player => (&self.player).into(),
            Side::Opponent => (&self.opponent).into(),
        }
    }

    /// Final player HP for the host's save carry-over (the host resets to
    /// full on a loss; this core never writes persistence).
    pub fn player_hp(&self) -> i32 {
        self.player.hp
    }

    pub fn opponent_defeated(&self) -> bool {
        !self.opponent.is_alive()
    }

    pub fn mood(&self) -> Option<Mood> {
        self.mood
    }

    pub fn assist(&self) -> &AssistState {
        &self.assist
    }

    pub fn flow(&self) -> &FlowState {
        &self.flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::roll::ScriptedRolls;
    use crate::combat::types::Tag;

    fn player() -> Combatant {
        Combatant::new("Rei", 100, 16, 8, 10)
    }

    fn boss_profile() -> OpponentProfile {
        OpponentProfile {
            id: "mirei".to_string(),
            name: "Mirei".to_string(),
            max_hp: 120,
            atk: 18,
            def: 8,
            spd: 10,
            crit_rate: 0.0,
            evasion_rate: 0.0,
            traits: Default::default(),
            counter_multiplier: None,
            replies: Default::default(),
            win_lines: vec![],
            lose_lines: vec![],
        }
    }

    fn setup(tier: OpponentTier) -> EncounterSetup {
        EncounterSetup {
            player: player(),
            renown: 0,
            opponent: boss_profile(),
            tier,
            commands: CommandTable::builtin(),
            lines: LineBank::default(),
            defeated: vec![],
        }
    }

    #[test]
    fn test_start_rebalances_boss_tier_only() {
        let mut rng = ScriptedRolls::default();
        let mut authored = setup(OpponentTier::BossTier);
        authored.opponent.atk = 40;
        authored.opponent.max_hp = 500;
        let boss = CombatResolver::start_encounter(authored, &mut rng);
        let view = boss.combatant_view(Side::Opponent);
        assert!(view.max_hp <= 120);

        let mut regular = setup(OpponentTier::Regular);
        regular.opponent.atk = 40;
        regular.opponent.max_hp = 500;
        let r = CombatResolver::start_encounter(regular, &mut rng);
        assert_eq!(r.combatant_view(Side::Opponent).max_hp, 500);
        assert!(r.mood().is_none());
    }

    #[test]
    fn test_renown_scales_player_attack_once() {
        let mut rng = ScriptedRolls::default();
        let mut s = setup(OpponentTier::Regular);
        s.renown = 5;
        let resolver = CombatResolver::start_encounter(s, &mut rng);
        // 16 * (1 + 1.0/2.5) = 16 * 1.4 = 22.4 -> 22
        assert_eq!(resolver.player.atk, 22);
    }

    #[test]
    fn test_select_command_only_in_select_phase() {
        let mut rng = ScriptedRolls::default();
        let mut resolver = CombatResolver::start_encounter(setup(OpponentTier::Regular), &mut rng);

        resolver.select_command("jab", &mut rng);
        assert_eq!(resolver.phase(), Phase::PlayerLine);
        let dmg = resolver.turn().dmg_to_opponent;

        // Second select while a turn is in flight must change nothing
        resolver.select_command("taunt", &mut rng);
        assert_eq!(resolver.phase(), Phase::PlayerLine);
        assert_eq!(resolver.turn().action_id, "jab");
        assert_eq!(resolver.turn().dmg_to_opponent, dmg);
    }

    #[test]
    fn test_advance_in_select_is_noop() {
        let mut rng = ScriptedRolls::default();
        let mut resolver = CombatResolver::start_encounter(setup(OpponentTier::Regular), &mut rng);
        resolver.advance(&mut rng);
        assert_eq!(resolver.phase(), Phase::Select);
        let view = resolver.combatant_view(Side::Player);
        assert_eq!(view.hp, view.max_hp);
    }

    #[test]
    fn test_unknown_action_falls_back() {
        let mut rng = ScriptedRolls::default();
        let mut resolver = CombatResolver::start_encounter(setup(OpponentTier::Regular), &mut rng);
        resolver.select_command("definitely_not_an_action", &mut rng);
        assert_eq!(resolver.turn().action_id, "jab");
        assert_eq!(resolver.phase(), Phase::PlayerLine);
    }

    #[test]
    fn test_reply_beat_skipped_without_reply_line() {
        let mut rng = ScriptedRolls::default();
        let mut resolver = CombatResolver::start_encounter(setup(OpponentTier::Regular), &mut rng);
        resolver.select_command("jab", &mut rng);
        assert!(resolver.turn().reply_line.is_empty());
        resolver.advance(&mut rng);
        assert_eq!(resolver.phase(), Phase::ApplyDamage);
    }

    #[test]
    fn test_reply_beat_taken_when_bank_exists() {
        let mut rng = ScriptedRolls::default();
        let mut s = setup(OpponentTier::BossTier);
        s.opponent
            .replies
            .insert("jab".to_string(), vec!["Is that all?".to_string()]);
        let mut resolver = CombatResolver::start_encounter(s, &mut rng);
        resolver.select_command("jab", &mut rng);
        assert_eq!(resolver.turn().reply_line, "Is that all?");
        resolver.advance(&mut rng);
        assert_eq!(resolver.phase(), Phase::OpponentReply);
        resolver.advance(&mut rng);
        assert_eq!(resolver.phase(), Phase::ApplyDamage);
    }

    #[test]
    fn test_full_turn_applies_both_damage_numbers() {
        // Regular tier, scripted rolls: player line/reply picks consume
        // nothing (empty banks), then evasion, crit, jitter for the player
        // swing, then evasion, crit, jitter for the counter.
        let mut rng = ScriptedRolls::new(&[
            0.9, 0.9, 0.5, // player swing: no evasion, no crit, jitter 1.0
            0.9, 0.9, 0.5, // counter: same
        ]);
        let mut resolver = CombatResolver::start_encounter(setup(OpponentTier::Regular), &mut rng);
        resolver.select_command("jab", &mut rng);
        // (16 - 8) * 1.0 = 8 out, (18 - 8) * 1.0 = 10 back
        assert_eq!(resolver.turn().dmg_to_opponent, 8);
        assert_eq!(resolver.turn().dmg_to_player, 10);

        resolver.advance(&mut rng); // PlayerLine -> ApplyDamage
        resolver.advance(&mut rng); // ApplyDamage -> TurnEnd (applies)
        assert_eq!(resolver.phase(), Phase::TurnEnd);
        assert_eq!(resolver.combatant_view(Side::Opponent).hp, 112);
        assert_eq!(resolver.combatant_view(Side::Player).hp, 90);
        assert!(!resolver.turn_narration().is_empty());

        resolver.advance(&mut rng); // TurnEnd -> Select (both alive)
        assert_eq!(resolver.phase(), Phase::Select);
        assert!(resolver.outcome().is_none());
        assert!(resolver.turn_narration().is_empty());
    }

    #[test]
    fn test_boss_miss_zeroes_damage_and_skips_counter_reduction() {
        // Boss tier with even speed: miss band is [0, 0.10).
        let mut rng = ScriptedRolls::new(&[
            0.9, 0.9, 0.5, // player swing
            0.9, 0.9, 0.5, // counter
        ]);
        let mut resolver = CombatResolver::start_encounter(setup(OpponentTier::BossTier), &mut rng);
        resolver.select_command("jab", &mut rng);
        let opponent_hp_before = resolver.combatant_view(Side::Opponent).hp;

        resolver.advance(&mut rng); // -> ApplyDamage
        let mut apply_rng = ScriptedRolls::new(&[0.05]); // outcome roll: miss
        resolver.advance(&mut apply_rng);
        assert_eq!(resolver.turn().outcome, Outcome::Miss);
        assert_eq!(resolver.turn().dmg_to_opponent, 0);
        assert_eq!(resolver.combatant_view(Side::Opponent).hp, opponent_hp_before);
        // Counter still lands
        assert!(resolver.combatant_view(Side::Player).hp < 100);
    }

    #[test]
    fn test_boss_crit_multiplies_applied_damage() {
        let mut rng = ScriptedRolls::new(&[
            0.9, 0.9, 0.5, // player swing -> 8
            0.9, 0.9, 0.5, // counter
        ]);
        let mut resolver = CombatResolver::start_encounter(setup(OpponentTier::BossTier), &mut rng);
        resolver.select_command("jab", &mut rng);
        resolver.advance(&mut rng);
        // Even speed: crit band is [0.10, 0.22)
        let mut apply_rng = ScriptedRolls::new(&[0.15]);
        resolver.advance(&mut apply_rng);
        assert_eq!(resolver.turn().outcome, Outcome::Crit);
        // Calm mood scales the push to 7 at select; the crit lands
        // floor(7 * 1.6) = 11
        assert_eq!(resolver.turn().dmg_to_opponent, 11);
        assert_eq!(resolver.combatant_view(Side::Opponent).hp, 120 - 11);
    }

    #[test]
    fn test_terminal_win_and_redundant_calls() {
        let mut rng = ScriptedRolls::default();
        let mut s = setup(OpponentTier::Regular);
        s.opponent.max_hp = 1;
        let mut resolver = CombatResolver::start_encounter(s, &mut rng);

        let mut turn_rng = ScriptedRolls::new(&[0.9, 0.9, 0.5, 0.9, 0.9, 0.5]);
        resolver.select_command("jab", &mut turn_rng);
        resolver.advance(&mut turn_rng); // -> ApplyDamage
        resolver.advance(&mut turn_rng); // applies, opponent dies, no counter
        assert!(resolver.opponent_defeated());
        assert_eq!(resolver.combatant_view(Side::Player).hp, 100);

        resolver.advance(&mut turn_rng); // TurnEnd -> terminal
        assert_eq!(resolver.outcome(), Some(EncounterOutcome::Win));

        // Everything after termination is a no-op
        let phase = resolver.phase();
        resolver.advance(&mut turn_rng);
        resolver.select_command("taunt", &mut turn_rng);
        assert_eq!(resolver.phase(), phase);
        assert_eq!(resolver.outcome(), Some(EncounterOutcome::Win));
    }

    #[test]
    fn test_assist_candidate_pool_rules() {
        let mut rng = ScriptedRolls::default();

        // Empty pool disables the assist outright
        let resolver = CombatResolver::start_encounter(setup(OpponentTier::BossTier), &mut rng);
        assert!(resolver.assist().candidate.is_none());

        // Current opponent is excluded from her own encounter
        let mut s = setup(OpponentTier::BossTier);
        s.defeated = vec![AssistCandidate {
            id: "mirei".to_string(),
            name: "Mirei".to_string(),
        }];
        let resolver = CombatResolver::start_encounter(s, &mut rng);
        assert!(resolver.assist().candidate.is_none());

        // Someone else is eligible; boss-tier chance applies
        let mut s = setup(OpponentTier::BossTier);
        s.defeated = vec![AssistCandidate {
            id: "nana".to_string(),
            name: "Nana".to_string(),
        }];
        let resolver = CombatResolver::start_encounter(s, &mut rng);
        assert_eq!(
            resolver.assist().candidate.as_ref().map(|c| c.id.as_str()),
            Some("nana")
        );
        assert_eq!(resolver.assist().chance, ASSIST_CHANCE_BOSS);
    }

    #[test]
    fn test_assist_fires_once_and_never_again() {
        let mut rng = ScriptedRolls::default();
        let mut s = setup(OpponentTier::Regular);
        s.opponent.max_hp = 400;
        s.opponent.atk = 9; // weak counter so the fight lasts
        s.defeated = vec![AssistCandidate {
            id: "nana".to_string(),
            name: "Nana".to_string(),
        }];
        let mut resolver = CombatResolver::start_encounter(s, &mut rng);

        // Turn 1: assist roll 0.0 < 0.40 fires. Swing, counter, assist
        // chance, assist int roll.
        let mut t1 = ScriptedRolls::new(&[0.9, 0.9, 0.5, 0.9, 0.9, 0.5, 0.0, 0.0]);
        resolver.select_command("jab", &mut t1);
        resolver.advance(&mut t1);
        resolver.advance(&mut t1);
        assert!(resolver.assist().used);
        let narration = resolver.turn_narration().join("\n");
        assert!(narration.contains("Nana"), "assist line present: {narration}");
        resolver.advance(&mut t1);

        // Turn 2: even a guaranteed-fire roll must not fire again
        let hp_after_t1 = resolver.combatant_view(Side::Opponent).hp;
        let mut t2 = ScriptedRolls::new(&[0.9, 0.9, 0.5, 0.9, 0.9, 0.5, 0.0, 0.0]);
        resolver.select_command("flatter", &mut t2);
        resolver.advance(&mut t2);
        resolver.advance(&mut t2);
        assert!(resolver.assist().used);
        let narration = resolver.turn_narration().join("\n");
        assert!(!narration.contains("steps in"), "no second assist: {narration}");
        assert!(resolver.combatant_view(Side::Opponent).hp < hp_after_t1);
    }

    #[test]
    fn test_counter_multiplier_defaults_by_tier() {
        let mut rng = ScriptedRolls::default();
        let boss = CombatResolver::start_encounter(setup(OpponentTier::BossTier), &mut rng);
        assert_eq!(boss.counter_multiplier, BOSS_COUNTER_MULTIPLIER);
        let regular = CombatResolver::start_encounter(setup(OpponentTier::Regular), &mut rng);
        assert_eq!(regular.counter_multiplier, REGULAR_COUNTER_MULTIPLIER);

        let mut s = setup(OpponentTier::BossTier);
        s.opponent.counter_multiplier = Some(0.5);
        let custom = CombatResolver::start_encounter(s, &mut rng);
        assert_eq!(custom.counter_multiplier, 0.5);
    }

    #[test]
    fn test_mood_advances_after_apply() {
        let mut rng = ScriptedRolls::default();
        let mut s = setup(OpponentTier::BossTier);
        s.opponent.traits.personality = "proud queen".to_string();
        let mut resolver = CombatResolver::start_encounter(s, &mut rng);
        assert_eq!(resolver.mood(), Some(Mood::Calm));

        // Calm mood scales push by 0.95: (16-8) * 1.0 * 0.95 = 7.6 -> 7.
        // Hit level 0, so calm stays calm on the tag step; outcome roll 0.5
        // is a plain hit.
        let mut t = ScriptedRolls::new(&[0.9, 0.9, 0.5, 0.9, 0.9, 0.5]);
        resolver.select_command("jab", &mut t);
        assert_eq!(resolver.turn().dmg_to_opponent, 7);
        assert_eq!(resolver.turn().tag, Some(Tag::Push));
        resolver.advance(&mut t);
        let mut apply = ScriptedRolls::new(&[0.5]);
        resolver.advance(&mut apply);
        assert_eq!(resolver.mood(), Some(Mood::Calm));
    }
}
