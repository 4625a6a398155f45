//! Decision passes: setup, module runs and final move/target choice
//!
//! One [`BattleAi`] is reused for every acting battler of a battle. Each pass
//! starts from [`BattleAi::setup_decision_pass`], which wipes the scratch
//! state, so nothing carries over between battlers, turns or (in doubles)
//! candidate targets.

use std::sync::Arc;

use rand::RngCore;
use serde::Serialize;

use crate::ai::interpreter::{Vm, VmContext};
use crate::ai::scratch::{AiActionFlags, AiThinking, CallStack};
use crate::ai::script::ScriptTable;
use crate::ai::selection::{best_move_slot, best_target};
use crate::battle::history::BattleHistory;
use crate::battle::oracle::BattleOracle;
use crate::battle::state::BattleView;
use crate::core::config::AiConfig;
use crate::core::error::{AiError, Result};
use crate::core::rng::random;
use crate::core::types::{
    AiFlags, BattleTypeFlags, BattlerId, BIT_FLANK, BIT_SIDE, MAX_MON_MOVES,
};

/// Points given to a target that cannot be attacked sensibly
pub const NO_SCORE: i32 = -1;

/// Preset mask that seeds every slot
pub const ALL_MOVES_MASK: u8 = 0b1111;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AiAction {
    Move { slot: usize },
    Flee,
    Watch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AiDecision {
    pub action: AiAction,
    pub target: BattlerId,
}

/// What one pass against one target concluded
#[derive(Debug, Clone, Copy)]
struct TargetOutcome {
    target: BattlerId,
    action: AiAction,
    points: i32,
}

pub struct BattleAi {
    scripts: Arc<ScriptTable>,
    config: AiConfig,
    thinking: AiThinking,
    stack: CallStack,
    battler_ai: BattlerId,
    target: BattlerId,
    last_fault: Option<AiError>,
}

impl BattleAi {
    /// Fails when `config` does not pass [`AiConfig::validate`]
    pub fn new(scripts: Arc<ScriptTable>, config: AiConfig) -> Result<Self> {
        config.validate()?;
        let stack = CallStack::new(config.engine.call_stack_depth);
        Ok(Self {
            scripts,
            config,
            thinking: AiThinking::default(),
            stack,
            battler_ai: BattlerId(0),
            target: BattlerId(1),
            last_fault: None,
        })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn thinking(&self) -> &AiThinking {
        &self.thinking
    }

    pub fn battler_ai(&self) -> BattlerId {
        self.battler_ai
    }

    pub fn target(&self) -> BattlerId {
        self.target
    }

    /// Fault that made the last `choose_move_or_action` fall back, if any
    pub fn last_fault(&self) -> Option<&AiError> {
        self.last_fault.as_ref()
    }

    /// Reset scratch state and prepare a pass for `battler`
    ///
    /// Slots whose bit is set in `preset_mask` start at the configured preset
    /// score. Consumes one random draw per move slot, plus one for the
    /// default target in doubles.
    pub fn setup_decision_pass(
        &mut self,
        battle: &dyn BattleView,
        rng: &mut dyn RngCore,
        battler: BattlerId,
        preset_mask: u8,
    ) {
        self.thinking.reset();

        for (slot, score) in self.thinking.scores.iter_mut().enumerate() {
            *score = if preset_mask & (1 << slot) != 0 {
                self.config.engine.preset_score
            } else {
                0
            };
        }

        let unusable = battle.unusable_moves(battler);
        let spread = self.config.engine.simulated_roll_spread as u16;
        for slot in 0..MAX_MON_MOVES {
            if unusable & (1 << slot) != 0 {
                self.thinking.scores[slot] = 0;
            }
            self.thinking.simulated_rng[slot] = 100 - (random(rng) % spread) as u8;
        }

        self.stack.clear();
        self.battler_ai = battler;

        self.target = if battle.battle_flags().is_double() {
            let flank = random(rng) as u8 & BIT_FLANK;
            let target = BattlerId(flank + ((battler.0 & BIT_SIDE) ^ BIT_SIDE));
            if battle.is_absent(target) {
                target.partner()
            } else {
                target
            }
        } else {
            battler.opposite()
        };

        self.thinking.ai_flags = self.resolve_modules(battle);

        tracing::debug!(
            battler = battler.0,
            target = self.target.0,
            modules = self.thinking.ai_flags.0,
            "AI pass set up"
        );
    }

    fn resolve_modules(&self, battle: &dyn BattleView) -> AiFlags {
        let flags = battle.battle_flags();
        let selection = battle.script_selection();
        let presets = &self.config.modules;

        let mut modules = if flags.has(BattleTypeFlags::RECORDED) {
            selection.recorded_flags
        } else if flags.has(BattleTypeFlags::SAFARI) {
            presets.safari
        } else if flags.has(BattleTypeFlags::ROAMER) {
            presets.roaming
        } else if flags.has(BattleTypeFlags::FIRST_BATTLE) {
            presets.first_battle
        } else if flags.has(BattleTypeFlags::FACTORY) {
            selection.factory_flags
        } else if flags.has(
            BattleTypeFlags::FRONTIER
                | BattleTypeFlags::EREADER_TRAINER
                | BattleTypeFlags::TRAINER_HILL
                | BattleTypeFlags::SECRET_BASE,
        ) {
            presets.frontier
        } else if flags.has(BattleTypeFlags::TWO_OPPONENTS) {
            selection.opponent_a_flags | selection.opponent_b_flags
        } else {
            selection.opponent_a_flags
        };

        if let Some(forced) = presets.debug_override {
            modules = forced;
        }
        if flags.is_double() {
            modules |= presets.double_battle;
        }
        modules
    }

    /// Run every enabled module and choose an action
    ///
    /// Expects a preceding [`BattleAi::setup_decision_pass`]. Script faults
    /// are returned as errors.
    pub fn run_decision_pass(
        &mut self,
        battle: &dyn BattleView,
        oracle: &dyn BattleOracle,
        history: &mut BattleHistory,
        rng: &mut dyn RngCore,
    ) -> Result<AiDecision> {
        let decision = if battle.battle_flags().is_double() {
            self.choose_in_doubles(battle, oracle, history, rng)?
        } else {
            self.choose_in_singles(battle, oracle, history, rng)?
        };

        tracing::debug!(
            battler = self.battler_ai.0,
            action = ?decision.action,
            target = decision.target.0,
            "AI decision"
        );
        Ok(decision)
    }

    /// Setup plus run; a script fault yields the first usable move instead
    pub fn choose_move_or_action(
        &mut self,
        battle: &dyn BattleView,
        oracle: &dyn BattleOracle,
        history: &mut BattleHistory,
        rng: &mut dyn RngCore,
        battler: BattlerId,
        preset_mask: u8,
    ) -> AiDecision {
        self.last_fault = None;
        self.setup_decision_pass(battle, rng, battler, preset_mask);
        let default_target = self.target;

        match self.run_decision_pass(battle, oracle, history, rng) {
            Ok(decision) => decision,
            Err(err) => {
                let fallback = self.safe_default(battle, default_target);
                tracing::error!(
                    battler = battler.0,
                    module = self.thinking.logic_id,
                    slot = self.thinking.moveset_index,
                    address = self.thinking.script_ptr,
                    "AI script fault, using first usable move: {}",
                    err
                );
                self.last_fault = Some(err);
                self.target = default_target;
                fallback
            }
        }
    }

    fn safe_default(&self, battle: &dyn BattleView, target: BattlerId) -> AiDecision {
        let mon = battle.battler(self.battler_ai);
        let unusable = battle.unusable_moves(self.battler_ai);
        let slot = (0..MAX_MON_MOVES)
            .find(|&slot| !mon.moves[slot].is_none() && unusable & (1 << slot) == 0)
            .unwrap_or(0);
        AiDecision {
            action: AiAction::Move { slot },
            target,
        }
    }

    fn run_modules(
        &mut self,
        battle: &dyn BattleView,
        oracle: &dyn BattleOracle,
        history: &BattleHistory,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        let ctx = VmContext {
            scripts: &self.scripts,
            battle,
            oracle,
            history,
        };
        let flags = self.thinking.ai_flags;
        let mut vm = Vm::new(
            ctx,
            rng,
            &mut self.thinking,
            &mut self.stack,
            self.battler_ai,
            self.target,
        );
        vm.run_modules(flags)
    }

    /// Flee/watch, or the tie-broken best move and its score
    fn conclude(&self, battle: &dyn BattleView, rng: &mut dyn RngCore) -> (AiAction, i32) {
        if self.thinking.action.has(AiActionFlags::FLEE) {
            return (AiAction::Flee, NO_SCORE);
        }
        if self.thinking.action.has(AiActionFlags::WATCH) {
            return (AiAction::Watch, NO_SCORE);
        }
        let moves = &battle.battler(self.battler_ai).moves;
        let (slot, score) = best_move_slot(&self.thinking.scores, moves, rng);
        (AiAction::Move { slot }, score)
    }

    fn choose_in_singles(
        &mut self,
        battle: &dyn BattleView,
        oracle: &dyn BattleOracle,
        history: &mut BattleHistory,
        rng: &mut dyn RngCore,
    ) -> Result<AiDecision> {
        history.record_last_used_move(self.target, battle.battler(self.target).last_move);
        self.run_modules(battle, oracle, history, rng)?;
        let (action, _) = self.conclude(battle, rng);
        Ok(AiDecision {
            action,
            target: self.target,
        })
    }

    /// Evaluate every other standing battler as a target, then pick a target
    ///
    /// Each candidate pass is set up with every slot preset, or with the
    /// palace mask in palace battles, whatever mask the caller passed.
    fn choose_in_doubles(
        &mut self,
        battle: &dyn BattleView,
        oracle: &dyn BattleOracle,
        history: &mut BattleHistory,
        rng: &mut dyn RngCore,
    ) -> Result<AiDecision> {
        let battler = self.battler_ai;
        let preset_mask = if battle.battle_flags().has(BattleTypeFlags::PALACE) {
            battle.script_selection().palace_move_mask
        } else {
            ALL_MOVES_MASK
        };
        let fallback_target = self.target;
        let mut outcomes: Vec<TargetOutcome> = Vec::new();

        for candidate in BattlerId::all() {
            if candidate == battler || battle.battler(candidate).is_fainted() {
                continue;
            }

            self.setup_decision_pass(battle, rng, battler, preset_mask);
            self.target = candidate;
            if !candidate.is_ally_of(battler) {
                history.record_last_used_move(candidate, battle.battler(candidate).last_move);
            }

            self.run_modules(battle, oracle, history, rng)?;
            let (action, mut points) = self.conclude(battle, rng);

            if candidate == battler.partner()
                && matches!(action, AiAction::Move { .. })
                && points < self.config.engine.ally_score_threshold
            {
                points = NO_SCORE;
            }

            tracing::debug!(
                battler = battler.0,
                target = candidate.0,
                ?action,
                points,
                "AI target evaluated"
            );
            outcomes.push(TargetOutcome {
                target: candidate,
                action,
                points,
            });
        }

        let candidates: Vec<(BattlerId, i32)> =
            outcomes.iter().map(|o| (o.target, o.points)).collect();
        let chosen = best_target(&candidates, rng)
            .and_then(|target| outcomes.iter().find(|o| o.target == target));

        match chosen {
            Some(outcome) => {
                self.target = outcome.target;
                Ok(AiDecision {
                    action: outcome.action,
                    target: outcome.target,
                })
            }
            None => {
                tracing::warn!(battler = battler.0, "No standing battler to target");
                self.target = fallback_target;
                Ok(AiDecision {
                    action: AiAction::Move { slot: 0 },
                    target: fallback_target,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::builder::ScriptBuilder;
    use crate::battle::snapshot::BattleSnapshot;
    use crate::battle::state::ScriptSelection;
    use crate::core::types::MoveId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn empty_scripts() -> Arc<ScriptTable> {
        let mut b = ScriptBuilder::new();
        b.module(0, "noop").end();
        Arc::new(b.build().expect("assemble"))
    }

    fn battle(flags: u32) -> BattleSnapshot {
        let mut snap = BattleSnapshot::new(BattleTypeFlags(flags));
        for id in BattlerId::all() {
            let mon = snap.battler_mut(id);
            mon.hp = 50;
            mon.max_hp = 50;
            mon.moves = [MoveId(1), MoveId(2), MoveId::NONE, MoveId::NONE];
            mon.pp = [10, 10, 0, 0];
        }
        snap.selection = ScriptSelection {
            opponent_a_flags: AiFlags(0b001),
            opponent_b_flags: AiFlags(0b100),
            factory_flags: AiFlags(0b010_0000),
            recorded_flags: AiFlags(0b1000),
            ..Default::default()
        };
        snap
    }

    #[test]
    fn test_setup_seeds_preset_and_zeroes_unusable() {
        let mut snap = battle(BattleTypeFlags::TRAINER);
        snap.unusable_moves[1] = 0b0010;
        let mut ai = BattleAi::new(empty_scripts(), AiConfig::default()).expect("valid config");
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        ai.setup_decision_pass(&snap, &mut rng, BattlerId(1), 0b0111);

        assert_eq!(ai.thinking().scores, [100, 0, 100, 0]);
        assert!(ai
            .thinking()
            .simulated_rng
            .iter()
            .all(|&roll| (85..=100).contains(&roll)));
        assert_eq!(ai.target(), BattlerId(0));
        assert_eq!(ai.thinking().ai_flags, AiFlags(0b001));
    }

    #[test]
    fn test_module_resolution_priority() {
        let ai = BattleAi::new(empty_scripts(), AiConfig::default()).expect("valid config");
        let cases = [
            (BattleTypeFlags::TRAINER | BattleTypeFlags::TWO_OPPONENTS, AiFlags(0b101)),
            (BattleTypeFlags::SAFARI | BattleTypeFlags::ROAMER, AiFlags::SAFARI),
            (BattleTypeFlags::ROAMER, AiFlags::ROAMING),
            (BattleTypeFlags::FACTORY, AiFlags(0b010_0000)),
            (BattleTypeFlags::SECRET_BASE, AiFlags(0b111)),
            (BattleTypeFlags::RECORDED | BattleTypeFlags::SAFARI, AiFlags(0b1000)),
            (
                BattleTypeFlags::DOUBLE | BattleTypeFlags::TRAINER,
                AiFlags(0b001) | AiFlags::DOUBLE_BATTLE,
            ),
        ];
        for (flags, expected) in cases {
            assert_eq!(ai.resolve_modules(&battle(flags)), expected, "flags {:#x}", flags);
        }
    }

    #[test]
    fn test_debug_override_still_gets_doubles_module() {
        let mut config = AiConfig::default();
        config.modules.debug_override = Some(AiFlags(0b10));
        let ai = BattleAi::new(empty_scripts(), config).expect("valid config");
        let snap = battle(BattleTypeFlags::DOUBLE | BattleTypeFlags::SAFARI);
        assert_eq!(
            ai.resolve_modules(&snap),
            AiFlags(0b10) | AiFlags::DOUBLE_BATTLE
        );
    }

    #[test]
    fn test_doubles_default_target_skips_absent_flank() {
        let mut snap = battle(BattleTypeFlags::DOUBLE);
        let mut ai = BattleAi::new(empty_scripts(), AiConfig::default()).expect("valid config");
        for seed in 0..20 {
            snap.absent_mask = 0b0010;
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            ai.setup_decision_pass(&snap, &mut rng, BattlerId(0), ALL_MOVES_MASK);
            assert_eq!(ai.target(), BattlerId(3));

            snap.absent_mask = 0b1000;
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            ai.setup_decision_pass(&snap, &mut rng, BattlerId(0), ALL_MOVES_MASK);
            assert_eq!(ai.target(), BattlerId(1));
        }
    }

    #[test]
    fn test_fault_falls_back_to_first_usable_move() {
        let mut b = ScriptBuilder::new();
        b.module(0, "broken").raw("junk", &[0xEE]);
        let scripts = Arc::new(b.build().expect("assemble"));

        let mut snap = battle(BattleTypeFlags::TRAINER);
        snap.unusable_moves[1] = 0b0001;
        let mut ai = BattleAi::new(scripts, AiConfig::default()).expect("valid config");
        let mut history = BattleHistory::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let decision = ai.choose_move_or_action(
            &snap,
            &crate::battle::oracle::StandardOracle::new(),
            &mut history,
            &mut rng,
            BattlerId(1),
            ALL_MOVES_MASK,
        );

        assert_eq!(decision.action, AiAction::Move { slot: 1 });
        assert_eq!(decision.target, BattlerId(0));
        assert!(matches!(
            ai.last_fault(),
            Some(AiError::UnknownOpcode { opcode: 0xEE, .. })
        ));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = AiConfig::default();
        config.engine.simulated_roll_spread = 101;
        assert!(matches!(
            BattleAi::new(empty_scripts(), config),
            Err(AiError::Config(_))
        ));

        let mut config = AiConfig::default();
        config.engine.call_stack_depth = 0;
        assert!(BattleAi::new(empty_scripts(), config).is_err());
    }

    #[test]
    fn test_decision_serializes_with_kind_tag() {
        let decision = AiDecision {
            action: AiAction::Move { slot: 2 },
            target: BattlerId(1),
        };
        let json = serde_json::to_string(&decision).expect("serialize");
        assert_eq!(json, r#"{"action":{"kind":"move","slot":2},"target":1}"#);
    }
}
