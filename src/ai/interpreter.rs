//! Fetch-decode-execute over the AI script table
//!
//! A [`Vm`] borrows everything one module run needs: the shared script
//! table and battle collaborators, plus the pass-owned scratch state and
//! call stack. [`Vm::step`] executes exactly one instruction. Looping,
//! slot advancement and module termination belong to the driver.

use rand::RngCore;

use crate::ai::opcode::Opcode;
use crate::ai::scratch::{AiThinking, CallStack, FuncResult};
use crate::ai::script::{Instruction, ScriptTable};
use crate::battle::constants::{AI_TARGET, AI_TARGET_PARTNER, AI_USER, AI_USER_PARTNER};
use crate::battle::history::BattleHistory;
use crate::battle::oracle::BattleOracle;
use crate::battle::state::{BattleMon, BattleView, MoveInfo};
use crate::core::error::Result;
use crate::core::types::BattlerId;

/// Where the instruction pointer goes after a handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Fall through to the following instruction
    Next,
    Jump(usize),
    /// Leave the pointer where it is (terminal opcodes)
    Stay,
}

/// Conditional helper: jump to the trailing target when `taken`
pub(crate) fn branch(insn: &Instruction<'_>, taken: bool) -> Flow {
    if taken {
        Flow::Jump(insn.branch_target())
    } else {
        Flow::Next
    }
}

/// Read-only collaborators shared by every pass
#[derive(Clone, Copy)]
pub struct VmContext<'a> {
    pub scripts: &'a ScriptTable,
    pub battle: &'a dyn BattleView,
    pub oracle: &'a dyn BattleOracle,
    pub history: &'a BattleHistory,
}

pub struct Vm<'a> {
    pub(crate) scripts: &'a ScriptTable,
    pub(crate) battle: &'a dyn BattleView,
    pub(crate) oracle: &'a dyn BattleOracle,
    pub(crate) history: &'a BattleHistory,
    pub(crate) rng: &'a mut dyn RngCore,
    pub(crate) thinking: &'a mut AiThinking,
    pub(crate) stack: &'a mut CallStack,
    pub(crate) battler_ai: BattlerId,
    pub(crate) target: BattlerId,
}

impl<'a> Vm<'a> {
    pub fn new(
        ctx: VmContext<'a>,
        rng: &'a mut dyn RngCore,
        thinking: &'a mut AiThinking,
        stack: &'a mut CallStack,
        battler_ai: BattlerId,
        target: BattlerId,
    ) -> Self {
        Self {
            scripts: ctx.scripts,
            battle: ctx.battle,
            oracle: ctx.oracle,
            history: ctx.history,
            rng,
            thinking,
            stack,
            battler_ai,
            target,
        }
    }

    pub fn thinking(&self) -> &AiThinking {
        self.thinking
    }

    pub fn battler_ai(&self) -> BattlerId {
        self.battler_ai
    }

    pub fn target(&self) -> BattlerId {
        self.target
    }

    /// Execute the instruction at the current script pointer
    pub fn step(&mut self) -> Result<()> {
        let scripts = self.scripts;
        let insn = scripts.decode(self.thinking.script_ptr)?;

        tracing::trace!(
            address = insn.address,
            opcode = %insn.opcode,
            slot = self.thinking.moveset_index,
            "AI step"
        );

        match self.execute(&insn)? {
            Flow::Next => self.thinking.script_ptr = insn.next(),
            Flow::Jump(to) => {
                tracing::trace!(from = insn.address, to, "AI branch taken");
                self.thinking.script_ptr = to;
            }
            Flow::Stay => {}
        }
        Ok(())
    }

    fn execute(&mut self, insn: &Instruction<'_>) -> Result<Flow> {
        use Opcode::*;

        let flow = match insn.opcode {
            IfRandomLessThan => self.if_random(insn, |roll, limit| roll < limit),
            IfRandomGreaterThan => self.if_random(insn, |roll, limit| roll > limit),
            IfWaking => self.if_waking(insn),
            IfBadlyPoisonedForTurns => self.if_badly_poisoned_for_turns(insn),
            Score => self.score(insn),
            IfHpLessThan => self.if_hp(insn, |hp, value| hp < value),
            IfHpMoreThan => self.if_hp(insn, |hp, value| hp > value),
            IfHpEqual => self.if_hp(insn, |hp, value| hp == value),
            IfHpNotEqual => self.if_hp(insn, |hp, value| hp != value),
            IfStatus => self.if_status_bits(insn, |mon| mon.status1, true),
            IfNotStatus => self.if_status_bits(insn, |mon| mon.status1, false),
            IfStatus2 => self.if_status_bits(insn, |mon| mon.status2, true),
            IfNotStatus2 => self.if_status_bits(insn, |mon| mon.status2, false),
            IfStatus3 => self.if_status_bits(insn, |mon| mon.status3, true),
            IfCanUseSubstitute => self.if_can_use_substitute(insn),
            IfSideAffecting => self.if_side_affecting(insn, true),
            IfNotSideAffecting => self.if_side_affecting(insn, false),
            IfLessThan => self.if_compare(insn, |result, value| result < value),
            IfMoreThan => self.if_compare(insn, |result, value| result > value),
            IfEqual => self.if_compare(insn, |result, value| result == value),
            IfNotEqual => self.if_compare(insn, |result, value| result != value),
            IfLessThanPtr => self.if_compare_ptr(insn, |result, value| result < value)?,
            IfMoreThanPtr => self.if_compare_ptr(insn, |result, value| result > value)?,
            IfHasAttackOfType => self.if_has_attack_of_type(insn),
            IfHasAttackOfCategory => self.if_has_attack_of_category(insn),
            IfMove => self.if_move(insn, true),
            IfNotMove => self.if_move(insn, false),
            IfInBytes => self.if_in_bytes(insn, true)?,
            IfNotInBytes => self.if_in_bytes(insn, false)?,
            IfInHwords => self.if_in_hwords(insn)?,
            CheckCurrMoveHasStab => self.check_curr_move_has_stab(),
            IfUserHasAttackingMove => self.if_user_has_attacking_move(insn, true),
            IfUserHasNoAttackingMoves => self.if_user_has_attacking_move(insn, false),
            GetTurnCount => self.get_turn_count(),
            GetType => self.get_type(insn),
            GetConsideredMovePower => self.get_considered_move_power(),
            GetHowPowerfulMoveIs => self.get_how_powerful_move_is(),
            GetLastUsedBattlerMove => self.get_last_used_battler_move(insn),
            GetTargetPreviousMovePp => self.get_target_previous_move_pp(),
            IfSharesMoveWithUser => self.if_shares_move_with_user(insn),
            IfUserGoes => self.if_user_goes(insn, true),
            IfUserDoesntGo => self.if_user_goes(insn, false),
            GetConsideredMoveSecondEffChance => self.get_considered_move_second_eff_chance(),
            GetConsideredMoveAccuracy => self.get_considered_move_accuracy(),
            CountUsablePartyMons => self.count_usable_party_mons(insn),
            GetConsideredMove => self.get_considered_move(),
            GetConsideredMoveEffect => self.get_considered_move_effect(),
            GetAbility => self.get_ability(insn),
            GetHighestTypeEffectiveness => self.get_highest_type_effectiveness(),
            IfTypeEffectiveness => self.if_type_effectiveness(insn),
            IfTarget => self.if_target(insn),
            IfTypeEffectivenessWithModifiers => self.if_type_effectiveness_with_modifiers(insn),
            IfStatusInParty => self.if_status_in_party(insn, true),
            IfStatusNotInParty => self.if_status_in_party(insn, false),
            GetWeather => self.get_weather(),
            IfEffect => self.if_effect(insn, true),
            IfNotEffect => self.if_effect(insn, false),
            IfStatLevelLessThan => self.if_stat_level(insn, |stage, value| stage < value),
            IfStatLevelMoreThan => self.if_stat_level(insn, |stage, value| stage > value),
            IfStatLevelEqual => self.if_stat_level(insn, |stage, value| stage == value),
            IfStatLevelNotEqual => self.if_stat_level(insn, |stage, value| stage != value),
            IfCanFaint => self.if_can_faint(insn),
            ConsiderImitatedMove => self.consider_imitated_move(),
            IfHasMove => self.if_has_move(insn),
            IfDoesntHaveMove => self.if_doesnt_have_move(insn),
            IfHasMoveWithEffect => self.if_has_move_with_effect(insn, true),
            IfDoesntHaveMoveWithEffect => self.if_has_move_with_effect(insn, false),
            IfAnyMoveDisabledOrEncored => self.if_any_move_disabled_or_encored(insn),
            IfCurrMoveDisabledOrEncored => self.if_curr_move_disabled_or_encored(insn),
            Flee => self.flee(),
            IfRandomSafariFlee => self.if_random_safari_flee(insn),
            Watch => self.watch(),
            GetHoldEffect => self.get_hold_effect(insn),
            GetGender => self.get_gender(insn),
            IsFirstTurnFor => self.is_first_turn_for(insn),
            GetStockpileCount => self.get_stockpile_count(insn),
            IsDoubleBattle => self.is_double_battle(),
            GetUsedHeldItem => self.get_used_held_item(insn),
            GetMoveTypeFromResult => self.from_result(|info| info.move_type as u32),
            GetMovePowerFromResult => self.from_result(|info| info.power as u32),
            GetMoveEffectFromResult => self.from_result(|info| info.effect as u32),
            GetProtectCount => self.get_protect_count(insn),
            GetMoveTargetFromResult => self.from_result(|info| info.target as u32),
            GetTypeEffectivenessFromResult => self.get_type_effectiveness_from_result(),
            GetSecondEffChanceFromResult => {
                self.from_result(|info| info.secondary_effect_chance as u32)
            }
            GetSpikesLayersTarget => self.get_spikes_layers_target(),
            IfAiCanFaint => self.if_ai_can_faint(insn),
            GetHighestTypeEffectivenessFromTarget => {
                self.get_highest_type_effectiveness_from_target()
            }
            Call => self.call(insn)?,
            Goto => self.goto(insn),
            End => self.end(),
            IfLevelCond => self.if_level_cond(insn),
            IfTargetTaunted => self.if_target_taunted(insn, true),
            IfTargetNotTaunted => self.if_target_taunted(insn, false),
            IfTargetIsAlly => self.if_target_is_ally(insn),
            UsedConsideredMoveLastTurn => self.used_considered_move_last_turn(),
            CheckAbility => self.check_ability(insn),
            IfFlashFired => self.if_flash_fired(insn),
            IfHoldsItem => self.if_holds_item(insn),
        };
        Ok(flow)
    }

    /// Two-way selector: `AI_USER` is the acting battler, anything else the target
    pub(crate) fn resolve_battler(&self, selector: u8) -> BattlerId {
        if selector == AI_USER {
            self.battler_ai
        } else {
            self.target
        }
    }

    /// Four-way selector; unknown values resolve to the target
    pub(crate) fn resolve_wanted_battler(&self, selector: u8) -> BattlerId {
        match selector {
            AI_USER => self.battler_ai,
            AI_USER_PARTNER => self.battler_ai.partner(),
            AI_TARGET_PARTNER => self.target.partner(),
            AI_TARGET => self.target,
            _ => self.target,
        }
    }

    pub(crate) fn mon(&self, id: BattlerId) -> &'a BattleMon {
        self.battle.battler(id)
    }

    pub(crate) fn ai_mon(&self) -> &'a BattleMon {
        self.battle.battler(self.battler_ai)
    }

    pub(crate) fn target_mon(&self) -> &'a BattleMon {
        self.battle.battler(self.target)
    }

    pub(crate) fn considered_move(&self) -> MoveInfo {
        self.battle.move_info(self.thinking.move_considered)
    }

    pub(crate) fn set_result(&mut self, result: FuncResult) -> Flow {
        self.thinking.func_result = result;
        Flow::Next
    }
}
