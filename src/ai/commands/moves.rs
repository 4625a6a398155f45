//! Move-set queries and considered-move getters

use crate::ai::interpreter::{branch, Flow, Vm};
use crate::ai::scratch::FuncResult;
use crate::ai::script::Instruction;
use crate::battle::constants::*;
use crate::battle::state::MoveInfo;
use crate::core::types::MoveId;

impl Vm<'_> {
    /// Any damaging move of the given type; empty slots are looked up too
    pub(crate) fn if_has_attack_of_type(&mut self, insn: &Instruction<'_>) -> Flow {
        let mon = self.mon(self.resolve_battler(insn.u8_at(1)));
        let wanted = insn.u8_at(2);
        let found = mon.moves.iter().any(|&mv| {
            let info = self.battle.move_info(mv);
            info.move_type == wanted && info.power > 0
        });
        branch(insn, found)
    }

    /// Physical or special by move type; Hidden Power is excluded
    ///
    /// Empty slots are looked up like any other move. The empty move is
    /// Normal, so any mon with a free slot counts as having a physical move.
    pub(crate) fn if_has_attack_of_category(&mut self, insn: &Instruction<'_>) -> Flow {
        let mon = self.mon(self.resolve_battler(insn.u8_at(1)));
        let physical = insn.u8_at(2) == AI_CATEGORY_PHYSICAL;
        let found = mon
            .moves
            .iter()
            .map(|&mv| self.battle.move_info(mv))
            .any(|info| {
                let in_category = if physical {
                    is_type_physical(info.move_type)
                } else {
                    is_type_special(info.move_type)
                };
                in_category && info.effect != EFFECT_HIDDEN_POWER
            });
        branch(insn, found)
    }

    /// Compares the user's types against the considered move's id, not its type
    pub(crate) fn check_curr_move_has_stab(&mut self) -> Flow {
        let mv = self.thinking.move_considered;
        let stab = self.ai_mon().types.iter().any(|&ty| ty as u16 == mv.0);
        self.set_result(FuncResult::Flag(stab))
    }

    pub(crate) fn if_user_has_attacking_move(&mut self, insn: &Instruction<'_>, has: bool) -> Flow {
        let found = self
            .ai_mon()
            .moves
            .iter()
            .any(|&mv| !mv.is_none() && self.battle.move_info(mv).power != 0);
        branch(insn, found == has)
    }

    pub(crate) fn get_considered_move_power(&mut self) -> Flow {
        let power = self.considered_move().power;
        self.set_result(FuncResult::Number(power as u32))
    }

    pub(crate) fn get_last_used_battler_move(&mut self, insn: &Instruction<'_>) -> Flow {
        let mon = self.mon(self.resolve_battler(insn.u8_at(1)));
        self.set_result(FuncResult::Move(mon.last_move))
    }

    /// PP the target has left in the slot where the user knows the target's last move
    ///
    /// Matches are found in the user's move list but read from the target's
    /// PP array; the last matching slot wins.
    pub(crate) fn get_target_previous_move_pp(&mut self) -> Flow {
        let last_move = self.target_mon().last_move;
        let target_pp = self.target_mon().pp;
        let mut pp = 0;
        for (slot, &mv) in self.ai_mon().moves.iter().enumerate() {
            if mv == last_move {
                pp = target_pp[slot];
            }
        }
        self.set_result(FuncResult::Number(pp as u32))
    }

    pub(crate) fn if_shares_move_with_user(&mut self, insn: &Instruction<'_>) -> Flow {
        let target = self.target_mon();
        let shared = self
            .ai_mon()
            .moves
            .iter()
            .any(|&mv| !mv.is_none() && target.knows_move(mv));
        branch(insn, shared)
    }

    pub(crate) fn get_considered_move_second_eff_chance(&mut self) -> Flow {
        let chance = self.considered_move().secondary_effect_chance;
        self.set_result(FuncResult::Number(chance as u32))
    }

    pub(crate) fn get_considered_move_accuracy(&mut self) -> Flow {
        let info = self.considered_move();
        let accuracy = if info.effect == EFFECT_ALWAYS_HIT {
            100
        } else {
            info.accuracy
        };
        self.set_result(FuncResult::Number(accuracy as u32))
    }

    pub(crate) fn get_considered_move(&mut self) -> Flow {
        let mv = self.thinking.move_considered;
        self.set_result(FuncResult::Move(mv))
    }

    pub(crate) fn get_considered_move_effect(&mut self) -> Flow {
        let effect = self.considered_move().effect;
        self.set_result(FuncResult::Number(effect as u32))
    }

    /// Re-point the considered move at whatever the target used last
    pub(crate) fn consider_imitated_move(&mut self) -> Flow {
        self.thinking.move_considered = self.target_mon().last_move;
        Flow::Next
    }

    pub(crate) fn if_has_move(&mut self, insn: &Instruction<'_>) -> Flow {
        let mv = MoveId(insn.u16_at(2));
        let found = match insn.u8_at(1) {
            AI_USER => self.ai_mon().knows_move(mv),
            AI_USER_PARTNER => {
                let partner = self.mon(self.battler_ai.partner());
                !partner.is_fainted() && partner.knows_move(mv)
            }
            AI_TARGET | AI_TARGET_PARTNER => self.target_mon().knows_move(mv),
            _ => false,
        };
        branch(insn, found)
    }

    /// Partner selectors read the user's own moves
    pub(crate) fn if_doesnt_have_move(&mut self, insn: &Instruction<'_>) -> Flow {
        let mv = MoveId(insn.u16_at(2));
        let missing = match insn.u8_at(1) {
            AI_USER | AI_USER_PARTNER => !self.ai_mon().knows_move(mv),
            AI_TARGET | AI_TARGET_PARTNER => !self.target_mon().knows_move(mv),
            _ => false,
        };
        branch(insn, missing)
    }

    pub(crate) fn if_has_move_with_effect(&mut self, insn: &Instruction<'_>, has: bool) -> Flow {
        let mon = match insn.u8_at(1) {
            AI_USER | AI_USER_PARTNER => self.ai_mon(),
            AI_TARGET | AI_TARGET_PARTNER => self.target_mon(),
            _ => return Flow::Next,
        };
        let effect = insn.u8_at(2);
        let found = mon
            .moves
            .iter()
            .any(|&mv| !mv.is_none() && self.battle.move_info(mv).effect == effect);
        branch(insn, found == has)
    }

    /// Operand 0 checks for any disabled move, 1 for an encore
    pub(crate) fn if_any_move_disabled_or_encored(&mut self, insn: &Instruction<'_>) -> Flow {
        let disable = &self.mon(self.resolve_battler(insn.u8_at(1))).disable;
        let holds = match insn.u8_at(2) {
            0 => !disable.disabled_move.is_none(),
            1 => !disable.encored_move.is_none(),
            _ => false,
        };
        branch(insn, holds)
    }

    pub(crate) fn if_curr_move_disabled_or_encored(&mut self, insn: &Instruction<'_>) -> Flow {
        let disable = &self.ai_mon().disable;
        let considered = self.thinking.move_considered;
        let holds = match insn.u8_at(1) {
            0 => disable.disabled_move == considered,
            1 => disable.encored_move == considered,
            _ => false,
        };
        branch(insn, holds)
    }

    pub(crate) fn used_considered_move_last_turn(&mut self) -> Flow {
        let used = self.ai_mon().last_move == self.thinking.move_considered;
        self.set_result(FuncResult::Flag(used))
    }

    /// Read a property of the move id currently held in the result register
    pub(crate) fn from_result(&mut self, field: fn(&MoveInfo) -> u32) -> Flow {
        let info = self.battle.move_info(self.thinking.func_result.as_move());
        self.set_result(FuncResult::Number(field(&info)))
    }
}

