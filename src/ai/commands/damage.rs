//! Opcodes that consult the damage and type oracles
//!
//! Every query runs the same two oracle calls a real attack would (base
//! damage, then the type pass) or, for effectiveness, only the type pass
//! over a fixed base of 40.

use crate::ai::effectiveness::{
    apply_modifiers, fold_exact, fold_modified, fold_thresholds, EffectivenessBucket,
    ModifierField, EFFECTIVENESS_BASE,
};
use crate::ai::interpreter::{branch, Flow, Vm};
use crate::ai::scratch::FuncResult;
use crate::ai::script::Instruction;
use crate::battle::constants::*;
use crate::battle::oracle::TypeCalcOutcome;
use crate::battle::state::MoveInfo;
use crate::core::types::{BattlerId, MoveId, MAX_MON_MOVES};

fn ignored_for_power_ranking(info: &MoveInfo) -> bool {
    info.power <= 1 || IGNORED_POWERFUL_MOVE_EFFECTS.contains(&info.effect)
}

/// Expected damage after the faint-prediction discount, at least 1
fn discounted(damage: u32) -> u32 {
    (damage * FAINT_ROLL_PERCENT / 100).max(1)
}

impl Vm<'_> {
    fn estimate_damage(&self, mv: MoveId, attacker: BattlerId, defender: BattlerId) -> TypeCalcOutcome {
        let base = self.oracle.base_damage(self.battle, mv, attacker, defender);
        self.oracle
            .type_calc(self.battle, mv, attacker, defender, base)
    }

    fn effectiveness(&self, mv: MoveId, attacker: BattlerId, defender: BattlerId) -> TypeCalcOutcome {
        self.oracle
            .type_calc(self.battle, mv, attacker, defender, EFFECTIVENESS_BASE)
    }

    /// 2 if no slot out-damages the current one, 1 if one does, 0 for non-damaging moves
    pub(crate) fn get_how_powerful_move_is(&mut self) -> Flow {
        if ignored_for_power_ranking(&self.considered_move()) {
            return self.set_result(FuncResult::Number(MOVE_POWER_OTHER));
        }

        let mut damages = [0u32; MAX_MON_MOVES];
        for (slot, &mv) in self.ai_mon().moves.iter().enumerate() {
            if mv.is_none() || ignored_for_power_ranking(&self.battle.move_info(mv)) {
                continue;
            }
            let outcome = self.estimate_damage(mv, self.battler_ai, self.target);
            let roll = self.thinking.simulated_rng[slot] as u32;
            damages[slot] = (outcome.damage * roll / 100).max(1);
        }

        let current = damages
            .get(self.thinking.moveset_index)
            .copied()
            .unwrap_or(0);
        let result = if damages.iter().any(|&damage| damage > current) {
            MOVE_NOT_MOST_POWERFUL
        } else {
            MOVE_MOST_POWERFUL
        };
        self.set_result(FuncResult::Number(result))
    }

    pub(crate) fn if_can_faint(&mut self, insn: &Instruction<'_>) -> Flow {
        if self.considered_move().power < 2 {
            return Flow::Next;
        }
        let outcome = self.estimate_damage(self.thinking.move_considered, self.battler_ai, self.target);
        let damage = discounted(outcome.damage);
        branch(insn, self.target_mon().hp as u32 <= damage)
    }

    /// Whether the target's hardest-hitting move would knock the user out
    pub(crate) fn if_ai_can_faint(&mut self, insn: &Instruction<'_>) -> Flow {
        self.thinking.func_result = FuncResult::Number(0);

        let best = self
            .target_mon()
            .moves
            .iter()
            .filter(|mv| !mv.is_none())
            .map(|&mv| self.estimate_damage(mv, self.target, self.battler_ai).damage)
            .max();
        let damage = best.map(discounted).unwrap_or(0);
        branch(insn, self.ai_mon().hp as u32 <= damage)
    }

    pub(crate) fn get_highest_type_effectiveness(&mut self) -> Flow {
        let best = self
            .ai_mon()
            .moves
            .iter()
            .filter(|mv| !mv.is_none())
            .map(|&mv| {
                let outcome = self.effectiveness(mv, self.battler_ai, self.target);
                fold_exact(outcome.damage, outcome.doesnt_affect())
            })
            .fold(0, u32::max);
        self.set_result(FuncResult::from_effectiveness(best))
    }

    pub(crate) fn if_type_effectiveness(&mut self, insn: &Instruction<'_>) -> Flow {
        let outcome = self.effectiveness(self.thinking.move_considered, self.battler_ai, self.target);
        let value = fold_thresholds(outcome.damage, outcome.doesnt_affect());
        branch(insn, value == insn.u8_at(1) as u32)
    }

    pub(crate) fn get_type_effectiveness_from_result(&mut self) -> Flow {
        let mv = self.thinking.func_result.as_move();
        let outcome = self.effectiveness(mv, self.battler_ai, self.target);
        let value = fold_exact(outcome.damage, outcome.doesnt_affect());
        self.set_result(FuncResult::from_effectiveness(value))
    }

    fn modifier_field(&self, defender: BattlerId) -> ModifierField {
        ModifierField {
            weather: self.battle.field().weather,
            defender_side_statuses: self.battle.side(defender.side()).statuses,
        }
    }

    /// Effectiveness of the considered move with abilities, weather, screens and stages folded in
    ///
    /// A Wonder Guard target short-circuits the modifier pass and reads as
    /// `X1` unless the move does not affect it at all.
    pub(crate) fn if_type_effectiveness_with_modifiers(&mut self, insn: &Instruction<'_>) -> Flow {
        let mv = self.thinking.move_considered;
        let outcome = self.effectiveness(mv, self.battler_ai, self.target);
        let attacker = self.ai_mon();
        let defender = self.target_mon();

        let bucket = if outcome.doesnt_affect() {
            EffectivenessBucket::X0
        } else if defender.ability == ABILITY_WONDER_GUARD {
            EffectivenessBucket::X1
        } else {
            let move_type = self.battle.move_info(mv).move_type;
            let field = self.modifier_field(self.target);
            fold_modified(apply_modifiers(outcome.damage, move_type, attacker, defender, field))
        };

        tracing::trace!(move_id = mv.0, ?bucket, "Modified effectiveness");
        branch(insn, bucket.raw() == insn.u8_at(1) as u32)
    }

    /// Same modifier pass with roles swapped, maximised over the target's moves
    ///
    /// The running maximum is a byte and keeps only the low 8 bits of each
    /// new best. A Wonder Guard user never updates it, so the fold sees 0.
    pub(crate) fn get_highest_type_effectiveness_from_target(&mut self) -> Flow {
        let attacker = self.target_mon();
        let defender = self.ai_mon();
        let field = self.modifier_field(self.battler_ai);

        let mut best = 0u8;
        if defender.ability != ABILITY_WONDER_GUARD {
            for &mv in attacker.moves.iter().filter(|mv| !mv.is_none()) {
                let outcome = self.effectiveness(mv, self.target, self.battler_ai);
                let value = if outcome.doesnt_affect() {
                    0
                } else {
                    let move_type = self.battle.move_info(mv).move_type;
                    apply_modifiers(outcome.damage, move_type, attacker, defender, field)
                };
                if (best as u32) < value {
                    best = value as u8;
                }
            }
        }

        self.set_result(FuncResult::Effectiveness(fold_modified(best as u32)))
    }
}
