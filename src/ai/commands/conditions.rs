//! Predicates over battler, side and party state

use crate::ai::interpreter::{branch, Flow, Vm};
use crate::ai::script::Instruction;
use crate::battle::constants::{
    status1_sleep_turn, status1_toxic_turn, AI_USER, STATUS1_SLEEP, STATUS1_TOXIC_COUNTER,
};
use crate::battle::state::BattleMon;

impl Vm<'_> {
    /// Branches unless the battler still has more than one turn of sleep left
    pub(crate) fn if_waking(&mut self, insn: &Instruction<'_>) -> Flow {
        let mon = self.mon(self.resolve_battler(insn.u8_at(1)));
        let asleep_for_a_while = mon.status1 & STATUS1_SLEEP > status1_sleep_turn(1);
        branch(insn, !asleep_for_a_while)
    }

    pub(crate) fn if_badly_poisoned_for_turns(&mut self, insn: &Instruction<'_>) -> Flow {
        let mon = self.mon(self.resolve_battler(insn.u8_at(1)));
        let turns = insn.u8_at(2) as u32;
        branch(
            insn,
            mon.status1 & STATUS1_TOXIC_COUNTER >= status1_toxic_turn(turns),
        )
    }

    pub(crate) fn if_hp(&mut self, insn: &Instruction<'_>, pred: fn(u32, u32) -> bool) -> Flow {
        let mon = self.mon(self.resolve_battler(insn.u8_at(1)));
        branch(insn, pred(mon.hp_percent(), insn.u8_at(2) as u32))
    }

    /// `has == true` branches when any requested bit is set, `false` when none is
    pub(crate) fn if_status_bits(
        &mut self,
        insn: &Instruction<'_>,
        field: fn(&BattleMon) -> u32,
        has: bool,
    ) -> Flow {
        let mon = self.mon(self.resolve_battler(insn.u8_at(1)));
        let set = field(mon) & insn.u32_at(2) != 0;
        branch(insn, set == has)
    }

    /// A substitute costs a quarter of max HP
    pub(crate) fn if_can_use_substitute(&mut self, insn: &Instruction<'_>) -> Flow {
        let mon = self.mon(self.resolve_battler(insn.u8_at(1)));
        branch(insn, 4 * mon.hp as u32 > mon.max_hp as u32)
    }

    pub(crate) fn if_side_affecting(&mut self, insn: &Instruction<'_>, has: bool) -> Flow {
        let side = self.resolve_battler(insn.u8_at(1)).side();
        let set = self.battle.side(side).statuses & insn.u32_at(2) != 0;
        branch(insn, set == has)
    }

    /// Scan the selected battler's party for a standing member with exactly this status
    pub(crate) fn if_status_in_party(&mut self, insn: &Instruction<'_>, has: bool) -> Flow {
        let battler = if insn.u8_at(1) == AI_USER {
            self.battler_ai
        } else {
            self.target
        };
        let status = insn.u32_at(2);
        let found = self
            .battle
            .party(battler.side())
            .iter()
            .any(|member| member.is_usable() && member.status == status);
        branch(insn, found == has)
    }

    pub(crate) fn if_stat_level(&mut self, insn: &Instruction<'_>, pred: fn(u8, u8) -> bool) -> Flow {
        let mon = self.mon(self.resolve_battler(insn.u8_at(1)));
        let stage = mon.stat_stage(insn.u8_at(2) as usize);
        branch(insn, pred(stage, insn.u8_at(3)))
    }

    /// 0: user above target, 1: below, 2: same level
    pub(crate) fn if_level_cond(&mut self, insn: &Instruction<'_>) -> Flow {
        let user = self.ai_mon().level;
        let target = self.target_mon().level;
        let holds = match insn.u8_at(1) {
            0 => user > target,
            1 => user < target,
            2 => user == target,
            _ => false,
        };
        branch(insn, holds)
    }

    pub(crate) fn if_user_goes(&mut self, insn: &Instruction<'_>, goes: bool) -> Flow {
        let order = self
            .oracle
            .who_strikes_first(self.battle, self.battler_ai, self.target);
        branch(insn, (order == insn.u8_at(1)) == goes)
    }

    pub(crate) fn if_target_taunted(&mut self, insn: &Instruction<'_>, taunted: bool) -> Flow {
        let timer = self.target_mon().disable.taunt_timer;
        branch(insn, (timer != 0) == taunted)
    }

    pub(crate) fn if_target_is_ally(&mut self, insn: &Instruction<'_>) -> Flow {
        branch(insn, self.battler_ai.is_ally_of(self.target))
    }

    pub(crate) fn if_flash_fired(&mut self, insn: &Instruction<'_>) -> Flow {
        let mon = self.mon(self.resolve_wanted_battler(insn.u8_at(1)));
        branch(insn, mon.flash_fire)
    }

    /// Item id is encoded high byte first
    pub(crate) fn if_holds_item(&mut self, insn: &Instruction<'_>) -> Flow {
        let mon = self.mon(self.resolve_wanted_battler(insn.u8_at(1)));
        let item = (insn.u8_at(2) as u16) << 8 | insn.u8_at(3) as u16;
        branch(insn, mon.item == item)
    }
}
