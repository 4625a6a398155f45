//! Getters over battler, field and party state

use crate::ai::interpreter::{Flow, Vm};
use crate::ai::scratch::FuncResult;
use crate::ai::script::Instruction;
use crate::battle::constants::*;
use crate::core::types::AbilityId;

impl Vm<'_> {
    pub(crate) fn get_turn_count(&mut self) -> Flow {
        let turns = self.battle.field().turn_counter;
        self.set_result(FuncResult::Number(turns as u32))
    }

    /// Unknown selectors leave the register as it was
    pub(crate) fn get_type(&mut self, insn: &Instruction<'_>) -> Flow {
        let ai = self.battler_ai;
        let target = self.target;
        let ty = match insn.u8_at(1) {
            AI_TYPE1_USER => Some(self.mon(ai).types[0]),
            AI_TYPE1_TARGET => Some(self.mon(target).types[0]),
            AI_TYPE2_USER => Some(self.mon(ai).types[1]),
            AI_TYPE2_TARGET => Some(self.mon(target).types[1]),
            AI_TYPE_MOVE => Some(self.considered_move().move_type),
            AI_TYPE1_USER_PARTNER => Some(self.mon(ai.partner()).types[0]),
            AI_TYPE1_TARGET_PARTNER => Some(self.mon(target.partner()).types[0]),
            AI_TYPE2_USER_PARTNER => Some(self.mon(ai.partner()).types[1]),
            AI_TYPE2_TARGET_PARTNER => Some(self.mon(target.partner()).types[1]),
            _ => None,
        };
        match ty {
            Some(ty) => self.set_result(FuncResult::Number(ty as u32)),
            None => Flow::Next,
        }
    }

    /// Standing reserve members, not counting whoever is already on the field
    pub(crate) fn count_usable_party_mons(&mut self, insn: &Instruction<'_>) -> Flow {
        let battler = self.resolve_battler(insn.u8_at(1));
        let on_field = self.battle.party_index(battler);
        let partner_on_field = if self.battle.battle_flags().is_double() {
            self.battle.party_index(battler.partner())
        } else {
            on_field
        };

        let count = self
            .battle
            .party(battler.side())
            .iter()
            .enumerate()
            .filter(|&(index, member)| {
                index != on_field && index != partner_on_field && member.is_usable()
            })
            .count();
        self.set_result(FuncResult::Number(count as u32))
    }

    pub(crate) fn get_ability(&mut self, insn: &Instruction<'_>) -> Flow {
        let ability = self.mon(self.resolve_battler(insn.u8_at(1))).ability;
        self.set_result(FuncResult::Number(ability as u32))
    }

    /// 1 if the battler has the ability, 0 if not, 2 if the AI cannot tell
    ///
    /// The AI knows its own side's abilities. For opponents it uses what it
    /// has seen, then abilities that announce themselves by trapping, then
    /// the species' possible abilities.
    pub(crate) fn check_ability(&mut self, insn: &Instruction<'_>) -> Flow {
        let selector = insn.u8_at(1);
        let wanted: AbilityId = insn.u8_at(2);
        let battler = self.resolve_wanted_battler(selector);
        let mon = self.mon(battler);

        let ability = if selector == AI_TARGET || selector == AI_TARGET_PARTNER {
            let remembered = self.history.ability(battler);
            if remembered != ABILITY_NONE {
                remembered
            } else if matches!(
                mon.ability,
                ABILITY_SHADOW_TAG | ABILITY_MAGNET_PULL | ABILITY_ARENA_TRAP
            ) {
                mon.ability
            } else {
                let [first, second] = self.battle.species_abilities(mon.species);
                if first != ABILITY_NONE {
                    if second == ABILITY_NONE {
                        first
                    } else if first != wanted && second != wanted {
                        first
                    } else {
                        ABILITY_NONE
                    }
                } else {
                    // No species in the stock data has only a second ability
                    tracing::warn!(
                        species = mon.species,
                        battler = battler.0,
                        "Ability inference fell back to the species' second ability"
                    );
                    second
                }
            }
        } else {
            mon.ability
        };

        let result = if ability == ABILITY_NONE {
            2
        } else if ability == wanted {
            1
        } else {
            0
        };
        self.set_result(FuncResult::Number(result))
    }

    /// Last matching weather wins; no weather leaves the register untouched
    pub(crate) fn get_weather(&mut self) -> Flow {
        let weather = self.battle.field().weather;
        let mut result = None;
        if weather & WEATHER_RAIN != 0 {
            result = Some(AI_WEATHER_RAIN);
        }
        if weather & WEATHER_SANDSTORM != 0 {
            result = Some(AI_WEATHER_SANDSTORM);
        }
        if weather & WEATHER_SUN != 0 {
            result = Some(AI_WEATHER_SUN);
        }
        if weather & WEATHER_HAIL != 0 {
            result = Some(AI_WEATHER_HAIL);
        }
        match result {
            Some(value) => self.set_result(FuncResult::Number(value)),
            None => Flow::Next,
        }
    }

    pub(crate) fn get_hold_effect(&mut self, insn: &Instruction<'_>) -> Flow {
        let item = self.mon(self.resolve_battler(insn.u8_at(1))).item;
        let effect = self.battle.hold_effect(item);
        self.set_result(FuncResult::Number(effect as u32))
    }

    pub(crate) fn get_gender(&mut self, insn: &Instruction<'_>) -> Flow {
        let gender = self.mon(self.resolve_battler(insn.u8_at(1))).gender;
        self.set_result(FuncResult::Number(gender as u32))
    }

    pub(crate) fn is_first_turn_for(&mut self, insn: &Instruction<'_>) -> Flow {
        let first_turn = self.mon(self.resolve_battler(insn.u8_at(1))).disable.is_first_turn;
        self.set_result(FuncResult::Number(first_turn as u32))
    }

    pub(crate) fn get_stockpile_count(&mut self, insn: &Instruction<'_>) -> Flow {
        let count = self.mon(self.resolve_battler(insn.u8_at(1))).disable.stockpile_counter;
        self.set_result(FuncResult::Number(count as u32))
    }

    pub(crate) fn is_double_battle(&mut self) -> Flow {
        let double = self.battle.battle_flags().is_double();
        self.set_result(FuncResult::Flag(double))
    }

    pub(crate) fn get_used_held_item(&mut self, insn: &Instruction<'_>) -> Flow {
        let item = self.mon(self.resolve_battler(insn.u8_at(1))).used_held_item;
        self.set_result(FuncResult::Number(item as u32))
    }

    pub(crate) fn get_protect_count(&mut self, insn: &Instruction<'_>) -> Flow {
        let uses = self.mon(self.resolve_battler(insn.u8_at(1))).disable.protect_uses;
        self.set_result(FuncResult::Number(uses as u32))
    }

    pub(crate) fn get_spikes_layers_target(&mut self) -> Flow {
        let layers = self.battle.side(self.target.side()).spikes_layers;
        self.set_result(FuncResult::Number(layers as u32))
    }
}
