//! What the AI remembers about its opponents
//!
//! Lives for the whole battle and is only mutated between decision passes by
//! the battle loop (plus the orchestrator recording a target's last move).

use serde::{Deserialize, Serialize};

use crate::battle::constants::{ABILITY_NONE, MAX_TRAINER_ITEMS};
use crate::core::types::{
    AbilityId, BattleTypeFlags, BattlerId, ItemId, MoveId, MAX_BATTLERS_COUNT, MAX_MON_MOVES,
};

/// Battle modes in which the opposing trainer may not use items
const NO_TRAINER_ITEMS: u32 = BattleTypeFlags::LINK
    | BattleTypeFlags::SAFARI
    | BattleTypeFlags::BATTLE_TOWER
    | BattleTypeFlags::EREADER_TRAINER
    | BattleTypeFlags::SECRET_BASE
    | BattleTypeFlags::FRONTIER
    | BattleTypeFlags::INGAME_PARTNER
    | BattleTypeFlags::RECORDED_LINK;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleHistory {
    used_moves: [[MoveId; MAX_MON_MOVES]; MAX_BATTLERS_COUNT],
    abilities: [AbilityId; MAX_BATTLERS_COUNT],
    item_effects: [u8; MAX_BATTLERS_COUNT],
    trainer_items: Vec<ItemId>,
}

impl BattleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything and load the opposing trainer's items
    ///
    /// Items are only tracked in ordinary trainer battles.
    pub fn prepare_for_battle(&mut self, flags: BattleTypeFlags, trainer_items: &[ItemId]) {
        *self = Self::default();

        if flags.has(BattleTypeFlags::TRAINER) && !flags.has(NO_TRAINER_ITEMS) {
            self.trainer_items = trainer_items
                .iter()
                .copied()
                .take(MAX_TRAINER_ITEMS)
                .filter(|&item| item != 0)
                .collect();
        }

        tracing::debug!(items = self.trainer_items.len(), "Battle history prepared");
    }

    /// Remember `last_move` as seen from `battler`
    ///
    /// Each slot is written once; recording stops at a slot already holding
    /// the move or at the first empty slot.
    pub fn record_last_used_move(&mut self, battler: BattlerId, last_move: MoveId) {
        let Some(slots) = self.used_moves.get_mut(battler.index()) else {
            return;
        };

        for slot in slots.iter_mut() {
            if *slot == last_move {
                break;
            }
            if slot.is_none() {
                *slot = last_move;
                break;
            }
        }
    }

    pub fn clear_move_history(&mut self, battler: BattlerId) {
        if let Some(slots) = self.used_moves.get_mut(battler.index()) {
            *slots = [MoveId::NONE; MAX_MON_MOVES];
        }
    }

    pub fn record_ability(&mut self, battler: BattlerId, ability: AbilityId) {
        if let Some(entry) = self.abilities.get_mut(battler.index()) {
            *entry = ability;
        }
    }

    pub fn clear_ability_history(&mut self, battler: BattlerId) {
        self.record_ability(battler, ABILITY_NONE);
    }

    pub fn record_item_effect(&mut self, battler: BattlerId, hold_effect: u8) {
        if let Some(entry) = self.item_effects.get_mut(battler.index()) {
            *entry = hold_effect;
        }
    }

    pub fn clear_item_effect_history(&mut self, battler: BattlerId) {
        self.record_item_effect(battler, 0);
    }

    pub fn used_moves(&self, battler: BattlerId) -> &[MoveId] {
        self.used_moves
            .get(battler.index())
            .map(|slots| slots.as_slice())
            .unwrap_or(&[])
    }

    pub fn ability(&self, battler: BattlerId) -> AbilityId {
        self.abilities
            .get(battler.index())
            .copied()
            .unwrap_or(ABILITY_NONE)
    }

    pub fn item_effect(&self, battler: BattlerId) -> u8 {
        self.item_effects.get(battler.index()).copied().unwrap_or(0)
    }

    pub fn trainer_items(&self) -> &[ItemId] {
        &self.trainer_items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TACKLE: MoveId = MoveId(33);
    const EMBER: MoveId = MoveId(52);

    #[test]
    fn test_moves_recorded_once_in_order() {
        let mut history = BattleHistory::new();
        let foe = BattlerId(0);

        history.record_last_used_move(foe, TACKLE);
        history.record_last_used_move(foe, TACKLE);
        history.record_last_used_move(foe, EMBER);

        assert_eq!(
            history.used_moves(foe),
            &[TACKLE, EMBER, MoveId::NONE, MoveId::NONE]
        );
    }

    #[test]
    fn test_no_move_is_never_recorded() {
        let mut history = BattleHistory::new();
        history.record_last_used_move(BattlerId(2), MoveId::NONE);
        assert!(history.used_moves(BattlerId(2)).iter().all(|m| m.is_none()));
    }

    #[test]
    fn test_full_history_stops_recording() {
        let mut history = BattleHistory::new();
        let foe = BattlerId(1);
        for id in 1..=5 {
            history.record_last_used_move(foe, MoveId(id));
        }
        assert_eq!(
            history.used_moves(foe),
            &[MoveId(1), MoveId(2), MoveId(3), MoveId(4)]
        );

        history.clear_move_history(foe);
        assert!(history.used_moves(foe).iter().all(|m| m.is_none()));
    }

    #[test]
    fn test_trainer_items_only_in_plain_trainer_battles() {
        let mut history = BattleHistory::new();
        history.prepare_for_battle(BattleTypeFlags(BattleTypeFlags::TRAINER), &[13, 0, 21, 22, 23]);
        assert_eq!(history.trainer_items(), &[13, 21, 22]);

        history.prepare_for_battle(
            BattleTypeFlags(BattleTypeFlags::TRAINER | BattleTypeFlags::BATTLE_TOWER),
            &[13],
        );
        assert!(history.trainer_items().is_empty());
    }

    #[test]
    fn test_ability_and_item_effect_memory() {
        let mut history = BattleHistory::new();
        history.record_ability(BattlerId(0), 26);
        history.record_item_effect(BattlerId(0), 4);
        assert_eq!(history.ability(BattlerId(0)), 26);
        assert_eq!(history.item_effect(BattlerId(0)), 4);

        history.clear_ability_history(BattlerId(0));
        history.clear_item_effect_history(BattlerId(0));
        assert_eq!(history.ability(BattlerId(0)), ABILITY_NONE);
        assert_eq!(history.item_effect(BattlerId(0)), 0);
    }
}
