//! Read-only battle facade consumed by the AI interpreter
//!
//! The surrounding battle loop owns the real state; the AI only ever sees it
//! through [`BattleView`]. Plain data structs below are what the facade hands
//! out per battler, per side and per move.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{DEFAULT_STAT_STAGE, NUM_BATTLE_STATS};
use crate::core::types::{
    AbilityId, AiFlags, BattleTypeFlags, BattlerId, ItemId, MoveId, Side, SpeciesId, TypeId,
    MAX_MON_MOVES,
};

/// Static data for one move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveInfo {
    pub effect: u8,
    pub power: u8,
    pub move_type: TypeId,
    pub accuracy: u8,
    pub secondary_effect_chance: u8,
    /// Target class bitmask (selected target, both foes, user, ...)
    pub target: u8,
}

/// Per-battler counters tied to disable/encore and friends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisableState {
    pub disabled_move: MoveId,
    pub encored_move: MoveId,
    pub is_first_turn: u8,
    pub stockpile_counter: u8,
    pub protect_uses: u8,
    pub taunt_timer: u8,
}

/// An active combatant as the AI sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleMon {
    pub species: SpeciesId,
    pub level: u8,
    pub hp: u16,
    pub max_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub ability: AbilityId,
    pub item: ItemId,
    pub types: [TypeId; 2],
    pub moves: [MoveId; MAX_MON_MOVES],
    pub pp: [u8; MAX_MON_MOVES],
    pub stat_stages: [u8; NUM_BATTLE_STATS],
    pub status1: u32,
    pub status2: u32,
    pub status3: u32,
    pub gender: u8,
    /// Move this battler used most recently, if any
    pub last_move: MoveId,
    /// Held item consumed earlier in the battle
    pub used_held_item: ItemId,
    pub flash_fire: bool,
    pub disable: DisableState,
}

impl Default for BattleMon {
    fn default() -> Self {
        Self {
            species: 0,
            level: 1,
            hp: 0,
            max_hp: 1,
            attack: 1,
            defense: 1,
            speed: 1,
            sp_attack: 1,
            sp_defense: 1,
            ability: 0,
            item: 0,
            types: [0, 0],
            moves: [MoveId::NONE; MAX_MON_MOVES],
            pp: [0; MAX_MON_MOVES],
            stat_stages: [DEFAULT_STAT_STAGE; NUM_BATTLE_STATS],
            status1: 0,
            status2: 0,
            status3: 0,
            gender: 0,
            last_move: MoveId::NONE,
            used_held_item: 0,
            flash_fire: false,
            disable: DisableState::default(),
        }
    }
}

impl BattleMon {
    /// Remaining HP as a whole percentage of max HP
    pub fn hp_percent(&self) -> u32 {
        100 * self.hp as u32 / self.max_hp.max(1) as u32
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    pub fn knows_move(&self, mv: MoveId) -> bool {
        self.moves.contains(&mv)
    }

    pub fn stat_stage(&self, stat: usize) -> u8 {
        self.stat_stages
            .get(stat)
            .copied()
            .unwrap_or(DEFAULT_STAT_STAGE)
    }
}

/// A reserve party member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyMon {
    pub species: SpeciesId,
    pub hp: u16,
    pub status: u32,
    pub is_egg: bool,
}

impl PartyMon {
    /// Present, hatched and still standing
    pub fn is_usable(&self) -> bool {
        self.species != 0 && !self.is_egg && self.hp != 0
    }
}

/// Conditions affecting one whole side of the field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideState {
    pub statuses: u32,
    pub spikes_layers: u8,
}

/// Field-wide conditions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldState {
    pub weather: u16,
    pub turn_counter: u8,
    pub safari_escape_factor: u8,
}

/// Trainer-authored module sets the battle was set up with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSelection {
    pub opponent_a_flags: AiFlags,
    pub opponent_b_flags: AiFlags,
    /// Flags stored in a recorded battle for the acting side
    pub recorded_flags: AiFlags,
    /// Flags chosen by the factory facility for the current streak
    pub factory_flags: AiFlags,
    /// Items the opposing trainer carries into battle
    pub trainer_items: Vec<ItemId>,
    /// Move slots the palace facility lets the acting battler consider
    pub palace_move_mask: u8,
}

/// Read access to everything the AI consults
pub trait BattleView {
    fn battle_flags(&self) -> BattleTypeFlags;

    fn battler(&self, id: BattlerId) -> &BattleMon;

    /// Whether the position is empty (fainted and not replaced, or unused in singles)
    fn is_absent(&self, id: BattlerId) -> bool;

    fn move_info(&self, mv: MoveId) -> MoveInfo;

    /// The two abilities a species may have
    fn species_abilities(&self, species: SpeciesId) -> [AbilityId; 2];

    fn hold_effect(&self, item: ItemId) -> u8;

    fn side(&self, side: Side) -> &SideState;

    fn field(&self) -> &FieldState;

    fn party(&self, side: Side) -> &[PartyMon];

    /// Party slot of the combatant currently at this position
    fn party_index(&self, id: BattlerId) -> usize;

    /// Bitmask of move slots the battler cannot select this turn
    fn unusable_moves(&self, id: BattlerId) -> u8;

    fn script_selection(&self) -> &ScriptSelection;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hp_percent_truncates() {
        let mon = BattleMon {
            hp: 33,
            max_hp: 200,
            ..Default::default()
        };
        assert_eq!(mon.hp_percent(), 16);
    }

    #[test]
    fn test_party_usable_skips_eggs_and_fainted() {
        let egg = PartyMon {
            species: 25,
            hp: 10,
            status: 0,
            is_egg: true,
        };
        let fainted = PartyMon {
            species: 25,
            hp: 0,
            ..Default::default()
        };
        let ok = PartyMon {
            species: 25,
            hp: 1,
            ..Default::default()
        };
        assert!(!egg.is_usable());
        assert!(!fainted.is_usable());
        assert!(ok.is_usable());
    }

    #[test]
    fn test_out_of_range_stat_stage_is_neutral() {
        let mon = BattleMon::default();
        assert_eq!(mon.stat_stage(42), DEFAULT_STAT_STAGE);
    }
}
