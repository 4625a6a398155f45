//! Self-contained battle state that implements [`BattleView`]
//!
//! Used by the headless runner (loaded from JSON) and by tests that build a
//! battle field by hand.

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::state::{
    BattleMon, BattleView, FieldState, MoveInfo, PartyMon, ScriptSelection, SideState,
};
use crate::core::error::{AiError, Result};
use crate::core::types::{
    AbilityId, BattleTypeFlags, BattlerId, ItemId, MoveId, Side, SpeciesId, MAX_BATTLERS_COUNT,
    PARTY_SIZE,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleSnapshot {
    pub flags: BattleTypeFlags,
    pub battlers: [BattleMon; MAX_BATTLERS_COUNT],
    /// Bit N set when position N is empty
    pub absent_mask: u8,
    pub party_indexes: [u8; MAX_BATTLERS_COUNT],
    pub unusable_moves: [u8; MAX_BATTLERS_COUNT],
    pub sides: [SideState; 2],
    pub field: FieldState,
    pub parties: [Vec<PartyMon>; 2],
    pub selection: ScriptSelection,
    pub moves: AHashMap<u16, MoveInfo>,
    pub species_abilities: AHashMap<SpeciesId, [AbilityId; 2]>,
    pub hold_effects: AHashMap<ItemId, u8>,
}

impl BattleSnapshot {
    pub fn new(flags: BattleTypeFlags) -> Self {
        Self {
            flags,
            ..Default::default()
        }
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let snapshot: BattleSnapshot = serde_json::from_str(contents)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&contents)?;
        tracing::debug!("Loaded battle snapshot from {:?}", path);
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<()> {
        for (side, party) in self.parties.iter().enumerate() {
            if party.len() > PARTY_SIZE {
                return Err(AiError::Config(format!(
                    "party for side {} has {} members (max {})",
                    side,
                    party.len(),
                    PARTY_SIZE
                )));
            }
        }
        Ok(())
    }

    pub fn insert_move(&mut self, mv: MoveId, info: MoveInfo) {
        self.moves.insert(mv.0, info);
    }

    pub fn insert_species(&mut self, species: SpeciesId, abilities: [AbilityId; 2]) {
        self.species_abilities.insert(species, abilities);
    }

    pub fn insert_hold_effect(&mut self, item: ItemId, hold_effect: u8) {
        self.hold_effects.insert(item, hold_effect);
    }

    pub fn battler_mut(&mut self, id: BattlerId) -> &mut BattleMon {
        &mut self.battlers[id.index() % MAX_BATTLERS_COUNT]
    }
}

impl BattleView for BattleSnapshot {
    fn battle_flags(&self) -> BattleTypeFlags {
        self.flags
    }

    fn battler(&self, id: BattlerId) -> &BattleMon {
        &self.battlers[id.index() % MAX_BATTLERS_COUNT]
    }

    fn is_absent(&self, id: BattlerId) -> bool {
        self.absent_mask & (1 << id.0) != 0
    }

    fn move_info(&self, mv: MoveId) -> MoveInfo {
        self.moves.get(&mv.0).copied().unwrap_or_default()
    }

    fn species_abilities(&self, species: SpeciesId) -> [AbilityId; 2] {
        self.species_abilities
            .get(&species)
            .copied()
            .unwrap_or_default()
    }

    fn hold_effect(&self, item: ItemId) -> u8 {
        self.hold_effects.get(&item).copied().unwrap_or(0)
    }

    fn side(&self, side: Side) -> &SideState {
        &self.sides[side.index()]
    }

    fn field(&self) -> &FieldState {
        &self.field
    }

    fn party(&self, side: Side) -> &[PartyMon] {
        &self.parties[side.index()]
    }

    fn party_index(&self, id: BattlerId) -> usize {
        self.party_indexes
            .get(id.index())
            .copied()
            .unwrap_or_default() as usize
    }

    fn unusable_moves(&self, id: BattlerId) -> u8 {
        self.unusable_moves
            .get(id.index())
            .copied()
            .unwrap_or_default()
    }

    fn script_selection(&self) -> &ScriptSelection {
        &self.selection
    }
}
