//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Number of known-move positions per combatant
pub const MAX_MON_MOVES: usize = 4;

/// Active combatant slots in a double battle
pub const MAX_BATTLERS_COUNT: usize = 4;

/// Number of members in a party
pub const PARTY_SIZE: usize = 6;

/// Bit of a battler id that encodes its side
pub const BIT_SIDE: u8 = 1;

/// Bit of a battler id that encodes its flank (left/right)
pub const BIT_FLANK: u8 = 2;

/// Species, ability, item and type identifiers are plain table indices
pub type SpeciesId = u16;
pub type AbilityId = u8;
pub type ItemId = u16;
pub type TypeId = u8;

/// Which side of the field a battler stands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    Player = 0,
    Opponent = 1,
}

impl Side {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Position of an active combatant
///
/// Ids double as field positions: bit 0 is the side, bit 1 the flank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BattlerId(pub u8);

impl BattlerId {
    pub fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn side(self) -> Side {
        if self.0 & BIT_SIDE == 0 {
            Side::Player
        } else {
            Side::Opponent
        }
    }

    /// The combatant on the same side, other flank
    pub fn partner(self) -> Self {
        Self(self.0 ^ BIT_FLANK)
    }

    /// The combatant directly across the field
    pub fn opposite(self) -> Self {
        Self(self.0 ^ BIT_SIDE)
    }

    pub fn is_ally_of(self, other: BattlerId) -> bool {
        self.0 & BIT_SIDE == other.0 & BIT_SIDE
    }

    /// All battler slots in id order
    pub fn all() -> impl Iterator<Item = BattlerId> {
        (0..MAX_BATTLERS_COUNT as u8).map(BattlerId)
    }
}

impl std::fmt::Display for BattlerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "battler {}", self.0)
    }
}

/// Move identifier; zero means "no move"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveId(pub u16);

impl MoveId {
    pub const NONE: MoveId = MoveId(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// Bitset of enabled logic modules, bit N selects module N
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AiFlags(pub u32);

impl AiFlags {
    pub const CHECK_BAD_MOVE: AiFlags = AiFlags(1 << 0);
    pub const TRY_TO_FAINT: AiFlags = AiFlags(1 << 1);
    pub const CHECK_VIABILITY: AiFlags = AiFlags(1 << 2);
    pub const SETUP_FIRST_TURN: AiFlags = AiFlags(1 << 3);
    pub const RISKY: AiFlags = AiFlags(1 << 4);
    pub const PREFER_STRONGEST_MOVE: AiFlags = AiFlags(1 << 5);
    pub const PREFER_BATON_PASS: AiFlags = AiFlags(1 << 6);
    pub const DOUBLE_BATTLE: AiFlags = AiFlags(1 << 7);
    pub const HP_AWARE: AiFlags = AiFlags(1 << 8);
    pub const ROAMING: AiFlags = AiFlags(1 << 29);
    pub const SAFARI: AiFlags = AiFlags(1 << 30);
    pub const FIRST_BATTLE: AiFlags = AiFlags(1 << 31);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: AiFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Module ids enabled in this set, ascending
    pub fn modules(self) -> impl Iterator<Item = u8> {
        (0..32u8).filter(move |bit| self.0 & (1 << bit) != 0)
    }
}

impl std::ops::BitOr for AiFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for AiFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Battle-mode flags describing the kind of battle being fought
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BattleTypeFlags(pub u32);

impl BattleTypeFlags {
    pub const DOUBLE: u32 = 1 << 0;
    pub const LINK: u32 = 1 << 1;
    pub const TRAINER: u32 = 1 << 3;
    pub const FIRST_BATTLE: u32 = 1 << 4;
    pub const SAFARI: u32 = 1 << 7;
    pub const BATTLE_TOWER: u32 = 1 << 8;
    pub const ROAMER: u32 = 1 << 10;
    pub const EREADER_TRAINER: u32 = 1 << 11;
    pub const TWO_OPPONENTS: u32 = 1 << 15;
    pub const DOME: u32 = 1 << 16;
    pub const PALACE: u32 = 1 << 17;
    pub const ARENA: u32 = 1 << 18;
    pub const FACTORY: u32 = 1 << 19;
    pub const PIKE: u32 = 1 << 20;
    pub const PYRAMID: u32 = 1 << 21;
    pub const INGAME_PARTNER: u32 = 1 << 22;
    pub const RECORDED: u32 = 1 << 24;
    pub const RECORDED_LINK: u32 = 1 << 25;
    pub const TRAINER_HILL: u32 = 1 << 26;
    pub const SECRET_BASE: u32 = 1 << 27;
    pub const FRONTIER: u32 = Self::BATTLE_TOWER
        | Self::DOME
        | Self::PALACE
        | Self::ARENA
        | Self::FACTORY
        | Self::PIKE
        | Self::PYRAMID;

    pub fn has(self, mask: u32) -> bool {
        self.0 & mask != 0
    }

    pub fn is_double(self) -> bool {
        self.has(Self::DOUBLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battler_relations() {
        let b = BattlerId(1);
        assert_eq!(b.side(), Side::Opponent);
        assert_eq!(b.partner(), BattlerId(3));
        assert_eq!(b.opposite(), BattlerId(0));
        assert!(b.is_ally_of(BattlerId(3)));
        assert!(!b.is_ally_of(BattlerId(2)));
    }

    #[test]
    fn test_ai_flags_modules_ascending() {
        let flags = AiFlags::CHECK_BAD_MOVE | AiFlags::CHECK_VIABILITY | AiFlags::FIRST_BATTLE;
        let modules: Vec<u8> = flags.modules().collect();
        assert_eq!(modules, vec![0, 2, 31]);
    }

    #[test]
    fn test_frontier_mask_covers_facilities() {
        let flags = BattleTypeFlags(BattleTypeFlags::PIKE);
        assert!(flags.has(BattleTypeFlags::FRONTIER));
        assert!(!flags.is_double());
    }
}
