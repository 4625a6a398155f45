//! Battle data constants the AI scripts are authored against
//!
//! Values match the reference data tables byte for byte; scripts embed
//! them as immediates.

use crate::core::types::{AbilityId, TypeId};

// Script battler selectors
pub const AI_TARGET: u8 = 0;
pub const AI_USER: u8 = 1;
pub const AI_TARGET_PARTNER: u8 = 2;
pub const AI_USER_PARTNER: u8 = 3;

// get_type selectors
pub const AI_TYPE1_TARGET: u8 = 0;
pub const AI_TYPE1_USER: u8 = 1;
pub const AI_TYPE2_TARGET: u8 = 2;
pub const AI_TYPE2_USER: u8 = 3;
pub const AI_TYPE_MOVE: u8 = 4;
pub const AI_TYPE1_TARGET_PARTNER: u8 = 5;
pub const AI_TYPE1_USER_PARTNER: u8 = 6;
pub const AI_TYPE2_TARGET_PARTNER: u8 = 7;
pub const AI_TYPE2_USER_PARTNER: u8 = 8;

// get_how_powerful_move_is results
pub const MOVE_POWER_OTHER: u32 = 0;
pub const MOVE_NOT_MOST_POWERFUL: u32 = 1;
pub const MOVE_MOST_POWERFUL: u32 = 2;

// get_weather results
pub const AI_WEATHER_SUN: u32 = 0;
pub const AI_WEATHER_RAIN: u32 = 1;
pub const AI_WEATHER_SANDSTORM: u32 = 2;
pub const AI_WEATHER_HAIL: u32 = 3;

// if_has_attack_of_category operand
pub const AI_CATEGORY_PHYSICAL: u8 = 0;
pub const AI_CATEGORY_SPECIAL: u8 = 1;

// Field weather bits
pub const WEATHER_RAIN: u16 = 0x0007;
pub const WEATHER_SANDSTORM: u16 = 0x0018;
pub const WEATHER_SUN: u16 = 0x0060;
pub const WEATHER_HAIL: u16 = 0x0080;

// Primary status (status1)
pub const STATUS1_SLEEP: u32 = 0x7;
pub const STATUS1_POISON: u32 = 1 << 3;
pub const STATUS1_BURN: u32 = 1 << 4;
pub const STATUS1_FREEZE: u32 = 1 << 5;
pub const STATUS1_PARALYSIS: u32 = 1 << 6;
pub const STATUS1_TOXIC_POISON: u32 = 1 << 7;
pub const STATUS1_TOXIC_COUNTER: u32 = 0xF00;

pub const fn status1_sleep_turn(turns: u32) -> u32 {
    turns
}

pub const fn status1_toxic_turn(turns: u32) -> u32 {
    turns << 8
}

// Volatile status (status2)
pub const STATUS2_CONFUSION: u32 = 0x7;
pub const STATUS2_SUBSTITUTE: u32 = 1 << 24;
pub const STATUS2_CURSED: u32 = 1 << 28;

// Positional status (status3)
pub const STATUS3_LEECHSEED: u32 = 1 << 2;
pub const STATUS3_CHARGED_UP: u32 = 1 << 9;
pub const STATUS3_MUDSPORT: u32 = 1 << 16;
pub const STATUS3_WATERSPORT: u32 = 1 << 17;

// Side conditions
pub const SIDE_STATUS_REFLECT: u32 = 1 << 0;
pub const SIDE_STATUS_LIGHTSCREEN: u32 = 1 << 1;
pub const SIDE_STATUS_SPIKES: u32 = 1 << 4;
pub const SIDE_STATUS_SAFEGUARD: u32 = 1 << 5;
pub const SIDE_STATUS_MIST: u32 = 1 << 8;

// Move result flags reported by the type oracle
pub const MOVE_RESULT_MISSED: u8 = 1 << 0;
pub const MOVE_RESULT_SUPER_EFFECTIVE: u8 = 1 << 1;
pub const MOVE_RESULT_NOT_VERY_EFFECTIVE: u8 = 1 << 2;
pub const MOVE_RESULT_DOESNT_AFFECT_FOE: u8 = 1 << 3;

// Stat stage indices
pub const STAT_HP: usize = 0;
pub const STAT_ATK: usize = 1;
pub const STAT_DEF: usize = 2;
pub const STAT_SPEED: usize = 3;
pub const STAT_SPATK: usize = 4;
pub const STAT_SPDEF: usize = 5;
pub const STAT_ACC: usize = 6;
pub const STAT_EVASION: usize = 7;
pub const NUM_BATTLE_STATS: usize = 8;
pub const DEFAULT_STAT_STAGE: u8 = 6;
pub const MAX_STAT_STAGE: u8 = 12;

// Elemental types
pub const TYPE_NORMAL: TypeId = 0;
pub const TYPE_FIGHTING: TypeId = 1;
pub const TYPE_FLYING: TypeId = 2;
pub const TYPE_POISON: TypeId = 3;
pub const TYPE_GROUND: TypeId = 4;
pub const TYPE_ROCK: TypeId = 5;
pub const TYPE_BUG: TypeId = 6;
pub const TYPE_GHOST: TypeId = 7;
pub const TYPE_STEEL: TypeId = 8;
pub const TYPE_MYSTERY: TypeId = 9;
pub const TYPE_FIRE: TypeId = 10;
pub const TYPE_WATER: TypeId = 11;
pub const TYPE_GRASS: TypeId = 12;
pub const TYPE_ELECTRIC: TypeId = 13;
pub const TYPE_PSYCHIC: TypeId = 14;
pub const TYPE_ICE: TypeId = 15;
pub const TYPE_DRAGON: TypeId = 16;
pub const TYPE_DARK: TypeId = 17;

/// Types below the mystery type deal physical damage
pub fn is_type_physical(ty: TypeId) -> bool {
    ty < TYPE_MYSTERY
}

pub fn is_type_special(ty: TypeId) -> bool {
    ty > TYPE_MYSTERY
}

// Abilities consulted directly by the interpreter
pub const ABILITY_NONE: AbilityId = 0;
pub const ABILITY_VOLT_ABSORB: AbilityId = 10;
pub const ABILITY_WATER_ABSORB: AbilityId = 11;
pub const ABILITY_FLASH_FIRE: AbilityId = 18;
pub const ABILITY_SHADOW_TAG: AbilityId = 23;
pub const ABILITY_WONDER_GUARD: AbilityId = 25;
pub const ABILITY_LEVITATE: AbilityId = 26;
pub const ABILITY_MAGNET_PULL: AbilityId = 42;
pub const ABILITY_THICK_FAT: AbilityId = 47;
pub const ABILITY_OVERGROW: AbilityId = 65;
pub const ABILITY_BLAZE: AbilityId = 66;
pub const ABILITY_TORRENT: AbilityId = 67;
pub const ABILITY_SWARM: AbilityId = 68;
pub const ABILITY_ARENA_TRAP: AbilityId = 71;

// Move effects consulted directly by the interpreter
pub const EFFECT_HIT: u8 = 0;
pub const EFFECT_EXPLOSION: u8 = 7;
pub const EFFECT_DREAM_EATER: u8 = 8;
pub const EFFECT_ALWAYS_HIT: u8 = 17;
pub const EFFECT_RAZOR_WIND: u8 = 39;
pub const EFFECT_SKY_ATTACK: u8 = 75;
pub const EFFECT_RECHARGE: u8 = 80;
pub const EFFECT_HIDDEN_POWER: u8 = 135;
pub const EFFECT_SKULL_BASH: u8 = 145;
pub const EFFECT_SOLAR_BEAM: u8 = 151;
pub const EFFECT_SPIT_UP: u8 = 161;
pub const EFFECT_FOCUS_PUNCH: u8 = 170;
pub const EFFECT_SUPERPOWER: u8 = 182;
pub const EFFECT_ERUPTION: u8 = 190;
pub const EFFECT_OVERHEAT: u8 = 204;

/// Effects treated as powerless when ranking a moveset by damage
pub const IGNORED_POWERFUL_MOVE_EFFECTS: [u8; 12] = [
    EFFECT_EXPLOSION,
    EFFECT_DREAM_EATER,
    EFFECT_RAZOR_WIND,
    EFFECT_SKY_ATTACK,
    EFFECT_RECHARGE,
    EFFECT_SKULL_BASH,
    EFFECT_SOLAR_BEAM,
    EFFECT_SPIT_UP,
    EFFECT_FOCUS_PUNCH,
    EFFECT_SUPERPOWER,
    EFFECT_ERUPTION,
    EFFECT_OVERHEAT,
];

// Gender values
pub const MON_MALE: u8 = 0x00;
pub const MON_FEMALE: u8 = 0xFE;
pub const MON_GENDERLESS: u8 = 0xFF;

/// Trainer items remembered for the opposing trainer
pub const MAX_TRAINER_ITEMS: usize = 4;

/// Percentage of the expected roll used by faint predictions
pub const FAINT_ROLL_PERCENT: u32 = 95;
