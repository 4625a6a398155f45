//! Effectiveness buckets and the modifier pass
//!
//! Scripts never see raw damage ratios. The type oracle is fed a base of 40
//! (`X1`) and its output is folded into one of six buckets. The three folding
//! rules below are successive overrides: each check reassigns the result,
//! so a later check wins over an earlier one for overlapping ranges.

use serde::Serialize;

use crate::battle::constants::*;
use crate::battle::state::BattleMon;
use crate::core::types::TypeId;

/// Base damage fed to the type oracle for effectiveness queries
pub const EFFECTIVENESS_BASE: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EffectivenessBucket {
    X0,
    X0_25,
    X0_5,
    X1,
    X2,
    X4,
}

impl EffectivenessBucket {
    pub const fn raw(self) -> u32 {
        match self {
            EffectivenessBucket::X0 => 0,
            EffectivenessBucket::X0_25 => 10,
            EffectivenessBucket::X0_5 => 20,
            EffectivenessBucket::X1 => 40,
            EffectivenessBucket::X2 => 80,
            EffectivenessBucket::X4 => 160,
        }
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(EffectivenessBucket::X0),
            10 => Some(EffectivenessBucket::X0_25),
            20 => Some(EffectivenessBucket::X0_5),
            40 => Some(EffectivenessBucket::X1),
            80 => Some(EffectivenessBucket::X2),
            160 => Some(EffectivenessBucket::X4),
            _ => None,
        }
    }
}

/// Exact-match folding used by the "highest effectiveness" getters
///
/// Only the STAB-boosted super/not-very-effective values are remapped;
/// anything else (40, 80, 160, or a neutral STAB 60) passes through.
pub fn fold_exact(damage: u32, doesnt_affect: bool) -> u32 {
    let mut value = damage;
    if value == 120 {
        value = EffectivenessBucket::X2.raw();
    }
    if value == 240 {
        value = EffectivenessBucket::X4.raw();
    }
    if value == 30 {
        value = EffectivenessBucket::X0_5.raw();
    }
    if value == 15 {
        value = EffectivenessBucket::X0_25.raw();
    }
    if doesnt_affect {
        value = EffectivenessBucket::X0.raw();
    }
    value
}

/// Threshold folding used by `if_type_effectiveness`
///
/// Values between the thresholds keep their raw magnitude.
pub fn fold_thresholds(damage: u32, doesnt_affect: bool) -> u32 {
    let mut value = damage;
    if value >= 180 {
        value = EffectivenessBucket::X4.raw();
    }
    if value <= 15 {
        value = EffectivenessBucket::X0_25.raw();
    }
    if value >= 90 {
        value = EffectivenessBucket::X2.raw();
    }
    if value <= 30 {
        value = EffectivenessBucket::X0_5.raw();
    }
    if doesnt_affect {
        value = EffectivenessBucket::X0.raw();
    }
    value
}

/// Folding used after the modifier pass; starts from `X1`
pub fn fold_modified(damage: u32) -> EffectivenessBucket {
    let mut bucket = EffectivenessBucket::X1;
    if damage == 0 {
        bucket = EffectivenessBucket::X0;
    }
    if damage >= 160 {
        bucket = EffectivenessBucket::X4;
    }
    if damage <= 15 {
        bucket = EffectivenessBucket::X0_25;
    }
    if damage >= 80 {
        bucket = EffectivenessBucket::X2;
    }
    if damage <= 30 {
        bucket = EffectivenessBucket::X0_5;
    }
    bucket
}

/// Percentage multiplier for a stat stage (6 is neutral)
pub fn stage_multiplier(stage: u8) -> u32 {
    match stage {
        0 => 33,
        1 => 36,
        2 => 43,
        3 => 50,
        4 => 60,
        5 => 75,
        6 => 100,
        7 => 133,
        8 => 166,
        9 => 200,
        10 => 250,
        11 => 266,
        12 => 300,
        _ => 100,
    }
}

/// Field conditions the modifier pass reads
#[derive(Debug, Clone, Copy)]
pub struct ModifierField {
    pub weather: u16,
    /// Side conditions on the defender's side
    pub defender_side_statuses: u32,
}

/// Gate for the pinch abilities
///
/// The threshold is `max_hp * 4 / 3` kept in a byte, so it wraps for
/// large max HP values.
fn in_pinch(mon: &BattleMon) -> bool {
    let threshold = (mon.max_hp as u32 * 4 / 3) as u8;
    mon.hp as u32 <= threshold as u32
}

/// Fold abilities, weather, screens and stat stages into a type-calc result
///
/// `damage` is the oracle output for a base of 40. Callers skip this pass
/// entirely when the defender has Wonder Guard.
pub fn apply_modifiers(
    damage: u32,
    move_type: TypeId,
    attacker: &BattleMon,
    defender: &BattleMon,
    field: ModifierField,
) -> u32 {
    let mut value = damage;
    let pinch = in_pinch(attacker);
    let boost = |value: u32| value * 4 / 3;

    match move_type {
        TYPE_BUG => {
            if attacker.ability == ABILITY_SWARM && pinch {
                value = boost(value);
            }
        }
        TYPE_GRASS => {
            if attacker.ability == ABILITY_OVERGROW && pinch {
                value = boost(value);
            }
        }
        TYPE_GROUND => {
            if defender.ability == ABILITY_LEVITATE {
                value = 0;
            }
        }
        TYPE_ICE => {
            if defender.ability == ABILITY_THICK_FAT {
                value /= 2;
            }
        }
        TYPE_ELECTRIC => {
            if defender.ability == ABILITY_VOLT_ABSORB {
                value = 0;
            }
            if attacker.status3 & STATUS3_CHARGED_UP != 0 {
                value *= 2;
            }
            if defender.status3 & STATUS3_MUDSPORT != 0 {
                value /= 2;
            }
        }
        TYPE_WATER => {
            if defender.ability == ABILITY_WATER_ABSORB {
                value = 0;
            }
            if field.weather & WEATHER_RAIN != 0 {
                value *= 2;
            }
            if attacker.ability == ABILITY_TORRENT && pinch {
                value = boost(value);
            }
            if field.weather & WEATHER_SUN != 0 {
                value /= 2;
            }
        }
        TYPE_FIRE => {
            if defender.ability == ABILITY_FLASH_FIRE {
                value = 0;
            }
            if field.weather & WEATHER_SUN != 0 {
                value *= 2;
            }
            if attacker.ability == ABILITY_BLAZE && pinch {
                value = boost(value);
            }
            if field.weather & WEATHER_RAIN != 0 {
                value /= 2;
            }
            if defender.ability == ABILITY_THICK_FAT {
                value /= 2;
            }
            if defender.status3 & STATUS3_WATERSPORT != 0 {
                value /= 2;
            }
        }
        _ => {}
    }

    let (attack_stage, defense_stage) = if is_type_physical(move_type) {
        if field.defender_side_statuses & SIDE_STATUS_REFLECT != 0 {
            value /= 2;
        }
        (attacker.stat_stage(STAT_ATK), defender.stat_stage(STAT_DEF))
    } else if is_type_special(move_type) && move_type <= TYPE_DARK {
        if field.defender_side_statuses & SIDE_STATUS_LIGHTSCREEN != 0 {
            value /= 2;
        }
        (attacker.stat_stage(STAT_SPATK), defender.stat_stage(STAT_SPDEF))
    } else {
        (DEFAULT_STAT_STAGE, DEFAULT_STAT_STAGE)
    };

    value * stage_multiplier(attack_stage) / stage_multiplier(defense_stage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_modified_override_chain_boundaries() {
        use EffectivenessBucket::*;
        let cases = [
            (0, X0_5),
            (15, X0_5),
            (16, X0_5),
            (30, X0_5),
            (31, X1),
            (79, X1),
            (80, X2),
            (159, X2),
            (160, X2),
            (400, X2),
        ];
        for (raw, expected) in cases {
            assert_eq!(fold_modified(raw), expected, "raw {}", raw);
        }
    }

    #[test]
    fn test_threshold_chain_boundaries() {
        let cases = [
            (0, 20),
            (15, 20),
            (16, 20),
            (30, 20),
            (31, 31),
            (60, 60),
            (89, 89),
            (90, 80),
            (180, 80),
            (240, 80),
        ];
        for (raw, expected) in cases {
            assert_eq!(fold_thresholds(raw, false), expected, "raw {}", raw);
        }
        assert_eq!(fold_thresholds(240, true), 0);
    }

    #[test]
    fn test_exact_folding() {
        assert_eq!(fold_exact(120, false), 80);
        assert_eq!(fold_exact(240, false), 160);
        assert_eq!(fold_exact(30, false), 20);
        assert_eq!(fold_exact(15, false), 10);
        assert_eq!(fold_exact(40, false), 40);
        assert_eq!(fold_exact(60, false), 60);
        assert_eq!(fold_exact(120, true), 0);
    }

    #[test]
    fn test_stage_table() {
        assert_eq!(stage_multiplier(0), 33);
        assert_eq!(stage_multiplier(6), 100);
        assert_eq!(stage_multiplier(12), 300);
        assert_eq!(stage_multiplier(13), 100);
    }

    #[test]
    fn test_absorb_ability_zeroes_water() {
        let attacker = BattleMon::default();
        let defender = BattleMon {
            ability: ABILITY_WATER_ABSORB,
            ..Default::default()
        };
        let field = ModifierField {
            weather: WEATHER_RAIN,
            defender_side_statuses: 0,
        };
        assert_eq!(apply_modifiers(80, TYPE_WATER, &attacker, &defender, field), 0);
    }

    #[test]
    fn test_rain_and_torrent_pinch_stack() {
        let attacker = BattleMon {
            ability: ABILITY_TORRENT,
            hp: 10,
            max_hp: 90,
            ..Default::default()
        };
        let defender = BattleMon::default();
        let field = ModifierField {
            weather: WEATHER_RAIN,
            defender_side_statuses: 0,
        };
        // 40 * 2 (rain) * 4/3 (torrent)
        assert_eq!(apply_modifiers(40, TYPE_WATER, &attacker, &defender, field), 106);
    }

    #[test]
    fn test_reflect_and_stages_on_physical() {
        let mut attacker = BattleMon::default();
        attacker.stat_stages[STAT_ATK] = 8;
        let defender = BattleMon::default();
        let field = ModifierField {
            weather: 0,
            defender_side_statuses: SIDE_STATUS_REFLECT,
        };
        // 80 / 2 * 166 / 100
        assert_eq!(apply_modifiers(80, TYPE_ROCK, &attacker, &defender, field), 66);
    }

    #[test]
    fn test_pinch_gate_uses_byte_threshold() {
        let mon = |hp, max_hp| BattleMon {
            hp,
            max_hp,
            ..Default::default()
        };
        // 90 * 4 / 3 = 120
        assert!(in_pinch(&mon(80, 90)));
        assert!(in_pinch(&mon(120, 150)));
        assert!(!in_pinch(&mon(201, 150)));
        // 200 * 4 / 3 = 266, which wraps to 10
        assert!(in_pinch(&mon(10, 200)));
        assert!(!in_pinch(&mon(11, 200)));
    }

    #[test]
    fn test_torrent_boosts_above_a_third_of_max_hp() {
        let attacker = BattleMon {
            ability: ABILITY_TORRENT,
            hp: 80,
            max_hp: 90,
            ..Default::default()
        };
        let field = ModifierField {
            weather: 0,
            defender_side_statuses: 0,
        };
        assert_eq!(
            apply_modifiers(60, TYPE_WATER, &attacker, &BattleMon::default(), field),
            80
        );
    }

    proptest! {
        #[test]
        fn prop_modified_fold_matches_reassignment_order(raw in 0u32..1000) {
            let expected = if raw <= 30 {
                EffectivenessBucket::X0_5
            } else if raw >= 80 {
                EffectivenessBucket::X2
            } else {
                EffectivenessBucket::X1
            };
            prop_assert_eq!(fold_modified(raw), expected);
        }
    }
}
