//! Damage, type-effectiveness and turn-order seams
//!
//! The AI never computes damage itself; it asks a [`DamageOracle`] the same
//! two questions the battle engine answers for a real attack (base damage,
//! then the type pass) and a [`TurnOrder`] who moves first. [`StandardOracle`]
//! is a compact reference implementation used by the runner and tests.

use ahash::AHashMap;

use crate::battle::constants::*;
use crate::battle::state::BattleView;
use crate::core::types::{BattlerId, MoveId, TypeId};

/// Result of running a damage value through the type pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCalcOutcome {
    pub damage: u32,
    /// `MOVE_RESULT_*` bits
    pub flags: u8,
}

impl TypeCalcOutcome {
    pub fn doesnt_affect(&self) -> bool {
        self.flags & MOVE_RESULT_DOESNT_AFFECT_FOE != 0
    }
}

pub trait DamageOracle {
    /// Damage before type effectiveness for `attacker` using `mv` on `defender`
    fn base_damage(
        &self,
        view: &dyn BattleView,
        mv: MoveId,
        attacker: BattlerId,
        defender: BattlerId,
    ) -> u32;

    /// Apply same-type bonus, type matchups and immunities to `damage`
    fn type_calc(
        &self,
        view: &dyn BattleView,
        mv: MoveId,
        attacker: BattlerId,
        defender: BattlerId,
        damage: u32,
    ) -> TypeCalcOutcome;
}

pub trait TurnOrder {
    /// 0 when `first` acts before `second` this turn, 1 otherwise
    fn who_strikes_first(&self, view: &dyn BattleView, first: BattlerId, second: BattlerId) -> u8;
}

/// Everything the interpreter needs from the outside besides state
pub trait BattleOracle: DamageOracle + TurnOrder {}

impl<T: DamageOracle + TurnOrder> BattleOracle for T {}

/// Multipliers in tenths
const SUPER_EFFECTIVE: u8 = 20;
const NOT_VERY_EFFECTIVE: u8 = 5;
const NO_EFFECT: u8 = 0;

/// Non-neutral matchups: (attacking type, defending type, multiplier)
const TYPE_CHART: &[(TypeId, TypeId, u8)] = &[
    (TYPE_NORMAL, TYPE_ROCK, NOT_VERY_EFFECTIVE),
    (TYPE_NORMAL, TYPE_STEEL, NOT_VERY_EFFECTIVE),
    (TYPE_NORMAL, TYPE_GHOST, NO_EFFECT),
    (TYPE_FIRE, TYPE_FIRE, NOT_VERY_EFFECTIVE),
    (TYPE_FIRE, TYPE_WATER, NOT_VERY_EFFECTIVE),
    (TYPE_FIRE, TYPE_GRASS, SUPER_EFFECTIVE),
    (TYPE_FIRE, TYPE_ICE, SUPER_EFFECTIVE),
    (TYPE_FIRE, TYPE_BUG, SUPER_EFFECTIVE),
    (TYPE_FIRE, TYPE_ROCK, NOT_VERY_EFFECTIVE),
    (TYPE_FIRE, TYPE_DRAGON, NOT_VERY_EFFECTIVE),
    (TYPE_FIRE, TYPE_STEEL, SUPER_EFFECTIVE),
    (TYPE_WATER, TYPE_FIRE, SUPER_EFFECTIVE),
    (TYPE_WATER, TYPE_WATER, NOT_VERY_EFFECTIVE),
    (TYPE_WATER, TYPE_GRASS, NOT_VERY_EFFECTIVE),
    (TYPE_WATER, TYPE_GROUND, SUPER_EFFECTIVE),
    (TYPE_WATER, TYPE_ROCK, SUPER_EFFECTIVE),
    (TYPE_WATER, TYPE_DRAGON, NOT_VERY_EFFECTIVE),
    (TYPE_ELECTRIC, TYPE_WATER, SUPER_EFFECTIVE),
    (TYPE_ELECTRIC, TYPE_ELECTRIC, NOT_VERY_EFFECTIVE),
    (TYPE_ELECTRIC, TYPE_GRASS, NOT_VERY_EFFECTIVE),
    (TYPE_ELECTRIC, TYPE_GROUND, NO_EFFECT),
    (TYPE_ELECTRIC, TYPE_FLYING, SUPER_EFFECTIVE),
    (TYPE_ELECTRIC, TYPE_DRAGON, NOT_VERY_EFFECTIVE),
    (TYPE_GRASS, TYPE_FIRE, NOT_VERY_EFFECTIVE),
    (TYPE_GRASS, TYPE_WATER, SUPER_EFFECTIVE),
    (TYPE_GRASS, TYPE_GRASS, NOT_VERY_EFFECTIVE),
    (TYPE_GRASS, TYPE_POISON, NOT_VERY_EFFECTIVE),
    (TYPE_GRASS, TYPE_GROUND, SUPER_EFFECTIVE),
    (TYPE_GRASS, TYPE_FLYING, NOT_VERY_EFFECTIVE),
    (TYPE_GRASS, TYPE_BUG, NOT_VERY_EFFECTIVE),
    (TYPE_GRASS, TYPE_ROCK, SUPER_EFFECTIVE),
    (TYPE_GRASS, TYPE_DRAGON, NOT_VERY_EFFECTIVE),
    (TYPE_GRASS, TYPE_STEEL, NOT_VERY_EFFECTIVE),
    (TYPE_ICE, TYPE_WATER, NOT_VERY_EFFECTIVE),
    (TYPE_ICE, TYPE_GRASS, SUPER_EFFECTIVE),
    (TYPE_ICE, TYPE_ICE, NOT_VERY_EFFECTIVE),
    (TYPE_ICE, TYPE_GROUND, SUPER_EFFECTIVE),
    (TYPE_ICE, TYPE_FLYING, SUPER_EFFECTIVE),
    (TYPE_ICE, TYPE_DRAGON, SUPER_EFFECTIVE),
    (TYPE_ICE, TYPE_STEEL, NOT_VERY_EFFECTIVE),
    (TYPE_ICE, TYPE_FIRE, NOT_VERY_EFFECTIVE),
    (TYPE_FIGHTING, TYPE_NORMAL, SUPER_EFFECTIVE),
    (TYPE_FIGHTING, TYPE_ICE, SUPER_EFFECTIVE),
    (TYPE_FIGHTING, TYPE_POISON, NOT_VERY_EFFECTIVE),
    (TYPE_FIGHTING, TYPE_FLYING, NOT_VERY_EFFECTIVE),
    (TYPE_FIGHTING, TYPE_PSYCHIC, NOT_VERY_EFFECTIVE),
    (TYPE_FIGHTING, TYPE_BUG, NOT_VERY_EFFECTIVE),
    (TYPE_FIGHTING, TYPE_ROCK, SUPER_EFFECTIVE),
    (TYPE_FIGHTING, TYPE_DARK, SUPER_EFFECTIVE),
    (TYPE_FIGHTING, TYPE_STEEL, SUPER_EFFECTIVE),
    (TYPE_FIGHTING, TYPE_GHOST, NO_EFFECT),
    (TYPE_POISON, TYPE_GRASS, SUPER_EFFECTIVE),
    (TYPE_POISON, TYPE_POISON, NOT_VERY_EFFECTIVE),
    (TYPE_POISON, TYPE_GROUND, NOT_VERY_EFFECTIVE),
    (TYPE_POISON, TYPE_ROCK, NOT_VERY_EFFECTIVE),
    (TYPE_POISON, TYPE_GHOST, NOT_VERY_EFFECTIVE),
    (TYPE_POISON, TYPE_STEEL, NO_EFFECT),
    (TYPE_GROUND, TYPE_FIRE, SUPER_EFFECTIVE),
    (TYPE_GROUND, TYPE_ELECTRIC, SUPER_EFFECTIVE),
    (TYPE_GROUND, TYPE_GRASS, NOT_VERY_EFFECTIVE),
    (TYPE_GROUND, TYPE_POISON, SUPER_EFFECTIVE),
    (TYPE_GROUND, TYPE_FLYING, NO_EFFECT),
    (TYPE_GROUND, TYPE_BUG, NOT_VERY_EFFECTIVE),
    (TYPE_GROUND, TYPE_ROCK, SUPER_EFFECTIVE),
    (TYPE_GROUND, TYPE_STEEL, SUPER_EFFECTIVE),
    (TYPE_FLYING, TYPE_ELECTRIC, NOT_VERY_EFFECTIVE),
    (TYPE_FLYING, TYPE_GRASS, SUPER_EFFECTIVE),
    (TYPE_FLYING, TYPE_FIGHTING, SUPER_EFFECTIVE),
    (TYPE_FLYING, TYPE_BUG, SUPER_EFFECTIVE),
    (TYPE_FLYING, TYPE_ROCK, NOT_VERY_EFFECTIVE),
    (TYPE_FLYING, TYPE_STEEL, NOT_VERY_EFFECTIVE),
    (TYPE_PSYCHIC, TYPE_FIGHTING, SUPER_EFFECTIVE),
    (TYPE_PSYCHIC, TYPE_POISON, SUPER_EFFECTIVE),
    (TYPE_PSYCHIC, TYPE_PSYCHIC, NOT_VERY_EFFECTIVE),
    (TYPE_PSYCHIC, TYPE_DARK, NO_EFFECT),
    (TYPE_PSYCHIC, TYPE_STEEL, NOT_VERY_EFFECTIVE),
    (TYPE_BUG, TYPE_FIRE, NOT_VERY_EFFECTIVE),
    (TYPE_BUG, TYPE_GRASS, SUPER_EFFECTIVE),
    (TYPE_BUG, TYPE_FIGHTING, NOT_VERY_EFFECTIVE),
    (TYPE_BUG, TYPE_POISON, NOT_VERY_EFFECTIVE),
    (TYPE_BUG, TYPE_FLYING, NOT_VERY_EFFECTIVE),
    (TYPE_BUG, TYPE_PSYCHIC, SUPER_EFFECTIVE),
    (TYPE_BUG, TYPE_GHOST, NOT_VERY_EFFECTIVE),
    (TYPE_BUG, TYPE_DARK, SUPER_EFFECTIVE),
    (TYPE_BUG, TYPE_STEEL, NOT_VERY_EFFECTIVE),
    (TYPE_ROCK, TYPE_FIRE, SUPER_EFFECTIVE),
    (TYPE_ROCK, TYPE_ICE, SUPER_EFFECTIVE),
    (TYPE_ROCK, TYPE_FIGHTING, NOT_VERY_EFFECTIVE),
    (TYPE_ROCK, TYPE_GROUND, NOT_VERY_EFFECTIVE),
    (TYPE_ROCK, TYPE_FLYING, SUPER_EFFECTIVE),
    (TYPE_ROCK, TYPE_BUG, SUPER_EFFECTIVE),
    (TYPE_ROCK, TYPE_STEEL, NOT_VERY_EFFECTIVE),
    (TYPE_GHOST, TYPE_NORMAL, NO_EFFECT),
    (TYPE_GHOST, TYPE_PSYCHIC, SUPER_EFFECTIVE),
    (TYPE_GHOST, TYPE_DARK, NOT_VERY_EFFECTIVE),
    (TYPE_GHOST, TYPE_STEEL, NOT_VERY_EFFECTIVE),
    (TYPE_GHOST, TYPE_GHOST, SUPER_EFFECTIVE),
    (TYPE_DRAGON, TYPE_DRAGON, SUPER_EFFECTIVE),
    (TYPE_DRAGON, TYPE_STEEL, NOT_VERY_EFFECTIVE),
    (TYPE_DARK, TYPE_FIGHTING, NOT_VERY_EFFECTIVE),
    (TYPE_DARK, TYPE_PSYCHIC, SUPER_EFFECTIVE),
    (TYPE_DARK, TYPE_GHOST, SUPER_EFFECTIVE),
    (TYPE_DARK, TYPE_DARK, NOT_VERY_EFFECTIVE),
    (TYPE_DARK, TYPE_STEEL, NOT_VERY_EFFECTIVE),
    (TYPE_STEEL, TYPE_FIRE, NOT_VERY_EFFECTIVE),
    (TYPE_STEEL, TYPE_WATER, NOT_VERY_EFFECTIVE),
    (TYPE_STEEL, TYPE_ELECTRIC, NOT_VERY_EFFECTIVE),
    (TYPE_STEEL, TYPE_ICE, SUPER_EFFECTIVE),
    (TYPE_STEEL, TYPE_ROCK, SUPER_EFFECTIVE),
    (TYPE_STEEL, TYPE_STEEL, NOT_VERY_EFFECTIVE),
];

/// Stat stage ratios as (numerator, denominator), stage 0..=12
const STAT_STAGE_RATIOS: [(u32, u32); 13] = [
    (10, 40),
    (10, 35),
    (10, 30),
    (10, 25),
    (10, 20),
    (10, 15),
    (10, 10),
    (15, 10),
    (20, 10),
    (25, 10),
    (30, 10),
    (35, 10),
    (40, 10),
];

fn apply_stage(stat: u16, stage: u8) -> u32 {
    let (num, den) = STAT_STAGE_RATIOS
        .get(stage as usize)
        .copied()
        .unwrap_or((10, 10));
    stat as u32 * num / den
}

/// Reference oracle: table-driven type chart and a plain damage formula
#[derive(Debug, Clone)]
pub struct StandardOracle {
    chart: AHashMap<(TypeId, TypeId), u8>,
}

impl Default for StandardOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardOracle {
    pub fn new() -> Self {
        let chart = TYPE_CHART
            .iter()
            .map(|&(atk, def, mult)| ((atk, def), mult))
            .collect();
        Self { chart }
    }

    /// Multiplier in tenths for one attacking/defending type pair
    pub fn matchup(&self, attacking: TypeId, defending: TypeId) -> u8 {
        self.chart.get(&(attacking, defending)).copied().unwrap_or(10)
    }
}

impl DamageOracle for StandardOracle {
    fn base_damage(
        &self,
        view: &dyn BattleView,
        mv: MoveId,
        attacker: BattlerId,
        defender: BattlerId,
    ) -> u32 {
        let info = view.move_info(mv);
        if info.power == 0 {
            return 0;
        }

        let atk = view.battler(attacker);
        let def = view.battler(defender);

        let (attack, defense) = if is_type_physical(info.move_type) {
            (
                apply_stage(atk.attack, atk.stat_stage(STAT_ATK)),
                apply_stage(def.defense, def.stat_stage(STAT_DEF)),
            )
        } else if is_type_special(info.move_type) {
            (
                apply_stage(atk.sp_attack, atk.stat_stage(STAT_SPATK)),
                apply_stage(def.sp_defense, def.stat_stage(STAT_SPDEF)),
            )
        } else {
            return 0;
        };

        let level_factor = 2 * atk.level as u32 / 5 + 2;
        level_factor * info.power as u32 * attack / defense.max(1) / 50 + 2
    }

    fn type_calc(
        &self,
        view: &dyn BattleView,
        mv: MoveId,
        attacker: BattlerId,
        defender: BattlerId,
        damage: u32,
    ) -> TypeCalcOutcome {
        let info = view.move_info(mv);
        let atk = view.battler(attacker);
        let def = view.battler(defender);
        let mut outcome = TypeCalcOutcome { damage, flags: 0 };

        if info.move_type == TYPE_MYSTERY {
            return outcome;
        }

        if atk.types.contains(&info.move_type) {
            outcome.damage = outcome.damage * 15 / 10;
        }

        if def.ability == ABILITY_LEVITATE && info.move_type == TYPE_GROUND {
            outcome.flags |= MOVE_RESULT_MISSED | MOVE_RESULT_DOESNT_AFFECT_FOE;
            return outcome;
        }

        for (i, &def_type) in def.types.iter().enumerate() {
            // Dual-typed entries with the same type twice only count once
            if i == 1 && def.types[0] == def_type {
                break;
            }
            let mult = self.matchup(info.move_type, def_type);
            match mult {
                NO_EFFECT => outcome.flags |= MOVE_RESULT_DOESNT_AFFECT_FOE,
                SUPER_EFFECTIVE => outcome.flags |= MOVE_RESULT_SUPER_EFFECTIVE,
                NOT_VERY_EFFECTIVE => outcome.flags |= MOVE_RESULT_NOT_VERY_EFFECTIVE,
                _ => {}
            }
            outcome.damage = outcome.damage * mult as u32 / 10;
        }

        if outcome.doesnt_affect() {
            outcome.damage = 0;
        }
        outcome
    }
}

impl TurnOrder for StandardOracle {
    fn who_strikes_first(&self, view: &dyn BattleView, first: BattlerId, second: BattlerId) -> u8 {
        let effective_speed = |id: BattlerId| {
            let mon = view.battler(id);
            let mut speed = apply_stage(mon.speed, mon.stat_stage(STAT_SPEED));
            if mon.status1 & STATUS1_PARALYSIS != 0 {
                speed /= 4;
            }
            speed
        };

        if effective_speed(first) >= effective_speed(second) {
            0
        } else {
            1
        }
    }
}
