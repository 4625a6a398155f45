//! AI script opcode table
//!
//! Every opcode carries its fixed encoded length (opcode byte included).
//! Conditional opcodes fall through to `address + len()` when their
//! predicate does not hold, so the length lives here and nowhere else.

macro_rules! opcodes {
    ($($variant:ident = $byte:literal, $name:literal, $len:literal;)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum Opcode {
            $($variant = $byte,)*
        }

        impl Opcode {
            /// All opcodes in byte order
            pub const ALL: &'static [Opcode] = &[$(Opcode::$variant,)*];

            /// Encoded size in bytes, opcode included
            pub const fn len(self) -> usize {
                match self {
                    $(Opcode::$variant => $len,)*
                }
            }

            /// Script-facing mnemonic
            pub const fn name(self) -> &'static str {
                match self {
                    $(Opcode::$variant => $name,)*
                }
            }
        }

        impl TryFrom<u8> for Opcode {
            type Error = u8;

            fn try_from(byte: u8) -> Result<Self, Self::Error> {
                match byte {
                    $($byte => Ok(Opcode::$variant),)*
                    other => Err(other),
                }
            }
        }
    };
}

opcodes! {
    IfRandomLessThan = 0x00, "if_random_less_than", 6;
    IfRandomGreaterThan = 0x01, "if_random_greater_than", 6;
    IfWaking = 0x02, "if_waking", 6;
    IfBadlyPoisonedForTurns = 0x03, "if_badly_poisoned_for_turns", 7;
    Score = 0x04, "score", 2;
    IfHpLessThan = 0x05, "if_hp_less_than", 7;
    IfHpMoreThan = 0x06, "if_hp_more_than", 7;
    IfHpEqual = 0x07, "if_hp_equal", 7;
    IfHpNotEqual = 0x08, "if_hp_not_equal", 7;
    IfStatus = 0x09, "if_status", 10;
    IfNotStatus = 0x0A, "if_not_status", 10;
    IfStatus2 = 0x0B, "if_status2", 10;
    IfNotStatus2 = 0x0C, "if_not_status2", 10;
    IfStatus3 = 0x0D, "if_status3", 10;
    IfCanUseSubstitute = 0x0E, "if_can_use_substitute", 6;
    IfSideAffecting = 0x0F, "if_side_affecting", 10;
    IfNotSideAffecting = 0x10, "if_not_side_affecting", 10;
    IfLessThan = 0x11, "if_less_than", 6;
    IfMoreThan = 0x12, "if_more_than", 6;
    IfEqual = 0x13, "if_equal", 6;
    IfNotEqual = 0x14, "if_not_equal", 6;
    IfLessThanPtr = 0x15, "if_less_than_ptr", 9;
    IfMoreThanPtr = 0x16, "if_more_than_ptr", 9;
    IfHasAttackOfType = 0x17, "if_has_attack_of_type", 7;
    IfHasAttackOfCategory = 0x18, "if_has_attack_of_category", 7;
    IfMove = 0x19, "if_move", 7;
    IfNotMove = 0x1A, "if_not_move", 7;
    IfInBytes = 0x1B, "if_in_bytes", 9;
    IfNotInBytes = 0x1C, "if_not_in_bytes", 9;
    IfInHwords = 0x1D, "if_in_hwords", 9;
    CheckCurrMoveHasStab = 0x1E, "check_curr_move_has_stab", 1;
    IfUserHasAttackingMove = 0x1F, "if_user_has_attacking_move", 5;
    IfUserHasNoAttackingMoves = 0x20, "if_user_has_no_attacking_moves", 5;
    GetTurnCount = 0x21, "get_turn_count", 1;
    GetType = 0x22, "get_type", 2;
    GetConsideredMovePower = 0x23, "get_considered_move_power", 1;
    GetHowPowerfulMoveIs = 0x24, "get_how_powerful_move_is", 1;
    GetLastUsedBattlerMove = 0x25, "get_last_used_battler_move", 2;
    GetTargetPreviousMovePp = 0x26, "get_target_previous_move_pp", 1;
    IfSharesMoveWithUser = 0x27, "if_shares_move_with_user", 5;
    IfUserGoes = 0x28, "if_user_goes", 6;
    IfUserDoesntGo = 0x29, "if_user_doesnt_go", 6;
    GetConsideredMoveSecondEffChance = 0x2A, "get_considered_move_second_eff_chance", 1;
    GetConsideredMoveAccuracy = 0x2B, "get_considered_move_accuracy", 1;
    CountUsablePartyMons = 0x2C, "count_usable_party_mons", 2;
    GetConsideredMove = 0x2D, "get_considered_move", 1;
    GetConsideredMoveEffect = 0x2E, "get_considered_move_effect", 1;
    GetAbility = 0x2F, "get_ability", 2;
    GetHighestTypeEffectiveness = 0x30, "get_highest_type_effectiveness", 1;
    IfTypeEffectiveness = 0x31, "if_type_effectiveness", 6;
    IfTarget = 0x32, "if_target", 6;
    IfTypeEffectivenessWithModifiers = 0x33, "if_type_effectiveness_with_modifiers", 6;
    IfStatusInParty = 0x34, "if_status_in_party", 10;
    IfStatusNotInParty = 0x35, "if_status_not_in_party", 10;
    GetWeather = 0x36, "get_weather", 1;
    IfEffect = 0x37, "if_effect", 6;
    IfNotEffect = 0x38, "if_not_effect", 6;
    IfStatLevelLessThan = 0x39, "if_stat_level_less_than", 8;
    IfStatLevelMoreThan = 0x3A, "if_stat_level_more_than", 8;
    IfStatLevelEqual = 0x3B, "if_stat_level_equal", 8;
    IfStatLevelNotEqual = 0x3C, "if_stat_level_not_equal", 8;
    IfCanFaint = 0x3D, "if_can_faint", 5;
    ConsiderImitatedMove = 0x3E, "consider_imitated_move", 1;
    IfHasMove = 0x3F, "if_has_move", 8;
    IfDoesntHaveMove = 0x40, "if_doesnt_have_move", 8;
    IfHasMoveWithEffect = 0x41, "if_has_move_with_effect", 7;
    IfDoesntHaveMoveWithEffect = 0x42, "if_doesnt_have_move_with_effect", 7;
    IfAnyMoveDisabledOrEncored = 0x43, "if_any_move_disabled_or_encored", 7;
    IfCurrMoveDisabledOrEncored = 0x44, "if_curr_move_disabled_or_encored", 6;
    Flee = 0x45, "flee", 1;
    IfRandomSafariFlee = 0x46, "if_random_safari_flee", 5;
    Watch = 0x47, "watch", 1;
    GetHoldEffect = 0x48, "get_hold_effect", 2;
    GetGender = 0x49, "get_gender", 2;
    IsFirstTurnFor = 0x4A, "is_first_turn_for", 2;
    GetStockpileCount = 0x4B, "get_stockpile_count", 2;
    IsDoubleBattle = 0x4C, "is_double_battle", 1;
    GetUsedHeldItem = 0x4D, "get_used_held_item", 2;
    GetMoveTypeFromResult = 0x4E, "get_move_type_from_result", 1;
    GetMovePowerFromResult = 0x4F, "get_move_power_from_result", 1;
    GetMoveEffectFromResult = 0x50, "get_move_effect_from_result", 1;
    GetProtectCount = 0x51, "get_protect_count", 2;
    GetMoveTargetFromResult = 0x52, "get_move_target_from_result", 1;
    GetTypeEffectivenessFromResult = 0x53, "get_type_effectiveness_from_result", 1;
    GetSecondEffChanceFromResult = 0x54, "get_second_eff_chance_from_result", 1;
    GetSpikesLayersTarget = 0x55, "get_spikes_layers_target", 1;
    IfAiCanFaint = 0x56, "if_ai_can_faint", 5;
    GetHighestTypeEffectivenessFromTarget = 0x57, "get_highest_type_effectiveness_from_target", 1;
    Call = 0x58, "call", 5;
    Goto = 0x59, "goto", 5;
    End = 0x5A, "end", 1;
    IfLevelCond = 0x5B, "if_level_cond", 6;
    IfTargetTaunted = 0x5C, "if_target_taunted", 5;
    IfTargetNotTaunted = 0x5D, "if_target_not_taunted", 5;
    IfTargetIsAlly = 0x5E, "if_target_is_ally", 5;
    UsedConsideredMoveLastTurn = 0x5F, "used_considered_move_last_turn", 1;
    CheckAbility = 0x60, "check_ability", 3;
    IfFlashFired = 0x61, "if_flash_fired", 6;
    IfHoldsItem = 0x62, "if_holds_item", 8;
}

impl Opcode {
    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Opcodes whose operands end with a 4-byte branch target
    pub fn has_trailing_target(self) -> bool {
        use Opcode::*;
        !matches!(
            self,
            Score
                | CheckCurrMoveHasStab
                | GetTurnCount
                | GetType
                | GetConsideredMovePower
                | GetHowPowerfulMoveIs
                | GetLastUsedBattlerMove
                | GetTargetPreviousMovePp
                | GetConsideredMoveSecondEffChance
                | GetConsideredMoveAccuracy
                | CountUsablePartyMons
                | GetConsideredMove
                | GetConsideredMoveEffect
                | GetAbility
                | GetHighestTypeEffectiveness
                | GetWeather
                | ConsiderImitatedMove
                | Flee
                | Watch
                | GetHoldEffect
                | GetGender
                | IsFirstTurnFor
                | GetStockpileCount
                | IsDoubleBattle
                | GetUsedHeldItem
                | GetMoveTypeFromResult
                | GetMovePowerFromResult
                | GetMoveEffectFromResult
                | GetProtectCount
                | GetMoveTargetFromResult
                | GetTypeEffectivenessFromResult
                | GetSecondEffChanceFromResult
                | GetSpikesLayersTarget
                | GetHighestTypeEffectivenessFromTarget
                | End
                | UsedConsideredMoveLastTurn
                | CheckAbility
        )
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
