//! Decision pass integration tests
//!
//! Drives `BattleAi` end to end: setup, module runs, move tie-breaking and
//! target selection in double battles.

use std::path::Path;
use std::sync::Arc;

use battle_ai_vm::ai::*;
use battle_ai_vm::battle::constants::*;
use battle_ai_vm::battle::*;
use battle_ai_vm::core::types::*;
use battle_ai_vm::core::AiConfig;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const USER: BattlerId = BattlerId(1);

fn mon(moves: [u16; 4]) -> BattleMon {
    BattleMon {
        level: 50,
        hp: 100,
        max_hp: 100,
        attack: 100,
        defense: 100,
        speed: 100,
        sp_attack: 100,
        sp_defense: 100,
        types: [TYPE_NORMAL, TYPE_NORMAL],
        moves: moves.map(MoveId),
        pp: moves.map(|mv| if mv == 0 { 0 } else { 10 }),
        ..Default::default()
    }
}

fn singles() -> BattleSnapshot {
    let mut snap = BattleSnapshot::new(BattleTypeFlags(BattleTypeFlags::TRAINER));
    *snap.battler_mut(BattlerId(0)) = mon([1, 2, 0, 0]);
    *snap.battler_mut(USER) = mon([1, 2, 3, 4]);
    snap.absent_mask = 0b1100;
    snap.selection.opponent_a_flags = AiFlags(1);
    snap
}

fn doubles() -> BattleSnapshot {
    let mut snap = BattleSnapshot::new(BattleTypeFlags(
        BattleTypeFlags::TRAINER | BattleTypeFlags::DOUBLE,
    ));
    for id in BattlerId::all() {
        *snap.battler_mut(id) = mon([1, 2, 0, 0]);
    }
    snap.selection.opponent_a_flags = AiFlags(1);
    snap
}

/// Module 0 from `build`, plus an empty double-battle module
fn scripts(build: impl FnOnce(&mut ScriptBuilder)) -> Arc<ScriptTable> {
    let mut b = ScriptBuilder::new();
    b.module(0, "under_test");
    build(&mut b);
    b.module(7, "double_battle").end();
    Arc::new(b.build().expect("assemble"))
}

fn decide(ai: &mut BattleAi, snap: &BattleSnapshot, seed: u64, preset_mask: u8) -> AiDecision {
    let oracle = StandardOracle::new();
    let mut history = BattleHistory::new();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    ai.choose_move_or_action(snap, &oracle, &mut history, &mut rng, USER, preset_mask)
}

#[test]
fn test_tied_best_moves_split_evenly() {
    let table = scripts(|b| {
        b.op(Opcode::IfMove, &[1u16.into(), Operand::label("ten")])
            .op(Opcode::IfMove, &[2u16.into(), Operand::label("fifty")])
            .op(Opcode::IfMove, &[3u16.into(), Operand::label("fifty")])
            .end()
            .label("ten")
            .score(10)
            .end()
            .label("fifty")
            .score(50)
            .end();
    });
    let snap = singles();
    let mut ai = BattleAi::new(table, AiConfig::default()).expect("valid config");
    let oracle = StandardOracle::new();
    let mut history = BattleHistory::new();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let mut counts = [0u32; 4];
    for _ in 0..2000 {
        let decision = ai.choose_move_or_action(&snap, &oracle, &mut history, &mut rng, USER, 0);
        match decision.action {
            AiAction::Move { slot } => counts[slot] += 1,
            other => panic!("Expected a move, got {:?}", other),
        }
        assert_eq!(decision.target, BattlerId(0));
    }

    assert_eq!(ai.thinking().scores, [10, 50, 50, 0]);
    assert_eq!(counts[0], 0);
    assert_eq!(counts[3], 0);
    assert!(counts[1] > 850 && counts[2] > 850, "counts {:?}", counts);
}

#[test]
fn test_flee_overrides_scores() {
    let table = scripts(|b| {
        b.score(50).flee();
    });
    let mut ai = BattleAi::new(table, AiConfig::default()).expect("valid config");
    let decision = decide(&mut ai, &singles(), 1, ALL_MOVES_MASK);
    assert_eq!(decision.action, AiAction::Flee);
    // Only the first slot ran before the flee cut the module short
    assert_eq!(ai.thinking().scores, [150, 100, 100, 100]);
}

#[test]
fn test_safari_encounter_flees_or_watches() {
    let mut b = ScriptBuilder::new();
    b.module(30, "safari")
        .op(Opcode::IfRandomSafariFlee, &[Operand::label("run")])
        .watch()
        .label("run")
        .flee();
    let table = Arc::new(b.build().expect("assemble"));

    let mut snap = singles();
    snap.flags = BattleTypeFlags(BattleTypeFlags::SAFARI);
    let mut ai = BattleAi::new(table, AiConfig::default()).expect("valid config");

    snap.field.safari_escape_factor = 20;
    assert_eq!(decide(&mut ai, &snap, 4, 0).action, AiAction::Flee);
    assert_eq!(ai.thinking().ai_flags, AiFlags::SAFARI);

    snap.field.safari_escape_factor = 0;
    assert_eq!(decide(&mut ai, &snap, 4, 0).action, AiAction::Watch);
}

#[test]
fn test_singles_records_target_last_move() {
    let table = scripts(|b| {
        b.end();
    });
    let mut snap = singles();
    snap.battler_mut(BattlerId(0)).last_move = MoveId(2);

    let mut ai = BattleAi::new(table, AiConfig::default()).expect("valid config");
    let oracle = StandardOracle::new();
    let mut history = BattleHistory::new();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    ai.choose_move_or_action(&snap, &oracle, &mut history, &mut rng, USER, ALL_MOVES_MASK);

    assert!(history.used_moves(BattlerId(0)).contains(&MoveId(2)));
}

#[test]
fn test_doubles_picks_the_higher_rated_target() {
    let table = scripts(|b| {
        b.op(Opcode::IfMove, &[2u16.into(), Operand::label("bonus")])
            .goto("rate")
            .label("bonus")
            .score(1)
            .label("rate")
            .op(Opcode::IfTargetIsAlly, &[Operand::label("skip")])
            .op(
                Opcode::IfHpLessThan,
                &[AI_TARGET.into(), 50u8.into(), Operand::label("weak")],
            )
            .score(80)
            .end()
            .label("weak")
            .score(120)
            .end()
            .label("skip")
            .end();
    });
    let mut snap = doubles();
    snap.battler_mut(BattlerId(2)).hp = 40;

    let mut ai = BattleAi::new(table, AiConfig::default()).expect("valid config");
    for seed in 0..25 {
        let decision = decide(&mut ai, &snap, seed, 0);
        assert_eq!(decision.target, BattlerId(2));
        assert_eq!(decision.action, AiAction::Move { slot: 1 });
        assert_eq!(ai.target(), BattlerId(2));
    }
    assert!(ai.last_fault().is_none());
}

fn ally_script(ally_delta: i8) -> Arc<ScriptTable> {
    scripts(|b| {
        b.op(Opcode::IfTargetIsAlly, &[Operand::label("ally")])
            .score(-50)
            .end()
            .label("ally")
            .score(ally_delta)
            .end();
    })
}

#[test]
fn test_ally_below_threshold_never_targeted() {
    let mut ai = BattleAi::new(ally_script(-1), AiConfig::default()).expect("valid config");
    let snap = doubles();
    for seed in 0..40 {
        let decision = decide(&mut ai, &snap, seed, ALL_MOVES_MASK);
        assert_ne!(decision.target, USER.partner());
        assert!(decision.target == BattlerId(0) || decision.target == BattlerId(2));
    }
}

#[test]
fn test_ally_at_threshold_can_win() {
    let mut ai = BattleAi::new(ally_script(0), AiConfig::default()).expect("valid config");
    let snap = doubles();
    for seed in 0..10 {
        let decision = decide(&mut ai, &snap, seed, ALL_MOVES_MASK);
        assert_eq!(decision.target, USER.partner());
    }
}

#[test]
fn test_doubles_candidates_ignore_caller_preset_mask() {
    let table = scripts(|b| {
        b.end();
    });
    let mut ai = BattleAi::new(table, AiConfig::default()).expect("valid config");
    let snap = doubles();

    let mut ally_picks = 0;
    for seed in 0..200 {
        let decision = decide(&mut ai, &snap, seed, 0);
        assert_eq!(ai.thinking().scores, [100, 100, 0, 0]);
        if decision.target == USER.partner() {
            ally_picks += 1;
        }
    }
    // The ally sits exactly at the threshold and ties with both foes
    assert!(ally_picks > 20, "ally picked {} times", ally_picks);
}

#[test]
fn test_palace_doubles_use_palace_mask() {
    let table = scripts(|b| {
        b.end();
    });
    let mut config = AiConfig::default();
    config.modules.debug_override = Some(AiFlags(1));
    let mut ai = BattleAi::new(table, config).expect("valid config");
    let mut snap = doubles();
    snap.flags = BattleTypeFlags(
        BattleTypeFlags::TRAINER | BattleTypeFlags::DOUBLE | BattleTypeFlags::PALACE,
    );
    snap.selection.palace_move_mask = 0b0010;

    for seed in 0..20 {
        let decision = decide(&mut ai, &snap, seed, ALL_MOVES_MASK);
        assert_eq!(ai.thinking().scores, [0, 100, 0, 0]);
        assert_eq!(decision.action, AiAction::Move { slot: 1 });
    }
    assert!(ai.last_fault().is_none());
}

#[test]
fn test_fainted_battlers_are_skipped() {
    let mut ai = BattleAi::new(ally_script(-1), AiConfig::default()).expect("valid config");
    let mut snap = doubles();
    snap.battler_mut(BattlerId(2)).hp = 0;
    for seed in 0..20 {
        assert_eq!(decide(&mut ai, &snap, seed, ALL_MOVES_MASK).target, BattlerId(0));
    }
}

#[test]
fn test_setup_is_reproducible() {
    let table = scripts(|b| {
        b.score(-30).end();
    });
    let snap = doubles();
    let oracle = StandardOracle::new();
    let mut history = BattleHistory::new();
    let mut ai = BattleAi::new(table, AiConfig::default()).expect("valid config");

    ai.setup_decision_pass(&snap, &mut ChaCha8Rng::seed_from_u64(77), USER, ALL_MOVES_MASK);
    let first = ai.thinking().clone();
    let first_target = ai.target();

    let mut rng = ChaCha8Rng::seed_from_u64(5);
    ai.run_decision_pass(&snap, &oracle, &mut history, &mut rng)
        .expect("pass");
    assert_ne!(ai.thinking(), &first);

    ai.setup_decision_pass(&snap, &mut ChaCha8Rng::seed_from_u64(77), USER, ALL_MOVES_MASK);
    assert_eq!(ai.thinking(), &first);
    assert_eq!(ai.target(), first_target);
}

#[test]
fn test_script_fault_falls_back_to_first_usable_move() {
    let table = scripts(|b| {
        b.raw("broken", &[0xEE]);
    });
    let mut snap = singles();
    snap.unusable_moves[USER.index()] = 0b0001;

    let mut ai = BattleAi::new(table, AiConfig::default()).expect("valid config");
    let decision = decide(&mut ai, &snap, 3, ALL_MOVES_MASK);

    assert_eq!(decision.action, AiAction::Move { slot: 1 });
    assert_eq!(decision.target, BattlerId(0));
    assert!(ai.last_fault().is_some_and(|err| err.is_script_fault()));

    // The next clean pass clears the fault
    let table = scripts(|b| {
        b.end();
    });
    let mut ai2 = BattleAi::new(table, AiConfig::default()).expect("valid config");
    decide(&mut ai2, &snap, 3, ALL_MOVES_MASK);
    assert!(ai2.last_fault().is_none());
}

#[test]
fn test_bundled_scripts_and_snapshot() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let table = ScriptTable::load(&root.join("scripts/default.toml")).expect("manifest");
    let snap = BattleSnapshot::load(&root.join("snapshots/singles.json")).expect("snapshot");
    let config = AiConfig::load(&root.join("ai_config.toml")).expect("config");

    let mut ai = BattleAi::new(Arc::new(table), config).expect("valid config");
    let decision = decide(&mut ai, &snap, 12, ALL_MOVES_MASK);

    // Earthquake: super effective (+5) and a likely knockout (+4)
    assert_eq!(decision.action, AiAction::Move { slot: 1 });
    assert_eq!(decision.target, BattlerId(0));
    assert_eq!(ai.thinking().scores, [100, 109, 104, 0]);
    assert!(ai.last_fault().is_none());
}

proptest! {
    #[test]
    fn prop_doubles_target_is_standing_foe_or_ally(seed in any::<u64>(), hp in 0u16..=100) {
        let mut ai = BattleAi::new(ally_script(-1), AiConfig::default()).expect("valid config");
        let mut snap = doubles();
        snap.battler_mut(BattlerId(0)).hp = hp;

        let decision = decide(&mut ai, &snap, seed, ALL_MOVES_MASK);
        prop_assert_ne!(decision.target, USER);
        prop_assert!(!snap.battlers[decision.target.index()].is_fainted());
        match decision.action {
            AiAction::Move { slot } => prop_assert!(slot < MAX_MON_MOVES),
            other => prop_assert!(false, "unexpected action {:?}", other),
        }
    }
}
