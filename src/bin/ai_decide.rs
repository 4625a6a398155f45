//! Headless AI Decision Runner
//!
//! Loads a script manifest and a battle snapshot, runs one decision pass for
//! the chosen battler and prints the result as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use battle_ai_vm::ai::{AiDecision, BattleAi, ScriptTable, ALL_MOVES_MASK};
use battle_ai_vm::battle::{BattleHistory, BattleSnapshot, BattleView, StandardOracle};
use battle_ai_vm::core::types::BattlerId;
use battle_ai_vm::core::AiConfig;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Run the battle AI for one battler and report its choice
#[derive(Parser, Debug)]
#[command(name = "ai_decide")]
#[command(about = "Run one AI decision pass against a battle snapshot")]
struct Args {
    /// Script manifest (TOML naming the bytecode file and module entries)
    #[arg(long)]
    scripts: PathBuf,

    /// Battle snapshot (JSON)
    #[arg(long)]
    snapshot: PathBuf,

    /// Acting battler position (0-3)
    #[arg(long, default_value_t = 1)]
    battler: u8,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Engine config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Move slots pre-seeded with the preset score, one bit per slot
    #[arg(long, default_value_t = ALL_MOVES_MASK)]
    preset: u8,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct DecisionReport {
    battler: BattlerId,
    seed: u64,
    decision: AiDecision,
    scores: [i32; 4],
    modules: u32,
    fault: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("battle_ai_vm=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AiConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error: failed to load config {:?}: {}", path, e);
            std::process::exit(1);
        }),
        None => AiConfig::default(),
    };

    let scripts = ScriptTable::load(&args.scripts).unwrap_or_else(|e| {
        eprintln!("Error: failed to load scripts {:?}: {}", args.scripts, e);
        std::process::exit(1);
    });

    let snapshot = BattleSnapshot::load(&args.snapshot).unwrap_or_else(|e| {
        eprintln!("Error: failed to load snapshot {:?}: {}", args.snapshot, e);
        std::process::exit(1);
    });

    if args.battler > 3 {
        eprintln!("Error: battler must be 0-3, got {}", args.battler);
        std::process::exit(2);
    }
    let battler = BattlerId::new(args.battler);

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut history = BattleHistory::new();
    history.prepare_for_battle(
        snapshot.battle_flags(),
        &snapshot.script_selection().trainer_items,
    );

    let oracle = StandardOracle::new();
    let mut ai = BattleAi::new(Arc::new(scripts), config).unwrap_or_else(|e| {
        eprintln!("Error: invalid config: {}", e);
        std::process::exit(1);
    });
    let decision = ai.choose_move_or_action(
        &snapshot,
        &oracle,
        &mut history,
        &mut rng,
        battler,
        args.preset,
    );

    tracing::info!(
        battler = battler.0,
        action = ?decision.action,
        target = decision.target.0,
        "Decision made"
    );

    let report = DecisionReport {
        battler,
        seed,
        decision,
        scores: ai.thinking().scores,
        modules: ai.thinking().ai_flags.0,
        fault: ai.last_fault().map(|e| e.to_string()),
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: failed to serialize report: {}", e);
            std::process::exit(1);
        }
    }
}
