//! Battle-side collaborators of the AI
//!
//! The AI reads battle state through [`BattleView`], asks [`BattleOracle`]
//! for damage and turn order, and consults [`BattleHistory`] for what it has
//! seen the opponents do. [`BattleSnapshot`] and [`StandardOracle`] are
//! self-contained implementations for the runner and tests.

pub mod constants;
pub mod history;
pub mod oracle;
pub mod snapshot;
pub mod state;

// Re-exports for convenient access
pub use history::BattleHistory;
pub use oracle::{BattleOracle, DamageOracle, StandardOracle, TurnOrder, TypeCalcOutcome};
pub use snapshot::BattleSnapshot;
pub use state::{
    BattleMon, BattleView, DisableState, FieldState, MoveInfo, PartyMon, ScriptSelection,
    SideState,
};
