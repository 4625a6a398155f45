//! Bytecode-scripted move and target selection
//!
//! - [`script`] / [`opcode`]: the read-only script table and its encoding
//! - [`interpreter`] plus `commands`: one-instruction execution
//! - [`driver`]: per-module, per-slot state machine
//! - [`orchestrator`]: setup, module runs and the final choice

pub mod builder;
mod commands;
pub mod driver;
pub mod effectiveness;
pub mod interpreter;
pub mod opcode;
pub mod orchestrator;
pub mod scratch;
pub mod script;
pub mod selection;

pub use builder::{Operand, ScriptBuilder};
pub use effectiveness::EffectivenessBucket;
pub use interpreter::{Vm, VmContext};
pub use opcode::Opcode;
pub use orchestrator::{AiAction, AiDecision, BattleAi, ALL_MOVES_MASK, NO_SCORE};
pub use scratch::{AiActionFlags, AiPhase, AiThinking, CallStack, FuncResult};
pub use script::{Instruction, ScriptTable};
