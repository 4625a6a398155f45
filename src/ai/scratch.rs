//! Working memory of one decision pass
//!
//! Everything here is owned by a single pass and zeroed at setup; nothing
//! leaks between combatants or between candidate targets.

use serde::Serialize;

use crate::ai::effectiveness::EffectivenessBucket;
use crate::core::error::{AiError, Result};
use crate::core::types::{AiFlags, MoveId, MAX_MON_MOVES};

/// The general-purpose result register
///
/// Getter opcodes write it and comparison opcodes read it back through
/// [`FuncResult::raw`]; the variant records which getter produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum FuncResult {
    #[default]
    Unset,
    Number(u32),
    Flag(bool),
    Move(MoveId),
    Effectiveness(EffectivenessBucket),
}

impl FuncResult {
    /// Integer value scripts compare against
    pub fn raw(self) -> u32 {
        match self {
            FuncResult::Unset => 0,
            FuncResult::Number(n) => n,
            FuncResult::Flag(b) => b as u32,
            FuncResult::Move(mv) => mv.0 as u32,
            FuncResult::Effectiveness(bucket) => bucket.raw(),
        }
    }

    /// Wrap a folded effectiveness value; off-bucket magnitudes stay numeric
    pub fn from_effectiveness(raw: u32) -> Self {
        EffectivenessBucket::from_raw(raw)
            .map(FuncResult::Effectiveness)
            .unwrap_or(FuncResult::Number(raw))
    }

    /// The register read as a move id, for the `*_from_result` getters
    pub fn as_move(self) -> MoveId {
        match self {
            FuncResult::Move(mv) => mv,
            other => MoveId(other.raw() as u16),
        }
    }
}

/// Where the per-module state machine is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum AiPhase {
    #[default]
    SettingUp,
    Processing,
    Finished,
    /// Module skipped entirely
    Suspended,
}

/// Action bits OR-accumulated by terminal opcodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AiActionFlags(pub u8);

impl AiActionFlags {
    pub const DONE: u8 = 1 << 0;
    pub const FLEE: u8 = 1 << 1;
    pub const WATCH: u8 = 1 << 2;
    pub const DO_NOT_ATTACK: u8 = 1 << 3;

    pub fn has(self, bits: u8) -> bool {
        self.0 & bits != 0
    }

    pub fn insert(&mut self, bits: u8) {
        self.0 |= bits;
    }

    pub fn remove(&mut self, bits: u8) {
        self.0 &= !bits;
    }
}

/// Scratch registers for the acting battler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AiThinking {
    pub scores: [i32; MAX_MON_MOVES],
    pub simulated_rng: [u8; MAX_MON_MOVES],
    pub move_considered: MoveId,
    pub func_result: FuncResult,
    /// Modules enabled for this pass
    pub ai_flags: AiFlags,
    /// Module currently running
    pub logic_id: u8,
    /// Move slot currently being scored
    pub moveset_index: usize,
    pub phase: AiPhase,
    pub action: AiActionFlags,
    pub script_ptr: usize,
}

impl AiThinking {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add `delta` to the current slot's score, flooring at zero
    pub fn add_score(&mut self, delta: i8) {
        if let Some(score) = self.scores.get_mut(self.moveset_index) {
            *score = (*score + delta as i32).max(0);
        }
    }

    pub fn current_score(&self) -> i32 {
        self.scores.get(self.moveset_index).copied().unwrap_or(0)
    }
}

/// Return addresses saved by `call`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStack {
    frames: Vec<usize>,
    capacity: usize,
}

impl CallStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Save `return_to`; `at` is the calling instruction, for diagnostics
    pub fn push(&mut self, return_to: usize, at: usize) -> Result<()> {
        if self.frames.len() >= self.capacity {
            return Err(AiError::CallStackOverflow {
                address: at,
                depth: self.frames.len(),
            });
        }
        self.frames.push(return_to);
        Ok(())
    }

    /// `None` means the module has no caller left
    pub fn pop(&mut self) -> Option<usize> {
        self.frames.pop()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
