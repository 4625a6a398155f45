//! Per-module state machine
//!
//! A module runs once per move slot: `SettingUp` points the interpreter at
//! the module entry and picks the move under evaluation, `Processing` steps
//! until the script marks the slot done. `DO_NOT_ATTACK` (flee/watch) cuts
//! the remaining slots short. The call stack is only cleared by pass setup,
//! so frames left behind by a flee or watch survive into later modules.

use crate::ai::interpreter::Vm;
use crate::ai::scratch::{AiActionFlags, AiPhase};
use crate::core::error::Result;
use crate::core::types::{AiFlags, MoveId, MAX_MON_MOVES};

impl Vm<'_> {
    /// Rewind the state machine to slot 0 of `module`
    pub fn start_module(&mut self, module: u8) {
        self.thinking.logic_id = module;
        self.thinking.moveset_index = 0;
        self.thinking.phase = AiPhase::SettingUp;
    }

    /// Drive the current module until it finishes
    pub fn run_module(&mut self) -> Result<()> {
        if self.thinking.phase == AiPhase::Suspended {
            return Ok(());
        }

        let module = self.thinking.logic_id;
        tracing::debug!(
            module,
            name = self.scripts.module_name(module).unwrap_or(""),
            battler = self.battler_ai.0,
            target = self.target.0,
            "AI module start"
        );

        loop {
            match self.thinking.phase {
                AiPhase::SettingUp => self.set_up_slot()?,
                AiPhase::Processing => self.process_slot()?,
                AiPhase::Finished | AiPhase::Suspended => break,
            }
        }

        tracing::debug!(module, scores = ?self.thinking.scores, "AI module finished");
        Ok(())
    }

    /// Every enabled module in ascending id order
    pub fn run_modules(&mut self, flags: AiFlags) -> Result<()> {
        for module in flags.modules() {
            self.start_module(module);
            self.run_module()?;
        }
        Ok(())
    }

    fn set_up_slot(&mut self) -> Result<()> {
        self.thinking.script_ptr = self.scripts.entry(self.thinking.logic_id)?;

        let slot = self.thinking.moveset_index;
        let mon = self.ai_mon();
        let has_pp = mon.pp.get(slot).is_some_and(|&pp| pp != 0);
        self.thinking.move_considered = if has_pp {
            mon.moves.get(slot).copied().unwrap_or(MoveId::NONE)
        } else {
            MoveId::NONE
        };

        self.thinking.phase = AiPhase::Processing;
        Ok(())
    }

    fn process_slot(&mut self) -> Result<()> {
        if self.thinking.move_considered.is_none() {
            if let Some(score) = self.thinking.scores.get_mut(self.thinking.moveset_index) {
                *score = 0;
            }
            self.thinking.action.insert(AiActionFlags::DONE);
        } else {
            self.step()?;
        }

        if self.thinking.action.has(AiActionFlags::DONE) {
            self.thinking.moveset_index += 1;
            let more_slots = self.thinking.moveset_index < MAX_MON_MOVES;
            self.thinking.phase =
                if more_slots && !self.thinking.action.has(AiActionFlags::DO_NOT_ATTACK) {
                    AiPhase::SettingUp
                } else {
                    AiPhase::Finished
                };
            self.thinking.action.remove(AiActionFlags::DONE);
        }
        Ok(())
    }
}
