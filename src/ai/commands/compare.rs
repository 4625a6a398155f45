//! Comparisons against the result register and the considered move

use crate::ai::interpreter::{branch, Flow, Vm};
use crate::ai::script::Instruction;
use crate::core::error::Result;

impl Vm<'_> {
    pub(crate) fn if_compare(&mut self, insn: &Instruction<'_>, pred: fn(u32, u32) -> bool) -> Flow {
        let result = self.thinking.func_result.raw();
        branch(insn, pred(result, insn.u8_at(1) as u32))
    }

    /// Compare against a byte stored elsewhere in the script
    pub(crate) fn if_compare_ptr(
        &mut self,
        insn: &Instruction<'_>,
        pred: fn(u32, u32) -> bool,
    ) -> Result<Flow> {
        let value = self.scripts.byte_at(insn.target(1))?;
        let result = self.thinking.func_result.raw();
        Ok(branch(insn, pred(result, value as u32)))
    }

    pub(crate) fn if_in_bytes(&mut self, insn: &Instruction<'_>, member: bool) -> Result<Flow> {
        let result = self.thinking.func_result.raw();
        let found = self.scripts.contains_byte(insn.target(1), result)?;
        Ok(branch(insn, found == member))
    }

    pub(crate) fn if_in_hwords(&mut self, insn: &Instruction<'_>) -> Result<Flow> {
        let result = self.thinking.func_result.raw();
        let found = self.scripts.contains_hword(insn.target(1), result)?;
        Ok(branch(insn, found))
    }

    pub(crate) fn if_move(&mut self, insn: &Instruction<'_>, is: bool) -> Flow {
        let matches = self.thinking.move_considered.0 == insn.u16_at(1);
        branch(insn, matches == is)
    }

    pub(crate) fn if_effect(&mut self, insn: &Instruction<'_>, is: bool) -> Flow {
        let matches = self.considered_move().effect == insn.u8_at(1);
        branch(insn, matches == is)
    }

    pub(crate) fn if_target(&mut self, insn: &Instruction<'_>) -> Flow {
        branch(insn, self.considered_move().target == insn.u8_at(1))
    }
}
