//! Control flow, scoring, randomized branches and terminal actions

use crate::ai::interpreter::{branch, Flow, Vm};
use crate::ai::scratch::AiActionFlags;
use crate::ai::script::Instruction;
use crate::core::error::Result;
use crate::core::rng::random;

impl Vm<'_> {
    /// Roll a byte and compare it against the immediate
    pub(crate) fn if_random(&mut self, insn: &Instruction<'_>, pred: fn(u32, u32) -> bool) -> Flow {
        let roll = random(self.rng) as u32 % 256;
        branch(insn, pred(roll, insn.u8_at(1) as u32))
    }

    pub(crate) fn score(&mut self, insn: &Instruction<'_>) -> Flow {
        let delta = insn.u8_at(1) as i8;
        self.thinking.add_score(delta);
        tracing::trace!(
            slot = self.thinking.moveset_index,
            delta,
            score = self.thinking.current_score(),
            "AI score"
        );
        Flow::Next
    }

    pub(crate) fn call(&mut self, insn: &Instruction<'_>) -> Result<Flow> {
        self.stack.push(insn.next(), insn.address)?;
        Ok(Flow::Jump(insn.target(1)))
    }

    pub(crate) fn goto(&mut self, insn: &Instruction<'_>) -> Flow {
        Flow::Jump(insn.target(1))
    }

    /// Return to the caller, or finish the slot when nothing is on the stack
    pub(crate) fn end(&mut self) -> Flow {
        match self.stack.pop() {
            Some(return_to) => Flow::Jump(return_to),
            None => {
                self.thinking.action.insert(AiActionFlags::DONE);
                Flow::Stay
            }
        }
    }

    pub(crate) fn flee(&mut self) -> Flow {
        self.thinking.action.insert(
            AiActionFlags::DONE | AiActionFlags::FLEE | AiActionFlags::DO_NOT_ATTACK,
        );
        Flow::Stay
    }

    pub(crate) fn watch(&mut self) -> Flow {
        self.thinking.action.insert(
            AiActionFlags::DONE | AiActionFlags::WATCH | AiActionFlags::DO_NOT_ATTACK,
        );
        Flow::Stay
    }

    /// Safari encounters flee with probability `escape factor * 5` percent
    pub(crate) fn if_random_safari_flee(&mut self, insn: &Instruction<'_>) -> Flow {
        let flee_rate = self.battle.field().safari_escape_factor as u32 * 5;
        let roll = random(self.rng) as u32 % 100;
        branch(insn, roll < flee_rate)
    }
}
