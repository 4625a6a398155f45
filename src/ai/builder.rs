//! Programmatic assembler for AI scripts
//!
//! Emits the same byte layout the interpreter decodes: opcode byte, then
//! little-endian operands, with branch targets as 4-byte absolute offsets.
//! Labels may be referenced before they are defined; they are patched in
//! [`ScriptBuilder::build`].
//!
//! ```ignore
//! let mut b = ScriptBuilder::new();
//! b.module(0, "check_bad_move")
//!     .op(Opcode::IfHpLessThan, &[AI_TARGET.into(), 50u8.into(), Operand::label("low")])
//!     .end()
//!     .label("low")
//!     .score(-10)
//!     .end();
//! let table = b.build()?;
//! ```

use ahash::AHashMap;

use crate::ai::opcode::Opcode;
use crate::ai::script::{ScriptTable, ADDRESS_LEN, BYTE_LIST_END, HWORD_LIST_END};
use crate::core::error::{AiError, Result};

/// One encoded operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    U8(u8),
    U16(u16),
    U32(u32),
    /// Absolute address of a label, 4 bytes
    Label(String),
}

impl Operand {
    pub fn label(name: &str) -> Self {
        Operand::Label(name.to_string())
    }

    fn encoded_len(&self) -> usize {
        match self {
            Operand::U8(_) => 1,
            Operand::U16(_) => 2,
            Operand::U32(_) => 4,
            Operand::Label(_) => ADDRESS_LEN,
        }
    }
}

impl From<u8> for Operand {
    fn from(value: u8) -> Self {
        Operand::U8(value)
    }
}

impl From<i8> for Operand {
    fn from(value: i8) -> Self {
        Operand::U8(value as u8)
    }
}

impl From<u16> for Operand {
    fn from(value: u16) -> Self {
        Operand::U16(value)
    }
}

impl From<u32> for Operand {
    fn from(value: u32) -> Self {
        Operand::U32(value)
    }
}

#[derive(Debug, Default)]
pub struct ScriptBuilder {
    code: Vec<u8>,
    labels: AHashMap<String, usize>,
    /// (offset of the 4-byte hole, label it refers to)
    fixups: Vec<(usize, String)>,
    modules: Vec<(u8, String, usize)>,
    /// First problem seen while emitting; reported by `build`
    error: Option<String>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset the next emitted byte will land at
    pub fn position(&self) -> usize {
        self.code.len()
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(message);
        }
    }

    /// Mark the current position as the entry point of a logic module
    pub fn module(&mut self, id: u8, name: &str) -> &mut Self {
        let at = self.position();
        self.modules.push((id, name.to_string(), at));
        self.label(name)
    }

    pub fn label(&mut self, name: &str) -> &mut Self {
        let at = self.position();
        if self.labels.insert(name.to_string(), at).is_some() {
            self.fail(format!("label '{}' defined twice", name));
        }
        self
    }

    /// Emit one instruction; the operand bytes must add up to the opcode's length
    pub fn op(&mut self, opcode: Opcode, operands: &[Operand]) -> &mut Self {
        let encoded: usize = 1 + operands.iter().map(Operand::encoded_len).sum::<usize>();
        if encoded != opcode.len() {
            self.fail(format!(
                "{} at {:#06x} encodes to {} bytes, expected {}",
                opcode,
                self.position(),
                encoded,
                opcode.len()
            ));
            return self;
        }

        self.code.push(opcode.byte());
        for operand in operands {
            match operand {
                Operand::U8(value) => self.code.push(*value),
                Operand::U16(value) => self.code.extend_from_slice(&value.to_le_bytes()),
                Operand::U32(value) => self.code.extend_from_slice(&value.to_le_bytes()),
                Operand::Label(name) => {
                    self.fixups.push((self.code.len(), name.clone()));
                    self.code.extend_from_slice(&[0; ADDRESS_LEN]);
                }
            }
        }
        self
    }

    pub fn score(&mut self, delta: i8) -> &mut Self {
        self.op(Opcode::Score, &[delta.into()])
    }

    pub fn goto(&mut self, label: &str) -> &mut Self {
        self.op(Opcode::Goto, &[Operand::label(label)])
    }

    pub fn call(&mut self, label: &str) -> &mut Self {
        self.op(Opcode::Call, &[Operand::label(label)])
    }

    pub fn end(&mut self) -> &mut Self {
        self.op(Opcode::End, &[])
    }

    pub fn flee(&mut self) -> &mut Self {
        self.op(Opcode::Flee, &[])
    }

    pub fn watch(&mut self) -> &mut Self {
        self.op(Opcode::Watch, &[])
    }

    /// Labelled `0xFF`-terminated byte list
    pub fn byte_list(&mut self, name: &str, values: &[u8]) -> &mut Self {
        self.label(name);
        if values.contains(&BYTE_LIST_END) {
            self.fail(format!("byte list '{}' contains the terminator", name));
        }
        self.code.extend_from_slice(values);
        self.code.push(BYTE_LIST_END);
        self
    }

    /// Labelled `0xFFFF`-terminated halfword list
    pub fn hword_list(&mut self, name: &str, values: &[u16]) -> &mut Self {
        self.label(name);
        if values.contains(&HWORD_LIST_END) {
            self.fail(format!("halfword list '{}' contains the terminator", name));
        }
        for value in values {
            self.code.extend_from_slice(&value.to_le_bytes());
        }
        self.code.extend_from_slice(&HWORD_LIST_END.to_le_bytes());
        self
    }

    /// Raw bytes, e.g. a single value read by a `*_ptr` comparison
    pub fn raw(&mut self, name: &str, bytes: &[u8]) -> &mut Self {
        self.label(name);
        self.code.extend_from_slice(bytes);
        self
    }

    /// Resolve labels and produce the table
    pub fn build(&self) -> Result<ScriptTable> {
        if let Some(message) = &self.error {
            return Err(AiError::InvalidScript(message.clone()));
        }

        let mut code = self.code.clone();
        for (at, name) in &self.fixups {
            let address = self
                .labels
                .get(name)
                .ok_or_else(|| AiError::InvalidScript(format!("undefined label '{}'", name)))?;
            let address = u32::try_from(*address).map_err(|_| {
                AiError::InvalidScript(format!("label '{}' is beyond a 32-bit offset", name))
            })?;
            code[*at..*at + ADDRESS_LEN].copy_from_slice(&address.to_le_bytes());
        }

        let entries = self.modules.iter().map(|(id, _, at)| (*id, *at));
        let table = ScriptTable::new(code, entries)?;
        tracing::debug!(
            bytes = table.len(),
            modules = table.module_count(),
            "Assembled AI script"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::constants::AI_TARGET;

    #[test]
    fn test_forward_label_is_patched() {
        let mut b = ScriptBuilder::new();
        b.module(0, "main")
            .op(
                Opcode::IfHpLessThan,
                &[AI_TARGET.into(), 50u8.into(), Operand::label("low")],
            )
            .end()
            .label("low")
            .score(-10)
            .end();
        let table = b.build().expect("Should assemble");

        let insn = table.decode(0).expect("decode");
        assert_eq!(insn.opcode, Opcode::IfHpLessThan);
        assert_eq!(insn.branch_target(), 8);
        assert_eq!(table.decode(8).expect("decode").opcode, Opcode::Score);
        assert_eq!(table.entry(0).expect("entry"), 0);
    }

    #[test]
    fn test_wrong_operand_width_is_rejected() {
        let mut b = ScriptBuilder::new();
        b.module(0, "main").op(Opcode::Score, &[1u16.into()]);
        assert!(matches!(b.build(), Err(AiError::InvalidScript(_))));
    }

    #[test]
    fn test_undefined_label_is_rejected() {
        let mut b = ScriptBuilder::new();
        b.module(0, "main").goto("nowhere");
        let err = b.build().unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_lists_are_terminated() {
        let mut b = ScriptBuilder::new();
        b.module(0, "main")
            .end()
            .byte_list("types", &[10, 11])
            .hword_list("moves", &[300]);
        let table = b.build().expect("Should assemble");
        assert_eq!(&table.code()[1..4], &[10, 11, 0xFF]);
        assert_eq!(&table.code()[4..8], &[0x2C, 0x01, 0xFF, 0xFF]);
    }
}
