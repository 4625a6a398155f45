//! Read-only script bytecode and a bounds-checked instruction view
//!
//! A [`ScriptTable`] is loaded once and shared (usually behind an `Arc`)
//! by every decision pass. All reads go through [`ScriptTable::decode`] or
//! the inline-list helpers, so a corrupt offset surfaces as
//! [`AiError::ScriptOutOfBounds`] instead of reading past the buffer.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::ai::opcode::Opcode;
use crate::core::error::{AiError, Result};

/// Module ids are bit positions in a 32-bit set
pub const MAX_MODULES: usize = 32;

/// Terminator of an inline byte list
pub const BYTE_LIST_END: u8 = 0xFF;

/// Terminator of an inline halfword list
pub const HWORD_LIST_END: u16 = 0xFFFF;

/// Width of an encoded absolute address
pub const ADDRESS_LEN: usize = 4;

/// One decoded instruction borrowed from the script buffer
#[derive(Debug, Clone, Copy)]
pub struct Instruction<'a> {
    pub address: usize,
    pub opcode: Opcode,
    /// Exactly `opcode.len()` bytes, opcode byte first
    bytes: &'a [u8],
}

impl<'a> Instruction<'a> {
    pub fn u8_at(&self, offset: usize) -> u8 {
        self.bytes.get(offset).copied().unwrap_or(0)
    }

    pub fn u16_at(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.u8_at(offset), self.u8_at(offset + 1)])
    }

    pub fn u32_at(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.u8_at(offset),
            self.u8_at(offset + 1),
            self.u8_at(offset + 2),
            self.u8_at(offset + 3),
        ])
    }

    /// Absolute script address stored at `offset`
    pub fn target(&self, offset: usize) -> usize {
        self.u32_at(offset) as usize
    }

    /// Branch target of a conditional, always its last four bytes
    pub fn branch_target(&self) -> usize {
        self.target(self.opcode.len() - ADDRESS_LEN)
    }

    /// Address of the following instruction
    pub fn next(&self) -> usize {
        self.address + self.opcode.len()
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

#[derive(Debug, Clone)]
pub struct ScriptTable {
    code: Vec<u8>,
    entries: [Option<usize>; MAX_MODULES],
    names: [Option<String>; MAX_MODULES],
}

impl ScriptTable {
    /// Build a table from raw bytecode and `(module id, entry offset)` pairs
    pub fn new(code: Vec<u8>, entries: impl IntoIterator<Item = (u8, usize)>) -> Result<Self> {
        let mut table = Self {
            code,
            entries: [None; MAX_MODULES],
            names: Default::default(),
        };
        for (module, entry) in entries {
            table.set_entry(module, entry, None)?;
        }
        Ok(table)
    }

    fn set_entry(&mut self, module: u8, entry: usize, name: Option<String>) -> Result<()> {
        let slot = module as usize;
        if slot >= MAX_MODULES {
            return Err(AiError::InvalidScript(format!(
                "module id {} exceeds {}",
                module,
                MAX_MODULES - 1
            )));
        }
        if entry >= self.code.len() {
            return Err(AiError::InvalidScript(format!(
                "entry {:#06x} for module {} is past the end of the script ({} bytes)",
                entry,
                module,
                self.code.len()
            )));
        }
        if self.entries[slot].is_some() {
            return Err(AiError::InvalidScript(format!(
                "module {} declared twice",
                module
            )));
        }
        self.entries[slot] = Some(entry);
        self.names[slot] = name;
        Ok(())
    }

    /// Load a TOML manifest naming a bytecode file and its module entry points
    pub fn load(manifest_path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(manifest_path)?;
        let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
        let table = Self::from_manifest_str(&contents, base)?;
        tracing::debug!(
            bytes = table.len(),
            modules = table.module_count(),
            "Loaded AI scripts from {:?}",
            manifest_path
        );
        Ok(table)
    }

    /// Parse a manifest; the bytecode path is resolved against `base_dir`
    pub fn from_manifest_str(contents: &str, base_dir: &Path) -> Result<Self> {
        let manifest: ScriptManifest = toml::from_str(contents)?;
        let code = fs::read(base_dir.join(&manifest.bytecode))?;
        let mut table = Self::new(code, std::iter::empty())?;
        for module in manifest.module {
            table.set_entry(module.id, module.entry, Some(module.name))?;
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn module_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Entry address of a logic module
    pub fn entry(&self, module: u8) -> Result<usize> {
        self.entries
            .get(module as usize)
            .copied()
            .flatten()
            .ok_or(AiError::UnknownModule(module))
    }

    pub fn module_name(&self, module: u8) -> Option<&str> {
        self.names.get(module as usize)?.as_deref()
    }

    /// Decode the instruction at `address`
    pub fn decode(&self, address: usize) -> Result<Instruction<'_>> {
        let byte = self.byte_at(address)?;
        let opcode =
            Opcode::try_from(byte).map_err(|opcode| AiError::UnknownOpcode { opcode, address })?;
        let bytes = self
            .code
            .get(address..address + opcode.len())
            .ok_or(AiError::ScriptOutOfBounds {
                address,
                len: opcode.len(),
            })?;
        Ok(Instruction {
            address,
            opcode,
            bytes,
        })
    }

    pub fn byte_at(&self, address: usize) -> Result<u8> {
        self.code
            .get(address)
            .copied()
            .ok_or(AiError::ScriptOutOfBounds { address, len: 1 })
    }

    fn hword_at(&self, address: usize) -> Result<u16> {
        let bytes = self
            .code
            .get(address..address + 2)
            .ok_or(AiError::ScriptOutOfBounds { address, len: 2 })?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Scan a `0xFF`-terminated byte list at `address` for `value`
    pub fn contains_byte(&self, address: usize, value: u32) -> Result<bool> {
        let mut cursor = address;
        loop {
            let entry = self.byte_at(cursor)?;
            if entry == BYTE_LIST_END {
                return Ok(false);
            }
            if value == entry as u32 {
                return Ok(true);
            }
            cursor += 1;
        }
    }

    /// Scan a `0xFFFF`-terminated halfword list at `address` for `value`
    pub fn contains_hword(&self, address: usize, value: u32) -> Result<bool> {
        let mut cursor = address;
        loop {
            let entry = self.hword_at(cursor)?;
            if entry == HWORD_LIST_END {
                return Ok(false);
            }
            if value == entry as u32 {
                return Ok(true);
            }
            cursor += 2;
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScriptManifest {
    bytecode: String,
    #[serde(default)]
    module: Vec<ManifestModule>,
}

#[derive(Debug, Deserialize)]
struct ManifestModule {
    id: u8,
    #[serde(default)]
    name: String,
    entry: usize,
}
