//! Opcode handlers, grouped by family
//!
//! Each file adds `impl Vm<'_>` methods; the dispatch table in
//! `interpreter.rs` maps opcodes onto them.

mod compare;
mod conditions;
mod control;
mod damage;
mod info;
mod moves;
