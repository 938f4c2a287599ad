//! Raw-bytecode backend.
//!
//! Mirrors the assembly backend's walk over the analyzed tree, but appends
//! opcode bytes instead of mnemonic lines. Jump sites reserve a zeroed
//! one-byte immediate; after the whole program is emitted, a backpatching
//! pass overwrites every placeholder with its resolved byte offset. The
//! output is bare EVM code: no container, no header, no metadata.

mod emitter;

pub use emitter::emit_bytecode;

#[cfg(test)]
mod tests;
