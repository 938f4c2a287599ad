//! Assembly-listing backend.
//!
//! Walks the analyzed tree and renders one EVM mnemonic per line, with
//! PUSH immediates spelled as uppercase hex. Jump sites push the raw label
//! id in a single byte and a `// label {id}` marker line precedes each
//! `JUMPDEST`; label ids and byte offsets are never reconciled, so the
//! listing documents the program rather than assembling back into it.

mod emitter;

pub use emitter::emit_assembly;
