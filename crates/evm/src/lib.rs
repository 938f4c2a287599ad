//! EVM substrate for the Mica backends.
//!
//! The assembly and bytecode backends walk the same syntax tree and differ
//! only in output format. This crate holds everything they share: the
//! opcode subset they emit, PUSH immediate encoding, operator lowering, and
//! the jump-label allocation and backpatching protocol.

pub mod encoding;
pub mod error;
pub mod labels;
pub mod opcodes;

pub use crate::{
    encoding::{ImmediateBytes, be_bytes, immediate_width, push_opcode, string_word},
    error::CodegenError,
    labels::{LabelAllocator, LabelId, LabelTable, PendingPush},
    opcodes::{Op, lower_operator},
};
