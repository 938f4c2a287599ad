//! PUSH immediate encoding shared by the assembly and bytecode backends.

use crate::error::CodegenError;
use alloy_primitives::U256;
use smallvec::SmallVec;

/// Inline buffer for a PUSH immediate (at most one 32-byte word).
pub type ImmediateBytes = SmallVec<[u8; 32]>;

/// Opcode byte for `PUSHn` with an `n`-byte immediate.
pub const fn push_opcode(width: usize) -> u8 {
    0x5F + width as u8
}

/// Immediate width used when pushing a memory offset. Offsets of 2^24 and
/// above jump straight to a full word.
pub const fn immediate_width(offset: u32) -> usize {
    if offset < 1 << 8 {
        1
    } else if offset < 1 << 16 {
        2
    } else if offset < 1 << 24 {
        3
    } else {
        32
    }
}

/// Big-endian bytes of `value`, left-padded with zeros to `width`. Callers
/// derive `width` from the value's declared type or offset, so the value
/// always fits.
pub fn be_bytes(value: &U256, width: usize) -> ImmediateBytes {
    let full = value.to_be_bytes::<32>();
    ImmediateBytes::from_slice(&full[32 - width..])
}

/// UTF-8 encodes `text` right-aligned in one zero-padded 32-byte word.
pub fn string_word(text: &str) -> Result<[u8; 32], CodegenError> {
    let bytes = text.as_bytes();
    if bytes.len() > 32 {
        return Err(CodegenError::StringTooLong(bytes.len()));
    }
    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(word)
}
