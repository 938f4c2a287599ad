//! Jump-label management.
//!
//! Control-flow targets are identified by small integer labels handed out
//! by [`LabelAllocator`]. The bytecode backend writes zero-filled
//! placeholder immediates at jump sites, records them in a [`LabelTable`],
//! and patches them in place once every target offset is known. The
//! assembly backend only needs fresh ids; its listing never resolves them.

use crate::error::CodegenError;
use std::collections::HashMap;

/// Identifier for a jump target. Fresh per emitter run.
pub type LabelId = usize;

/// Hands out monotonically increasing label ids.
#[derive(Debug, Default)]
pub struct LabelAllocator {
    next: LabelId,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> LabelId {
        let label = self.next;
        self.next += 1;
        label
    }
}

/// A placeholder immediate awaiting its resolved target offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPush {
    /// Byte position of the immediate within the output buffer.
    pub position: usize,
    pub label: LabelId,
    /// Immediate width in bytes.
    pub size: usize,
}

/// Resolved target offsets plus the placeholders still pointing at them.
#[derive(Debug, Default)]
pub struct LabelTable {
    offsets: HashMap<LabelId, usize>,
    pending: Vec<PendingPush>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `label` to a byte offset in the output.
    pub fn record(&mut self, label: LabelId, offset: usize) {
        self.offsets.insert(label, offset);
    }

    /// Registers a placeholder immediate written at `position`.
    pub fn reserve(&mut self, position: usize, label: LabelId, size: usize) {
        self.pending.push(PendingPush { position, label, size });
    }

    pub fn offset_of(&self, label: LabelId) -> Option<usize> {
        self.offsets.get(&label).copied()
    }

    /// Overwrites every placeholder with its resolved offset, big-endian in
    /// the reserved width. Offsets wider than the reservation keep only
    /// their low bytes.
    pub fn patch(&self, code: &mut [u8]) -> Result<(), CodegenError> {
        for push in &self.pending {
            let offset = self
                .offsets
                .get(&push.label)
                .copied()
                .ok_or(CodegenError::UnresolvedLabel(push.label))?;

            let slot = &mut code[push.position..push.position + push.size];
            slot.fill(0);
            let be = (offset as u64).to_be_bytes();
            let copied = push.size.min(be.len());
            slot[push.size - copied..].copy_from_slice(&be[be.len() - copied..]);
        }
        Ok(())
    }
}
