//! Backend error type.

use crate::labels::LabelId;
use thiserror::Error;

/// Failures shared by the assembly and bytecode backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("operator `{0}` has no EVM lowering")]
    UnsupportedOperator(String),

    #[error("string literal needs {0} bytes, the EVM word limit is 32")]
    StringTooLong(usize),

    #[error("jump label {0} was referenced but never placed")]
    UnresolvedLabel(LabelId),

    /// The analyzer resolves every identifier before a backend runs, so a
    /// miss here means the caller skipped analysis.
    #[error("identifier `{0}` is missing from the symbol table")]
    UnknownIdentifier(String),
}
