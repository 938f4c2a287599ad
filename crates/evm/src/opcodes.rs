//! The EVM opcode subset the backends emit.

use crate::error::CodegenError;
use std::fmt;

/// Non-PUSH opcodes. PUSH instructions carry an immediate and are encoded
/// through [`crate::encoding`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Mul,
    Sub,
    Div,
    Lt,
    Gt,
    Eq,
    IsZero,
    And,
    Or,
    Mload,
    Mstore,
    Mstore8,
    Jump,
    Jumpi,
    Jumpdest,
    Dup1,
    Dup2,
    Swap1,
}

impl Op {
    pub const fn byte(self) -> u8 {
        match self {
            Op::Add => 0x01,
            Op::Mul => 0x02,
            Op::Sub => 0x03,
            Op::Div => 0x04,
            Op::Lt => 0x10,
            Op::Gt => 0x11,
            Op::Eq => 0x14,
            Op::IsZero => 0x15,
            Op::And => 0x16,
            Op::Or => 0x17,
            Op::Mload => 0x51,
            Op::Mstore => 0x52,
            Op::Mstore8 => 0x53,
            Op::Jump => 0x56,
            Op::Jumpi => 0x57,
            Op::Jumpdest => 0x5B,
            Op::Dup1 => 0x80,
            Op::Dup2 => 0x81,
            Op::Swap1 => 0x90,
        }
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Op::Add => "ADD",
            Op::Mul => "MUL",
            Op::Sub => "SUB",
            Op::Div => "DIV",
            Op::Lt => "LT",
            Op::Gt => "GT",
            Op::Eq => "EQ",
            Op::IsZero => "ISZERO",
            Op::And => "AND",
            Op::Or => "OR",
            Op::Mload => "MLOAD",
            Op::Mstore => "MSTORE",
            Op::Mstore8 => "MSTORE8",
            Op::Jump => "JUMP",
            Op::Jumpi => "JUMPI",
            Op::Jumpdest => "JUMPDEST",
            Op::Dup1 => "DUP1",
            Op::Dup2 => "DUP2",
            Op::Swap1 => "SWAP1",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Maps a source operator to the opcode sequence that implements it on the
/// EVM stack. Negated comparisons combine the opposite comparison with
/// `ISZERO`. Operators without an entry (notably unary `!`) fail.
pub fn lower_operator(op: &str) -> Result<&'static [Op], CodegenError> {
    Ok(match op {
        "+" => &[Op::Add],
        "-" => &[Op::Sub],
        "*" => &[Op::Mul],
        "/" => &[Op::Div],
        "<" => &[Op::Lt],
        ">" => &[Op::Gt],
        "==" => &[Op::Eq],
        "!=" => &[Op::Eq, Op::IsZero],
        "<=" => &[Op::Gt, Op::IsZero],
        ">=" => &[Op::Lt, Op::IsZero],
        "&&" => &[Op::And],
        "||" => &[Op::Or],
        _ => return Err(CodegenError::UnsupportedOperator(op.to_owned())),
    })
}
