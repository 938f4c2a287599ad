use crate::types::PrimitiveType;
use alloy_primitives::U256;

/// One node of the syntax tree.
///
/// Statements and expressions share a single root so every walker (the
/// analyzer and both backends) is one exhaustive `match`; adding a variant
/// makes the compiler point at every site that must handle it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// Ordered sequence of top-level statements.
    Program(Vec<Ast>),
    VariableDeclaration { ty: PrimitiveType, name: String, init: Box<Ast> },
    Assignment { name: String, value: Box<Ast> },
    IfStatement { condition: Box<Ast>, then_body: Vec<Ast>, else_body: Option<Vec<Ast>> },
    WhileStatement { condition: Box<Ast>, body: Vec<Ast> },
    /// Non-negative integer constant. Enters the tree with `bit_width` 256;
    /// a containing variable declaration rewrites the width to match the
    /// declared type so range checks use the right bound.
    NumberLiteral { value: U256, bit_width: u32 },
    /// Decoded text. The UTF-8 encoding must fit one 32-byte EVM word.
    StringLiteral(String),
    BooleanLiteral(bool),
    Identifier(String),
    BinaryExpression { op: String, left: Box<Ast>, right: Box<Ast> },
    ArrayLiteral(Vec<Ast>),
    ArrayAccess { array: Box<Ast>, index: Box<Ast> },
}
