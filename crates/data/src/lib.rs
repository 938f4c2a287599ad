//! Shared data model for the Mica compiler.
//!
//! Every pipeline stage exchanges the types in this crate: the scanner
//! produces [`Token`]s, the parser builds an [`Ast`], and semantic analysis
//! fills a [`SymbolTable`] that both backends read through a shared
//! reference.

pub mod ast;
pub mod symbol;
pub mod token;
pub mod types;

pub use crate::{
    ast::Ast,
    symbol::{Symbol, SymbolTable},
    token::{KEYWORDS, Token, TokenKind},
    types::{PrimitiveType, TypeInfo},
};
