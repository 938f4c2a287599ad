//! Lexical and syntactic analysis for Mica.
//!
//! [`tokenize`] turns source text into a flat token stream; [`parse`] turns
//! that stream into a syntax tree rooted at [`mica_data::Ast::Program`].
//! Both fail fast: the first error aborts the stage.

mod lexer;
mod parser;

pub use crate::{
    lexer::{LexError, tokenize},
    parser::{ParseError, parse},
};
