//! Semantic analysis for Mica.
//!
//! One pass over the syntax tree that validates every statement and
//! expression and assigns each declared variable an offset in the flat
//! memory region. Offsets advance by the declared type's *bit* width; that
//! layout is visible in the PUSH immediates both backends emit, so it must
//! stay exactly as is.

use alloy_primitives::U256;
use mica_data::{Ast, PrimitiveType, Symbol, SymbolTable, TypeInfo};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemError {
    #[error("variable `{0}` is declared twice")]
    Redeclared(String),

    #[error("variable `{0}` is not declared")]
    Undeclared(String),

    #[error("literal {value} does not fit in {bit_width} bits")]
    LiteralOutOfRange { value: U256, bit_width: u32 },

    #[error("string literal is {0} characters long, the limit is 32")]
    StringTooLong(usize),

    #[error("cannot infer an element type for an empty array")]
    EmptyArrayType,

    #[error("array elements must all have the same type")]
    HeterogeneousArray,

    #[error("arrays cannot be reassigned")]
    ArrayAssignmentUnsupported,

    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: PrimitiveType, actual: PrimitiveType },

    #[error("cannot index into a non-array value")]
    ArrayIndexOnNonArray,
}

/// Validates `program` and returns the completed symbol table. The table is
/// read-only from here on; both backends borrow the same instance.
pub fn analyze(program: &Ast) -> Result<SymbolTable, SemError> {
    let mut analyzer = Analyzer::new();
    analyzer.analyze_statement(program)?;
    Ok(analyzer.symbols)
}

struct Analyzer {
    symbols: SymbolTable,
    next_offset: u32,
}

impl Analyzer {
    fn new() -> Self {
        Self { symbols: SymbolTable::new(), next_offset: 0 }
    }

    fn analyze_statement(&mut self, statement: &Ast) -> Result<(), SemError> {
        match statement {
            Ast::Program(statements) => {
                for statement in statements {
                    self.analyze_statement(statement)?;
                }
                Ok(())
            }
            Ast::VariableDeclaration { ty, name, init } => self.declare(*ty, name, init),
            Ast::Assignment { name, value } => self.assign(name, value),
            Ast::IfStatement { condition, then_body, else_body } => {
                self.analyze_expression(condition)?;
                for statement in then_body {
                    self.analyze_statement(statement)?;
                }
                for statement in else_body.iter().flatten() {
                    self.analyze_statement(statement)?;
                }
                Ok(())
            }
            Ast::WhileStatement { condition, body } => {
                self.analyze_expression(condition)?;
                for statement in body {
                    self.analyze_statement(statement)?;
                }
                Ok(())
            }
            expression => self.analyze_expression(expression),
        }
    }

    fn declare(&mut self, ty: PrimitiveType, name: &str, init: &Ast) -> Result<(), SemError> {
        self.analyze_expression(init)?;

        let type_info = match init {
            Ast::ArrayLiteral(elements) => {
                let Some(first) = elements.first() else {
                    return Err(SemError::EmptyArrayType);
                };
                let element_ty = self.infer(first)?;
                for element in &elements[1..] {
                    if self.infer(element)? != element_ty {
                        return Err(SemError::HeterogeneousArray);
                    }
                }
                TypeInfo::Array(Box::new(element_ty), elements.len() as u32)
            }
            _ => TypeInfo::Primitive(ty),
        };

        let offset = self.next_offset;
        let bit_width = type_info.bit_width();
        if !self.symbols.declare(name, Symbol { offset, ty: type_info }) {
            return Err(SemError::Redeclared(name.to_owned()));
        }
        self.next_offset = offset + bit_width;
        Ok(())
    }

    fn assign(&mut self, name: &str, value: &Ast) -> Result<(), SemError> {
        let Some(symbol) = self.symbols.get(name) else {
            return Err(SemError::Undeclared(name.to_owned()));
        };
        let target_ty = symbol.ty.clone();

        self.analyze_expression(value)?;
        let value_ty = self.infer(value)?;

        match (&target_ty, &value_ty) {
            (TypeInfo::Primitive(expected), TypeInfo::Primitive(actual)) => {
                if expected != actual {
                    return Err(SemError::TypeMismatch { expected: *expected, actual: *actual });
                }
                Ok(())
            }
            _ => Err(SemError::ArrayAssignmentUnsupported),
        }
    }

    fn analyze_expression(&mut self, expression: &Ast) -> Result<(), SemError> {
        match expression {
            Ast::NumberLiteral { value, bit_width } => {
                if *bit_width < 256 {
                    let max = (U256::from(1u64) << *bit_width as usize) - U256::from(1u64);
                    if *value > max {
                        return Err(SemError::LiteralOutOfRange {
                            value: *value,
                            bit_width: *bit_width,
                        });
                    }
                }
                Ok(())
            }
            Ast::StringLiteral(text) => {
                let length = text.chars().count();
                if length > 32 {
                    return Err(SemError::StringTooLong(length));
                }
                Ok(())
            }
            Ast::BooleanLiteral(_) => Ok(()),
            Ast::Identifier(name) => {
                if !self.symbols.contains(name) {
                    return Err(SemError::Undeclared(name.clone()));
                }
                Ok(())
            }
            Ast::BinaryExpression { left, right, .. } => {
                self.analyze_expression(left)?;
                self.analyze_expression(right)
            }
            Ast::ArrayLiteral(elements) => {
                for element in elements {
                    self.analyze_expression(element)?;
                }
                Ok(())
            }
            Ast::ArrayAccess { array, index } => {
                self.analyze_expression(array)?;
                self.analyze_expression(index)?;
                match self.infer(array)? {
                    TypeInfo::Array(..) => Ok(()),
                    TypeInfo::Primitive(_) => Err(SemError::ArrayIndexOnNonArray),
                }
            }
            Ast::Program(_)
            | Ast::VariableDeclaration { .. }
            | Ast::Assignment { .. }
            | Ast::IfStatement { .. }
            | Ast::WhileStatement { .. } => {
                unreachable!("statement node in expression position")
            }
        }
    }

    /// Infers the type an expression evaluates to. Binary expressions take
    /// the type of their left operand; strings evaluate to the 256-bit word
    /// holding their bytes.
    fn infer(&self, expression: &Ast) -> Result<TypeInfo, SemError> {
        match expression {
            Ast::NumberLiteral { bit_width, .. } => Ok(TypeInfo::Primitive(
                PrimitiveType::from_bit_width(*bit_width).unwrap_or(PrimitiveType::U256),
            )),
            Ast::BooleanLiteral(_) => Ok(TypeInfo::Primitive(PrimitiveType::Bool)),
            Ast::StringLiteral(_) => Ok(TypeInfo::Primitive(PrimitiveType::U256)),
            Ast::Identifier(name) => match self.symbols.get(name) {
                Some(symbol) => Ok(symbol.ty.clone()),
                None => Err(SemError::Undeclared(name.clone())),
            },
            Ast::ArrayLiteral(elements) => {
                let Some(first) = elements.first() else {
                    return Err(SemError::EmptyArrayType);
                };
                Ok(TypeInfo::Array(Box::new(self.infer(first)?), elements.len() as u32))
            }
            Ast::ArrayAccess { array, .. } => match self.infer(array)? {
                TypeInfo::Array(element, _) => Ok(*element),
                TypeInfo::Primitive(_) => Err(SemError::ArrayIndexOnNonArray),
            },
            Ast::BinaryExpression { left, .. } => self.infer(left),
            Ast::Program(_)
            | Ast::VariableDeclaration { .. }
            | Ast::Assignment { .. }
            | Ast::IfStatement { .. }
            | Ast::WhileStatement { .. } => {
                unreachable!("statement node in expression position")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_source(source: &str) -> Result<SymbolTable, SemError> {
        let tokens = mica_parser::tokenize(source).unwrap();
        analyze(&mica_parser::parse(&tokens).unwrap())
    }

    #[test]
    fn declaration_assigns_offset_zero_and_u256() {
        let symbols = analyze_source("let x = 5;").unwrap();
        let symbol = symbols.get("x").unwrap();
        assert_eq!(symbol.offset, 0);
        assert_eq!(symbol.ty, TypeInfo::Primitive(PrimitiveType::U256));
    }

    #[test]
    fn offsets_advance_by_bit_width() {
        let symbols = analyze_source("let a: u8 = 1; let b: u16 = 2; let c = 3; let d = 4;").unwrap();
        assert_eq!(symbols.get("a").unwrap().offset, 0);
        assert_eq!(symbols.get("b").unwrap().offset, 8);
        assert_eq!(symbols.get("c").unwrap().offset, 24);
        assert_eq!(symbols.get("d").unwrap().offset, 280);
    }

    #[test]
    fn offsets_are_strictly_increasing_and_unique() {
        let symbols = analyze_source("let a = 1; let b = true; let c: u32 = 7;").unwrap();
        let offsets: Vec<_> =
            symbols.iter_in_declaration_order().map(|(_, symbol)| symbol.offset).collect();
        assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn array_declarations_record_element_type_and_length() {
        let symbols = analyze_source("let arr = [1, 2, 3]; let next = 9;").unwrap();
        assert_eq!(
            symbols.get("arr").unwrap().ty,
            TypeInfo::Array(Box::new(TypeInfo::Primitive(PrimitiveType::U256)), 3)
        );
        // 3 x 256 bits.
        assert_eq!(symbols.get("next").unwrap().offset, 768);
    }

    #[test]
    fn out_of_range_literal_is_rejected_with_the_rewritten_width() {
        assert_eq!(
            analyze_source("let x: u8 = 300;"),
            Err(SemError::LiteralOutOfRange { value: U256::from(300u64), bit_width: 8 })
        );
        // 255 still fits.
        assert!(analyze_source("let x: u8 = 255;").is_ok());
        assert_eq!(
            analyze_source("let x: u16 = 65536;"),
            Err(SemError::LiteralOutOfRange { value: U256::from(65536u64), bit_width: 16 })
        );
    }

    #[test]
    fn duplicate_and_missing_declarations() {
        assert_eq!(
            analyze_source("let x = 1; let x = 2;"),
            Err(SemError::Redeclared("x".to_owned()))
        );
        assert_eq!(analyze_source("x = 1;"), Err(SemError::Undeclared("x".to_owned())));
        assert_eq!(analyze_source("y;"), Err(SemError::Undeclared("y".to_owned())));
    }

    #[test]
    fn assignments_require_matching_primitive_types() {
        assert!(analyze_source("let x: u8 = 1; x = 2;").is_err());
        assert_eq!(
            analyze_source("let x: u8 = 1; x = 2;"),
            Err(SemError::TypeMismatch {
                expected: PrimitiveType::U8,
                actual: PrimitiveType::U256,
            })
        );
        assert!(analyze_source("let x = 1; x = 2;").is_ok());
        assert!(analyze_source("let flag = true; flag = false;").is_ok());
    }

    #[test]
    fn arrays_cannot_be_assigned() {
        assert_eq!(
            analyze_source("let a = [1]; a = [2];"),
            Err(SemError::ArrayAssignmentUnsupported)
        );
        assert_eq!(
            analyze_source("let a = [1]; let x = 0; x = a;"),
            Err(SemError::ArrayAssignmentUnsupported)
        );
    }

    #[test]
    fn array_literal_validation() {
        assert_eq!(analyze_source("let a = [];"), Err(SemError::EmptyArrayType));
        assert_eq!(analyze_source("let a = [1, true];"), Err(SemError::HeterogeneousArray));
        // Strings infer as u256 words, so they mix with numbers.
        assert!(analyze_source("let a = [1, \"x\"];").is_ok());
    }

    #[test]
    fn indexing_requires_an_array() {
        assert!(analyze_source("let a = [1, 2]; let x = a[1];").is_ok());
        assert_eq!(
            analyze_source("let x = 1; let y = x[0];"),
            Err(SemError::ArrayIndexOnNonArray)
        );
    }

    #[test]
    fn string_literals_are_limited_to_32_characters() {
        assert!(analyze_source(&format!("let s = \"{}\";", "a".repeat(32))).is_ok());
        assert_eq!(
            analyze_source(&format!("let s = \"{}\";", "a".repeat(33))),
            Err(SemError::StringTooLong(33))
        );
        // The analyzer counts characters, not bytes; 13 three-byte
        // characters pass here and only fail at code generation.
        assert!(analyze_source(&format!("let s = \"{}\";", "あ".repeat(13))).is_ok());
    }

    #[test]
    fn control_flow_bodies_are_analyzed() {
        assert_eq!(
            analyze_source("let a = 1; if (a) { b = 2; }"),
            Err(SemError::Undeclared("b".to_owned()))
        );
        assert_eq!(
            analyze_source("let a = 1; if (a) { } else { c; }"),
            Err(SemError::Undeclared("c".to_owned()))
        );
        assert_eq!(
            analyze_source("while (1) { d = 1; }"),
            Err(SemError::Undeclared("d".to_owned()))
        );
        assert!(analyze_source("let i = 0; while (i < 3) { i = i + 1; }").is_ok());
    }

    #[test]
    fn declarations_inside_blocks_share_the_flat_region() {
        let symbols = analyze_source("let a = 1; if (a) { let b = 2; }").unwrap();
        assert_eq!(symbols.get("b").unwrap().offset, 256);
    }
}
