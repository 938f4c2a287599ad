//! Recursive-descent parser.
//!
//! A cursor over the token stream with one extra token of lookahead to
//! split assignments from expression statements. Precedence is encoded as
//! one function per level, lowest binding power first; every binary
//! operator associates to the left.

use alloy_primitives::U256;
use mica_data::{Ast, PrimitiveType, Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {}, found {}", expectation(.kind, .value.as_deref()), describe(.actual.as_ref()))]
    Expected { kind: TokenKind, value: Option<String>, actual: Option<Token> },

    #[error("unknown type name `{0}`")]
    UnknownType(String),

    #[error("unexpected token {0}")]
    UnexpectedToken(Token),

    #[error("number literal `{0}` does not fit in 256 bits")]
    NumberTooLarge(String),
}

fn expectation(kind: &TokenKind, value: Option<&str>) -> String {
    match value {
        Some(value) => format!("{kind} `{value}`"),
        None => kind.to_string(),
    }
}

fn describe(actual: Option<&Token>) -> String {
    match actual {
        Some(token) => token.to_string(),
        None => "end of input".to_owned(),
    }
}

/// Parses a scanned token stream into an [`Ast::Program`]. The first
/// mismatch aborts; there is no error recovery.
pub fn parse(tokens: &[Token]) -> Result<Ast, ParseError> {
    Parser::new(tokens).parse_program()
}

struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, position: 0 }
    }

    fn parse_program(&mut self) -> Result<Ast, ParseError> {
        let mut statements = Vec::new();
        while self.peek().is_some() {
            statements.push(self.parse_statement()?);
        }
        Ok(Ast::Program(statements))
    }

    // ===== token handling =====

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    fn peek_second(&self) -> Option<&'t Token> {
        self.tokens.get(self.position + 1)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn expect(&mut self, kind: TokenKind, value: Option<&str>) -> Result<&'t Token, ParseError> {
        match self.peek() {
            Some(token)
                if token.kind == kind && value.map_or(true, |want| token.lexeme == want) =>
            {
                self.position += 1;
                Ok(token)
            }
            other => Err(ParseError::Expected {
                kind,
                value: value.map(str::to_owned),
                actual: other.cloned(),
            }),
        }
    }

    fn expect_punctuation(&mut self, ch: char) -> Result<(), ParseError> {
        let lexeme = ch.to_string();
        self.expect(TokenKind::Punctuation, Some(&lexeme)).map(|_| ())
    }

    // ===== statements =====

    fn parse_statement(&mut self) -> Result<Ast, ParseError> {
        match self.peek() {
            Some(token) if token.is_keyword("if") => self.parse_if(),
            Some(token) if token.is_keyword("while") => self.parse_while(),
            Some(token) if token.kind == TokenKind::Keyword => self.parse_variable_declaration(),
            Some(token)
                if token.kind == TokenKind::Identifier
                    && self.peek_second().is_some_and(|next| next.is_operator("=")) =>
            {
                self.parse_assignment()
            }
            _ => {
                let expression = self.parse_expression()?;
                self.expect_punctuation(';')?;
                Ok(expression)
            }
        }
    }

    /// `let name [: type] = init ;`
    ///
    /// `let` is the only accepted introducer; `const` and `var` scan as
    /// keywords but are rejected here. Without an annotation the type is
    /// `bool` for a boolean-literal initializer and `u256` otherwise.
    fn parse_variable_declaration(&mut self) -> Result<Ast, ParseError> {
        self.expect(TokenKind::Keyword, Some("let"))?;
        let name = self.expect(TokenKind::Identifier, None)?.lexeme.clone();

        let annotation = if self.peek().is_some_and(|token| token.is_punctuation(':')) {
            self.advance();
            let type_name = self.expect(TokenKind::Identifier, None)?;
            match PrimitiveType::from_annotation(&type_name.lexeme) {
                Some(ty) => Some(ty),
                None => return Err(ParseError::UnknownType(type_name.lexeme.clone())),
            }
        } else {
            None
        };

        self.expect(TokenKind::Operator, Some("="))?;
        let mut init = self.parse_expression()?;
        self.expect_punctuation(';')?;

        let ty = annotation.unwrap_or_else(|| {
            if matches!(init, Ast::BooleanLiteral(_)) {
                PrimitiveType::Bool
            } else {
                PrimitiveType::U256
            }
        });

        // A literal initializer takes on the declared width so the range
        // check downstream uses the right bound.
        if let Ast::NumberLiteral { bit_width, .. } = &mut init {
            *bit_width = ty.bit_width();
        }

        Ok(Ast::VariableDeclaration { ty, name, init: Box::new(init) })
    }

    fn parse_assignment(&mut self) -> Result<Ast, ParseError> {
        let name = self.expect(TokenKind::Identifier, None)?.lexeme.clone();
        self.expect(TokenKind::Operator, Some("="))?;
        let value = self.parse_expression()?;
        self.expect_punctuation(';')?;
        Ok(Ast::Assignment { name, value: Box::new(value) })
    }

    fn parse_if(&mut self) -> Result<Ast, ParseError> {
        self.expect(TokenKind::Keyword, Some("if"))?;
        self.expect_punctuation('(')?;
        let condition = self.parse_expression()?;
        self.expect_punctuation(')')?;
        let then_body = self.parse_block()?;

        let else_body = if self.peek().is_some_and(|token| token.is_keyword("else")) {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Ast::IfStatement { condition: Box::new(condition), then_body, else_body })
    }

    fn parse_while(&mut self) -> Result<Ast, ParseError> {
        self.expect(TokenKind::Keyword, Some("while"))?;
        self.expect_punctuation('(')?;
        let condition = self.parse_expression()?;
        self.expect_punctuation(')')?;
        let body = self.parse_block()?;
        Ok(Ast::WhileStatement { condition: Box::new(condition), body })
    }

    fn parse_block(&mut self) -> Result<Vec<Ast>, ParseError> {
        self.expect_punctuation('{')?;
        let mut statements = Vec::new();
        while let Some(token) = self.peek() {
            if token.is_punctuation('}') {
                break;
            }
            statements.push(self.parse_statement()?);
        }
        self.expect_punctuation('}')?;
        Ok(statements)
    }

    // ===== expressions, lowest precedence first =====

    fn parse_expression(&mut self) -> Result<Ast, ParseError> {
        self.parse_logical_or()
    }

    fn parse_logical_or(&mut self) -> Result<Ast, ParseError> {
        self.parse_left_associative(&["||"], Self::parse_logical_and)
    }

    fn parse_logical_and(&mut self) -> Result<Ast, ParseError> {
        self.parse_left_associative(&["&&"], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<Ast, ParseError> {
        self.parse_left_associative(&["==", "!="], Self::parse_comparison)
    }

    fn parse_comparison(&mut self) -> Result<Ast, ParseError> {
        self.parse_left_associative(&["<", ">", "<=", ">="], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Result<Ast, ParseError> {
        self.parse_left_associative(&["+", "-"], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<Ast, ParseError> {
        self.parse_left_associative(&["*", "/"], Self::parse_unary)
    }

    fn parse_left_associative(
        &mut self,
        operators: &[&str],
        next: fn(&mut Self) -> Result<Ast, ParseError>,
    ) -> Result<Ast, ParseError> {
        let mut left = next(self)?;
        while let Some(token) = self.peek() {
            if token.kind != TokenKind::Operator || !operators.contains(&token.lexeme.as_str()) {
                break;
            }
            let op = token.lexeme.clone();
            self.advance();
            let right = next(self)?;
            left = Ast::BinaryExpression { op, left: Box::new(left), right: Box::new(right) };
        }
        Ok(left)
    }

    /// Prefix `!` and `-` bind tighter than any binary operator and nest to
    /// the right. Both desugar to a binary node with a zero left operand,
    /// which keeps the tree to a single expression shape.
    fn parse_unary(&mut self) -> Result<Ast, ParseError> {
        if let Some(token) = self.peek() {
            if token.is_operator("!") || token.is_operator("-") {
                let op = token.lexeme.clone();
                self.advance();
                let operand = self.parse_unary()?;
                return Ok(Ast::BinaryExpression {
                    op,
                    left: Box::new(Ast::NumberLiteral { value: U256::ZERO, bit_width: 256 }),
                    right: Box::new(operand),
                });
            }
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Ast, ParseError> {
        let token = match self.peek() {
            Some(token) => token,
            None => {
                return Err(ParseError::Expected {
                    kind: TokenKind::Identifier,
                    value: None,
                    actual: None,
                });
            }
        };

        match token.kind {
            TokenKind::NumberLiteral => {
                self.advance();
                let value: U256 = token
                    .lexeme
                    .parse()
                    .map_err(|_| ParseError::NumberTooLarge(token.lexeme.clone()))?;
                Ok(Ast::NumberLiteral { value, bit_width: 256 })
            }
            TokenKind::StringLiteral => {
                self.advance();
                Ok(Ast::StringLiteral(token.lexeme.clone()))
            }
            TokenKind::BooleanLiteral => {
                self.advance();
                Ok(Ast::BooleanLiteral(token.lexeme == "true"))
            }
            TokenKind::Identifier => {
                self.advance();
                let name = token.lexeme.clone();
                if self.peek().is_some_and(|next| next.is_punctuation('[')) {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect_punctuation(']')?;
                    return Ok(Ast::ArrayAccess {
                        array: Box::new(Ast::Identifier(name)),
                        index: Box::new(index),
                    });
                }
                Ok(Ast::Identifier(name))
            }
            TokenKind::Punctuation if token.is_punctuation('[') => {
                self.advance();
                let mut elements = Vec::new();
                if !self.peek().is_some_and(|next| next.is_punctuation(']')) {
                    loop {
                        elements.push(self.parse_expression()?);
                        if self.peek().is_some_and(|next| next.is_punctuation(',')) {
                            // A trailing comma fails on the next element.
                            self.advance();
                            continue;
                        }
                        break;
                    }
                }
                self.expect_punctuation(']')?;
                Ok(Ast::ArrayLiteral(elements))
            }
            TokenKind::Punctuation if token.is_punctuation('(') => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect_punctuation(')')?;
                Ok(inner)
            }
            _ => Err(ParseError::UnexpectedToken(token.clone())),
        }
    }
}
