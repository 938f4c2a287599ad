use alloy_primitives::U256;
use mica_data::{Ast, PrimitiveType, Symbol, SymbolTable, TypeInfo};
use mica_evm::{
    CodegenError, LabelAllocator, LabelId, Op, be_bytes, immediate_width, lower_operator,
    string_word,
};
use std::fmt::Write as _;

/// Renders the analyzed `program` as mnemonic lines.
pub fn emit_assembly(program: &Ast, symbols: &SymbolTable) -> Result<Vec<String>, CodegenError> {
    let mut emitter = AsmEmitter::new(symbols);
    emitter.emit_statement(program)?;
    Ok(emitter.lines)
}

struct AsmEmitter<'sym> {
    symbols: &'sym SymbolTable,
    lines: Vec<String>,
    labels: LabelAllocator,
}

impl<'sym> AsmEmitter<'sym> {
    fn new(symbols: &'sym SymbolTable) -> Self {
        Self { symbols, lines: Vec::new(), labels: LabelAllocator::new() }
    }

    // ===== line helpers =====

    fn op(&mut self, op: Op) {
        self.lines.push(op.mnemonic().to_owned());
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        let mut line = format!("PUSH{} 0x", bytes.len());
        for byte in bytes {
            write!(line, "{byte:02X}").expect("write to string failed");
        }
        self.lines.push(line);
    }

    /// Jump sites name their target by raw label id in one byte.
    fn push_label(&mut self, label: LabelId) {
        self.lines.push(format!("PUSH1 0x{label:02X}"));
    }

    /// Marker line plus the landing opcode.
    fn place_label(&mut self, label: LabelId) {
        self.lines.push(format!("// label {label}"));
        self.op(Op::Jumpdest);
    }

    /// Memory offsets use the narrowest PUSH that holds them.
    fn push_offset(&mut self, offset: u32) {
        let width = immediate_width(offset);
        let bytes = be_bytes(&U256::from(offset), width);
        self.push_bytes(&bytes);
    }

    fn symbol(&self, name: &str) -> Result<&'sym Symbol, CodegenError> {
        self.symbols.get(name).ok_or_else(|| CodegenError::UnknownIdentifier(name.to_owned()))
    }

    // ===== statements =====

    fn emit_statement(&mut self, statement: &Ast) -> Result<(), CodegenError> {
        match statement {
            Ast::Program(statements) => {
                for statement in statements {
                    self.emit_statement(statement)?;
                }
                Ok(())
            }
            Ast::VariableDeclaration { name, init, .. } => {
                self.emit_expression(init)?;
                self.store_variable(name)
            }
            Ast::Assignment { name, value } => {
                self.emit_expression(value)?;
                self.store_variable(name)
            }
            Ast::IfStatement { condition, then_body, else_body } => {
                self.emit_if(condition, then_body, else_body.as_deref())
            }
            Ast::WhileStatement { condition, body } => self.emit_while(condition, body),
            expression => self.emit_expression(expression),
        }
    }

    /// The condition value feeds `JUMPI` unchanged: a non-zero condition
    /// jumps to the else label, so the then branch runs on zero. Both
    /// backends encode the branch this way.
    fn emit_if(
        &mut self,
        condition: &Ast,
        then_body: &[Ast],
        else_body: Option<&[Ast]>,
    ) -> Result<(), CodegenError> {
        let else_label = self.labels.allocate();
        let end_label = self.labels.allocate();

        self.emit_expression(condition)?;
        self.push_label(else_label);
        self.op(Op::Jumpi);

        for statement in then_body {
            self.emit_statement(statement)?;
        }
        self.push_label(end_label);
        self.op(Op::Jump);

        self.place_label(else_label);
        for statement in else_body.into_iter().flatten() {
            self.emit_statement(statement)?;
        }
        self.place_label(end_label);
        Ok(())
    }

    fn emit_while(&mut self, condition: &Ast, body: &[Ast]) -> Result<(), CodegenError> {
        let start_label = self.labels.allocate();
        let end_label = self.labels.allocate();

        self.place_label(start_label);
        self.emit_expression(condition)?;
        self.push_label(end_label);
        self.op(Op::Jumpi);

        for statement in body {
            self.emit_statement(statement)?;
        }
        self.push_label(start_label);
        self.op(Op::Jump);

        self.place_label(end_label);
        Ok(())
    }

    /// Stores the value on top of the stack into `name`'s slot. `u8`
    /// variables store a single byte; everything else stores a full word.
    fn store_variable(&mut self, name: &str) -> Result<(), CodegenError> {
        let symbol = self.symbol(name)?;
        let offset = symbol.offset;
        let store = if matches!(symbol.ty, TypeInfo::Primitive(PrimitiveType::U8)) {
            Op::Mstore8
        } else {
            Op::Mstore
        };
        self.push_offset(offset);
        self.op(store);
        Ok(())
    }

    // ===== expressions =====

    fn emit_expression(&mut self, expression: &Ast) -> Result<(), CodegenError> {
        match expression {
            Ast::NumberLiteral { value, bit_width } => {
                let width = (*bit_width / 8) as usize;
                let bytes = be_bytes(value, width);
                self.push_bytes(&bytes);
                Ok(())
            }
            Ast::BooleanLiteral(value) => {
                self.push_bytes(&[u8::from(*value)]);
                Ok(())
            }
            Ast::StringLiteral(text) => {
                let word = string_word(text)?;
                self.push_bytes(&word);
                Ok(())
            }
            Ast::Identifier(name) => {
                let offset = self.symbol(name)?.offset;
                self.push_offset(offset);
                self.op(Op::Mload);
                Ok(())
            }
            Ast::BinaryExpression { op, left, right } => {
                self.emit_expression(left)?;
                self.emit_expression(right)?;
                for opcode in lower_operator(op)? {
                    self.op(*opcode);
                }
                Ok(())
            }
            Ast::ArrayLiteral(elements) => self.emit_array_literal(elements),
            Ast::ArrayAccess { array, index } => {
                self.emit_expression(array)?;
                self.emit_expression(index)?;
                self.push_bytes(&[0x20]);
                self.op(Op::Mul);
                self.op(Op::Add);
                self.op(Op::Mload);
                Ok(())
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

    /// Bumps the free-memory pointer at 0x40 past `count` words, keeping
    /// the allocation base on the stack, then stores each element. Every
    /// element re-duplicates the base with `DUP2` before its store.
    fn emit_array_literal(&mut self, elements: &[Ast]) -> Result<(), CodegenError> {
        let total_size = elements.len() as u32 * 32;

        self.push_bytes(&[0x40]);
        self.op(Op::Mload);
        self.op(Op::Dup1);
        self.push_bytes(&total_size.to_be_bytes()[2..]);
        self.op(Op::Add);
        self.push_bytes(&[0x40]);
        self.op(Op::Swap1);
        self.op(Op::Mstore);

        for (index, element) in elements.iter().enumerate() {
            let element_offset = index as u32 * 32;
            self.push_bytes(&element_offset.to_be_bytes()[2..]);
            self.op(Op::Add);
            self.op(Op::Dup2);
            self.emit_expression(element)?;
            self.op(Op::Swap1);
            self.op(Op::Mstore);
        }
        Ok(())
    }
}
