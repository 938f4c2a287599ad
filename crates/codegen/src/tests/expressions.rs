use super::{bytecode, push32};
use crate::emit_bytecode;
use alloy_primitives::U256;
use mica_evm::CodegenError;
use test_utils::analyze_source;

#[test]
fn operands_emit_left_to_right_before_the_opcode() {
    let code = bytecode("let a = 1; let b = 2; a + b;");
    let tail = [0x60, 0x00, 0x51, 0x61, 0x01, 0x00, 0x51, 0x01];
    assert_eq!(&code[code.len() - tail.len()..], tail);
}

#[test]
fn negated_comparisons_append_iszero() {
    let code = bytecode("let a = 1; a >= a;");
    let tail = [0x60, 0x00, 0x51, 0x60, 0x00, 0x51, 0x10, 0x15];
    assert_eq!(&code[code.len() - tail.len()..], tail);
}

#[test]
fn unary_minus_subtracts_from_zero() {
    let code = bytecode("let a = 1; -a;");
    let mut tail = push32(0);
    tail.extend([0x60, 0x00, 0x51, 0x03]);
    assert_eq!(&code[code.len() - tail.len()..], tail.as_slice());
}

#[test]
fn strings_right_align_in_the_pushed_word() {
    let mut expected = vec![0x7F];
    expected.extend([0u8; 30]);
    expected.extend(*b"hi");
    expected.extend([0x60, 0x00, 0x52]);
    assert_eq!(bytecode("let s = 'hi';"), expected);
}

#[test]
fn logical_not_is_rejected_at_code_generation() {
    let (program, symbols) = analyze_source("let a = 1; !a;");
    assert_eq!(
        emit_bytecode(&program, &symbols),
        Err(CodegenError::UnsupportedOperator("!".to_owned()))
    );
}

/// Without control flow (whose assembly immediates are raw label ids, not
/// offsets), the two backends must agree on every pushed value.
#[test]
fn both_backends_push_the_same_immediates() {
    let source = "let a = 5; let b: u8 = 2; let s = 'ok'; a + b; b;";
    let (program, symbols) = analyze_source(source);

    let code = emit_bytecode(&program, &symbols).unwrap();
    let lines = mica_asm_backend::emit_assembly(&program, &symbols).unwrap();

    assert_eq!(decoded_immediates(&code), listed_immediates(&lines));
}

fn decoded_immediates(code: &[u8]) -> Vec<U256> {
    let mut values = Vec::new();
    let mut index = 0;
    while index < code.len() {
        let byte = code[index];
        index += 1;
        if (0x60..=0x7F).contains(&byte) {
            let width = (byte - 0x5F) as usize;
            values.push(U256::from_be_slice(&code[index..index + width]));
            index += width;
        }
    }
    values
}

fn listed_immediates(lines: &[String]) -> Vec<U256> {
    lines
        .iter()
        .filter_map(|line| line.strip_prefix("PUSH"))
        .filter_map(|rest| rest.split_once("0x"))
        .map(|(_, hex)| U256::from_str_radix(hex, 16).unwrap())
        .collect()
}
