mod expressions;
mod statements;

use crate::emit_bytecode;
use test_utils::analyze_source;

/// Compiles `source` through the whole pipeline.
fn bytecode(source: &str) -> Vec<u8> {
    let (program, symbols) = analyze_source(source);
    emit_bytecode(&program, &symbols).unwrap()
}

/// `PUSH32` of a value that fits one byte.
fn push32(value: u8) -> Vec<u8> {
    let mut bytes = vec![0x7F];
    bytes.extend_from_slice(&[0; 31]);
    bytes.push(value);
    bytes
}
