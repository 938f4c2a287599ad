//! Shared helpers for the backend test suites.

use mica_data::{Ast, SymbolTable};

/// Tokenizes and parses `source`, panicking on failure. Test sources are
/// expected to be valid.
pub fn parse_source(source: &str) -> Ast {
    let tokens = mica_parser::tokenize(source)
        .unwrap_or_else(|err| panic!("tokenize failed for {source:?}: {err}"));
    mica_parser::parse(&tokens).unwrap_or_else(|err| panic!("parse failed for {source:?}: {err}"))
}

/// Runs the whole front end on `source`, returning the tree together with
/// its completed symbol table.
pub fn analyze_source(source: &str) -> (Ast, SymbolTable) {
    let program = parse_source(source);
    let symbols = mica_sema::analyze(&program)
        .unwrap_or_else(|err| panic!("analysis failed for {source:?}: {err}"));
    (program, symbols)
}

/// Asserts that `actual` and `expected` listings match line for line. On a
/// mismatch, prints both listings and the first lines that differ before
/// panicking with `context`.
pub fn assert_lines_match(actual: &[String], expected: &[&str], context: &str) {
    if actual.iter().map(String::as_str).eq(expected.iter().copied()) {
        return;
    }

    eprintln!("=== expected ===");
    for line in expected {
        eprintln!("{line}");
    }
    eprintln!("=== actual ===");
    for line in actual {
        eprintln!("{line}");
    }

    eprintln!("=== first differences ===");
    for (index, (want, got)) in expected.iter().zip(actual.iter()).enumerate() {
        if want != got {
            eprintln!("line {}: - {want}", index + 1);
            eprintln!("line {}: + {got}", index + 1);
        }
    }
    if expected.len() != actual.len() {
        eprintln!("line count: expected {}, got {}", expected.len(), actual.len());
    }

    panic!("{context} mismatch");
}
