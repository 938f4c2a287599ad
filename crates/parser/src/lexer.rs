//! Lexical analysis.
//!
//! A single pass over the source text with a byte cursor. Whitespace is
//! skipped, string escapes are decoded in place, and maximal-munch runs
//! form identifiers, numbers and multi-character operators.

use mica_data::{KEYWORDS, Token, TokenKind};
use std::{iter::Peekable, str::CharIndices};
use thiserror::Error;

/// Characters that start or extend an operator token.
const OPERATOR_CHARS: &[char] = &['+', '-', '*', '/', '=', '>', '<', '!', '&', '|'];

/// Single-character punctuation tokens.
const PUNCTUATION_CHARS: &[char] = &[';', ':', '(', ')', '{', '}', '[', ']', ','];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("string literal is missing its closing quote")]
    UnterminatedString,

    #[error("unknown character `{ch}` at byte {position}")]
    UnknownChar { ch: char, position: usize },
}

type Cursor<'src> = Peekable<CharIndices<'src>>;

/// Scans `source` into a fully materialized token stream.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut cursor: Cursor<'_> = source.char_indices().peekable();

    while let Some(&(position, ch)) = cursor.peek() {
        if ch.is_whitespace() {
            cursor.next();
        } else if ch == '"' || ch == '\'' {
            cursor.next();
            tokens.push(scan_string(&mut cursor, ch)?);
        } else if ch.is_alphabetic() {
            tokens.push(scan_word(&mut cursor));
        } else if ch.is_ascii_digit() {
            tokens.push(scan_number(&mut cursor));
        } else if OPERATOR_CHARS.contains(&ch) {
            tokens.push(scan_operator(&mut cursor));
        } else if PUNCTUATION_CHARS.contains(&ch) {
            cursor.next();
            tokens.push(Token::new(TokenKind::Punctuation, ch.to_string()));
        } else {
            return Err(LexError::UnknownChar { ch, position });
        }
    }

    Ok(tokens)
}

/// Consumes up to the quote that matches `quote`, decoding escapes. A
/// backslash passes the following character through verbatim, whatever it
/// is, so `\"`, `\'` and `\\` all work without a dedicated escape table.
fn scan_string(cursor: &mut Cursor<'_>, quote: char) -> Result<Token, LexError> {
    let mut text = String::new();
    loop {
        match cursor.next() {
            Some((_, ch)) if ch == quote => return Ok(Token::new(TokenKind::StringLiteral, text)),
            Some((_, '\\')) => match cursor.next() {
                Some((_, escaped)) => text.push(escaped),
                None => return Err(LexError::UnterminatedString),
            },
            Some((_, ch)) => text.push(ch),
            None => return Err(LexError::UnterminatedString),
        }
    }
}

fn scan_word(cursor: &mut Cursor<'_>) -> Token {
    let word = take_while(cursor, char::is_alphanumeric);
    if word == "true" || word == "false" {
        Token::new(TokenKind::BooleanLiteral, word)
    } else if KEYWORDS.contains(&word.as_str()) {
        Token::new(TokenKind::Keyword, word)
    } else {
        Token::new(TokenKind::Identifier, word)
    }
}

fn scan_number(cursor: &mut Cursor<'_>) -> Token {
    Token::new(TokenKind::NumberLiteral, take_while(cursor, |ch| ch.is_ascii_digit()))
}

fn scan_operator(cursor: &mut Cursor<'_>) -> Token {
    Token::new(TokenKind::Operator, take_while(cursor, |ch| OPERATOR_CHARS.contains(&ch)))
}

fn take_while(cursor: &mut Cursor<'_>, keep: impl Fn(char) -> bool) -> String {
    let mut run = String::new();
    while let Some(&(_, ch)) = cursor.peek() {
        if !keep(ch) {
            break;
        }
        run.push(ch);
        cursor.next();
    }
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds_and_lexemes(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| (token.kind, token.lexeme))
            .collect()
    }

    #[test]
    fn declaration_token_stream() {
        use TokenKind::*;
        assert_eq!(
            kinds_and_lexemes("let x = 5;"),
            [
                (Keyword, "let".to_owned()),
                (Identifier, "x".to_owned()),
                (Operator, "=".to_owned()),
                (NumberLiteral, "5".to_owned()),
                (Punctuation, ";".to_owned()),
            ]
        );
    }

    #[test]
    fn multi_character_operators_form_single_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds_and_lexemes("a<=b == c && d"),
            [
                (Identifier, "a".to_owned()),
                (Operator, "<=".to_owned()),
                (Identifier, "b".to_owned()),
                (Operator, "==".to_owned()),
                (Identifier, "c".to_owned()),
                (Operator, "&&".to_owned()),
                (Identifier, "d".to_owned()),
            ]
        );
    }

    #[test]
    fn adjacent_operator_characters_merge_greedily() {
        // Maximal munch: `=-` scans as one operator, not `=` then `-`.
        assert_eq!(kinds_and_lexemes("x =- 1")[1], (TokenKind::Operator, "=-".to_owned()));
    }

    #[test]
    fn keywords_booleans_and_identifiers_split_correctly() {
        use TokenKind::*;
        assert_eq!(
            kinds_and_lexemes("const truth = true;"),
            [
                (Keyword, "const".to_owned()),
                (Identifier, "truth".to_owned()),
                (Operator, "=".to_owned()),
                (BooleanLiteral, "true".to_owned()),
                (Punctuation, ";".to_owned()),
            ]
        );
    }

    #[test]
    fn string_escapes_pass_characters_through() {
        assert_eq!(
            kinds_and_lexemes(r#""Esc\"aped""#),
            [(TokenKind::StringLiteral, "Esc\"aped".to_owned())]
        );
        assert_eq!(kinds_and_lexemes(r#""a\\b""#), [(TokenKind::StringLiteral, "a\\b".to_owned())]);
        // Unknown escapes yield the escaped character itself.
        assert_eq!(kinds_and_lexemes(r#""a\zb""#), [(TokenKind::StringLiteral, "azb".to_owned())]);
    }

    #[test]
    fn single_quoted_strings_work_too() {
        assert_eq!(kinds_and_lexemes("'it''s'"), [
            (TokenKind::StringLiteral, "it".to_owned()),
            (TokenKind::StringLiteral, "s".to_owned()),
        ]);
    }

    #[test]
    fn unterminated_strings_fail() {
        assert_eq!(tokenize("\"abc"), Err(LexError::UnterminatedString));
        assert_eq!(tokenize("\"abc\\"), Err(LexError::UnterminatedString));
    }

    #[test]
    fn unknown_characters_report_their_byte_position() {
        assert_eq!(tokenize("let x_y = 1;"), Err(LexError::UnknownChar { ch: '_', position: 5 }));
        assert_eq!(tokenize("a # b"), Err(LexError::UnknownChar { ch: '#', position: 2 }));
    }

    #[test]
    fn unicode_whitespace_is_skipped() {
        assert_eq!(
            kinds_and_lexemes("a\u{00A0}\t\n b"),
            [
                (TokenKind::Identifier, "a".to_owned()),
                (TokenKind::Identifier, "b".to_owned()),
            ]
        );
    }

    fn loose_token() -> impl Strategy<Value = (TokenKind, String)> {
        prop_oneof![
            "[a-z][a-z0-9]{0,6}"
                .prop_filter("not a word literal", |w| {
                    !KEYWORDS.contains(&w.as_str()) && w != "true" && w != "false"
                })
                .prop_map(|w| (TokenKind::Identifier, w)),
            "[0-9]{1,30}".prop_map(|n| (TokenKind::NumberLiteral, n)),
            prop::sample::select(vec![
                "+", "-", "*", "/", "<", ">", "<=", ">=", "==", "!=", "&&", "||", "=", "!",
            ])
            .prop_map(|op| (TokenKind::Operator, op.to_owned())),
            prop::sample::select(vec![";", ":", "(", ")", "{", "}", "[", "]", ","])
                .prop_map(|p| (TokenKind::Punctuation, p.to_owned())),
        ]
    }

    proptest! {
        /// Space-separated lexemes scan back to the exact same stream.
        #[test]
        fn space_joined_lexemes_round_trip(stream in prop::collection::vec(loose_token(), 0..32)) {
            let source =
                stream.iter().map(|(_, lexeme)| lexeme.as_str()).collect::<Vec<_>>().join(" ");
            let rescanned = kinds_and_lexemes(&source);
            prop_assert_eq!(rescanned, stream);
        }
    }
}
