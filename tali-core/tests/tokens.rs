//! Tokenizer behavior: indentation accounting, literal forms, and the
//! lexical quirks the language keeps on purpose.

use tali_core::span::FileId;
use tali_core::tokenizer::{tokenize, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(FileId(0), source)
        .expect("source should tokenize")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn indentation_levels_emit_matching_tokens() {
    assert_eq!(
        kinds("a\n\tb\n\t\tc\nd\n"),
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::EndOfLine,
            TokenKind::IndentPlus,
            TokenKind::Ident("b".into()),
            TokenKind::EndOfLine,
            TokenKind::IndentPlus,
            TokenKind::Ident("c".into()),
            TokenKind::EndOfLine,
            TokenKind::IndentMinus,
            TokenKind::IndentMinus,
            TokenKind::Ident("d".into()),
            TokenKind::EndOfLine,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn end_of_file_drains_open_levels() {
    assert_eq!(
        kinds("a\n\tb\n"),
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::EndOfLine,
            TokenKind::IndentPlus,
            TokenKind::Ident("b".into()),
            TokenKind::EndOfLine,
            TokenKind::IndentMinus,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn blank_and_comment_lines_do_not_touch_indentation() {
    assert_eq!(
        kinds("\ta\n\n# note\n\t# indented note\n\tb\n"),
        vec![
            TokenKind::IndentPlus,
            TokenKind::Ident("a".into()),
            TokenKind::EndOfLine,
            TokenKind::Ident("b".into()),
            TokenKind::EndOfLine,
            TokenKind::IndentMinus,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn mid_line_comment_truncates_the_rest() {
    assert_eq!(
        kinds("a # the rest\n"),
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::EndOfLine,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn keywords_match_as_raw_prefixes() {
    // An identifier that merely starts with a keyword splits at the
    // keyword boundary.
    assert_eq!(
        kinds("forward\n"),
        vec![
            TokenKind::KwFor,
            TokenKind::Ident("ward".into()),
            TokenKind::EndOfLine,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn spaces_are_separators_not_indentation() {
    assert_eq!(
        kinds(" \ta\n"),
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::EndOfLine,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn numeric_suffixes_select_the_literal_kind() {
    assert_eq!(
        kinds("1u64 2i64 3\n"),
        vec![
            TokenKind::UintLiteral("1".into()),
            TokenKind::IntLiteral("2".into()),
            TokenKind::IntLiteral("3".into()),
            TokenKind::EndOfLine,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn two_character_operators_win_over_single_ones() {
    assert_eq!(
        kinds("a == b != c = d -> e ++ -\n"),
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::EqualEqual,
            TokenKind::Ident("b".into()),
            TokenKind::NotEqual,
            TokenKind::Ident("c".into()),
            TokenKind::Assign,
            TokenKind::Ident("d".into()),
            TokenKind::Arrow,
            TokenKind::Ident("e".into()),
            TokenKind::PlusPlus,
            TokenKind::Minus,
            TokenKind::EndOfLine,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn string_escapes_translate() {
    assert_eq!(
        kinds("\"a\\nb\\r\\\"q\"\n"),
        vec![
            TokenKind::StringLiteral("a\nb\r\"q".into()),
            TokenKind::EndOfLine,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn unknown_string_escapes_pass_through() {
    assert_eq!(
        kinds("\"a\\qb\"\n"),
        vec![
            TokenKind::StringLiteral("aqb".into()),
            TokenKind::EndOfLine,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn character_literals_map_escapes() {
    assert_eq!(
        kinds("'a' '\\n' '\\0'\n"),
        vec![
            TokenKind::CharLiteral(b'a'),
            TokenKind::CharLiteral(b'\n'),
            TokenKind::CharLiteral(0),
            TokenKind::EndOfLine,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn character_literal_consumes_the_closing_position_blindly() {
    // One byte after the character is swallowed without checking that it
    // is a quote.
    assert_eq!(
        kinds("'ab\n"),
        vec![
            TokenKind::CharLiteral(b'a'),
            TokenKind::EndOfLine,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn unterminated_string_is_fatal() {
    assert!(tokenize(FileId(0), "\"abc\n").is_err());
}

#[test]
fn lex_errors_carry_the_lex_code() {
    let err = tokenize(FileId(0), "\"abc\n").expect_err("unterminated string");
    assert_eq!(err.code, Some("E0001"));
    let err = tokenize(FileId(0), "a ; b\n").expect_err("unknown byte");
    assert_eq!(err.code, Some("E0001"));
}

#[test]
fn stray_bang_is_fatal() {
    assert!(tokenize(FileId(0), "a ! b\n").is_err());
}

#[test]
fn unknown_bytes_are_fatal() {
    assert!(tokenize(FileId(0), "a ; b\n").is_err());
}

#[test]
fn missing_trailing_newline_still_tokenizes() {
    assert_eq!(
        kinds("\ta"),
        vec![
            TokenKind::IndentPlus,
            TokenKind::Ident("a".into()),
            TokenKind::EndOfLine,
            TokenKind::IndentMinus,
            TokenKind::EndOfFile,
        ]
    );
}
