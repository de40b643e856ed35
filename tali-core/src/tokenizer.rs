//! Tab-indentation-aware tokenizer.
//!
//! Input is processed line by line. Exactly one leading tab is one
//! indentation level; the difference against the previous line's level is
//! emitted as IndentPlus/IndentMinus tokens, and end-of-file drains every
//! open level. Blank lines and lines whose first non-tab character is `#`
//! are skipped entirely and do not touch the indentation counter, though
//! they still advance the physical position.
//!
//! Keywords are matched as a raw prefix of the remaining line, before
//! identifier scanning, so an identifier that merely starts with a keyword
//! splits at the keyword boundary (`forward` lexes as `for` + `ward`).
//! Spaces are token separators and never indentation.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::diagnostic::Diagnostic;
use crate::span::{FileId, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // structural
    IndentPlus,
    IndentMinus,
    EndOfLine,
    EndOfFile,

    // keywords
    KwFunction,
    KwReturn,
    KwVar,
    KwIf,
    KwElse,
    KwElif,
    KwFor,
    KwContinue,
    KwBreak,
    KwAnd,
    KwOr,
    KwStruct,

    // punctuation / operators
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    Ampersand,
    Star,
    Slash,
    Plus,
    PlusPlus,
    Minus,
    Arrow,
    Less,
    Greater,
    Assign,
    EqualEqual,
    NotEqual,

    // literals / identifiers
    Ident(String),
    IntLiteral(String),
    UintLiteral(String),
    StringLiteral(String),
    CharLiteral(u8),
}

impl TokenKind {
    /// Short human-readable form used in parser diagnostics.
    pub fn describe(&self) -> String {
        let fixed = match self {
            TokenKind::IndentPlus => "indent",
            TokenKind::IndentMinus => "dedent",
            TokenKind::EndOfLine => "end of line",
            TokenKind::EndOfFile => "end of file",
            TokenKind::KwFunction => "'function'",
            TokenKind::KwReturn => "'return'",
            TokenKind::KwVar => "'var'",
            TokenKind::KwIf => "'if'",
            TokenKind::KwElse => "'else'",
            TokenKind::KwElif => "'elif'",
            TokenKind::KwFor => "'for'",
            TokenKind::KwContinue => "'continue'",
            TokenKind::KwBreak => "'break'",
            TokenKind::KwAnd => "'and'",
            TokenKind::KwOr => "'or'",
            TokenKind::KwStruct => "'struct'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Dot => "'.'",
            TokenKind::Ampersand => "'&'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Plus => "'+'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::Minus => "'-'",
            TokenKind::Arrow => "'->'",
            TokenKind::Less => "'<'",
            TokenKind::Greater => "'>'",
            TokenKind::Assign => "'='",
            TokenKind::EqualEqual => "'=='",
            TokenKind::NotEqual => "'!='",
            TokenKind::Ident(name) => return alloc::format!("identifier '{name}'"),
            TokenKind::IntLiteral(digits) => return alloc::format!("integer literal '{digits}'"),
            TokenKind::UintLiteral(digits) => {
                return alloc::format!("integer literal '{digits}u64'")
            }
            TokenKind::StringLiteral(_) => "string literal",
            TokenKind::CharLiteral(_) => "character literal",
        };
        fixed.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

const LEX_ERROR: &str = "E0001";

const KEYWORDS: [(&str, TokenKind); 12] = [
    ("function", TokenKind::KwFunction),
    ("return", TokenKind::KwReturn),
    ("var", TokenKind::KwVar),
    ("if", TokenKind::KwIf),
    ("else", TokenKind::KwElse),
    ("elif", TokenKind::KwElif),
    ("for", TokenKind::KwFor),
    ("continue", TokenKind::KwContinue),
    ("break", TokenKind::KwBreak),
    ("and", TokenKind::KwAnd),
    ("or", TokenKind::KwOr),
    ("struct", TokenKind::KwStruct),
];

pub fn tokenize(file_id: FileId, source: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut state = Lexer {
        file_id,
        tokens: Vec::new(),
        indent: 0,
    };

    let mut offset = 0usize;
    for part in source.split_inclusive('\n') {
        let mut line = part.strip_suffix('\n').unwrap_or(part);
        line = line.strip_suffix('\r').unwrap_or(line);
        state.process_line(line, offset)?;
        offset += part.len();
    }

    let end = source.len();
    for _ in 0..state.indent {
        state.push(TokenKind::IndentMinus, end, end);
    }
    state.push(TokenKind::EndOfFile, end, end);

    Ok(state.tokens)
}

struct Lexer {
    file_id: FileId,
    tokens: Vec<Token>,
    indent: usize,
}

impl Lexer {
    fn process_line(&mut self, line: &str, line_start: usize) -> Result<(), Diagnostic> {
        let tabs = line.bytes().take_while(|b| *b == b'\t').count();
        let rest = &line[tabs..];
        if rest.is_empty() || rest.starts_with('#') {
            return Ok(());
        }

        if tabs > self.indent {
            for _ in 0..tabs - self.indent {
                self.push(TokenKind::IndentPlus, line_start, line_start + tabs);
            }
        } else {
            for _ in 0..self.indent - tabs {
                self.push(TokenKind::IndentMinus, line_start, line_start + tabs);
            }
        }
        self.indent = tabs;

        self.lex_line(rest, line_start + tabs)?;

        let end = line_start + line.len();
        self.push(TokenKind::EndOfLine, end, end);
        Ok(())
    }

    fn lex_line(&mut self, text: &str, offset: usize) -> Result<(), Diagnostic> {
        let bytes = text.as_bytes();
        let mut i = 0usize;
        while i < bytes.len() {
            let rest = &text[i..];
            if let Some((keyword, kind)) = keyword_prefix(rest) {
                self.push(kind, offset + i, offset + i + keyword.len());
                i += keyword.len();
                continue;
            }

            let c = bytes[i];
            if c == b'#' {
                // comment to end of line
                break;
            } else if c == b'"' {
                i = self.string_literal(text, i, offset)?;
            } else if c == b'\'' {
                i = self.char_literal(text, i, offset)?;
            } else if is_special(c) {
                i = self.special(text, i, offset)?;
            } else if c.is_ascii_digit() {
                i = self.numeric(text, i, offset);
            } else if c.is_ascii_alphabetic() {
                i = self.identifier(text, i, offset);
            } else if c.is_ascii_whitespace() {
                i += 1;
            } else {
                return Err(self.invalid_token(rest, offset + i, offset + text.len()));
            }
        }
        Ok(())
    }

    fn special(&mut self, text: &str, i: usize, offset: usize) -> Result<usize, Diagnostic> {
        let rest = &text[i..];
        let (kind, len) = match text.as_bytes()[i] {
            b'(' => (TokenKind::LParen, 1),
            b')' => (TokenKind::RParen, 1),
            b'[' => (TokenKind::LBracket, 1),
            b']' => (TokenKind::RBracket, 1),
            b'{' => (TokenKind::LBrace, 1),
            b'}' => (TokenKind::RBrace, 1),
            b',' => (TokenKind::Comma, 1),
            b':' => (TokenKind::Colon, 1),
            b'.' => (TokenKind::Dot, 1),
            b'&' => (TokenKind::Ampersand, 1),
            b'*' => (TokenKind::Star, 1),
            b'/' => (TokenKind::Slash, 1),
            b'+' if rest.starts_with("++") => (TokenKind::PlusPlus, 2),
            b'+' => (TokenKind::Plus, 1),
            b'-' if rest.starts_with("->") => (TokenKind::Arrow, 2),
            b'-' => (TokenKind::Minus, 1),
            b'<' => (TokenKind::Less, 1),
            b'>' => (TokenKind::Greater, 1),
            b'=' if rest.starts_with("==") => (TokenKind::EqualEqual, 2),
            b'=' => (TokenKind::Assign, 1),
            b'!' if rest.starts_with("!=") => (TokenKind::NotEqual, 2),
            _ => return Err(self.invalid_token(rest, offset + i, offset + text.len())),
        };
        self.push(kind, offset + i, offset + i + len);
        Ok(i + len)
    }

    fn numeric(&mut self, text: &str, start: usize, offset: usize) -> usize {
        let bytes = text.as_bytes();
        let mut i = start;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        // The lexeme never includes the suffix.
        let lexeme = text[start..i].to_string();
        let rest = &text[i..];
        if rest.starts_with("u64") {
            self.push(
                TokenKind::UintLiteral(lexeme),
                offset + start,
                offset + i + 3,
            );
            i + 3
        } else if rest.starts_with("i64") {
            self.push(TokenKind::IntLiteral(lexeme), offset + start, offset + i + 3);
            i + 3
        } else {
            self.push(TokenKind::IntLiteral(lexeme), offset + start, offset + i);
            i
        }
    }

    fn identifier(&mut self, text: &str, start: usize, offset: usize) -> usize {
        let bytes = text.as_bytes();
        let mut i = start;
        while i < bytes.len() && !is_special(bytes[i]) && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        self.push(
            TokenKind::Ident(text[start..i].to_string()),
            offset + start,
            offset + i,
        );
        i
    }

    fn string_literal(&mut self, text: &str, start: usize, offset: usize) -> Result<usize, Diagnostic> {
        let bytes = text.as_bytes();
        let mut i = start + 1;
        let mut literal = String::new();
        let mut closed = false;
        while i < bytes.len() {
            match bytes[i] {
                b'"' => {
                    closed = true;
                    i += 1;
                    break;
                }
                b'\\' => {
                    i += 1;
                    if i >= bytes.len() {
                        break;
                    }
                    let c = match bytes[i] {
                        b'r' => b'\r',
                        b'n' => b'\n',
                        b'"' => b'"',
                        other => other,
                    };
                    literal.push(c as char);
                    i += 1;
                }
                other => {
                    literal.push(other as char);
                    i += 1;
                }
            }
        }
        if !closed {
            return Err(Diagnostic::error(
                "unterminated string literal",
                Span::new(self.file_id, (offset + start) as u32, (offset + i) as u32),
            )
            .with_code(LEX_ERROR));
        }
        self.push(TokenKind::StringLiteral(literal), offset + start, offset + i);
        Ok(i)
    }

    fn char_literal(&mut self, text: &str, start: usize, offset: usize) -> Result<usize, Diagnostic> {
        let bytes = text.as_bytes();
        let mut i = start + 1;
        if i >= bytes.len() {
            return Err(Diagnostic::error(
                "unterminated character literal",
                Span::new(self.file_id, (offset + start) as u32, (offset + i) as u32),
            )
            .with_code(LEX_ERROR));
        }
        let value = if bytes[i] == b'\\' {
            i += 1;
            if i >= bytes.len() {
                return Err(Diagnostic::error(
                    "unterminated character literal",
                    Span::new(self.file_id, (offset + start) as u32, (offset + i) as u32),
                )
                .with_code(LEX_ERROR));
            }
            let c = match bytes[i] {
                b'r' => b'\r',
                b'n' => b'\n',
                b'\'' => b'\'',
                b'0' => b'\0',
                other => other,
            };
            i += 1;
            c
        } else {
            let c = bytes[i];
            i += 1;
            c
        };
        // The closing quote position is consumed without checking what is
        // actually there.
        if i < bytes.len() {
            i += 1;
        }
        self.push(TokenKind::CharLiteral(value), offset + start, offset + i);
        Ok(i)
    }

    fn invalid_token(&self, rest: &str, start: usize, end: usize) -> Diagnostic {
        Diagnostic::error(
            alloc::format!("invalid token: {rest}"),
            Span::new(self.file_id, start as u32, end as u32),
        )
        .with_code(LEX_ERROR)
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            span: Span::new(self.file_id, start as u32, end as u32),
        });
    }
}

fn keyword_prefix(rest: &str) -> Option<(&'static str, TokenKind)> {
    KEYWORDS
        .iter()
        .find(|(keyword, _)| rest.starts_with(keyword))
        .map(|(keyword, kind)| (*keyword, kind.clone()))
}

fn is_special(c: u8) -> bool {
    matches!(
        c,
        b'(' | b')'
            | b'['
            | b']'
            | b'{'
            | b'}'
            | b','
            | b':'
            | b'.'
            | b'&'
            | b'*'
            | b'/'
            | b'+'
            | b'-'
            | b'<'
            | b'>'
            | b'='
            | b'!'
    )
}
