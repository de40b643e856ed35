//! Diagnostic values reported by the compiler stages.
//!
//! A `Diagnostic` is the single user-facing error currency: the tokenizer,
//! parser, and validator all describe failures with one of these, each
//! stage tagging its own error code. The core only builds them; rendering
//! (line/column lookup, caret underlines, `note:` lines for secondary
//! labels) is the driver's job.

use alloc::string::String;
use alloc::vec::Vec;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A span highlighted inside a diagnostic, optionally with its own note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub span: Span,
    pub message: Option<String>,
}

/// A single diagnostic message.
///
/// Carries a main message, the primary source location, and zero or more
/// secondary locations ("declared here", "previous definition").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<&'static str>,
    pub message: String,
    pub primary: Label,
    pub secondary: Vec<Label>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, primary_span: Span) -> Diagnostic {
        Diagnostic {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            primary: Label {
                span: primary_span,
                message: None,
            },
            secondary: Vec::new(),
        }
    }

    /// Attach the stage's stable error code: "E0001" for lex errors,
    /// "E0002" for parse errors, "E0003" for type errors.
    pub fn with_code(mut self, code: &'static str) -> Diagnostic {
        self.code = Some(code);
        self
    }

    /// Point at a related source position with its own note, rendered
    /// by the driver as a trailing `note:` line.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Diagnostic {
        self.secondary.push(Label {
            span,
            message: Some(message.into()),
        });
        self
    }
}
