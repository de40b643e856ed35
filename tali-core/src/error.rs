//! Boundary error type of the compilation pipeline.
//!
//! Stages report failures as `Diagnostic` values and abort on the first
//! one; `CoreError` is what crosses the crate boundary. `Internal` marks
//! an AST that violates a shape precondition, which is a compiler bug
//! rather than a user error.

use core::fmt;

use alloc::vec;
use alloc::vec::Vec;

use crate::diagnostic::Diagnostic;

#[derive(Debug, Clone)]
pub enum CoreError {
    /// Language-level errors with full source location information.
    Diagnostics(Vec<Diagnostic>),

    /// An invariant the front-end relies on did not hold.
    Internal(&'static str),
}

impl CoreError {
    pub fn from_diagnostic(diagnostic: Diagnostic) -> CoreError {
        CoreError::Diagnostics(vec![diagnostic])
    }

    pub fn internal(message: &'static str) -> CoreError {
        CoreError::Internal(message)
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Diagnostics(diags) => match diags.first() {
                Some(first) => write!(f, "{}", first.message),
                None => write!(f, "diagnostic error (no messages)"),
            },
            CoreError::Internal(msg) => write!(f, "internal compiler error: {msg}"),
        }
    }
}
