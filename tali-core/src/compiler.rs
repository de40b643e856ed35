//! Pipeline entry point: tokenize, parse, validate.

use alloc::vec::Vec;

use crate::ast::Function;
use crate::error::CoreError;
use crate::parser::Parser;
use crate::span::FileId;
use crate::tokenizer;
use crate::validator::Validator;

/// Compile one source file down to a list of validated functions, ready
/// for a back-end to walk.
///
/// No extern prototypes are registered here; a consumer that links
/// against external functions drives a [`Validator`] directly through
/// `register_extern` / `validate_function`.
pub fn compile_source(file_id: FileId, source: &str) -> Result<Vec<Function>, CoreError> {
    let tokens = tokenizer::tokenize(file_id, source).map_err(CoreError::from_diagnostic)?;

    let mut parser = Parser::new();
    let mut functions = parser.parse(tokens).map_err(CoreError::from_diagnostic)?;

    let mut validator = Validator::new();
    for function in &mut functions {
        validator.validate_function(function)?;
    }
    Ok(functions)
}
