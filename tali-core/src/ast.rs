//! The abstract syntax tree: one `Expression` node type with a kind tag,
//! an optional type slot, and a per-kind value payload.
//!
//! The parser fills the type slot for literals and declared-variable
//! children; the validator fills every other slot that can carry a type
//! and is the only stage that mutates the tree afterwards (negation
//! folding rewrites a node in place).

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::span::Span;
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    Literal,
    Variable,
    VariableDeclaration,
    VariableAssignment,
    Return,
    Conditional,
    ForLoop,
    Continue,
    Break,
    Scope,
    Plus,
    Minus,
    Multiply,
    Divide,
    LessThan,
    GreaterThan,
    Equal,
    NotEqual,
    LogicalAnd,
    LogicalOr,
    PostIncrement,
    FunctionCall,
    Callee,
    PointerDereference,
    ArraySubscript,
    AddressOf,
    Negate,
    MemberAccess,
}

impl ExprKind {
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Literal => "literal",
            ExprKind::Variable => "variable",
            ExprKind::VariableDeclaration => "var",
            ExprKind::VariableAssignment => "assignment",
            ExprKind::Return => "return",
            ExprKind::Conditional => "if",
            ExprKind::ForLoop => "for",
            ExprKind::Continue => "continue",
            ExprKind::Break => "break",
            ExprKind::Scope => "scope",
            ExprKind::Plus => "plus",
            ExprKind::Minus => "minus",
            ExprKind::Multiply => "multiply",
            ExprKind::Divide => "divide",
            ExprKind::LessThan => "less than",
            ExprKind::GreaterThan => "greater than",
            ExprKind::Equal => "equal",
            ExprKind::NotEqual => "not equal",
            ExprKind::LogicalAnd => "and",
            ExprKind::LogicalOr => "or",
            ExprKind::PostIncrement => "post increment",
            ExprKind::FunctionCall => "call",
            ExprKind::Callee => "callee",
            ExprKind::PointerDereference => "pointer dereference",
            ExprKind::ArraySubscript => "array subscript",
            ExprKind::AddressOf => "address of",
            ExprKind::Negate => "negate",
            ExprKind::MemberAccess => "member access",
        }
    }
}

/// Per-kind payload of an expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprValue {
    Empty,
    Children(Vec<Expression>),
    Int(i64),
    Uint(u64),
    Str(String),
    Char(u8),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub ty: Option<Type>,
    pub value: ExprValue,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExprKind, ty: Option<Type>, value: ExprValue, span: Span) -> Expression {
        Expression {
            kind,
            ty,
            value,
            span,
        }
    }

    /// Child expressions, or an empty slice for leaf payloads.
    pub fn children(&self) -> &[Expression] {
        match &self.value {
            ExprValue::Children(children) => children,
            _ => &[],
        }
    }

    /// The string payload of Variable and Callee nodes.
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            ExprValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionArg {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionPrototype {
    pub name: String,
    pub args: Vec<FunctionArg>,
    pub return_type: Type,
}

/// A parsed function: prototype plus body scope. Extern functions are bare
/// prototypes registered with the validator and never carry a body.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub prototype: FunctionPrototype,
    pub body: Expression,
}

/// Render a function as an indented tree, prototype line first.
pub fn render_function(function: &Function) -> String {
    let mut out = render_prototype(&function.prototype);
    out.push('\n');
    render_into(&mut out, &function.body, "", false);
    out
}

pub fn render_prototype(prototype: &FunctionPrototype) -> String {
    let mut out = String::new();
    let _ = write!(out, "function {}(", prototype.name);
    for (i, arg) in prototype.args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}: {}", arg.name, arg.ty);
    }
    let _ = write!(out, ") -> {}", prototype.return_type);
    out
}

pub fn render_expression(expr: &Expression) -> String {
    let mut out = String::new();
    render_into(&mut out, expr, "", false);
    out
}

fn render_into(out: &mut String, expr: &Expression, prefix: &str, more_siblings: bool) {
    out.push_str(prefix);
    out.push_str(if more_siblings { "├──" } else { "└──" });
    out.push_str(expr.kind.name());
    match &expr.value {
        ExprValue::Int(v) => {
            let _ = write!(out, ": {v}");
        }
        ExprValue::Uint(v) => {
            let _ = write!(out, ": {v}");
        }
        ExprValue::Str(s) => {
            let _ = write!(out, ": {s}");
        }
        ExprValue::Char(c) => {
            let _ = write!(out, ": '{}'", char::from(*c).escape_default());
        }
        ExprValue::Bool(b) => {
            let _ = write!(out, ": {b}");
        }
        ExprValue::Empty | ExprValue::Children(_) => {}
    }
    if let Some(ty) = &expr.ty {
        let _ = write!(out, " : {ty}");
    }
    out.push('\n');

    let children = expr.children();
    let child_prefix = if more_siblings {
        alloc::format!("{prefix}│   ")
    } else {
        alloc::format!("{prefix}    ")
    };
    for (i, child) in children.iter().enumerate() {
        render_into(out, child, &child_prefix, i + 1 < children.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;
    use crate::types::{Builtin, Type};
    use alloc::vec;

    #[test]
    fn renders_a_small_tree() {
        let ret = Expression::new(
            ExprKind::Return,
            None,
            ExprValue::Children(vec![Expression::new(
                ExprKind::Literal,
                Some(Type::Builtin(Builtin::I64)),
                ExprValue::Int(0),
                Span::dummy(),
            )]),
            Span::dummy(),
        );
        let text = render_expression(&ret);
        assert!(text.contains("└──return"));
        assert!(text.contains("└──literal: 0 : i64"));
    }
}
