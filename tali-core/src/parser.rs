//! Parser: token stream to a list of functions.
//!
//! The top level alternates between `function` and `struct` declarations.
//! Statements inside an indented scope dispatch on their leading keyword;
//! everything else goes through the Pratt expression parser, which climbs
//! binary precedence levels and recurses with `precedence + 1` on the
//! right-hand side.
//!
//! The parser owns the type environment (seeded with the six builtins and
//! extended by struct declarations) and the declared-function set. A
//! function name enters that set before its body is parsed, so a function
//! can call itself; a call to a function declared later in the file parses
//! as a variable instead and fails validation.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use crate::ast::{ExprKind, ExprValue, Expression, Function, FunctionArg, FunctionPrototype};
use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::tokenizer::{Token, TokenKind};
use crate::types::{Builtin, Field, Type};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    types: BTreeMap<String, Type>,
    declared_functions: BTreeSet<String>,
}

impl Parser {
    pub fn new() -> Parser {
        let mut types = BTreeMap::new();
        types.insert("i32".to_string(), Type::Builtin(Builtin::I32));
        types.insert("i64".to_string(), Type::Builtin(Builtin::I64));
        types.insert("u64".to_string(), Type::Builtin(Builtin::U64));
        types.insert("char".to_string(), Type::Builtin(Builtin::Char));
        types.insert("bool".to_string(), Type::Builtin(Builtin::Bool));
        types.insert("void".to_string(), Type::Builtin(Builtin::Void));
        Parser {
            tokens: Vec::new(),
            pos: 0,
            types,
            declared_functions: BTreeSet::new(),
        }
    }

    /// Parse a whole token stream into functions, extending the type
    /// environment with any struct declarations encountered on the way.
    pub fn parse(&mut self, tokens: Vec<Token>) -> Result<Vec<Function>, Diagnostic> {
        self.tokens = tokens;
        self.pos = 0;

        let mut functions = Vec::new();
        loop {
            match self.peek_kind() {
                Some(TokenKind::KwFunction) => {
                    self.next();
                    functions.push(self.parse_function()?);
                }
                Some(TokenKind::KwStruct) => {
                    let (name, ty) = self.parse_struct()?;
                    self.types.insert(name, ty);
                }
                _ => {
                    self.expect(&TokenKind::EndOfFile)?;
                    break;
                }
            }
        }
        Ok(functions)
    }

    fn parse_function(&mut self) -> Result<Function, Diagnostic> {
        let (name, _) = self.expect_ident()?;
        let args = self.parse_function_args()?;
        self.expect(&TokenKind::Arrow)?;
        let return_type = self.parse_type()?;

        // Registered before the body so the function can call itself.
        self.declared_functions.insert(name.clone());

        self.expect(&TokenKind::Colon)?;
        self.expect(&TokenKind::EndOfLine)?;
        let body = self.parse_scope()?;

        Ok(Function {
            prototype: FunctionPrototype {
                name,
                args,
                return_type,
            },
            body,
        })
    }

    fn parse_function_args(&mut self) -> Result<Vec<FunctionArg>, Diagnostic> {
        let mut args = Vec::new();
        self.expect(&TokenKind::LParen)?;
        while !self.check(&TokenKind::RParen) {
            let (name, _) = self.expect_ident()?;
            self.expect(&TokenKind::Colon)?;
            let ty = self.parse_type()?;
            args.push(FunctionArg { name, ty });

            if self.consume_if(&TokenKind::Comma) {
                continue;
            }
            if !self.check(&TokenKind::RParen) {
                let (span, found) = self.current_description();
                return Err(parse_error(
                    alloc::format!("unexpected token, ')' expected, found {found}"),
                    span,
                ));
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    /// A type is a known type name followed by any run of `*` and
    /// `[size]` suffixes, applied left to right.
    fn parse_type(&mut self) -> Result<Type, Diagnostic> {
        let (name, span) = self.expect_ident()?;
        let mut ty = match self.types.get(&name) {
            Some(ty) => ty.clone(),
            None => {
                return Err(parse_error(
                    alloc::format!("unknown type name '{name}'"),
                    span,
                ))
            }
        };
        loop {
            if self.consume_if(&TokenKind::Star) {
                ty = Type::pointer_to(ty);
            } else if self.consume_if(&TokenKind::LBracket) {
                let (digits, digits_span) = self.expect_int_literal()?;
                let size: i64 = digits.parse().map_err(|_| {
                    parse_error(
                        alloc::format!("invalid integer literal '{digits}'"),
                        digits_span,
                    )
                })?;
                self.expect(&TokenKind::RBracket)?;
                ty = Type::array_of(ty, size as u64);
            } else {
                break;
            }
        }
        Ok(ty)
    }

    fn parse_scope(&mut self) -> Result<Expression, Diagnostic> {
        let open = self.expect(&TokenKind::IndentPlus)?;
        let mut children = Vec::new();
        loop {
            match self.peek_kind() {
                Some(TokenKind::IndentMinus) => break,
                Some(TokenKind::EndOfLine) => {
                    self.next();
                }
                Some(TokenKind::KwReturn) => children.push(self.parse_return()?),
                Some(TokenKind::KwIf) => children.push(self.parse_conditional()?),
                Some(TokenKind::KwFor) => children.push(self.parse_for_loop()?),
                Some(TokenKind::KwContinue) => children.push(self.parse_continue()?),
                Some(TokenKind::KwBreak) => children.push(self.parse_break()?),
                Some(TokenKind::KwVar) => children.push(self.parse_variable_declaration()?),
                Some(TokenKind::IndentPlus) => children.push(self.parse_nested_scope()?),
                _ => children.push(self.parse_expression()?),
            }
        }
        let close = self.expect(&TokenKind::IndentMinus)?;
        let span = open.span.join(close.span).unwrap_or(open.span);
        Ok(Expression::new(
            ExprKind::Scope,
            None,
            ExprValue::Children(children),
            span,
        ))
    }

    /// An extra indentation level in statement position opens a nested
    /// scope expression.
    fn parse_nested_scope(&mut self) -> Result<Expression, Diagnostic> {
        let scope = self.parse_scope()?;
        let span = scope.span;
        let ty = scope.ty.clone();
        Ok(Expression::new(
            ExprKind::Scope,
            ty,
            ExprValue::Children(vec![scope]),
            span,
        ))
    }

    fn parse_return(&mut self) -> Result<Expression, Diagnostic> {
        let start = self.expect(&TokenKind::KwReturn)?;
        let mut span = start.span;
        let mut children = Vec::new();
        if !self.check(&TokenKind::EndOfLine) {
            let value = self.parse_expression()?;
            span = span.join(value.span).unwrap_or(span);
            children.push(value);
        }
        Ok(Expression::new(
            ExprKind::Return,
            None,
            ExprValue::Children(children),
            span,
        ))
    }

    fn parse_conditional(&mut self) -> Result<Expression, Diagnostic> {
        let start = self.expect(&TokenKind::KwIf)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::Colon)?;
        self.expect(&TokenKind::EndOfLine)?;
        let body = self.parse_scope()?;

        let mut children = vec![condition, body];
        while self.consume_if(&TokenKind::KwElif) {
            children.push(self.parse_expression()?);
            self.expect(&TokenKind::Colon)?;
            self.expect(&TokenKind::EndOfLine)?;
            children.push(self.parse_scope()?);
        }
        if self.consume_if(&TokenKind::KwElse) {
            self.expect(&TokenKind::Colon)?;
            self.expect(&TokenKind::EndOfLine)?;
            children.push(self.parse_scope()?);
        }

        let span = children
            .last()
            .map(|c| start.span.join(c.span).unwrap_or(start.span))
            .unwrap_or(start.span);
        Ok(Expression::new(
            ExprKind::Conditional,
            None,
            ExprValue::Children(children),
            span,
        ))
    }

    fn parse_for_loop(&mut self) -> Result<Expression, Diagnostic> {
        let start = self.expect(&TokenKind::KwFor)?;
        let init = if self.check(&TokenKind::KwVar) {
            self.parse_variable_declaration()?
        } else {
            self.parse_expression()?
        };
        self.expect(&TokenKind::Comma)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::Comma)?;
        let step = self.parse_expression()?;
        self.expect(&TokenKind::Colon)?;
        self.expect(&TokenKind::EndOfLine)?;
        let body = self.parse_scope()?;

        let span = start.span.join(body.span).unwrap_or(start.span);
        Ok(Expression::new(
            ExprKind::ForLoop,
            None,
            ExprValue::Children(vec![init, condition, step, body]),
            span,
        ))
    }

    fn parse_variable_declaration(&mut self) -> Result<Expression, Diagnostic> {
        let start = self.expect(&TokenKind::KwVar)?;
        let (name, name_span) = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.expect(&TokenKind::Assign)?;
        let initializer = self.parse_expression()?;

        let span = start.span.join(initializer.span).unwrap_or(start.span);
        let variable = Expression::new(
            ExprKind::Variable,
            Some(ty),
            ExprValue::Str(name),
            name_span,
        );
        Ok(Expression::new(
            ExprKind::VariableDeclaration,
            None,
            ExprValue::Children(vec![variable, initializer]),
            span,
        ))
    }

    fn parse_continue(&mut self) -> Result<Expression, Diagnostic> {
        let tok = self.expect(&TokenKind::KwContinue)?;
        Ok(Expression::new(
            ExprKind::Continue,
            None,
            ExprValue::Empty,
            tok.span,
        ))
    }

    fn parse_break(&mut self) -> Result<Expression, Diagnostic> {
        let tok = self.expect(&TokenKind::KwBreak)?;
        Ok(Expression::new(
            ExprKind::Break,
            None,
            ExprValue::Empty,
            tok.span,
        ))
    }

    fn parse_expression(&mut self) -> Result<Expression, Diagnostic> {
        let lhs = self.parse_unary()?;
        self.parse_expression_rhs(lhs, 0)
    }

    fn parse_expression_rhs(
        &mut self,
        mut lhs: Expression,
        min_precedence: i32,
    ) -> Result<Expression, Diagnostic> {
        loop {
            let (token_precedence, kind) = match self.peek_kind().as_ref().and_then(binary_op) {
                Some(op) => op,
                None => return Ok(lhs),
            };
            if token_precedence < min_precedence {
                return Ok(lhs);
            }
            self.next();

            let mut rhs = self.parse_unary()?;
            let next_precedence = self
                .peek_kind()
                .as_ref()
                .and_then(binary_op)
                .map(|(precedence, _)| precedence)
                .unwrap_or(-1);
            if token_precedence < next_precedence {
                rhs = self.parse_expression_rhs(rhs, token_precedence + 1)?;
            }

            let span = lhs.span.join(rhs.span).unwrap_or(lhs.span);
            lhs = Expression::new(kind, None, ExprValue::Children(vec![lhs, rhs]), span);
        }
    }

    fn parse_unary(&mut self) -> Result<Expression, Diagnostic> {
        let mut prefixes = Vec::new();
        while matches!(
            self.peek_kind(),
            Some(TokenKind::Star | TokenKind::Minus | TokenKind::Ampersand)
        ) {
            if let Some(tok) = self.next() {
                prefixes.push(tok);
            }
        }

        let mut operand = self.parse_primary()?;

        loop {
            match self.peek_kind() {
                Some(TokenKind::PlusPlus) => {
                    let tok = self.expect(&TokenKind::PlusPlus)?;
                    let span = operand.span.join(tok.span).unwrap_or(operand.span);
                    operand = Expression::new(
                        ExprKind::PostIncrement,
                        None,
                        ExprValue::Children(vec![operand]),
                        span,
                    );
                }
                Some(TokenKind::LBracket) => {
                    self.next();
                    let index = self.parse_expression()?;
                    let close = self.expect(&TokenKind::RBracket)?;
                    let span = operand.span.join(close.span).unwrap_or(operand.span);
                    operand = Expression::new(
                        ExprKind::ArraySubscript,
                        None,
                        ExprValue::Children(vec![operand, index]),
                        span,
                    );
                }
                Some(TokenKind::Dot) => {
                    self.next();
                    let (name, name_span) = self.expect_ident()?;
                    let field =
                        Expression::new(ExprKind::Variable, None, ExprValue::Str(name), name_span);
                    let span = operand.span.join(name_span).unwrap_or(operand.span);
                    operand = Expression::new(
                        ExprKind::MemberAccess,
                        None,
                        ExprValue::Children(vec![operand, field]),
                        span,
                    );
                }
                _ => break,
            }
        }

        // Stacked prefixes apply from the innermost outwards.
        for prefix in prefixes.into_iter().rev() {
            let kind = match prefix.kind {
                TokenKind::Star => ExprKind::PointerDereference,
                TokenKind::Minus => ExprKind::Negate,
                _ => ExprKind::AddressOf,
            };
            let span = prefix.span.join(operand.span).unwrap_or(operand.span);
            operand = Expression::new(kind, None, ExprValue::Children(vec![operand]), span);
        }

        Ok(operand)
    }

    fn parse_primary(&mut self) -> Result<Expression, Diagnostic> {
        match self.peek_kind() {
            Some(TokenKind::IntLiteral(_)) => self.parse_integer_literal(),
            Some(TokenKind::UintLiteral(_)) => self.parse_unsigned_literal(),
            Some(TokenKind::LParen) => self.parse_paren_expression(),
            Some(TokenKind::Ident(_)) => self.parse_identifier(),
            Some(TokenKind::CharLiteral(_)) => self.parse_char_literal(),
            Some(TokenKind::StringLiteral(_)) => self.parse_string_literal(),
            Some(TokenKind::LBracket) => self.parse_array_literal(),
            Some(TokenKind::LBrace) => self.parse_record_literal(),
            Some(other) => {
                let span = self.peek_span().unwrap_or_else(Span::dummy);
                Err(parse_error(
                    alloc::format!("invalid primary expression: {}", other.describe()),
                    span,
                ))
            }
            None => Err(parse_error("unexpected end of input", Span::dummy())),
        }
    }

    fn parse_integer_literal(&mut self) -> Result<Expression, Diagnostic> {
        let (digits, span) = self.expect_int_literal()?;
        let value: i64 = digits.parse().map_err(|_| {
            parse_error(alloc::format!("invalid integer literal '{digits}'"), span)
        })?;
        Ok(Expression::new(
            ExprKind::Literal,
            Some(Type::Builtin(Builtin::I64)),
            ExprValue::Int(value),
            span,
        ))
    }

    fn parse_unsigned_literal(&mut self) -> Result<Expression, Diagnostic> {
        let (span, found) = self.current_description();
        match self.peek_kind() {
            Some(TokenKind::UintLiteral(digits)) => {
                self.next();
                let value: u64 = digits.parse().map_err(|_| {
                    parse_error(alloc::format!("invalid integer literal '{digits}'"), span)
                })?;
                Ok(Expression::new(
                    ExprKind::Literal,
                    Some(Type::Builtin(Builtin::U64)),
                    ExprValue::Uint(value),
                    span,
                ))
            }
            _ => Err(parse_error(
                alloc::format!("expected integer literal, found {found}"),
                span,
            )),
        }
    }

    fn parse_paren_expression(&mut self) -> Result<Expression, Diagnostic> {
        self.expect(&TokenKind::LParen)?;
        let expression = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Ok(expression)
    }

    fn parse_char_literal(&mut self) -> Result<Expression, Diagnostic> {
        let (span, found) = self.current_description();
        match self.peek_kind() {
            Some(TokenKind::CharLiteral(value)) => {
                self.next();
                Ok(Expression::new(
                    ExprKind::Literal,
                    Some(Type::Builtin(Builtin::Char)),
                    ExprValue::Char(value),
                    span,
                ))
            }
            _ => Err(parse_error(
                alloc::format!("expected character literal, found {found}"),
                span,
            )),
        }
    }

    /// String literals are null-terminated character data; their static
    /// type is pointer-to-char.
    fn parse_string_literal(&mut self) -> Result<Expression, Diagnostic> {
        let (span, found) = self.current_description();
        match self.peek_kind() {
            Some(TokenKind::StringLiteral(value)) => {
                self.next();
                Ok(Expression::new(
                    ExprKind::Literal,
                    Some(Type::pointer_to(Type::Builtin(Builtin::Char))),
                    ExprValue::Str(value),
                    span,
                ))
            }
            _ => Err(parse_error(
                alloc::format!("expected string literal, found {found}"),
                span,
            )),
        }
    }

    fn parse_identifier(&mut self) -> Result<Expression, Diagnostic> {
        let (name, span) = self.expect_ident()?;
        if name == "true" || name == "false" {
            return Ok(Expression::new(
                ExprKind::Literal,
                Some(Type::Builtin(Builtin::Bool)),
                ExprValue::Bool(name == "true"),
                span,
            ));
        }
        if self.declared_functions.contains(&name) {
            return self.parse_call(name, span);
        }
        Ok(Expression::new(
            ExprKind::Variable,
            None,
            ExprValue::Str(name),
            span,
        ))
    }

    fn parse_call(&mut self, callee: String, span: Span) -> Result<Expression, Diagnostic> {
        let mut children = vec![Expression::new(
            ExprKind::Callee,
            None,
            ExprValue::Str(callee),
            span,
        )];
        self.expect(&TokenKind::LParen)?;
        if !self.check(&TokenKind::RParen) {
            loop {
                children.push(self.parse_expression()?);
                if !self.consume_if(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let close = self.expect(&TokenKind::RParen)?;
        let span = span.join(close.span).unwrap_or(span);
        Ok(Expression::new(
            ExprKind::FunctionCall,
            None,
            ExprValue::Children(children),
            span,
        ))
    }

    /// `[e1, e2, …]` — the literal's type is an array of the first
    /// element's parser-known type, sized by the element count.
    fn parse_array_literal(&mut self) -> Result<Expression, Diagnostic> {
        let open = self.expect(&TokenKind::LBracket)?;
        let mut elements = vec![self.parse_expression()?];
        while self.consume_if(&TokenKind::Comma) {
            elements.push(self.parse_expression()?);
        }
        let close = self.expect(&TokenKind::RBracket)?;
        let span = open.span.join(close.span).unwrap_or(open.span);

        let element_ty = match elements.first().and_then(|e| e.ty.clone()) {
            Some(ty) => ty,
            None => {
                return Err(parse_error(
                    "array literal element type is not known",
                    span,
                ))
            }
        };
        let ty = Type::array_of(element_ty, elements.len() as u64);
        Ok(Expression::new(
            ExprKind::Literal,
            Some(ty),
            ExprValue::Children(elements),
            span,
        ))
    }

    /// `{e1, e2, …}` — a record literal with empty positional field names.
    fn parse_record_literal(&mut self) -> Result<Expression, Diagnostic> {
        let open = self.expect(&TokenKind::LBrace)?;
        let mut elements = vec![self.parse_expression()?];
        while self.consume_if(&TokenKind::Comma) {
            elements.push(self.parse_expression()?);
        }
        let close = self.expect(&TokenKind::RBrace)?;
        let span = open.span.join(close.span).unwrap_or(open.span);

        let mut fields = Vec::new();
        for element in &elements {
            let ty = element.ty.clone().ok_or_else(|| {
                parse_error("record literal element type is not known", element.span)
            })?;
            fields.push(Field {
                name: String::new(),
                ty: Rc::new(ty),
            });
        }
        Ok(Expression::new(
            ExprKind::Literal,
            Some(Type::Record(fields)),
            ExprValue::Children(elements),
            span,
        ))
    }

    fn parse_struct(&mut self) -> Result<(String, Type), Diagnostic> {
        self.expect(&TokenKind::KwStruct)?;
        let (name, _) = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        self.expect(&TokenKind::EndOfLine)?;
        self.expect(&TokenKind::IndentPlus)?;

        let mut fields = Vec::new();
        while !self.check(&TokenKind::IndentMinus) {
            let (field_name, _) = self.expect_ident()?;
            self.expect(&TokenKind::Colon)?;
            let field_ty = self.parse_type()?;
            self.expect(&TokenKind::EndOfLine)?;
            fields.push(Field {
                name: field_name,
                ty: Rc::new(field_ty),
            });
        }
        self.expect(&TokenKind::IndentMinus)?;

        Ok((name, Type::Record(fields)))
    }

    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, Diagnostic> {
        match self.peek() {
            Some(tok) if kind_eq(&tok.kind, kind) => {
                let tok = tok.clone();
                self.pos += 1;
                Ok(tok)
            }
            Some(tok) => Err(parse_error(
                alloc::format!(
                    "unexpected token: expected {}, found {}",
                    kind.describe(),
                    tok.kind.describe()
                ),
                tok.span,
            )),
            None => Err(parse_error(
                alloc::format!("unexpected end of input: expected {}", kind.describe()),
                Span::dummy(),
            )),
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span), Diagnostic> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Ident(name),
                span,
            }) => {
                let result = (name.clone(), *span);
                self.pos += 1;
                Ok(result)
            }
            Some(tok) => Err(parse_error(
                alloc::format!("expected identifier, found {}", tok.kind.describe()),
                tok.span,
            )),
            None => Err(parse_error(
                "unexpected end of input: expected identifier",
                Span::dummy(),
            )),
        }
    }

    fn expect_int_literal(&mut self) -> Result<(String, Span), Diagnostic> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::IntLiteral(digits),
                span,
            }) => {
                let result = (digits.clone(), *span);
                self.pos += 1;
                Ok(result)
            }
            Some(tok) => Err(parse_error(
                alloc::format!("expected integer literal, found {}", tok.kind.describe()),
                tok.span,
            )),
            None => Err(parse_error(
                "unexpected end of input: expected integer literal",
                Span::dummy(),
            )),
        }
    }

    fn consume_if(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.next();
            true
        } else {
            false
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        matches!(self.peek(), Some(tok) if kind_eq(&tok.kind, kind))
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind.clone())
    }

    fn peek_span(&self) -> Option<Span> {
        self.tokens.get(self.pos).map(|t| t.span)
    }

    fn current_description(&self) -> (Span, String) {
        match self.peek() {
            Some(tok) => (tok.span, tok.kind.describe()),
            None => (Span::dummy(), "end of input".to_string()),
        }
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Binary operator table: precedence level plus the expression kind the
/// operator builds. Higher levels bind tighter.
fn binary_op(kind: &TokenKind) -> Option<(i32, ExprKind)> {
    let op = match kind {
        TokenKind::Star => (120, ExprKind::Multiply),
        TokenKind::Slash => (120, ExprKind::Divide),
        TokenKind::Plus => (110, ExprKind::Plus),
        TokenKind::Minus => (110, ExprKind::Minus),
        TokenKind::Less => (90, ExprKind::LessThan),
        TokenKind::Greater => (90, ExprKind::GreaterThan),
        TokenKind::EqualEqual => (80, ExprKind::Equal),
        TokenKind::NotEqual => (80, ExprKind::NotEqual),
        TokenKind::KwAnd => (40, ExprKind::LogicalAnd),
        TokenKind::KwOr => (30, ExprKind::LogicalOr),
        TokenKind::Assign => (10, ExprKind::VariableAssignment),
        _ => return None,
    };
    Some(op)
}

fn kind_eq(a: &TokenKind, b: &TokenKind) -> bool {
    core::mem::discriminant(a) == core::mem::discriminant(b)
}

const PARSE_ERROR: &str = "E0002";

fn parse_error(message: impl Into<String>, span: Span) -> Diagnostic {
    Diagnostic::error(message, span).with_code(PARSE_ERROR)
}
