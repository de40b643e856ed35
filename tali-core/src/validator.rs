//! Validator: resolves identifiers, checks operand types, and annotates
//! every expression that can carry a type.
//!
//! The validator owns a stack of lexical scopes (innermost searched first)
//! and a flat function-name table. A scope is pushed for every Scope
//! expression, for the header of a for-loop (so the init declaration is
//! not visible after the loop), and for a function's argument bindings.
//! Slot 0 of the stack is the reserved global scope; nothing writes to it.
//!
//! Validation mutates the AST in place. The only structural rewrite is
//! negation folding: a Negate over a signed-integer literal becomes the
//! negated literal, so Negate nodes never survive validation.
//!
//! Errors are fatal and prefixed with the enclosing function's name.
//! Violated AST-shape preconditions surface as `CoreError::Internal`,
//! which marks a front-end bug rather than a user error.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use crate::ast::{ExprKind, ExprValue, Expression, Function, FunctionPrototype};
use crate::diagnostic::Diagnostic;
use crate::error::CoreError;
use crate::span::Span;
use crate::types::{Builtin, Type};

const TYPE_ERROR: &str = "E0003";

pub struct Validator {
    scopes: Vec<BTreeMap<String, Type>>,
    functions: BTreeMap<String, FunctionPrototype>,
    current_function: String,
    current_return_type: Type,
}

impl Validator {
    pub fn new() -> Validator {
        Validator {
            scopes: vec![BTreeMap::new()],
            functions: BTreeMap::new(),
            current_function: String::new(),
            current_return_type: Type::Builtin(Builtin::Void),
        }
    }

    /// Make an external function's signature visible to calls. Externs
    /// carry no body and are never validated themselves.
    pub fn register_extern(&mut self, prototype: FunctionPrototype) {
        self.functions.insert(prototype.name.clone(), prototype);
    }

    /// Validate a function body in place, annotating every expression
    /// that can carry a type. The function's own prototype is installed
    /// first so recursive calls resolve.
    pub fn validate_function(&mut self, function: &mut Function) -> Result<(), CoreError> {
        self.current_function = function.prototype.name.clone();
        self.current_return_type = function.prototype.return_type.clone();
        self.functions
            .insert(function.prototype.name.clone(), function.prototype.clone());

        let mut arg_scope = BTreeMap::new();
        for arg in &function.prototype.args {
            arg_scope.insert(arg.name.clone(), arg.ty.clone());
        }
        self.scopes.push(arg_scope);

        let result = if function.body.kind == ExprKind::Scope {
            self.validate_expression(&mut function.body)
        } else {
            Err(CoreError::internal("function body is not a scope"))
        };

        self.scopes.pop();
        result
    }

    fn validate_expression(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        match expr.kind {
            ExprKind::Scope => self.validate_scope(expr),
            ExprKind::Literal => validate_literal(expr),
            ExprKind::Variable => self.validate_variable(expr),
            ExprKind::VariableAssignment => self.validate_assignment(expr),
            ExprKind::VariableDeclaration => self.validate_declaration(expr),
            ExprKind::Return => self.validate_return(expr),
            ExprKind::Conditional => self.validate_conditional(expr),
            ExprKind::Plus | ExprKind::Minus | ExprKind::Multiply | ExprKind::Divide => {
                self.validate_arithmetic(expr)
            }
            ExprKind::LessThan | ExprKind::GreaterThan | ExprKind::Equal | ExprKind::NotEqual => {
                self.validate_comparison(expr)
            }
            ExprKind::LogicalAnd | ExprKind::LogicalOr => self.validate_logical(expr),
            ExprKind::PostIncrement => self.validate_post_increment(expr),
            ExprKind::PointerDereference => self.validate_pointer_dereference(expr),
            ExprKind::ArraySubscript => self.validate_array_subscript(expr),
            ExprKind::FunctionCall => self.validate_call(expr),
            ExprKind::ForLoop => self.validate_for_loop(expr),
            ExprKind::Negate => self.validate_negate(expr),
            ExprKind::AddressOf => self.validate_address_of(expr),
            ExprKind::MemberAccess => self.validate_member_access(expr),
            ExprKind::Continue | ExprKind::Break | ExprKind::Callee => Ok(()),
        }
    }

    fn validate_scope(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        if expr.ty.is_some() {
            return Err(CoreError::internal("scope must not carry a type"));
        }
        let children = match &mut expr.value {
            ExprValue::Children(children) => children,
            _ => return Err(CoreError::internal("scope does not hold child expressions")),
        };

        self.scopes.push(BTreeMap::new());
        let mut result = Ok(());
        for child in children.iter_mut() {
            result = self.validate_expression(child);
            if result.is_err() {
                break;
            }
        }
        self.scopes.pop();
        result
    }

    fn validate_variable(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        if expr.ty.is_some() {
            return Err(CoreError::internal("variable already carries a type"));
        }
        let name = match expr.text() {
            Some(name) => name.to_string(),
            None => return Err(CoreError::internal("variable does not hold a name")),
        };
        if name.is_empty() {
            return Err(CoreError::internal("variable name is empty"));
        }
        let ty = self
            .find_variable(&name)
            .ok_or_else(|| self.fail(alloc::format!("unknown variable '{name}'"), expr.span))?;
        expr.ty = Some(ty);
        Ok(())
    }

    fn validate_assignment(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let span = expr.span;
        let result_ty = {
            let (lhs, rhs) = two_children(expr, "assignment is not a pair of expressions")?;
            if !matches!(
                lhs.kind,
                ExprKind::Variable | ExprKind::PointerDereference | ExprKind::MemberAccess
            ) {
                return Err(self.fail(
                    "assignment target is not a variable, dereference, or member access",
                    lhs.span,
                ));
            }
            self.validate_expression(lhs)?;
            self.validate_expression(rhs)?;

            let lhs_ty = lhs
                .ty
                .clone()
                .ok_or_else(|| self.fail("assignment target has no type", lhs.span))?;
            let rhs_ty = rhs
                .ty
                .clone()
                .ok_or_else(|| self.fail("assignment value has no type", rhs.span))?;
            if lhs_ty != rhs_ty {
                return Err(self.fail(
                    alloc::format!("assignment types mismatch: expected {lhs_ty}, found {rhs_ty}"),
                    span,
                ));
            }
            lhs_ty
        };
        expr.ty = Some(result_ty);
        Ok(())
    }

    fn validate_declaration(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let span = expr.span;
        let (name, declared) = {
            let (lhs, rhs) = two_children(expr, "variable declaration is not a pair of expressions")?;
            if lhs.kind != ExprKind::Variable {
                return Err(CoreError::internal(
                    "variable declaration target is not a variable",
                ));
            }
            let declared = lhs
                .ty
                .clone()
                .ok_or(CoreError::Internal("variable declaration has no declared type"))?;
            if declared.is_builtin(Builtin::Void) {
                return Err(self.fail("cannot declare a variable of type void", lhs.span));
            }
            let name = match lhs.text() {
                Some(name) => name.to_string(),
                None => {
                    return Err(CoreError::internal(
                        "variable declaration target does not hold a name",
                    ))
                }
            };

            self.validate_expression(rhs)?;
            let init_ty = rhs
                .ty
                .clone()
                .ok_or_else(|| self.fail("variable initializer has no type", rhs.span))?;
            if declared != init_ty {
                return Err(CoreError::from_diagnostic(
                    Diagnostic::error(
                        alloc::format!(
                            "{}: variable declaration types mismatch: expected {declared}, found {init_ty}",
                            self.current_function
                        ),
                        span,
                    )
                    .with_code(TYPE_ERROR)
                    .with_secondary_label(
                        rhs.span,
                        alloc::format!("initializer has type {init_ty}"),
                    ),
                ));
            }
            (name, declared)
        };

        expr.ty = Some(declared.clone());
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, declared);
        }
        Ok(())
    }

    fn validate_return(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let span = expr.span;
        let result_ty = {
            let children = match &mut expr.value {
                ExprValue::Children(children) => children,
                _ => return Err(CoreError::internal("return does not hold child expressions")),
            };
            if children.len() > 1 {
                return Err(CoreError::internal("return holds more than one expression"));
            }
            match children.first_mut() {
                None => {
                    if !self.current_return_type.is_builtin(Builtin::Void) {
                        return Err(self.fail(
                            alloc::format!(
                                "return type does not match function type: expected {}, found void",
                                self.current_return_type
                            ),
                            span,
                        ));
                    }
                    self.current_return_type.clone()
                }
                Some(value) => {
                    self.validate_expression(value)?;
                    let ty = value
                        .ty
                        .clone()
                        .ok_or_else(|| self.fail("return value has no type", value.span))?;
                    if ty != self.current_return_type {
                        return Err(self.fail(
                            alloc::format!(
                                "return type does not match function type: expected {}, found {ty}",
                                self.current_return_type
                            ),
                            span,
                        ));
                    }
                    ty
                }
            }
        };
        expr.ty = Some(result_ty);
        Ok(())
    }

    fn validate_conditional(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let children = match &mut expr.value {
            ExprValue::Children(children) => children,
            _ => {
                return Err(CoreError::internal(
                    "conditional does not hold child expressions",
                ))
            }
        };
        if children.len() < 2 {
            return Err(CoreError::internal(
                "conditional requires at least two expressions",
            ));
        }

        let count = children.len();
        let mut ix = 0;
        while ix + 1 < count {
            let condition = &mut children[ix];
            self.validate_expression(condition)?;
            let cond_span = condition.span;
            let is_bool = condition
                .ty
                .as_ref()
                .map(|t| t.is_builtin(Builtin::Bool))
                .unwrap_or(false);
            if !is_bool {
                return Err(self.fail("condition is not a boolean", cond_span));
            }

            let body = &mut children[ix + 1];
            if body.kind != ExprKind::Scope {
                return Err(CoreError::internal("conditional branch is not a scope"));
            }
            self.validate_expression(body)?;
            ix += 2;
        }
        if ix == count - 1 {
            let else_body = &mut children[ix];
            if else_body.kind != ExprKind::Scope {
                return Err(CoreError::internal("else branch is not a scope"));
            }
            self.validate_expression(else_body)?;
        }
        Ok(())
    }

    fn validate_arithmetic(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let span = expr.span;
        let kind = expr.kind;
        let result_ty = {
            let (lhs, rhs) = two_children(expr, "arithmetic operation is not a pair of expressions")?;
            self.validate_expression(lhs)?;
            let lhs_ty = lhs
                .ty
                .clone()
                .ok_or_else(|| self.fail("arithmetic operand has no type", lhs.span))?;
            if !(lhs_ty.is_integer() || lhs_ty.is_pointer()) {
                return Err(self.fail(
                    alloc::format!("arithmetic operand is not an integer or pointer type: {lhs_ty}"),
                    lhs.span,
                ));
            }

            self.validate_expression(rhs)?;
            let rhs_ty = rhs
                .ty
                .clone()
                .ok_or_else(|| self.fail("arithmetic operand has no type", rhs.span))?;
            if !rhs_ty.is_integer() {
                return Err(self.fail(
                    alloc::format!("arithmetic operand is not an integer type: {rhs_ty}"),
                    rhs.span,
                ));
            }

            if lhs_ty.is_pointer() {
                // Pointer arithmetic keeps the pointer type and only
                // allows offsets, not scaling.
                if !matches!(kind, ExprKind::Plus | ExprKind::Minus) {
                    return Err(
                        self.fail("only + and - operations are allowed on pointers", span)
                    );
                }
                lhs_ty
            } else {
                if lhs_ty != rhs_ty {
                    return Err(self.fail(
                        alloc::format!("arithmetic types mismatch: {lhs_ty} and {rhs_ty}"),
                        span,
                    ));
                }
                lhs_ty
            }
        };
        expr.ty = Some(result_ty);
        Ok(())
    }

    fn validate_comparison(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let span = expr.span;
        {
            let (lhs, rhs) = two_children(expr, "comparison operation is not a pair of expressions")?;
            self.validate_expression(lhs)?;
            self.validate_expression(rhs)?;

            let lhs_ty = lhs
                .ty
                .clone()
                .ok_or_else(|| self.fail("comparison operand has no type", lhs.span))?;
            let rhs_ty = rhs
                .ty
                .clone()
                .ok_or_else(|| self.fail("comparison operand has no type", rhs.span))?;
            if lhs_ty != rhs_ty {
                return Err(self.fail(
                    alloc::format!("comparison types mismatch: {lhs_ty} and {rhs_ty}"),
                    span,
                ));
            }
            if !lhs_ty.is_comparable() {
                return Err(self.fail(
                    alloc::format!("comparison operand type is not comparable: {lhs_ty}"),
                    span,
                ));
            }
        }
        expr.ty = Some(Type::Builtin(Builtin::Bool));
        Ok(())
    }

    fn validate_logical(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let span = expr.span;
        let result_ty = {
            let (lhs, rhs) = two_children(expr, "logical operation is not a pair of expressions")?;
            self.validate_expression(lhs)?;
            self.validate_expression(rhs)?;

            let lhs_ty = lhs
                .ty
                .clone()
                .ok_or_else(|| self.fail("logical operand has no type", lhs.span))?;
            let rhs_ty = rhs
                .ty
                .clone()
                .ok_or_else(|| self.fail("logical operand has no type", rhs.span))?;
            if lhs_ty != rhs_ty {
                return Err(self.fail(
                    alloc::format!("logical types mismatch: {lhs_ty} and {rhs_ty}"),
                    span,
                ));
            }
            if !lhs_ty.is_builtin(Builtin::Bool) {
                return Err(self.fail("logical operand is not a boolean", span));
            }
            lhs_ty
        };
        expr.ty = Some(result_ty);
        Ok(())
    }

    fn validate_post_increment(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let result_ty = {
            let operand = one_child(expr, "post increment does not hold exactly one expression")?;
            if operand.kind != ExprKind::Variable {
                return Err(self.fail("post increment operand is not a variable", operand.span));
            }
            self.validate_expression(operand)?;
            let ty = operand
                .ty
                .clone()
                .ok_or_else(|| self.fail("post increment operand has no type", operand.span))?;
            if !(ty.is_integer() || ty.is_pointer()) {
                return Err(self.fail(
                    alloc::format!("post increment operand is not an integer or pointer type: {ty}"),
                    operand.span,
                ));
            }
            ty
        };
        expr.ty = Some(result_ty);
        Ok(())
    }

    fn validate_pointer_dereference(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let result_ty = {
            let operand = one_child(expr, "dereference does not hold exactly one expression")?;
            self.validate_expression(operand)?;
            let ty = operand
                .ty
                .clone()
                .ok_or_else(|| self.fail("dereference operand has no type", operand.span))?;
            match ty.pointee() {
                Some(pointee) => pointee.clone(),
                None => {
                    return Err(self.fail(
                        alloc::format!("dereference operand is not a pointer: {ty}"),
                        operand.span,
                    ))
                }
            }
        };
        expr.ty = Some(result_ty);
        Ok(())
    }

    fn validate_array_subscript(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let result_ty = {
            let (target, index) = two_children(expr, "array subscript is not a pair of expressions")?;
            self.validate_expression(target)?;
            let target_ty = target
                .ty
                .clone()
                .ok_or_else(|| self.fail("subscript target has no type", target.span))?;
            if !(target_ty.is_pointer() || target_ty.is_array()) {
                return Err(self.fail(
                    alloc::format!("subscript target is not an array or pointer: {target_ty}"),
                    target.span,
                ));
            }

            self.validate_expression(index)?;
            let index_ty = index
                .ty
                .clone()
                .ok_or_else(|| self.fail("subscript index has no type", index.span))?;
            if !index_ty.is_integer() {
                return Err(self.fail(
                    alloc::format!("subscript index is not an integer type: {index_ty}"),
                    index.span,
                ));
            }

            match (target_ty.element(), target_ty.pointee()) {
                (Some(element), _) => element.clone(),
                (None, Some(pointee)) => pointee.clone(),
                (None, None) => {
                    return Err(CoreError::internal("subscript target has no element type"))
                }
            }
        };
        expr.ty = Some(result_ty);
        Ok(())
    }

    fn validate_call(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let span = expr.span;
        let result_ty = {
            let children = match &mut expr.value {
                ExprValue::Children(children) if !children.is_empty() => children,
                _ => return Err(CoreError::internal("call expression is empty")),
            };
            self.validate_expression(&mut children[0])?;
            if children[0].kind != ExprKind::Callee {
                return Err(CoreError::internal("call has no callee"));
            }
            let callee = match children[0].text() {
                Some(name) => name.to_string(),
                None => return Err(CoreError::internal("callee does not hold a name")),
            };

            let prototype = self
                .functions
                .get(&callee)
                .cloned()
                .ok_or_else(|| self.fail(alloc::format!("unknown function '{callee}'"), span))?;
            if prototype.args.len() != children.len() - 1 {
                return Err(self.fail(
                    alloc::format!(
                        "mismatched argument count: '{callee}' expects {}, found {}",
                        prototype.args.len(),
                        children.len() - 1
                    ),
                    span,
                ));
            }
            for (i, param) in prototype.args.iter().enumerate() {
                let arg = &mut children[i + 1];
                self.validate_expression(arg)?;
                let ty = arg
                    .ty
                    .clone()
                    .ok_or_else(|| self.fail("call argument has no type", arg.span))?;
                if ty != param.ty {
                    return Err(self.fail(
                        alloc::format!(
                            "call argument types mismatch: expected {}, found {ty}",
                            param.ty
                        ),
                        arg.span,
                    ));
                }
            }
            prototype.return_type
        };
        expr.ty = Some(result_ty);
        Ok(())
    }

    fn validate_for_loop(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let children = match &mut expr.value {
            ExprValue::Children(children) if children.len() == 4 => children,
            _ => return Err(CoreError::internal("for loop requires four expressions")),
        };

        // Header scope: the init declaration dies with the loop.
        self.scopes.push(BTreeMap::new());
        let result = self.validate_for_parts(children);
        self.scopes.pop();
        result
    }

    fn validate_for_parts(&mut self, children: &mut [Expression]) -> Result<(), CoreError> {
        self.validate_expression(&mut children[0])?;

        self.validate_expression(&mut children[1])?;
        let condition = &children[1];
        let is_bool = condition
            .ty
            .as_ref()
            .map(|t| t.is_builtin(Builtin::Bool))
            .unwrap_or(false);
        if !is_bool {
            return Err(self.fail("for loop condition is not a boolean", condition.span));
        }

        self.validate_expression(&mut children[2])?;

        if children[3].kind != ExprKind::Scope {
            return Err(CoreError::internal("for loop body is not a scope"));
        }
        self.validate_expression(&mut children[3])
    }

    /// Negation never survives validation: the operand is validated
    /// first, so nested negations collapse inwards-out, then the node is
    /// rewritten into a literal carrying the negated payload.
    fn validate_negate(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let (value, ty) = {
            let operand = one_child(expr, "negate does not hold exactly one expression")?;
            self.validate_expression(operand)?;
            if operand.kind != ExprKind::Literal {
                return Err(self.fail("negate operand is not a literal", operand.span));
            }
            let ty = operand
                .ty
                .clone()
                .ok_or_else(|| self.fail("negate operand has no type", operand.span))?;
            if !(ty.is_integer() && ty.is_signed()) {
                return Err(self.fail(
                    alloc::format!("negate operand is not a signed integer type: {ty}"),
                    operand.span,
                ));
            }
            let value = match operand.value {
                ExprValue::Int(value) => value,
                _ => {
                    return Err(CoreError::internal(
                        "negate operand does not hold a signed integer",
                    ))
                }
            };
            (value, ty)
        };

        expr.ty = Some(ty);
        expr.kind = ExprKind::Literal;
        expr.value = ExprValue::Int(value.wrapping_neg());
        Ok(())
    }

    fn validate_address_of(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let result_ty = {
            let operand = one_child(expr, "address-of does not hold exactly one expression")?;
            if operand.kind != ExprKind::Variable {
                return Err(self.fail("address-of operand is not a variable", operand.span));
            }
            self.validate_expression(operand)?;
            let ty = operand
                .ty
                .clone()
                .ok_or_else(|| self.fail("address-of operand has no type", operand.span))?;
            Type::pointer_to(ty)
        };
        expr.ty = Some(result_ty);
        Ok(())
    }

    fn validate_member_access(&mut self, expr: &mut Expression) -> Result<(), CoreError> {
        let result_ty = {
            let (target, field) = two_children(expr, "member access is not a pair of expressions")?;
            self.validate_expression(target)?;
            let target_ty = target
                .ty
                .clone()
                .ok_or_else(|| self.fail("member access target has no type", target.span))?;

            let field_name = match (field.kind, field.text()) {
                (ExprKind::Variable, Some(name)) => name.to_string(),
                _ => {
                    return Err(CoreError::internal(
                        "member access field is not an identifier",
                    ))
                }
            };
            let fields = match target_ty.fields() {
                Some(fields) => fields,
                None => {
                    return Err(self.fail(
                        alloc::format!("member access target is not a record: {target_ty}"),
                        target.span,
                    ))
                }
            };
            let field_ty = match fields.iter().find(|f| f.name == field_name) {
                Some(found) => (*found.ty).clone(),
                None => {
                    return Err(
                        self.fail(alloc::format!("unknown record field '{field_name}'"), field.span)
                    )
                }
            };

            field.ty = Some(field_ty.clone());
            field_ty
        };
        expr.ty = Some(result_ty);
        Ok(())
    }

    fn find_variable(&self, name: &str) -> Option<Type> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).cloned())
    }

    fn fail(&self, message: impl core::fmt::Display, span: Span) -> CoreError {
        CoreError::from_diagnostic(
            Diagnostic::error(alloc::format!("{}: {message}", self.current_function), span)
                .with_code(TYPE_ERROR),
        )
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_literal(expr: &Expression) -> Result<(), CoreError> {
    if expr.ty.is_none() {
        return Err(CoreError::internal("literal has no type"));
    }
    Ok(())
}

fn one_child<'a>(
    expr: &'a mut Expression,
    message: &'static str,
) -> Result<&'a mut Expression, CoreError> {
    match &mut expr.value {
        ExprValue::Children(children) if children.len() == 1 => Ok(&mut children[0]),
        _ => Err(CoreError::Internal(message)),
    }
}

fn two_children<'a>(
    expr: &'a mut Expression,
    message: &'static str,
) -> Result<(&'a mut Expression, &'a mut Expression), CoreError> {
    match &mut expr.value {
        ExprValue::Children(children) if children.len() == 2 => {
            let (head, tail) = children.split_at_mut(1);
            Ok((&mut head[0], &mut tail[0]))
        }
        _ => Err(CoreError::Internal(message)),
    }
}
