//! LLVM IR text generation from validated functions.
//!
//! The generator consumes the annotated AST the validator produced and
//! writes plain IR text; no LLVM library is involved. Every local and
//! argument lives in a stack slot (`alloca`), lvalues are computed as
//! addresses and loaded or stored through, and control flow lowers to
//! labeled basic blocks. A scope whose last statement terminates
//! (return, continue, break) emits no fall-through branch.
//!
//! Type mapping: i32 -> `i32`, i64/u64 -> `i64`, char -> `i8`,
//! bool -> `i1`, pointers -> `T*`, arrays -> `[N x T]`, records ->
//! literal struct types. Signedness only matters at division and
//! comparison, where the predicate is chosen from the operand type.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

use tali_core::ast::{ExprKind, ExprValue, Expression, Function, FunctionPrototype};
use tali_core::types::{Builtin, Type};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    MissingType { function: String },
    UnexpectedExpression { function: String, kind: &'static str },
    UnknownVariable { function: String, name: String },
    UnknownField { function: String, name: String },
    LoopControlOutsideLoop { function: String },
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenError::MissingType { function } => {
                write!(f, "expression without a type reached codegen in '{function}'")
            }
            CodegenError::UnexpectedExpression { function, kind } => {
                write!(f, "cannot lower {kind} expression in '{function}'")
            }
            CodegenError::UnknownVariable { function, name } => {
                write!(f, "no stack slot for variable '{name}' in '{function}'")
            }
            CodegenError::UnknownField { function, name } => {
                write!(f, "no record field named '{name}' in '{function}'")
            }
            CodegenError::LoopControlOutsideLoop { function } => {
                write!(f, "continue/break outside of a loop in '{function}'")
            }
        }
    }
}

impl std::error::Error for CodegenError {}

/// Emit one IR module: `declare` lines for the extern prototypes, then a
/// `define` per validated function.
pub fn emit_module(
    functions: &[Function],
    externs: &[FunctionPrototype],
) -> Result<String, CodegenError> {
    let mut generator = Generator::new();
    for prototype in externs {
        generator.declare_extern(prototype);
    }
    for function in functions {
        generator.emit_function(function)?;
    }
    Ok(generator.finish())
}

#[derive(Clone)]
struct Slot {
    ty: Type,
    addr: String,
}

#[derive(Clone)]
struct LoopLabels {
    step: String,
    end: String,
}

struct Generator {
    globals: String,
    declares: String,
    code: String,
    tmp: usize,
    labels: usize,
    strings: usize,
    scopes: Vec<BTreeMap<String, Slot>>,
    loops: Vec<LoopLabels>,
    function: String,
    terminated: bool,
}

impl Generator {
    fn new() -> Generator {
        Generator {
            globals: String::new(),
            declares: String::new(),
            code: String::new(),
            tmp: 0,
            labels: 0,
            strings: 0,
            scopes: Vec::new(),
            loops: Vec::new(),
            function: String::new(),
            terminated: false,
        }
    }

    fn finish(self) -> String {
        let mut out = String::new();
        if !self.globals.is_empty() {
            out.push_str(&self.globals);
            out.push('\n');
        }
        if !self.declares.is_empty() {
            out.push_str(&self.declares);
            out.push('\n');
        }
        out.push_str(&self.code);
        out
    }

    fn declare_extern(&mut self, prototype: &FunctionPrototype) {
        let params: Vec<String> = prototype.args.iter().map(|a| llvm_type(&a.ty)).collect();
        let _ = writeln!(
            self.declares,
            "declare {} @{}({})",
            llvm_type(&prototype.return_type),
            prototype.name,
            params.join(", ")
        );
    }

    fn emit_function(&mut self, function: &Function) -> Result<(), CodegenError> {
        self.function = function.prototype.name.clone();
        self.tmp = 0;
        self.labels = 0;
        self.terminated = false;

        let params: Vec<String> = function
            .prototype
            .args
            .iter()
            .map(|arg| format!("{} %{}", llvm_type(&arg.ty), arg.name))
            .collect();
        let _ = writeln!(
            self.code,
            "define {} @{}({}) {{",
            llvm_type(&function.prototype.return_type),
            function.prototype.name,
            params.join(", ")
        );
        self.code.push_str("entry:\n");

        let mut scope = BTreeMap::new();
        for arg in &function.prototype.args {
            let ty = llvm_type(&arg.ty);
            let addr = self.fresh_tmp();
            self.inst(format!("{addr} = alloca {ty}"));
            self.inst(format!("store {ty} %{}, {ty}* {addr}", arg.name));
            scope.insert(
                arg.name.clone(),
                Slot {
                    ty: arg.ty.clone(),
                    addr,
                },
            );
        }
        self.scopes.push(scope);

        let result = self.emit_scope(&function.body);
        self.scopes.pop();
        result?;

        if !self.terminated {
            if function.prototype.return_type.is_builtin(Builtin::Void) {
                self.inst("ret void");
            } else {
                self.inst("unreachable");
            }
        }
        self.code.push_str("}\n\n");
        Ok(())
    }

    fn emit_scope(&mut self, scope: &Expression) -> Result<(), CodegenError> {
        if scope.kind != ExprKind::Scope {
            return Err(self.unexpected(scope));
        }
        self.scopes.push(BTreeMap::new());
        let mut result = Ok(());
        for child in scope.children() {
            result = self.emit_statement(child);
            if result.is_err() {
                break;
            }
        }
        self.scopes.pop();
        result
    }

    fn emit_statement(&mut self, stmt: &Expression) -> Result<(), CodegenError> {
        if self.terminated {
            // Statements after a terminator are unreachable but still
            // need a block to land in.
            let label = self.fresh_label("dead");
            self.begin_block(&label);
        }
        match stmt.kind {
            ExprKind::Return => self.emit_return(stmt),
            ExprKind::Conditional => self.emit_conditional(stmt),
            ExprKind::ForLoop => self.emit_for_loop(stmt),
            ExprKind::Scope => self.emit_scope(stmt),
            ExprKind::VariableDeclaration => self.emit_declaration(stmt),
            ExprKind::Continue => {
                let target = self
                    .loops
                    .last()
                    .cloned()
                    .ok_or_else(|| CodegenError::LoopControlOutsideLoop {
                        function: self.function.clone(),
                    })?;
                self.inst(format!("br label %{}", target.step));
                self.terminated = true;
                Ok(())
            }
            ExprKind::Break => {
                let target = self
                    .loops
                    .last()
                    .cloned()
                    .ok_or_else(|| CodegenError::LoopControlOutsideLoop {
                        function: self.function.clone(),
                    })?;
                self.inst(format!("br label %{}", target.end));
                self.terminated = true;
                Ok(())
            }
            _ => {
                self.emit_value(stmt)?;
                Ok(())
            }
        }
    }

    fn emit_return(&mut self, stmt: &Expression) -> Result<(), CodegenError> {
        let children = stmt.children();
        match children.first() {
            None => self.inst("ret void"),
            Some(value) => {
                let ty = llvm_type(&self.type_of(value)?);
                let operand = self.emit_value(value)?;
                self.inst(format!("ret {ty} {operand}"));
            }
        }
        self.terminated = true;
        Ok(())
    }

    fn emit_conditional(&mut self, stmt: &Expression) -> Result<(), CodegenError> {
        let children = stmt.children();
        let merge = self.fresh_label("if.end");
        let count = children.len();
        let mut ix = 0;
        while ix + 1 < count {
            let cond = self.emit_value(&children[ix])?;
            let then_label = self.fresh_label("if.then");
            let next_label = self.fresh_label("if.else");
            self.inst(format!(
                "br i1 {cond}, label %{then_label}, label %{next_label}"
            ));

            self.begin_block(&then_label);
            self.emit_scope(&children[ix + 1])?;
            if !self.terminated {
                self.inst(format!("br label %{merge}"));
            }

            self.begin_block(&next_label);
            ix += 2;
        }
        if ix == count.saturating_sub(1) && ix < count {
            self.emit_scope(&children[ix])?;
            if !self.terminated {
                self.inst(format!("br label %{merge}"));
            }
        } else {
            self.inst(format!("br label %{merge}"));
        }
        self.begin_block(&merge);
        Ok(())
    }

    fn emit_for_loop(&mut self, stmt: &Expression) -> Result<(), CodegenError> {
        let children = stmt.children();
        if children.len() != 4 {
            return Err(self.unexpected(stmt));
        }
        // Header scope: the init declaration dies with the loop.
        self.scopes.push(BTreeMap::new());
        let result = self.emit_for_parts(children);
        self.scopes.pop();
        result
    }

    fn emit_for_parts(&mut self, children: &[Expression]) -> Result<(), CodegenError> {
        let cond_label = self.fresh_label("for.cond");
        let body_label = self.fresh_label("for.body");
        let step_label = self.fresh_label("for.step");
        let end_label = self.fresh_label("for.end");

        self.emit_statement(&children[0])?;
        self.inst(format!("br label %{cond_label}"));

        self.begin_block(&cond_label);
        let cond = self.emit_value(&children[1])?;
        self.inst(format!(
            "br i1 {cond}, label %{body_label}, label %{end_label}"
        ));

        self.begin_block(&body_label);
        self.loops.push(LoopLabels {
            step: step_label.clone(),
            end: end_label.clone(),
        });
        let body_result = self.emit_scope(&children[3]);
        self.loops.pop();
        body_result?;
        if !self.terminated {
            self.inst(format!("br label %{step_label}"));
        }

        self.begin_block(&step_label);
        self.emit_value(&children[2])?;
        self.inst(format!("br label %{cond_label}"));

        self.begin_block(&end_label);
        Ok(())
    }

    fn emit_declaration(&mut self, stmt: &Expression) -> Result<(), CodegenError> {
        let children = stmt.children();
        if children.len() != 2 {
            return Err(self.unexpected(stmt));
        }
        let variable = &children[0];
        let name = match variable.text() {
            Some(name) => name.to_string(),
            None => return Err(self.unexpected(variable)),
        };
        let declared = self.type_of(variable)?;
        let ty = llvm_type(&declared);

        let value = self.emit_value(&children[1])?;
        let addr = self.fresh_tmp();
        self.inst(format!("{addr} = alloca {ty}"));
        self.inst(format!("store {ty} {value}, {ty}* {addr}"));
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, Slot { ty: declared, addr });
        }
        Ok(())
    }

    fn emit_value(&mut self, expr: &Expression) -> Result<String, CodegenError> {
        match expr.kind {
            ExprKind::Literal => self.emit_literal(expr),
            ExprKind::Variable => {
                let name = expr.text().unwrap_or_default();
                let slot = self.find_slot(name)?;
                let ty = llvm_type(&slot.ty);
                let out = self.fresh_tmp();
                self.inst(format!("{out} = load {ty}, {ty}* {}", slot.addr));
                Ok(out)
            }
            ExprKind::VariableAssignment => {
                let children = expr.children();
                let ty = llvm_type(&self.type_of(&children[0])?);
                let addr = self.emit_address(&children[0])?;
                let value = self.emit_value(&children[1])?;
                self.inst(format!("store {ty} {value}, {ty}* {addr}"));
                Ok(value)
            }
            ExprKind::Plus | ExprKind::Minus | ExprKind::Multiply | ExprKind::Divide => {
                self.emit_arithmetic(expr)
            }
            ExprKind::LessThan | ExprKind::GreaterThan | ExprKind::Equal | ExprKind::NotEqual => {
                self.emit_comparison(expr)
            }
            ExprKind::LogicalAnd | ExprKind::LogicalOr => {
                let children = expr.children();
                let lhs = self.emit_value(&children[0])?;
                let rhs = self.emit_value(&children[1])?;
                let op = if expr.kind == ExprKind::LogicalAnd {
                    "and"
                } else {
                    "or"
                };
                let out = self.fresh_tmp();
                self.inst(format!("{out} = {op} i1 {lhs}, {rhs}"));
                Ok(out)
            }
            ExprKind::PostIncrement => self.emit_post_increment(expr),
            ExprKind::FunctionCall => self.emit_call(expr),
            ExprKind::PointerDereference => {
                let children = expr.children();
                let pointer = self.emit_value(&children[0])?;
                let ty = llvm_type(&self.type_of(expr)?);
                let out = self.fresh_tmp();
                self.inst(format!("{out} = load {ty}, {ty}* {pointer}"));
                Ok(out)
            }
            ExprKind::ArraySubscript | ExprKind::MemberAccess => {
                let ty = llvm_type(&self.type_of(expr)?);
                let addr = self.emit_address(expr)?;
                let out = self.fresh_tmp();
                self.inst(format!("{out} = load {ty}, {ty}* {addr}"));
                Ok(out)
            }
            ExprKind::AddressOf => {
                let children = expr.children();
                self.emit_address(&children[0])
            }
            _ => Err(self.unexpected(expr)),
        }
    }

    /// Compute the address of an lvalue; the operand has type `T*` where
    /// `T` is the expression's own type.
    fn emit_address(&mut self, expr: &Expression) -> Result<String, CodegenError> {
        match expr.kind {
            ExprKind::Variable => {
                let name = expr.text().unwrap_or_default();
                let slot = self.find_slot(name)?;
                Ok(slot.addr)
            }
            ExprKind::PointerDereference => {
                let children = expr.children();
                self.emit_value(&children[0])
            }
            ExprKind::ArraySubscript => {
                let children = expr.children();
                let target = &children[0];
                let index = &children[1];
                let target_ty = self.type_of(target)?;
                let index_llvm = llvm_type(&self.type_of(index)?);
                match &target_ty {
                    Type::Array { .. } => {
                        let array_llvm = llvm_type(&target_ty);
                        let base = self.emit_address(target)?;
                        let idx = self.emit_value(index)?;
                        let out = self.fresh_tmp();
                        self.inst(format!(
                            "{out} = getelementptr inbounds {array_llvm}, {array_llvm}* {base}, i64 0, {index_llvm} {idx}"
                        ));
                        Ok(out)
                    }
                    Type::Pointer(pointee) => {
                        let pointee_llvm = llvm_type(pointee);
                        let base = self.emit_value(target)?;
                        let idx = self.emit_value(index)?;
                        let out = self.fresh_tmp();
                        self.inst(format!(
                            "{out} = getelementptr inbounds {pointee_llvm}, {pointee_llvm}* {base}, {index_llvm} {idx}"
                        ));
                        Ok(out)
                    }
                    _ => Err(self.unexpected(target)),
                }
            }
            ExprKind::MemberAccess => {
                let children = expr.children();
                let target = &children[0];
                let field = &children[1];
                let target_ty = self.type_of(target)?;
                let field_name = field.text().unwrap_or_default();
                // The field offset is the real position of the named
                // field, looked up the same way for loads and stores.
                let index = target_ty
                    .fields()
                    .and_then(|fields| fields.iter().position(|f| f.name == field_name))
                    .ok_or_else(|| CodegenError::UnknownField {
                        function: self.function.clone(),
                        name: field_name.to_string(),
                    })?;
                let record_llvm = llvm_type(&target_ty);
                let base = self.emit_address(target)?;
                let out = self.fresh_tmp();
                self.inst(format!(
                    "{out} = getelementptr inbounds {record_llvm}, {record_llvm}* {base}, i32 0, i32 {index}"
                ));
                Ok(out)
            }
            ExprKind::Literal => {
                let ty = self.type_of(expr)?;
                if ty.is_array() || ty.is_record() {
                    self.emit_aggregate_literal(expr, &ty)
                } else {
                    Err(self.unexpected(expr))
                }
            }
            _ => Err(self.unexpected(expr)),
        }
    }

    fn emit_literal(&mut self, expr: &Expression) -> Result<String, CodegenError> {
        let ty = self.type_of(expr)?;
        match (&ty, &expr.value) {
            (Type::Builtin(Builtin::Bool), ExprValue::Bool(value)) => {
                Ok(if *value { "true" } else { "false" }.to_string())
            }
            (Type::Builtin(Builtin::Char), ExprValue::Char(value)) => Ok(value.to_string()),
            (Type::Builtin(_), ExprValue::Int(value)) => Ok(value.to_string()),
            (Type::Builtin(_), ExprValue::Uint(value)) => Ok(value.to_string()),
            (Type::Pointer(_), ExprValue::Str(value)) => Ok(self.string_constant(value)),
            (Type::Array { .. } | Type::Record(_), ExprValue::Children(_)) => {
                let addr = self.emit_aggregate_literal(expr, &ty)?;
                let llvm = llvm_type(&ty);
                let out = self.fresh_tmp();
                self.inst(format!("{out} = load {llvm}, {llvm}* {addr}"));
                Ok(out)
            }
            _ => Err(self.unexpected(expr)),
        }
    }

    /// Materialize an array or record literal into a stack temporary and
    /// return the temporary's address.
    fn emit_aggregate_literal(
        &mut self,
        expr: &Expression,
        ty: &Type,
    ) -> Result<String, CodegenError> {
        let llvm = llvm_type(ty);
        let addr = self.fresh_tmp();
        self.inst(format!("{addr} = alloca {llvm}"));
        match ty {
            Type::Array { element, .. } => {
                let element_llvm = llvm_type(element);
                for (i, child) in expr.children().iter().enumerate() {
                    let value = self.emit_value(child)?;
                    let slot = self.fresh_tmp();
                    self.inst(format!(
                        "{slot} = getelementptr inbounds {llvm}, {llvm}* {addr}, i64 0, i64 {i}"
                    ));
                    self.inst(format!(
                        "store {element_llvm} {value}, {element_llvm}* {slot}"
                    ));
                }
            }
            Type::Record(fields) => {
                for (i, (child, field)) in expr.children().iter().zip(fields).enumerate() {
                    let field_llvm = llvm_type(&field.ty);
                    let value = self.emit_value(child)?;
                    let slot = self.fresh_tmp();
                    self.inst(format!(
                        "{slot} = getelementptr inbounds {llvm}, {llvm}* {addr}, i32 0, i32 {i}"
                    ));
                    self.inst(format!("store {field_llvm} {value}, {field_llvm}* {slot}"));
                }
            }
            _ => return Err(self.unexpected(expr)),
        }
        Ok(addr)
    }

    fn emit_arithmetic(&mut self, expr: &Expression) -> Result<String, CodegenError> {
        let children = expr.children();
        let lhs_ty = self.type_of(&children[0])?;
        let lhs = self.emit_value(&children[0])?;
        let rhs = self.emit_value(&children[1])?;

        if let Type::Pointer(pointee) = &lhs_ty {
            let pointee_llvm = llvm_type(pointee);
            let rhs_llvm = llvm_type(&self.type_of(&children[1])?);
            let offset = if expr.kind == ExprKind::Minus {
                let neg = self.fresh_tmp();
                self.inst(format!("{neg} = sub {rhs_llvm} 0, {rhs}"));
                neg
            } else {
                rhs
            };
            let out = self.fresh_tmp();
            self.inst(format!(
                "{out} = getelementptr inbounds {pointee_llvm}, {pointee_llvm}* {lhs}, {rhs_llvm} {offset}"
            ));
            return Ok(out);
        }

        let op = match expr.kind {
            ExprKind::Plus => "add",
            ExprKind::Minus => "sub",
            ExprKind::Multiply => "mul",
            _ => {
                if lhs_ty.is_signed() {
                    "sdiv"
                } else {
                    "udiv"
                }
            }
        };
        let llvm = llvm_type(&lhs_ty);
        let out = self.fresh_tmp();
        self.inst(format!("{out} = {op} {llvm} {lhs}, {rhs}"));
        Ok(out)
    }

    fn emit_comparison(&mut self, expr: &Expression) -> Result<String, CodegenError> {
        let children = expr.children();
        let operand_ty = self.type_of(&children[0])?;
        let lhs = self.emit_value(&children[0])?;
        let rhs = self.emit_value(&children[1])?;

        let signed = operand_ty.is_signed();
        let pred = match expr.kind {
            ExprKind::LessThan => {
                if signed {
                    "slt"
                } else {
                    "ult"
                }
            }
            ExprKind::GreaterThan => {
                if signed {
                    "sgt"
                } else {
                    "ugt"
                }
            }
            ExprKind::Equal => "eq",
            _ => "ne",
        };
        let llvm = llvm_type(&operand_ty);
        let out = self.fresh_tmp();
        self.inst(format!("{out} = icmp {pred} {llvm} {lhs}, {rhs}"));
        Ok(out)
    }

    fn emit_post_increment(&mut self, expr: &Expression) -> Result<String, CodegenError> {
        let children = expr.children();
        let name = children
            .first()
            .and_then(|c| c.text())
            .unwrap_or_default();
        let slot = self.find_slot(name)?;
        let llvm = llvm_type(&slot.ty);

        let old = self.fresh_tmp();
        self.inst(format!("{old} = load {llvm}, {llvm}* {}", slot.addr));
        let new = self.fresh_tmp();
        if let Type::Pointer(pointee) = &slot.ty {
            let pointee_llvm = llvm_type(pointee);
            self.inst(format!(
                "{new} = getelementptr inbounds {pointee_llvm}, {pointee_llvm}* {old}, i64 1"
            ));
        } else {
            self.inst(format!("{new} = add {llvm} {old}, 1"));
        }
        self.inst(format!("store {llvm} {new}, {llvm}* {}", slot.addr));
        Ok(old)
    }

    fn emit_call(&mut self, expr: &Expression) -> Result<String, CodegenError> {
        let children = expr.children();
        let callee = children
            .first()
            .and_then(|c| c.text())
            .unwrap_or_default()
            .to_string();

        let mut args = Vec::new();
        for arg in &children[1..] {
            let ty = llvm_type(&self.type_of(arg)?);
            let value = self.emit_value(arg)?;
            args.push(format!("{ty} {value}"));
        }

        let ret = llvm_type(&self.type_of(expr)?);
        if ret == "void" {
            self.inst(format!("call void @{callee}({})", args.join(", ")));
            Ok(String::new())
        } else {
            let out = self.fresh_tmp();
            self.inst(format!("{out} = call {ret} @{callee}({})", args.join(", ")));
            Ok(out)
        }
    }

    fn string_constant(&mut self, value: &str) -> String {
        let index = self.strings;
        self.strings += 1;
        let name = format!("@.str.{index}");
        let len = value.len() + 1;
        let _ = writeln!(
            self.globals,
            "{name} = private unnamed_addr constant [{len} x i8] c\"{}\\00\"",
            encode_string(value)
        );
        format!("getelementptr inbounds ([{len} x i8], [{len} x i8]* {name}, i64 0, i64 0)")
    }

    fn find_slot(&self, name: &str) -> Result<Slot, CodegenError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).cloned())
            .ok_or_else(|| CodegenError::UnknownVariable {
                function: self.function.clone(),
                name: name.to_string(),
            })
    }

    fn type_of(&self, expr: &Expression) -> Result<Type, CodegenError> {
        expr.ty.clone().ok_or_else(|| CodegenError::MissingType {
            function: self.function.clone(),
        })
    }

    fn unexpected(&self, expr: &Expression) -> CodegenError {
        CodegenError::UnexpectedExpression {
            function: self.function.clone(),
            kind: expr.kind.name(),
        }
    }

    fn begin_block(&mut self, label: &str) {
        let _ = writeln!(self.code, "{label}:");
        self.terminated = false;
    }

    fn inst(&mut self, text: impl AsRef<str>) {
        self.code.push_str("  ");
        self.code.push_str(text.as_ref());
        self.code.push('\n');
    }

    // Dotted names cannot collide with source identifiers (the language
    // has no '.' in identifiers), and arguments enter the function
    // namespace under their own names.
    fn fresh_tmp(&mut self) -> String {
        let out = format!("%.t{}", self.tmp);
        self.tmp += 1;
        out
    }

    fn fresh_label(&mut self, prefix: &str) -> String {
        let out = format!("{prefix}.{}", self.labels);
        self.labels += 1;
        out
    }
}

fn llvm_type(ty: &Type) -> String {
    match ty {
        Type::Builtin(Builtin::I32) => "i32".to_string(),
        Type::Builtin(Builtin::I64 | Builtin::U64) => "i64".to_string(),
        Type::Builtin(Builtin::Char) => "i8".to_string(),
        Type::Builtin(Builtin::Bool) => "i1".to_string(),
        Type::Builtin(Builtin::Void) => "void".to_string(),
        Type::Pointer(pointee) => format!("{}*", llvm_type(pointee)),
        Type::Array { element, size } => format!("[{size} x {}]", llvm_type(element)),
        Type::Record(fields) => {
            let list: Vec<String> = fields.iter().map(|f| llvm_type(&f.ty)).collect();
            format!("{{ {} }}", list.join(", "))
        }
    }
}

fn encode_string(value: &str) -> String {
    let mut out = String::new();
    for byte in value.bytes() {
        if (0x20..0x7f).contains(&byte) && byte != b'"' && byte != b'\\' {
            out.push(byte as char);
        } else {
            let _ = write!(out, "\\{byte:02X}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tali_core::compile_source;
    use tali_core::span::FileId;

    fn emit(source: &str) -> String {
        let functions = compile_source(FileId(0), source).expect("compile");
        emit_module(&functions, &[]).expect("codegen")
    }

    #[test]
    fn emits_constant_return() {
        let ll = emit("function main() -> i64:\n\treturn 0\n");
        assert!(ll.contains("define i64 @main()"));
        assert!(ll.contains("ret i64 0"));
    }

    #[test]
    fn emits_stack_slots_for_arguments() {
        let ll = emit("function f(x: i64) -> i64:\n\treturn x + 1\n");
        assert!(ll.contains("define i64 @f(i64 %x)"));
        assert!(ll.contains("store i64 %x"));
        assert!(ll.contains("add i64"));
    }

    #[test]
    fn pointer_arithmetic_uses_gep() {
        let ll = emit("function f(p: i64*) -> i64*:\n\treturn p + 1\n");
        assert!(ll.contains("getelementptr inbounds i64, i64*"));
    }

    #[test]
    fn member_access_uses_real_field_index() {
        let source = "struct P:\n\tx: i64\n\ty: i64\nfunction f(p: P) -> i64:\n\treturn p.y\n";
        let ll = emit(source);
        assert!(ll.contains("i32 0, i32 1"));
    }

    #[test]
    fn member_assignment_uses_real_field_index() {
        let source =
            "struct P:\n\tx: i64\n\ty: i64\nfunction f(p: P) -> i64:\n\tp.y = 3\n\treturn p.y\n";
        let ll = emit(source);
        assert!(ll.contains("i32 0, i32 1"));
        assert!(ll.contains("store i64 3"));
    }

    #[test]
    fn unsigned_division_selects_udiv() {
        let ll = emit("function f(a: u64, b: u64) -> u64:\n\treturn a / b\n");
        assert!(ll.contains("udiv i64"));
    }

    #[test]
    fn terminated_blocks_get_no_fallthrough_branch() {
        let source = "function f(c: bool) -> i64:\n\tif c:\n\t\treturn 1\n\treturn 0\n";
        let ll = emit(source);
        assert!(ll.contains("ret i64 1"));
        assert!(ll.contains("ret i64 0"));
        // the then-block ends at its return, not at a branch to the merge
        assert!(!ll.contains("ret i64 1\n  br"));
    }

    #[test]
    fn string_literals_become_globals() {
        let source = "function f() -> char*:\n\treturn \"hi\"\n";
        let ll = emit(source);
        assert!(ll.contains("@.str.0 = private unnamed_addr constant [3 x i8] c\"hi\\00\""));
    }

    #[test]
    fn externs_emit_declares() {
        use tali_core::ast::{FunctionArg, FunctionPrototype};
        use tali_core::types::{Builtin, Type};
        let prototype = FunctionPrototype {
            name: "putchar".to_string(),
            args: vec![FunctionArg {
                name: "c".to_string(),
                ty: Type::Builtin(Builtin::Char),
            }],
            return_type: Type::Builtin(Builtin::Void),
        };
        let ll = emit_module(&[], &[prototype]).expect("codegen");
        assert!(ll.contains("declare void @putchar(i8)"));
    }
}
