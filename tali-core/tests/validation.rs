//! Validator rules: scope resolution, operand typing, and the extern
//! registration contract.

use tali_core::ast::{
    ExprKind, ExprValue, Expression, Function, FunctionArg, FunctionPrototype,
};
use tali_core::span::{FileId, Span};
use tali_core::types::{Builtin, Type};
use tali_core::validator::Validator;
use tali_core::{compile_source, CoreError};

fn compile_err(source: &str) -> String {
    match compile_source(FileId(0), source) {
        Ok(_) => panic!("program should not validate"),
        Err(CoreError::Diagnostics(diags)) => diags[0].message.clone(),
        Err(CoreError::Internal(msg)) => panic!("unexpected internal error: {msg}"),
    }
}

#[test]
fn unknown_variables_are_rejected() {
    let message = compile_err("function f() -> i64:\n\treturn y\n");
    assert!(message.contains("unknown variable 'y'"), "got: {message}");
}

#[test]
fn conditions_must_be_boolean() {
    let message = compile_err("function f() -> i64:\n\tif 1:\n\t\treturn 0\n\treturn 0\n");
    assert!(message.contains("condition is not a boolean"), "got: {message}");
}

#[test]
fn for_loop_conditions_must_be_boolean() {
    let message =
        compile_err("function f() -> i64:\n\tfor var i: i64 = 0, i + 1, i++:\n\t\tbreak\n\treturn 0\n");
    assert!(
        message.contains("for loop condition is not a boolean"),
        "got: {message}"
    );
}

#[test]
fn void_variables_cannot_be_declared() {
    let message = compile_err("function f() -> i64:\n\tvar x: void = 0\n\treturn 0\n");
    assert!(message.contains("void"), "got: {message}");
}

#[test]
fn assignment_targets_must_be_lvalues() {
    let message = compile_err("function f() -> i64:\n\t1 = 2\n\treturn 0\n");
    assert!(message.contains("assignment target"), "got: {message}");
}

#[test]
fn assignment_through_a_dereference_is_allowed() {
    compile_source(
        FileId(0),
        "function f(p: i64*) -> i64:\n\t*p = 3\n\treturn *p\n",
    )
    .expect("program should validate");
}

#[test]
fn return_must_match_the_function_type() {
    let message = compile_err("function f() -> i64:\n\treturn true\n");
    assert!(
        message.contains("return type does not match"),
        "got: {message}"
    );
}

#[test]
fn bare_return_requires_a_void_function() {
    let message = compile_err("function f() -> i64:\n\treturn\n");
    assert!(
        message.contains("return type does not match"),
        "got: {message}"
    );
}

#[test]
fn arithmetic_operands_must_match() {
    let message = compile_err("function f(a: i64, b: u64) -> i64:\n\treturn a + b\n");
    assert!(message.contains("mismatch"), "got: {message}");
}

#[test]
fn pointers_only_allow_additive_arithmetic() {
    let message = compile_err("function f(p: i64*) -> i64*:\n\treturn p * 2\n");
    assert!(
        message.contains("only + and - operations are allowed on pointers"),
        "got: {message}"
    );
}

#[test]
fn booleans_are_not_comparable() {
    let message = compile_err("function f() -> bool:\n\treturn true < false\n");
    assert!(message.contains("not comparable"), "got: {message}");
}

#[test]
fn chars_are_comparable() {
    compile_source(
        FileId(0),
        "function f(c: char) -> bool:\n\treturn c == 'x'\n",
    )
    .expect("program should validate");
}

#[test]
fn logical_operands_must_be_boolean() {
    let message = compile_err("function f() -> bool:\n\treturn 1 and 2\n");
    assert!(
        message.contains("logical operand is not a boolean"),
        "got: {message}"
    );
}

#[test]
fn post_increment_requires_a_variable() {
    let message = compile_err("function f() -> i64:\n\treturn 5++\n");
    assert!(
        message.contains("post increment operand is not a variable"),
        "got: {message}"
    );
}

#[test]
fn address_of_requires_a_variable() {
    let message = compile_err("function f() -> i64*:\n\treturn &5\n");
    assert!(
        message.contains("address-of operand is not a variable"),
        "got: {message}"
    );
}

#[test]
fn negation_requires_a_literal() {
    let message = compile_err("function f(x: i64) -> i64:\n\treturn -x\n");
    assert!(
        message.contains("negate operand is not a literal"),
        "got: {message}"
    );
}

#[test]
fn negation_requires_a_signed_type() {
    let message = compile_err("function f() -> u64:\n\treturn -1u64\n");
    assert!(
        message.contains("signed integer"),
        "got: {message}"
    );
}

#[test]
fn dereferencing_a_non_pointer_is_rejected() {
    let message = compile_err("function f(x: i64) -> i64:\n\treturn *x\n");
    assert!(
        message.contains("dereference operand is not a pointer"),
        "got: {message}"
    );
}

#[test]
fn subscripts_work_on_arrays_and_pointers() {
    compile_source(
        FileId(0),
        "function f(p: i64*, n: i64) -> i64:\n\tvar a: i64[2] = [1, 2]\n\treturn a[0] + p[n]\n",
    )
    .expect("program should validate");
}

#[test]
fn subscript_indices_must_be_integers() {
    let message = compile_err("function f(p: i64*) -> i64:\n\treturn p[true]\n");
    assert!(
        message.contains("subscript index is not an integer"),
        "got: {message}"
    );
}

#[test]
fn unknown_record_fields_are_rejected() {
    let source = "struct P:\n\tx: i64\nfunction f(p: P) -> i64:\n\treturn p.z\n";
    let message = compile_err(source);
    assert!(message.contains("unknown record field 'z'"), "got: {message}");
}

#[test]
fn member_access_requires_a_record() {
    let message = compile_err("function f(x: i64) -> i64:\n\treturn x.y\n");
    assert!(
        message.contains("member access target is not a record"),
        "got: {message}"
    );
}

#[test]
fn call_arity_must_match() {
    let message = compile_err("function f(x: i64) -> i64:\n\treturn f(1, 2)\n");
    assert!(message.contains("argument count"), "got: {message}");
}

#[test]
fn call_argument_types_must_match() {
    let message = compile_err("function f(x: i64) -> i64:\n\treturn f(true)\n");
    assert!(
        message.contains("call argument types mismatch"),
        "got: {message}"
    );
}

#[test]
fn inner_scopes_shadow_outer_declarations() {
    let source = concat!(
        "function f() -> i64:\n",
        "\tvar x: i64 = 1\n",
        "\t\tvar x: bool = true\n",
        "\treturn x\n",
    );
    compile_source(FileId(0), source).expect("program should validate");
}

#[test]
fn errors_are_prefixed_with_the_function_name() {
    let message = compile_err("function outer() -> i64:\n\treturn missing\n");
    assert!(message.starts_with("outer:"), "got: {message}");
}

#[test]
fn type_errors_carry_the_type_code() {
    match compile_source(FileId(0), "function f() -> i64:\n\treturn missing\n") {
        Err(CoreError::Diagnostics(diags)) => assert_eq!(diags[0].code, Some("E0003")),
        other => panic!("expected a diagnostic, got {other:?}"),
    }
}

#[test]
fn declaration_mismatches_point_at_the_initializer() {
    match compile_source(FileId(0), "function f() -> i64:\n\tvar y: i64 = true\n\treturn y\n") {
        Err(CoreError::Diagnostics(diags)) => {
            let diag = &diags[0];
            assert_eq!(diag.code, Some("E0003"));
            assert_eq!(diag.secondary.len(), 1);
            let note = diag.secondary[0].message.as_deref().unwrap_or("");
            assert!(note.contains("bool"), "got: {note}");
        }
        other => panic!("expected a diagnostic, got {other:?}"),
    }
}

fn span() -> Span {
    Span::dummy()
}

fn literal_i64(value: i64) -> Expression {
    Expression::new(
        ExprKind::Literal,
        Some(Type::Builtin(Builtin::I64)),
        ExprValue::Int(value),
        span(),
    )
}

/// Drives the code-generator handoff contract directly: an extern
/// prototype registered up front makes calls to it type-check.
#[test]
fn registered_externs_resolve_in_calls() {
    let mut validator = Validator::new();
    validator.register_extern(FunctionPrototype {
        name: "host_add".into(),
        args: vec![
            FunctionArg {
                name: "a".into(),
                ty: Type::Builtin(Builtin::I64),
            },
            FunctionArg {
                name: "b".into(),
                ty: Type::Builtin(Builtin::I64),
            },
        ],
        return_type: Type::Builtin(Builtin::I64),
    });

    let call = Expression::new(
        ExprKind::FunctionCall,
        None,
        ExprValue::Children(vec![
            Expression::new(
                ExprKind::Callee,
                None,
                ExprValue::Str("host_add".into()),
                span(),
            ),
            literal_i64(1),
            literal_i64(2),
        ]),
        span(),
    );
    let ret = Expression::new(
        ExprKind::Return,
        None,
        ExprValue::Children(vec![call]),
        span(),
    );
    let body = Expression::new(ExprKind::Scope, None, ExprValue::Children(vec![ret]), span());
    let mut function = Function {
        prototype: FunctionPrototype {
            name: "main".into(),
            args: Vec::new(),
            return_type: Type::Builtin(Builtin::I64),
        },
        body,
    };

    validator
        .validate_function(&mut function)
        .expect("call to a registered extern should validate");

    let call = &function.body.children()[0].children()[0];
    assert_eq!(call.ty, Some(Type::Builtin(Builtin::I64)));
}

#[test]
fn unregistered_functions_do_not_resolve() {
    let call = Expression::new(
        ExprKind::FunctionCall,
        None,
        ExprValue::Children(vec![Expression::new(
            ExprKind::Callee,
            None,
            ExprValue::Str("missing".into()),
            span(),
        )]),
        span(),
    );
    let body = Expression::new(
        ExprKind::Scope,
        None,
        ExprValue::Children(vec![call]),
        span(),
    );
    let mut function = Function {
        prototype: FunctionPrototype {
            name: "main".into(),
            args: Vec::new(),
            return_type: Type::Builtin(Builtin::Void),
        },
        body,
    };

    let err = Validator::new()
        .validate_function(&mut function)
        .expect_err("unknown function should be rejected");
    match err {
        CoreError::Diagnostics(diags) => {
            assert!(diags[0].message.contains("unknown function 'missing'"));
        }
        CoreError::Internal(msg) => panic!("unexpected internal error: {msg}"),
    }
}
