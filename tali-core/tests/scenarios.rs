//! End-to-end pipeline runs over complete programs.

use tali_core::ast::{ExprKind, ExprValue};
use tali_core::span::FileId;
use tali_core::types::{Builtin, Type};
use tali_core::{compile_source, CoreError};

fn compile(source: &str) -> Vec<tali_core::ast::Function> {
    compile_source(FileId(0), source).expect("program should compile")
}

fn compile_err(source: &str) -> String {
    match compile_source(FileId(0), source) {
        Ok(_) => panic!("program should not compile"),
        Err(CoreError::Diagnostics(diags)) => diags[0].message.clone(),
        Err(CoreError::Internal(msg)) => panic!("unexpected internal error: {msg}"),
    }
}

#[test]
fn minimal_return() {
    let functions = compile("function main() -> i64:\n\treturn 0\n");
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].prototype.name, "main");

    let body = functions[0].body.children();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].kind, ExprKind::Return);
    let value = &body[0].children()[0];
    assert_eq!(value.kind, ExprKind::Literal);
    assert_eq!(value.value, ExprValue::Int(0));
    assert_eq!(value.ty, Some(Type::Builtin(Builtin::I64)));
}

#[test]
fn variable_and_arithmetic() {
    let functions = compile("function f(x: i64) -> i64:\n\tvar y: i64 = x + 1\n\treturn y\n");
    let body = functions[0].body.children();

    let declaration = &body[0];
    assert_eq!(declaration.kind, ExprKind::VariableDeclaration);
    assert_eq!(declaration.ty, Some(Type::Builtin(Builtin::I64)));

    let sum = &declaration.children()[1];
    assert_eq!(sum.kind, ExprKind::Plus);
    assert_eq!(sum.ty, Some(Type::Builtin(Builtin::I64)));

    let ret = &body[1];
    assert_eq!(ret.children()[0].ty, Some(Type::Builtin(Builtin::I64)));
}

#[test]
fn declaration_type_mismatch_names_the_function() {
    let message = compile_err("function f() -> i64:\n\tvar y: i64 = true\n\treturn y\n");
    assert!(message.starts_with("f:"), "got: {message}");
    assert!(message.contains("mismatch"), "got: {message}");
}

#[test]
fn struct_member_access() {
    let source = "struct P:\n\tx: i64\n\ty: i64\nfunction f(p: P) -> i64:\n\treturn p.x\n";
    let functions = compile(source);
    let ret = &functions[0].body.children()[0];
    let access = &ret.children()[0];
    assert_eq!(access.kind, ExprKind::MemberAccess);
    assert_eq!(access.ty, Some(Type::Builtin(Builtin::I64)));
    // the field child is annotated too
    assert_eq!(access.children()[1].ty, Some(Type::Builtin(Builtin::I64)));
}

#[test]
fn for_loop_scoping() {
    let source = "function f() -> i64:\n\tfor var i: i64 = 0, i < 10, i++:\n\t\treturn i\n\treturn 0\n";
    compile(source);
}

#[test]
fn for_loop_variable_is_not_visible_after_the_loop() {
    let source = "function f() -> i64:\n\tfor var i: i64 = 0, i < 10, i++:\n\t\tcontinue\n\treturn i\n";
    let message = compile_err(source);
    assert!(message.contains("unknown variable 'i'"), "got: {message}");
}

#[test]
fn pointer_arithmetic_keeps_the_pointer_type() {
    let functions = compile("function f(p: i64*) -> i64*:\n\treturn p + 1\n");
    let ret = &functions[0].body.children()[0];
    let sum = &ret.children()[0];
    assert_eq!(sum.kind, ExprKind::Plus);
    assert_eq!(sum.ty, Some(Type::pointer_to(Type::Builtin(Builtin::I64))));
    assert_eq!(
        sum.children()[1].ty,
        Some(Type::Builtin(Builtin::I64)),
        "offset stays an integer"
    );
}

#[test]
fn rendered_types_parse_back_to_the_same_type() {
    let cases = [
        Type::Builtin(Builtin::U64),
        Type::pointer_to(Type::Builtin(Builtin::Char)),
        Type::array_of(Type::pointer_to(Type::Builtin(Builtin::I64)), 4),
        Type::pointer_to(Type::array_of(Type::Builtin(Builtin::Bool), 2)),
    ];
    for ty in cases {
        let source = format!("function f(x: {ty}) -> i64:\n\treturn 0\n");
        let functions = compile(&source);
        assert_eq!(functions[0].prototype.args[0].ty, ty);
    }
}

#[test]
fn nested_negation_folds_to_a_literal() {
    let functions = compile("function f() -> i64:\n\treturn -(-(5))\n");
    let ret = &functions[0].body.children()[0];
    let value = &ret.children()[0];
    assert_eq!(value.kind, ExprKind::Literal);
    assert_eq!(value.value, ExprValue::Int(5));
}

#[test]
fn negation_folds_into_the_literal() {
    let functions = compile("function f() -> i64:\n\treturn -5\n");
    let ret = &functions[0].body.children()[0];
    let value = &ret.children()[0];
    assert_eq!(value.kind, ExprKind::Literal);
    assert_eq!(value.value, ExprValue::Int(-5));
}

#[test]
fn record_literal_assigns_to_declared_record_by_position() {
    let source = "struct P:\n\tx: i64\n\ty: i64\nfunction f() -> i64:\n\tvar p: P = {1, 2}\n\treturn p.y\n";
    compile(source);
}

#[test]
fn array_literal_takes_its_type_from_the_first_element() {
    let source = "function f() -> i64:\n\tvar a: i64[3] = [1, 2, 3]\n\treturn a[0]\n";
    let functions = compile(source);
    let declaration = &functions[0].body.children()[0];
    let literal = &declaration.children()[1];
    assert_eq!(
        literal.ty,
        Some(Type::array_of(Type::Builtin(Builtin::I64), 3))
    );
}

#[test]
fn conditionals_with_elif_and_else() {
    let source = concat!(
        "function f(a: bool, b: bool) -> i64:\n",
        "\tif a:\n",
        "\t\treturn 1\n",
        "\telif b:\n",
        "\t\treturn 2\n",
        "\telse:\n",
        "\t\treturn 3\n",
    );
    let functions = compile(source);
    let conditional = &functions[0].body.children()[0];
    assert_eq!(conditional.kind, ExprKind::Conditional);
    assert_eq!(conditional.children().len(), 5);
}

#[test]
fn void_function_allows_bare_return() {
    compile("function f() -> void:\n\treturn\n");
}

#[test]
fn recursion_within_the_same_function_resolves() {
    let source = "function f(n: i64) -> i64:\n\tif n < 1:\n\t\treturn 0\n\treturn f(n - 1)\n";
    let functions = compile(source);
    let ret = functions[0].body.children().last().unwrap().clone();
    let call = &ret.children()[0];
    assert_eq!(call.kind, ExprKind::FunctionCall);
    assert_eq!(call.children()[0].kind, ExprKind::Callee);
    assert_eq!(call.ty, Some(Type::Builtin(Builtin::I64)));
}

#[test]
fn calling_a_function_declared_later_does_not_resolve() {
    // The callee name is not in the declared set yet, so `g` parses as a
    // variable and the call syntax falls apart.
    let source = "function f() -> i64:\n\treturn g()\nfunction g() -> i64:\n\treturn 0\n";
    assert!(compile_source(FileId(0), source).is_err());
}
