//! Driver behavior: compile a file to IR, render diagnostics on failure.

use std::process::Command;

fn tali_cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tali-cli"))
}

#[test]
fn compiles_a_source_file_to_ll() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source_path = dir.path().join("program.tali");
    std::fs::write(&source_path, "function main() -> i64:\n\treturn 0\n").expect("write source");
    let output_path = dir.path().join("out.ll");

    let status = tali_cli()
        .arg(&source_path)
        .arg("-o")
        .arg(&output_path)
        .status()
        .expect("run tali-cli");
    assert!(status.success());

    let ll = std::fs::read_to_string(&output_path).expect("read output");
    assert!(ll.contains("define i64 @main()"));
    assert!(ll.contains("ret i64 0"));
}

#[test]
fn reports_diagnostics_with_source_location() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source_path = dir.path().join("bad.tali");
    std::fs::write(
        &source_path,
        "function f() -> i64:\n\tvar y: i64 = true\n\treturn y\n",
    )
    .expect("write source");

    let output = tali_cli()
        .arg(&source_path)
        .arg("-o")
        .arg(dir.path().join("out.ll"))
        .output()
        .expect("run tali-cli");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[E0003]: f:"), "stderr: {stderr}");
    assert!(stderr.contains(":2:"), "stderr: {stderr}");
    assert!(stderr.contains("^"), "stderr: {stderr}");
    assert!(stderr.contains("note:"), "stderr: {stderr}");
    assert!(stderr.contains("initializer has type bool"), "stderr: {stderr}");
}

#[test]
fn dump_ast_prints_the_validated_tree() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source_path = dir.path().join("program.tali");
    std::fs::write(&source_path, "function main() -> i64:\n\treturn 7\n").expect("write source");

    let output = tali_cli()
        .arg(&source_path)
        .arg("-o")
        .arg(dir.path().join("out.ll"))
        .arg("--dump-ast")
        .output()
        .expect("run tali-cli");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("function main() -> i64"), "stdout: {stdout}");
    assert!(stdout.contains("literal: 7 : i64"), "stdout: {stdout}");
}
