use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tali_core::diagnostic::{Diagnostic, Severity};
use tali_core::span::FileId;
use tali_core::{ast, compile_source, CoreError};

mod codegen_llvm;

#[derive(Parser, Debug)]
#[command(version, about = "Compiler for the Tali language", long_about = None)]
struct Cli {
    /// Source file to compile.
    input: PathBuf,

    /// Output path for the generated LLVM IR.
    #[arg(short, long, default_value = "main.ll")]
    output: PathBuf,

    /// Print the validated syntax trees to stdout.
    #[arg(long)]
    dump_ast: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let functions = match compile_source(FileId(0), &source) {
        Ok(functions) => functions,
        Err(CoreError::Diagnostics(diags)) => {
            render_diagnostics(&diags, &cli.input, &source);
            return Err(anyhow!("compilation failed"));
        }
        Err(err) => return Err(anyhow!(err.to_string())),
    };

    if cli.dump_ast {
        for function in &functions {
            print!("{}", ast::render_function(function));
        }
    }

    let ir = codegen_llvm::emit_module(&functions, &[])?;
    write_output(&cli.output, ir.as_bytes())?;
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {parent:?}"))?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("failed to write output file {}", path.display()))?;
    Ok(())
}

fn render_diagnostics(diags: &[Diagnostic], path: &Path, source: &str) {
    for d in diags {
        let severity = match d.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let code_display = match d.code {
            Some(code) => format!("[{code}]"),
            None => String::new(),
        };
        let (line, col) = line_col(source, d.primary.span.start as usize);
        eprintln!("{severity}{code_display}: {message}", message = d.message);
        eprintln!(
            " --> {path}:{line}:{col}",
            path = path.display(),
            line = line + 1,
            col = col + 1
        );
        if let Some(text) = source.lines().nth(line) {
            eprintln!("  {line_num:>4} | {text}", line_num = line + 1);
            eprintln!(
                "       | {spaces}{carets}",
                spaces = " ".repeat(col),
                carets = "^".repeat(d.primary.span.len().max(1) as usize)
            );
        }
        for label in &d.secondary {
            let (l, c) = line_col(source, label.span.start as usize);
            let msg = label.message.as_deref().unwrap_or("");
            eprintln!(
                " note: {path}:{line}:{col}: {msg}",
                path = path.display(),
                line = l + 1,
                col = c + 1
            );
        }
        eprintln!();
    }
}

/// Zero-based line and column of a byte offset. Lines count physical
/// lines, including blank and comment lines the tokenizer skipped.
fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let mut line = 0usize;
    let mut line_start = 0usize;
    for (i, b) in source.bytes().enumerate().take(offset) {
        if b == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    (line, offset - line_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["tali-cli", "program.tali"]);
        assert_eq!(cli.input, PathBuf::from("program.tali"));
        assert_eq!(cli.output, PathBuf::from("main.ll"));
        assert!(!cli.dump_ast);
    }

    #[test]
    fn line_col_counts_physical_lines() {
        let source = "a\n\n# note\n\tb\n";
        let offset = source.find('b').unwrap();
        assert_eq!(line_col(source, offset), (3, 1));
    }
}
