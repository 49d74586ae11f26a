use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};

use cpmc::backend::transpiler::Transpiler;
use cpmc::backend::transpiler::cxx::{compile_file, write_temp_file};
use cpmc::validator::validate;
use cpmc::{lexer, parser};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mut target_path = "a.out".to_string();
    let mut emit_cpp = false;
    let mut input_path: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--output" | "-o" => {
                target_path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("Missing target path after {arg}"))?;
            }
            "--emit-cpp" => {
                emit_cpp = true;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {
                if input_path.replace(arg).is_some() {
                    bail!("Only one input file is supported");
                }
            }
        }
    }

    let source = match input_path.as_deref() {
        Some("-") | None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Reading stdin")?;
            buffer
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("Reading {path}"))?,
    };

    let tokens = lexer::tokenize(&source)?;
    let program = parser::parse_tokens(tokens)?;

    let result = validate(&program);
    if !result.valid {
        bail!("Invalid program.\n{}", result.error_message());
    }

    let generated = Transpiler.transpile(&program);

    if emit_cpp {
        print!("{generated}");
        return Ok(());
    }

    let (source_path, _) = write_temp_file(&generated, "")?;
    compile_file(&source_path, Path::new(&target_path), "C++ compilation failed")?;
    let _ = fs::remove_file(&source_path);

    Ok(())
}

fn print_help() {
    println!("cpmc (CPM compiler)");
    println!("Usage:");
    println!("  cpmc <source.cpm> [-o <target>]   compile to an executable");
    println!("  cpmc <source.cpm> --emit-cpp      print the generated C++");
    println!("  cpmc -                            read CPM source from stdin");
}
