use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use self::cxx::{CPP_RUNTIME, compile_source, run_compiled_binary};
use crate::ast::{DefinitionKeyword, Expression, Instruction, Program};
use crate::backend::{Backend, PreparedBackend};

pub mod cxx;

/// Lowers a validated program to a standalone C++ translation unit.
pub struct Transpiler;

pub struct PreparedTranspiler {
    source_path: PathBuf,
    binary_path: PathBuf,
}

impl Transpiler {
    pub fn transpile(&self, program: &Program) -> String {
        let mut output = String::new();

        output.push_str(CPP_RUNTIME);
        output.push_str("int main() {\n");
        for instruction in &program.instructions {
            self.emit_instruction(instruction, &mut output);
        }
        output.push_str("    return 0;\n");
        output.push_str("}\n");

        output
    }

    fn emit_instruction(&self, instruction: &Instruction, output: &mut String) {
        match instruction {
            // Filtered out by the program parser, but harmless here.
            Instruction::Empty => {}
            Instruction::Definition {
                keyword,
                identifier,
                expression,
            } => {
                let qualifier = match keyword {
                    DefinitionKeyword::Val => "const ",
                    DefinitionKeyword::Var => "",
                };
                match expression {
                    Some(expression) => self.push_line(
                        output,
                        &format!(
                            "{qualifier}cpm::Value {} = {};",
                            Self::mangle(identifier),
                            self.emit_expression(expression)
                        ),
                    ),
                    // Only reachable for var; the validator rejects
                    // uninitialized vals.
                    None => self.push_line(
                        output,
                        &format!("{qualifier}cpm::Value {};", Self::mangle(identifier)),
                    ),
                }
            }
            Instruction::Assignment {
                identifier,
                expression,
            } => {
                self.push_line(
                    output,
                    &format!(
                        "{} = {};",
                        Self::mangle(identifier),
                        self.emit_expression(expression)
                    ),
                );
            }
            Instruction::Printing { expression } => {
                self.push_line(
                    output,
                    &format!("cpm::print({});", self.emit_expression(expression)),
                );
            }
        }
    }

    fn emit_expression(&self, expression: &Expression) -> String {
        match expression {
            // String lexemes still carry their quotes, and CPM supports no
            // escapes, so the lexeme is emitted verbatim.
            Expression::StringLiteral(lexeme) => format!("cpm::Value({lexeme})"),
            Expression::IntLiteral(lexeme) => format!("cpm::Value(INT32_C({lexeme}))"),
            Expression::FloatLiteral(lexeme) => format!("cpm::Value({lexeme}f)"),
            Expression::Identifier(identifier) => Self::mangle(identifier),
            Expression::Input { argument } => {
                format!("cpm::input({})", self.emit_expression(argument))
            }
            Expression::Operation { op, lhs, rhs } => {
                format!(
                    "({}) {} ({})",
                    self.emit_expression(lhs),
                    op.symbol(),
                    self.emit_expression(rhs)
                )
            }
        }
    }

    /// User identifiers are prefixed so they can never collide with runtime
    /// names or C++ keywords.
    fn mangle(identifier: &str) -> String {
        format!("cpm_id_{identifier}")
    }

    fn push_line(&self, output: &mut String, line: &str) {
        output.push_str("    ");
        output.push_str(line);
        output.push('\n');
    }
}

impl Backend for Transpiler {
    fn name(&self) -> &'static str {
        "transpiler"
    }

    fn prepare(&self, program: &Program) -> Result<Box<dyn PreparedBackend>> {
        let source = self.transpile(program);
        let (source_path, binary_path) =
            compile_source(&source, "", "C++ compilation failed in prepare phase")?;
        Ok(Box::new(PreparedTranspiler {
            source_path,
            binary_path,
        }))
    }
}

impl PreparedBackend for PreparedTranspiler {
    fn run(&self) -> Result<String> {
        run_compiled_binary(&self.binary_path, "Transpiled program failed")
    }
}

impl Drop for PreparedTranspiler {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.source_path);
        let _ = fs::remove_file(&self.binary_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse_tokens;

    fn transpile(source: &str) -> String {
        let tokens = tokenize(source).expect("tokenize should succeed");
        let program = parse_tokens(tokens).expect("parse should succeed");
        Transpiler.transpile(&program)
    }

    #[test]
    fn generates_a_complete_translation_unit() {
        let generated = transpile("val a = \"Hello\"; print(a);");
        assert!(generated.starts_with("#include"));
        assert!(generated.contains("int main() {"));
        assert!(generated.trim_end().ends_with('}'));
    }

    #[test]
    fn val_lowers_to_const() {
        let generated = transpile("val a = 1; var b = 2;");
        assert!(generated.contains("const cpm::Value cpm_id_a = cpm::Value(INT32_C(1));"));
        assert!(generated.contains("    cpm::Value cpm_id_b = cpm::Value(INT32_C(2));"));
    }

    #[test]
    fn uninitialized_var_lowers_to_default_constructed_value() {
        let generated = transpile("var x; x = 1;");
        assert!(generated.contains("cpm::Value cpm_id_x;"));
        assert!(generated.contains("cpm_id_x = cpm::Value(INT32_C(1));"));
    }

    #[test]
    fn string_lexeme_is_emitted_verbatim_with_quotes() {
        let generated = transpile("print(\"Hello\");");
        assert!(generated.contains("cpm::print(cpm::Value(\"Hello\"));"));
    }

    #[test]
    fn operations_parenthesize_both_sides() {
        let generated = transpile("print(1 + 2.5);");
        assert!(
            generated.contains("cpm::print((cpm::Value(INT32_C(1))) + (cpm::Value(2.5f)));")
        );
    }

    #[test]
    fn input_lowers_to_runtime_call() {
        let generated = transpile("var x = input(\"? \"); print(x);");
        assert!(generated.contains("cpm::Value cpm_id_x = cpm::input(cpm::Value(\"? \"));"));
    }
}
