use std::collections::{HashMap, HashSet};

use crate::ast::{DefinitionKeyword, Expression, Instruction, Program};

/// Why a program failed validation. The message wording is for humans; the
/// category is what tests and tooling match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Redefinition,
    ValWithoutInitializer,
    UndeclaredIdentifierAssignment,
    ConstAssignment,
    UninitializedVariableRead,
    UndeclaredIdentifierRead,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub message: String,
}

/// Outcome of one validation run. Invalid user programs are an expected,
/// common case, so this is a return value rather than an error: `validate`
/// never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub diagnostic: Option<Diagnostic>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            diagnostic: None,
        }
    }

    pub fn error_message(&self) -> &str {
        self.diagnostic
            .as_ref()
            .map(|diagnostic| diagnostic.message.as_str())
            .unwrap_or("")
    }

    pub fn category(&self) -> Option<DiagnosticCategory> {
        self.diagnostic.as_ref().map(|diagnostic| diagnostic.category)
    }
}

/// Walks the program once in order, tracking per identifier whether it has
/// been declared (and as what) and whether it currently holds a value.
/// Stops at the first invalid instruction.
pub struct ProgramValidator {
    declared_is_constant: HashMap<String, bool>,
    defined: HashSet<String>,
    result: ValidationResult,
}

impl Default for ProgramValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramValidator {
    pub fn new() -> Self {
        Self {
            declared_is_constant: HashMap::new(),
            defined: HashSet::new(),
            result: ValidationResult::ok(),
        }
    }

    pub fn validate(mut self, program: &Program) -> ValidationResult {
        for instruction in &program.instructions {
            self.validate_instruction(instruction);
            if !self.result.valid {
                break;
            }
        }
        self.result
    }

    fn fail(&mut self, category: DiagnosticCategory, message: String) {
        self.result = ValidationResult {
            valid: false,
            diagnostic: Some(Diagnostic { category, message }),
        };
    }

    fn validate_instruction(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::Empty => {}
            Instruction::Definition {
                keyword,
                identifier,
                expression,
            } => {
                if self.declared_is_constant.contains_key(identifier) {
                    self.fail(
                        DiagnosticCategory::Redefinition,
                        format!("Redefinition of '{identifier}'."),
                    );
                    return;
                }
                let is_constant = *keyword == DefinitionKeyword::Val;
                self.declared_is_constant
                    .insert(identifier.clone(), is_constant);

                let Some(expression) = expression else {
                    // The parser already rejects `val x;`; this guards
                    // programs constructed directly.
                    if is_constant {
                        self.fail(
                            DiagnosticCategory::ValWithoutInitializer,
                            format!("Val declaration of '{identifier}' without initialization."),
                        );
                    }
                    return;
                };
                self.validate_expression(expression);
                if self.result.valid {
                    self.defined.insert(identifier.clone());
                }
            }
            Instruction::Assignment {
                identifier,
                expression,
            } => {
                match self.declared_is_constant.get(identifier) {
                    None => {
                        self.fail(
                            DiagnosticCategory::UndeclaredIdentifierAssignment,
                            format!("Use of undeclared identifier '{identifier}'."),
                        );
                        return;
                    }
                    Some(true) => {
                        self.fail(
                            DiagnosticCategory::ConstAssignment,
                            format!("Cannot assign to const variable (val) '{identifier}'."),
                        );
                        return;
                    }
                    Some(false) => {}
                }
                self.validate_expression(expression);
                if self.result.valid {
                    self.defined.insert(identifier.clone());
                }
            }
            Instruction::Printing { expression } => {
                self.validate_expression(expression);
            }
        }
    }

    fn validate_expression(&mut self, expression: &Expression) {
        if !self.result.valid {
            return;
        }
        match expression {
            Expression::StringLiteral(_)
            | Expression::IntLiteral(_)
            | Expression::FloatLiteral(_) => {}
            Expression::Identifier(identifier) => {
                self.validate_identifier_read(identifier);
            }
            Expression::Input { argument } => {
                self.validate_expression(argument);
            }
            Expression::Operation { lhs, rhs, .. } => {
                // Left to right, so the left operand's diagnostic wins when
                // both sides are invalid.
                self.validate_expression(lhs);
                self.validate_expression(rhs);
            }
        }
    }

    fn validate_identifier_read(&mut self, identifier: &str) {
        if self.defined.contains(identifier) {
            return;
        }
        if self.declared_is_constant.contains_key(identifier) {
            self.fail(
                DiagnosticCategory::UninitializedVariableRead,
                format!("Uninitialized variable '{identifier}' cannot be used in expression."),
            );
        } else {
            self.fail(
                DiagnosticCategory::UndeclaredIdentifierRead,
                format!("Use of undeclared identifier '{identifier}'."),
            );
        }
    }
}

/// Validates a program with a fresh validator.
pub fn validate(program: &Program) -> ValidationResult {
    ProgramValidator::new().validate(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse_tokens;

    fn check(source: &str) -> ValidationResult {
        let tokens = tokenize(source).expect("tokenize should succeed");
        let program = parse_tokens(tokens).expect("parse should succeed");
        validate(&program)
    }

    fn assert_category(result: &ValidationResult, category: DiagnosticCategory) {
        assert!(!result.valid);
        assert_eq!(result.category(), Some(category));
        assert!(!result.error_message().is_empty());
    }

    #[test]
    fn accepts_straight_line_program() {
        let result = check("val a = \"Hello\"; val b = \"World\"; print(a + b);");
        assert!(result.valid);
        assert_eq!(result.diagnostic, None);
    }

    #[test]
    fn rejects_read_of_uninitialized_var() {
        let result = check("var x; print(x);");
        assert_category(&result, DiagnosticCategory::UninitializedVariableRead);
    }

    #[test]
    fn accepts_read_after_assignment() {
        let result = check("var x; x = 1; print(x);");
        assert!(result.valid);
    }

    #[test]
    fn rejects_assignment_to_val() {
        let result = check("val x = 1; x = 2;");
        assert_category(&result, DiagnosticCategory::ConstAssignment);

        let result = check("var x = 1; x = 2;");
        assert!(result.valid);
    }

    #[test]
    fn rejects_redefinition_for_any_keyword_pair() {
        for source in [
            "val x = 1; val x = 2;",
            "val x = 1; var x = 2;",
            "var x = 1; val x = 2;",
            "var x = 1; var x = 2;",
            "var x; var x;",
        ] {
            let result = check(source);
            assert_category(&result, DiagnosticCategory::Redefinition);
        }
    }

    #[test]
    fn rejects_assignment_to_undeclared_identifier() {
        let result = check("x = 1;");
        assert_category(&result, DiagnosticCategory::UndeclaredIdentifierAssignment);
    }

    #[test]
    fn rejects_read_of_undeclared_identifier() {
        let result = check("print(x);");
        assert_category(&result, DiagnosticCategory::UndeclaredIdentifierRead);
    }

    #[test]
    fn checks_expressions_inside_input_arguments() {
        let result = check("val x = input(prompt);");
        assert_category(&result, DiagnosticCategory::UndeclaredIdentifierRead);
    }

    #[test]
    fn left_operand_diagnostic_wins() {
        let result = check("var a; print(a + b);");
        assert_category(&result, DiagnosticCategory::UninitializedVariableRead);
        assert!(result.error_message().contains("'a'"));
    }

    #[test]
    fn stops_at_first_invalid_instruction() {
        let result = check("print(x); y = 1;");
        assert_category(&result, DiagnosticCategory::UndeclaredIdentifierRead);
        assert!(result.error_message().contains("'x'"));
    }

    #[test]
    fn val_without_initializer_is_caught_for_handwritten_programs() {
        use crate::ast::{DefinitionKeyword, Instruction, Program};
        let program = Program {
            instructions: vec![Instruction::Definition {
                keyword: DefinitionKeyword::Val,
                identifier: "x".to_string(),
                expression: None,
            }],
        };
        let result = validate(&program);
        assert_category(&result, DiagnosticCategory::ValWithoutInitializer);
    }

    #[test]
    fn failed_definition_does_not_mark_identifier_defined() {
        let result = check("val x = y; print(x);");
        assert_category(&result, DiagnosticCategory::UndeclaredIdentifierRead);
        assert!(result.error_message().contains("'y'"));
    }
}
