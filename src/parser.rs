use crate::ast::{BinaryOperator, DefinitionKeyword, Expression, Instruction, Program};
use crate::token::{Token, TokenKind};

mod context;
mod error;

pub use context::ParsingContext;
pub use error::{ParseResult, SyntaxError};

/// Recursive-descent parser for a single expression.
///
/// Grammar (one binary tier, right-associative):
///
/// ```text
/// expression   := operatorFree (("+" | "-") expression)?
/// operatorFree := IDENTIFIER | STRING | INT | FLOAT
///               | "(" expression ")"
///               | "input" "(" expression? ")"
/// ```
///
/// The parser stops after one complete expression; trailing tokens are left
/// for the caller, which always knows its own terminator.
pub struct ExpressionParser<'c, 'a> {
    context: &'c mut ParsingContext<'a>,
}

impl<'c, 'a> ExpressionParser<'c, 'a> {
    pub fn new(context: &'c mut ParsingContext<'a>) -> Self {
        Self { context }
    }

    pub fn next_expression(&mut self) -> ParseResult<Expression> {
        if self.context.done() {
            return Err(SyntaxError::expression("", "Expected expression, found EOF."));
        }

        let initial_position = self.context.position();
        let lhs = self.next_operator_free_expression()?;

        if !self.context.done() && self.context.current().kind == TokenKind::Operator {
            let operator_token = self.context.current();
            let Some(op) = BinaryOperator::from_lexeme(operator_token.lexeme) else {
                return Err(SyntaxError::expression(
                    self.context.snippet_from(initial_position),
                    format!("Invalid binary operator \"{}\".", operator_token.lexeme),
                ));
            };
            self.context.advance();
            // Right-recursive on purpose: a + b + c parses as a + (b + c).
            let rhs = self.next_expression()?;
            return Ok(Expression::Operation {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }

        Ok(lhs)
    }

    fn next_operator_free_expression(&mut self) -> ParseResult<Expression> {
        let token = self.context.current();
        match token.kind {
            TokenKind::Identifier => {
                self.context.advance();
                Ok(Expression::Identifier(token.lexeme.to_string()))
            }
            TokenKind::StringLiteral => {
                self.context.advance();
                Ok(Expression::StringLiteral(token.lexeme.to_string()))
            }
            TokenKind::IntLiteral => {
                self.context.advance();
                Ok(Expression::IntLiteral(token.lexeme.to_string()))
            }
            TokenKind::FloatLiteral => {
                self.context.advance();
                Ok(Expression::FloatLiteral(token.lexeme.to_string()))
            }
            TokenKind::Delimiter if token.lexeme == "(" => self.next_bracket_closed_expression(),
            TokenKind::Delimiter => Err(SyntaxError::expression(
                token.lexeme,
                "Expected expression.",
            )),
            TokenKind::Keyword if token.lexeme == "input" => self.next_input_expression(),
            TokenKind::Keyword => Err(SyntaxError::expression(
                token.lexeme,
                format!("Expected expression, found keyword \"{}\".", token.lexeme),
            )),
            _ => Err(SyntaxError::expression(
                token.lexeme,
                format!("Expected expression, found \"{}\".", token.lexeme),
            )),
        }
    }

    fn next_bracket_closed_expression(&mut self) -> ParseResult<Expression> {
        let initial_position = self.context.position();

        self.context.advance(); // "("
        let result = self.next_expression()?;

        if self.context.done() || !self.context.current().is_delimiter(")") {
            let found = if self.context.done() {
                "EOF".to_string()
            } else {
                format!("\"{}\"", self.context.current().lexeme)
            };
            return Err(SyntaxError::expression(
                self.context.snippet_from(initial_position),
                format!("Expected closing bracket \")\", found {found}."),
            ));
        }

        self.context.advance(); // ")"
        Ok(result)
    }

    fn next_input_expression(&mut self) -> ParseResult<Expression> {
        let initial_position = self.context.position();

        self.context.advance(); // "input"

        if self.context.done() || !self.context.current().is_delimiter("(") {
            let found = if self.context.done() {
                "EOF".to_string()
            } else {
                format!("\"{}\"", self.context.current().lexeme)
            };
            return Err(SyntaxError::expression(
                self.context.snippet_from(initial_position),
                format!("Expected opening bracket \"(\" after \"input\" keyword, found {found}."),
            ));
        }

        let bracket_position = self.context.position();
        if bracket_position + 1 >= self.context.size() {
            return Err(SyntaxError::expression(
                self.context.snippet_from(initial_position),
                "Expected an expression or closing bracket \")\" after opening bracket \"(\", \
                 found EOF.",
            ));
        }

        if self.context.get(bracket_position + 1).is_delimiter(")") {
            // input() is sugar for input("")
            self.context.advance_by(2);
            return Ok(Expression::Input {
                argument: Box::new(Expression::empty_input_argument()),
            });
        }

        let argument = self.next_bracket_closed_expression()?;
        Ok(Expression::Input {
            argument: Box::new(argument),
        })
    }
}

/// Parses exactly one instruction per call, dispatching on the leading
/// token. On success the cursor has advanced past the whole instruction,
/// including its terminating semicolon.
pub struct InstructionParser<'c, 'a> {
    context: &'c mut ParsingContext<'a>,
}

impl<'c, 'a> InstructionParser<'c, 'a> {
    pub fn new(context: &'c mut ParsingContext<'a>) -> Self {
        Self { context }
    }

    pub fn next_instruction(&mut self) -> ParseResult<Instruction> {
        if self.context.done() {
            return Err(SyntaxError::instruction("", "Expected instruction, found EOF."));
        }

        let token = self.context.current();
        match token.kind {
            TokenKind::Delimiter => {
                if token.lexeme == ";" {
                    self.context.advance();
                    return Ok(Instruction::Empty);
                }
                if token.lexeme == "(" {
                    return self.next_expression_as_empty_instruction();
                }
                Err(SyntaxError::instruction(
                    token.lexeme,
                    format!("Expected an instruction, found a delimiter \"{}\".", token.lexeme),
                ))
            }
            TokenKind::Operator => Err(SyntaxError::instruction(
                token.lexeme,
                format!("Expected an instruction, found an operator \"{}\".", token.lexeme),
            )),
            TokenKind::Keyword => match token.lexeme {
                "val" | "var" => self.next_definition(),
                "print" => self.next_printing(),
                "input" => self.next_expression_as_empty_instruction(),
                other => Err(SyntaxError::instruction(
                    other,
                    format!("Expected an instruction, found keyword \"{other}\"."),
                )),
            },
            TokenKind::Identifier => self.next_assignment_or_unused_identifier(),
            _ => self.next_expression_as_empty_instruction(),
        }
    }

    fn next_expression(&mut self) -> ParseResult<Expression> {
        ExpressionParser::new(self.context)
            .next_expression()
            .map_err(SyntaxError::into_instruction)
    }

    /// An expression in statement position has no effect; it still must be
    /// well formed and semicolon-terminated.
    fn next_expression_as_empty_instruction(&mut self) -> ParseResult<Instruction> {
        let initial_position = self.context.position();

        self.next_expression()?;
        self.expect_semicolon(initial_position, "after expression")?;

        Ok(Instruction::Empty)
    }

    fn next_definition(&mut self) -> ParseResult<Instruction> {
        let initial_position = self.context.position();

        let keyword = if self.context.current().lexeme == "val" {
            DefinitionKeyword::Val
        } else {
            DefinitionKeyword::Var
        };
        self.context.advance();

        if self.context.done() {
            return Err(SyntaxError::instruction(
                self.context.snippet_from(initial_position),
                "Expected an identifier, found EOF.",
            ));
        }
        if self.context.current().kind != TokenKind::Identifier {
            return Err(SyntaxError::instruction(
                self.context.snippet_from(initial_position),
                format!("Expected an identifier, found \"{}\".", self.context.current().lexeme),
            ));
        }
        let identifier = self.context.current().lexeme.to_string();
        self.context.advance();

        if self.context.done() || !self.context.current().is_operator("=") {
            // Either a declaration without initialization, or invalid.
            let found = if self.context.done() {
                "EOF".to_string()
            } else {
                format!("\"{}\"", self.context.current().lexeme)
            };

            if keyword == DefinitionKeyword::Val {
                // An initializer is mandatory for val.
                return Err(SyntaxError::instruction(
                    self.context.snippet_from(initial_position),
                    format!(
                        "Expected initializer for val-declaration of \"{identifier}\", \
                         found {found}."
                    ),
                ));
            }

            if !self.context.done() && self.context.current().is_delimiter(";") {
                self.context.advance();
                return Ok(Instruction::Definition {
                    keyword,
                    identifier,
                    expression: None,
                });
            }

            return Err(SyntaxError::instruction(
                self.context.snippet_from(initial_position),
                format!(
                    "Expected either operator \"=\" or semicolon after the declaration of \
                     \"{identifier}\", found {found}."
                ),
            ));
        }
        self.context.advance(); // "="

        let expression = self.next_expression()?;
        self.expect_semicolon(
            initial_position,
            &format!("after the definition of \"{identifier}\""),
        )?;

        Ok(Instruction::Definition {
            keyword,
            identifier,
            expression: Some(expression),
        })
    }

    fn next_printing(&mut self) -> ParseResult<Instruction> {
        let initial_position = self.context.position();

        self.context.advance(); // "print"

        if self.context.done() || !self.context.current().is_delimiter("(") {
            let found = if self.context.done() {
                "EOF".to_string()
            } else {
                format!("\"{}\"", self.context.current().lexeme)
            };
            return Err(SyntaxError::instruction(
                self.context.snippet_from(initial_position),
                format!("Expected opening bracket after \"print\", found {found}."),
            ));
        }
        self.context.advance(); // "("

        let expression = self.next_expression()?;

        if self.context.done() || !self.context.current().is_delimiter(")") {
            let found = if self.context.done() {
                "EOF".to_string()
            } else {
                format!("\"{}\"", self.context.current().lexeme)
            };
            return Err(SyntaxError::instruction(
                self.context.snippet_from(initial_position),
                format!("Expected closing bracket, found {found}."),
            ));
        }
        self.context.advance(); // ")"

        self.expect_semicolon(initial_position, "after \"print\"")?;

        Ok(Instruction::Printing { expression })
    }

    fn next_assignment_or_unused_identifier(&mut self) -> ParseResult<Instruction> {
        let initial_position = self.context.position();

        let identifier = self.context.current().lexeme.to_string();
        self.context.advance();

        if self.context.done() {
            return Err(SyntaxError::instruction(
                self.context.snippet_from(initial_position),
                "Expected an operator \"=\" or semicolon, found EOF.",
            ));
        }

        if self.context.current().is_delimiter(";") {
            // A bare identifier in statement position: an unused expression.
            self.context.advance();
            return Ok(Instruction::Empty);
        }

        if self.context.current().is_operator("=") {
            self.context.advance();

            let expression = self.next_expression()?;
            self.expect_semicolon(initial_position, "after assignment")?;

            return Ok(Instruction::Assignment {
                identifier,
                expression,
            });
        }

        Err(SyntaxError::instruction(
            self.context.snippet_from(initial_position),
            format!("Expected an operator \"=\", found \"{}\".", self.context.current().lexeme),
        ))
    }

    fn expect_semicolon(&mut self, initial_position: usize, place: &str) -> ParseResult<()> {
        if self.context.done() {
            return Err(SyntaxError::instruction(
                self.context.snippet_from(initial_position),
                format!("Expected a semicolon {place}, found EOF."),
            ));
        }
        if !self.context.current().is_delimiter(";") {
            return Err(SyntaxError::instruction(
                self.context.snippet_from(initial_position),
                format!(
                    "Expected a semicolon {place}, found \"{}\".",
                    self.context.current().lexeme
                ),
            ));
        }
        self.context.advance();
        Ok(())
    }
}

/// Parses instructions until the token stream is exhausted. `Empty`
/// instructions are dropped; the first syntax error aborts the whole parse.
pub struct ProgramParser<'c, 'a> {
    context: &'c mut ParsingContext<'a>,
}

impl<'c, 'a> ProgramParser<'c, 'a> {
    pub fn new(context: &'c mut ParsingContext<'a>) -> Self {
        Self { context }
    }

    pub fn parse(&mut self) -> ParseResult<Program> {
        let mut instructions = Vec::new();
        while !self.context.done() {
            let instruction = InstructionParser::new(self.context).next_instruction()?;
            if instruction == Instruction::Empty {
                continue;
            }
            instructions.push(instruction);
        }
        Ok(Program { instructions })
    }
}

/// Convenience entry point over a freshly tokenized sequence.
pub fn parse_tokens(tokens: Vec<Token<'_>>) -> ParseResult<Program> {
    let mut context = ParsingContext::new(tokens);
    ProgramParser::new(&mut context).parse()
}
