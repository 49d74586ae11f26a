/// An expression tree node.
///
/// Literal variants carry the raw lexeme from the source (string literals
/// keep their quotes); numeric parsing is deferred to the generated
/// program's runtime.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    StringLiteral(String),
    IntLiteral(String),
    FloatLiteral(String),
    Identifier(String),
    Input {
        argument: Box<Expression>,
    },
    Operation {
        op: BinaryOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
}

impl Expression {
    /// The argument `input()` desugars to: an empty string literal.
    pub fn empty_input_argument() -> Expression {
        Expression::StringLiteral("\"\"".to_string())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Sub,
}

impl BinaryOperator {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "+" => Some(BinaryOperator::Add),
            "-" => Some(BinaryOperator::Sub),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
        }
    }
}

/// One CPM statement.
///
/// `Empty` covers both the bare semicolon and an evaluated-but-unused
/// expression; the program parser filters these out.
#[derive(Debug, PartialEq, Clone)]
pub enum Instruction {
    Empty,
    Definition {
        keyword: DefinitionKeyword,
        identifier: String,
        expression: Option<Expression>,
    },
    Assignment {
        identifier: String,
        expression: Expression,
    },
    Printing {
        expression: Expression,
    },
}

/// `val` declares a constant, `var` a mutable variable. Only `var` may be
/// declared without an initializer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DefinitionKeyword {
    Val,
    Var,
}

impl DefinitionKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKeyword::Val => "val",
            DefinitionKeyword::Var => "var",
        }
    }
}

/// An ordered sequence of instructions; order is execution order.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}
