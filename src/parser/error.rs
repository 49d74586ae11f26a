use thiserror::Error;

/// Parse failures. Both variants carry the offending source snippet and an
/// explanation; the instruction parser rewraps expression errors so the
/// message text survives but the category changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Invalid expression `{snippet}`: {message}")]
    Expression { snippet: String, message: String },
    #[error("Invalid instruction `{snippet}`: {message}")]
    Instruction { snippet: String, message: String },
}

impl SyntaxError {
    pub fn expression(snippet: impl Into<String>, message: impl Into<String>) -> Self {
        SyntaxError::Expression {
            snippet: snippet.into(),
            message: message.into(),
        }
    }

    pub fn instruction(snippet: impl Into<String>, message: impl Into<String>) -> Self {
        SyntaxError::Instruction {
            snippet: snippet.into(),
            message: message.into(),
        }
    }

    /// Rewraps an expression error raised inside a larger instruction.
    pub fn into_instruction(self) -> Self {
        match self {
            SyntaxError::Expression { snippet, message } => {
                SyntaxError::Instruction { snippet, message }
            }
            other => other,
        }
    }
}

pub type ParseResult<T> = Result<T, SyntaxError>;
