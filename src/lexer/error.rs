use thiserror::Error;

/// Typed errors produced while scanning CPM source into tokens.
///
/// Every variant names the offending text so the CLI can point at the
/// exact source slice that failed to scan.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Illegal character '{character}' in source code")]
    IllegalCharacter { character: char },
    #[error("Expected a comment starting with \"//\", found '{found}'")]
    MalformedComment { found: String },
    #[error("A string literal has not been closed before line break: {literal}")]
    UnterminatedStringLine { literal: String },
    #[error("A string literal has not been closed before end of file: {literal}")]
    UnterminatedStringEof { literal: String },
    #[error("A floating-point number literal contains more than one dot: {literal}")]
    MultipleDots { literal: String },
    #[error("A floating-point number literal ends with a dot: {literal}")]
    TrailingDot { literal: String },
}

pub type LexResult<T> = Result<T, LexError>;
