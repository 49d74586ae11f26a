/// Lexical classes produced by the tokenizer.
///
/// `Blank` and `Comment` exist only inside the tokenizer; `tokenize`
/// filters them out before the parser ever sees the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Blank,
    Comment,
    Delimiter,     // ( ) ;
    Operator,      // + - =
    Keyword,       // val var input print
    StringLiteral, // lexeme keeps the surrounding quotes
    IntLiteral,
    FloatLiteral,
    Identifier,
}

/// An atomic slice of CPM source with a concrete meaning.
///
/// The lexeme borrows from the original source text, so reconstructing a
/// source snippet for an error message is just concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a str) -> Self {
        Self { kind, lexeme }
    }

    pub fn is_delimiter(&self, lexeme: &str) -> bool {
        self.kind == TokenKind::Delimiter && self.lexeme == lexeme
    }

    pub fn is_operator(&self, lexeme: &str) -> bool {
        self.kind == TokenKind::Operator && self.lexeme == lexeme
    }
}
