use crate::token::Token;

/// Shared cursor over one tokenized source.
///
/// Every parser component works on the same context by mutable borrow, so
/// nobody copies the token sequence. The position only ever moves forward
/// and never exceeds the sequence length.
pub struct ParsingContext<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> ParsingContext<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn done(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// The token under the cursor. Callers must check `done()` first.
    pub fn current(&self) -> Token<'a> {
        self.tokens[self.pos]
    }

    /// Bounds-checked lookahead by absolute index.
    pub fn get(&self, index: usize) -> Token<'a> {
        self.tokens[index]
    }

    pub fn advance(&mut self) {
        self.advance_by(1);
    }

    pub fn advance_by(&mut self, delta: usize) {
        self.pos = (self.pos + delta).min(self.tokens.len());
    }

    /// Reconstructs a readable source snippet from `start` up to and
    /// including the token under the cursor, for error messages.
    pub fn snippet_from(&self, start: usize) -> String {
        let end = (self.pos + 1).min(self.tokens.len());
        self.tokens[start.min(end)..end]
            .iter()
            .map(|token| token.lexeme)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn context<'a>(lexemes: &[(TokenKind, &'a str)]) -> ParsingContext<'a> {
        ParsingContext::new(
            lexemes
                .iter()
                .map(|&(kind, lexeme)| Token::new(kind, lexeme))
                .collect(),
        )
    }

    #[test]
    fn cursor_moves_forward_and_saturates() {
        let mut ctx = context(&[
            (TokenKind::Keyword, "val"),
            (TokenKind::Identifier, "x"),
            (TokenKind::Delimiter, ";"),
        ]);
        assert!(!ctx.done());
        assert_eq!(ctx.current().lexeme, "val");
        ctx.advance();
        assert_eq!(ctx.current().lexeme, "x");
        ctx.advance_by(5);
        assert_eq!(ctx.position(), 3);
        assert!(ctx.done());
    }

    #[test]
    fn snippet_spans_start_through_current() {
        let mut ctx = context(&[
            (TokenKind::Keyword, "val"),
            (TokenKind::Identifier, "x"),
            (TokenKind::Operator, "="),
            (TokenKind::IntLiteral, "1"),
        ]);
        ctx.advance_by(2);
        assert_eq!(ctx.snippet_from(0), "val x =");
    }
}
