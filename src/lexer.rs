use std::{iter::Peekable, str::CharIndices};

use crate::token::{Token, TokenKind};

mod error;

pub use error::{LexError, LexResult};

const COMMENT_CHAR: char = '/';
const STRING_DELIMITER: char = '"';

const KEYWORDS: [&str; 4] = ["val", "var", "input", "print"];

/// Splits CPM source code into a sequence of tokens.
///
/// One left-to-right scan; each position is classified by its first
/// character and handed to a sub-scanner that consumes a maximal run
/// and yields exactly one token.
pub struct Tokenizer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn is_delimiter_char(c: char) -> bool {
        c == '(' || c == ')' || c == ';'
    }

    fn is_operator_char(c: char) -> bool {
        c == '+' || c == '-' || c == '='
    }

    fn is_numeric_char(c: char) -> bool {
        c == '.' || c.is_ascii_digit()
    }

    fn is_word_char(c: char) -> bool {
        c == '_' || c.is_alphanumeric()
    }

    fn next_token(&mut self) -> LexResult<Token<'a>> {
        let (start, c) = *self.chars.peek().expect("next_token called at end of input");

        if c.is_whitespace() {
            return Ok(self.next_blank_token(start));
        }
        if c == COMMENT_CHAR {
            return self.next_comment_token(start);
        }
        if Self::is_delimiter_char(c) {
            self.chars.next();
            return Ok(Token::new(TokenKind::Delimiter, self.slice_from(start)));
        }
        if Self::is_operator_char(c) {
            self.chars.next();
            return Ok(Token::new(TokenKind::Operator, self.slice_from(start)));
        }
        if c == STRING_DELIMITER {
            return self.next_string_literal_token(start);
        }
        if Self::is_numeric_char(c) {
            return self.next_numeric_literal_token(start);
        }
        if Self::is_word_char(c) {
            return Ok(self.next_word_token(start));
        }
        Err(LexError::IllegalCharacter { character: c })
    }

    fn next_blank_token(&mut self, start: usize) -> Token<'a> {
        self.chars.next();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Blank, self.slice_from(start))
    }

    fn next_comment_token(&mut self, start: usize) -> LexResult<Token<'a>> {
        self.chars.next();
        match self.chars.peek() {
            Some(&(_, c)) if c == COMMENT_CHAR => {
                self.chars.next();
            }
            _ => {
                return Err(LexError::MalformedComment {
                    found: self.slice_from(start).to_string(),
                });
            }
        }
        // Read through end-of-line, exclusive of the newline itself.
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            self.chars.next();
        }
        Ok(Token::new(TokenKind::Comment, self.slice_from(start)))
    }

    fn next_string_literal_token(&mut self, start: usize) -> LexResult<Token<'a>> {
        self.chars.next(); // opening quote
        while let Some(&(_, c)) = self.chars.peek() {
            if c == STRING_DELIMITER {
                self.chars.next(); // closing quote
                return Ok(Token::new(TokenKind::StringLiteral, self.slice_from(start)));
            }
            if c == '\n' {
                return Err(LexError::UnterminatedStringLine {
                    literal: self.slice_from(start).to_string(),
                });
            }
            self.chars.next();
        }
        Err(LexError::UnterminatedStringEof {
            literal: self.slice_from(start).to_string(),
        })
    }

    fn next_numeric_literal_token(&mut self, start: usize) -> LexResult<Token<'a>> {
        let mut dot_count = 0;
        while let Some(&(_, c)) = self.chars.peek() {
            if !Self::is_numeric_char(c) {
                break;
            }
            if c == '.' {
                dot_count += 1;
            }
            self.chars.next();
        }

        let lexeme = self.slice_from(start);
        if dot_count > 1 {
            return Err(LexError::MultipleDots {
                literal: lexeme.to_string(),
            });
        }
        if lexeme.ends_with('.') {
            return Err(LexError::TrailingDot {
                literal: lexeme.to_string(),
            });
        }
        if dot_count == 0 {
            Ok(Token::new(TokenKind::IntLiteral, lexeme))
        } else {
            Ok(Token::new(TokenKind::FloatLiteral, lexeme))
        }
    }

    fn next_word_token(&mut self, start: usize) -> Token<'a> {
        while let Some(&(_, c)) = self.chars.peek() {
            if Self::is_word_char(c) {
                self.chars.next();
            } else {
                break;
            }
        }
        let lexeme = self.slice_from(start);
        let kind = if KEYWORDS.contains(&lexeme) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, lexeme)
    }

    fn slice_from(&mut self, start: usize) -> &'a str {
        let end = self
            .chars
            .peek()
            .map(|&(idx, _)| idx)
            .unwrap_or(self.input.len());
        &self.input[start..end]
    }
}

/// Tokenizes CPM source, dropping `Blank` and `Comment` tokens whose only
/// purpose was separating the others.
pub fn tokenize(input: &str) -> LexResult<Vec<Token<'_>>> {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    while tokenizer.chars.peek().is_some() {
        let token = tokenizer.next_token()?;
        if matches!(token.kind, TokenKind::Blank | TokenKind::Comment) {
            continue;
        }
        tokens.push(token);
    }
    Ok(tokens)
}
