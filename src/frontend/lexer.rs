//! Lexer for PL/0
//!
//! Pull-based: the parser asks for one token at a time, so only the current
//! token is ever live.

use std::num::{IntErrorKind, ParseIntError};

use log::trace;

use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result};

/// The lexer state
pub struct Lexer {
    /// Source code as characters
    source: Vec<char>,
    /// Current position in source
    pos: usize,
    /// Newlines consumed so far, starting at 1
    line: usize,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    /// Current line number
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the current character without advancing.
    /// A NUL terminates the buffer just like running off its end.
    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied().filter(|&c| c != '\0')
    }

    /// Advance to the next character
    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.line)
    }

    /// Skip whitespace and `{ ... }` comments
    fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    self.line += 1;
                }
                '{' => {
                    self.advance();
                    self.skip_comment()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Consume a comment body up to and including the closing brace
    fn skip_comment(&mut self) -> Result<()> {
        loop {
            match self.advance() {
                Some('}') => return Ok(()),
                Some('\n') => self.line += 1,
                Some(_) => {}
                None => return Err(Error::UnterminatedComment { line: self.line }),
            }
        }
    }

    /// Consume the longest run of characters matching `pred`
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.source[start..self.pos].iter().collect()
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) -> Token {
        let text = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let kind = TokenKind::keyword_from_str(&text).unwrap_or(TokenKind::Ident(text));
        self.make_token(kind)
    }

    /// Read a number literal; `_` groups digits and is ignored
    fn read_number(&mut self) -> Result<Token> {
        let lexeme = self.take_while(|c| c.is_ascii_digit() || c == '_');
        let digits: String = lexeme.chars().filter(|&c| c != '_').collect();

        let value: u64 = digits.parse().map_err(|e: ParseIntError| match e.kind() {
            IntErrorKind::PosOverflow => Error::NumberTooLarge {
                lexeme: lexeme.clone(),
                line: self.line,
            },
            _ => Error::InvalidNumber {
                lexeme: lexeme.clone(),
                line: self.line,
            },
        })?;
        let value = i64::try_from(value).map_err(|_| Error::NumberTooLarge {
            lexeme: lexeme.clone(),
            line: self.line,
        })?;

        Ok(self.make_token(TokenKind::Number(value)))
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace()?;

        let Some(c) = self.peek() else {
            return Ok(Token::eof(self.line));
        };

        // Identifiers and keywords
        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.read_identifier());
        }

        // Numbers
        if c.is_ascii_digit() {
            return self.read_number();
        }

        self.advance();

        if let Some(kind) = TokenKind::from_punct(c) {
            return Ok(self.make_token(kind));
        }

        match c {
            ':' => match self.peek() {
                Some('=') => {
                    self.advance();
                    Ok(self.make_token(TokenKind::Assign))
                }
                next => Err(Error::UnknownToken {
                    text: format!(":{}", next.map(String::from).unwrap_or_default()),
                    line: self.line,
                }),
            },
            _ => Err(Error::UnknownToken {
                text: c.to_string(),
                line: self.line,
            }),
        }
    }

    /// Tokenize the entire source and return all tokens, ending with `Eof`
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            trace!("token {:?} on line {}", token.kind, token.line);
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}
