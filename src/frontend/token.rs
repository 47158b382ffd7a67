//! Token definitions for PL/0

use serde::Serialize;
use std::fmt;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Line the token was recognized on
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize) -> Self {
        Self { kind, line }
    }

    pub fn eof(line: usize) -> Self {
        Self { kind: TokenKind::Eof, line }
    }
}

/// Token kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    // ============ Keywords ============
    /// const
    Const,
    /// var
    Var,
    /// procedure
    Procedure,
    /// call
    Call,
    /// begin
    Begin,
    /// end
    End,
    /// if
    If,
    /// then
    Then,
    /// while
    While,
    /// do
    Do,
    /// odd
    Odd,

    // ============ Identifiers and Literals ============
    /// Identifier (constant, variable or procedure name)
    Ident(String),
    /// Integer literal, grouping underscores already removed
    Number(i64),

    // ============ Operators ============
    /// .
    Dot,
    /// =
    Equal,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// :=
    Assign,
    /// #
    Hash,
    /// <
    LessThan,
    /// >
    GreaterThan,
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Multiply,
    /// /
    Divide,
    /// (
    LParen,
    /// )
    RParen,

    // ============ Special ============
    /// End of input
    Eof,
}

impl TokenKind {
    /// Check if this token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Const
                | TokenKind::Var
                | TokenKind::Procedure
                | TokenKind::Call
                | TokenKind::Begin
                | TokenKind::End
                | TokenKind::If
                | TokenKind::Then
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::Odd
        )
    }

    /// Try to convert an identifier to a keyword (case-sensitive)
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "const" => Some(TokenKind::Const),
            "var" => Some(TokenKind::Var),
            "procedure" => Some(TokenKind::Procedure),
            "call" => Some(TokenKind::Call),
            "begin" => Some(TokenKind::Begin),
            "end" => Some(TokenKind::End),
            "if" => Some(TokenKind::If),
            "then" => Some(TokenKind::Then),
            "while" => Some(TokenKind::While),
            "do" => Some(TokenKind::Do),
            "odd" => Some(TokenKind::Odd),
            _ => None,
        }
    }

    /// Name of the token class, without the lexeme
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(_) => "identifier".to_string(),
            TokenKind::Number(_) => "number".to_string(),
            other => other.to_string(),
        }
    }

    /// Map a single punctuation character to its token
    pub fn from_punct(c: char) -> Option<TokenKind> {
        match c {
            '.' => Some(TokenKind::Dot),
            '=' => Some(TokenKind::Equal),
            ',' => Some(TokenKind::Comma),
            ';' => Some(TokenKind::Semicolon),
            '#' => Some(TokenKind::Hash),
            '<' => Some(TokenKind::LessThan),
            '>' => Some(TokenKind::GreaterThan),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Multiply),
            '/' => Some(TokenKind::Divide),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Const => write!(f, "'const'"),
            TokenKind::Var => write!(f, "'var'"),
            TokenKind::Procedure => write!(f, "'procedure'"),
            TokenKind::Call => write!(f, "'call'"),
            TokenKind::Begin => write!(f, "'begin'"),
            TokenKind::End => write!(f, "'end'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Then => write!(f, "'then'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::Do => write!(f, "'do'"),
            TokenKind::Odd => write!(f, "'odd'"),
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Equal => write!(f, "'='"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Assign => write!(f, "':='"),
            TokenKind::Hash => write!(f, "'#'"),
            TokenKind::LessThan => write!(f, "'<'"),
            TokenKind::GreaterThan => write!(f, "'>'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Multiply => write!(f, "'*'"),
            TokenKind::Divide => write!(f, "'/'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}
