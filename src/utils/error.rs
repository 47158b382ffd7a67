//! Error handling for pl0c
//!
//! Every fault is fatal: the first error detected stops compilation and is
//! reported together with the line number it was found on.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Compiler error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ==================== I/O Errors ====================

    #[error("file must end in '.pl0'")]
    BadExtension,

    #[error("couldn't open {path}: {cause}")]
    Io { path: String, cause: String },

    // ==================== Lexical Errors ====================

    #[error("unterminated comment")]
    UnterminatedComment { line: usize },

    #[error("unknown token: '{text}'")]
    UnknownToken { text: String, line: usize },

    #[error("invalid number: {lexeme}")]
    InvalidNumber { lexeme: String, line: usize },

    #[error("number exceeds LONG_MAX: {lexeme}")]
    NumberTooLarge { lexeme: String, line: usize },

    // ==================== Syntax Errors ====================

    #[error("syntax error: expected {expected}, got {got}")]
    UnexpectedToken {
        expected: String,
        got: String,
        line: usize,
    },

    #[error("invalid conditional")]
    InvalidConditional { line: usize },

    #[error("extra tokens at end of file")]
    ExtraTokens { line: usize },

    // ==================== Semantic Errors ====================

    #[error("undefined symbol: {name}")]
    UndefinedSymbol { name: String, line: usize },

    #[error("{requirement}: {name}")]
    WrongKind {
        name: String,
        requirement: &'static str,
        line: usize,
    },

    #[error("duplicate symbol: {name}")]
    DuplicateSymbol { name: String, line: usize },

    #[error("nesting depth exceeded")]
    NestingTooDeep { line: usize },

    #[error("nesting depth fell below 0")]
    NestingUnderflow { line: usize },
}

impl Error {
    /// Line the error was detected on.
    ///
    /// Driver errors happen before any newline has been consumed, so they
    /// report the initial line counter.
    pub fn line(&self) -> usize {
        match self {
            Self::BadExtension | Self::Io { .. } => 1,
            Self::UnterminatedComment { line }
            | Self::UnknownToken { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::NumberTooLarge { line, .. }
            | Self::UnexpectedToken { line, .. }
            | Self::InvalidConditional { line }
            | Self::ExtraTokens { line }
            | Self::UndefinedSymbol { line, .. }
            | Self::WrongKind { line, .. }
            | Self::DuplicateSymbol { line, .. }
            | Self::NestingTooDeep { line }
            | Self::NestingUnderflow { line } => *line,
        }
    }

    /// Render the one-line diagnostic printed on stderr.
    pub fn diagnostic(&self, program: &str) -> String {
        format!("{}: error: {}: {}", program, self.line(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_format() {
        let err = Error::UndefinedSymbol {
            name: "x".to_string(),
            line: 7,
        };
        assert_eq!(err.diagnostic("pl0c"), "pl0c: error: 7: undefined symbol: x");
    }

    #[test]
    fn test_io_errors_report_first_line() {
        assert_eq!(Error::BadExtension.line(), 1);
        assert_eq!(
            Error::BadExtension.diagnostic("pl0c"),
            "pl0c: error: 1: file must end in '.pl0'"
        );
    }
}
