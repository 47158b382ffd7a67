//! Frontend module - Lexer, Symbol Table, Parser

pub mod token;
pub mod lexer;
pub mod semantic;
pub mod parser;
