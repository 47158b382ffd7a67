//! pl0c
//!
//! A single-pass compiler from PL/0 to C. Lexing, parsing, symbol resolution
//! and code generation happen in one recursive-descent traversal.

pub mod backend;
pub mod driver;
pub mod frontend;
pub mod utils;

pub use driver::{compile_source, CompileConfig, Driver};
pub use utils::{Error, Result};
