//! C Backend - Generate C code from PL/0
//!
//! The generated translation unit builds with any C compiler.

mod c_codegen;

pub use c_codegen::CCodeGen;
