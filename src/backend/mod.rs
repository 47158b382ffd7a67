//! Backend module - Code generation

pub mod codegen;

pub mod c;

pub use codegen::{CodeGen, Control, Operator, Unit};
pub use c::CCodeGen;
