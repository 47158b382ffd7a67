//! C Code Generator
//!
//! Renders PL/0 straight into C as the parser recognizes it. Every statement
//! is closed by whatever follows it (`;` separator, `end`, or the block
//! epilogue), which is why those three all start with `;`.

use crate::backend::codegen::{CodeGen, Control, Operator, Unit};

/// C code generator
#[derive(Debug, Default)]
pub struct CCodeGen {
    output: String,
}

impl CCodeGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generated C source so far
    pub fn source(&self) -> &str {
        &self.output
    }

    /// Consume the generator and return the generated C source
    pub fn into_source(self) -> String {
        self.output
    }

    fn emit(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Convert operator to C operator
    fn operator_to_c(op: Operator) -> &'static str {
        match op {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }
}

impl CodeGen for CCodeGen {
    fn constant(&mut self, name: &str, value: i64) {
        self.emit(&format!("const long {}={};\n", name, value));
    }

    fn variable(&mut self, name: &str) {
        self.emit(&format!("long {};\n", name));
    }

    fn prologue(&mut self, unit: Unit<'_>) {
        match unit {
            Unit::Main => self.emit("int\nmain(int argc, char *argv[])\n"),
            Unit::Procedure(name) => self.emit(&format!("void\n{}(void)\n", name)),
        }
        self.emit("{\n");
    }

    fn epilogue(&mut self, unit: Unit<'_>) {
        self.emit(";");
        if unit == Unit::Main {
            self.emit("return 0;");
        }
        self.emit("\n}\n\n");
    }

    fn assign(&mut self, name: &str) {
        self.emit(name);
        self.emit("=");
    }

    fn call(&mut self, name: &str) {
        self.emit(&format!("{}();\n", name));
    }

    fn begin(&mut self) {
        self.emit("{\n");
    }

    fn separator(&mut self) {
        self.emit(";\n");
    }

    fn end(&mut self) {
        self.emit(";\n}\n");
    }

    fn open_condition(&mut self, control: Control) {
        match control {
            Control::If => self.emit("if("),
            Control::While => self.emit("while("),
        }
    }

    fn close_condition(&mut self, _control: Control) {
        self.emit(")");
    }

    fn open_odd(&mut self) {
        self.emit("(");
    }

    fn close_odd(&mut self) {
        self.emit(")&1");
    }

    fn operator(&mut self, op: Operator) {
        self.emit(Self::operator_to_c(op));
    }

    fn ident(&mut self, name: &str) {
        self.emit(name);
    }

    fn number(&mut self, value: i64) {
        self.emit(&value.to_string());
    }

    fn open_paren(&mut self) {
        self.emit("(");
    }

    fn close_paren(&mut self) {
        self.emit(")");
    }

    fn trailer(&mut self, version: &str) {
        self.emit(&format!("/* PL/0 compiler {} */\n", version));
    }

    fn name(&self) -> &str {
        "C"
    }
}
