//! Code Generation trait - Backend abstraction
//!
//! The parser recognizes and validates; a `CodeGen` renders. Each method is
//! one emission point, called in source order while the grammar is being
//! recognized, so a backend never has to look ahead or back.

/// The callable unit a block belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit<'a> {
    /// The implicit top-level procedure, i.e. the program entry point
    Main,
    /// A named, nested procedure
    Procedure(&'a str),
}

/// Statements that wrap a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    If,
    While,
}

/// Relational and arithmetic operators, as written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Equal,
    /// `#`
    NotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
}

/// Code generation backend trait
pub trait CodeGen {
    /// `const name = value`
    fn constant(&mut self, name: &str, value: i64);

    /// `var name`
    fn variable(&mut self, name: &str);

    /// Start of a callable unit's body
    fn prologue(&mut self, unit: Unit<'_>);

    /// End of a callable unit's body, after its statement
    fn epilogue(&mut self, unit: Unit<'_>);

    /// `name :=`, the expression follows
    fn assign(&mut self, name: &str);

    /// `call name`
    fn call(&mut self, name: &str);

    /// `begin`
    fn begin(&mut self);

    /// `;` between two statements of a `begin ... end`
    fn separator(&mut self);

    /// `end`
    fn end(&mut self);

    /// `if` / `while`, before the condition
    fn open_condition(&mut self, control: Control);

    /// `then` / `do`, after the condition
    fn close_condition(&mut self, control: Control);

    /// `odd`, before its operand
    fn open_odd(&mut self);

    /// After the operand of `odd`
    fn close_odd(&mut self);

    fn operator(&mut self, op: Operator);

    /// An identifier used as an operand
    fn ident(&mut self, name: &str);

    fn number(&mut self, value: i64);

    fn open_paren(&mut self);

    fn close_paren(&mut self);

    /// Marker appended after a complete, error-free compilation
    fn trailer(&mut self, version: &str);

    /// Get the backend name
    fn name(&self) -> &str;
}
