//! Parser for PL/0
//!
//! Single-pass recursive descent with one token of lookahead. Symbols are
//! resolved and code is emitted while each production is recognized; no
//! syntax tree is built.

use log::{debug, trace};

use crate::backend::codegen::{CodeGen, Control, Operator, Unit};
use crate::frontend::lexer::Lexer;
use crate::frontend::semantic::{SymbolKind, SymbolTable, SymbolUse};
use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result};

/// Deepest block nesting allowed: the program block plus one procedure level
pub const MAX_DEPTH: usize = 2;

/// The parser, which also owns all per-compilation state
pub struct Parser<G: CodeGen> {
    lexer: Lexer,
    current: Token,
    symbols: SymbolTable,
    depth: usize,
    codegen: G,
}

impl<G: CodeGen> Parser<G> {
    /// Create a new parser that renders through `codegen`
    pub fn new(lexer: Lexer, codegen: G) -> Self {
        let line = lexer.line();
        Self {
            lexer,
            current: Token::eof(line),
            symbols: SymbolTable::new(),
            depth: 0,
            codegen,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Consume the parser and hand back the backend
    pub fn into_codegen(self) -> G {
        self.codegen
    }

    // ==================== Helper Methods ====================

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        trace!("current {:?} (line {})", self.current.kind, self.current.line);
        Ok(())
    }

    fn line(&self) -> usize {
        self.current.line
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn unexpected(&self, expected: impl Into<String>) -> Error {
        Error::UnexpectedToken {
            expected: expected.into(),
            got: self.current.kind.to_string(),
            line: self.line(),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<()> {
        if self.check(&expected) {
            self.advance()
        } else {
            Err(self.unexpected(expected.describe()))
        }
    }

    fn consume(&mut self, kind: &TokenKind) -> Result<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match &self.current.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance()?;
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect_number(&mut self) -> Result<i64> {
        match self.current.kind {
            TokenKind::Number(value) => {
                self.advance()?;
                Ok(value)
            }
            _ => Err(self.unexpected("number")),
        }
    }

    /// Declare the identifier under the cursor and return its name
    fn declare(&mut self, kind: SymbolKind) -> Result<String> {
        let line = self.line();
        let name = self.expect_ident()?;
        self.symbols.insert(&name, kind, line)?;
        Ok(name)
    }

    // ==================== Parsing Methods ====================

    /// program = block "." ;
    pub fn parse_program(&mut self) -> Result<()> {
        self.advance()?;
        self.parse_block(Unit::Main)?;
        self.expect(TokenKind::Dot)?;

        if self.current.kind != TokenKind::Eof {
            return Err(Error::ExtraTokens { line: self.line() });
        }
        Ok(())
    }

    /// block = [ const-decl ] [ var-decl ] { procedure-decl } statement ;
    ///
    /// A procedure's body opens right away so its declarations become locals;
    /// `main` opens only after the nested procedures, leaving the top-level
    /// declarations at file scope.
    fn parse_block(&mut self, unit: Unit<'_>) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::NestingTooDeep { line: self.line() });
        }
        self.depth += 1;
        self.symbols.enter_scope();
        debug!("enter block of {:?} at depth {}", unit, self.depth);

        if let Unit::Procedure(_) = unit {
            self.codegen.prologue(unit);
        }

        if self.consume(&TokenKind::Const)? {
            self.parse_const_decl()?;
        }

        if self.consume(&TokenKind::Var)? {
            self.parse_var_decl()?;
        }

        while self.consume(&TokenKind::Procedure)? {
            self.parse_procedure_decl()?;
        }

        if unit == Unit::Main {
            self.codegen.prologue(unit);
        }

        self.parse_statement()?;
        self.codegen.epilogue(unit);

        if self.depth == 0 {
            return Err(Error::NestingUnderflow { line: self.line() });
        }
        self.depth -= 1;
        debug!("leave block of {:?}", unit);
        Ok(())
    }

    /// ident "=" number { "," ident "=" number } ";"
    fn parse_const_decl(&mut self) -> Result<()> {
        loop {
            let name = self.declare(SymbolKind::Constant)?;
            self.expect(TokenKind::Equal)?;
            let value = self.expect_number()?;
            self.codegen.constant(&name, value);

            if !self.consume(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::Semicolon)
    }

    /// ident { "," ident } ";"
    fn parse_var_decl(&mut self) -> Result<()> {
        loop {
            let name = self.declare(SymbolKind::Variable)?;
            self.codegen.variable(&name);

            if !self.consume(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::Semicolon)
    }

    /// ident ";" block ";"
    fn parse_procedure_decl(&mut self) -> Result<()> {
        let name = self.declare(SymbolKind::Procedure)?;
        trace!("procedure {}", name);
        self.expect(TokenKind::Semicolon)?;

        self.parse_block(Unit::Procedure(&name))?;
        self.symbols.purge_innermost_scope();

        self.expect(TokenKind::Semicolon)
    }

    fn parse_statement(&mut self) -> Result<()> {
        match &self.current.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.symbols
                    .lookup_and_check(&name, SymbolUse::Assign, self.line())?;
                self.codegen.assign(&name);
                self.advance()?;
                self.expect(TokenKind::Assign)?;
                self.parse_expression()
            }
            TokenKind::Call => {
                self.advance()?;
                let line = self.line();
                let name = self.expect_ident()?;
                self.symbols.lookup_and_check(&name, SymbolUse::Call, line)?;
                self.codegen.call(&name);
                Ok(())
            }
            TokenKind::Begin => {
                self.codegen.begin();
                self.advance()?;
                self.parse_statement()?;
                while self.consume(&TokenKind::Semicolon)? {
                    self.codegen.separator();
                    self.parse_statement()?;
                }
                self.expect(TokenKind::End)?;
                self.codegen.end();
                Ok(())
            }
            TokenKind::If => self.parse_guarded(Control::If, TokenKind::Then),
            TokenKind::While => self.parse_guarded(Control::While, TokenKind::Do),
            // Anything else is the empty statement
            _ => Ok(()),
        }
    }

    /// ("if" condition "then" | "while" condition "do") statement
    fn parse_guarded(&mut self, control: Control, keyword: TokenKind) -> Result<()> {
        self.codegen.open_condition(control);
        self.advance()?;
        self.parse_condition()?;
        self.expect(keyword)?;
        self.codegen.close_condition(control);
        self.parse_statement()
    }

    /// condition = "odd" expression | expression relop expression ;
    fn parse_condition(&mut self) -> Result<()> {
        if self.consume(&TokenKind::Odd)? {
            self.codegen.open_odd();
            self.parse_expression()?;
            self.codegen.close_odd();
            return Ok(());
        }

        self.parse_expression()?;
        let op = match self.current.kind {
            TokenKind::Equal => Operator::Equal,
            TokenKind::Hash => Operator::NotEqual,
            TokenKind::LessThan => Operator::Less,
            TokenKind::GreaterThan => Operator::Greater,
            _ => return Err(Error::InvalidConditional { line: self.line() }),
        };
        self.codegen.operator(op);
        self.advance()?;
        self.parse_expression()
    }

    fn additive_operator(&self) -> Option<Operator> {
        match self.current.kind {
            TokenKind::Plus => Some(Operator::Add),
            TokenKind::Minus => Some(Operator::Subtract),
            _ => None,
        }
    }

    fn multiplicative_operator(&self) -> Option<Operator> {
        match self.current.kind {
            TokenKind::Multiply => Some(Operator::Multiply),
            TokenKind::Divide => Some(Operator::Divide),
            _ => None,
        }
    }

    /// expression = [ "+" | "-" ] term { ( "+" | "-" ) term } ;
    fn parse_expression(&mut self) -> Result<()> {
        if let Some(op) = self.additive_operator() {
            self.codegen.operator(op);
            self.advance()?;
        }

        self.parse_term()?;
        while let Some(op) = self.additive_operator() {
            self.codegen.operator(op);
            self.advance()?;
            self.parse_term()?;
        }
        Ok(())
    }

    /// term = factor { ( "*" | "/" ) factor } ;
    fn parse_term(&mut self) -> Result<()> {
        self.parse_factor()?;
        while let Some(op) = self.multiplicative_operator() {
            self.codegen.operator(op);
            self.advance()?;
            self.parse_factor()?;
        }
        Ok(())
    }

    /// factor = ident | number | "(" expression ")" ;
    fn parse_factor(&mut self) -> Result<()> {
        match &self.current.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.symbols
                    .lookup_and_check(&name, SymbolUse::Operand, self.line())?;
                self.codegen.ident(&name);
                self.advance()
            }
            TokenKind::Number(value) => {
                self.codegen.number(*value);
                self.advance()
            }
            TokenKind::LParen => {
                self.codegen.open_paren();
                self.advance()?;
                self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                self.codegen.close_paren();
                Ok(())
            }
            _ => Err(self.unexpected("identifier, number or '('")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CCodeGen;
    use pretty_assertions::assert_eq;

    /// Records emission points instead of rendering text
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Recorder {
        fn push(&mut self, event: impl Into<String>) {
            self.events.push(event.into());
        }
    }

    impl CodeGen for Recorder {
        fn constant(&mut self, name: &str, value: i64) {
            self.push(format!("const {}={}", name, value));
        }
        fn variable(&mut self, name: &str) {
            self.push(format!("var {}", name));
        }
        fn prologue(&mut self, unit: Unit<'_>) {
            self.push(format!("prologue {:?}", unit));
        }
        fn epilogue(&mut self, unit: Unit<'_>) {
            self.push(format!("epilogue {:?}", unit));
        }
        fn assign(&mut self, name: &str) {
            self.push(format!("assign {}", name));
        }
        fn call(&mut self, name: &str) {
            self.push(format!("call {}", name));
        }
        fn begin(&mut self) {
            self.push("begin");
        }
        fn separator(&mut self) {
            self.push(";");
        }
        fn end(&mut self) {
            self.push("end");
        }
        fn open_condition(&mut self, control: Control) {
            self.push(format!("open {:?}", control));
        }
        fn close_condition(&mut self, control: Control) {
            self.push(format!("close {:?}", control));
        }
        fn open_odd(&mut self) {
            self.push("odd(");
        }
        fn close_odd(&mut self) {
            self.push(")odd");
        }
        fn operator(&mut self, op: Operator) {
            self.push(format!("{:?}", op));
        }
        fn ident(&mut self, name: &str) {
            self.push(name);
        }
        fn number(&mut self, value: i64) {
            self.push(value.to_string());
        }
        fn open_paren(&mut self) {
            self.push("(");
        }
        fn close_paren(&mut self) {
            self.push(")");
        }
        fn trailer(&mut self, version: &str) {
            self.push(format!("trailer {}", version));
        }
        fn name(&self) -> &str {
            "recorder"
        }
    }

    fn record(source: &str) -> Result<Vec<String>> {
        let mut parser = Parser::new(Lexer::new(source), Recorder::default());
        parser.parse_program()?;
        Ok(parser.into_codegen().events)
    }

    fn parse(source: &str) -> Result<String> {
        let mut parser = Parser::new(Lexer::new(source), CCodeGen::new());
        parser.parse_program()?;
        Ok(parser.into_codegen().into_source())
    }

    fn parse_err(source: &str) -> Error {
        parse(source).unwrap_err()
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(
            parse(".").unwrap(),
            "int\nmain(int argc, char *argv[])\n{\n;return 0;\n}\n\n"
        );
    }

    #[test]
    fn test_const_var_and_assignment() {
        let c = parse("const a=1; var b; begin b:=a+1; end.").unwrap();
        assert_eq!(
            c,
            "const long a=1;\n\
             long b;\n\
             int\nmain(int argc, char *argv[])\n{\n\
             {\n\
             b=a+1;\n\
             ;\n}\n\
             ;return 0;\n}\n\n"
        );
    }

    #[test]
    fn test_procedure_locals_are_emitted_inside_body() {
        let source = "var x;
            procedure p;
              var y;
              begin y := 1; x := y end;
            begin call p end.";
        assert_eq!(
            parse(source).unwrap(),
            "long x;\n\
             void\np(void)\n{\n\
             long y;\n\
             {\n\
             y=1;\n\
             x=y;\n}\n\
             ;\n}\n\n\
             int\nmain(int argc, char *argv[])\n{\n\
             {\n\
             p();\n\
             ;\n}\n\
             ;return 0;\n}\n\n"
        );
    }

    #[test]
    fn test_emission_order() {
        let events = record("const n=3; var i; begin i:=0; while i<n do i:=i+1 end.").unwrap();
        assert_eq!(
            events,
            vec![
                "const n=3",
                "var i",
                "prologue Main",
                "begin",
                "assign i",
                "0",
                ";",
                "open While",
                "i",
                "Less",
                "n",
                "close While",
                "assign i",
                "i",
                "Add",
                "1",
                "end",
                "epilogue Main",
            ]
        );
    }

    #[test]
    fn test_odd_condition() {
        let c = parse("var x; begin if odd(x) then x:=1; end.").unwrap();
        assert!(c.contains("if(((x))&1)x=1;\n"));
    }

    #[test]
    fn test_not_equal_and_unary_minus() {
        let c = parse("var x; if x # -1 then x := -(x * 2) / 3.").unwrap();
        assert!(c.contains("if(x!=-1)x=-(x*2)/3;return 0;"));
    }

    #[test]
    fn test_numbers_are_emitted_without_underscores() {
        let c = parse("const big = 1_000_000; .").unwrap();
        assert!(c.starts_with("const long big=1000000;\n"));
    }

    #[test]
    fn test_depth_is_restored() {
        let mut parser = Parser::new(
            Lexer::new("procedure p; ; procedure q; call p; call q."),
            CCodeGen::new(),
        );
        parser.parse_program().unwrap();
        assert_eq!(parser.depth(), 0);
        assert!(parser.symbols().lookup("q").is_some());
    }

    #[test]
    fn test_nesting_depth_exceeded() {
        let source = "procedure outer;\n  procedure inner;\n  ;\n;\n.";
        assert_eq!(parse_err(source), Error::NestingTooDeep { line: 3 });
    }

    #[test]
    fn test_procedure_locals_are_purged() {
        let source = "procedure p; var local; local := 1; local := 2.";
        assert_eq!(
            parse_err(source),
            Error::UndefinedSymbol {
                name: "local".to_string(),
                line: 1,
            }
        );
    }

    #[test]
    fn test_procedure_callable_after_its_block() {
        assert!(parse("procedure p; var local; local := 1; call p.").is_ok());
    }

    #[test]
    fn test_sibling_procedures_do_not_share_locals() {
        let source = "procedure p; var t; t := 1;\nprocedure q; t := 2;\n.";
        assert_eq!(
            parse_err(source),
            Error::UndefinedSymbol {
                name: "t".to_string(),
                line: 2,
            }
        );
    }

    #[test]
    fn test_shadowing_in_procedure() {
        let c = parse("const x = 1; procedure p; var x; x := 2; .").unwrap();
        assert!(c.contains("void\np(void)\n{\nlong x;\nx=2;\n}"));
    }

    #[test]
    fn test_duplicate_symbol() {
        assert_eq!(
            parse_err("var a, a; ."),
            Error::DuplicateSymbol {
                name: "a".to_string(),
                line: 1,
            }
        );
        assert!(matches!(
            parse_err("const a = 1; var a; ."),
            Error::DuplicateSymbol { .. }
        ));
        assert!(matches!(
            parse_err("var p; procedure p; ; ."),
            Error::DuplicateSymbol { .. }
        ));
    }

    #[test]
    fn test_constant_not_visible_in_own_initializer() {
        assert!(matches!(
            parse_err("const a = a; ."),
            Error::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_wrong_kind_uses() {
        assert_eq!(
            parse_err("const c = 1; c := 2."),
            Error::WrongKind {
                name: "c".to_string(),
                requirement: "must be a variable",
                line: 1,
            }
        );
        assert!(matches!(
            parse_err("var x; procedure p; ; x := p."),
            Error::WrongKind { requirement: "must not be a procedure", .. }
        ));
        assert!(matches!(
            parse_err("var x; call x."),
            Error::WrongKind { requirement: "must be a procedure", .. }
        ));
    }

    #[test]
    fn test_main_is_callable() {
        let c = parse("call main.").unwrap();
        assert!(c.contains("{\nmain();\n;return 0;"));
    }

    #[test]
    fn test_undefined_symbol() {
        assert_eq!(
            parse_err("begin\n  y := 1\nend."),
            Error::UndefinedSymbol {
                name: "y".to_string(),
                line: 2,
            }
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(
            parse_err("var x; x := 1"),
            Error::UnexpectedToken {
                expected: "'.'".to_string(),
                got: "end of file".to_string(),
                line: 1,
            }
        );
        assert!(matches!(parse_err("var x; x = 1."), Error::UnexpectedToken { .. }));
        assert!(matches!(parse_err("var x; x := ."), Error::UnexpectedToken { .. }));
        assert!(matches!(parse_err("var ; ."), Error::UnexpectedToken { .. }));
        assert!(matches!(parse_err("begin ."), Error::UnexpectedToken { .. }));
    }

    #[test]
    fn test_invalid_conditional() {
        assert_eq!(
            parse_err("var x; if x then x := 1."),
            Error::InvalidConditional { line: 1 }
        );
    }

    #[test]
    fn test_extra_tokens() {
        assert_eq!(parse_err(". x"), Error::ExtraTokens { line: 1 });
    }

    #[test]
    fn test_lexical_errors_propagate() {
        assert!(matches!(parse_err("var x; x := 1 % 2."), Error::UnknownToken { .. }));
    }
}
