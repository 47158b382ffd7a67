//! Symbol table and use checks for PL/0
//!
//! Scopes form a stack of frames, one per open block. A frame keeps its
//! symbols in declaration order. Procedures are declared in the frame of the
//! block that contains them, so popping the procedure body's frame leaves the
//! procedure itself callable.

use std::collections::HashMap;
use std::fmt;

use log::{debug, trace};

use crate::utils::{Error, Result};

/// Name of the implicit top-level procedure
pub const MAIN_PROCEDURE: &str = "main";

/// Kind of symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Constant,
    Variable,
    Procedure,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Constant => write!(f, "constant"),
            SymbolKind::Variable => write!(f, "variable"),
            SymbolKind::Procedure => write!(f, "procedure"),
        }
    }
}

/// How an identifier is being used at the point it is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolUse {
    /// Left-hand side of `:=`
    Assign,
    /// Operand inside an expression
    Operand,
    /// Target of `call`
    Call,
}

impl SymbolUse {
    /// Whether a symbol of `kind` may be used this way
    fn permits(self, kind: SymbolKind) -> bool {
        match self {
            SymbolUse::Assign => kind == SymbolKind::Variable,
            SymbolUse::Operand => kind != SymbolKind::Procedure,
            SymbolUse::Call => kind == SymbolKind::Procedure,
        }
    }

    fn requirement(self) -> &'static str {
        match self {
            SymbolUse::Assign => "must be a variable",
            SymbolUse::Operand => "must not be a procedure",
            SymbolUse::Call => "must be a procedure",
        }
    }
}

/// Symbol information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Nesting depth of the block that declared it
    pub depth: usize,
}

/// A scope containing symbols in declaration order
#[derive(Debug, Default)]
struct Scope {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
}

impl Scope {
    fn get(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }

    fn push(&mut self, symbol: Symbol) {
        self.index.insert(symbol.name.clone(), self.symbols.len());
        self.symbols.push(symbol);
    }
}

/// Symbol table with nested scopes
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    /// Create a table holding only the implicit `main` procedure at depth 0
    pub fn new() -> Self {
        let mut global = Scope::default();
        global.push(Symbol {
            name: MAIN_PROCEDURE.to_string(),
            kind: SymbolKind::Procedure,
            depth: 0,
        });
        Self {
            scopes: vec![global],
        }
    }

    /// Depth of the innermost open scope
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Enter a new scope
    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
        trace!("entered scope at depth {}", self.depth());
    }

    /// Declare a symbol in the innermost scope.
    ///
    /// Redeclaring a name within one scope is an error; shadowing a name from
    /// an enclosing scope is not.
    pub fn insert(&mut self, name: &str, kind: SymbolKind, line: usize) -> Result<()> {
        let depth = self.depth();
        let scope = &mut self.scopes[depth];
        if scope.get(name).is_some() {
            return Err(Error::DuplicateSymbol {
                name: name.to_string(),
                line,
            });
        }
        debug!("declare {} {} at depth {}", kind, name, depth);
        scope.push(Symbol {
            name: name.to_string(),
            kind,
            depth,
        });
        Ok(())
    }

    /// Look up a symbol, searching from the innermost scope outward
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Look up `name` and check it may be used as `usage`
    pub fn lookup_and_check(&self, name: &str, usage: SymbolUse, line: usize) -> Result<&Symbol> {
        let symbol = self.lookup(name).ok_or_else(|| Error::UndefinedSymbol {
            name: name.to_string(),
            line,
        })?;
        if !usage.permits(symbol.kind) {
            return Err(Error::WrongKind {
                name: name.to_string(),
                requirement: usage.requirement(),
                line,
            });
        }
        Ok(symbol)
    }

    /// Drop every constant and variable of the block that just finished.
    ///
    /// The procedure owning that block lives in the enclosing scope and is
    /// unaffected. The global scope holding `main` is never removed.
    pub fn purge_innermost_scope(&mut self) {
        if self.scopes.len() > 1 {
            if let Some(scope) = self.scopes.pop() {
                debug!(
                    "purged {} symbol(s) at depth {}",
                    scope.symbols.len(),
                    self.scopes.len()
                );
            }
        }
    }

    /// All visible symbols, outermost first, in declaration order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.scopes.iter().flat_map(|scope| scope.symbols.iter())
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
