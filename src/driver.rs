//! Compiler driver
//!
//! Loads a `.pl0` file, runs the single-pass front end over it with the C
//! backend, and writes the result.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::debug;

use crate::backend::{CCodeGen, CodeGen};
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::utils::{Error, Result};

/// Name used in diagnostics
pub const PROGRAM_NAME: &str = "pl0c";

/// Version written into the trailer comment
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Required source file extension, including the dot
pub const SOURCE_EXTENSION: &str = ".pl0";

/// Configuration for one compiler run
#[derive(Debug, Clone)]
pub struct CompileConfig {
    pub input: PathBuf,
    /// Write here instead of stdout
    pub output: Option<PathBuf>,
    /// Print the token stream as JSON lines instead of compiling
    pub dump_tokens: bool,
}

impl CompileConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            dump_tokens: false,
        }
    }
}

/// Reject any file whose name does not end in `.pl0`
pub fn check_extension(path: &Path) -> Result<()> {
    let name = path.to_string_lossy();
    match name.rfind('.') {
        Some(dot) if &name[dot..] == SOURCE_EXTENSION => Ok(()),
        _ => Err(Error::BadExtension),
    }
}

/// Check the extension, then read the whole file into memory.
///
/// Bytes that are not valid UTF-8 become U+FFFD: skipped inside comments,
/// an unknown token anywhere else.
pub fn read_source(path: &Path) -> Result<String> {
    check_extension(path)?;
    let bytes = fs::read(path).map_err(|e| Error::Io {
        path: path.display().to_string(),
        cause: e.to_string(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Compile PL/0 source text to C source text
pub fn compile_source(source: &str) -> Result<String> {
    let mut parser = Parser::new(Lexer::new(source), CCodeGen::new());
    parser.parse_program()?;

    let mut codegen = parser.into_codegen();
    debug!("parse finished, appending {} trailer", codegen.name());
    codegen.trailer(VERSION);
    Ok(codegen.into_source())
}

/// Render the token stream as one JSON object per line
pub fn dump_tokens(source: &str) -> anyhow::Result<String> {
    let mut out = String::new();
    for token in Lexer::new(source).tokenize()? {
        out.push_str(&serde_json::to_string(&token)?);
        out.push('\n');
    }
    Ok(out)
}

/// One-line diagnostic for any error a run can end with
pub fn diagnostic(err: &anyhow::Error) -> String {
    match err.downcast_ref::<Error>() {
        Some(compile_error) => compile_error.diagnostic(PROGRAM_NAME),
        None => format!("{}: error: 1: {:#}", PROGRAM_NAME, err),
    }
}

/// Main compiler driver
pub struct Driver {
    config: CompileConfig,
}

impl Driver {
    pub fn new(config: CompileConfig) -> Self {
        Self { config }
    }

    /// Run the configured job, stopping at the first error
    pub fn run(&self) -> anyhow::Result<()> {
        debug!("reading {}", self.config.input.display());
        let source = read_source(&self.config.input)?;

        let text = if self.config.dump_tokens {
            dump_tokens(&source)?
        } else {
            compile_source(&source)?
        };

        self.write_output(&text)
    }

    fn write_output(&self, text: &str) -> anyhow::Result<()> {
        match &self.config.output {
            Some(path) => {
                debug!("writing {}", path.display());
                fs::write(path, text)
                    .with_context(|| format!("couldn't write {}", path.display()))?;
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(text.as_bytes())
                    .and_then(|()| stdout.flush())
                    .context("couldn't write to stdout")?;
            }
        }
        Ok(())
    }
}
