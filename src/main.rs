//! pl0c Compiler
//!
//! Translates a PL/0 program into C on standard output.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

use pl0c::driver::{diagnostic, CompileConfig, Driver};

const USAGE: &str = "usage: pl0c file.pl0";

/// PL/0 Compiler
#[derive(Parser, Debug)]
#[command(name = "pl0c")]
#[command(about = "pl0c - Compile PL/0 to C")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Input source file (.pl0)
    #[arg(value_name = "FILE")]
    input: Vec<PathBuf>,

    /// Write the generated C here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the token stream as JSON lines (for debugging)
    #[arg(long)]
    dump_tokens: bool,
}

/// Build the run configuration, or `None` unless exactly one file is given
fn parse_args<I, T>(args: I) -> Option<CompileConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).ok()?;
    let [input] = <[PathBuf; 1]>::try_from(cli.input).ok()?;
    Some(CompileConfig {
        input,
        output: cli.output,
        dump_tokens: cli.dump_tokens,
    })
}

fn main() {
    env_logger::init();

    let Some(config) = parse_args(std::env::args_os()) else {
        println!("{}", USAGE);
        process::exit(1);
    };

    if let Err(e) = Driver::new(config).run() {
        eprintln!("{}", diagnostic(&e));
        process::exit(1);
    }
}
