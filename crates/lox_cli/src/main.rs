//! lox: Scan Lox source and print its tokens.
//!
//! Usage:
//!   lox [options] [script]
//!
//! Without a script, lines are read from stdin one at a time (REPL).

mod driver;
mod exit_code;
mod tracing_config;

use clap::error::ErrorKind;
use clap::Parser as ClapParser;
use std::io;
use std::path::PathBuf;

use driver::{Options, OutputFormat, Session};
use exit_code::{CliError, ExitCode};

const USAGE: &str = "Usage: lox [script]";

#[derive(ClapParser, Debug)]
#[command(name = "lox", version, about = "Tokenize Lox source code")]
struct Cli {
    /// Script to scan. Starts an interactive prompt when omitted.
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Token output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print diagnostics only.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> std::process::ExitCode {
    tracing_config::init_tracing();

    let cli = match parse_args() {
        Ok(Some(cli)) => cli,
        Ok(None) => return ExitCode::Success.into(),
        Err(err) => return fail(&err),
    };

    let options = Options {
        format: cli.format,
        quiet: cli.quiet,
    };
    let mut session = Session::new(options, io::stdout().lock(), io::stderr().lock());
    let result = match cli.script {
        Some(ref path) => session.run_file(path),
        None => session.run_prompt(io::stdin().lock()),
    };
    tracing::debug!(had_error = session.had_error(), "session finished");

    match result {
        Ok(code) => code.into(),
        Err(err) => fail(&err),
    }
}

/// Parse arguments. `Ok(None)` means help or version was printed.
fn parse_args() -> Result<Option<Cli>, CliError> {
    match Cli::try_parse() {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                // Nothing useful to do if stdout is gone.
                let _ = err.print();
                Ok(None)
            }
            _ => Err(CliError::Usage(err.render().to_string())),
        },
    }
}

fn fail(err: &CliError) -> std::process::ExitCode {
    let code = ExitCode::from(err);
    match err {
        CliError::Usage(detail) => {
            eprintln!("{}", USAGE);
            eprint!("{}", detail);
        }
        _ => eprintln!("error: {}", err),
    }
    tracing::debug!(%code, "exiting");
    code.into()
}
