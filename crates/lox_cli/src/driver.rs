//! Runs the scanner over a file or REPL lines and prints the tokens.

use std::io::{BufRead, Write};
use std::path::Path;

use lox_diagnostics::Reporter;
use lox_scanner::{Literal, Token};
use serde::Serialize;

use crate::exit_code::{CliError, ExitCode};

/// How tokens are written to the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `<TYPE> <lexeme> <literal>` line per token.
    #[default]
    Text,
    /// One JSON array of token objects per run.
    Json,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub format: OutputFormat,
    /// Only report diagnostics; print no tokens.
    pub quiet: bool,
}

#[derive(Serialize)]
struct TokenRecord<'a> {
    #[serde(rename = "type")]
    token_type: &'static str,
    lexeme: &'a str,
    literal: serde_json::Value,
    line: u32,
    column: u32,
}

impl<'a> From<&'a Token> for TokenRecord<'a> {
    fn from(token: &'a Token) -> Self {
        let literal = match &token.literal {
            Some(Literal::Number(value)) if value.is_finite() => serde_json::Value::from(*value),
            // JSON has no infinities; keep the printed form.
            Some(literal @ Literal::Number(_)) => serde_json::Value::from(literal.to_string()),
            Some(Literal::String(value)) => serde_json::Value::from(value.as_str()),
            None => serde_json::Value::Null,
        };
        Self {
            token_type: token.token_type.name(),
            lexeme: &token.lexeme,
            literal,
            line: token.line,
            column: token.start_column,
        }
    }
}

/// A driver session: token output, diagnostic output and the error state.
pub struct Session<O: Write, E: Write> {
    options: Options,
    out: O,
    reporter: Reporter<E>,
}

impl<O: Write, E: Write> Session<O, E> {
    pub fn new(options: Options, out: O, err: E) -> Self {
        Self {
            options,
            out,
            reporter: Reporter::new(err),
        }
    }

    /// Scan one source string, report its diagnostics and print its tokens.
    pub fn run(&mut self, source: &str) -> Result<(), CliError> {
        let result = lox_scanner::scan_tokens(source);
        self.reporter.report_all(&result.diagnostics, source);
        if !self.options.quiet {
            self.print_tokens(&result.tokens)?;
        }
        Ok(())
    }

    /// Scan a whole file. Lexical errors turn into [`ExitCode::DataError`].
    pub fn run_file(&mut self, path: &Path) -> Result<ExitCode, CliError> {
        let _span = tracing::info_span!("run_file", path = %path.display()).entered();
        let bytes = std::fs::read(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // Invalid UTF-8 becomes U+FFFD and is reported as an unexpected character.
        let source = String::from_utf8_lossy(&bytes);

        self.run(&source)?;

        if self.reporter.had_error() {
            tracing::debug!(errors = self.reporter.error_count(), "input had errors");
            Ok(ExitCode::DataError)
        } else {
            Ok(ExitCode::Success)
        }
    }

    /// Read, scan and print lines until end of input.
    ///
    /// Errors on one line never end the session; the error state is cleared
    /// before every line. Lines are decoded lossily, so bytes that are not
    /// UTF-8 are scanned as unexpected characters.
    pub fn run_prompt<R: BufRead>(&mut self, mut input: R) -> Result<ExitCode, CliError> {
        let mut buf = Vec::new();
        loop {
            self.out.write_all(b"> ").map_err(CliError::Output)?;
            self.out.flush().map_err(CliError::Output)?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).map_err(CliError::Input)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(strip_line_ending(&buf));

            self.reporter.reset();
            self.run(&line)?;
        }
        tracing::debug!("end of input");
        Ok(ExitCode::Success)
    }

    pub fn had_error(&self) -> bool {
        self.reporter.had_error()
    }

    fn print_tokens(&mut self, tokens: &[Token]) -> Result<(), CliError> {
        match self.options.format {
            OutputFormat::Text => {
                for token in tokens {
                    writeln!(self.out, "{}", token).map_err(CliError::Output)?;
                }
            }
            OutputFormat::Json => {
                let records: Vec<TokenRecord<'_>> = tokens.iter().map(TokenRecord::from).collect();
                serde_json::to_writer(&mut self.out, &records)?;
                writeln!(self.out).map_err(CliError::Output)?;
            }
        }
        self.out.flush().map_err(CliError::Output)
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (O, E) {
        (self.out, self.reporter.into_inner())
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session(options: Options) -> Session<Vec<u8>, Vec<u8>> {
        Session::new(options, Vec::new(), Vec::new())
    }

    fn outputs(session: Session<Vec<u8>, Vec<u8>>) -> (String, String) {
        let (out, err) = session.into_parts();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_run_prints_tokens() {
        let mut session = session(Options::default());
        session.run("var x = 1;").unwrap();
        assert!(!session.had_error());
        let (out, err) = outputs(session);
        assert_eq!(
            out,
            "VAR var null\nIDENTIFIER x null\nEQUAL = null\nNUMBER 1 1.0\nSEMICOLON ; null\nEOF  null\n"
        );
        assert!(err.is_empty());
    }

    #[test]
    fn test_run_reports_and_continues() {
        let mut session = session(Options::default());
        session.run("a @ b").unwrap();
        assert!(session.had_error());
        let (out, err) = outputs(session);
        assert_eq!(out.lines().count(), 3);
        assert_eq!(
            err,
            "Error: Unexpected character.\n\n    1 | a @ b\n          ^--Here.\n"
        );
    }

    #[test]
    fn test_quiet_prints_only_diagnostics() {
        let mut session = session(Options {
            quiet: true,
            ..Options::default()
        });
        session.run("\"open").unwrap();
        let (out, err) = outputs(session);
        assert!(out.is_empty());
        assert!(err.starts_with("Error: Unterminated string.\n"));
    }

    #[test]
    fn test_json_output() {
        let mut session = session(Options {
            format: OutputFormat::Json,
            quiet: false,
        });
        session.run("x = \"hi\" 2").unwrap();
        let (out, _) = outputs(session);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        let tokens = value.as_array().unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0]["type"], "IDENTIFIER");
        assert_eq!(tokens[0]["literal"], serde_json::Value::Null);
        assert_eq!(tokens[2]["type"], "STRING");
        assert_eq!(tokens[2]["literal"], "hi");
        assert_eq!(tokens[2]["column"], 4);
        assert_eq!(tokens[3]["literal"], 2.0);
        assert_eq!(tokens[4]["type"], "EOF");
    }

    #[test]
    fn test_prompt_resets_errors_each_line() {
        let mut session = session(Options::default());
        let input = Cursor::new("@\nprint 1;\n");
        let code = session.run_prompt(input).unwrap();
        assert_eq!(code, ExitCode::Success);
        assert!(!session.had_error());

        let (out, err) = outputs(session);
        assert!(out.starts_with("> EOF  null\n> PRINT print null\n"));
        assert!(out.ends_with("> "));
        assert_eq!(err.matches("^--Here.").count(), 1);
    }

    #[test]
    fn test_prompt_survives_invalid_utf8() {
        let mut session = session(Options::default());
        let input = Cursor::new(&b"\xff\nprint 1;\n"[..]);
        let code = session.run_prompt(input).unwrap();
        assert_eq!(code, ExitCode::Success);

        let (out, err) = outputs(session);
        assert_eq!(
            out,
            "> EOF  null\n> PRINT print null\nNUMBER 1 1.0\nSEMICOLON ; null\nEOF  null\n> "
        );
        assert!(err.starts_with("Error: Unexpected character.\n\n    1 | \u{fffd}\n"));
    }

    #[test]
    fn test_prompt_strips_crlf() {
        let mut session = session(Options::default());
        session.run_prompt(Cursor::new("nil\r\n")).unwrap();
        let (out, err) = outputs(session);
        assert_eq!(out, "> NIL nil null\nEOF  null\n> ");
        assert!(err.is_empty());
    }

    #[test]
    fn test_run_file_invalid_utf8_is_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bytes.lox");
        std::fs::write(&path, b"var a;\n\xfe\n").unwrap();

        let mut session = session(Options::default());
        assert_eq!(session.run_file(&path).unwrap(), ExitCode::DataError);
        let (out, err) = outputs(session);
        assert!(out.starts_with("VAR var null\n"));
        assert_eq!(err.matches("Error: Unexpected character.").count(), 1);
        assert!(err.contains("    2 | \u{fffd}\n"));
    }

    #[test]
    fn test_json_number_out_of_range() {
        let mut session = session(Options {
            format: OutputFormat::Json,
            quiet: false,
        });
        session.run(&"9".repeat(400)).unwrap();
        let (out, _) = outputs(session);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value[0]["type"], "NUMBER");
        assert_eq!(value[0]["literal"], "Infinity");
    }

    #[test]
    fn test_run_file_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let clean = dir.path().join("clean.lox");
        std::fs::write(&clean, "print 1;\n").unwrap();
        let broken = dir.path().join("broken.lox");
        std::fs::write(&broken, "print 1;\n/* open").unwrap();

        let mut ok = session(Options::default());
        assert_eq!(ok.run_file(&clean).unwrap(), ExitCode::Success);

        let mut bad = session(Options::default());
        assert_eq!(bad.run_file(&broken).unwrap(), ExitCode::DataError);
        let (_, err) = outputs(bad);
        assert!(err.contains("Error: Unterminated comment.\n\n    2 | /* open\n"));
    }

    #[test]
    fn test_run_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(Options::default());
        let err = session.run_file(&dir.path().join("nope.lox")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::IoError);
    }
}
