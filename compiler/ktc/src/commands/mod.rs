//! Command handlers.
//!
//! Each handler takes the source text and a pair of writers: results go to
//! `out`, diagnostics to `err`. Shared helpers for reading input and
//! reporting live here in the module root.

mod check;
mod debug;

use std::io::Write;

use kt_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use kt_diagnostic::{Diagnostic, ErrorCode};

use crate::{CliError, CliOptions, Command, Outcome};

pub use check::check_source;
pub use debug::{lex_source, parse_source};

/// Writers and terminal facts for one invocation.
pub struct Io<O: Write, E: Write> {
    pub out: O,
    pub err: E,
    /// Whether `err` is a terminal, for `ColorMode::Auto`.
    pub is_tty: bool,
}

/// Read the input named in `options` and run its command.
pub fn run<O: Write, E: Write>(options: &CliOptions, io: &mut Io<O, E>) -> Result<Outcome, CliError> {
    match options.command {
        Command::Help => {
            print_usage(&mut io.out);
            Ok(Outcome::Clean)
        }
        Command::Version => {
            let _ = writeln!(io.out, "ktc {}", env!("CARGO_PKG_VERSION"));
            Ok(Outcome::Clean)
        }
        Command::Lex | Command::Parse | Command::Check => {
            let source = read_file(&options.path)?;
            run_source(options, &source, io)
        }
    }
}

/// Run a file command over `source` already in memory.
pub fn run_source<O: Write, E: Write>(
    options: &CliOptions,
    source: &str,
    io: &mut Io<O, E>,
) -> Result<Outcome, CliError> {
    match options.command {
        Command::Lex => Ok(lex_source(options, source, &mut io.out)),
        Command::Parse => parse_source(options, source, io),
        Command::Check => check_source(options, source, io),
        Command::Help | Command::Version => run(options, io),
    }
}

/// Print a failure that stopped the command. Contract violations are shown
/// as an internal diagnostic, everything else as a one-line error.
pub fn report_error<E: Write>(error: &CliError, err: &mut E, color: ColorMode, is_tty: bool) {
    match error {
        CliError::Contract(inner) => {
            let code = ErrorCode::E9001;
            let diagnostic = Diagnostic::error(code)
                .with_message(format!("{}: {inner}", code.description()))
                .with_note("this is a bug in the parser, not in the input");
            let mut emitter = TerminalEmitter::new(err, color, is_tty, "", "");
            emitter.emit(&diagnostic);
            emitter.flush();
        }
        CliError::Usage(_) => {
            let _ = writeln!(err, "error: {error}");
            let _ = writeln!(err, "Run `ktc help` for usage.");
        }
        CliError::Io { .. } => {
            let _ = writeln!(err, "error: {error}");
        }
    }
}

pub(crate) fn read_file(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| {
        let message = match source.kind() {
            std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
            std::io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
            std::io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
            _ => format!("error reading '{path}': {source}"),
        };
        CliError::Io { message, source }
    })
}

/// Render `diagnostics` against `source` and summarize.
pub(crate) fn report<E: Write>(
    options: &CliOptions,
    source: &str,
    diagnostics: &[Diagnostic],
    err: &mut E,
    is_tty: bool,
) -> Outcome {
    if diagnostics.is_empty() {
        return Outcome::Clean;
    }
    let mut emitter = TerminalEmitter::new(err, options.color, is_tty, &options.path, source);
    emitter.emit_all(diagnostics);
    emitter.emit_summary(diagnostics.len());
    emitter.flush();
    Outcome::Diagnostics
}

fn print_usage<O: Write>(out: &mut O) {
    let _ = writeln!(out, "Lossless, error-tolerant Kotlin parser");
    let _ = writeln!(out);
    let _ = writeln!(out, "Usage: ktc <command> [options]");
    let _ = writeln!(out);
    let _ = writeln!(out, "Commands:");
    let _ = writeln!(out, "  lex <file.kt>        Tokenize and display tokens");
    let _ = writeln!(out, "  parse <file.kt>      Display the syntax tree, then diagnostics");
    let _ = writeln!(out, "  check <file.kt>      Report syntax errors only");
    let _ = writeln!(out, "  help                 Show this help message");
    let _ = writeln!(out, "  version              Show version information");
    let _ = writeln!(out);
    let _ = writeln!(out, "Options:");
    let _ = writeln!(out, "  --lookahead-limit N  Cap speculative scans at N tokens");
    let _ = writeln!(out, "  --color, --no-color  Force colored diagnostics on or off");
    let _ = writeln!(out, "  --expand-docs        Also parse and display doc comments (parse)");
    let _ = writeln!(out);
    let _ = writeln!(out, "Exit status: 0 clean, 1 syntax errors, 2 usage or internal error.");
    let _ = writeln!(out, "Set KTC_LOG (e.g. KTC_LOG=kt_parse=debug) for tracing output.");
}

#[cfg(test)]
mod tests;
