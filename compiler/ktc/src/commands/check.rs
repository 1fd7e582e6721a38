//! The `check` command: report syntax errors and nothing else.

use std::io::Write;

use super::{report, Io};
use crate::{CliError, CliOptions, Outcome};

#[tracing::instrument(level = "debug", skip_all, fields(path = %options.path))]
pub fn check_source<O: Write, E: Write>(
    options: &CliOptions,
    source: &str,
    io: &mut Io<O, E>,
) -> Result<Outcome, CliError> {
    let parse = kt_parse::parse_with(kt_lexer::lex(source), &options.parse_options())?;
    Ok(report(options, source, parse.diagnostics(), &mut io.err, io.is_tty))
}
