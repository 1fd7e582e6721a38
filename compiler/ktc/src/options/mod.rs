//! Hand-rolled argument parsing.
//!
//! Flags may appear before or after the file path. Both `--flag value` and
//! `--flag=value` are accepted for flags that take a value.

use kt_diagnostic::emitter::ColorMode;
use kt_parse::ParseOptions;

use crate::CliError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the token stream.
    Lex,
    /// Print the tree dump, then diagnostics.
    Parse,
    /// Print diagnostics only.
    Check,
    Help,
    Version,
}

impl Command {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "lex" => Some(Command::Lex),
            "parse" => Some(Command::Parse),
            "check" => Some(Command::Check),
            "help" | "--help" | "-h" => Some(Command::Help),
            "version" | "--version" | "-V" => Some(Command::Version),
            _ => None,
        }
    }

    fn needs_file(self) -> bool {
        matches!(self, Command::Lex | Command::Parse | Command::Check)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliOptions {
    pub command: Command,
    /// Input file; empty for commands that take none.
    pub path: String,
    pub lookahead_limit: Option<usize>,
    pub color: ColorMode,
    /// Parse and dump every doc comment and doc link too.
    pub expand_docs: bool,
}

impl CliOptions {
    fn new(command: Command) -> Self {
        CliOptions {
            command,
            path: String::new(),
            lookahead_limit: None,
            color: ColorMode::Auto,
            expand_docs: false,
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            lookahead_limit: self.lookahead_limit,
            ..ParseOptions::default()
        }
    }
}

/// Parse `args` as passed to the process, program name first.
pub fn parse_args(args: &[String]) -> Result<CliOptions, CliError> {
    let Some(name) = args.get(1) else {
        return Ok(CliOptions::new(Command::Help));
    };
    let command = Command::from_name(name)
        .ok_or_else(|| CliError::Usage(format!("unknown command '{name}'")))?;
    let mut options = CliOptions::new(command);

    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        if let Some(value) = arg.strip_prefix("--lookahead-limit=") {
            options.lookahead_limit = Some(parse_limit(value)?);
        } else if arg == "--lookahead-limit" {
            let value = rest.next().ok_or_else(|| {
                CliError::Usage("--lookahead-limit needs a number".to_string())
            })?;
            options.lookahead_limit = Some(parse_limit(value)?);
        } else if arg == "--color" {
            options.color = ColorMode::Always;
        } else if arg == "--no-color" {
            options.color = ColorMode::Never;
        } else if arg == "--expand-docs" {
            options.expand_docs = true;
        } else if arg.starts_with('-') {
            return Err(CliError::Usage(format!("unknown option '{arg}'")));
        } else if options.path.is_empty() {
            options.path.clone_from(arg);
        } else {
            return Err(CliError::Usage(format!("unexpected argument '{arg}'")));
        }
    }

    if command.needs_file() && options.path.is_empty() {
        return Err(CliError::Usage(format!("missing file path for '{name}'")));
    }
    Ok(options)
}

fn parse_limit(value: &str) -> Result<usize, CliError> {
    value
        .parse()
        .map_err(|_| CliError::Usage(format!("invalid lookahead limit '{value}'")))
}
