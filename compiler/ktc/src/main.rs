//! Kotlin parser CLI.

use std::io::IsTerminal;
use std::process::ExitCode;

use ktc::commands::{report_error, run, Io};
use ktc::options::parse_args;

fn main() -> ExitCode {
    ktc::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let is_tty = std::io::stderr().is_terminal();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(error) => {
            report_error(&error, &mut std::io::stderr(), Default::default(), is_tty);
            return ExitCode::from(error.exit_code());
        }
    };

    let mut io = Io {
        out: std::io::stdout().lock(),
        err: std::io::stderr().lock(),
        is_tty,
    };
    match run(&options, &mut io) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(error) => {
            report_error(&error, &mut io.err, options.color, is_tty);
            ExitCode::from(error.exit_code())
        }
    }
}
