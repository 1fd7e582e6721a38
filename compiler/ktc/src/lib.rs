//! Command-line driver for the Kotlin parsing core.
//!
//! The binary is a thin shell: [`options::parse_args`] turns the argument
//! list into [`CliOptions`], and [`commands::run`] executes one command
//! against any pair of writers so tests can capture the output.

pub mod commands;
pub mod options;

use std::sync::Once;

use kt_parse::TreeError;

pub use options::{CliOptions, Command};

/// Environment variable holding the `tracing` filter directives.
pub const LOG_ENV: &str = "KTC_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Safe to call more than once.
///
/// Filter directives come from `KTC_LOG` (e.g. `KTC_LOG=kt_parse=trace`);
/// without it only warnings are shown. Output goes to stderr, indented by
/// span.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::registry()
            .with(filter)
            .with(
                HierarchicalLayer::new(2)
                    .with_writer(std::io::stderr)
                    .with_targets(true),
            )
            .init();
    });
}

/// What a successful command found.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    /// The input has syntax errors; they were reported.
    Diagnostics,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Clean => 0,
            Outcome::Diagnostics => 1,
        }
    }
}

/// Failures that stop a command before it can report on the input.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("internal parser error: {0}")]
    Contract(#[from] TreeError),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) | CliError::Io { .. } | CliError::Contract(_) => 2,
        }
    }
}
