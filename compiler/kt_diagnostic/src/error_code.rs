//! Error codes for diagnostics.

use std::fmt;

/// Searchable identifier for a diagnostic.
///
/// - E1xxx: syntax errors
/// - E9xxx: internal errors (grammar contract violations)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Syntax error recorded as an error node
    E1001,
    /// Parser contract violation; the parse was abandoned
    E9001,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E9001 => "E9001",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "syntax error",
            ErrorCode::E9001 => "internal parser error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
