//! Diagnostics produced by the parsing core.
//!
//! A [`Diagnostic`] carries an [`ErrorCode`], a message and labelled byte
//! spans. The parser has no warning channel, so every diagnostic it emits
//! has [`Severity::Error`].

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
