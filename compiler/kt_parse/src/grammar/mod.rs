//! Grammar Modules
//!
//! Recursive-descent productions for Kotlin source files.
//!
//! # Organization
//!
//! Each module extends `Parser` with methods for specific grammar productions:
//!
//! - [`file`]: File preamble (file annotations, package, imports) and the
//!   top-level declaration loop
//! - [`modifiers`]: Modifier lists, annotations and use-site targets
//! - [`decl`]: Classes, objects, functions, properties, type aliases
//! - [`expr`]: Expressions and statements
//! - [`ty`]: Type references
//!
//! # Design
//!
//! Productions never fail. Missing pieces become error nodes through the
//! recovery helpers on `Parser`, and every loop checks that it consumed
//! something before going round again, so any token stream terminates.
//! Speculation uses `mark`/`rollback` or the bounded scans in
//! [`crate::lookahead`].

mod decl;
mod expr;
mod file;
mod modifiers;
mod ty;

use crate::Parser;

/// Entry point for a whole file.
pub(crate) fn file(p: &mut Parser<'_>) {
    p.parse_file();
}

#[cfg(test)]
mod tests;
