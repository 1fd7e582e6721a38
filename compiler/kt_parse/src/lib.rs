//! Error-tolerant, lossless parser for Kotlin source.
//!
//! The grammar drives a [`Parser`], which wraps a marker-based
//! [`Builder`] recording an event log. When the grammar is done, the sink
//! replays the log into a [`SyntaxTree`] in which every byte of input,
//! trivia included, belongs to exactly one leaf.
//!
//! Malformed input never fails a parse: it becomes error nodes and
//! [`Diagnostic`]s. A `TreeError` means the grammar broke a marker
//! contract.
//!
//! Doc comments, and the links inside them, stay opaque leaves until
//! [`SyntaxTree::parse_embedded`] is asked for their structure.

pub mod binders;
pub mod builder;
pub mod cursor;
mod error;
mod grammar;
mod kdoc;
pub mod lookahead;
pub mod parser;
pub mod recovery;
pub mod tree;

use std::sync::Arc;

use kt_diagnostic::Diagnostic;
use kt_ir::TokenList;
use tracing::debug;

pub use binders::{EdgeBinders, TriviaBinder, TriviaPiece};
pub use builder::{Builder, CompletedMarker, Marker};
pub use cursor::{Cursor, CursorState};
pub use error::{EmbeddedError, TreeError};
pub use lookahead::{TokenStreamPattern, TokenStreamPredicate};
pub use parser::{OptionalMarker, Parser};
pub use recovery::RecoveryCase;
pub use tree::{ElementKind, NodeId, SyntaxElement, SyntaxTree, TokenId};

/// Knobs for one parse.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of tokens a speculative scan may look at. `None`
    /// scans to the end of input.
    pub lookahead_limit: Option<usize>,
    /// Maximum grammar nesting before input is reported as too deep.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            lookahead_limit: None,
            max_depth: 512,
        }
    }
}

/// A finished parse: the tree plus the diagnostics found in it.
#[derive(Debug)]
pub struct Parse {
    tree: Arc<SyntaxTree>,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn tree(&self) -> &Arc<SyntaxTree> {
        &self.tree
    }

    /// Syntax errors in source order of their nodes.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Parse a Kotlin file with default options.
pub fn parse(tokens: TokenList) -> Result<Parse, TreeError> {
    parse_with(tokens, &ParseOptions::default())
}

pub fn parse_with(tokens: TokenList, options: &ParseOptions) -> Result<Parse, TreeError> {
    parse_tokens(tokens, *options, grammar::file)
}

/// Lex and parse `source`.
pub fn parse_source(source: &str) -> Result<Parse, TreeError> {
    parse(kt_lexer::lex(source))
}

/// Run `entry` over `tokens` and assemble the tree.
pub(crate) fn parse_tokens(
    tokens: TokenList,
    options: ParseOptions,
    entry: fn(&mut Parser<'_>),
) -> Result<Parse, TreeError> {
    debug!(tokens = tokens.len(), base = tokens.base_offset(), "parse begin");
    let events = {
        let mut p = Parser::new(&tokens, options);
        entry(&mut p);
        p.finish()?
    };
    let (tree, diagnostics) = tree::sink::build(tokens, events, options)?;
    debug!(
        nodes = tree.node_count(),
        diagnostics = diagnostics.len(),
        "parse end"
    );
    Ok(Parse {
        tree: Arc::new(tree),
        diagnostics,
    })
}
