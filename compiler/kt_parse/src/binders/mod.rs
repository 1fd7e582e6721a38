//! Edge binders: which neighbouring comments belong to a node.
//!
//! When the tree is assembled, every run of trivia between two significant
//! tokens has to be split between the nodes that end before it and the
//! nodes that start after it. A node's left binder sees the run in front of
//! its first token and returns the index where the node should begin; its
//! right binder sees the run after its last token and returns the index
//! where the node should end.
//!
//! The defaults keep all trivia outside the node. Declarations swap in the
//! comment binders so that a doc comment (and, optionally, plain comments
//! on the lines above) become part of the declaration they describe.

use std::fmt;

use kt_ir::TokenKind;

/// One whitespace or comment token handed to a binder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TriviaPiece<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl TriviaPiece<'_> {
    fn is_comment(&self) -> bool {
        self.kind.is_trivia() && self.kind != TokenKind::WhiteSpace
    }

    fn line_breaks(&self) -> usize {
        self.text.bytes().filter(|&b| b == b'\n').count()
    }
}

/// Decides where a node edge falls inside a run of trivia.
///
/// The returned index is clamped to `0..=trivia.len()`.
pub trait TriviaBinder: Sync + fmt::Debug {
    fn edge_position(&self, trivia: &[TriviaPiece<'_>]) -> usize;
}

/// Left edge after all trivia.
#[derive(Debug)]
pub struct DefaultLeft;

impl TriviaBinder for DefaultLeft {
    fn edge_position(&self, trivia: &[TriviaPiece<'_>]) -> usize {
        trivia.len()
    }
}

/// Right edge before all trivia.
#[derive(Debug)]
pub struct DefaultRight;

impl TriviaBinder for DefaultRight {
    fn edge_position(&self, _trivia: &[TriviaPiece<'_>]) -> usize {
        0
    }
}

/// Binds the closest preceding doc comment, and with it everything between
/// that comment and the node.
#[derive(Debug)]
pub struct PrecedingDocComments;

impl TriviaBinder for PrecedingDocComments {
    fn edge_position(&self, trivia: &[TriviaPiece<'_>]) -> usize {
        nearest_doc_comment(trivia).unwrap_or(trivia.len())
    }
}

/// Binds a preceding doc comment if there is one. Otherwise binds the
/// comments directly above the node, each starting its own line, up to the
/// first blank line.
#[derive(Debug)]
pub struct PrecedingComments;

impl TriviaBinder for PrecedingComments {
    fn edge_position(&self, trivia: &[TriviaPiece<'_>]) -> usize {
        if trivia.is_empty() {
            return 0;
        }
        if let Some(doc) = nearest_doc_comment(trivia) {
            return doc;
        }

        let mut edge = trivia.len();
        for (idx, piece) in trivia.iter().enumerate().rev() {
            if piece.kind == TokenKind::WhiteSpace {
                if piece.line_breaks() > 1 {
                    break;
                }
            } else if piece.is_comment() {
                let own_line = idx == 0
                    || (trivia[idx - 1].kind == TokenKind::WhiteSpace
                        && trivia[idx - 1].line_breaks() > 0);
                if !own_line {
                    break;
                }
                edge = idx;
            } else {
                break;
            }
        }
        edge
    }
}

/// Binds comments that follow the node on the same line.
#[derive(Debug)]
pub struct TrailingComments;

impl TriviaBinder for TrailingComments {
    fn edge_position(&self, trivia: &[TriviaPiece<'_>]) -> usize {
        let mut edge = 0;
        for (idx, piece) in trivia.iter().enumerate() {
            if piece.kind == TokenKind::WhiteSpace {
                if piece.line_breaks() > 0 {
                    break;
                }
            } else if piece.is_comment() {
                edge = idx + 1;
            } else {
                break;
            }
        }
        edge
    }
}

fn nearest_doc_comment(trivia: &[TriviaPiece<'_>]) -> Option<usize> {
    trivia
        .iter()
        .rposition(|piece| piece.kind == TokenKind::DocComment)
}

/// The pair of binders installed on a node.
#[derive(Copy, Clone, Debug)]
pub struct EdgeBinders {
    pub left: &'static dyn TriviaBinder,
    pub right: &'static dyn TriviaBinder,
}

impl EdgeBinders {
    pub const DEFAULT: EdgeBinders = EdgeBinders {
        left: &DefaultLeft,
        right: &DefaultRight,
    };

    /// Binders for a declaration: doc comments always attach, plain
    /// comments above only when `preceding_non_doc_comments` is set.
    pub fn declaration(preceding_non_doc_comments: bool) -> Self {
        EdgeBinders {
            left: if preceding_non_doc_comments {
                &PrecedingComments
            } else {
                &PrecedingDocComments
            },
            right: &TrailingComments,
        }
    }
}

impl Default for EdgeBinders {
    fn default() -> Self {
        EdgeBinders::DEFAULT
    }
}

#[cfg(test)]
mod tests;
