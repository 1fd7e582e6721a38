//! The lossless syntax tree.
//!
//! Nodes live in an arena indexed by [`NodeId`]. Leaves are indices into
//! the token list ([`TokenId`]), so every token of the input, trivia
//! included, appears exactly once under the root.
//!
//! Deferred regions (doc comments and the links inside them) stay opaque
//! leaves. [`SyntaxTree::parse_embedded`] parses one on first request and
//! caches the result for the lifetime of the tree.

pub(crate) mod sink;

use std::fmt::{self, Write as _};
use std::sync::{Arc, OnceLock};

use kt_ir::{NodeKind, Span, TokenKind, TokenList};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{kdoc, EmbeddedError, Parse, ParseOptions, TreeError};

/// Index of an interior node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Index of a leaf token in the tree's token list.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(u32);

impl TokenId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({})", self.0)
    }
}

/// A child of a node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum SyntaxElement {
    Node(NodeId),
    Token(TokenId),
}

/// Kind of a node or of a token.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ElementKind {
    Node(NodeKind),
    Token(TokenKind),
}

#[derive(Debug)]
pub(crate) struct NodeData {
    kind: NodeKind,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<SyntaxElement>,
    message: Option<Box<str>>,
}

type EmbeddedSlot = OnceLock<Result<Arc<Parse>, TreeError>>;

pub struct SyntaxTree {
    tokens: TokenList,
    /// Effective kind of every token, after soft-keyword remapping.
    kinds: Vec<TokenKind>,
    nodes: Vec<NodeData>,
    root: NodeId,
    embedded: FxHashMap<TokenId, EmbeddedSlot>,
    options: ParseOptions,
}

impl SyntaxTree {
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of interior nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    /// Whole text the tree was parsed from.
    pub fn text(&self) -> &str {
        self.tokens.slice(self.node_span(self.root))
    }

    pub fn node_kind(&self, node: NodeId) -> NodeKind {
        self.node(node).kind
    }

    pub fn node_span(&self, node: NodeId) -> Span {
        self.node(node).span
    }

    pub fn node_text(&self, node: NodeId) -> &str {
        self.tokens.slice(self.node_span(node))
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    /// Children in source order, trivia included.
    pub fn children(&self, node: NodeId) -> &[SyntaxElement] {
        &self.node(node).children
    }

    /// Child nodes only.
    pub fn child_nodes(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node).iter().filter_map(|child| match child {
            SyntaxElement::Node(id) => Some(*id),
            SyntaxElement::Token(_) => None,
        })
    }

    /// Message of an error node; `None` for every other node.
    pub fn error_message(&self, node: NodeId) -> Option<&str> {
        self.node(node).message.as_deref()
    }

    pub fn token_kind(&self, token: TokenId) -> TokenKind {
        self.kinds
            .get(token.index())
            .copied()
            .unwrap_or(TokenKind::Eof)
    }

    pub fn token_span(&self, token: TokenId) -> Span {
        self.tokens.span(token.index())
    }

    pub fn token_text(&self, token: TokenId) -> &str {
        self.tokens.text(token.index())
    }

    pub fn kind(&self, element: SyntaxElement) -> ElementKind {
        match element {
            SyntaxElement::Node(id) => ElementKind::Node(self.node_kind(id)),
            SyntaxElement::Token(id) => ElementKind::Token(self.token_kind(id)),
        }
    }

    pub fn span(&self, element: SyntaxElement) -> Span {
        match element {
            SyntaxElement::Node(id) => self.node_span(id),
            SyntaxElement::Token(id) => self.token_span(id),
        }
    }

    /// Nodes in pre-order, starting with `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.child_nodes(id).collect::<Vec<_>>().into_iter().rev());
        }
        out
    }

    /// Leaf tokens under `node`, in source order.
    pub fn leaves(&self, node: NodeId) -> Vec<TokenId> {
        let mut out = Vec::new();
        self.collect_leaves(node, &mut out);
        out
    }

    /// Deferred-region tokens (doc comments, doc links) in this tree.
    pub fn deferred_tokens(&self) -> Vec<TokenId> {
        let mut tokens: Vec<TokenId> = self.embedded.keys().copied().collect();
        tokens.sort_unstable();
        tokens
    }

    /// Structure of a deferred region, parsed on first request.
    ///
    /// Offsets in the returned tree are absolute offsets into this tree's
    /// text. Repeated calls return the same `Arc`.
    pub fn parse_embedded(&self, token: TokenId) -> Result<Arc<Parse>, EmbeddedError> {
        let kind = self.token_kind(token);
        let slot = self
            .embedded
            .get(&token)
            .ok_or(EmbeddedError::NotDeferred { token, kind })?;
        let result = slot.get_or_init(|| {
            let span = self.token_span(token);
            debug!(?token, ?kind, %span, "parsing deferred region");
            let text = self.token_text(token);
            let parsed = if kind == TokenKind::DocComment {
                crate::parse_tokens(kt_lexer::lex_kdoc(text, span.start), self.options, kdoc::doc)
            } else {
                crate::parse_tokens(
                    kt_lexer::lex_kdoc_link(text, span.start),
                    self.options,
                    kdoc::link,
                )
            };
            parsed.map(Arc::new)
        });
        result.clone().map_err(EmbeddedError::from)
    }

    /// Indented rendering of the tree, one element per line.
    ///
    /// Nodes print as `KIND@start..end`, tokens additionally print their
    /// text, error nodes their message.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.root, 0, &mut out);
        out
    }

    fn dump_node(&self, node: NodeId, depth: usize, out: &mut String) {
        let data = self.node(node);
        let _ = write!(out, "{:indent$}{:?}@{}", "", data.kind, data.span, indent = depth * 2);
        if let Some(message) = &data.message {
            let _ = write!(out, " {message:?}");
        }
        out.push('\n');
        for child in &data.children {
            match *child {
                SyntaxElement::Node(id) => self.dump_node(id, depth + 1, out),
                SyntaxElement::Token(id) => {
                    let _ = writeln!(
                        out,
                        "{:indent$}{:?}@{} {:?}",
                        "",
                        self.token_kind(id),
                        self.token_span(id),
                        self.token_text(id),
                        indent = (depth + 1) * 2
                    );
                }
            }
        }
    }

    fn collect_leaves(&self, node: NodeId, out: &mut Vec<TokenId>) {
        for child in self.children(node) {
            match *child {
                SyntaxElement::Node(id) => self.collect_leaves(id, out),
                SyntaxElement::Token(id) => out.push(id),
            }
        }
    }

    fn node(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.index()]
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_dump())
    }
}

#[cfg(test)]
mod tests;
