//! Turns the builder's event log into a [`SyntaxTree`].
//!
//! Two passes. The first replays `forward_parent` links so every `precede`
//! chain opens outermost first, leaving a flat list of open/token/close
//! operations. The second walks that list and decides, for each run of
//! trivia between two significant tokens, which node every piece belongs
//! to by asking the edge binders of the nodes that open and close inside
//! the run.

use std::mem;
use std::sync::OnceLock;

use kt_diagnostic::{Diagnostic, ErrorCode};
use kt_ir::{NodeKind, Span, TokenKind, TokenList};
use rustc_hash::FxHashMap;
use tracing::debug;

use super::{NodeData, NodeId, SyntaxElement, SyntaxTree, TokenId};
use crate::binders::{EdgeBinders, TriviaBinder, TriviaPiece};
use crate::builder::event::Event;
use crate::{ParseOptions, TreeError};

enum Op {
    Open {
        kind: NodeKind,
        binders: EdgeBinders,
        error: Option<Box<str>>,
    },
    Token {
        raw: u32,
        kind: TokenKind,
    },
    Close,
}

struct OpenNode {
    id: NodeId,
    start: u32,
    right: &'static dyn TriviaBinder,
    /// Opened and closed with no tokens, leaving the trivia run to the
    /// next node's binders.
    detached: bool,
}

pub(crate) fn build(
    tokens: TokenList,
    events: Vec<Event>,
    options: ParseOptions,
) -> Result<(SyntaxTree, Vec<Diagnostic>), TreeError> {
    let ops = linearize(events)?;
    let tree = Assembler::new(&tokens).run(&ops)?;
    let (nodes, kinds, root) = tree;

    let embedded: FxHashMap<TokenId, _> = kinds
        .iter()
        .enumerate()
        .filter(|(_, kind)| kind.is_deferred())
        .map(|(index, _)| (TokenId(to_u32(index)), OnceLock::new()))
        .collect();

    let tree = SyntaxTree {
        tokens,
        kinds,
        nodes,
        root,
        embedded,
        options,
    };
    let diagnostics = collect_diagnostics(&tree);
    debug!(
        nodes = tree.nodes.len(),
        tokens = tree.tokens.len(),
        errors = diagnostics.len(),
        "syntax tree built"
    );
    Ok((tree, diagnostics))
}

/// Flatten `precede` chains into properly nested open/close operations.
fn linearize(mut events: Vec<Event>) -> Result<Vec<Op>, TreeError> {
    let mut ops = Vec::with_capacity(events.len());
    let mut chain = Vec::new();

    for index in 0..events.len() {
        match mem::replace(&mut events[index], Event::tombstone()) {
            Event::Start {
                kind: NodeKind::Tombstone,
                forward_parent: None,
                ..
            } => {}
            Event::Start {
                kind,
                forward_parent,
                binders,
                error,
            } => {
                chain.push((kind, binders, error));
                let mut next = forward_parent;
                while let Some(parent) = next {
                    let slot = events
                        .get_mut(parent as usize)
                        .ok_or(TreeError::StaleCompletedMarker { marker: parent })?;
                    match mem::replace(slot, Event::tombstone()) {
                        Event::Start {
                            kind,
                            forward_parent,
                            binders,
                            error,
                        } => {
                            chain.push((kind, binders, error));
                            next = forward_parent;
                        }
                        _ => return Err(TreeError::StaleCompletedMarker { marker: parent }),
                    }
                }
                for (kind, binders, error) in chain.drain(..).rev() {
                    if kind != NodeKind::Tombstone {
                        ops.push(Op::Open {
                            kind,
                            binders,
                            error,
                        });
                    }
                }
            }
            Event::Token { raw, kind } => ops.push(Op::Token { raw, kind }),
            Event::Finish => ops.push(Op::Close),
        }
    }
    Ok(ops)
}

struct Assembler<'t> {
    tokens: &'t TokenList,
    kinds: Vec<TokenKind>,
    nodes: Vec<NodeData>,
    stack: Vec<OpenNode>,
    root: Option<NodeId>,
    roots: usize,
    /// First raw token not yet attached to any node.
    next_raw: usize,
    eof: usize,
}

type Assembled = (Vec<NodeData>, Vec<TokenKind>, NodeId);

impl<'t> Assembler<'t> {
    fn new(tokens: &'t TokenList) -> Self {
        Assembler {
            tokens,
            kinds: tokens.iter().map(|token| token.kind).collect(),
            nodes: Vec::new(),
            stack: Vec::new(),
            root: None,
            roots: 0,
            next_raw: 0,
            eof: tokens.len().saturating_sub(1),
        }
    }

    fn run(mut self, ops: &[Op]) -> Result<Assembled, TreeError> {
        // Raw index that ends the trivia run each operation sits in.
        let mut gap_ends = vec![self.eof; ops.len()];
        let mut upcoming = self.eof;
        for (index, op) in ops.iter().enumerate().rev() {
            gap_ends[index] = upcoming;
            if let Op::Token { raw, .. } = op {
                upcoming = *raw as usize;
            }
        }

        for (index, op) in ops.iter().enumerate() {
            let gap_end = gap_ends[index];
            match op {
                Op::Open {
                    kind,
                    binders,
                    error,
                } => {
                    let empty = closes_before_next_token(&ops[index + 1..]);
                    self.open(*kind, *binders, error.clone(), gap_end, empty)?;
                }
                Op::Close => self.close(gap_end)?,
                Op::Token { raw, kind } => self.token(*raw as usize, *kind)?,
            }
        }

        if !self.stack.is_empty() {
            return Err(TreeError::UnclosedMarkers {
                count: self.stack.len(),
            });
        }
        if self.roots > 1 {
            return Err(TreeError::MultipleRoots { count: self.roots });
        }
        let root = self.root.ok_or(TreeError::MissingRoot)?;
        self.check_trivia(self.next_raw..self.eof)?;
        Ok((self.nodes, self.kinds, root))
    }

    fn open(
        &mut self,
        kind: NodeKind,
        binders: EdgeBinders,
        message: Option<Box<str>>,
        gap_end: usize,
        empty: bool,
    ) -> Result<(), TreeError> {
        let parent = self.stack.last().map(|open| open.id);
        let detached = empty && message.is_none();
        let edge = match parent {
            None => 0,
            Some(_) => {
                let run = self.trivia_run(gap_end)?;
                if detached {
                    0
                } else if empty {
                    run.len()
                } else {
                    binders.left.edge_position(&run).min(run.len())
                }
            }
        };
        if let Some(parent) = parent {
            self.attach_trivia(parent, edge);
        } else {
            self.roots += 1;
        }

        let id = NodeId(to_u32(self.nodes.len()));
        let start = self.offset();
        self.nodes.push(NodeData {
            kind,
            span: Span::point(start),
            parent,
            children: Vec::new(),
            message,
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()]
                .children
                .push(SyntaxElement::Node(id));
        } else if self.root.is_none() {
            self.root = Some(id);
        }
        self.stack.push(OpenNode {
            id,
            start,
            right: binders.right,
            detached,
        });
        Ok(())
    }

    fn close(&mut self, gap_end: usize) -> Result<(), TreeError> {
        let run = self.trivia_run(gap_end)?;
        let Some(node) = self.stack.pop() else {
            return Err(TreeError::MissingRoot);
        };
        let edge = if self.stack.is_empty() {
            run.len()
        } else if node.detached {
            0
        } else {
            node.right.edge_position(&run).min(run.len())
        };
        self.attach_trivia(node.id, edge);
        self.nodes[node.id.index()].span = Span::new(node.start, self.offset());
        Ok(())
    }

    fn token(&mut self, raw: usize, kind: TokenKind) -> Result<(), TreeError> {
        let Some(top) = self.stack.last().map(|open| open.id) else {
            return Err(if self.root.is_some() {
                TreeError::UnconsumedToken {
                    index: raw,
                    kind: self.tokens.kind(raw),
                }
            } else {
                TreeError::MissingRoot
            });
        };
        let pending = raw.saturating_sub(self.next_raw);
        self.check_trivia(self.next_raw..raw)?;
        self.attach_trivia(top, pending);
        if let Some(slot) = self.kinds.get_mut(raw) {
            *slot = kind;
        }
        self.nodes[top.index()]
            .children
            .push(SyntaxElement::Token(TokenId(to_u32(raw))));
        self.next_raw = raw + 1;
        Ok(())
    }

    /// The unattached trivia in front of `gap_end`.
    fn trivia_run(&self, gap_end: usize) -> Result<Vec<TriviaPiece<'t>>, TreeError> {
        let range = self.next_raw..gap_end.max(self.next_raw);
        self.check_trivia(range.clone())?;
        Ok(range
            .map(|index| TriviaPiece {
                kind: self.tokens.kind(index),
                text: self.tokens.text(index),
            })
            .collect())
    }

    fn check_trivia(&self, range: std::ops::Range<usize>) -> Result<(), TreeError> {
        for index in range {
            let kind = self.tokens.kind(index);
            if !kind.is_trivia() {
                return Err(TreeError::UnconsumedToken { index, kind });
            }
        }
        Ok(())
    }

    fn attach_trivia(&mut self, node: NodeId, count: usize) {
        let children = &mut self.nodes[node.index()].children;
        for index in self.next_raw..self.next_raw + count {
            children.push(SyntaxElement::Token(TokenId(to_u32(index))));
        }
        self.next_raw += count;
    }

    /// Offset where the first unattached token starts.
    fn offset(&self) -> u32 {
        self.tokens.span(self.next_raw).start
    }
}

/// Whether the node opened just before `rest` closes without consuming a
/// token.
fn closes_before_next_token(rest: &[Op]) -> bool {
    let mut depth = 1usize;
    for op in rest {
        match op {
            Op::Open { .. } => depth += 1,
            Op::Close => {
                depth -= 1;
                if depth == 0 {
                    return true;
                }
            }
            Op::Token { .. } => return false,
        }
    }
    false
}

fn collect_diagnostics(tree: &SyntaxTree) -> Vec<Diagnostic> {
    tree.descendants(tree.root)
        .into_iter()
        .filter_map(|node| {
            let message = tree.error_message(node)?;
            Some(
                Diagnostic::error(ErrorCode::E1001)
                    .with_message(message)
                    .with_label(tree.node_span(node), message),
            )
        })
        .collect()
}

fn to_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
