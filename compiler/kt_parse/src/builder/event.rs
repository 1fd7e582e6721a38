//! The builder's append-only event log.

use kt_ir::{NodeKind, TokenKind};

use crate::binders::EdgeBinders;

/// One step of tree construction.
///
/// A `Start` is pushed when a marker is opened and rewritten in place when
/// the marker is closed. Dropped markers stay behind as `Tombstone` starts
/// without a matching `Finish`.
#[derive(Debug)]
pub(crate) enum Event {
    Start {
        kind: NodeKind,
        /// Index of a later `Start` that becomes this node's parent,
        /// recorded by `precede`.
        forward_parent: Option<u32>,
        binders: EdgeBinders,
        /// Message of an error node.
        error: Option<Box<str>>,
    },
    /// A significant token, with the kind it had when consumed.
    Token { raw: u32, kind: TokenKind },
    Finish,
}

impl Event {
    pub(crate) fn tombstone() -> Self {
        Event::Start {
            kind: NodeKind::Tombstone,
            forward_parent: None,
            binders: EdgeBinders::DEFAULT,
            error: None,
        }
    }
}
