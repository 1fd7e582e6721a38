//! Errors that abort a parse.
//!
//! Malformed input never produces one of these: it becomes error nodes
//! and diagnostics. A [`TreeError`] means the grammar broke a marker
//! contract, and the parse that hit it is abandoned.

use kt_ir::TokenKind;

use crate::tree::TokenId;

/// A structural contract violation by grammar code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("marker at event {closing} closed while marker at event {open} is still open")]
    OutOfOrderClose { closing: u32, open: u32 },

    #[error("marker at event {marker} is not open")]
    NotOpen { marker: u32 },

    #[error("rollback to marker at event {marker} while marker at event {open} is still open")]
    RollbackPastOpenMarker { marker: u32, open: u32 },

    #[error("completed marker at event {marker} was already preceded or rolled back")]
    StaleCompletedMarker { marker: u32 },

    #[error("cannot precede marker at event {marker} while later marker at event {open} is open")]
    PrecedeUnderOpenMarker { marker: u32, open: u32 },

    #[error("{count} marker(s) still open when the parse finished")]
    UnclosedMarkers { count: usize },

    #[error("`{operation}` requires a recovery set containing '{{' and '}}'")]
    RecoverySetWithoutBraces { operation: &'static str },

    #[error("token {index} ({kind:?}) was never consumed by the grammar")]
    UnconsumedToken { index: usize, kind: TokenKind },

    #[error("the grammar produced no root node")]
    MissingRoot,

    #[error("the grammar produced {count} root nodes")]
    MultipleRoots { count: usize },
}

/// Failure to parse a deferred region on demand.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EmbeddedError {
    #[error("token {token:?} ({kind:?}) is not a deferred region")]
    NotDeferred { token: TokenId, kind: TokenKind },

    #[error(transparent)]
    Tree(#[from] TreeError),
}
