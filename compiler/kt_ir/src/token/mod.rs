//! Token representation for the Kotlin lexer and parser.

mod keywords;
mod kind;
mod list;
pub mod set;

pub use keywords::{is_fixed_keyword, is_soft_keyword, keyword_for_text, soft_keyword_for_text};
pub use kind::TokenKind;
pub use list::TokenList;
pub use set::TokenSet;

use std::fmt;

use crate::Span;

/// One lexical unit: its kind and absolute byte span.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}
