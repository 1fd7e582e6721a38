//! Core data types shared by the Kotlin lexer and parser.
//!
//! - [`Span`] for byte ranges in source text
//! - [`TokenKind`], keyword tables and [`TokenSet`] bitsets
//! - [`TokenList`] for lexer output, always terminated by [`TokenKind::Eof`]
//! - [`NodeKind`] for the nodes the parser produces
//!
//! The token model is pure data. Classification never depends on parser
//! state; context-sensitive keyword promotion is the cursor's job.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod node;
mod span;
pub mod token;

pub use node::NodeKind;
pub use span::{Span, SpanError};
pub use token::{
    is_fixed_keyword, is_soft_keyword, keyword_for_text, soft_keyword_for_text, Token, TokenKind,
    TokenList, TokenSet,
};
