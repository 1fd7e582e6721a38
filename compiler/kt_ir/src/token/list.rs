//! Lexer output: tokens plus the text they were cut from.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use super::{Token, TokenKind};
use crate::Span;

/// An ordered token sequence ending in [`TokenKind::Eof`].
///
/// Spans are absolute file offsets. A list produced for a sub-region of a
/// file stores that region's text plus `base`, the offset of its first
/// byte, so `text()` still works without the rest of the file.
#[derive(Clone)]
pub struct TokenList {
    source: Arc<str>,
    base: u32,
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self::with_base(source, 0)
    }

    pub fn with_base(source: impl Into<Arc<str>>, base: u32) -> Self {
        TokenList {
            source: source.into(),
            base,
            tokens: Vec::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Number of tokens, including the trailing `Eof`.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Kind at `index`, or `Eof` past the end.
    #[inline]
    pub fn kind(&self, index: usize) -> TokenKind {
        self.tokens.get(index).map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Span at `index`, or a point at the end of the text past the end.
    #[inline]
    pub fn span(&self, index: usize) -> Span {
        self.tokens
            .get(index)
            .map_or_else(|| Span::point(self.end_offset()), |t| t.span)
    }

    /// Source text of the token at `index`; empty for `Eof`.
    pub fn text(&self, index: usize) -> &str {
        self.slice(self.span(index))
    }

    /// Source text covered by an absolute span.
    pub fn slice(&self, span: Span) -> &str {
        let start = span.start.saturating_sub(self.base) as usize;
        let end = span.end.saturating_sub(self.base) as usize;
        self.source.get(start..end).unwrap_or("")
    }

    #[inline]
    pub fn source(&self) -> &Arc<str> {
        &self.source
    }

    #[inline]
    pub fn base_offset(&self) -> u32 {
        self.base
    }

    /// Absolute offset one past the last byte of the text.
    pub fn end_offset(&self) -> u32 {
        let len = u32::try_from(self.source.len()).unwrap_or(u32::MAX);
        self.base.saturating_add(len)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl fmt::Debug for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tokens.iter()).finish()
    }
}
