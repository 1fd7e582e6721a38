//! Lossless lexer for Kotlin source.
//!
//! Every byte of input lands in exactly one token: whitespace and comments
//! are emitted as trivia, unrecognized bytes become `BadCharacter`. Doc
//! comments stay a single `DocComment` token; their inside is tokenized on
//! demand by [`lex_kdoc`].
//!
//! Soft keywords are emitted as `Identifier`. Only fixed keywords are
//! classified here.

mod convert;
mod kdoc;
mod raw_token;
mod strings;

use kt_ir::{Span, Token, TokenKind, TokenList};
use logos::Logos;

use crate::raw_token::RawToken;

pub use kdoc::{lex_kdoc, lex_kdoc_link};

/// Lex a whole file.
pub fn lex(source: &str) -> TokenList {
    let mut tokens = Vec::new();
    let body_start = shebang_len(source);
    if body_start > 0 {
        tokens.push(Token::new(
            TokenKind::ShebangComment,
            Span::new(0, offset(body_start, 0)),
        ));
    }
    push_tokens(&source[body_start..], offset(body_start, 0), &mut tokens);
    finish(source, 0, tokens)
}

/// Lex `source` as if it started at absolute offset `base`.
pub fn lex_with_base(source: &str, base: u32) -> TokenList {
    let mut tokens = Vec::new();
    push_tokens(source, base, &mut tokens);
    finish(source, base, tokens)
}

fn finish(source: &str, base: u32, tokens: Vec<Token>) -> TokenList {
    let mut list = TokenList::with_base(source, base);
    for token in tokens {
        list.push(token);
    }
    list.push(Token::new(TokenKind::Eof, Span::point(list.end_offset())));
    list
}

fn shebang_len(source: &str) -> usize {
    if source.starts_with("#!") {
        source.find('\n').unwrap_or(source.len())
    } else {
        0
    }
}

/// Absolute offset of local position `local` in a text starting at `base`.
#[inline]
pub(crate) fn offset(local: usize, base: u32) -> u32 {
    base.saturating_add(u32::try_from(local).unwrap_or(u32::MAX))
}

/// Append the tokens of `text` (without `Eof`) to `out`.
pub(crate) fn push_tokens(text: &str, base: u32, out: &mut Vec<Token>) {
    let mut logos = RawToken::lexer(text);
    while let Some(result) = logos.next() {
        let range = logos.span();
        let span = Span::new(offset(range.start, base), offset(range.end, base));
        let slice = logos.slice();
        match result {
            Ok(RawToken::String) => strings::push_string(slice, span.start, false, out),
            Ok(RawToken::RawString) => strings::push_string(slice, span.start, true, out),
            Ok(raw) => push_fused(Token::new(convert::convert_token(raw, slice), span), out),
            Err(()) => out.push(Token::new(TokenKind::BadCharacter, span)),
        }
    }
}

/// Push `token`, fusing it with the previous one into `!in`, `!is` or
/// `as?` when the two are adjacent.
fn push_fused(token: Token, out: &mut Vec<Token>) {
    if let Some(prev) = out.last_mut() {
        if prev.span.end == token.span.start {
            let fused = match (prev.kind, token.kind) {
                (TokenKind::Excl, TokenKind::InKeyword) => Some(TokenKind::NotIn),
                (TokenKind::Excl, TokenKind::IsKeyword) => Some(TokenKind::NotIs),
                (TokenKind::AsKeyword, TokenKind::Quest) => Some(TokenKind::AsSafe),
                _ => None,
            };
            if let Some(kind) = fused {
                *prev = Token::new(kind, prev.span.merge(token.span));
                return;
            }
        }
    }
    out.push(token);
}
