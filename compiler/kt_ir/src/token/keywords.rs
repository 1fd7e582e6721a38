//! Spelling-to-kind lookup for fixed and soft keywords.
//!
//! Both tables are derived from the keyword sets on first use and never
//! mutated afterwards.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use super::set::{KEYWORDS, SOFT_KEYWORDS};
use super::{TokenKind, TokenSet};

static FIXED: LazyLock<FxHashMap<&'static str, TokenKind>> =
    LazyLock::new(|| spelling_table(KEYWORDS));

static SOFT: LazyLock<FxHashMap<&'static str, TokenKind>> =
    LazyLock::new(|| spelling_table(SOFT_KEYWORDS));

fn spelling_table(set: TokenSet) -> FxHashMap<&'static str, TokenKind> {
    set.iter()
        .filter_map(|kind| kind.spelling().map(|text| (text, kind)))
        .filter(|(text, _)| text.bytes().all(|b| b.is_ascii_lowercase()))
        .collect()
}

/// Fixed keyword spelled `text`. Fixed keywords are never identifiers.
pub fn keyword_for_text(text: &str) -> Option<TokenKind> {
    FIXED.get(text).copied()
}

/// Soft keyword spelled `text`. The lexer still emits such words as
/// identifiers; the parser promotes them where the keyword is expected.
pub fn soft_keyword_for_text(text: &str) -> Option<TokenKind> {
    SOFT.get(text).copied()
}

#[inline]
pub fn is_fixed_keyword(kind: TokenKind) -> bool {
    KEYWORDS.contains(kind)
}

#[inline]
pub fn is_soft_keyword(kind: TokenKind) -> bool {
    SOFT_KEYWORDS.contains(kind)
}
