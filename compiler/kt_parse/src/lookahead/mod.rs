//! Bounded speculative scans that decide grammar forks.
//!
//! [`Parser::match_token_stream_predicate`] walks forward from the cursor,
//! counting `(`/`[`/`{` on a stack and `<` by count only, and feeds every
//! token to a [`TokenStreamPattern`] together with whether the scan is at
//! top level. The scan always ends with a rollback, so nothing it touches
//! (cursor, remaps, events) survives; only the pattern's result does.
//!
//! Results are byte offsets of the token the pattern settled on.

use kt_ir::{is_soft_keyword, TokenKind, TokenSet};

use crate::parser::Parser;

/// A stateful matcher driven by the scan loop.
pub trait TokenStreamPattern {
    /// Look at the token under the cursor, which starts at `offset`.
    /// Returning `true` ends the scan.
    fn process_token(&mut self, p: &mut Parser<'_>, offset: u32, top_level: bool) -> bool;

    /// What the scan found, if anything.
    fn result(&self) -> Option<u32>;

    /// Whether the given nesting counters count as top level.
    fn is_top_level(&self, angle: i32, bracket: i32, brace: i32, paren: i32) -> bool {
        angle == 0 && bracket == 0 && brace == 0 && paren == 0
    }

    /// Called for a closing bracket with no matching opener. Returning
    /// `true` ends the scan.
    fn handle_unmatched_closing(&mut self, _kind: TokenKind) -> bool {
        false
    }
}

/// A stateless test of the current token.
pub trait TokenStreamPredicate {
    fn matching(&self, p: &mut Parser<'_>, top_level: bool) -> bool;

    fn or<O: TokenStreamPredicate>(self, other: O) -> Or<Self, O>
    where
        Self: Sized,
    {
        Or(self, other)
    }
}

/// Current token is `kind`, optionally only at top level.
#[derive(Copy, Clone, Debug)]
pub struct At {
    pub kind: TokenKind,
    pub top_level_only: bool,
}

impl At {
    pub const fn new(kind: TokenKind) -> Self {
        At {
            kind,
            top_level_only: true,
        }
    }

    pub const fn anywhere(kind: TokenKind) -> Self {
        At {
            kind,
            top_level_only: false,
        }
    }
}

impl TokenStreamPredicate for At {
    fn matching(&self, p: &mut Parser<'_>, top_level: bool) -> bool {
        (top_level || !self.top_level_only) && p.at(self.kind)
    }
}

/// Current token is in `look_for`. Members of `top_level_only` match only
/// at top level.
#[derive(Copy, Clone, Debug)]
pub struct AtSet {
    pub look_for: TokenSet,
    pub top_level_only: TokenSet,
}

impl AtSet {
    pub const fn new(set: TokenSet) -> Self {
        AtSet {
            look_for: set,
            top_level_only: set,
        }
    }
}

impl TokenStreamPredicate for AtSet {
    fn matching(&self, p: &mut Parser<'_>, top_level: bool) -> bool {
        (top_level || !p.at_set(self.top_level_only)) && p.at_set(self.look_for)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Or<A, B>(A, B);

impl<A: TokenStreamPredicate, B: TokenStreamPredicate> TokenStreamPredicate for Or<A, B> {
    fn matching(&self, p: &mut Parser<'_>, top_level: bool) -> bool {
        self.0.matching(p, top_level) || self.1.matching(p, top_level)
    }
}

/// Offset of the first `look_for` before `stop_at`.
#[derive(Debug)]
pub struct FirstBefore<L, S> {
    look_for: L,
    stop_at: S,
    found: Option<u32>,
}

impl<L: TokenStreamPredicate, S: TokenStreamPredicate> FirstBefore<L, S> {
    pub fn new(look_for: L, stop_at: S) -> Self {
        FirstBefore {
            look_for,
            stop_at,
            found: None,
        }
    }
}

impl<L: TokenStreamPredicate, S: TokenStreamPredicate> TokenStreamPattern for FirstBefore<L, S> {
    fn process_token(&mut self, p: &mut Parser<'_>, offset: u32, top_level: bool) -> bool {
        if self.look_for.matching(p, top_level) {
            self.found = Some(offset);
            return true;
        }
        self.stop_at.matching(p, top_level)
    }

    fn result(&self) -> Option<u32> {
        self.found
    }
}

/// Offset of the last `look_for` before a top-level `stop_at`.
#[derive(Debug)]
pub struct LastBefore<L, S> {
    look_for: L,
    stop_at: S,
    /// Keep going when `stop_at` directly follows an occurrence.
    dont_stop_right_after_occurrence: bool,
    previous_matched: bool,
    found: Option<u32>,
}

impl<L: TokenStreamPredicate, S: TokenStreamPredicate> LastBefore<L, S> {
    pub fn new(look_for: L, stop_at: S, dont_stop_right_after_occurrence: bool) -> Self {
        LastBefore {
            look_for,
            stop_at,
            dont_stop_right_after_occurrence,
            previous_matched: false,
            found: None,
        }
    }
}

impl<L: TokenStreamPredicate, S: TokenStreamPredicate> TokenStreamPattern for LastBefore<L, S> {
    fn process_token(&mut self, p: &mut Parser<'_>, offset: u32, top_level: bool) -> bool {
        let matched = self.look_for.matching(p, top_level);
        if matched {
            self.found = Some(offset);
        }
        if self.stop_at.matching(p, top_level)
            && top_level
            && (!self.dont_stop_right_after_occurrence || !self.previous_matched)
        {
            return true;
        }
        self.previous_matched = matched;
        false
    }

    fn result(&self) -> Option<u32> {
        self.found
    }
}

/// Tokens that may appear between the brackets of a type argument list.
const TYPE_ARGUMENT_TOKENS: TokenSet = TokenSet::of(&[
    TokenKind::Identifier,
    TokenKind::Dot,
    TokenKind::Comma,
    TokenKind::Lt,
    TokenKind::Gt,
    TokenKind::Quest,
    TokenKind::Mul,
    TokenKind::InKeyword,
    TokenKind::LPar,
    TokenKind::RPar,
    TokenKind::Arrow,
    TokenKind::Colon,
    TokenKind::At,
]);

/// Decides whether the `<` under the cursor opens a type argument list of
/// a call: a bracket-balanced run of type-shaped tokens, closed at top
/// level by `>` and followed by `(` or `{`.
///
/// Anything that cannot occur in a type (a literal, an operator, a brace)
/// disqualifies the list, so `a < b && c > (d)` stays a comparison.
#[derive(Debug, Default)]
pub struct TypeArgumentListAhead {
    started: bool,
    found: Option<u32>,
}

impl TypeArgumentListAhead {
    pub fn new() -> Self {
        TypeArgumentListAhead::default()
    }
}

impl TokenStreamPattern for TypeArgumentListAhead {
    fn process_token(&mut self, p: &mut Parser<'_>, offset: u32, top_level: bool) -> bool {
        let kind = p.current();
        if !self.started {
            self.started = true;
            return kind != TokenKind::Lt;
        }
        if top_level && kind == TokenKind::Gt {
            if matches!(p.lookahead(1), TokenKind::LPar | TokenKind::LBrace) {
                self.found = Some(offset);
            }
            return true;
        }
        !(TYPE_ARGUMENT_TOKENS.contains(kind) || is_soft_keyword(kind))
    }

    fn result(&self) -> Option<u32> {
        self.found
    }

    fn is_top_level(&self, angle: i32, bracket: i32, brace: i32, paren: i32) -> bool {
        angle == 1 && bracket == 0 && brace == 0 && paren == 0
    }

    fn handle_unmatched_closing(&mut self, _kind: TokenKind) -> bool {
        true
    }
}

#[cfg(test)]
mod tests;
