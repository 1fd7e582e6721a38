//! Token cursor with trivia skipping, newline awareness and kind remapping.
//!
//! The cursor always rests on a significant token (or `Eof`); whitespace
//! and comments are stepped over by [`Cursor::advance`] but stay visible
//! through [`Cursor::raw_lookup`].
//!
//! Contextual keywords are handled by *remapping*: the grammar may
//! reclassify the token under the cursor, promoting an identifier to a soft
//! keyword or demoting a soft keyword to an identifier. Remaps are kept in
//! an append-only log of `(token index, kind)` pairs instead of mutating the
//! token list, so a [`CursorState`] taken before a speculative scan restores
//! the exact classification by truncating the log.

use kt_ir::{Span, TokenKind, TokenList};
use tracing::trace;

/// Snapshot of everything a rollback has to restore.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CursorState {
    pos: usize,
    remaps: usize,
    newlines: usize,
}

pub struct Cursor<'a> {
    tokens: &'a TokenList,
    /// Raw index of the current token; never points at trivia.
    pos: usize,
    /// Remap log, sorted by token index because the cursor only moves
    /// forward between rollbacks. The last entry for an index wins.
    remaps: Vec<(u32, TokenKind)>,
    /// Whether a line break currently ends a statement. The bottom entry
    /// is never popped.
    newlines: Vec<bool>,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        let mut cursor = Cursor {
            tokens,
            pos: 0,
            remaps: Vec::new(),
            newlines: vec![true],
        };
        cursor.skip_trivia();
        cursor
    }

    /// Raw index of the current token.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Kind of the current token, after remapping.
    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.kind_at(self.pos)
    }

    /// Source text of the current token; empty at `Eof`.
    #[inline]
    pub fn current_text(&self) -> &'a str {
        self.tokens.text(self.pos)
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.tokens.span(self.pos)
    }

    /// Byte offset where the current token starts.
    #[inline]
    pub fn current_offset(&self) -> u32 {
        self.current_span().start
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Kind of the `k`-th significant token from here; `lookahead(0)` is
    /// the current token. Past the end this is `Eof`.
    pub fn lookahead(&self, k: usize) -> TokenKind {
        self.kind_at(self.lookahead_index(k))
    }

    /// Byte offset where the `k`-th significant token from here starts.
    pub fn lookahead_offset(&self, k: usize) -> u32 {
        self.tokens.span(self.lookahead_index(k)).start
    }

    fn lookahead_index(&self, k: usize) -> usize {
        let mut index = self.pos;
        for _ in 0..k {
            if self.tokens.kind(index) == TokenKind::Eof {
                break;
            }
            index = self.next_significant(index + 1);
        }
        index
    }

    /// Kind of the raw token `steps` away from the current one, trivia
    /// included. Negative steps look backwards. Out of range is `Eof`.
    pub fn raw_lookup(&self, steps: isize) -> TokenKind {
        self.pos
            .checked_add_signed(steps)
            .map_or(TokenKind::Eof, |index| self.kind_at(index))
    }

    /// Whether a line break separates the current token from the previous
    /// significant one. Always `true` at `Eof`, always `false` while
    /// newlines are disabled. Line breaks inside comments do not count.
    pub fn newline_before_current(&self) -> bool {
        if !self.newlines_enabled() {
            return false;
        }
        if self.at_eof() {
            return true;
        }
        let mut index = self.pos;
        while index > 0 {
            index -= 1;
            match self.tokens.kind(index) {
                TokenKind::WhiteSpace => {
                    if self.tokens.text(index).contains('\n') {
                        return true;
                    }
                }
                kind if kind.is_trivia() => {}
                _ => break,
            }
        }
        false
    }

    /// Step to the next significant token. A no-op at `Eof`.
    pub fn advance(&mut self) {
        if self.at_eof() {
            return;
        }
        trace!(
            pos = self.pos,
            kind = ?self.current_kind(),
            span = %self.current_span(),
            "advance"
        );
        self.pos = self.next_significant(self.pos + 1);
    }

    /// Reclassify the current token.
    pub fn remap_current(&mut self, kind: TokenKind) {
        if self.current_kind() == kind {
            return;
        }
        trace!(pos = self.pos, from = ?self.current_kind(), to = ?kind, "remap");
        let index = u32::try_from(self.pos).unwrap_or(u32::MAX);
        self.remaps.push((index, kind));
    }

    pub fn state(&self) -> CursorState {
        CursorState {
            pos: self.pos,
            remaps: self.remaps.len(),
            newlines: self.newlines.len(),
        }
    }

    /// Return to a state taken earlier, undoing every advance, remap and
    /// newline-mode push made since. Modes popped below the snapshot's
    /// depth are not brought back.
    pub fn restore(&mut self, state: CursorState) {
        self.pos = state.pos;
        self.remaps.truncate(state.remaps);
        self.newlines.truncate(state.newlines.max(1));
    }

    /// Make line breaks insignificant, e.g. inside parentheses.
    pub fn disable_newlines(&mut self) {
        self.newlines.push(false);
    }

    /// Make line breaks significant again, e.g. inside a block nested in
    /// parentheses.
    pub fn enable_newlines(&mut self) {
        self.newlines.push(true);
    }

    /// Undo the most recent `enable_newlines`/`disable_newlines`.
    pub fn restore_newlines_state(&mut self) {
        if self.newlines.len() > 1 {
            self.newlines.pop();
        }
    }

    #[inline]
    pub fn newlines_enabled(&self) -> bool {
        self.newlines.last().copied().unwrap_or(true)
    }

    /// Kind of the raw token at `index`, after remapping.
    pub fn kind_at(&self, index: usize) -> TokenKind {
        let raw = self.tokens.kind(index);
        let Ok(key) = u32::try_from(index) else {
            return raw;
        };
        self.remaps
            .iter()
            .rev()
            .take_while(|(at, _)| *at >= key)
            .find(|(at, _)| *at == key)
            .map_or(raw, |&(_, kind)| kind)
    }

    fn next_significant(&self, mut index: usize) -> usize {
        while self.tokens.kind(index).is_trivia() {
            index += 1;
        }
        index.min(self.tokens.len().saturating_sub(1))
    }

    fn skip_trivia(&mut self) {
        self.pos = self.next_significant(self.pos);
    }
}
