//! Grammar-facing parser state: the builder plus the helpers every grammar
//! rule is written against.
//!
//! Helpers fall into four groups:
//!
//! - token tests: [`Parser::at`] and [`Parser::at_set`] promote identifiers
//!   to expected soft keywords and demote soft keywords where an identifier
//!   is expected; [`Parser::check`] and [`Parser::check_set`] answer the
//!   same question without touching the cursor
//! - expectations and recovery driven by [`RecoveryCase`]
//! - the speculative scan behind [`Parser::match_token_stream_predicate`]
//! - nesting and progress guards for pathological input

use kt_ir::{
    is_soft_keyword, soft_keyword_for_text, NodeKind, Span, TokenKind, TokenList, TokenSet,
};
use kt_stack::{ensure_sufficient_stack, DepthBudget};
use tracing::trace;

use crate::binders::EdgeBinders;
use crate::builder::event::Event;
use crate::builder::{Builder, CompletedMarker, Marker};
use crate::lookahead::TokenStreamPattern;
use crate::recovery::RecoveryCase;
use crate::{ParseOptions, TreeError};

pub struct Parser<'a> {
    builder: Builder<'a>,
    options: ParseOptions,
    depth: DepthBudget,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, options: ParseOptions) -> Self {
        Parser {
            builder: Builder::new(tokens),
            options,
            depth: DepthBudget::new(options.max_depth),
        }
    }

    #[inline]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub(crate) fn finish(self) -> Result<Vec<Event>, TreeError> {
        self.builder.finish()
    }

    // Builder delegation

    #[inline]
    pub fn current(&self) -> TokenKind {
        self.builder.current_kind()
    }

    #[inline]
    pub fn text(&self) -> &'a str {
        self.builder.current_text()
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.builder.current_span()
    }

    #[inline]
    pub fn current_offset(&self) -> u32 {
        self.builder.current_offset()
    }

    /// Raw index of the current token; grows with every advance.
    #[inline]
    pub fn position(&self) -> usize {
        self.builder.position()
    }

    #[inline]
    pub fn eof(&self) -> bool {
        self.builder.eof()
    }

    #[inline]
    pub fn lookahead(&self, k: usize) -> TokenKind {
        self.builder.lookahead(k)
    }

    /// Byte offset where the `k`-th significant token from here starts.
    #[inline]
    pub fn lookahead_offset(&self, k: usize) -> u32 {
        self.builder.lookahead_offset(k)
    }

    #[inline]
    pub fn raw_lookup(&self, steps: isize) -> TokenKind {
        self.builder.raw_lookup(steps)
    }

    #[inline]
    pub fn newline_before_current(&self) -> bool {
        self.builder.newline_before_current()
    }

    #[inline]
    pub fn advance(&mut self) {
        self.builder.advance();
    }

    #[inline]
    pub fn mark(&mut self) -> Marker {
        self.builder.mark()
    }

    #[inline]
    pub fn done(&mut self, marker: Marker, kind: NodeKind) -> CompletedMarker {
        self.builder.done(marker, kind)
    }

    #[inline]
    pub fn error(&mut self, marker: Marker, message: impl Into<Box<str>>) -> CompletedMarker {
        self.builder.error(marker, message)
    }

    /// Zero-width error at the cursor.
    #[inline]
    pub fn error_here(&mut self, message: impl Into<Box<str>>) {
        self.builder.error_here(message);
    }

    #[inline]
    pub fn drop_marker(&mut self, marker: Marker) {
        self.builder.drop_marker(marker);
    }

    #[inline]
    pub fn rollback(&mut self, marker: Marker) {
        self.builder.rollback(marker);
    }

    #[inline]
    pub fn precede(&mut self, completed: CompletedMarker) -> Marker {
        self.builder.precede(completed)
    }

    #[inline]
    pub fn set_binders(&mut self, completed: CompletedMarker, binders: EdgeBinders) {
        self.builder.set_binders(completed, binders);
    }

    pub fn enable_newlines(&mut self) {
        self.builder.enable_newlines();
    }

    pub fn disable_newlines(&mut self) {
        self.builder.disable_newlines();
    }

    pub fn restore_newlines_state(&mut self) {
        self.builder.restore_newlines_state();
    }

    /// Parse with the input cut off at `offset`, as if it ended there.
    pub fn truncated<R>(&mut self, offset: u32, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.builder.truncate_at(offset);
        let result = f(self);
        self.builder.restore_limit(previous);
        result
    }

    // Token tests

    /// Whether the current token is `kind`. An identifier spelled like an
    /// expected soft keyword is promoted to it; a soft keyword where an
    /// identifier is expected is demoted.
    pub fn at(&mut self, kind: TokenKind) -> bool {
        let current = self.current();
        if current == kind {
            return true;
        }
        if kind == TokenKind::EolOrSemicolon {
            return self.at_statement_end();
        }
        if current == TokenKind::Identifier
            && is_soft_keyword(kind)
            && kind.spelling() == Some(self.text())
        {
            self.builder.remap_current(kind);
            return true;
        }
        if kind == TokenKind::Identifier && is_soft_keyword(current) {
            self.builder.remap_current(TokenKind::Identifier);
            return true;
        }
        false
    }

    /// [`Self::at`] for any member of `set`.
    pub fn at_set(&mut self, set: TokenSet) -> bool {
        let current = self.current();
        if set.contains(current) {
            return true;
        }
        if set.contains(TokenKind::EolOrSemicolon) && self.at_statement_end() {
            return true;
        }
        if current == TokenKind::Identifier {
            if let Some(keyword) = soft_keyword_for_text(self.text()) {
                if set.contains(keyword) {
                    self.builder.remap_current(keyword);
                    return true;
                }
            }
        } else if set.contains(TokenKind::Identifier) && is_soft_keyword(current) {
            self.builder.remap_current(TokenKind::Identifier);
            return true;
        }
        false
    }

    /// [`Self::at`] without remapping.
    pub fn check(&self, kind: TokenKind) -> bool {
        let current = self.current();
        current == kind
            || (kind == TokenKind::EolOrSemicolon && self.at_statement_end())
            || (current == TokenKind::Identifier
                && is_soft_keyword(kind)
                && kind.spelling() == Some(self.text()))
            || (kind == TokenKind::Identifier && is_soft_keyword(current))
    }

    /// [`Self::at_set`] without remapping.
    pub fn check_set(&self, set: TokenSet) -> bool {
        let current = self.current();
        if set.contains(current)
            || (set.contains(TokenKind::EolOrSemicolon) && self.at_statement_end())
        {
            return true;
        }
        if current == TokenKind::Identifier {
            soft_keyword_for_text(self.text()).is_some_and(|keyword| set.contains(keyword))
        } else {
            set.contains(TokenKind::Identifier) && is_soft_keyword(current)
        }
    }

    /// End of input, a `;`, or a line break before the current token.
    fn at_statement_end(&self) -> bool {
        self.eof() || self.current() == TokenKind::Semicolon || self.newline_before_current()
    }

    /// A line break before the current token, or end of input.
    pub fn eol(&self) -> bool {
        self.newline_before_current() || self.eof()
    }

    /// Kind of the last significant token before the cursor.
    pub fn last_token(&self) -> TokenKind {
        let mut steps = -1;
        loop {
            let kind = self.raw_lookup(steps);
            if !kind.is_trivia() {
                return kind;
            }
            steps -= 1;
        }
    }

    // Expectations and recovery

    /// Consume `kind` if present. A lone backtick where an identifier is
    /// expected is skipped but still counts as missing.
    pub fn expect(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            return true;
        }
        if kind == TokenKind::Identifier && self.text() == "`" {
            self.advance();
        }
        false
    }

    /// Consume `kind`, or report `case` with its own sync set.
    pub fn expect_recovering(&mut self, kind: TokenKind, case: RecoveryCase) -> bool {
        self.expect_recovering_in(kind, case, case.sync_set())
    }

    /// Consume `kind`, or report `case` with `sync` as the sync set.
    pub fn expect_recovering_with(
        &mut self,
        kind: TokenKind,
        case: RecoveryCase,
        sync: TokenSet,
    ) -> bool {
        self.expect_recovering_in(kind, case, Some(sync))
    }

    fn expect_recovering_in(
        &mut self,
        kind: TokenKind,
        case: RecoveryCase,
        sync: Option<TokenSet>,
    ) -> bool {
        if self.expect(kind) {
            return true;
        }
        let message = case
            .message()
            .map_or_else(|| expecting(kind), str::to_owned);
        self.error_with_recovery_for(case, message, sync);
        false
    }

    /// Consume `kind`, or report `message` in place.
    pub fn expect_no_advance(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.expect(kind) {
            return true;
        }
        self.error_here(message);
        false
    }

    /// Consume `kind` when present.
    pub fn consume_if(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            return true;
        }
        false
    }

    /// Report a recovery case with caller wording.
    pub fn error_with_recovery_case(&mut self, case: RecoveryCase, message: &str) {
        self.error_with_recovery_for(case, message, case.sync_set());
    }

    /// Report `message`, either in place or by swallowing the current
    /// token.
    ///
    /// The report stays in place when `sync` is `None`, when the current
    /// token is in `sync` or is a brace, and when `sync` holds
    /// `EolOrSemicolon` and the cursor is at a statement end. In every
    /// other case exactly one token is consumed into the error node.
    pub fn error_with_recovery(&mut self, message: &str, sync: Option<TokenSet>) {
        let current = self.current();
        let in_place = match sync {
            None => true,
            Some(set) => {
                set.contains(current)
                    || matches!(current, TokenKind::LBrace | TokenKind::RBrace)
                    || (set.contains(TokenKind::EolOrSemicolon) && self.at_statement_end())
            }
        };
        trace!(reason = message, ?current, in_place, "recovery");
        if in_place {
            self.error_here(message);
        } else {
            self.error_and_advance(message, 1);
        }
    }

    fn error_with_recovery_for(
        &mut self,
        case: RecoveryCase,
        message: impl AsRef<str>,
        sync: Option<TokenSet>,
    ) {
        trace!(?case, "expectation failed");
        self.error_with_recovery(message.as_ref(), sync);
    }

    /// Wrap the next `n` tokens in one error node.
    pub fn error_and_advance(&mut self, message: &str, n: usize) {
        let marker = self.mark();
        for _ in 0..n {
            self.advance();
        }
        self.error(marker, message);
    }

    /// Skip to a member of `sync` (or a statement end when `sync` holds
    /// `EolOrSemicolon`). `sync` must contain both braces.
    pub fn skip_until(&mut self, sync: TokenSet) {
        if !self.require_braces(sync, "skip_until") {
            return;
        }
        while !self.eof() && !self.check_set(sync) {
            self.advance();
        }
    }

    /// Swallow everything up to `sync` into one error node.
    pub fn error_until(&mut self, message: &str, sync: TokenSet) {
        if !self.require_braces(sync, "error_until") {
            return;
        }
        let marker = self.mark();
        self.skip_until(sync);
        self.error(marker, message);
    }

    /// Close `marker` as an error when `condition` holds, drop it otherwise.
    pub fn error_if(&mut self, marker: Marker, condition: bool, message: &str) {
        if condition {
            self.error(marker, message);
        } else {
            self.drop_marker(marker);
        }
    }

    fn require_braces(&mut self, sync: TokenSet, operation: &'static str) -> bool {
        if sync.contains(TokenKind::LBrace) && sync.contains(TokenKind::RBrace) {
            return true;
        }
        self.builder
            .violate(TreeError::RecoverySetWithoutBraces { operation });
        false
    }

    /// Close a declaration so that its doc comment, and optionally the
    /// plain comments above it, become part of it.
    pub fn close_declaration_with_comment_binders(
        &mut self,
        marker: Marker,
        kind: NodeKind,
        preceding_non_doc_comments: bool,
    ) -> CompletedMarker {
        let completed = self.done(marker, kind);
        self.set_binders(
            completed,
            EdgeBinders::declaration(preceding_non_doc_comments),
        );
        completed
    }

    // Speculation

    /// Scan ahead with `pattern` and return its result. The scan is always
    /// rolled back. Hitting the lookahead limit counts as no match.
    pub fn match_token_stream_predicate(
        &mut self,
        pattern: &mut impl TokenStreamPattern,
    ) -> Option<u32> {
        let start = self.mark();
        let limit = self.options.lookahead_limit;
        let mut opens: Vec<TokenKind> = Vec::new();
        let (mut angle, mut bracket, mut brace, mut paren) = (0i32, 0i32, 0i32, 0i32);
        let mut steps = 0usize;
        let mut limited = false;

        while !self.eof() {
            if limit.is_some_and(|limit| steps >= limit) {
                limited = true;
                break;
            }
            let top_level = pattern.is_top_level(angle, bracket, brace, paren);
            let offset = self.current_offset();
            if pattern.process_token(self, offset, top_level) {
                break;
            }
            let current = self.current();
            match current {
                TokenKind::LPar => {
                    paren += 1;
                    opens.push(current);
                }
                TokenKind::Lt => angle += 1,
                TokenKind::LBrace => {
                    brace += 1;
                    opens.push(current);
                }
                TokenKind::LBracket => {
                    bracket += 1;
                    opens.push(current);
                }
                TokenKind::Gt => angle -= 1,
                TokenKind::RPar | TokenKind::RBrace | TokenKind::RBracket => {
                    let opener = match current {
                        TokenKind::RPar => {
                            paren -= 1;
                            TokenKind::LPar
                        }
                        TokenKind::RBrace => {
                            brace -= 1;
                            TokenKind::LBrace
                        }
                        _ => {
                            bracket -= 1;
                            TokenKind::LBracket
                        }
                    };
                    if opens.pop() != Some(opener) && pattern.handle_unmatched_closing(current) {
                        break;
                    }
                }
                _ => {}
            }
            self.advance();
            steps += 1;
        }

        self.rollback(start);
        let result = if limited { None } else { pattern.result() };
        trace!(steps, limited, ?result, "lookahead scan");
        result
    }

    // Guards

    /// Run a nested rule, or when the nesting budget is spent, consume one
    /// token into an error node instead.
    pub fn nested(&mut self, rule: impl FnOnce(&mut Self)) {
        if !self.depth.enter() {
            let marker = self.mark();
            if !self.eof() {
                self.advance();
            }
            self.error(marker, "Expression is nested too deeply");
            return;
        }
        ensure_sufficient_stack(|| rule(self));
        self.depth.leave();
    }

    /// Whether the cursor moved since `position` was taken.
    #[inline]
    pub fn advanced_since(&self, position: usize) -> bool {
        self.position() != position
    }
}

/// "Expecting 'x'" for a token kind.
pub(crate) fn expecting(kind: TokenKind) -> String {
    match kind.spelling() {
        Some(spelling) => format!("Expecting '{spelling}'"),
        None => format!("Expecting {}", kind.display_name()),
    }
}

/// A marker that may not exist, and never closes as an empty error.
pub struct OptionalMarker {
    marker: Option<Marker>,
    position: usize,
}

impl OptionalMarker {
    pub fn new(p: &mut Parser<'_>, actually_mark: bool) -> Self {
        OptionalMarker {
            marker: actually_mark.then(|| p.mark()),
            position: p.position(),
        }
    }

    pub fn done(self, p: &mut Parser<'_>, kind: NodeKind) {
        if let Some(marker) = self.marker {
            p.done(marker, kind);
        }
    }

    /// Close as an error, or drop when nothing was consumed.
    pub fn error(self, p: &mut Parser<'_>, message: &str) {
        if let Some(marker) = self.marker {
            if p.position() == self.position {
                p.drop_marker(marker);
            } else {
                p.error(marker, message);
            }
        }
    }

    pub fn drop(self, p: &mut Parser<'_>) {
        if let Some(marker) = self.marker {
            p.drop_marker(marker);
        }
    }
}

#[cfg(test)]
mod tests;
