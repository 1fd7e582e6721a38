//! Marker-based tree builder.
//!
//! The builder never holds a tree while parsing. It records an event log
//! (`Start`, `Token`, `Finish`) that the sink turns into a tree once the
//! grammar is done:
//!
//! - [`Builder::mark`] pushes a placeholder `Start` and returns a [`Marker`]
//! - [`Builder::done`] / [`Builder::error`] fill in the placeholder and
//!   push `Finish`
//! - [`Builder::drop_marker`] leaves the placeholder as a tombstone, so the
//!   consumed tokens belong to the enclosing node
//! - [`Builder::rollback`] truncates the log and restores the cursor,
//!   including its remap log
//! - [`Builder::precede`] opens a new marker and links the completed one to
//!   it through `forward_parent`, which wraps already-built structure
//!   without undoing it
//!
//! A builder can also be *truncated* at a byte offset: until the limit is
//! lifted it reports `Eof` there, which lets the grammar parse a prefix of
//! the remaining input (a receiver type ending before the last dot) with
//! the ordinary rules.
//!
//! Open markers form a stack. Closing, dropping or rolling back anything
//! but the innermost open marker is a contract violation: the builder is
//! *poisoned*, reports `Eof` from then on so grammar loops unwind, and
//! [`Builder::finish`] returns the first [`TreeError`].

pub(crate) mod event;

use kt_ir::{NodeKind, Span, TokenKind, TokenList};
use tracing::{debug, trace};

use crate::binders::EdgeBinders;
use crate::cursor::{Cursor, CursorState};
use crate::TreeError;

use self::event::Event;

/// An open node. Resolve it exactly once through the builder.
#[must_use = "markers must be closed, dropped or rolled back"]
#[derive(Debug)]
pub struct Marker {
    pos: u32,
    /// Start of the precede chain; equal to `pos` for a plain mark.
    first: u32,
    state: CursorState,
}

/// A closed node that can still be wrapped with [`Builder::precede`].
#[derive(Copy, Clone, Debug)]
pub struct CompletedMarker {
    pos: u32,
    first: u32,
    state: CursorState,
    kind: NodeKind,
}

impl CompletedMarker {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }
}

pub struct Builder<'a> {
    cursor: Cursor<'a>,
    events: Vec<Event>,
    /// Event indices of open markers, innermost last.
    open: Vec<u32>,
    poison: Option<TreeError>,
    /// Offset at which the input is treated as ending.
    limit: Option<u32>,
}

impl<'a> Builder<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Builder {
            cursor: Cursor::new(tokens),
            events: Vec::new(),
            open: Vec::new(),
            poison: None,
            limit: None,
        }
    }

    // Cursor access. A poisoned builder sits at `Eof`, and so does one
    // whose cursor reached the truncation limit.

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        if self.cut_off(self.cursor.current_offset()) {
            TokenKind::Eof
        } else {
            self.cursor.current_kind()
        }
    }

    #[inline]
    pub fn current_text(&self) -> &'a str {
        if self.cut_off(self.cursor.current_offset()) {
            ""
        } else {
            self.cursor.current_text()
        }
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    pub fn current_offset(&self) -> u32 {
        self.cursor.current_offset()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    #[inline]
    pub fn eof(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    pub fn lookahead(&self, k: usize) -> TokenKind {
        if self.cut_off(self.cursor.lookahead_offset(k)) {
            TokenKind::Eof
        } else {
            self.cursor.lookahead(k)
        }
    }

    pub fn lookahead_offset(&self, k: usize) -> u32 {
        self.cursor.lookahead_offset(k)
    }

    pub fn raw_lookup(&self, steps: isize) -> TokenKind {
        self.cursor.raw_lookup(steps)
    }

    pub fn newline_before_current(&self) -> bool {
        self.cut_off(self.cursor.current_offset()) || self.cursor.newline_before_current()
    }

    /// Treat the input as ending at `offset` until [`Self::restore_limit`].
    /// Returns the limit it replaces.
    pub fn truncate_at(&mut self, offset: u32) -> Option<u32> {
        self.limit.replace(offset)
    }

    pub fn restore_limit(&mut self, previous: Option<u32>) {
        self.limit = previous;
    }

    pub fn remap_current(&mut self, kind: TokenKind) {
        if self.poison.is_none() {
            self.cursor.remap_current(kind);
        }
    }

    pub fn enable_newlines(&mut self) {
        self.cursor.enable_newlines();
    }

    pub fn disable_newlines(&mut self) {
        self.cursor.disable_newlines();
    }

    pub fn restore_newlines_state(&mut self) {
        self.cursor.restore_newlines_state();
    }

    /// Consume the current token into the innermost open node.
    pub fn advance(&mut self) {
        if self.eof() {
            return;
        }
        let raw = u32::try_from(self.cursor.position()).unwrap_or(u32::MAX);
        self.events.push(Event::Token {
            raw,
            kind: self.cursor.current_kind(),
        });
        self.cursor.advance();
    }

    // Markers

    pub fn mark(&mut self) -> Marker {
        let pos = self.next_event();
        self.events.push(Event::tombstone());
        self.open.push(pos);
        Marker {
            pos,
            first: pos,
            state: self.cursor.state(),
        }
    }

    /// Close `marker` as a node of `kind` ending at the current position.
    pub fn done(&mut self, marker: Marker, kind: NodeKind) -> CompletedMarker {
        self.close(marker, kind, None)
    }

    /// Close `marker` as an error node carrying `message`.
    pub fn error(&mut self, marker: Marker, message: impl Into<Box<str>>) -> CompletedMarker {
        self.close(marker, NodeKind::Error, Some(message.into()))
    }

    /// Report an error at the current position without consuming anything.
    pub fn error_here(&mut self, message: impl Into<Box<str>>) {
        let marker = self.mark();
        self.error(marker, message);
    }

    /// Discard `marker`; its tokens stay with the enclosing node.
    pub fn drop_marker(&mut self, marker: Marker) {
        if !self.pop_open(marker.pos) {
            return;
        }
        let last = self.events.len().checked_sub(1);
        if marker.pos == marker.first && last == Some(marker.pos as usize) {
            self.events.pop();
        }
    }

    /// Undo everything since `marker` was opened, cursor included.
    pub fn rollback(&mut self, marker: Marker) {
        match self.open.last() {
            Some(&top) if top == marker.pos => {
                self.open.pop();
            }
            Some(&top) => {
                self.violate(TreeError::RollbackPastOpenMarker {
                    marker: marker.pos,
                    open: top,
                });
                return;
            }
            None => {
                self.violate(TreeError::NotOpen { marker: marker.pos });
                return;
            }
        }
        trace!(
            from = self.cursor.position(),
            to = ?marker.state,
            events = self.events.len().saturating_sub(marker.first as usize),
            "rollback"
        );
        self.events.truncate(marker.first as usize);
        self.cursor.restore(marker.state);
    }

    /// Open a marker that starts where `completed` starts, so that when it
    /// is closed it becomes the parent of `completed`.
    pub fn precede(&mut self, completed: CompletedMarker) -> Marker {
        let pos = self.next_event();
        if let Some(&top) = self.open.last() {
            if top > completed.pos {
                self.violate(TreeError::PrecedeUnderOpenMarker {
                    marker: completed.pos,
                    open: top,
                });
            }
        }
        match self.events.get_mut(completed.pos as usize) {
            Some(Event::Start {
                kind,
                forward_parent: forward_parent @ None,
                ..
            }) if *kind == completed.kind => *forward_parent = Some(pos),
            _ => self.violate(TreeError::StaleCompletedMarker {
                marker: completed.pos,
            }),
        }
        self.events.push(Event::tombstone());
        self.open.push(pos);
        Marker {
            pos,
            first: completed.first,
            state: completed.state,
        }
    }

    /// Replace the edge binders of a closed node.
    pub fn set_binders(&mut self, completed: CompletedMarker, new: EdgeBinders) {
        match self.events.get_mut(completed.pos as usize) {
            Some(Event::Start { kind, binders, .. }) if *kind == completed.kind => *binders = new,
            _ => self.violate(TreeError::StaleCompletedMarker {
                marker: completed.pos,
            }),
        }
    }

    /// Number of markers currently open.
    pub fn open_markers(&self) -> usize {
        self.open.len()
    }

    pub fn poisoned(&self) -> Option<&TreeError> {
        self.poison.as_ref()
    }

    /// Hand over the event log, or the contract violation that ended the
    /// parse.
    pub(crate) fn finish(self) -> Result<Vec<Event>, TreeError> {
        if let Some(error) = self.poison {
            return Err(error);
        }
        if !self.open.is_empty() {
            return Err(TreeError::UnclosedMarkers {
                count: self.open.len(),
            });
        }
        Ok(self.events)
    }

    #[cfg(test)]
    pub(crate) fn event_count(&self) -> usize {
        self.events.len()
    }

    fn close(
        &mut self,
        marker: Marker,
        new_kind: NodeKind,
        message: Option<Box<str>>,
    ) -> CompletedMarker {
        let completed = CompletedMarker {
            pos: marker.pos,
            first: marker.first,
            state: marker.state,
            kind: new_kind,
        };
        if !self.pop_open(marker.pos) {
            return completed;
        }
        if let Some(Event::Start { kind, error, .. }) = self.events.get_mut(marker.pos as usize) {
            *kind = new_kind;
            *error = message;
        }
        self.events.push(Event::Finish);
        completed
    }

    fn pop_open(&mut self, pos: u32) -> bool {
        match self.open.last() {
            Some(&top) if top == pos => {
                self.open.pop();
                true
            }
            Some(&top) => {
                self.violate(TreeError::OutOfOrderClose {
                    closing: pos,
                    open: top,
                });
                false
            }
            None => {
                self.violate(TreeError::NotOpen { marker: pos });
                false
            }
        }
    }

    fn cut_off(&self, offset: u32) -> bool {
        self.poison.is_some() || self.limit.is_some_and(|limit| offset >= limit)
    }

    fn next_event(&self) -> u32 {
        u32::try_from(self.events.len()).unwrap_or(u32::MAX)
    }

    pub(crate) fn violate(&mut self, error: TreeError) {
        if self.poison.is_none() {
            debug!(%error, "parser contract violation");
            self.poison = Some(error);
        }
    }
}
