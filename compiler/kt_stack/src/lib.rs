//! Deep-recursion support for the recursive-descent parser.
//!
//! Two separate limits apply to a recursive parse:
//!
//! - the machine stack, grown on demand by [`ensure_sufficient_stack`]
//! - the grammar nesting depth, counted by [`DepthBudget`]
//!
//! The first keeps pathological input (thousands of nested parentheses)
//! from overflowing the native stack. The second lets the caller cap
//! nesting so such input degrades into an error node instead.
//!
//! On `wasm32` the stack is not grown; the depth budget still applies.

/// If less than this much stack remains, grow before recursing.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if it is close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack; call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Counts nesting levels against a fixed maximum.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DepthBudget {
    depth: usize,
    max: usize,
}

impl DepthBudget {
    pub const fn new(max: usize) -> Self {
        DepthBudget { depth: 0, max }
    }

    /// Enter one level. Returns `false`, leaving the depth unchanged, when
    /// the maximum is already reached.
    #[inline]
    pub fn enter(&mut self) -> bool {
        if self.depth >= self.max {
            return false;
        }
        self.depth += 1;
        true
    }

    /// Leave a level previously entered with [`enter`](Self::enter).
    #[inline]
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }
}

#[cfg(test)]
mod tests;
