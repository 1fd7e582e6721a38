//! Expression Parsing
//!
//! Binary operators are parsed by precedence climbing over the levels in
//! [`Precedence`], each level left-associative. Below the binary levels
//! sit prefix operators, then the postfix chain (calls, indexing, member
//! access), then atomic expressions.
//!
//! # Module Structure
//!
//! - `mod.rs`: Entry point, binary levels, prefix operators, labels
//! - `postfix.rs`: Calls, value and type arguments, indexing, selectors
//! - `primary.rs`: Atomic expressions, literals, string templates
//! - `control.rs`: `if`, `when`, `try`, loops and jumps
//! - `block.rs`: Blocks, statements, lambdas
//!
//! A line break ends an expression unless the operator after it is one of
//! the few that may start a continuation line, see
//! [`Parser::interrupted_with_newline`].

mod block;
mod control;
mod postfix;
mod primary;

use kt_ir::token::set::ALL_ASSIGNMENTS;
use kt_ir::{NodeKind as N, TokenKind as T, TokenSet};

use crate::recovery::EXPRESSION_FIRST;
use crate::Parser;

use super::modifiers::AnnotationMode;

/// Binary precedence levels, tightest first.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Precedence {
    As,
    Multiplicative,
    Additive,
    Range,
    SimpleName,
    Elvis,
    InOrIs,
    Comparison,
    Equality,
    Conjunction,
    Disjunction,
    Assignment,
}

impl Precedence {
    const fn operations(self) -> TokenSet {
        match self {
            Precedence::As => TokenSet::of(&[T::AsKeyword, T::AsSafe]),
            Precedence::Multiplicative => TokenSet::of(&[T::Mul, T::Div, T::Perc]),
            Precedence::Additive => TokenSet::of(&[T::Plus, T::Minus]),
            Precedence::Range => TokenSet::of(&[T::Range, T::RangeUntil]),
            Precedence::SimpleName => TokenSet::single(T::Identifier),
            Precedence::Elvis => TokenSet::single(T::Elvis),
            Precedence::InOrIs => TokenSet::of(&[T::InKeyword, T::NotIn, T::IsKeyword, T::NotIs]),
            Precedence::Comparison => TokenSet::of(&[T::Lt, T::Gt, T::LtEq, T::GtEq]),
            Precedence::Equality => TokenSet::of(&[T::EqEq, T::ExclEq, T::EqEqEq, T::ExclEqEqEq]),
            Precedence::Conjunction => TokenSet::single(T::AndAnd),
            Precedence::Disjunction => TokenSet::single(T::OrOr),
            Precedence::Assignment => ALL_ASSIGNMENTS,
        }
    }

    /// The next tighter level; `None` below `as`, where prefix parsing
    /// takes over.
    const fn higher(self) -> Option<Precedence> {
        match self {
            Precedence::As => None,
            Precedence::Multiplicative => Some(Precedence::As),
            Precedence::Additive => Some(Precedence::Multiplicative),
            Precedence::Range => Some(Precedence::Additive),
            Precedence::SimpleName => Some(Precedence::Range),
            Precedence::Elvis => Some(Precedence::SimpleName),
            Precedence::InOrIs => Some(Precedence::Elvis),
            Precedence::Comparison => Some(Precedence::InOrIs),
            Precedence::Equality => Some(Precedence::Comparison),
            Precedence::Conjunction => Some(Precedence::Equality),
            Precedence::Disjunction => Some(Precedence::Conjunction),
            Precedence::Assignment => Some(Precedence::Disjunction),
        }
    }
}

/// Operators that may start a continuation line.
const ALLOW_NEWLINE_OPERATIONS: TokenSet = TokenSet::of(&[
    T::Dot,
    T::SafeAccess,
    T::Colon,
    T::AsKeyword,
    T::AsSafe,
    T::Elvis,
    T::OrOr,
    T::AndAnd,
]);

const PREFIX_OPERATIONS: TokenSet = TokenSet::of(&[
    T::Minus,
    T::Plus,
    T::MinusMinus,
    T::PlusPlus,
    T::Excl,
    T::ExclExcl,
]);

impl Parser<'_> {
    /// Any expression, assignments included.
    pub(in crate::grammar) fn parse_expression(&mut self) {
        if !self.at_set(EXPRESSION_FIRST) {
            self.error_here("Expecting an expression");
            return;
        }
        self.nested(|p| p.parse_binary_expression(Precedence::Assignment));
    }

    fn parse_binary_expression(&mut self, precedence: Precedence) {
        let mut expression = self.mark();
        self.parse_operand(precedence);

        while !self.interrupted_with_newline() && self.at_set(precedence.operations()) {
            let operation = self.current();
            self.parse_operation_reference();
            let kind = match precedence {
                Precedence::As => {
                    self.parse_type_ref();
                    N::BinaryWithType
                }
                Precedence::InOrIs if matches!(operation, T::IsKeyword | T::NotIs) => {
                    self.parse_type_ref();
                    N::IsExpression
                }
                _ => {
                    self.parse_operand(precedence);
                    N::BinaryExpression
                }
            };
            let completed = self.done(expression, kind);
            expression = self.precede(completed);
        }
        self.drop_marker(expression);
    }

    /// The operand of a binary level: the next tighter level.
    fn parse_operand(&mut self, precedence: Precedence) {
        match precedence.higher() {
            Some(higher) => self.parse_binary_expression(higher),
            None => self.parse_prefix_expression(),
        }
    }

    /// A line break before anything but a continuation operator ends the
    /// expression.
    pub(super) fn interrupted_with_newline(&self) -> bool {
        !ALLOW_NEWLINE_OPERATIONS.contains(self.current()) && self.newline_before_current()
    }

    pub(super) fn parse_operation_reference(&mut self) {
        let operation = self.mark();
        self.advance();
        self.done(operation, N::OperationReference);
    }

    fn parse_prefix_expression(&mut self) {
        if self.at(T::At) {
            if !self.parse_local_declaration() {
                let expression = self.mark();
                self.parse_annotations(AnnotationMode::Default);
                self.nested(|p| p.parse_prefix_expression());
                self.done(expression, N::AnnotatedExpression);
            }
        } else if self.at_label_definition() {
            self.parse_labeled_expression();
        } else if self.at_set(PREFIX_OPERATIONS) {
            let expression = self.mark();
            self.parse_operation_reference();
            self.nested(|p| p.parse_prefix_expression());
            self.done(expression, N::PrefixExpression);
        } else {
            self.parse_postfix_expression();
        }
    }

    /// `name@` with nothing between the name and the `@`.
    pub(super) fn at_label_definition(&self) -> bool {
        self.check(T::Identifier)
            && self.lookahead(1) == T::At
            && self.current_span().end == self.lookahead_offset(1)
    }

    /// `outer@ for (...) { ... }`
    pub(super) fn parse_labeled_expression(&mut self) {
        let expression = self.mark();
        let qualifier = self.mark();
        let label = self.mark();
        self.advance(); // name
        self.advance(); // @
        self.done(label, N::Label);
        self.done(qualifier, N::LabelQualifier);
        self.nested(|p| p.parse_prefix_expression());
        self.done(expression, N::LabeledExpression);
    }

    /// `@label` glued to the keyword before it, as in `return@outer` or
    /// `this@Outer`.
    pub(super) fn parse_label_reference_with_no_whitespace(&mut self) {
        if self.check(T::At)
            && !self.raw_lookup(-1).is_trivia()
            && self.lookahead(1) == T::Identifier
            && self.current_span().end == self.lookahead_offset(1)
        {
            let qualifier = self.mark();
            let label = self.mark();
            self.advance(); // @
            self.advance(); // name
            self.done(label, N::Label);
            self.done(qualifier, N::LabelQualifier);
        }
    }
}
