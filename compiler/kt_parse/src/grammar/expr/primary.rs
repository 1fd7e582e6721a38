//! Atomic expressions: names, literals, string templates, parenthesized
//! and collection literals, `this`/`super`, jumps, and the keyword-led
//! forms dispatched to `control.rs`.

use kt_ir::{NodeKind as N, TokenKind as T, TokenSet};

use crate::recovery::{RecoveryCase, EXPRESSION_FIRST, EXPRESSION_FOLLOW};
use crate::Parser;

/// Keywords that start a declaration in expression position.
const LOCAL_DECLARATION_FIRST: TokenSet = TokenSet::of(&[
    T::ClassKeyword,
    T::InterfaceKeyword,
    T::FunKeyword,
    T::ValKeyword,
    T::VarKeyword,
    T::TypeAliasKeyword,
]);

const ATOMIC_RECOVERY_SET: TokenSet =
    EXPRESSION_FOLLOW.union(TokenSet::of(&[T::LongTemplateEntryEnd, T::ClosingQuote]));

/// Where a `${...}` entry missing its `}` gives up.
const LONG_TEMPLATE_ENTRY_RECOVERY_SET: TokenSet = TokenSet::of(&[
    T::ClosingQuote,
    T::RegularStringPart,
    T::EscapeSequence,
    T::ShortTemplateEntryStart,
    T::LongTemplateEntryStart,
]);

impl Parser<'_> {
    pub(super) fn parse_atomic_expression(&mut self) {
        if self.at(T::LPar) {
            self.parse_parenthesized_expression();
        } else if self.at(T::LBracket) {
            self.parse_bracketed_expressions(
                N::CollectionLiteralExpression,
                true,
                "Expecting an element",
            );
        } else if self.at(T::ThisKeyword) {
            self.parse_this_expression();
        } else if self.at(T::SuperKeyword) {
            self.parse_super_expression();
        } else if self.at(T::ObjectKeyword) {
            self.parse_object_literal();
        } else if self.at(T::ThrowKeyword) {
            self.parse_throw();
        } else if self.at(T::ReturnKeyword) {
            self.parse_return();
        } else if self.at(T::ContinueKeyword) {
            self.parse_jump(N::Continue);
        } else if self.at(T::BreakKeyword) {
            self.parse_jump(N::Break);
        } else if self.at(T::IfKeyword) {
            self.parse_if();
        } else if self.at(T::WhenKeyword) {
            self.parse_when();
        } else if self.at(T::TryKeyword) {
            self.parse_try();
        } else if self.at(T::ForKeyword) {
            self.parse_for();
        } else if self.at(T::WhileKeyword) {
            self.parse_while();
        } else if self.at(T::DoKeyword) {
            self.parse_do_while();
        } else if self.at_set(LOCAL_DECLARATION_FIRST) && self.parse_local_declaration() {
            // declared in place
        } else if self.at(T::Identifier) {
            self.parse_simple_name_expression();
        } else if self.at(T::LBrace) {
            self.parse_lambda_expression();
        } else if self.at(T::OpenQuote) {
            self.parse_string_template();
        } else if !self.parse_literal_constant() {
            self.error_with_recovery("Expecting an element", Some(ATOMIC_RECOVERY_SET));
        }
    }

    fn parse_simple_name_expression(&mut self) {
        let reference = self.mark();
        self.advance();
        self.done(reference, N::ReferenceExpression);
    }

    fn parse_literal_constant(&mut self) -> bool {
        let kind = match self.current() {
            T::TrueKeyword | T::FalseKeyword => N::BooleanConstant,
            T::IntegerLiteral => N::IntegerConstant,
            T::FloatLiteral => N::FloatConstant,
            T::CharacterLiteral => N::CharacterConstant,
            T::NullKeyword => N::Null,
            _ => return false,
        };
        let literal = self.mark();
        self.advance();
        self.done(literal, kind);
        true
    }

    fn parse_parenthesized_expression(&mut self) {
        let expression = self.mark();
        self.disable_newlines();
        self.advance(); // (
        if self.at(T::RPar) {
            self.error_here("Expecting an expression");
        } else {
            self.parse_expression();
        }
        self.expect_recovering(T::RPar, RecoveryCase::ExpectingRightParenthesis);
        self.restore_newlines_state();
        self.done(expression, N::Parenthesized);
    }

    /// `this` or `this@Label`.
    fn parse_this_expression(&mut self) {
        let expression = self.mark();
        let reference = self.mark();
        self.advance(); // this
        self.done(reference, N::ReferenceExpression);
        self.parse_label_reference_with_no_whitespace();
        self.done(expression, N::ThisExpression);
    }

    /// `super`, `super<Base>` or `super@Label`.
    fn parse_super_expression(&mut self) {
        let expression = self.mark();
        let reference = self.mark();
        self.advance(); // super
        self.done(reference, N::ReferenceExpression);

        if self.at(T::Lt) {
            let supertype = self.mark();
            self.disable_newlines();
            self.advance(); // <
            self.parse_type_ref();
            if self.at(T::Gt) {
                self.advance();
                self.drop_marker(supertype);
            } else {
                self.rollback(supertype);
            }
            self.restore_newlines_state();
        }
        self.parse_label_reference_with_no_whitespace();
        self.done(expression, N::SuperExpression);
    }

    fn parse_throw(&mut self) {
        let expression = self.mark();
        self.advance(); // throw
        self.parse_expression();
        self.done(expression, N::Throw);
    }

    /// `return`, `return@label`, optionally with a value on the same line.
    fn parse_return(&mut self) {
        let expression = self.mark();
        self.advance(); // return
        self.parse_label_reference_with_no_whitespace();
        if self.at_set(EXPRESSION_FIRST) && !self.at(T::EolOrSemicolon) {
            self.parse_expression();
        }
        self.done(expression, N::Return);
    }

    /// `break` or `continue`, optionally labeled.
    fn parse_jump(&mut self, kind: N) {
        let expression = self.mark();
        self.advance();
        self.parse_label_reference_with_no_whitespace();
        self.done(expression, kind);
    }

    /// `"text $name ${expression} \n"`
    fn parse_string_template(&mut self) {
        let template = self.mark();
        self.advance(); // opening quote
        loop {
            match self.current() {
                T::RegularStringPart => self.parse_single_token_entry(N::LiteralStringTemplateEntry),
                T::EscapeSequence => self.parse_single_token_entry(N::EscapeStringTemplateEntry),
                T::ShortTemplateEntryStart => self.parse_short_template_entry(),
                T::LongTemplateEntryStart => self.parse_long_template_entry(),
                _ => break,
            }
        }
        self.expect_recovering(T::ClosingQuote, RecoveryCase::ExpectingClosingQuote);
        self.done(template, N::StringTemplate);
    }

    fn parse_single_token_entry(&mut self, kind: N) {
        let entry = self.mark();
        self.advance();
        self.done(entry, kind);
    }

    /// `$name` or `$this`.
    fn parse_short_template_entry(&mut self) {
        let entry = self.mark();
        self.advance(); // $
        if self.at(T::ThisKeyword) {
            let expression = self.mark();
            let reference = self.mark();
            self.advance();
            self.done(reference, N::ReferenceExpression);
            self.done(expression, N::ThisExpression);
        } else {
            let reference = self.mark();
            if self.expect_recovering(T::Identifier, RecoveryCase::ExpectingIdentifier) {
                self.done(reference, N::ReferenceExpression);
            } else {
                self.drop_marker(reference);
            }
        }
        self.done(entry, N::ShortStringTemplateEntry);
    }

    /// `${expression}`
    fn parse_long_template_entry(&mut self) {
        let entry = self.mark();
        self.advance(); // ${
        if self.at(T::LongTemplateEntryEnd) {
            self.error_here("Expecting an expression");
        } else {
            self.parse_expression();
        }
        self.expect_recovering_with(
            T::LongTemplateEntryEnd,
            RecoveryCase::ExpectingRightBrace,
            LONG_TEMPLATE_ENTRY_RECOVERY_SET,
        );
        self.done(entry, N::LongStringTemplateEntry);
    }
}
