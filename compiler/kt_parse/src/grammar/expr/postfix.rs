//! The postfix chain: calls, indexing, member access, `!!`, `++`, `--`
//! and `::` references.

use kt_ir::{NodeKind as N, TokenKind as T, TokenSet};

use crate::lookahead::TypeArgumentListAhead;
use crate::recovery::{RecoveryCase, EXPRESSION_FIRST};
use crate::Parser;

const POSTFIX_OPERATIONS: TokenSet = TokenSet::of(&[T::PlusPlus, T::MinusMinus, T::ExclExcl]);

impl Parser<'_> {
    pub(super) fn parse_postfix_expression(&mut self) {
        let mut expression = self.mark();
        if self.at(T::ColonColon) {
            let kind = self.parse_double_colon_suffix();
            let completed = self.done(expression, kind);
            expression = self.precede(completed);
        } else {
            self.parse_atomic_expression();
        }

        loop {
            if self.interrupted_with_newline() {
                break;
            }
            let kind = if self.at(T::LBracket) {
                self.parse_array_access();
                N::ArrayAccessExpression
            } else if self.parse_call_suffix() {
                N::CallExpression
            } else if self.at(T::Dot) || self.at(T::SafeAccess) {
                let kind = if self.at(T::Dot) {
                    N::DotQualifiedExpression
                } else {
                    N::SafeAccessExpression
                };
                self.advance();
                self.parse_selector_call_expression();
                kind
            } else if self.at_set(POSTFIX_OPERATIONS) {
                self.parse_operation_reference();
                N::PostfixExpression
            } else if self.at(T::ColonColon) {
                self.parse_double_colon_suffix()
            } else {
                break;
            };
            let completed = self.done(expression, kind);
            expression = self.precede(completed);
        }
        self.drop_marker(expression);
    }

    /// `::name` or `::class`, with any receiver already parsed.
    fn parse_double_colon_suffix(&mut self) -> N {
        self.advance(); // ::
        if self.at(T::ClassKeyword) {
            self.advance();
            return N::ClassLiteralExpression;
        }
        let reference = self.mark();
        if self.expect_recovering(T::Identifier, RecoveryCase::ExpectingIdentifier) {
            self.done(reference, N::ReferenceExpression);
        } else {
            self.drop_marker(reference);
        }
        N::CallableReferenceExpression
    }

    /// The part after `.` or `?.`: an atomic expression, called when
    /// arguments follow on the same line.
    fn parse_selector_call_expression(&mut self) {
        let call = self.mark();
        self.parse_atomic_expression();
        if !self.newline_before_current() && self.parse_call_suffix() {
            self.done(call, N::CallExpression);
        } else {
            self.drop_marker(call);
        }
    }

    /// Arguments after a callee: `(args)`, `<T>(args)` and trailing
    /// lambdas. Returns whether any were there.
    fn parse_call_suffix(&mut self) -> bool {
        if self.parse_call_with_closure() {
            return true;
        }
        if self.at(T::LPar) {
            self.parse_value_argument_list();
            self.parse_call_with_closure();
            return true;
        }
        if self.at(T::Lt) {
            let ahead = self.match_token_stream_predicate(&mut TypeArgumentListAhead::new());
            if ahead.is_none() {
                return false;
            }
            self.parse_type_argument_list();
            if !self.newline_before_current() && self.at(T::LPar) {
                self.parse_value_argument_list();
            }
            self.parse_call_with_closure();
            return true;
        }
        false
    }

    /// Trailing lambdas on the same line, optionally labeled.
    fn parse_call_with_closure(&mut self) -> bool {
        let mut found = false;
        while !self.newline_before_current() {
            let argument = self.mark();
            if self.at(T::LBrace) {
                self.parse_lambda_expression();
            } else if self.at_label_definition() && self.lookahead(2) == T::LBrace {
                self.parse_labeled_expression();
            } else {
                self.drop_marker(argument);
                break;
            }
            self.done(argument, N::LambdaArgument);
            found = true;
        }
        found
    }

    /// `(a, name = b, *c)`
    pub(in crate::grammar) fn parse_value_argument_list(&mut self) {
        let list = self.mark();
        self.disable_newlines();
        if self.expect_recovering(T::LPar, RecoveryCase::ExpectingArgumentList) {
            if !self.at(T::RPar) {
                loop {
                    let start = self.position();
                    while self.at(T::Comma) {
                        self.error_and_advance("Expecting an argument", 1);
                    }
                    self.parse_value_argument();
                    if self.at(T::Colon) && self.lookahead(1) == T::Identifier {
                        self.error_and_advance("Unexpected type specification", 2);
                    }
                    if !self.at(T::Comma) {
                        if self.at_set(EXPRESSION_FIRST) && self.advanced_since(start) {
                            self.error_here("Expecting ','");
                            continue;
                        }
                        break;
                    }
                    self.advance(); // ,
                    if self.at(T::RPar) {
                        break;
                    }
                }
            }
            self.expect_recovering(T::RPar, RecoveryCase::ExpectingRightParenthesisInArgumentList);
        }
        self.restore_newlines_state();
        self.done(list, N::ValueArgumentList);
    }

    fn parse_value_argument(&mut self) {
        let argument = self.mark();
        if self.at(T::Identifier) && self.lookahead(1) == T::Eq {
            let name = self.mark();
            let reference = self.mark();
            self.advance();
            self.done(reference, N::ReferenceExpression);
            self.done(name, N::ValueArgumentName);
            self.advance(); // =
        }
        self.consume_if(T::Mul);
        self.parse_expression();
        self.done(argument, N::ValueArgument);
    }

    /// `[i, j]` after a receiver.
    fn parse_array_access(&mut self) {
        self.parse_bracketed_expressions(N::Indices, false, "Expecting an index element");
    }

    /// `[a, b]` as indices or as a collection literal.
    pub(super) fn parse_bracketed_expressions(
        &mut self,
        kind: N,
        can_be_empty: bool,
        missing_element: &str,
    ) {
        let expressions = self.mark();
        self.disable_newlines();
        self.advance(); // [
        if !can_be_empty && self.at(T::RBracket) {
            self.error_here(missing_element);
        } else {
            loop {
                if self.at(T::Comma) {
                    self.error_and_advance(missing_element, 1);
                    continue;
                }
                if self.at(T::RBracket) {
                    break;
                }
                self.parse_expression();
                if !self.at(T::Comma) {
                    break;
                }
                self.advance(); // ,
            }
        }
        self.expect_recovering(T::RBracket, RecoveryCase::ExpectingRightBracket);
        self.restore_newlines_state();
        self.done(expressions, kind);
    }
}
