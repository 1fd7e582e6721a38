//! Control structures: `if`, `when`, `try`, `for`, `while`, `do`-`while`.

use kt_ir::token::set::MODIFIER_KEYWORDS;
use kt_ir::{NodeKind as N, TokenKind as T, TokenSet};

use crate::lookahead::{At, AtSet, FirstBefore};
use crate::recovery::{
    RecoveryCase, IN_KEYWORD_L_BRACE_SET, TRY_CATCH_RECOVERY_TOKEN_SET,
    WHEN_CONDITION_RECOVERY_SET,
};
use crate::Parser;

use super::super::decl::PropertyMode;
use super::super::modifiers::DECLARATION_MODIFIERS;

/// Where the search for `val` in a `when` subject stops.
const WHEN_SUBJECT_STOP: TokenSet =
    TokenSet::of(&[T::RPar, T::LBrace, T::RBrace, T::Semicolon, T::Eq]);

const WHEN_ELSE_ARROW_RECOVERY_SET: TokenSet =
    TokenSet::of(&[T::Arrow, T::LBrace, T::RBrace, T::EolOrSemicolon]);

const NO_MODIFIER_BEFORE_FOR_LOOP_PARAMETER: TokenSet =
    TokenSet::of(&[T::InKeyword, T::RPar, T::Colon]);

impl Parser<'_> {
    /// `if (condition) then else otherwise`
    pub(super) fn parse_if(&mut self) {
        let expression = self.mark();
        self.advance(); // if
        self.parse_condition();

        let then = self.mark();
        if !self.at(T::ElseKeyword) && !self.at(T::Semicolon) {
            self.parse_control_structure_body();
        }
        if self.at(T::Semicolon) && self.lookahead(1) == T::ElseKeyword {
            self.advance(); // ;
        }
        self.done(then, N::Then);

        // `else ->` is a when entry, not this if's branch
        if self.at(T::ElseKeyword) && self.lookahead(1) != T::Arrow {
            self.advance(); // else
            let otherwise = self.mark();
            if !self.at(T::Semicolon) {
                self.parse_control_structure_body();
            }
            self.done(otherwise, N::Else);
        }
        self.done(expression, N::If);
    }

    /// `(expression)` with line breaks ignored inside.
    fn parse_condition(&mut self) {
        self.disable_newlines();
        if self.expect_recovering(T::LPar, RecoveryCase::ExpectingConditionInParentheses) {
            let condition = self.mark();
            self.parse_expression();
            self.done(condition, N::Condition);
            self.expect_recovering(T::RPar, RecoveryCase::ExpectingRightParenthesis);
        }
        self.restore_newlines_state();
    }

    /// A block when at `{`, otherwise a single expression.
    fn parse_control_structure_body(&mut self) {
        if self.at(T::LBrace) {
            self.parse_block();
        } else {
            self.parse_expression();
        }
    }

    /// `when (subject) { conditions -> body ... }`
    pub(super) fn parse_when(&mut self) {
        let expression = self.mark();
        self.advance(); // when

        self.disable_newlines();
        if self.at(T::LPar) {
            self.advance();
            let declares_subject = self
                .match_token_stream_predicate(&mut FirstBefore::new(
                    At::new(T::ValKeyword),
                    AtSet::new(WHEN_SUBJECT_STOP),
                ))
                .is_some();
            if declares_subject {
                let property = self.mark();
                self.parse_modifier_list(DECLARATION_MODIFIERS, TokenSet::EMPTY);
                let kind = self.parse_property(PropertyMode::Local);
                self.done(property, kind);
            } else {
                self.parse_expression();
            }
            self.expect_recovering(T::RPar, RecoveryCase::ExpectingRightParenthesis);
        }
        self.restore_newlines_state();

        self.enable_newlines();
        if self.expect_recovering(T::LBrace, RecoveryCase::ExpectingLeftBrace) {
            while !self.eof() && !self.at(T::RBrace) {
                let start = self.position();
                self.parse_when_entry();
                if !self.advanced_since(start) {
                    self.error_and_advance("Expecting a when-condition", 1);
                }
            }
            self.expect_recovering(T::RBrace, RecoveryCase::ExpectingRightBrace);
        }
        self.restore_newlines_state();
        self.done(expression, N::When);
    }

    fn parse_when_entry(&mut self) {
        let entry = self.mark();
        if self.at(T::ElseKeyword) {
            self.advance(); // else
            if !self.at(T::Arrow) {
                self.error_until("Expecting '->'", WHEN_ELSE_ARROW_RECOVERY_SET);
            }
            if self.at(T::Arrow) {
                self.advance();
                self.parse_when_entry_body();
            } else if self.at(T::LBrace) {
                // the arrow is simply missing
                self.parse_control_structure_body();
            } else if !self.at_set(WHEN_CONDITION_RECOVERY_SET) {
                self.error_and_advance("Expecting '->'", 1);
            }
        } else {
            loop {
                while self.at(T::Comma) {
                    self.error_and_advance("Expecting a when-condition", 1);
                }
                self.parse_when_condition();
                if !self.at(T::Comma) {
                    break;
                }
                self.advance(); // ,
                if self.at(T::Arrow) {
                    break;
                }
            }
            self.expect_recovering(T::Arrow, RecoveryCase::ExpectingArrow);
            self.parse_when_entry_body();
        }
        self.done(entry, N::WhenEntry);
        self.consume_if(T::Semicolon);
    }

    fn parse_when_entry_body(&mut self) {
        if self.at_set(WHEN_CONDITION_RECOVERY_SET) {
            self.error_here("Expecting an element");
        } else {
            self.parse_control_structure_body();
        }
    }

    /// `in range`, `is Type`, or a plain expression.
    fn parse_when_condition(&mut self) {
        let condition = self.mark();
        self.disable_newlines();
        let kind = if self.at(T::InKeyword) || self.at(T::NotIn) {
            self.parse_operation_reference();
            if self.at_set(WHEN_CONDITION_RECOVERY_SET) {
                self.error_here("Expecting an element");
            } else {
                self.parse_expression();
            }
            N::WhenConditionInRange
        } else if self.at(T::IsKeyword) || self.at(T::NotIs) {
            self.advance();
            if self.at_set(WHEN_CONDITION_RECOVERY_SET) {
                self.error_here("Expecting a type");
            } else {
                self.parse_type_ref();
            }
            N::WhenConditionIsPattern
        } else {
            if self.at_set(WHEN_CONDITION_RECOVERY_SET) {
                self.error_here("Expecting an expression, is-condition or in-condition");
            } else {
                self.parse_expression();
            }
            N::WhenConditionExpression
        };
        self.restore_newlines_state();
        self.done(condition, kind);
    }

    /// `try { } catch (e: E) { } finally { }`
    pub(super) fn parse_try(&mut self) {
        let expression = self.mark();
        self.advance(); // try
        self.parse_block();

        let mut handled = false;
        while self.at(T::CatchKeyword) {
            handled = true;
            let catch = self.mark();
            self.advance(); // catch
            if self.at_set(TRY_CATCH_RECOVERY_TOKEN_SET) {
                self.error_here("Expecting exception variable declaration");
            } else {
                let parameters = self.mark();
                self.expect_recovering(T::LPar, RecoveryCase::ExpectingLeftParenthesisInTryCatch);
                if self.at_set(TRY_CATCH_RECOVERY_TOKEN_SET) {
                    self.error_here("Expecting exception variable declaration");
                } else {
                    self.parse_value_parameter(true);
                    self.consume_if(T::Comma);
                    self.expect_recovering(
                        T::RPar,
                        RecoveryCase::ExpectingRightParenthesisInTryCatch,
                    );
                }
                self.done(parameters, N::ValueParameterList);
            }
            if self.at(T::LBrace) {
                self.parse_block();
            } else {
                self.error_here("Expecting a block: { ... }");
            }
            self.done(catch, N::Catch);
        }

        if self.at(T::FinallyKeyword) {
            handled = true;
            let finally = self.mark();
            self.advance();
            self.parse_block();
            self.done(finally, N::Finally);
        }

        if !handled {
            self.error_here("Expecting 'catch' or 'finally'");
        }
        self.done(expression, N::Try);
    }

    /// `for (name in range) body`, the name possibly destructured.
    pub(super) fn parse_for(&mut self) {
        let expression = self.mark();
        self.advance(); // for

        if self.expect_recovering(T::LPar, RecoveryCase::ExpectingLeftParenthesisToOpenLoopRange) {
            self.disable_newlines();
            if self.at(T::RPar) {
                self.error_here("Expecting a variable name");
            } else {
                let parameter = self.mark();
                if !self.at(T::InKeyword) {
                    self.parse_modifier_list(
                        MODIFIER_KEYWORDS,
                        NO_MODIFIER_BEFORE_FOR_LOOP_PARAMETER,
                    );
                }
                if self.at(T::ValKeyword) || self.at(T::VarKeyword) {
                    self.advance();
                }
                if self.at(T::LPar) {
                    let destructuring = self.mark();
                    self.parse_multi_declaration_name(
                        IN_KEYWORD_L_BRACE_SET,
                        RecoveryCase::ExpectingNameInForInMultiDeclaration,
                    );
                    self.done(destructuring, N::DestructuringDeclaration);
                } else {
                    self.expect_recovering(T::Identifier, RecoveryCase::ExpectingVariableNameInFor);
                    if self.at(T::Colon) {
                        self.advance();
                        self.parse_type_ref();
                    }
                }
                self.done(parameter, N::ValueParameter);

                if self.expect_recovering(T::InKeyword, RecoveryCase::ExpectingIn) {
                    let range = self.mark();
                    self.parse_expression();
                    self.done(range, N::LoopRange);
                }
            }
            self.expect_no_advance(T::RPar, "Expecting ')'");
            self.restore_newlines_state();
        }

        self.parse_loop_body();
        self.done(expression, N::For);
    }

    fn parse_loop_body(&mut self) {
        let body = self.mark();
        if !self.at(T::Semicolon) {
            self.parse_control_structure_body();
        }
        self.done(body, N::Body);
    }

    pub(super) fn parse_while(&mut self) {
        let expression = self.mark();
        self.advance(); // while
        self.parse_condition();
        self.parse_loop_body();
        self.done(expression, N::While);
    }

    pub(super) fn parse_do_while(&mut self) {
        let expression = self.mark();
        self.advance(); // do
        if !self.at(T::WhileKeyword) {
            self.parse_loop_body();
        }
        if self.expect_recovering(T::WhileKeyword, RecoveryCase::ExpectingWhileFollowedByPostCondition)
        {
            self.parse_condition();
        }
        self.done(expression, N::DoWhile);
    }
}
