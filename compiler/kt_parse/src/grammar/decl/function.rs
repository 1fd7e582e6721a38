//! Functions, receiver types, value and type parameter lists, and `where`
//! clauses.

use kt_ir::token::set::MODIFIER_KEYWORDS;
use kt_ir::{NodeKind as N, TokenKind as T, TokenSet};

use crate::lookahead::{AtSet, LastBefore, TokenStreamPredicate};
use crate::recovery::{
    RecoveryCase, LBRACE_RBRACE_SET, PARAMETER_NAME_RECOVERY_SET, TOP_LEVEL_DECLARATION_FIRST,
    TYPE_PARAMETER_GT_RECOVERY_SET, TYPE_REF_FIRST, VALUE_PARAMETERS_FOLLOW_SET,
};
use crate::Parser;

use super::super::modifiers::AnnotationMode;

/// Where a value parameter list appears.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(in crate::grammar) enum ValueParameters {
    Function,
    PrimaryConstructor,
    SecondaryConstructor,
    /// `(A, b: B) -> C`: bare types or named types.
    FunctionType,
}

impl ValueParameters {
    fn type_required(self) -> bool {
        self != ValueParameters::Function
    }

    /// Tokens right after `(` that mean the list is empty but unclosed.
    fn follow(self) -> TokenSet {
        match self {
            ValueParameters::Function => VALUE_PARAMETERS_FOLLOW_SET,
            ValueParameters::PrimaryConstructor | ValueParameters::SecondaryConstructor => {
                LBRACE_RBRACE_SET
            }
            ValueParameters::FunctionType => TokenSet::EMPTY,
        }
    }

    fn first(self) -> TokenSet {
        match self {
            ValueParameters::FunctionType => TYPE_REF_FIRST.union(MODIFIER_KEYWORDS).with(T::At),
            _ => VALUE_PARAMETER_FIRST,
        }
    }
}

const VALUE_PARAMETER_FIRST: TokenSet =
    TokenSet::of(&[T::Identifier, T::LBracket, T::ValKeyword, T::VarKeyword, T::At])
        .union(MODIFIER_KEYWORDS);

const NO_MODIFIER_BEFORE_FOR_VALUE_PARAMETER: TokenSet =
    TokenSet::of(&[T::Comma, T::Colon, T::Eq, T::RPar]);

const NO_MODIFIER_BEFORE_FOR_TYPE_PARAMETER: TokenSet =
    TokenSet::of(&[T::Gt, T::Comma, T::Colon]);

/// Tokens that can stand where a function name is missing.
const FUNCTION_NAME_FOLLOW: TokenSet =
    TokenSet::of(&[T::Lt, T::LPar, T::RPar, T::Colon, T::Eq]);

/// `.` or `?.` between a receiver type and the name.
const RECEIVER_TYPE_TERMINATORS: TokenSet = TokenSet::of(&[T::Dot, T::SafeAccess]);

const OUT_OF_RECEIVER: TokenSet =
    TokenSet::of(&[T::Eq, T::Semicolon, T::LBrace, T::RBrace]).union(TOP_LEVEL_DECLARATION_FIRST);

/// Where a receiver type can no longer continue: a body or initializer, a
/// new declaration, a parameter list that is not the first token, or a
/// name that is not followed by type syntax.
struct ReceiverBoundary {
    start: u32,
}

impl TokenStreamPredicate for ReceiverBoundary {
    fn matching(&self, p: &mut Parser<'_>, top_level: bool) -> bool {
        if !top_level {
            return false;
        }
        if p.check_set(OUT_OF_RECEIVER) {
            return true;
        }
        if p.check(T::LPar) {
            return p.current_offset() != self.start;
        }
        p.check(T::Identifier)
            && !matches!(
                p.lookahead(1),
                T::Lt | T::Dot | T::SafeAccess | T::Quest
            )
    }
}

impl Parser<'_> {
    /// `fun <T> R.name<U>(params): Type where ... = body`
    pub(in crate::grammar) fn parse_function(&mut self) -> N {
        self.advance(); // fun

        if self.at(T::RBrace) {
            self.error_here("Function body expected");
            return N::Fun;
        }

        let mut type_parameters = false;
        if self.at(T::Lt) {
            self.parse_type_parameter_list(
                RecoveryCase::MissingRightAngleBracketInTypeParameterListInFunction1,
            );
            type_parameters = true;
        }

        let receiver = self.parse_receiver_type("function", FUNCTION_NAME_FOLLOW);
        self.parse_function_or_property_name(
            receiver,
            "function",
            RecoveryCase::ExpectingFunctionName,
            FUNCTION_NAME_FOLLOW,
            false,
        );

        if self.at(T::Lt) {
            let second = self.mark();
            self.parse_type_parameter_list(
                RecoveryCase::MissingRightAngleBracketInTypeParameterListInFunction2,
            );
            self.error_if(
                second,
                type_parameters,
                "Only one type parameter list is allowed for a function",
            );
            type_parameters = true;
        }

        if self.at(T::LPar) {
            self.parse_value_parameter_list(ValueParameters::Function);
        } else {
            self.error_here("Expecting '('");
        }

        if self.at(T::Colon) {
            self.advance();
            self.parse_type_ref();
        }

        self.parse_type_constraints_guarded(type_parameters);

        if self.at(T::Semicolon) {
            self.advance();
        } else if self.at(T::Eq) || self.at(T::LBrace) {
            self.parse_function_body();
        }
        N::Fun
    }

    /// `= expression` or a block.
    pub(super) fn parse_function_body(&mut self) {
        if self.at(T::LBrace) {
            self.parse_block();
        } else if self.at(T::Eq) {
            self.advance();
            self.parse_expression();
        } else {
            self.error_here("Expecting function body");
        }
    }

    /// A receiver type and its `.`, when a top-level `.` comes before the
    /// name. Returns whether one was found.
    pub(super) fn parse_receiver_type(&mut self, title: &str, name_follow: TokenSet) -> bool {
        let annotations = self.mark();
        let annotated = self.parse_annotations(AnnotationMode::Default);
        let start = self.current_offset();
        let last_dot = self.match_token_stream_predicate(&mut LastBefore::new(
            AtSet::new(RECEIVER_TYPE_TERMINATORS),
            ReceiverBoundary { start },
            false,
        ));

        if annotated {
            if last_dot.is_some() {
                // the annotations belong to the receiver type
                self.rollback(annotations);
            } else {
                self.error(annotations, "Annotations are not allowed in this position");
            }
        } else {
            self.drop_marker(annotations);
        }

        let Some(last_dot) = last_dot else {
            return false;
        };
        self.truncated(last_dot, |p| p.parse_type_ref());

        if self.at_set(RECEIVER_TYPE_TERMINATORS) {
            self.advance();
        } else {
            self.error_with_recovery(
                &format!("Expecting '.' before a {title} name"),
                Some(name_follow),
            );
        }
        true
    }

    /// The declared name. With `name_required` unset, a token from
    /// `name_follow` may stand in for a missing name.
    pub(super) fn parse_function_or_property_name(
        &mut self,
        receiver_found: bool,
        title: &str,
        case: RecoveryCase,
        name_follow: TokenSet,
        name_required: bool,
    ) -> bool {
        if !name_required && self.at_set(name_follow) {
            return true;
        }
        if self.expect(T::Identifier) {
            return true;
        }
        let message = if receiver_found {
            format!("Expecting {title} name")
        } else {
            format!("Expecting {title} name or receiver type")
        };
        self.error_with_recovery_case(case, &message);
        false
    }

    pub(in crate::grammar) fn parse_type_parameter_list(&mut self, missing_gt: RecoveryCase) {
        let list = self.mark();
        self.disable_newlines();
        self.advance(); // <
        loop {
            if self.at(T::Comma) {
                self.error_and_advance("Expecting type parameter declaration", 1);
            }
            self.parse_type_parameter();
            if !self.at(T::Comma) {
                break;
            }
            self.advance();
            if self.at(T::Gt) {
                break;
            }
        }
        self.expect_recovering(T::Gt, missing_gt);
        self.restore_newlines_state();
        self.done(list, N::TypeParameterList);
    }

    fn parse_type_parameter(&mut self) {
        if self.at_set(TYPE_PARAMETER_GT_RECOVERY_SET) {
            self.error_here("Type parameter declaration expected");
            return;
        }
        let parameter = self.mark();
        self.parse_modifier_list(MODIFIER_KEYWORDS, NO_MODIFIER_BEFORE_FOR_TYPE_PARAMETER);
        self.expect_recovering(T::Identifier, RecoveryCase::TypeParameterNameExpected);
        if self.at(T::Colon) {
            self.advance();
            self.parse_type_ref();
        }
        self.done(parameter, N::TypeParameter);
    }

    pub(super) fn parse_type_constraints_guarded(&mut self, type_parameters: bool) {
        let constraints = self.mark();
        let present = self.parse_type_constraints();
        self.error_if(
            constraints,
            present && !type_parameters,
            "Type constraints are not allowed when no type parameters declared",
        );
    }

    /// `where T : A, U : B`. Returns whether a clause was there.
    pub(super) fn parse_type_constraints(&mut self) -> bool {
        if !self.at(T::WhereKeyword) {
            return false;
        }
        let list = self.mark();
        self.advance(); // where
        loop {
            self.consume_if(T::Comma);
            self.parse_type_constraint();
            if !self.at(T::Comma) {
                break;
            }
        }
        self.done(list, N::TypeConstraintList);
        true
    }

    fn parse_type_constraint(&mut self) {
        let constraint = self.mark();
        self.parse_annotations(AnnotationMode::Default);

        let reference = self.mark();
        if self.expect_recovering(T::Identifier, RecoveryCase::ExpectingTypeParameterName) {
            self.done(reference, N::ReferenceExpression);
        } else {
            self.drop_marker(reference);
        }
        self.expect_recovering(T::Colon, RecoveryCase::ExpectingColonBeforeUpperBound);
        self.parse_type_ref();
        self.done(constraint, N::TypeConstraint);
    }

    /// `(a: A, b: B = c)` with the cursor at `(`.
    pub(in crate::grammar) fn parse_value_parameter_list(&mut self, context: ValueParameters) {
        let list = self.mark();
        self.disable_newlines();
        self.advance(); // (

        if !self.at(T::RPar) && !self.at_set(context.follow()) {
            loop {
                let start = self.position();
                if self.at(T::Comma) {
                    self.error_and_advance("Expecting a parameter declaration", 1);
                    continue;
                }
                if self.at(T::RPar) {
                    break;
                }
                if context == ValueParameters::FunctionType {
                    self.parse_function_type_value_parameter();
                } else {
                    self.parse_value_parameter(context.type_required());
                }
                if self.at(T::Comma) {
                    self.advance();
                } else {
                    if !self.at(T::RPar) {
                        self.error_here("Expecting comma or ')'");
                    }
                    if !self.at_set(context.first()) || !self.advanced_since(start) {
                        break;
                    }
                }
            }
        }

        self.expect_recovering(T::RPar, RecoveryCase::ExpectingRightParenthesisInValueParameterList);
        self.restore_newlines_state();
        self.done(list, N::ValueParameterList);
    }

    pub(in crate::grammar) fn parse_value_parameter(&mut self, type_required: bool) {
        let parameter = self.mark();
        self.parse_modifier_list(MODIFIER_KEYWORDS, NO_MODIFIER_BEFORE_FOR_VALUE_PARAMETER);
        if self.at(T::ValKeyword) || self.at(T::VarKeyword) {
            self.advance();
        }

        if (self.at(T::Identifier) && self.lookahead(1) == T::Lt) || self.at(T::Colon) {
            // `List<Int>` or `: Int` where a name should be
            self.error_here("Parameter name expected");
            self.consume_if(T::Colon);
            self.parse_type_ref();
        } else {
            self.expect_recovering(T::Identifier, RecoveryCase::ParameterNameExpected);
            if self.at(T::Colon) {
                self.advance();
                self.parse_type_ref();
            } else if type_required {
                self.error_with_recovery(
                    "Parameters must have type annotation",
                    Some(PARAMETER_NAME_RECOVERY_SET),
                );
            }
        }

        if self.at(T::Eq) {
            self.advance();
            self.parse_expression();
        }
        self.close_declaration_with_comment_binders(parameter, N::ValueParameter, false);
    }

    fn parse_function_type_value_parameter(&mut self) {
        let parameter = self.mark();
        if self.at(T::Identifier) && self.lookahead(1) == T::Colon {
            self.advance(); // name
            self.advance(); // :
        }
        self.parse_type_ref();
        self.close_declaration_with_comment_binders(parameter, N::ValueParameter, false);
    }
}
