//! Type references: user types, nullable types, function types with an
//! optional receiver, `dynamic`, and type argument lists.

use kt_ir::{NodeKind as N, TokenKind as T, TokenSet};

use crate::builder::Marker;
use crate::recovery::{RecoveryCase, TOP_LEVEL_DECLARATION_FIRST};
use crate::Parser;

use super::decl::ValueParameters;
use super::modifiers::{AnnotationMode, PROJECTION_MODIFIERS, TYPE_MODIFIERS};

/// After these, `suspend` is a type name rather than a modifier.
const NO_MODIFIER_BEFORE_FOR_TYPE: TokenSet = TokenSet::of(&[
    T::Gt,
    T::Comma,
    T::RPar,
    T::Dot,
    T::Quest,
    T::Eq,
    T::LBrace,
]);

const NO_MODIFIER_BEFORE_FOR_PROJECTION: TokenSet = TokenSet::of(&[T::Comma, T::Colon, T::Gt]);

const TYPE_RECOVERY_SET: TokenSet = TOP_LEVEL_DECLARATION_FIRST.union(TokenSet::of(&[
    T::Eq,
    T::Comma,
    T::Gt,
    T::RBracket,
    T::Dot,
    T::RPar,
    T::RBrace,
    T::LBrace,
    T::Semicolon,
]));

impl Parser<'_> {
    /// A complete `TYPE_REFERENCE`.
    pub(in crate::grammar) fn parse_type_ref(&mut self) {
        self.nested(|p| {
            let type_ref = p.parse_type_ref_contents();
            p.done(type_ref, N::TypeReference);
        });
    }

    /// Parse a type and return the marker that should close as its
    /// reference; the caller decides whether it becomes a node.
    fn parse_type_ref_contents(&mut self) -> Marker {
        let mut type_ref = self.mark();
        self.parse_modifier_list_in(
            TYPE_MODIFIERS,
            NO_MODIFIER_BEFORE_FOR_TYPE,
            Some(AnnotationMode::Type),
        );

        let element = self.mark();
        let mut type_before_dot = true;
        if self.at_dynamic_type() {
            let dynamic = self.mark();
            self.consume_if(T::DynamicKeyword);
            self.done(dynamic, N::DynamicType);
        } else if self.at(T::Identifier) {
            self.parse_user_type();
        } else if self.at(T::LPar) {
            self.parse_parenthesized_or_function_type();
        } else {
            self.error_with_recovery("Type expected", Some(TYPE_RECOVERY_SET));
            type_before_dot = false;
        }

        let element = self.parse_nullable_suffix(element);
        self.drop_marker(element);

        let at_receiver_dot = self.at(T::Dot)
            || (self.at(T::SafeAccess) && self.lookahead(1) == T::LPar);
        if type_before_dot && at_receiver_dot {
            // `A.(B) -> C`: what was parsed so far is the receiver
            let receiver_type = self.done(type_ref, N::TypeReference);
            let receiver = self.precede(receiver_type);
            let receiver = self.done(receiver, N::FunctionTypeReceiver);
            let function_type = self.precede(receiver);
            self.advance(); // . or ?.
            if self.at(T::LPar) {
                self.parse_function_type_contents();
            } else {
                self.error_here("Expecting function type");
            }
            let function_type = self.done(function_type, N::FunctionType);
            type_ref = self.precede(function_type);
        }
        type_ref
    }

    /// `dynamic` used as a type, not as the start of `dynamic.Foo` or
    /// `dynamic<T>`.
    fn at_dynamic_type(&self) -> bool {
        self.check(T::DynamicKeyword)
            && !(self.lookahead(1) == T::Dot && self.lookahead(2) == T::Identifier)
            && self.lookahead(1) != T::Lt
    }

    fn parse_nullable_suffix(&mut self, mut element: Marker) -> Marker {
        while self.at(T::Quest) {
            self.advance();
            let nullable = self.done(element, N::NullableType);
            element = self.precede(nullable);
        }
        element
    }

    /// `(A)` is a parenthesized type; anything else after `(` is the
    /// parameter list of a function type.
    fn parse_parenthesized_or_function_type(&mut self) {
        let probe = self.mark();
        self.advance(); // (
        self.nested(|p| {
            let inner = p.parse_type_ref_contents();
            p.drop_marker(inner);
        });
        if self.at(T::RPar) && self.lookahead(1) != T::Arrow {
            self.advance();
            self.drop_marker(probe);
        } else {
            self.rollback(probe);
            let function_type = self.mark();
            self.parse_function_type_contents();
            self.done(function_type, N::FunctionType);
        }
    }

    /// `(params) -> Result` with the cursor at `(`.
    fn parse_function_type_contents(&mut self) {
        self.parse_value_parameter_list(ValueParameters::FunctionType);
        self.expect_recovering(
            T::Arrow,
            RecoveryCase::ExpectingArrowToSpecifyReturnTypeOfFunctionalType,
        );
        self.parse_type_ref();
    }

    /// `a.b.C<T>.D`, nested to the left: each qualifier is a `USER_TYPE`
    /// inside the next.
    pub(in crate::grammar) fn parse_user_type(&mut self) {
        let mut user_type = self.mark();
        loop {
            let reference = self.mark();
            if self.expect_recovering(T::Identifier, RecoveryCase::ExpectingTypeName) {
                self.done(reference, N::ReferenceExpression);
            } else {
                self.drop_marker(reference);
                break;
            }

            if self.at(T::Lt) {
                self.parse_type_argument_list();
            }
            // `Int.(A) -> B` leaves the dot to the function type
            if !self.at(T::Dot) || self.lookahead(1) == T::LPar {
                break;
            }
            let qualifier = self.done(user_type, N::UserType);
            user_type = self.precede(qualifier);
            self.advance(); // .
        }
        self.done(user_type, N::UserType);
    }

    /// `<A, out B, *>` with the cursor at `<`.
    pub(in crate::grammar) fn parse_type_argument_list(&mut self) {
        let list = self.mark();
        self.disable_newlines();
        self.advance(); // <
        loop {
            let projection = self.mark();
            self.parse_modifier_list_in(
                PROJECTION_MODIFIERS,
                NO_MODIFIER_BEFORE_FOR_PROJECTION,
                None,
            );
            if self.at(T::Mul) {
                self.advance();
            } else {
                self.parse_type_ref();
            }
            self.done(projection, N::TypeProjection);
            if !self.at(T::Comma) {
                break;
            }
            self.advance(); // ,
            if self.at(T::Gt) {
                break;
            }
        }
        if !self.consume_if(T::Gt) {
            self.error_here("Expecting a '>'");
        }
        self.restore_newlines_state();
        self.done(list, N::TypeArgumentList);
    }
}
