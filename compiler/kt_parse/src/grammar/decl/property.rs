//! Properties, their accessors, and destructuring declarations.

use kt_ir::token::set::MODIFIER_KEYWORDS;
use kt_ir::{NodeKind as N, TokenKind as T, TokenSet};

use crate::recovery::{RecoveryCase, DECLARATION_FIRST, PROPERTY_NAME_FOLLOW_SET};
use crate::Parser;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(in crate::grammar) enum PropertyMode {
    /// Top level or class member: accessors allowed, destructuring not.
    Member,
    /// Inside a block: destructuring allowed, accessors not.
    Local,
}

const ACCESSOR_FIRST_OR_PROPERTY_END: TokenSet = MODIFIER_KEYWORDS.union(TokenSet::of(&[
    T::At,
    T::GetKeyword,
    T::SetKeyword,
    T::EolOrSemicolon,
    T::RBrace,
]));

const ACCESSOR_BODY_RECOVERY_SET: TokenSet =
    ACCESSOR_FIRST_OR_PROPERTY_END.union(TokenSet::of(&[T::LBrace, T::LPar, T::Eq]));

const ACCESSOR_PARAMETERS_RECOVERY_SET: TokenSet = TokenSet::of(&[
    T::RPar,
    T::Colon,
    T::LBrace,
    T::RBrace,
    T::Eq,
    T::EolOrSemicolon,
]);

const PROPERTY_END: TokenSet = TokenSet::of(&[T::EolOrSemicolon, T::RBrace]);

const ACCESSORS_RECOVERY_SET: TokenSet =
    DECLARATION_FIRST.union(TokenSet::of(&[T::EolOrSemicolon, T::LBrace, T::RBrace]));

const NO_MODIFIER_BEFORE_FOR_DESTRUCTURING_ENTRY: TokenSet =
    TokenSet::of(&[T::Comma, T::RPar, T::Colon, T::Eq]);

impl Parser<'_> {
    /// `val`/`var` declarations. Returns `DestructuringDeclaration` for
    /// `val (a, b) = ...`.
    pub(in crate::grammar) fn parse_property(&mut self, mode: PropertyMode) -> N {
        self.advance(); // val or var

        let type_parameters = if self.at(T::Lt) {
            self.parse_type_parameter_list(
                RecoveryCase::MissingRightAngleBracketInTypeParameterListInProperty,
            );
            true
        } else {
            false
        };

        let receiver = self.mark();
        let receiver_declared = self.parse_receiver_type("property", PROPERTY_NAME_FOLLOW_SET);
        let destructuring = self.at(T::LPar);
        self.error_if(
            receiver,
            destructuring && receiver_declared,
            "Receiver type is not allowed on a destructuring declaration",
        );

        let name_on_next_line = self.eol();
        let before_name = self.mark();

        if destructuring {
            let declaration = self.mark();
            self.parse_multi_declaration_name(
                PROPERTY_NAME_FOLLOW_SET,
                RecoveryCase::ExpectingNameInPropertyInMultiDeclaration,
            );
            self.error_if(
                declaration,
                mode != PropertyMode::Local,
                "Destructuring declarations are only allowed for local variables/values",
            );
        } else {
            self.parse_function_or_property_name(
                receiver_declared,
                "property",
                RecoveryCase::ExpectingPropertyName,
                PROPERTY_NAME_FOLLOW_SET,
                true,
            );
        }

        let mut typed = false;
        if self.at(T::Colon) {
            typed = true;
            let annotation = self.mark();
            self.advance();
            self.parse_type_ref();
            self.error_if(
                annotation,
                destructuring,
                "Type annotations are not allowed on destructuring declarations",
            );
        }

        self.parse_type_constraints_guarded(type_parameters);

        if !self.parse_property_delegate_or_assignment()
            && name_on_next_line
            && !typed
            && !receiver_declared
        {
            // `val` alone on a line: the next line is not its name
            self.rollback(before_name);
            self.error_here("Expecting property name or receiver type");
            return N::Property;
        }
        self.drop_marker(before_name);

        if mode == PropertyMode::Member {
            let semicolon_on_new_line = self.at(T::Semicolon) && self.newline_before_current();
            if !semicolon_on_new_line {
                if let Some(accessor) = self.parse_property_accessor(None) {
                    self.parse_property_accessor(Some(accessor));
                }
                if !self.at_set(PROPERTY_END) {
                    if self.last_token() != T::Semicolon {
                        self.error_until("Property getter or setter expected", ACCESSORS_RECOVERY_SET);
                    }
                } else {
                    self.consume_if(T::Semicolon);
                }
            }
        }

        if destructuring {
            N::DestructuringDeclaration
        } else {
            N::Property
        }
    }

    fn parse_property_delegate_or_assignment(&mut self) -> bool {
        if self.at(T::ByKeyword) {
            let delegate = self.mark();
            self.advance();
            self.parse_expression();
            self.done(delegate, N::PropertyDelegate);
            true
        } else if self.at(T::Eq) {
            self.advance();
            self.parse_expression();
            true
        } else {
            false
        }
    }

    /// `get() = ...` or `set(value) { ... }`, possibly with modifiers.
    /// Returns which accessor was parsed; `already` rejects a second one of
    /// the same kind.
    fn parse_property_accessor(&mut self, already: Option<T>) -> Option<T> {
        let accessor = self.mark();
        self.parse_modifier_list(MODIFIER_KEYWORDS, TokenSet::EMPTY);

        let kind = if self.at(T::GetKeyword) {
            T::GetKeyword
        } else if self.at(T::SetKeyword) {
            T::SetKeyword
        } else {
            self.rollback(accessor);
            return None;
        };
        if already == Some(kind) {
            self.rollback(accessor);
            return None;
        }
        self.advance(); // get or set

        if !self.at(T::LPar) {
            if self.at_set(ACCESSOR_FIRST_OR_PROPERTY_END) {
                // `private set` with no body
                self.close_declaration_with_comment_binders(accessor, N::PropertyAccessor, true);
                return Some(kind);
            }
            self.error_until("Accessor body expected", ACCESSOR_BODY_RECOVERY_SET);
        }

        self.disable_newlines();
        self.expect_recovering(T::LPar, RecoveryCase::ExpectingLeftParenthesisInPropertyComponent);
        if kind == T::SetKeyword {
            let list = self.mark();
            let parameter = self.mark();
            self.parse_modifier_list(MODIFIER_KEYWORDS, NO_MODIFIER_BEFORE_FOR_DESTRUCTURING_ENTRY);
            self.expect_recovering(
                T::Identifier,
                RecoveryCase::ExpectingParameterNameInPropertyComponent,
            );
            if self.at(T::Colon) {
                self.advance();
                self.parse_type_ref();
            }
            self.done(parameter, N::ValueParameter);
            self.consume_if(T::Comma);
            self.done(list, N::ValueParameterList);
        }
        if !self.at(T::RPar) {
            self.error_until("Expecting ')'", ACCESSOR_PARAMETERS_RECOVERY_SET);
        }
        self.consume_if(T::RPar);
        self.restore_newlines_state();

        if self.at(T::Colon) {
            self.advance();
            self.parse_type_ref();
        }
        if !self.at(T::Semicolon) {
            self.parse_function_body();
        }
        self.close_declaration_with_comment_binders(accessor, N::PropertyAccessor, true);
        Some(kind)
    }

    /// `(a, b: B)` after `val`, in a `for` header or in lambda parameters.
    /// The caller owns the enclosing node.
    pub(in crate::grammar) fn parse_multi_declaration_name(
        &mut self,
        follow: TokenSet,
        name_case: RecoveryCase,
    ) {
        self.disable_newlines();
        self.advance(); // (
        if !self.at_set(follow) {
            loop {
                if self.at(T::Comma) {
                    self.error_and_advance("Expecting a name", 1);
                } else if self.at(T::RPar) {
                    self.error_here("Expecting a name");
                    break;
                }
                let entry = self.mark();
                self.parse_modifier_list(
                    MODIFIER_KEYWORDS,
                    NO_MODIFIER_BEFORE_FOR_DESTRUCTURING_ENTRY,
                );
                self.expect_recovering(T::Identifier, name_case);
                if self.at(T::Colon) {
                    self.advance();
                    self.parse_type_ref();
                }
                self.done(entry, N::DestructuringDeclarationEntry);

                if !self.at(T::Comma) {
                    break;
                }
                self.advance();
                if self.at(T::RPar) {
                    break;
                }
            }
        }
        self.expect_recovering(T::RPar, RecoveryCase::ExpectingRightParenthesisInMultiDeclaration);
        self.restore_newlines_state();
    }
}
