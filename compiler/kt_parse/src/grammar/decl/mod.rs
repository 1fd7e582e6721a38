//! Declaration parsing.
//!
//! # Module Structure
//!
//! - `mod.rs`: Dispatch after a modifier list, classes, objects, enum
//!   entries, type aliases
//! - `function.rs`: Functions, receivers, value and type parameters,
//!   `where` clauses
//! - `property.rs`: Properties, accessors, destructuring declarations

mod function;
mod property;

use kt_ir::{NodeKind as N, TokenKind as T, TokenSet};

use crate::parser::OptionalMarker;
use crate::recovery::{RecoveryCase, LBRACE_RBRACE_SET};
use crate::Parser;

use super::modifiers::{Modifiers, DECLARATION_MODIFIERS};

pub(super) use function::ValueParameters;
pub(super) use property::PropertyMode;

/// Where a declaration sits, which decides what may appear there.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(super) enum DeclarationScope {
    TopLevel,
    Member,
    Local,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum NameMode {
    Required,
    Allowed,
    /// Object expressions never bind a name.
    Prohibited,
}

/// How an enum entry ended.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum EnumEntryEnd {
    /// Not an entry; the cursor is back where it started.
    Failed,
    NoDelimiter,
    Comma,
    Semicolon,
}

/// After these, a modifier list in a class header is a primary constructor.
const PRIMARY_CONSTRUCTOR_FOLLOW: TokenSet = TokenSet::of(&[
    T::LPar,
    T::LBrace,
    T::Colon,
    T::ConstructorKeyword,
]);

const ENUM_ENTRY_NO_MODIFIER_BEFORE: TokenSet =
    TokenSet::of(&[T::Comma, T::Semicolon, T::RBrace]);

/// Soft keywords that start members, never enum entries.
const MEMBER_START_SOFT_KEYWORDS: TokenSet =
    TokenSet::of(&[T::ConstructorKeyword, T::InitKeyword]);

const SECONDARY_CONSTRUCTOR_RECOVERY_SET: TokenSet = TokenSet::of(&[
    T::LBrace,
    T::Semicolon,
    T::RPar,
    T::EolOrSemicolon,
    T::RBrace,
]);

impl Parser<'_> {
    /// Parse the declaration after a modifier list. Returns `None`, having
    /// consumed nothing, when no declaration starts here.
    pub(super) fn parse_declaration(
        &mut self,
        modifiers: Modifiers,
        scope: DeclarationScope,
    ) -> Option<N> {
        if self.at(T::ClassKeyword) || self.at(T::InterfaceKeyword) {
            return Some(self.parse_class_or_object(
                false,
                NameMode::Required,
                true,
                modifiers.enum_class,
            ));
        }
        if self.at(T::FunKeyword) {
            return Some(self.parse_function());
        }
        if self.at(T::ValKeyword) || self.at(T::VarKeyword) {
            let mode = match scope {
                DeclarationScope::Local => PropertyMode::Local,
                DeclarationScope::TopLevel | DeclarationScope::Member => PropertyMode::Member,
            };
            return Some(self.parse_property(mode));
        }
        if self.at(T::TypeAliasKeyword) {
            return Some(self.parse_type_alias());
        }
        if self.at(T::ObjectKeyword) {
            let name = match scope {
                // `object : A {}` in a block is an expression
                DeclarationScope::Local if self.lookahead(1) != T::Identifier => return None,
                DeclarationScope::Member => NameMode::Allowed,
                DeclarationScope::TopLevel | DeclarationScope::Local => NameMode::Required,
            };
            return Some(self.parse_class_or_object(true, name, true, false));
        }
        if scope != DeclarationScope::Member {
            return None;
        }

        if self.at(T::InitKeyword) {
            self.advance();
            if self.at(T::LBrace) {
                self.parse_block();
            } else {
                self.error_here("Expecting '{' after 'init'");
            }
            return Some(N::ClassInitializer);
        }
        if self.at(T::ConstructorKeyword) {
            self.parse_secondary_constructor();
            return Some(N::SecondaryConstructor);
        }
        if self.at(T::LBrace) {
            self.error_here("Expecting member declaration");
            self.parse_block();
            return Some(N::Fun);
        }
        None
    }

    /// Class, interface or object after its modifiers.
    fn parse_class_or_object(
        &mut self,
        object: bool,
        name: NameMode,
        optional_body: bool,
        enum_class: bool,
    ) -> N {
        let kind = if object { N::ObjectDeclaration } else { N::Class };
        self.advance(); // class, interface or object

        match name {
            NameMode::Required => {
                self.expect_recovering(T::Identifier, RecoveryCase::NameExpectedForClassOrObject);
            }
            NameMode::Allowed => {
                self.consume_if(T::Identifier);
            }
            NameMode::Prohibited => {
                if self.at(T::Identifier) {
                    self.error_and_advance("An object expression cannot bind a name", 1);
                }
            }
        }

        let type_parameters = OptionalMarker::new(self, object);
        let has_type_parameters = self.at(T::Lt);
        if has_type_parameters {
            self.parse_type_parameter_list(
                RecoveryCase::MissingRightAngleBracketInTypeParameterListInClassOrObject,
            );
        }
        type_parameters.error(self, "Type parameters are not allowed for objects");

        let constructor = self.mark();
        let constructor_modifiers = self
            .parse_modifier_list(DECLARATION_MODIFIERS, TokenSet::EMPTY)
            .present;
        if constructor_modifiers && !self.at_set(PRIMARY_CONSTRUCTOR_FOLLOW) {
            // the modifiers belong to whatever follows the class
            self.rollback(constructor);
            return kind;
        }
        let constructor_keyword = self.at(T::ConstructorKeyword);
        if constructor_keyword {
            self.advance();
        }
        if self.at(T::LPar) {
            self.parse_value_parameter_list(ValueParameters::PrimaryConstructor);
            self.done(constructor, N::PrimaryConstructor);
        } else if constructor_modifiers || constructor_keyword {
            self.done(constructor, N::PrimaryConstructor);
            if constructor_keyword {
                self.error_here("Expecting primary constructor parameter list");
            } else {
                self.error_here("Expecting 'constructor' keyword");
            }
        } else {
            self.drop_marker(constructor);
        }

        if self.at(T::Colon) {
            self.advance();
            self.parse_super_type_list();
        }

        let constraints = OptionalMarker::new(self, object);
        self.parse_type_constraints_guarded(has_type_parameters);
        constraints.error(self, "Where clauses are not allowed for objects");

        if self.at(T::LBrace) {
            if enum_class {
                self.parse_enum_class_body();
            } else {
                self.parse_class_body();
            }
        } else if !optional_body {
            let body = self.mark();
            self.expect_recovering(T::LBrace, RecoveryCase::ExpectingClassBody);
            self.done(body, N::ClassBody);
        }
        kind
    }

    /// `object : A, B { ... }` in expression position.
    pub(super) fn parse_object_literal(&mut self) {
        let literal = self.mark();
        let declaration = self.mark();
        self.parse_class_or_object(true, NameMode::Prohibited, false, false);
        self.done(declaration, N::ObjectDeclaration);
        self.done(literal, N::ObjectLiteral);
    }

    fn parse_type_alias(&mut self) -> N {
        self.advance(); // typealias
        self.expect_recovering(T::Identifier, RecoveryCase::TypeNameExpectedInTypeAlias);
        if self.at(T::Lt) {
            self.parse_type_parameter_list(
                RecoveryCase::MissingRightAngleBracketInTypeParameterListInTypeAlias,
            );
        }
        if self.at(T::WhereKeyword) {
            let bounds = self.mark();
            self.parse_type_constraints();
            self.error(bounds, "Type alias parameters can't have bounds");
        }
        self.expect_recovering(T::Eq, RecoveryCase::ExpectingEqualsInTypeAlias);
        self.parse_type_ref();
        self.consume_if(T::Semicolon);
        N::TypeAlias
    }

    fn parse_super_type_list(&mut self) {
        let list = self.mark();
        loop {
            if self.at(T::Comma) {
                self.error_and_advance("Expecting a delegation specifier", 1);
                continue;
            }
            self.parse_super_type_entry();
            if !self.at(T::Comma) {
                break;
            }
            self.advance();
        }
        self.done(list, N::SuperTypeList);
    }

    /// `A`, `A(args)` or `A by delegate`.
    fn parse_super_type_entry(&mut self) {
        let entry = self.mark();
        let callee = self.mark();
        self.parse_type_ref();
        if self.at(T::ByKeyword) {
            self.drop_marker(callee);
            self.advance();
            self.parse_expression();
            self.done(entry, N::DelegatedSuperTypeEntry);
        } else if self.at(T::LPar) {
            self.done(callee, N::ConstructorCallee);
            self.parse_value_argument_list();
            self.done(entry, N::SuperTypeCallEntry);
        } else {
            self.drop_marker(callee);
            self.done(entry, N::SuperTypeEntry);
        }
    }

    pub(super) fn parse_class_body(&mut self) {
        self.nested(|p| {
            let body = p.mark();
            p.enable_newlines();
            if p.expect_recovering(T::LBrace, RecoveryCase::ExpectingClassBody) {
                p.parse_members();
                p.expect_recovering(T::RBrace, RecoveryCase::MissingRightBrace);
            }
            p.restore_newlines_state();
            p.done(body, N::ClassBody);
        });
    }

    fn parse_members(&mut self) {
        while !self.eof() && !self.at(T::RBrace) {
            let start = self.position();
            self.parse_member_declaration();
            if !self.advanced_since(start) {
                self.error_and_advance("Expecting member declaration", 1);
            }
        }
    }

    fn parse_member_declaration(&mut self) {
        if self.at(T::Semicolon) {
            self.advance();
            return;
        }
        let decl = self.mark();
        let modifiers = self.parse_modifier_list(DECLARATION_MODIFIERS, TokenSet::EMPTY);
        match self.parse_declaration(modifiers, DeclarationScope::Member) {
            Some(kind) => {
                self.close_declaration_with_comment_binders(decl, kind, true);
            }
            None => {
                self.error_with_recovery("Expecting member declaration", Some(TokenSet::EMPTY));
                self.drop_marker(decl);
            }
        }
    }

    /// Entries first, then an optional `;` and ordinary members.
    fn parse_enum_class_body(&mut self) {
        self.nested(|p| {
            let body = p.mark();
            p.enable_newlines();
            p.advance(); // {
            if !p.parse_enum_entries() && !p.at(T::RBrace) {
                p.error_here(
                    "Expecting ';' after the last enum entry or '}' to close enum class body",
                );
            }
            p.parse_members();
            p.expect_recovering(
                T::RBrace,
                RecoveryCase::ExpectingRightBraceToCloseEnumClassBody,
            );
            p.restore_newlines_state();
            p.done(body, N::ClassBody);
        });
    }

    /// Returns whether the entries were closed by `;`.
    fn parse_enum_entries(&mut self) -> bool {
        while !self.eof() && !self.at(T::RBrace) {
            match self.parse_enum_entry() {
                EnumEntryEnd::Failed => return self.consume_if(T::Semicolon),
                EnumEntryEnd::NoDelimiter => return false,
                EnumEntryEnd::Comma => {}
                EnumEntryEnd::Semicolon => return true,
            }
        }
        false
    }

    fn parse_enum_entry(&mut self) -> EnumEntryEnd {
        let entry = self.mark();
        self.parse_modifier_list(DECLARATION_MODIFIERS, ENUM_ENTRY_NO_MODIFIER_BEFORE);
        if self.check_set(MEMBER_START_SOFT_KEYWORDS) || !self.at(T::Identifier) {
            self.rollback(entry);
            return EnumEntryEnd::Failed;
        }
        self.advance();
        if self.at(T::LPar) {
            self.parse_value_argument_list();
        }
        if self.at(T::LBrace) {
            self.parse_class_body();
        }
        let comma = self.consume_if(T::Comma);
        let semicolon = self.consume_if(T::Semicolon);
        self.close_declaration_with_comment_binders(entry, N::EnumEntry, true);
        if semicolon {
            EnumEntryEnd::Semicolon
        } else if comma {
            EnumEntryEnd::Comma
        } else {
            EnumEntryEnd::NoDelimiter
        }
    }

    /// `constructor(params) : this(args) { ... }`
    fn parse_secondary_constructor(&mut self) {
        self.advance(); // constructor
        if self.at(T::LPar) {
            self.parse_value_parameter_list(ValueParameters::SecondaryConstructor);
        } else {
            self.error_with_recovery(
                "Expecting '('",
                Some(SECONDARY_CONSTRUCTOR_RECOVERY_SET.with(T::Colon)),
            );
        }
        if self.at(T::Colon) {
            self.advance();
            let call = self.mark();
            if self.at(T::ThisKeyword) || self.at(T::SuperKeyword) {
                let reference = self.mark();
                self.advance();
                self.done(reference, N::ConstructorDelegationReference);
                self.parse_value_argument_list();
            } else {
                self.error_with_recovery(
                    "Expecting a 'this' or 'super' constructor call",
                    Some(LBRACE_RBRACE_SET),
                );
            }
            self.done(call, N::ConstructorDelegationCall);
        }
        if self.at(T::LBrace) {
            self.parse_block();
        }
    }
}
