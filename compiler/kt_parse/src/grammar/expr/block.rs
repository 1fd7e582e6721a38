//! Blocks, statements and lambdas.

use kt_ir::token::set::MODIFIER_KEYWORDS;
use kt_ir::{NodeKind as N, TokenKind as T, TokenSet};

use crate::binders::{EdgeBinders, PrecedingComments, TrailingComments};
use crate::recovery::{
    RecoveryCase, EXPRESSION_FIRST, LAMBDA_PARAMETERS_FOLLOW_SET,
    STATEMENT_NEW_LINE_QUICK_RECOVERY_SET,
};
use crate::Parser;

use super::super::decl::DeclarationScope;
use super::super::modifiers::DECLARATION_MODIFIERS;

const STATEMENT_FIRST: TokenSet = EXPRESSION_FIRST.union(MODIFIER_KEYWORDS);

/// Tokens a local declaration may start with, modifiers included.
const LOCAL_DECLARATION_START: TokenSet = DECLARATION_MODIFIERS.union(TokenSet::of(&[
    T::At,
    T::ClassKeyword,
    T::InterfaceKeyword,
    T::FunKeyword,
    T::ValKeyword,
    T::VarKeyword,
    T::TypeAliasKeyword,
    T::ObjectKeyword,
]));

impl Parser<'_> {
    /// `{ statements }`
    pub(in crate::grammar) fn parse_block(&mut self) {
        self.nested(|p| {
            let block = p.mark();
            p.enable_newlines();
            if p.expect_recovering(T::LBrace, RecoveryCase::ExpectingLeftBraceToOpenBlock) {
                p.parse_statements();
                p.expect_recovering(T::RBrace, RecoveryCase::ExpectingRightBrace);
            }
            p.restore_newlines_state();
            p.done(block, N::Block);
        });
    }

    /// Statements up to a `}` or the end of input. Statements on one line
    /// need a `;` between them.
    pub(super) fn parse_statements(&mut self) {
        while self.at(T::Semicolon) {
            self.advance();
        }
        while !self.eof() && !self.at(T::RBrace) {
            let start = self.position();
            if !self.at_set(STATEMENT_FIRST) {
                self.error_and_advance("Expecting an element", 1);
            }
            if self.at_set(STATEMENT_FIRST) {
                self.parse_statement();
            }
            if !self.advanced_since(start) {
                self.error_and_advance("Expecting an element", 1);
                continue;
            }

            if self.at(T::Semicolon) {
                while self.at(T::Semicolon) {
                    self.advance();
                }
            } else if self.at(T::RBrace) {
                break;
            } else if !self.newline_before_current() {
                self.error_until(
                    "Unexpected tokens (use ';' to separate expressions on the same line)",
                    STATEMENT_NEW_LINE_QUICK_RECOVERY_SET,
                );
            }
        }
    }

    fn parse_statement(&mut self) {
        if self.parse_local_declaration() {
            return;
        }
        if self.at_set(EXPRESSION_FIRST) {
            self.parse_expression();
        } else {
            self.error_and_advance("Expecting a statement", 1);
        }
    }

    /// A declaration inside a block. Returns `false`, having consumed
    /// nothing, when the tokens are an expression instead.
    pub(in crate::grammar) fn parse_local_declaration(&mut self) -> bool {
        if !self.check_set(LOCAL_DECLARATION_START) {
            return false;
        }
        let decl = self.mark();
        let modifiers = self.parse_modifier_list(DECLARATION_MODIFIERS, TokenSet::EMPTY);
        match self.parse_declaration(modifiers, DeclarationScope::Local) {
            Some(kind) => {
                // plain comments above a local variable usually describe the
                // statements below it
                let attach_comments =
                    !matches!(kind, N::Property | N::DestructuringDeclaration);
                self.close_declaration_with_comment_binders(decl, kind, attach_comments);
                true
            }
            None => {
                self.rollback(decl);
                false
            }
        }
    }

    /// `{ params -> statements }`
    pub(in crate::grammar) fn parse_lambda_expression(&mut self) {
        self.nested(|p| p.parse_lambda_expression_inner());
    }

    fn parse_lambda_expression_inner(&mut self) {
        let expression = self.mark();
        let literal = self.mark();
        self.enable_newlines();
        self.advance(); // {

        if self.at(T::Arrow) {
            let parameters = self.mark();
            self.done(parameters, N::ValueParameterList);
            self.advance(); // ->
        } else if self.at(T::Identifier) || self.at(T::Colon) || self.at(T::LPar) {
            let probe = self.mark();
            let definite = self.parse_lambda_parameter_list();
            if self.at(T::Arrow) {
                self.advance();
                self.drop_marker(probe);
            } else if definite && self.at(T::RBrace) {
                self.drop_marker(probe);
                self.expect_recovering(T::Arrow, RecoveryCase::ArrowIsExpected);
            } else {
                self.rollback(probe);
            }
        }

        let body = self.mark();
        self.parse_statements();
        let body = self.done(body, N::Block);
        self.set_binders(
            body,
            EdgeBinders {
                left: &PrecedingComments,
                right: &TrailingComments,
            },
        );

        self.expect_recovering(T::RBrace, RecoveryCase::ExpectingRightBrace);
        self.restore_newlines_state();
        self.done(literal, N::FunctionLiteral);
        self.done(expression, N::LambdaExpression);
    }

    /// Parameters before `->`. Returns whether the shape could only be a
    /// parameter list: more than one entry, a type, or a destructuring.
    fn parse_lambda_parameter_list(&mut self) -> bool {
        let list = self.mark();
        let mut definite = false;
        loop {
            if self.at(T::LPar) {
                let parameter = self.mark();
                let destructuring = self.mark();
                self.parse_multi_declaration_name(
                    LAMBDA_PARAMETERS_FOLLOW_SET,
                    RecoveryCase::ExpectingNameInFunctionLiteralParameterListInMultiDeclaration,
                );
                self.done(destructuring, N::DestructuringDeclaration);
                if self.at(T::Colon) {
                    self.advance();
                    self.parse_type_ref();
                }
                self.done(parameter, N::ValueParameter);
                definite = true;
            } else {
                let parameter = self.mark();
                if self.at(T::Colon) {
                    self.error_here("Expecting parameter name");
                } else {
                    self.expect_recovering(T::Identifier, RecoveryCase::ExpectingParameterName);
                }
                if self.at(T::Colon) {
                    self.advance();
                    self.parse_type_ref();
                    definite = true;
                }
                self.done(parameter, N::ValueParameter);
            }

            if self.at(T::Arrow) || !self.at(T::Comma) {
                break;
            }
            self.advance(); // ,
            definite = true;
        }
        self.done(list, N::ValueParameterList);
        definite
    }
}
