//! File structure: annotations on the file, the package directive, the
//! import list, then top-level declarations until end of input.

use kt_ir::{NodeKind as N, TokenKind as T, TokenSet};

use crate::binders::{DefaultLeft, EdgeBinders, TrailingComments};
use crate::recovery::{
    RecoveryCase, PACKAGE_NAME_RECOVERY_SET, STATEMENT_NEW_LINE_QUICK_RECOVERY_SET,
    TOP_LEVEL_DECLARATION_FIRST,
};
use crate::Parser;

use super::decl::DeclarationScope;
use super::modifiers::{AnnotationMode, DECLARATION_MODIFIERS};

impl Parser<'_> {
    pub(crate) fn parse_file(&mut self) {
        let file = self.mark();
        self.parse_preamble();
        while !self.eof() {
            self.parse_top_level_declaration();
        }
        self.done(file, N::File);
    }

    /// File annotations, package directive and imports. The package
    /// directive node is always present, empty when the file has none.
    fn parse_preamble(&mut self) {
        let first_entry = self.mark();
        self.parse_file_annotation_list(AnnotationMode::FileBeforePackage);

        if self.at(T::PackageKeyword) {
            let directive = self.mark();
            self.advance();
            self.parse_package_name();
            self.consume_if(T::Semicolon);
            self.done(directive, N::PackageDirective);
            self.drop_marker(first_entry);
        } else {
            // Without a package directive only `@file:` annotations belong
            // to the file; the rest go to the first declaration.
            self.rollback(first_entry);
            self.parse_file_annotation_list(AnnotationMode::FileWhenPackageOmitted);
            let directive = self.mark();
            self.done(directive, N::PackageDirective);
        }

        let imports = self.mark();
        while self.at(T::ImportKeyword) {
            self.parse_import_directive();
        }
        self.done(imports, N::ImportList);
    }

    fn parse_package_name(&mut self) {
        let mut qualified = self.mark();
        let mut simple_name = true;
        loop {
            if self.newline_before_current() {
                self.error_with_recovery(
                    "Package name must be a '.'-separated identifier list placed on a single line",
                    Some(PACKAGE_NAME_RECOVERY_SET),
                );
                break;
            }
            if self.at(T::Dot) {
                self.advance();
                self.error(
                    qualified,
                    "Package name must be a '.'-separated identifier list",
                );
                qualified = self.mark();
                continue;
            }

            let name = self.mark();
            let found = self.expect_recovering(
                T::Identifier,
                RecoveryCase::PackageNameMustBeDotSeparatedIdentifierList,
            );
            if found {
                self.done(name, N::ReferenceExpression);
            } else {
                self.drop_marker(name);
            }

            if !simple_name {
                let completed = self.done(qualified, N::DotQualifiedExpression);
                qualified = self.precede(completed);
            }

            if !self.at(T::Dot) {
                break;
            }
            self.advance();
            if simple_name && !found {
                self.drop_marker(qualified);
                qualified = self.mark();
            } else {
                simple_name = false;
            }
        }
        self.drop_marker(qualified);
    }

    /// `import a.b.c`, `import a.b.*` or `import a.b.c as d`. Each import
    /// has to fit on one line.
    fn parse_import_directive(&mut self) {
        let directive = self.mark();
        self.advance(); // import

        if self.newline_before_current() {
            self.error_here("Expecting qualified name");
            self.done(directive, N::ImportDirective);
            return;
        }
        if !self.at(T::Identifier) {
            self.error_until(
                "Expecting qualified name",
                STATEMENT_NEW_LINE_QUICK_RECOVERY_SET,
            );
            self.done(directive, N::ImportDirective);
            self.consume_if(T::Semicolon);
            return;
        }

        let mut qualified = self.mark();
        let reference = self.mark();
        self.advance();
        self.done(reference, N::ReferenceExpression);

        while self.at(T::Dot) && self.lookahead(1) != T::Mul {
            self.advance(); // .
            if self.newline_before_current() {
                self.drop_marker(qualified);
                self.error_here("Import must be placed on a single line");
                self.done(directive, N::ImportDirective);
                return;
            }
            let reference = self.mark();
            if self.expect_recovering(
                T::Identifier,
                RecoveryCase::QualifierNameMustBeDotSeparatedIdentifierList,
            ) {
                self.done(reference, N::ReferenceExpression);
            } else {
                self.drop_marker(reference);
            }
            let completed = self.done(qualified, N::DotQualifiedExpression);
            qualified = self.precede(completed);
        }
        self.drop_marker(qualified);

        if self.at(T::Dot) {
            self.advance(); // .
            self.advance(); // *
            if self.at(T::AsKeyword) {
                let alias = self.mark();
                self.advance();
                if self.newline_before_current() {
                    self.done(alias, N::ImportAlias);
                    self.error_here("Expecting identifier");
                    self.done(directive, N::ImportDirective);
                    return;
                }
                self.consume_if(T::Identifier);
                let alias = self.done(alias, N::ImportAlias);
                let wrong = self.precede(alias);
                self.error(wrong, "Cannot rename all imported items to one identifier");
            }
        }

        if self.at(T::AsKeyword) {
            let alias = self.mark();
            self.advance();
            if self.newline_before_current() {
                self.done(alias, N::ImportAlias);
                self.error_here("Expecting identifier");
                self.done(directive, N::ImportDirective);
                return;
            }
            self.expect_recovering(
                T::Identifier,
                RecoveryCase::ExpectingIdentifierInImportDirective,
            );
            self.done(alias, N::ImportAlias);
        }

        self.consume_if(T::Semicolon);
        let directive = self.done(directive, N::ImportDirective);
        self.set_binders(
            directive,
            EdgeBinders {
                left: &DefaultLeft,
                right: &TrailingComments,
            },
        );
    }

    fn parse_top_level_declaration(&mut self) {
        if self.at(T::Semicolon) {
            self.advance();
            return;
        }
        if self.at(T::ImportKeyword) {
            let misplaced = self.mark();
            self.parse_import_directive();
            self.error(misplaced, "Imports are only allowed in the beginning of file");
            return;
        }

        let start = self.position();
        let decl = self.mark();
        let modifiers = self.parse_modifier_list(DECLARATION_MODIFIERS, TokenSet::EMPTY);
        match self.parse_declaration(modifiers, DeclarationScope::TopLevel) {
            Some(kind) => {
                self.close_declaration_with_comment_binders(decl, kind, true);
            }
            None => {
                let message = "Expecting a top level declaration";
                if self.advanced_since(start) {
                    self.error_with_recovery(message, Some(TOP_LEVEL_DECLARATION_FIRST));
                } else {
                    self.error_and_advance(message, 1);
                }
                self.drop_marker(decl);
            }
        }
    }
}
