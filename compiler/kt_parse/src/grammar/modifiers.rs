//! Modifier lists and annotations.
//!
//! A modifier list is any run of soft-keyword modifiers and annotations.
//! A soft keyword only counts as a modifier when the token after it could
//! continue a declaration, so `open()` stays a call and `data = 1` an
//! assignment.

use kt_ir::token::set::MODIFIER_KEYWORDS;
use kt_ir::{NodeKind as N, TokenKind as T, TokenSet};

use crate::recovery::RecoveryCase;
use crate::Parser;

/// Modifiers allowed in front of a declaration; `fun` only before
/// `interface`.
pub(super) const DECLARATION_MODIFIERS: TokenSet = MODIFIER_KEYWORDS.with(T::FunKeyword);

/// Modifiers allowed in front of a type.
pub(super) const TYPE_MODIFIERS: TokenSet = TokenSet::single(T::SuspendKeyword);

/// Variance of a type argument.
pub(super) const PROJECTION_MODIFIERS: TokenSet = TokenSet::of(&[T::InKeyword, T::OutKeyword]);

const ANNOTATION_TARGETS: TokenSet = TokenSet::of(&[
    T::FileKeyword,
    T::FieldKeyword,
    T::PropertyKeyword,
    T::GetKeyword,
    T::SetKeyword,
    T::ReceiverKeyword,
    T::ParamKeyword,
    T::SetparamKeyword,
    T::DelegateKeyword,
]);

/// What a modifier list held, as far as the declaration after it cares.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub(super) struct Modifiers {
    pub(super) present: bool,
    pub(super) enum_class: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(super) enum AnnotationMode {
    /// Use-site target optional; arguments may follow after whitespace.
    Default,
    /// In front of a type, where `@A (B) -> C` annotates a function type
    /// instead of passing arguments.
    Type,
    /// Before `package`: every annotation needs a `file:` target.
    FileBeforePackage,
    /// No `package` follows: only `@file:` annotations belong to the file.
    FileWhenPackageOmitted,
}

impl Parser<'_> {
    /// Parse modifiers from `keywords` and annotations. An empty list leaves
    /// no node.
    pub(super) fn parse_modifier_list(
        &mut self,
        keywords: TokenSet,
        no_modifiers_before: TokenSet,
    ) -> Modifiers {
        self.parse_modifier_list_in(keywords, no_modifiers_before, Some(AnnotationMode::Default))
    }

    /// [`Self::parse_modifier_list`] with the annotation flavor spelled out;
    /// `None` stops at the first `@`.
    pub(super) fn parse_modifier_list_in(
        &mut self,
        keywords: TokenSet,
        no_modifiers_before: TokenSet,
        annotations: Option<AnnotationMode>,
    ) -> Modifiers {
        let list = self.mark();
        let mut modifiers = Modifiers::default();
        while !self.eof() {
            if self.at(T::At) {
                let Some(mode) = annotations else { break };
                self.parse_annotation_or_list(mode);
            } else if let Some(kind) = self.try_parse_modifier(keywords, no_modifiers_before) {
                if kind == T::EnumKeyword {
                    modifiers.enum_class = true;
                }
            } else {
                break;
            }
            modifiers.present = true;
        }
        if modifiers.present {
            self.done(list, N::ModifierList);
        } else {
            self.drop_marker(list);
        }
        modifiers
    }

    fn try_parse_modifier(
        &mut self,
        keywords: TokenSet,
        no_modifiers_before: TokenSet,
    ) -> Option<T> {
        if !self.check_set(keywords) {
            return None;
        }
        let next = self.lookahead(1);
        if self.check(T::FunKeyword) && next != T::InterfaceKeyword {
            return None;
        }
        if next == T::Eof || no_modifiers_before.contains(next) {
            return None;
        }
        self.at_set(keywords);
        let kind = self.current();
        self.advance();
        Some(kind)
    }

    /// A run of annotations with no modifier list around them.
    pub(super) fn parse_annotations(&mut self, mode: AnnotationMode) -> bool {
        let mut any = false;
        while self.parse_annotation_or_list(mode) {
            any = true;
        }
        any
    }

    /// Annotations that belong to the file rather than to a declaration.
    pub(super) fn parse_file_annotation_list(&mut self, mode: AnnotationMode) {
        let list = self.mark();
        let start = self.position();
        while self.at(T::At) {
            if mode == AnnotationMode::FileWhenPackageOmitted && !self.at_file_annotation() {
                break;
            }
            self.parse_annotation_or_list(mode);
        }
        if self.advanced_since(start) {
            self.done(list, N::FileAnnotationList);
        } else {
            self.drop_marker(list);
        }
    }

    /// `@file:` under the cursor.
    fn at_file_annotation(&mut self) -> bool {
        let probe = self.mark();
        self.advance();
        let found = self.check(T::FileKeyword) && self.lookahead(1) == T::Colon;
        self.rollback(probe);
        found
    }

    /// `@A`, `@A(args)`, `@target:A` or `@[A B]`.
    pub(super) fn parse_annotation_or_list(&mut self, mode: AnnotationMode) -> bool {
        if !self.at(T::At) {
            return false;
        }
        let annotation = self.mark();
        self.advance(); // @

        match mode {
            AnnotationMode::FileBeforePackage | AnnotationMode::FileWhenPackageOmitted => {
                self.parse_file_annotation_target();
            }
            AnnotationMode::Default | AnnotationMode::Type => self.parse_use_site_target(),
        }

        if self.at(T::LBracket) {
            self.parse_annotation_list_body();
            self.done(annotation, N::Annotation);
        } else {
            self.parse_annotation_body(mode == AnnotationMode::Type);
            self.done(annotation, N::AnnotationEntry);
        }
        true
    }

    fn parse_use_site_target(&mut self) {
        if self.lookahead(1) == T::Colon && self.at_set(ANNOTATION_TARGETS) {
            let target = self.mark();
            self.advance();
            self.done(target, N::AnnotationTarget);
            self.advance(); // :
        }
    }

    fn parse_file_annotation_target(&mut self) {
        let message = "Expecting \"file:\" prefix for file annotations";
        let target = self.mark();
        if self.expect(T::FileKeyword) {
            self.done(target, N::AnnotationTarget);
        } else {
            self.drop_marker(target);
            self.error_with_recovery_case(RecoveryCase::MissingKeywordInAnnotationTarget, message);
        }
        if !self.expect(T::Colon) {
            self.error_with_recovery_case(RecoveryCase::MissingColonInAnnotationTarget, message);
        }
    }

    /// `[A B(c)]` after the `@`.
    fn parse_annotation_list_body(&mut self) {
        self.advance(); // [
        if !self.at(T::Identifier) && !self.at(T::At) {
            self.error_here("Expecting a list of annotations");
        } else {
            while self.at(T::Identifier) || self.at(T::At) {
                if self.at(T::At) {
                    self.error_and_advance("No '@' needed in annotation list", 1);
                    continue;
                }
                let entry = self.mark();
                self.parse_annotation_body(false);
                self.done(entry, N::AnnotationEntry);
                while self.at(T::Comma) {
                    self.error_and_advance("No commas needed to separate annotations", 1);
                }
            }
        }
        self.expect_recovering(
            T::RBracket,
            RecoveryCase::ExpectingRightBracketToCloseAnnotationList,
        );
    }

    /// Annotation class and its arguments. With `tight_arguments`, the
    /// argument list must touch the name.
    fn parse_annotation_body(&mut self, tight_arguments: bool) {
        let callee = self.mark();
        let reference = self.mark();
        self.parse_user_type();
        self.done(reference, N::TypeReference);
        self.done(callee, N::ConstructorCallee);

        let arguments_follow = if tight_arguments {
            !self.raw_lookup(-1).is_trivia()
        } else {
            !self.newline_before_current()
        };
        if self.at(T::LPar) && arguments_follow {
            self.parse_value_argument_list();
        }
    }
}
