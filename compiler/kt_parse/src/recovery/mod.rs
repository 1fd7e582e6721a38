//! Recovery table for missing-token failures.
//!
//! Every distinguishable "expected X here" situation is a [`RecoveryCase`].
//! A case knows its diagnostic wording and the token set at which recovery
//! may stop instead of swallowing the current token:
//!
//! - `message() == None`: the caller supplies context-specific wording
//! - `sync_set() == None`: never skip; report in place
//! - a set containing [`TokenKind::EolOrSemicolon`]: a statement end also
//!   counts as a synchronization point
//!
//! The grammar never spells messages or sets inline for these cases, so the
//! wording stays in one place.

use kt_ir::{TokenKind as T, TokenSet};

/// Declarations that can start at the top level of a file.
pub const TOP_LEVEL_DECLARATION_FIRST: TokenSet = TokenSet::of(&[
    T::TypeAliasKeyword,
    T::InterfaceKeyword,
    T::ClassKeyword,
    T::ObjectKeyword,
    T::FunKeyword,
    T::ValKeyword,
    T::PackageKeyword,
]);

/// Top-level declarations plus member-only starts.
pub const DECLARATION_FIRST: TokenSet = TOP_LEVEL_DECLARATION_FIRST.union(TokenSet::of(&[
    T::InitKeyword,
    T::GetKeyword,
    T::SetKeyword,
    T::ConstructorKeyword,
]));

pub const TYPE_REF_FIRST: TokenSet = TokenSet::of(&[
    T::LBracket,
    T::Identifier,
    T::LPar,
    T::DynamicKeyword,
]);

/// Tokens that can begin an expression.
pub const EXPRESSION_FIRST: TokenSet = TokenSet::of(&[
    // prefix
    T::Minus,
    T::Plus,
    T::MinusMinus,
    T::PlusPlus,
    T::Excl,
    T::ExclExcl,
    // atomic
    T::ColonColon,
    T::LPar,
    T::LBracket,
    T::LBrace,
    T::ThisKeyword,
    T::SuperKeyword,
    T::IfKeyword,
    T::WhenKeyword,
    T::TryKeyword,
    T::ObjectKeyword,
    T::ThrowKeyword,
    T::ReturnKeyword,
    T::ContinueKeyword,
    T::BreakKeyword,
    T::DoKeyword,
    T::WhileKeyword,
    T::ForKeyword,
    T::IntegerLiteral,
    T::FloatLiteral,
    T::CharacterLiteral,
    T::OpenQuote,
    T::NullKeyword,
    T::TrueKeyword,
    T::FalseKeyword,
    T::Identifier,
    T::At,
    // local declarations
    T::FunKeyword,
    T::ValKeyword,
    T::VarKeyword,
    T::InterfaceKeyword,
    T::ClassKeyword,
    T::TypeAliasKeyword,
]);

/// Tokens that can follow a complete expression.
pub const EXPRESSION_FOLLOW: TokenSet = TokenSet::of(&[
    T::EolOrSemicolon,
    T::Arrow,
    T::Comma,
    T::RBrace,
    T::RPar,
    T::RBracket,
]);

pub const WHEN_CONDITION_RECOVERY_SET: TokenSet = TokenSet::of(&[
    T::RBrace,
    T::InKeyword,
    T::NotIn,
    T::IsKeyword,
    T::NotIs,
    T::ElseKeyword,
]);

pub const TRY_CATCH_RECOVERY_TOKEN_SET: TokenSet = TokenSet::of(&[
    T::LBrace,
    T::RBrace,
    T::FinallyKeyword,
    T::CatchKeyword,
]);

pub const TYPE_PARAMETER_GT_RECOVERY_SET: TokenSet = TokenSet::of(&[
    T::WhereKeyword,
    T::LPar,
    T::Colon,
    T::LBrace,
    T::Gt,
]);

pub const VALUE_PARAMETERS_FOLLOW_SET: TokenSet =
    TokenSet::of(&[T::Eq, T::LBrace, T::RBrace, T::Semicolon, T::RPar]);

pub const PARAMETER_NAME_RECOVERY_SET: TokenSet = TokenSet::of(&[
    T::Colon,
    T::Eq,
    T::Comma,
    T::RPar,
    T::ValKeyword,
    T::VarKeyword,
]);

pub const PROPERTY_NAME_FOLLOW_SET: TokenSet = TokenSet::of(&[
    T::Colon,
    T::Eq,
    T::LBrace,
    T::RBrace,
    T::Semicolon,
    T::ValKeyword,
    T::VarKeyword,
    T::FunKeyword,
    T::ClassKeyword,
]);

pub const IN_KEYWORD_L_BRACE_SET: TokenSet = TokenSet::of(&[T::InKeyword, T::LBrace]);

pub const LBRACE_RBRACE_SET: TokenSet = TokenSet::of(&[T::LBrace, T::RBrace]);

pub const PACKAGE_NAME_RECOVERY_SET: TokenSet = TokenSet::of(&[T::Dot, T::EolOrSemicolon]);

/// Tokens that end the parameter list of a lambda.
pub const LAMBDA_PARAMETERS_FOLLOW_SET: TokenSet = TokenSet::of(&[T::Arrow, T::Colon]);

/// Where a statement-level `error_until` may stop.
pub const STATEMENT_NEW_LINE_QUICK_RECOVERY_SET: TokenSet =
    TokenSet::of(&[T::EolOrSemicolon, T::LBrace, T::RBrace]);

macro_rules! recovery_cases {
    ($( $(#[$meta:meta])* $case:ident => $message:expr, $sync:expr; )*) => {
        /// A specific "expected construct" failure.
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
        pub enum RecoveryCase {
            $( $(#[$meta])* $case, )*
        }

        impl RecoveryCase {
            /// Every case, in declaration order.
            pub const ALL: &'static [RecoveryCase] = &[ $( RecoveryCase::$case, )* ];

            /// Diagnostic text, or `None` when the caller words it.
            pub const fn message(self) -> Option<&'static str> {
                match self {
                    $( RecoveryCase::$case => $message, )*
                }
            }

            /// Tokens at which recovery reports in place, or `None` to never
            /// skip.
            pub const fn sync_set(self) -> Option<TokenSet> {
                match self {
                    $( RecoveryCase::$case => $sync, )*
                }
            }
        }
    };
}

const fn set(kinds: &[T]) -> Option<TokenSet> {
    Some(TokenSet::of(kinds))
}

recovery_cases! {
    PackageNameMustBeDotSeparatedIdentifierList =>
        Some("Package name must be a '.'-separated identifier list"),
        Some(PACKAGE_NAME_RECOVERY_SET);
    QualifierNameMustBeDotSeparatedIdentifierList =>
        Some("Qualified name must be a '.'-separated identifier list"),
        set(&[T::AsKeyword, T::Dot, T::EolOrSemicolon]);
    ExpectingIdentifierInImportDirective =>
        Some("Expecting identifier"),
        set(&[T::Semicolon]);
    NameExpectedForClassOrObject =>
        Some("Name expected"),
        Some(TokenSet::of(&[T::Lt, T::LPar, T::Colon, T::LBrace]).union(TOP_LEVEL_DECLARATION_FIRST));
    TypeNameExpectedInTypeAlias =>
        Some("Type name expected"),
        Some(TokenSet::of(&[T::Lt, T::Eq, T::Semicolon]).union(TOP_LEVEL_DECLARATION_FIRST));
    ExpectingEqualsInTypeAlias =>
        Some("Expecting '='"),
        Some(TOP_LEVEL_DECLARATION_FIRST.with(T::Semicolon));
    ExpectingParameterName =>
        Some("Expecting parameter name"),
        set(&[T::Arrow]);
    MissingKeywordInAnnotationTarget => None, None;
    MissingColonInAnnotationTarget =>
        None,
        set(&[T::Identifier, T::RBracket, T::LBracket]);
    ExpectingTypeParameterName =>
        Some("Expecting type parameter name"),
        Some(TokenSet::of(&[T::Colon, T::Comma, T::LBrace, T::RBrace]).union(TYPE_REF_FIRST));
    ExpectingColonBeforeUpperBound =>
        Some("Expecting ':' before the upper bound"),
        Some(LBRACE_RBRACE_SET.union(TYPE_REF_FIRST));
    /// The empty set always swallows one token.
    TypeParameterNameExpected =>
        Some("Type parameter name expected"),
        Some(TokenSet::EMPTY);
    ParameterNameExpected =>
        Some("Parameter name expected"),
        Some(PARAMETER_NAME_RECOVERY_SET);
    ExpectingArrowToSpecifyReturnTypeOfFunctionalType =>
        Some("Expecting '->' to specify return type of a function type"),
        Some(TYPE_REF_FIRST);
    ExpectingDot =>
        Some("Expecting '.'"),
        set(&[T::Identifier, T::LBrace, T::RBrace]);
    ExpectingTypeName =>
        Some("Expecting type name"),
        Some(EXPRESSION_FIRST.union(EXPRESSION_FOLLOW).union(DECLARATION_FIRST));
    ExpectingArrow =>
        Some("Expecting '->'"),
        Some(WHEN_CONDITION_RECOVERY_SET);
    ExpectingLeftParenthesisInPropertyComponent =>
        Some("Expecting '('"),
        set(&[T::RPar, T::Identifier, T::Colon, T::LBrace, T::Eq]);
    ExpectingVariableNameInFor =>
        Some("Expecting a variable name"),
        set(&[T::Colon, T::InKeyword]);
    ExpectingIn =>
        Some("Expecting 'in'"),
        set(&[T::LPar, T::LBrace, T::RPar]);
    ExpectingLeftParenthesisInTryCatch =>
        Some("Expecting '('"),
        Some(TRY_CATCH_RECOVERY_TOKEN_SET);
    ExpectingRightParenthesisInTryCatch =>
        Some("Expecting ')'"),
        Some(TRY_CATCH_RECOVERY_TOKEN_SET);
    ExpectingConditionInParentheses =>
        Some("Expecting a condition in parentheses '(...)'"),
        Some(EXPRESSION_FIRST);
    ExpectingArgumentList =>
        Some("Expecting an argument list"),
        Some(EXPRESSION_FOLLOW);
    ExpectingRightParenthesisInArgumentList =>
        Some("Expecting ')'"),
        Some(EXPRESSION_FOLLOW);
    ExpectingLeftParenthesisToOpenLoopRange =>
        Some("Expecting '(' to open a loop range"),
        Some(EXPRESSION_FIRST);
    MissingRightAngleBracketInTypeParameterListInClassOrObject =>
        Some("Missing '>'"),
        Some(TYPE_PARAMETER_GT_RECOVERY_SET);
    MissingRightAngleBracketInTypeParameterListInTypeAlias =>
        Some("Missing '>'"),
        Some(TYPE_PARAMETER_GT_RECOVERY_SET);
    MissingRightAngleBracketInTypeParameterListInProperty =>
        Some("Missing '>'"),
        set(&[T::Identifier, T::Eq, T::Colon, T::Semicolon]);
    MissingRightAngleBracketInTypeParameterListInFunction1 =>
        Some("Missing '>'"),
        set(&[T::LBracket, T::LBrace, T::RBrace, T::LPar]);
    MissingRightAngleBracketInTypeParameterListInFunction2 =>
        Some("Missing '>'"),
        Some(VALUE_PARAMETERS_FOLLOW_SET.with(T::LPar));
    ExpectingNameInFunctionLiteralParameterListInMultiDeclaration =>
        Some("Expecting a name"),
        Some(LAMBDA_PARAMETERS_FOLLOW_SET.union(PARAMETER_NAME_RECOVERY_SET));
    ExpectingNameInForInMultiDeclaration =>
        Some("Expecting a name"),
        Some(IN_KEYWORD_L_BRACE_SET.union(PARAMETER_NAME_RECOVERY_SET));
    ExpectingNameInPropertyInMultiDeclaration =>
        Some("Expecting a name"),
        Some(PROPERTY_NAME_FOLLOW_SET.union(PARAMETER_NAME_RECOVERY_SET));
    ExpectingRightParenthesisInMultiDeclaration => Some("Expecting ')'"), None;
    ExpectingRightParenthesisInValueParameterList => Some("Expecting ')'"), None;
    ExpectingParameterNameInPropertyComponent =>
        Some("Expecting parameter name"),
        set(&[T::RPar, T::Colon, T::LBrace, T::Eq]);
    ExpectingFunctionName =>
        None,
        Some(TokenSet::of(&[T::Lt, T::LPar, T::RPar, T::Colon, T::Eq])
            .union(LBRACE_RBRACE_SET)
            .union(TOP_LEVEL_DECLARATION_FIRST));
    ExpectingPropertyName =>
        None,
        Some(PROPERTY_NAME_FOLLOW_SET
            .union(LBRACE_RBRACE_SET)
            .union(TOP_LEVEL_DECLARATION_FIRST));
    ExpectingClosingQuote => Some("Expecting '\"'"), None;
    ExpectingName => Some("Expecting a name"), None;
    ExpectingRightParenthesis => Some("Expecting ')'"), None;
    ExpectingLeftBrace => Some("Expecting '{'"), None;
    ExpectingRightBrace => Some("Expecting '}'"), None;
    ExpectingLeftBracket => Some("Expecting '['"), None;
    ExpectingRightBracket => Some("Expecting ']'"), None;
    ExpectingIdentifier => Some("Expecting an identifier"), None;
    ArrowIsExpected => Some("An -> is expected"), None;
    ExpectingWhileFollowedByPostCondition =>
        Some("Expecting 'while' followed by a post-condition"),
        None;
    ExpectingRightBracketToCloseAnnotationList =>
        Some("Expecting ']' to close the annotation list"),
        None;
    ExpectingRightBraceToCloseEnumClassBody =>
        Some("Expecting '}' to close enum class body"),
        None;
    ExpectingClassBody => Some("Expecting a class body"), None;
    MissingRightBrace => Some("Missing '}'"), None;
    ExpectingLeftBraceToOpenBlock => Some("Expecting '{' to open a block"), None;
}
