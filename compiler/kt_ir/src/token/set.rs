//! Bitset of token kinds and the named sets the grammar is written against.
//!
//! Every set is a `const`, so recovery tables and grammar first-sets are
//! computed at compile time.

use std::fmt;

use super::TokenKind;

const _: () = assert!(
    (TokenKind::MAX_DISCRIMINANT as usize) < 256,
    "TokenSet uses a 256-bit bitset; all discriminants must be < 256"
);

/// A set of token kinds with O(1) membership.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSet([u64; 4]);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet([0; 4]);

    #[inline]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    #[inline]
    pub const fn single(kind: TokenKind) -> Self {
        Self::EMPTY.with(kind)
    }

    /// Builder form of insertion, usable in `const` items.
    #[inline]
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        let index = kind as usize;
        let mut words = self.0;
        words[index / 64] |= 1u64 << (index % 64);
        Self(words)
    }

    /// Build a set from a slice of kinds.
    #[must_use]
    pub const fn of(kinds: &[TokenKind]) -> Self {
        let mut set = Self::EMPTY;
        let mut i = 0;
        while i < kinds.len() {
            set = set.with(kinds[i]);
            i += 1;
        }
        set
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        let (a, b) = (self.0, other.0);
        Self([a[0] | b[0], a[1] | b[1], a[2] | b[2], a[3] | b[3]])
    }

    #[inline]
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        let (a, b) = (self.0, other.0);
        Self([a[0] & b[0], a[1] & b[1], a[2] & b[2], a[3] & b[3]])
    }

    #[inline]
    #[must_use]
    pub const fn without(self, kind: TokenKind) -> Self {
        let index = kind as usize;
        let mut words = self.0;
        words[index / 64] &= !(1u64 << (index % 64));
        Self(words)
    }

    #[inline]
    pub const fn contains(&self, kind: TokenKind) -> bool {
        let index = kind as usize;
        self.0[index / 64] & (1u64 << (index % 64)) != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0[0] == 0 && self.0[1] == 0 && self.0[2] == 0 && self.0[3] == 0
    }

    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Kinds in discriminant order.
    pub fn iter(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.0.iter().enumerate().flat_map(|(word_index, &word)| {
            BitIter(word).filter_map(move |bit| {
                u8::try_from(word_index * 64 + bit)
                    .ok()
                    .and_then(TokenKind::from_index)
            })
        })
    }

    /// Render as "`a`, `b`, or `c`" for diagnostics.
    pub fn format_expected(&self) -> String {
        let names: Vec<&'static str> = self.iter().map(TokenKind::display_name).collect();
        match names.as_slice() {
            [] => "nothing".to_string(),
            [single] => format!("`{single}`"),
            [first, second] => format!("`{first}` or `{second}`"),
            [rest @ .., last] => {
                let rest = rest
                    .iter()
                    .map(|n| format!("`{n}`"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{rest}, or `{last}`")
            }
        }
    }
}

struct BitIter(u64);

impl Iterator for BitIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(bit)
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<TokenKind> for TokenSet {
    fn from_iter<I: IntoIterator<Item = TokenKind>>(iter: I) -> Self {
        iter.into_iter().fold(TokenSet::EMPTY, TokenSet::with)
    }
}

use TokenKind as T;

pub const KEYWORDS: TokenSet = TokenSet::of(&[
    T::PackageKeyword,
    T::AsKeyword,
    T::TypeAliasKeyword,
    T::ClassKeyword,
    T::InterfaceKeyword,
    T::ThisKeyword,
    T::SuperKeyword,
    T::ValKeyword,
    T::VarKeyword,
    T::FunKeyword,
    T::ForKeyword,
    T::NullKeyword,
    T::TrueKeyword,
    T::FalseKeyword,
    T::IsKeyword,
    T::InKeyword,
    T::ThrowKeyword,
    T::ReturnKeyword,
    T::BreakKeyword,
    T::ContinueKeyword,
    T::ObjectKeyword,
    T::IfKeyword,
    T::ElseKeyword,
    T::WhileKeyword,
    T::DoKeyword,
    T::TryKeyword,
    T::WhenKeyword,
    T::TypeofKeyword,
    T::AsSafe,
    T::NotIn,
    T::NotIs,
]);

pub const SOFT_KEYWORDS: TokenSet = TokenSet::of(&[
    T::FileKeyword,
    T::ImportKeyword,
    T::WhereKeyword,
    T::ByKeyword,
    T::GetKeyword,
    T::SetKeyword,
    T::ConstructorKeyword,
    T::InitKeyword,
    T::ContextKeyword,
    T::AbstractKeyword,
    T::EnumKeyword,
    T::ContractKeyword,
    T::OpenKeyword,
    T::InnerKeyword,
    T::OverrideKeyword,
    T::PrivateKeyword,
    T::PublicKeyword,
    T::InternalKeyword,
    T::ProtectedKeyword,
    T::CatchKeyword,
    T::OutKeyword,
    T::VarargKeyword,
    T::ReifiedKeyword,
    T::DynamicKeyword,
    T::CompanionKeyword,
    T::SealedKeyword,
    T::FinallyKeyword,
    T::FinalKeyword,
    T::FieldKeyword,
    T::PropertyKeyword,
    T::ReceiverKeyword,
    T::ParamKeyword,
    T::SetparamKeyword,
    T::DelegateKeyword,
    T::LateinitKeyword,
    T::DataKeyword,
    T::InlineKeyword,
    T::NoinlineKeyword,
    T::TailrecKeyword,
    T::ExternalKeyword,
    T::AnnotationKeyword,
    T::CrossinlineKeyword,
    T::OperatorKeyword,
    T::InfixKeyword,
    T::ConstKeyword,
    T::SuspendKeyword,
    T::ExpectKeyword,
    T::ActualKeyword,
    T::ValueKeyword,
]);

/// Modifiers, including the fixed keyword `in` used as a variance modifier.
pub const MODIFIER_KEYWORDS: TokenSet = TokenSet::of(&[
    T::AbstractKeyword,
    T::EnumKeyword,
    T::ContractKeyword,
    T::OpenKeyword,
    T::InnerKeyword,
    T::OverrideKeyword,
    T::PrivateKeyword,
    T::PublicKeyword,
    T::InternalKeyword,
    T::ProtectedKeyword,
    T::OutKeyword,
    T::InKeyword,
    T::FinalKeyword,
    T::VarargKeyword,
    T::ReifiedKeyword,
    T::CompanionKeyword,
    T::SealedKeyword,
    T::LateinitKeyword,
    T::DataKeyword,
    T::InlineKeyword,
    T::NoinlineKeyword,
    T::TailrecKeyword,
    T::ExternalKeyword,
    T::AnnotationKeyword,
    T::CrossinlineKeyword,
    T::ConstKeyword,
    T::OperatorKeyword,
    T::InfixKeyword,
    T::SuspendKeyword,
    T::ExpectKeyword,
    T::ActualKeyword,
    T::ValueKeyword,
]);

pub const VISIBILITY_MODIFIERS: TokenSet = TokenSet::of(&[
    T::PrivateKeyword,
    T::PublicKeyword,
    T::InternalKeyword,
    T::ProtectedKeyword,
]);

pub const MODALITY_MODIFIERS: TokenSet = TokenSet::of(&[
    T::AbstractKeyword,
    T::FinalKeyword,
    T::SealedKeyword,
    T::OpenKeyword,
]);

pub const WHITESPACES: TokenSet = TokenSet::single(T::WhiteSpace);

pub const COMMENTS: TokenSet = TokenSet::of(&[
    T::EolComment,
    T::BlockComment,
    T::DocComment,
    T::ShebangComment,
]);

pub const WHITE_SPACE_OR_COMMENT: TokenSet = COMMENTS.union(WHITESPACES);

pub const STRINGS: TokenSet = TokenSet::of(&[T::CharacterLiteral, T::RegularStringPart]);

pub const AUGMENTED_ASSIGNMENTS: TokenSet =
    TokenSet::of(&[T::PlusEq, T::MinusEq, T::MultEq, T::PercEq, T::DivEq]);

pub const ALL_ASSIGNMENTS: TokenSet = AUGMENTED_ASSIGNMENTS.with(T::Eq);

pub const INCREMENT_AND_DECREMENT: TokenSet = TokenSet::of(&[T::PlusPlus, T::MinusMinus]);

/// Tokens that continue a receiver into a member access.
pub const QUALIFIED_ACCESS: TokenSet = TokenSet::of(&[T::Dot, T::SafeAccess]);

pub const OPERATIONS: TokenSet = TokenSet::of(&[
    T::AsKeyword,
    T::AsSafe,
    T::IsKeyword,
    T::InKeyword,
    T::Dot,
    T::PlusPlus,
    T::MinusMinus,
    T::ExclExcl,
    T::Mul,
    T::Plus,
    T::Minus,
    T::Excl,
    T::Div,
    T::Perc,
    T::Lt,
    T::Gt,
    T::LtEq,
    T::GtEq,
    T::EqEqEq,
    T::ExclEqEqEq,
    T::EqEq,
    T::ExclEq,
    T::AndAnd,
    T::OrOr,
    T::SafeAccess,
    T::Elvis,
    T::Range,
    T::RangeUntil,
    T::Eq,
    T::MultEq,
    T::DivEq,
    T::PercEq,
    T::PlusEq,
    T::MinusEq,
    T::NotIn,
    T::NotIs,
    T::Identifier,
]);

pub const KDOC_CONTENT: TokenSet = TokenSet::of(&[
    T::KdocText,
    T::KdocCodeBlockText,
    T::KdocTagName,
    T::KdocMarkdownLink,
    T::KdocMarkdownEscapedChar,
    T::KdocMarkdownInlineLink,
]);
