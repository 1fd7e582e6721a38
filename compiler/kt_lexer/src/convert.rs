//! Raw token to `TokenKind` conversion.

use kt_ir::{keyword_for_text, TokenKind};

use crate::raw_token::RawToken;

pub(crate) fn convert_token(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::WhiteSpace => TokenKind::WhiteSpace,
        RawToken::EolComment => TokenKind::EolComment,
        RawToken::BlockComment => {
            if slice.starts_with("/**") && slice != "/**/" {
                TokenKind::DocComment
            } else {
                TokenKind::BlockComment
            }
        }
        // Strings are split by the caller before conversion.
        RawToken::String | RawToken::RawString => TokenKind::RegularStringPart,
        RawToken::Char => TokenKind::CharacterLiteral,
        RawToken::Integer => TokenKind::IntegerLiteral,
        RawToken::Float => TokenKind::FloatLiteral,
        RawToken::Ident => keyword_for_text(slice).unwrap_or(TokenKind::Identifier),
        RawToken::BacktickIdent => TokenKind::Identifier,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LPar => TokenKind::LPar,
        RawToken::RPar => TokenKind::RPar,
        RawToken::Dot => TokenKind::Dot,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::Mul => TokenKind::Mul,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Excl => TokenKind::Excl,
        RawToken::Div => TokenKind::Div,
        RawToken::Perc => TokenKind::Perc,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::EqEqEq => TokenKind::EqEqEq,
        RawToken::ExclEqEqEq => TokenKind::ExclEqEqEq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::ExclEq => TokenKind::ExclEq,
        RawToken::ExclExcl => TokenKind::ExclExcl,
        RawToken::AndAnd => TokenKind::AndAnd,
        RawToken::And => TokenKind::And,
        RawToken::OrOr => TokenKind::OrOr,
        RawToken::SafeAccess => TokenKind::SafeAccess,
        RawToken::Elvis => TokenKind::Elvis,
        RawToken::Quest => TokenKind::Quest,
        RawToken::ColonColon => TokenKind::ColonColon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::DoubleSemicolon => TokenKind::DoubleSemicolon,
        RawToken::Range => TokenKind::Range,
        RawToken::RangeUntil => TokenKind::RangeUntil,
        RawToken::Eq => TokenKind::Eq,
        RawToken::MultEq => TokenKind::MultEq,
        RawToken::DivEq => TokenKind::DivEq,
        RawToken::PercEq => TokenKind::PercEq,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::DoubleArrow => TokenKind::DoubleArrow,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Hash => TokenKind::Hash,
        RawToken::At => TokenKind::At,
    }
}
