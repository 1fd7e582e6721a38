//! Raw token definition.
//!
//! `RawToken` is the logos-derived tokenizer output before keyword lookup,
//! string splitting and operator fusion.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub(crate) enum RawToken {
    #[regex(r"[ \t\r\n\x0C]+")]
    WhiteSpace,

    #[regex(r"//[^\n]*")]
    EolComment,

    /// Block and doc comments; Kotlin block comments nest.
    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r#""([^"\\\n\r]|\\.)*"?"#)]
    String,

    #[token("\"\"\"", raw_string)]
    RawString,

    #[regex(r"'([^'\\\n\r]|\\.)*'?")]
    Char,

    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*([uU][lL]?|[lL])?")]
    #[regex(r"0[bB][01][01_]*([uU][lL]?|[lL])?")]
    #[regex(r"[0-9][0-9_]*([uU][lL]?|[lL])?")]
    Integer,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?[fF]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?[fF]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*[fF]?")]
    #[regex(r"[0-9][0-9_]*[fF]")]
    Float,

    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Ident,

    #[regex(r"`[^`\r\n]+`")]
    BacktickIdent,

    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LPar,
    #[token(")")]
    RPar,
    #[token(".")]
    Dot,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("*")]
    Mul,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("!")]
    Excl,
    #[token("/")]
    Div,
    #[token("%")]
    Perc,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("===")]
    EqEqEq,
    #[token("!==")]
    ExclEqEqEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    ExclEq,
    #[token("!!")]
    ExclExcl,
    #[token("&&")]
    AndAnd,
    #[token("&")]
    And,
    #[token("||")]
    OrOr,
    #[token("?.")]
    SafeAccess,
    #[token("?:")]
    Elvis,
    #[token("?")]
    Quest,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(";;")]
    DoubleSemicolon,
    #[token("..")]
    Range,
    #[token("..<")]
    RangeUntil,
    #[token("=")]
    Eq,
    #[token("*=")]
    MultEq,
    #[token("/=")]
    DivEq,
    #[token("%=")]
    PercEq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("->")]
    Arrow,
    #[token("=>")]
    DoubleArrow,
    #[token(",")]
    Comma,
    #[token("#")]
    Hash,
    #[token("@")]
    At,
}

/// Consume the rest of a (possibly nested) block comment. An unterminated
/// comment runs to the end of input.
fn block_comment(lex: &mut logos::Lexer<RawToken>) {
    let rest = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < rest.len() {
        if rest[i..].starts_with(b"*/") {
            i += 2;
            depth -= 1;
            if depth == 0 {
                break;
            }
        } else if rest[i..].starts_with(b"/*") {
            i += 2;
            depth += 1;
        } else {
            i += 1;
        }
    }
    lex.bump(i);
}

/// Consume a triple-quoted string up to its closing quotes. A run of more
/// than three quotes ends the literal at its last three, as in `""""x""""`.
fn raw_string(lex: &mut logos::Lexer<RawToken>) {
    let rest = lex.remainder();
    let len = match rest.find("\"\"\"") {
        Some(at) => {
            let extra = rest[at + 3..].bytes().take_while(|&b| b == b'"').count();
            at + 3 + extra
        }
        None => rest.len(),
    };
    lex.bump(len);
}
