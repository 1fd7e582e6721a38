use kt_ir::{TokenKind, TokenSet};
use pretty_assertions::assert_eq;

use super::*;
use crate::ParseOptions;

/// Position the parser on the first `<` and ask whether it opens a type
/// argument list of a call.
fn type_arguments_ahead(source: &str) -> bool {
    let tokens = kt_lexer::lex(source);
    let mut p = Parser::new(&tokens, ParseOptions::default());
    while !p.eof() && p.current() != TokenKind::Lt {
        p.advance();
    }
    let before = (p.position(), p.current());
    let found = p
        .match_token_stream_predicate(&mut TypeArgumentListAhead::new())
        .is_some();
    assert_eq!((p.position(), p.current()), before, "scan left a trace");
    found
}

#[test]
fn generic_call_is_type_arguments() {
    assert!(type_arguments_ahead("x<T>()"));
    assert!(type_arguments_ahead("listOf<Map<String, List<Int>>>()"));
    assert!(type_arguments_ahead("f<in A, out B, *>()"));
    assert!(type_arguments_ahead("f<(A) -> B?>()"));
    assert!(type_arguments_ahead("run<Unit> { }"));
}

#[test]
fn bare_identifier_argument_is_plausible() {
    // `x < y > (z)` and `x<y>(z)` lex the same way
    assert!(type_arguments_ahead("x<y>(z)"));
}

#[test]
fn comparisons_are_not_type_arguments() {
    assert!(!type_arguments_ahead("x < 1 > (z)"));
    assert!(!type_arguments_ahead("x < y && z > (w)"));
    assert!(!type_arguments_ahead("a < b"));
    assert!(!type_arguments_ahead("a < b > c"));
    assert!(!type_arguments_ahead("x < (y + 1) > (z)"));
}

#[test]
fn unmatched_close_abandons_scan() {
    assert!(!type_arguments_ahead("f(a < b) > (c)"));
    assert!(!type_arguments_ahead("x < y] > (z)"));
}

#[test]
fn last_before_finds_final_dot() {
    let tokens = kt_lexer::lex("a.b<c.d>.foo(x.y)");
    let mut p = Parser::new(&tokens, ParseOptions::default());
    let mut pattern = LastBefore::new(
        AtSet::new(TokenSet::of(&[TokenKind::Dot, TokenKind::SafeAccess])),
        At::new(TokenKind::LPar),
        false,
    );
    // the dot inside `<c.d>` is not top level
    assert_eq!(p.match_token_stream_predicate(&mut pattern), Some(8));
}

#[test]
fn or_combines_predicates() {
    let tokens = kt_lexer::lex("a b : c");
    let mut p = Parser::new(&tokens, ParseOptions::default());
    let mut pattern = FirstBefore::new(
        At::new(TokenKind::Eq).or(At::new(TokenKind::Colon)),
        At::new(TokenKind::Semicolon),
    );
    assert_eq!(p.match_token_stream_predicate(&mut pattern), Some(4));
}

#[test]
fn predicates_may_promote_soft_keywords_only_speculatively() {
    let tokens = kt_lexer::lex("x by lazy");
    let mut p = Parser::new(&tokens, ParseOptions::default());
    p.advance();
    let mut pattern = FirstBefore::new(At::new(TokenKind::ByKeyword), At::new(TokenKind::Eq));
    assert_eq!(p.match_token_stream_predicate(&mut pattern), Some(2));
    assert_eq!(p.current(), TokenKind::Identifier);
}
