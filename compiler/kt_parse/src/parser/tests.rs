use kt_ir::{NodeKind, TokenKind, TokenSet};
use pretty_assertions::assert_eq;

use super::*;
use crate::lookahead::{At, FirstBefore};
use crate::{parse_tokens, Parse};

fn run(source: &str, entry: fn(&mut Parser<'_>)) -> Result<Parse, TreeError> {
    parse_tokens(kt_lexer::lex(source), ParseOptions::default(), entry)
}

fn dump(source: &str, entry: fn(&mut Parser<'_>)) -> String {
    run(source, entry).map_or_else(|e| format!("error: {e}"), |p| p.tree().debug_dump())
}

fn rest(p: &mut Parser<'_>) {
    while !p.eof() {
        p.advance();
    }
}

#[test]
fn at_promotes_and_demotes_soft_keywords() {
    let out = dump("data data", |p| {
        let file = p.mark();
        assert!(p.at(TokenKind::DataKeyword));
        p.advance();
        assert!(p.at(TokenKind::Identifier));
        p.advance();
        p.done(file, NodeKind::File);
    });
    assert_eq!(
        out,
        "FILE@0..9\n\
         \x20 data@0..4 \"data\"\n\
         \x20 WHITE_SPACE@4..5 \" \"\n\
         \x20 IDENTIFIER@5..9 \"data\"\n"
    );
}

#[test]
fn check_never_remaps() {
    let tokens = kt_lexer::lex("open");
    let mut p = Parser::new(&tokens, ParseOptions::default());
    assert!(p.check(TokenKind::OpenKeyword));
    assert!(p.check_set(TokenSet::of(&[TokenKind::OpenKeyword])));
    assert_eq!(p.current(), TokenKind::Identifier);
    assert!(!p.check(TokenKind::DataKeyword));

    assert!(p.at_set(TokenSet::of(&[TokenKind::OpenKeyword, TokenKind::ClassKeyword])));
    assert_eq!(p.current(), TokenKind::OpenKeyword);
    assert!(p.check(TokenKind::Identifier));
}

#[test]
fn statement_end_in_sets() {
    let tokens = kt_lexer::lex("a\nb; c");
    let mut p = Parser::new(&tokens, ParseOptions::default());
    let end = TokenSet::single(TokenKind::EolOrSemicolon);
    assert!(!p.at_set(end));
    p.advance();
    assert!(p.at_set(end));
    assert!(p.eol());
    p.advance();
    assert!(p.at(TokenKind::EolOrSemicolon));
    p.advance();
    assert!(!p.check(TokenKind::EolOrSemicolon));
    p.advance();
    assert!(p.check(TokenKind::EolOrSemicolon));
}

#[test]
fn newlines_are_ignored_while_disabled() {
    let tokens = kt_lexer::lex("a\nb");
    let mut p = Parser::new(&tokens, ParseOptions::default());
    p.advance();
    p.disable_newlines();
    assert!(!p.eol());
    p.enable_newlines();
    assert!(p.eol());
    p.restore_newlines_state();
    p.restore_newlines_state();
    assert!(p.eol());
}

#[test]
fn missing_token_reports_in_place_at_sync_token() {
    let out = dump("fun )", |p| {
        let file = p.mark();
        p.advance();
        p.expect_recovering(TokenKind::Identifier, RecoveryCase::ParameterNameExpected);
        rest(p);
        p.done(file, NodeKind::File);
    });
    assert_eq!(
        out,
        "FILE@0..5\n\
         \x20 fun@0..3 \"fun\"\n\
         \x20 WHITE_SPACE@3..4 \" \"\n\
         \x20 ERROR_ELEMENT@4..4 \"Parameter name expected\"\n\
         \x20 RPAR@4..5 \")\"\n"
    );
}

#[test]
fn missing_token_swallows_one_token_outside_sync_set() {
    let out = dump("fun + x", |p| {
        let file = p.mark();
        p.advance();
        p.expect_recovering(TokenKind::Identifier, RecoveryCase::ParameterNameExpected);
        rest(p);
        p.done(file, NodeKind::File);
    });
    assert_eq!(
        out,
        "FILE@0..7\n\
         \x20 fun@0..3 \"fun\"\n\
         \x20 WHITE_SPACE@3..4 \" \"\n\
         \x20 ERROR_ELEMENT@4..5 \"Parameter name expected\"\n\
         \x20   PLUS@4..5 \"+\"\n\
         \x20 WHITE_SPACE@5..6 \" \"\n\
         \x20 IDENTIFIER@6..7 \"x\"\n"
    );
}

#[test]
fn braces_always_stop_recovery() {
    let out = dump("{", |p| {
        let file = p.mark();
        p.expect_recovering_with(
            TokenKind::Identifier,
            RecoveryCase::ExpectingTypeParameterName,
            TokenSet::EMPTY,
        );
        rest(p);
        p.done(file, NodeKind::File);
    });
    assert!(out.contains("ERROR_ELEMENT@0..0 \"Expecting type parameter name\""));
}

#[test]
fn caller_worded_case_falls_back_to_spelling() {
    let parse = run("+", |p| {
        let file = p.mark();
        p.expect_recovering(TokenKind::LPar, RecoveryCase::ExpectingFunctionName);
        rest(p);
        p.done(file, NodeKind::File);
    });
    let messages: Vec<String> = parse
        .map(|p| p.diagnostics().iter().map(|d| d.message.clone()).collect())
        .unwrap_or_default();
    assert_eq!(messages, vec!["Expecting '('".to_string()]);
}

#[test]
fn lone_backtick_is_skipped_but_missing() {
    let tokens = kt_lexer::lex("` x");
    let mut p = Parser::new(&tokens, ParseOptions::default());
    if p.text() == "`" {
        assert!(!p.expect(TokenKind::Identifier));
        assert_eq!(p.text(), "x");
    }
}

#[test]
fn error_until_stops_at_statement_end() {
    let out = dump("a b c\nd", |p| {
        let file = p.mark();
        p.advance();
        p.error_until(
            "Unexpected tokens",
            TokenSet::of(&[TokenKind::EolOrSemicolon, TokenKind::LBrace, TokenKind::RBrace]),
        );
        rest(p);
        p.done(file, NodeKind::File);
    });
    assert_eq!(
        out,
        "FILE@0..7\n\
         \x20 IDENTIFIER@0..1 \"a\"\n\
         \x20 WHITE_SPACE@1..2 \" \"\n\
         \x20 ERROR_ELEMENT@2..5 \"Unexpected tokens\"\n\
         \x20   IDENTIFIER@2..3 \"b\"\n\
         \x20   WHITE_SPACE@3..4 \" \"\n\
         \x20   IDENTIFIER@4..5 \"c\"\n\
         \x20 WHITE_SPACE@5..6 \"\\n\"\n\
         \x20 IDENTIFIER@6..7 \"d\"\n"
    );
}

#[test]
fn recovery_set_without_braces_is_a_contract_violation() {
    let result = run("a b", |p| {
        let file = p.mark();
        p.skip_until(TokenSet::single(TokenKind::Semicolon));
        rest(p);
        p.done(file, NodeKind::File);
    });
    assert_eq!(
        result.err(),
        Some(TreeError::RecoverySetWithoutBraces {
            operation: "skip_until"
        })
    );
}

#[test]
fn optional_marker_never_closes_empty_error() {
    let out = dump("a", |p| {
        let file = p.mark();
        let empty = OptionalMarker::new(p, true);
        empty.error(p, "never shown");
        let absent = OptionalMarker::new(p, false);
        p.advance();
        absent.error(p, "never shown");
        p.done(file, NodeKind::File);
    });
    assert_eq!(out, "FILE@0..1\n  IDENTIFIER@0..1 \"a\"\n");

    let out = dump("a", |p| {
        let file = p.mark();
        let real = OptionalMarker::new(p, true);
        p.advance();
        real.error(p, "bad");
        p.done(file, NodeKind::File);
    });
    assert!(out.contains("ERROR_ELEMENT@0..1 \"bad\""));
}

#[test]
fn error_if_drops_when_condition_is_false() {
    let out = dump("a", |p| {
        let file = p.mark();
        let m = p.mark();
        p.advance();
        p.error_if(m, false, "unused");
        p.done(file, NodeKind::File);
    });
    assert_eq!(out, "FILE@0..1\n  IDENTIFIER@0..1 \"a\"\n");
}

#[test]
fn last_token_skips_trivia() {
    let tokens = kt_lexer::lex("a /* c */\n b");
    let mut p = Parser::new(&tokens, ParseOptions::default());
    assert_eq!(p.last_token(), TokenKind::Eof);
    p.advance();
    assert_eq!(p.last_token(), TokenKind::Identifier);
}

#[test]
fn speculative_scan_leaves_no_trace() {
    let tokens = kt_lexer::lex("data (x, [y]) = z");
    let mut p = Parser::new(&tokens, ParseOptions::default());
    let before = (p.position(), p.current());

    let mut pattern = FirstBefore::new(At::new(TokenKind::Eq), At::new(TokenKind::Semicolon));
    let found = p.match_token_stream_predicate(&mut pattern);

    assert_eq!(found, Some(14));
    assert_eq!((p.position(), p.current()), before);
}

#[test]
fn nested_tokens_are_not_top_level() {
    let tokens = kt_lexer::lex("f(a = 1) = 2");
    let mut p = Parser::new(&tokens, ParseOptions::default());
    let mut pattern = FirstBefore::new(At::new(TokenKind::Eq), At::new(TokenKind::Semicolon));
    assert_eq!(p.match_token_stream_predicate(&mut pattern), Some(9));

    let mut anywhere =
        FirstBefore::new(At::anywhere(TokenKind::Eq), At::new(TokenKind::Semicolon));
    assert_eq!(p.match_token_stream_predicate(&mut anywhere), Some(4));
}

#[test]
fn lookahead_limit_means_no_match() {
    let tokens = kt_lexer::lex("a b c d = e");
    let options = ParseOptions {
        lookahead_limit: Some(2),
        ..ParseOptions::default()
    };
    let mut p = Parser::new(&tokens, options);
    let mut pattern = FirstBefore::new(At::new(TokenKind::Eq), At::new(TokenKind::Semicolon));
    assert_eq!(p.match_token_stream_predicate(&mut pattern), None);
}

#[test]
fn depth_budget_turns_into_error_node() {
    fn nest(p: &mut Parser<'_>) {
        if p.at(TokenKind::LPar) {
            p.advance();
            p.nested(nest);
        } else {
            rest(p);
        }
    }
    let options = ParseOptions {
        max_depth: 2,
        ..ParseOptions::default()
    };
    let parse = parse_tokens(kt_lexer::lex("((((x"), options, |p| {
        let file = p.mark();
        nest(p);
        rest(p);
        p.done(file, NodeKind::File);
    });
    let messages: Vec<String> = parse
        .map(|p| p.diagnostics().iter().map(|d| d.message.clone()).collect())
        .unwrap_or_default();
    assert_eq!(messages, vec!["Expression is nested too deeply".to_string()]);
}
