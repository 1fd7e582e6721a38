//! Property tests for the parser: every input yields a tree, and the tree
//! covers the input exactly.

#![allow(clippy::unwrap_used, reason = "proptest bodies")]

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use kt_ir::{NodeKind, TokenKind};
use kt_parse::lookahead::{At, FirstBefore, TypeArgumentListAhead};
use kt_parse::{parse_source, Parse, ParseOptions, Parser};
use proptest::prelude::*;

fn reassemble(parse: &Parse) -> String {
    let tree = parse.tree();
    tree.leaves(tree.root())
        .into_iter()
        .map(|token| tree.token_text(token))
        .collect()
}

/// Cursor state observable from outside the builder.
fn snapshot(p: &Parser<'_>) -> (usize, TokenKind, u32) {
    (p.position(), p.current(), p.current_offset())
}

/// Spellings of every token that can start an expression or a type, plus
/// tokens no rule starts with and the separators between statements.
const SOUP: &[&str] = &[
    "-", "+", "--", "++", "!", "!!", "::", "(", "[", "{", "this", "super", "if", "when", "try",
    "object", "throw", "return", "continue", "break", "do", "while", "for", "1", "1.5", "'c'",
    "\"", "\"s\"", "null", "true", "false", "x", "@", "@A", "fun", "val", "var", "interface",
    "class", "typealias", "dynamic", ")", "]", "}", "->", ",", ";", ".", "?", ":", "=", "<", ">",
    "#", "^", "~", "`", "$", "\\", "in", "is", "as", "else", "catch", "finally", "get", "set",
    "init", "constructor", "data", "enum", "private", "/**", "*/", "\n", "\n", " ", " ",
];

fn soup() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(SOUP), 0..40)
        .prop_map(|pieces| pieces.concat())
}

/// Parse on a worker thread and give up after `limit`.
fn parse_within(source: String, limit: Duration) -> Option<Parse> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let _ = sender.send(parse_source(&source).unwrap());
    });
    receiver.recv_timeout(limit).ok()
}

fn error_nodes(parse: &Parse) -> usize {
    let tree = parse.tree();
    tree.descendants(tree.root())
        .into_iter()
        .filter(|&node| tree.node_kind(node) == NodeKind::Error)
        .count()
}

proptest! {
    #[test]
    fn any_text_parses_losslessly(source in "\\PC{0,200}") {
        let parse = parse_source(&source).unwrap();
        prop_assert_eq!(reassemble(&parse), source);
    }

    #[test]
    fn kotlin_like_text_parses_losslessly(
        source in "(fun|val|var|class|object|when|if|else|is|in|as|by|get|set|[a-z]|[ \\n(){}<>.,;:=+\\-*?!@\"$\\[\\]0-9#]){0,80}"
    ) {
        let parse = parse_source(&source).unwrap();
        prop_assert_eq!(reassemble(&parse), source);
    }

    #[test]
    fn token_soup_in_bodies_terminates(body in soup()) {
        for source in [
            format!("fun f() {{\n{body}\n}}"),
            format!("class A {{\n{body}\n}}"),
            format!("val v = when (x) {{\n{body}\n}}"),
            body.clone(),
        ] {
            let parse = parse_within(source.clone(), Duration::from_secs(10));
            prop_assert!(parse.is_some(), "parse did not finish on {:?}", source);
            if let Some(parse) = parse {
                prop_assert_eq!(reassemble(&parse), source);
            }
        }
    }

    #[test]
    fn diagnostics_match_error_nodes(source in "[a-z (){}<>.,:=\\n]{0,80}") {
        let parse = parse_source(&source).unwrap();
        prop_assert_eq!(parse.diagnostics().len(), error_nodes(&parse));
        prop_assert_eq!(parse.has_errors(), !parse.diagnostics().is_empty());
    }

    #[test]
    fn doc_comments_parse_losslessly(body in "[a-z @*\\[\\]`\\n.]{0,60}") {
        let source = format!("/**{body}*/\nfun f() {{}}");
        let parse = parse_source(&source).unwrap();
        let tree = parse.tree();
        for token in tree.deferred_tokens() {
            let doc = tree.parse_embedded(token).unwrap();
            prop_assert_eq!(doc.tree().text(), tree.token_text(token));
            prop_assert_eq!(reassemble(&doc), tree.token_text(token));
        }
    }

    #[test]
    fn scans_leave_no_trace(
        source in "[a-z <>(){}.,:\\-\\n]{0,80}",
        skip in 0usize..20,
        limit in proptest::option::of(0usize..16),
    ) {
        let tokens = kt_lexer::lex(&source);
        let options = ParseOptions { lookahead_limit: limit, ..ParseOptions::default() };
        let mut p = Parser::new(&tokens, options);
        for _ in 0..skip {
            if !p.eof() {
                p.advance();
            }
        }
        let before = snapshot(&p);
        let arrow = p.match_token_stream_predicate(&mut FirstBefore::new(
            At::new(TokenKind::Arrow),
            At::new(TokenKind::RBrace),
        ));
        prop_assert_eq!(snapshot(&p), before);
        let arguments = p.match_token_stream_predicate(&mut TypeArgumentListAhead::new());
        prop_assert_eq!(snapshot(&p), before);
        if limit == Some(0) {
            prop_assert_eq!(arrow, None);
            prop_assert_eq!(arguments, None);
        }
    }

    #[test]
    fn rollback_is_repeatable(source in "[a-z (){}.,=\\n]{0,60}", steps in 0usize..30) {
        let tokens = kt_lexer::lex(&source);
        let mut p = Parser::new(&tokens, ParseOptions::default());
        let before = snapshot(&p);
        for _ in 0..2 {
            let marker = p.mark();
            for _ in 0..steps {
                if p.eof() {
                    break;
                }
                let _ = p.at_set(kt_ir::TokenSet::of(&[TokenKind::DataKeyword]));
                p.advance();
            }
            p.rollback(marker);
            prop_assert_eq!(snapshot(&p), before);
        }
    }
}
