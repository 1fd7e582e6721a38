#![allow(clippy::unwrap_used, clippy::expect_used)]

use kt_diagnostic::emitter::ColorMode;
use kt_parse::TreeError;
use pretty_assertions::assert_eq;

use super::*;
use crate::options::parse_args;

struct Captured {
    outcome: Result<Outcome, CliError>,
    out: String,
    err: String,
}

fn run_on(list: &[&str], source: &str) -> Captured {
    let args: Vec<String> = std::iter::once("ktc")
        .chain(list.iter().copied())
        .chain(["--no-color"])
        .map(String::from)
        .collect();
    let options = parse_args(&args).unwrap();
    let mut io = Io {
        out: Vec::new(),
        err: Vec::new(),
        is_tty: false,
    };
    let outcome = run_source(&options, source, &mut io);
    Captured {
        outcome,
        out: String::from_utf8(io.out).unwrap(),
        err: String::from_utf8(io.err).unwrap(),
    }
}

#[test]
fn lex_lists_every_token() {
    let captured = run_on(&["lex", "a.kt"], "val x");
    assert_eq!(captured.outcome.unwrap(), Outcome::Clean);
    assert_eq!(
        captured.out,
        "Tokens for 'a.kt' (4 tokens):\n\
         \x20 val @ 0..3 \"val\"\n\
         \x20 WHITE_SPACE @ 3..4 \" \"\n\
         \x20 IDENTIFIER @ 4..5 \"x\"\n\
         \x20 EOF @ 5..5 \"\"\n"
    );
}

#[test]
fn parse_prints_the_tree() {
    let captured = run_on(&["parse", "a.kt"], "val x = 1");
    assert_eq!(captured.outcome.unwrap(), Outcome::Clean);
    assert!(captured.out.starts_with("FILE@0..9\n"));
    assert!(captured.out.contains("PROPERTY@0..9"));
    assert!(captured.err.is_empty());
}

#[test]
fn parse_reports_syntax_errors() {
    let captured = run_on(&["parse", "a.kt"], "fun f( {}");
    assert_eq!(captured.outcome.unwrap(), Outcome::Diagnostics);
    assert!(captured.out.contains("ERROR_ELEMENT"));
    assert!(captured.err.contains("error[E1001]"));
    assert!(captured.err.contains("--> a.kt:1:"));
    assert!(captured.err.ends_with("syntax errors\n") || captured.err.ends_with("syntax error\n"));
}

#[test]
fn expand_docs_dumps_comment_and_links() {
    let source = "/** See [a.b]. */\nfun f() {}";
    let plain = run_on(&["parse", "a.kt"], source);
    assert!(!plain.out.contains("KDOC"));

    let expanded = run_on(&["parse", "a.kt", "--expand-docs"], source);
    assert_eq!(expanded.outcome.unwrap(), Outcome::Clean);
    assert!(expanded.out.contains("\nKDoc@0..17:\nKDOC@0..17\n"));
    assert!(expanded.out.contains("KDOC_MARKDOWN_LINK@8..13:\nKDOC_LINK@8..13\n"));
}

#[test]
fn doc_comment_errors_point_at_their_comment() {
    let source = "/** See [a.]. */\nfun f() {}";
    let plain = run_on(&["parse", "a.kt"], source);
    assert_eq!(plain.outcome.unwrap(), Outcome::Clean);

    let expanded = run_on(&["parse", "a.kt", "--expand-docs"], source);
    assert_eq!(expanded.outcome.unwrap(), Outcome::Diagnostics);
    assert!(expanded.err.contains("error[E1001]: Identifier expected"));
    assert!(expanded.err.contains("---- in this doc comment"));
}

#[test]
fn check_prints_diagnostics_only() {
    let clean = run_on(&["check", "a.kt"], "class A");
    assert_eq!(clean.outcome.unwrap(), Outcome::Clean);
    assert!(clean.out.is_empty());
    assert!(clean.err.is_empty());

    let broken = run_on(&["check", "a.kt"], "class A {");
    assert_eq!(broken.outcome.unwrap(), Outcome::Diagnostics);
    assert!(broken.out.is_empty());
    assert!(broken.err.contains("Missing '}'"));
    assert_eq!(Outcome::Diagnostics.exit_code(), 1);
}

#[test]
fn missing_file_is_an_io_error() {
    let args: Vec<String> = ["ktc", "check", "/nonexistent/dir/a.kt"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    let options = parse_args(&args).unwrap();
    let mut io = Io {
        out: Vec::new(),
        err: Vec::new(),
        is_tty: false,
    };
    let error = run(&options, &mut io).expect_err("file is missing");
    assert!(matches!(error, CliError::Io { .. }));
    assert_eq!(error.to_string(), "cannot find file '/nonexistent/dir/a.kt'");
    assert_eq!(error.exit_code(), 2);
}

#[test]
fn contract_errors_render_as_internal_diagnostics() {
    let error = CliError::from(TreeError::NotOpen { marker: 3 });
    let mut err = Vec::new();
    report_error(&error, &mut err, ColorMode::Never, false);
    let text = String::from_utf8(err).unwrap();
    assert!(text.starts_with("error[E9001]: internal parser error: marker at event 3 is not open\n"));
}

#[test]
fn help_lists_commands() {
    let args = vec!["ktc".to_string()];
    let options = parse_args(&args).unwrap();
    let mut io = Io {
        out: Vec::new(),
        err: Vec::new(),
        is_tty: false,
    };
    assert_eq!(run(&options, &mut io).unwrap(), Outcome::Clean);
    let text = String::from_utf8(io.out).unwrap();
    for command in ["lex", "parse", "check"] {
        assert!(text.contains(&format!("  {command} <file.kt>")));
    }
}
