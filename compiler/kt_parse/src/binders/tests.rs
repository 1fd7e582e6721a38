use pretty_assertions::assert_eq;

use super::*;

fn ws(text: &str) -> TriviaPiece<'_> {
    TriviaPiece {
        kind: TokenKind::WhiteSpace,
        text,
    }
}

fn line(text: &str) -> TriviaPiece<'_> {
    TriviaPiece {
        kind: TokenKind::EolComment,
        text,
    }
}

fn block(text: &str) -> TriviaPiece<'_> {
    TriviaPiece {
        kind: TokenKind::BlockComment,
        text,
    }
}

fn doc(text: &str) -> TriviaPiece<'_> {
    TriviaPiece {
        kind: TokenKind::DocComment,
        text,
    }
}

#[test]
fn defaults_keep_trivia_outside() {
    let run = [ws("\n"), line("// a"), ws("\n")];
    assert_eq!(DefaultLeft.edge_position(&run), 3);
    assert_eq!(DefaultRight.edge_position(&run), 0);
    assert_eq!(DefaultLeft.edge_position(&[]), 0);
}

#[test]
fn doc_binder_takes_nearest_doc_comment() {
    let run = [
        doc("/** old */"),
        ws("\n"),
        doc("/** new */"),
        ws("\n"),
        line("// x"),
        ws("\n"),
    ];
    assert_eq!(PrecedingDocComments.edge_position(&run), 2);
}

#[test]
fn doc_binder_without_doc_binds_nothing() {
    let run = [ws("\n"), line("// x"), ws("\n")];
    assert_eq!(PrecedingDocComments.edge_position(&run), 3);
}

#[test]
fn preceding_comments_take_own_line_comments_up_to_blank_line() {
    let run = [
        ws("\n"),
        line("// far"),
        ws("\n\n"),
        line("// near 1"),
        ws("\n"),
        block("/* near 2 */"),
        ws("\n"),
    ];
    assert_eq!(PrecedingComments.edge_position(&run), 3);
}

#[test]
fn preceding_comments_skip_comment_on_previous_code_line() {
    // `foo() // about foo` followed by a declaration on the next line.
    let run = [ws(" "), line("// about foo"), ws("\n")];
    assert_eq!(PrecedingComments.edge_position(&run), 3);
}

#[test]
fn preceding_comments_prefer_doc_comment() {
    let run = [doc("/** d */"), ws("\n"), line("// x"), ws("\n")];
    assert_eq!(PrecedingComments.edge_position(&run), 0);
}

#[test]
fn comment_at_run_start_counts_as_own_line() {
    let run = [line("// first"), ws("\n")];
    assert_eq!(PrecedingComments.edge_position(&run), 0);
}

#[test]
fn trailing_comments_stop_at_line_break() {
    let run = [ws(" "), line("// same line"), ws("\n"), line("// next")];
    assert_eq!(TrailingComments.edge_position(&run), 2);

    let run = [ws("\n"), line("// next")];
    assert_eq!(TrailingComments.edge_position(&run), 0);

    let run = [ws(" "), block("/* a */"), ws(" "), block("/* b */")];
    assert_eq!(TrailingComments.edge_position(&run), 4);
}

#[test]
fn declaration_binders_pick_left_by_flag() {
    let run = [line("// plain"), ws("\n")];
    assert_eq!(EdgeBinders::declaration(true).left.edge_position(&run), 0);
    assert_eq!(EdgeBinders::declaration(false).left.edge_position(&run), 2);
}
