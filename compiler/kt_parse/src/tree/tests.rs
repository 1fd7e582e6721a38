#![allow(clippy::expect_used)]

use kt_ir::{NodeKind, TokenKind};
use pretty_assertions::assert_eq;

use super::*;
use crate::parse_source;

fn tree(source: &str) -> Arc<SyntaxTree> {
    parse_source(source).expect("file parses").tree().clone()
}

fn find(tree: &SyntaxTree, kind: NodeKind) -> NodeId {
    tree.descendants(tree.root())
        .into_iter()
        .find(|&node| tree.node_kind(node) == kind)
        .expect("node of the requested kind")
}

#[test]
fn dump_prints_nodes_tokens_and_spans() {
    assert_eq!(
        tree("fun f() {}").debug_dump(),
        "FILE@0..10\n\
         \x20 PACKAGE_DIRECTIVE@0..0\n\
         \x20 IMPORT_LIST@0..0\n\
         \x20 FUN@0..10\n\
         \x20   fun@0..3 \"fun\"\n\
         \x20   WHITE_SPACE@3..4 \" \"\n\
         \x20   IDENTIFIER@4..5 \"f\"\n\
         \x20   VALUE_PARAMETER_LIST@5..7\n\
         \x20     LPAR@5..6 \"(\"\n\
         \x20     RPAR@6..7 \")\"\n\
         \x20   WHITE_SPACE@7..8 \" \"\n\
         \x20   BLOCK@8..10\n\
         \x20     LBRACE@8..9 \"{\"\n\
         \x20     RBRACE@9..10 \"}\"\n"
    );
}

#[test]
fn dump_shows_error_messages() {
    let dump = tree(")").debug_dump();
    assert!(
        dump.contains("ERROR_ELEMENT@0..1 \"Expecting a top level declaration\""),
        "{dump}"
    );
}

#[test]
fn parents_and_children_agree() {
    let tree = tree("class A {\n    fun f() = 1\n}\n");
    for node in tree.descendants(tree.root()) {
        for child in tree.child_nodes(node) {
            assert_eq!(tree.parent(child), Some(node));
        }
    }
    assert_eq!(tree.parent(tree.root()), None);
}

#[test]
fn children_are_contiguous() {
    let tree = tree("val a = b + c // tail\n");
    for node in tree.descendants(tree.root()) {
        let mut at = tree.node_span(node).start;
        for &child in tree.children(node) {
            let span = tree.span(child);
            assert_eq!(span.start, at, "gap before {:?}", tree.kind(child));
            at = span.end;
        }
        if !tree.children(node).is_empty() {
            assert_eq!(at, tree.node_span(node).end);
        }
    }
}

#[test]
fn descendants_are_in_source_order() {
    let tree = tree("fun f() = a(b)");
    let kinds: Vec<NodeKind> = tree
        .descendants(find(&tree, NodeKind::CallExpression))
        .into_iter()
        .map(|node| tree.node_kind(node))
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::CallExpression,
            NodeKind::ReferenceExpression,
            NodeKind::ValueArgumentList,
            NodeKind::ValueArgument,
            NodeKind::ReferenceExpression,
        ]
    );
}

#[test]
fn leaves_keep_trivia() {
    let source = "/* a */ val x = 1 // b\n";
    let tree = tree(source);
    let kinds: Vec<TokenKind> = tree
        .leaves(tree.root())
        .into_iter()
        .map(|token| tree.token_kind(token))
        .collect();
    assert!(kinds.contains(&TokenKind::BlockComment));
    assert!(kinds.contains(&TokenKind::EolComment));
    assert_eq!(tree.text(), source);
}

#[test]
fn node_text_slices_the_source() {
    let tree = tree("val x = listOf(1, 2)\n");
    assert_eq!(tree.node_text(find(&tree, NodeKind::ValueArgumentList)), "(1, 2)");
}

#[test]
fn soft_keywords_report_their_role() {
    let tree = tree("data class P");
    let modifiers = find(&tree, NodeKind::ModifierList);
    let token = tree.leaves(modifiers)[0];
    assert_eq!(tree.token_kind(token), TokenKind::DataKeyword);
    assert_eq!(tree.token_text(token), "data");
}

#[test]
fn deferred_tokens_list_doc_comments_only() {
    let tree = tree("/** one */\nfun f() {}\n/* plain */\n/** two */\nval x = 1");
    let deferred = tree.deferred_tokens();
    assert_eq!(deferred.len(), 2);
    assert!(deferred
        .iter()
        .all(|&token| tree.token_kind(token) == TokenKind::DocComment));
    assert_eq!(tree.token_text(deferred[1]), "/** two */");
}

#[test]
fn non_deferred_token_error_names_the_kind() {
    let tree = tree("val x = 1");
    let first = tree.leaves(tree.root())[0];
    match tree.parse_embedded(first) {
        Err(EmbeddedError::NotDeferred { token, kind }) => {
            assert_eq!(token, first);
            assert_eq!(kind, TokenKind::ValKeyword);
        }
        other => panic!("expected NotDeferred, got {other:?}"),
    }
}

#[test]
fn tree_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SyntaxTree>();
    assert_send_sync::<Parse>();

    let tree = tree("/** [a] */\nfun f() {}");
    let comment = tree.deferred_tokens()[0];
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tree = Arc::clone(&tree);
            std::thread::spawn(move || tree.parse_embedded(comment).expect("doc parses"))
        })
        .collect();
    let docs: Vec<Arc<Parse>> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread finishes"))
        .collect();
    assert!(docs.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}
