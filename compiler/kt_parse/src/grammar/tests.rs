#![allow(clippy::expect_used)]

use kt_ir::NodeKind;
use pretty_assertions::assert_eq;

use crate::{parse_source, ElementKind, NodeId, Parse, SyntaxTree};

fn parse(source: &str) -> Parse {
    let parse = parse_source(source).expect("grammar keeps marker contracts");
    let leaves: String = parse
        .tree()
        .leaves(parse.tree().root())
        .into_iter()
        .map(|token| parse.tree().token_text(token))
        .collect();
    assert_eq!(leaves, source, "tree must cover every byte");
    parse
}

/// Node kinds only, two spaces per level, error messages inline.
fn outline(tree: &SyntaxTree, node: NodeId, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(tree.node_kind(node).debug_name());
    if let Some(message) = tree.error_message(node) {
        out.push_str(&format!(" {message:?}"));
    }
    out.push('\n');
    for child in tree.child_nodes(node) {
        outline(tree, child, depth + 1, out);
    }
}

/// Outline of the whole file.
fn shape(source: &str) -> String {
    let parse = parse(source);
    let mut out = String::new();
    outline(parse.tree(), parse.tree().root(), 0, &mut out);
    out
}

/// Outline of the first top-level declaration, preamble skipped.
fn decl(source: &str) -> String {
    let parse = parse(source);
    let tree = parse.tree();
    let first = tree
        .child_nodes(tree.root())
        .nth(2)
        .expect("a declaration after the preamble");
    let mut out = String::new();
    outline(tree, first, 0, &mut out);
    out
}

/// Outline of the initializer of `val x = <expression>`.
fn expr(expression: &str) -> String {
    let source = format!("val x = {expression}");
    let parse = parse(&source);
    let tree = parse.tree();
    let property = tree
        .child_nodes(tree.root())
        .nth(2)
        .expect("the property");
    let initializer = tree
        .child_nodes(property)
        .last()
        .expect("an initializer");
    let mut out = String::new();
    outline(tree, initializer, 0, &mut out);
    out
}

fn errors(source: &str) -> Vec<String> {
    parse(source)
        .diagnostics()
        .iter()
        .map(|diagnostic| diagnostic.message.clone())
        .collect()
}

// File structure

#[test]
fn package_and_imports() {
    assert_eq!(
        shape("package a.b\n\nimport c.d\nimport e.*\nimport f as g\n"),
        "FILE\n\
         \x20 PACKAGE_DIRECTIVE\n\
         \x20   DOT_QUALIFIED_EXPRESSION\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20 IMPORT_LIST\n\
         \x20   IMPORT_DIRECTIVE\n\
         \x20     DOT_QUALIFIED_EXPRESSION\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20   IMPORT_DIRECTIVE\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20   IMPORT_DIRECTIVE\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20     IMPORT_ALIAS\n"
    );
}

#[test]
fn empty_preamble_nodes_are_always_present() {
    assert_eq!(
        shape("fun main() {}"),
        "FILE\n\
         \x20 PACKAGE_DIRECTIVE\n\
         \x20 IMPORT_LIST\n\
         \x20 FUN\n\
         \x20   VALUE_PARAMETER_LIST\n\
         \x20   BLOCK\n"
    );
    assert_eq!(shape(""), "FILE\n  PACKAGE_DIRECTIVE\n  IMPORT_LIST\n");
}

#[test]
fn file_annotations_before_package() {
    assert_eq!(
        shape("@file:JvmName(\"A\")\npackage a\n"),
        "FILE\n\
         \x20 FILE_ANNOTATION_LIST\n\
         \x20   ANNOTATION_ENTRY\n\
         \x20     ANNOTATION_TARGET\n\
         \x20     CONSTRUCTOR_CALLEE\n\
         \x20       TYPE_REFERENCE\n\
         \x20         USER_TYPE\n\
         \x20           REFERENCE_EXPRESSION\n\
         \x20     VALUE_ARGUMENT_LIST\n\
         \x20       VALUE_ARGUMENT\n\
         \x20         STRING_TEMPLATE\n\
         \x20           LITERAL_STRING_TEMPLATE_ENTRY\n\
         \x20 PACKAGE_DIRECTIVE\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20 IMPORT_LIST\n"
    );
}

#[test]
fn annotation_without_package_goes_to_declaration() {
    assert_eq!(
        decl("@Deprecated fun f() {}"),
        "FUN\n\
         \x20 MODIFIER_LIST\n\
         \x20   ANNOTATION_ENTRY\n\
         \x20     CONSTRUCTOR_CALLEE\n\
         \x20       TYPE_REFERENCE\n\
         \x20         USER_TYPE\n\
         \x20           REFERENCE_EXPRESSION\n\
         \x20 VALUE_PARAMETER_LIST\n\
         \x20 BLOCK\n"
    );
}

#[test]
fn misplaced_import_is_wrapped_in_error() {
    assert_eq!(
        errors("fun f() {}\nimport a.b\n"),
        vec!["Imports are only allowed in the beginning of file"]
    );
}

#[test]
fn stray_token_at_top_level() {
    assert_eq!(errors(")"), vec!["Expecting a top level declaration"]);
}

// Classes and objects

#[test]
fn class_with_header_and_members() {
    assert_eq!(
        decl(
            "class A<T>(val x: T) : B(x), C {\n    init {}\n    constructor() : this(1)\n    fun f() = x\n}"
        ),
        "CLASS\n\
         \x20 TYPE_PARAMETER_LIST\n\
         \x20   TYPE_PARAMETER\n\
         \x20 PRIMARY_CONSTRUCTOR\n\
         \x20   VALUE_PARAMETER_LIST\n\
         \x20     VALUE_PARAMETER\n\
         \x20       TYPE_REFERENCE\n\
         \x20         USER_TYPE\n\
         \x20           REFERENCE_EXPRESSION\n\
         \x20 SUPER_TYPE_LIST\n\
         \x20   SUPER_TYPE_CALL_ENTRY\n\
         \x20     CONSTRUCTOR_CALLEE\n\
         \x20       TYPE_REFERENCE\n\
         \x20         USER_TYPE\n\
         \x20           REFERENCE_EXPRESSION\n\
         \x20     VALUE_ARGUMENT_LIST\n\
         \x20       VALUE_ARGUMENT\n\
         \x20         REFERENCE_EXPRESSION\n\
         \x20   SUPER_TYPE_ENTRY\n\
         \x20     TYPE_REFERENCE\n\
         \x20       USER_TYPE\n\
         \x20         REFERENCE_EXPRESSION\n\
         \x20 CLASS_BODY\n\
         \x20   CLASS_INITIALIZER\n\
         \x20     BLOCK\n\
         \x20   SECONDARY_CONSTRUCTOR\n\
         \x20     VALUE_PARAMETER_LIST\n\
         \x20     CONSTRUCTOR_DELEGATION_CALL\n\
         \x20       CONSTRUCTOR_DELEGATION_REFERENCE\n\
         \x20       VALUE_ARGUMENT_LIST\n\
         \x20         VALUE_ARGUMENT\n\
         \x20           INTEGER_CONSTANT\n\
         \x20   FUN\n\
         \x20     VALUE_PARAMETER_LIST\n\
         \x20     REFERENCE_EXPRESSION\n"
    );
}

#[test]
fn enum_entries_then_members() {
    assert_eq!(
        decl("enum class E { A, B { fun f() {} }; fun g() {} }"),
        "CLASS\n\
         \x20 MODIFIER_LIST\n\
         \x20 CLASS_BODY\n\
         \x20   ENUM_ENTRY\n\
         \x20   ENUM_ENTRY\n\
         \x20     CLASS_BODY\n\
         \x20       FUN\n\
         \x20         VALUE_PARAMETER_LIST\n\
         \x20         BLOCK\n\
         \x20   FUN\n\
         \x20     VALUE_PARAMETER_LIST\n\
         \x20     BLOCK\n"
    );
}

#[test]
fn enum_without_semicolon_before_members() {
    assert_eq!(
        errors("enum class E { A fun g() {} }"),
        vec!["Expecting ';' after the last enum entry or '}' to close enum class body"]
    );
}

#[test]
fn delegated_super_type() {
    assert_eq!(
        decl("class A : B by b"),
        "CLASS\n\
         \x20 SUPER_TYPE_LIST\n\
         \x20   DELEGATED_SUPER_TYPE_ENTRY\n\
         \x20     TYPE_REFERENCE\n\
         \x20       USER_TYPE\n\
         \x20         REFERENCE_EXPRESSION\n\
         \x20     REFERENCE_EXPRESSION\n"
    );
}

#[test]
fn modifiers_without_constructor_keyword() {
    assert_eq!(
        errors("class A private {}"),
        vec!["Expecting 'constructor' keyword"]
    );
}

#[test]
fn object_declarations_reject_type_parameters() {
    assert_eq!(
        errors("object O<T> {}"),
        vec!["Type parameters are not allowed for objects"]
    );
}

#[test]
fn soft_keywords_stay_names() {
    assert!(errors("val data = open(1)\nfun get(set: Int) = set").is_empty());
    assert_eq!(
        decl("data class P(val x: Int)"),
        "CLASS\n\
         \x20 MODIFIER_LIST\n\
         \x20 PRIMARY_CONSTRUCTOR\n\
         \x20   VALUE_PARAMETER_LIST\n\
         \x20     VALUE_PARAMETER\n\
         \x20       TYPE_REFERENCE\n\
         \x20         USER_TYPE\n\
         \x20           REFERENCE_EXPRESSION\n"
    );
}

// Functions and properties

#[test]
fn extension_function_with_type_parameters() {
    assert_eq!(
        decl("fun <T> List<T>.second(): T? = this[1]"),
        "FUN\n\
         \x20 TYPE_PARAMETER_LIST\n\
         \x20   TYPE_PARAMETER\n\
         \x20 TYPE_REFERENCE\n\
         \x20   USER_TYPE\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20     TYPE_ARGUMENT_LIST\n\
         \x20       TYPE_PROJECTION\n\
         \x20         TYPE_REFERENCE\n\
         \x20           USER_TYPE\n\
         \x20             REFERENCE_EXPRESSION\n\
         \x20 VALUE_PARAMETER_LIST\n\
         \x20 TYPE_REFERENCE\n\
         \x20   NULLABLE_TYPE\n\
         \x20     USER_TYPE\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20 ARRAY_ACCESS_EXPRESSION\n\
         \x20   THIS_EXPRESSION\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20   INDICES\n\
         \x20     INTEGER_CONSTANT\n"
    );
}

#[test]
fn where_clause_requires_type_parameters() {
    assert!(errors("fun <T> f() where T : A {}").is_empty());
    assert_eq!(
        errors("fun f() where T : A {}"),
        vec!["Type constraints are not allowed when no type parameters declared"]
    );
}

#[test]
fn second_type_parameter_list() {
    assert_eq!(
        errors("fun <T> f<U>() {}"),
        vec!["Only one type parameter list is allowed for a function"]
    );
}

#[test]
fn default_values_and_vararg() {
    assert_eq!(
        decl("fun f(vararg xs: Int, y: Int = 0) {}"),
        "FUN\n\
         \x20 VALUE_PARAMETER_LIST\n\
         \x20   VALUE_PARAMETER\n\
         \x20     MODIFIER_LIST\n\
         \x20     TYPE_REFERENCE\n\
         \x20       USER_TYPE\n\
         \x20         REFERENCE_EXPRESSION\n\
         \x20   VALUE_PARAMETER\n\
         \x20     TYPE_REFERENCE\n\
         \x20       USER_TYPE\n\
         \x20         REFERENCE_EXPRESSION\n\
         \x20     INTEGER_CONSTANT\n\
         \x20 BLOCK\n"
    );
}

#[test]
fn unclosed_parameter_list() {
    assert_eq!(
        errors("fun f(a: Int {}"),
        vec!["Expecting comma or ')'", "Expecting ')'"]
    );
}

#[test]
fn property_accessors() {
    assert_eq!(
        shape("var count: Int = 0\n    private set\nval size: Int\n    get() = 1\n"),
        "FILE\n\
         \x20 PACKAGE_DIRECTIVE\n\
         \x20 IMPORT_LIST\n\
         \x20 PROPERTY\n\
         \x20   TYPE_REFERENCE\n\
         \x20     USER_TYPE\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20   INTEGER_CONSTANT\n\
         \x20   PROPERTY_ACCESSOR\n\
         \x20     MODIFIER_LIST\n\
         \x20 PROPERTY\n\
         \x20   TYPE_REFERENCE\n\
         \x20     USER_TYPE\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20   PROPERTY_ACCESSOR\n\
         \x20     INTEGER_CONSTANT\n"
    );
}

#[test]
fn setter_parameter() {
    assert_eq!(
        decl("var v = 1\n    set(value) { field = value }"),
        "PROPERTY\n\
         \x20 INTEGER_CONSTANT\n\
         \x20 PROPERTY_ACCESSOR\n\
         \x20   VALUE_PARAMETER_LIST\n\
         \x20     VALUE_PARAMETER\n\
         \x20   BLOCK\n\
         \x20     BINARY_EXPRESSION\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20       OPERATION_REFERENCE\n\
         \x20       REFERENCE_EXPRESSION\n"
    );
}

#[test]
fn delegated_property() {
    assert_eq!(
        decl("val v by lazy { 1 }"),
        "PROPERTY\n\
         \x20 PROPERTY_DELEGATE\n\
         \x20   CALL_EXPRESSION\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20     LAMBDA_ARGUMENT\n\
         \x20       LAMBDA_EXPRESSION\n\
         \x20         FUNCTION_LITERAL\n\
         \x20           BLOCK\n\
         \x20             INTEGER_CONSTANT\n"
    );
}

#[test]
fn missing_property_name() {
    assert_eq!(
        errors("val = 1"),
        vec!["Expecting property name or receiver type"]
    );
}

#[test]
fn destructuring_only_in_blocks() {
    assert_eq!(
        errors("val (a, b) = p"),
        vec!["Destructuring declarations are only allowed for local variables/values"]
    );
    assert!(errors("fun f() { val (a, b: Int) = p }").is_empty());
}

#[test]
fn type_alias() {
    assert_eq!(
        decl("typealias F<T> = (T) -> Unit"),
        "TYPEALIAS\n\
         \x20 TYPE_PARAMETER_LIST\n\
         \x20   TYPE_PARAMETER\n\
         \x20 TYPE_REFERENCE\n\
         \x20   FUNCTION_TYPE\n\
         \x20     VALUE_PARAMETER_LIST\n\
         \x20       VALUE_PARAMETER\n\
         \x20         TYPE_REFERENCE\n\
         \x20           USER_TYPE\n\
         \x20             REFERENCE_EXPRESSION\n\
         \x20     TYPE_REFERENCE\n\
         \x20       USER_TYPE\n\
         \x20         REFERENCE_EXPRESSION\n"
    );
}

// Types

#[test]
fn function_type_with_receiver() {
    assert_eq!(
        decl("val f: String.(Int) -> Unit = g"),
        "PROPERTY\n\
         \x20 TYPE_REFERENCE\n\
         \x20   FUNCTION_TYPE\n\
         \x20     FUNCTION_TYPE_RECEIVER\n\
         \x20       TYPE_REFERENCE\n\
         \x20         USER_TYPE\n\
         \x20           REFERENCE_EXPRESSION\n\
         \x20     VALUE_PARAMETER_LIST\n\
         \x20       VALUE_PARAMETER\n\
         \x20         TYPE_REFERENCE\n\
         \x20           USER_TYPE\n\
         \x20             REFERENCE_EXPRESSION\n\
         \x20     TYPE_REFERENCE\n\
         \x20       USER_TYPE\n\
         \x20         REFERENCE_EXPRESSION\n\
         \x20 REFERENCE_EXPRESSION\n"
    );
}

#[test]
fn qualified_and_projected_types() {
    assert_eq!(
        decl("val m: a.Map<in K, *>? = null"),
        "PROPERTY\n\
         \x20 TYPE_REFERENCE\n\
         \x20   NULLABLE_TYPE\n\
         \x20     USER_TYPE\n\
         \x20       USER_TYPE\n\
         \x20         REFERENCE_EXPRESSION\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20       TYPE_ARGUMENT_LIST\n\
         \x20         TYPE_PROJECTION\n\
         \x20           MODIFIER_LIST\n\
         \x20           TYPE_REFERENCE\n\
         \x20             USER_TYPE\n\
         \x20               REFERENCE_EXPRESSION\n\
         \x20         TYPE_PROJECTION\n\
         \x20 NULL\n"
    );
}

#[test]
fn parenthesized_type_is_not_a_function_type() {
    assert_eq!(
        decl("val p: (Int)? = null"),
        "PROPERTY\n\
         \x20 TYPE_REFERENCE\n\
         \x20   NULLABLE_TYPE\n\
         \x20     USER_TYPE\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20 NULL\n"
    );
}

#[test]
fn dynamic_type() {
    assert_eq!(
        decl("val d: dynamic = 1"),
        "PROPERTY\n\
         \x20 TYPE_REFERENCE\n\
         \x20   DYNAMIC_TYPE\n\
         \x20 INTEGER_CONSTANT\n"
    );
}

#[test]
fn missing_type() {
    assert_eq!(errors("val v: = 1"), vec!["Type expected"]);
}

// Expressions

#[test]
fn binary_precedence() {
    assert_eq!(
        expr("a + b * c ?: d == e && f"),
        "BINARY_EXPRESSION\n\
         \x20 BINARY_EXPRESSION\n\
         \x20   BINARY_EXPRESSION\n\
         \x20     BINARY_EXPRESSION\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20       OPERATION_REFERENCE\n\
         \x20       BINARY_EXPRESSION\n\
         \x20         REFERENCE_EXPRESSION\n\
         \x20         OPERATION_REFERENCE\n\
         \x20         REFERENCE_EXPRESSION\n\
         \x20     OPERATION_REFERENCE\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20   OPERATION_REFERENCE\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20 OPERATION_REFERENCE\n\
         \x20 REFERENCE_EXPRESSION\n"
    );
}

#[test]
fn infix_call_sits_between_range_and_elvis() {
    assert_eq!(
        expr("0..n step 2"),
        "BINARY_EXPRESSION\n\
         \x20 BINARY_EXPRESSION\n\
         \x20   INTEGER_CONSTANT\n\
         \x20   OPERATION_REFERENCE\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20 OPERATION_REFERENCE\n\
         \x20 INTEGER_CONSTANT\n"
    );
}

#[test]
fn type_operators() {
    assert_eq!(
        expr("a as? B is C"),
        "IS_EXPRESSION\n\
         \x20 BINARY_WITH_TYPE\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20   OPERATION_REFERENCE\n\
         \x20   TYPE_REFERENCE\n\
         \x20     USER_TYPE\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20 OPERATION_REFERENCE\n\
         \x20 TYPE_REFERENCE\n\
         \x20   USER_TYPE\n\
         \x20     REFERENCE_EXPRESSION\n"
    );
}

#[test]
fn prefix_and_postfix() {
    assert_eq!(
        expr("!a!!"),
        "PREFIX_EXPRESSION\n\
         \x20 OPERATION_REFERENCE\n\
         \x20 POSTFIX_EXPRESSION\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20   OPERATION_REFERENCE\n"
    );
}

#[test]
fn newline_ends_expression_unless_operator_continues() {
    assert_eq!(
        shape("val a = b\n+ c"),
        "FILE\n\
         \x20 PACKAGE_DIRECTIVE\n\
         \x20 IMPORT_LIST\n\
         \x20 PROPERTY\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20 ERROR_ELEMENT \"Expecting a top level declaration\"\n\
         \x20 ERROR_ELEMENT \"Expecting a top level declaration\"\n"
    );
    assert_eq!(
        expr("b\n    ?.c\n    ?: d"),
        "BINARY_EXPRESSION\n\
         \x20 SAFE_ACCESS_EXPRESSION\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20 OPERATION_REFERENCE\n\
         \x20 REFERENCE_EXPRESSION\n"
    );
}

#[test]
fn call_chain_with_trailing_lambda() {
    assert_eq!(
        expr("list.map { it * 2 }.filter(::p)"),
        "DOT_QUALIFIED_EXPRESSION\n\
         \x20 DOT_QUALIFIED_EXPRESSION\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20   CALL_EXPRESSION\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20     LAMBDA_ARGUMENT\n\
         \x20       LAMBDA_EXPRESSION\n\
         \x20         FUNCTION_LITERAL\n\
         \x20           BLOCK\n\
         \x20             BINARY_EXPRESSION\n\
         \x20               REFERENCE_EXPRESSION\n\
         \x20               OPERATION_REFERENCE\n\
         \x20               INTEGER_CONSTANT\n\
         \x20 CALL_EXPRESSION\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20   VALUE_ARGUMENT_LIST\n\
         \x20     VALUE_ARGUMENT\n\
         \x20       CALLABLE_REFERENCE_EXPRESSION\n\
         \x20         REFERENCE_EXPRESSION\n"
    );
}

#[test]
fn named_and_spread_arguments() {
    assert_eq!(
        expr("f(a = 1, *xs)"),
        "CALL_EXPRESSION\n\
         \x20 REFERENCE_EXPRESSION\n\
         \x20 VALUE_ARGUMENT_LIST\n\
         \x20   VALUE_ARGUMENT\n\
         \x20     VALUE_ARGUMENT_NAME\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20     INTEGER_CONSTANT\n\
         \x20   VALUE_ARGUMENT\n\
         \x20     REFERENCE_EXPRESSION\n"
    );
}

#[test]
fn type_arguments_only_before_call_suffix() {
    assert_eq!(
        expr("f<Int>(1)"),
        "CALL_EXPRESSION\n\
         \x20 REFERENCE_EXPRESSION\n\
         \x20 TYPE_ARGUMENT_LIST\n\
         \x20   TYPE_PROJECTION\n\
         \x20     TYPE_REFERENCE\n\
         \x20       USER_TYPE\n\
         \x20         REFERENCE_EXPRESSION\n\
         \x20 VALUE_ARGUMENT_LIST\n\
         \x20   VALUE_ARGUMENT\n\
         \x20     INTEGER_CONSTANT\n"
    );
    assert_eq!(
        expr("a < b"),
        "BINARY_EXPRESSION\n\
         \x20 REFERENCE_EXPRESSION\n\
         \x20 OPERATION_REFERENCE\n\
         \x20 REFERENCE_EXPRESSION\n"
    );
}

#[test]
fn lambda_parameters() {
    assert_eq!(
        expr("{ a: Int, b -> a + b }"),
        "LAMBDA_EXPRESSION\n\
         \x20 FUNCTION_LITERAL\n\
         \x20   VALUE_PARAMETER_LIST\n\
         \x20     VALUE_PARAMETER\n\
         \x20       TYPE_REFERENCE\n\
         \x20         USER_TYPE\n\
         \x20           REFERENCE_EXPRESSION\n\
         \x20     VALUE_PARAMETER\n\
         \x20   BLOCK\n\
         \x20     BINARY_EXPRESSION\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20       OPERATION_REFERENCE\n\
         \x20       REFERENCE_EXPRESSION\n"
    );
    assert_eq!(
        expr("{ it }"),
        "LAMBDA_EXPRESSION\n\
         \x20 FUNCTION_LITERAL\n\
         \x20   BLOCK\n\
         \x20     REFERENCE_EXPRESSION\n"
    );
}

#[test]
fn lambda_with_typed_parameter_needs_arrow() {
    assert_eq!(errors("val f = { a: Int }"), vec!["An -> is expected"]);
}

#[test]
fn labels() {
    assert_eq!(
        expr("run outer@{ return@outer 1 }"),
        "CALL_EXPRESSION\n\
         \x20 REFERENCE_EXPRESSION\n\
         \x20 LAMBDA_ARGUMENT\n\
         \x20   LABELED_EXPRESSION\n\
         \x20     LABEL_QUALIFIER\n\
         \x20       LABEL\n\
         \x20     LAMBDA_EXPRESSION\n\
         \x20       FUNCTION_LITERAL\n\
         \x20         BLOCK\n\
         \x20           RETURN\n\
         \x20             LABEL_QUALIFIER\n\
         \x20               LABEL\n\
         \x20             INTEGER_CONSTANT\n"
    );
}

#[test]
fn string_template_entries() {
    assert_eq!(
        expr(r#""a $b ${c + 1}\n""#),
        "STRING_TEMPLATE\n\
         \x20 LITERAL_STRING_TEMPLATE_ENTRY\n\
         \x20 SHORT_STRING_TEMPLATE_ENTRY\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20 LITERAL_STRING_TEMPLATE_ENTRY\n\
         \x20 LONG_STRING_TEMPLATE_ENTRY\n\
         \x20   BINARY_EXPRESSION\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20     OPERATION_REFERENCE\n\
         \x20     INTEGER_CONSTANT\n\
         \x20 ESCAPE_STRING_TEMPLATE_ENTRY\n"
    );
}

#[test]
fn unterminated_string() {
    assert_eq!(errors("val s = \"abc\n"), vec!["Expecting '\"'"]);
}

#[test]
fn object_literal_and_class_literal() {
    assert_eq!(
        expr("object : A {}"),
        "OBJECT_LITERAL\n\
         \x20 OBJECT_DECLARATION\n\
         \x20   SUPER_TYPE_LIST\n\
         \x20     SUPER_TYPE_ENTRY\n\
         \x20       TYPE_REFERENCE\n\
         \x20         USER_TYPE\n\
         \x20           REFERENCE_EXPRESSION\n\
         \x20   CLASS_BODY\n"
    );
    assert_eq!(
        expr("A::class"),
        "CLASS_LITERAL_EXPRESSION\n\
         \x20 REFERENCE_EXPRESSION\n"
    );
}

// Control structures

#[test]
fn if_else_as_expression() {
    assert_eq!(
        expr("if (a) 1 else 2"),
        "IF\n\
         \x20 CONDITION\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20 THEN\n\
         \x20   INTEGER_CONSTANT\n\
         \x20 ELSE\n\
         \x20   INTEGER_CONSTANT\n"
    );
}

#[test]
fn if_without_else_branch_body() {
    assert_eq!(errors("val x = if (a) 1 else"), vec!["Expecting an expression"]);
}

#[test]
fn when_with_subject_and_conditions() {
    assert_eq!(
        expr("when (val y = f()) {\n    1, 2 -> a\n    in r -> b\n    is T -> c\n    else -> d\n}"),
        "WHEN\n\
         \x20 PROPERTY\n\
         \x20   CALL_EXPRESSION\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20     VALUE_ARGUMENT_LIST\n\
         \x20 WHEN_ENTRY\n\
         \x20   WHEN_CONDITION_EXPRESSION\n\
         \x20     INTEGER_CONSTANT\n\
         \x20   WHEN_CONDITION_EXPRESSION\n\
         \x20     INTEGER_CONSTANT\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20 WHEN_ENTRY\n\
         \x20   WHEN_CONDITION_IN_RANGE\n\
         \x20     OPERATION_REFERENCE\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20 WHEN_ENTRY\n\
         \x20   WHEN_CONDITION_IS_PATTERN\n\
         \x20     TYPE_REFERENCE\n\
         \x20       USER_TYPE\n\
         \x20         REFERENCE_EXPRESSION\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20 WHEN_ENTRY\n\
         \x20   REFERENCE_EXPRESSION\n"
    );
}

#[test]
fn when_else_without_arrow() {
    assert_eq!(
        errors("val x = when { else 1 }"),
        vec!["Expecting '->'"]
    );
}

#[test]
fn try_catch_finally() {
    assert_eq!(
        expr("try { a } catch (e: E) { b } finally { c }"),
        "TRY\n\
         \x20 BLOCK\n\
         \x20   REFERENCE_EXPRESSION\n\
         \x20 CATCH\n\
         \x20   VALUE_PARAMETER_LIST\n\
         \x20     VALUE_PARAMETER\n\
         \x20       TYPE_REFERENCE\n\
         \x20         USER_TYPE\n\
         \x20           REFERENCE_EXPRESSION\n\
         \x20   BLOCK\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20 FINALLY\n\
         \x20   BLOCK\n\
         \x20     REFERENCE_EXPRESSION\n"
    );
    assert_eq!(
        errors("val x = try { a }"),
        vec!["Expecting 'catch' or 'finally'"]
    );
}

#[test]
fn loops() {
    assert_eq!(
        decl("fun f() {\n    for ((k, v) in m) g(k)\n    while (a) {}\n    do { } while (b)\n}"),
        "FUN\n\
         \x20 VALUE_PARAMETER_LIST\n\
         \x20 BLOCK\n\
         \x20   FOR\n\
         \x20     VALUE_PARAMETER\n\
         \x20       DESTRUCTURING_DECLARATION\n\
         \x20         DESTRUCTURING_DECLARATION_ENTRY\n\
         \x20         DESTRUCTURING_DECLARATION_ENTRY\n\
         \x20     LOOP_RANGE\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20     BODY\n\
         \x20       CALL_EXPRESSION\n\
         \x20         REFERENCE_EXPRESSION\n\
         \x20         VALUE_ARGUMENT_LIST\n\
         \x20           VALUE_ARGUMENT\n\
         \x20             REFERENCE_EXPRESSION\n\
         \x20   WHILE\n\
         \x20     CONDITION\n\
         \x20       REFERENCE_EXPRESSION\n\
         \x20     BODY\n\
         \x20       BLOCK\n\
         \x20   DO_WHILE\n\
         \x20     BODY\n\
         \x20       BLOCK\n\
         \x20     CONDITION\n\
         \x20       REFERENCE_EXPRESSION\n"
    );
}

#[test]
fn for_without_in() {
    assert_eq!(errors("fun f() { for (x) {} }"), vec!["Expecting 'in'"]);
}

// Statements and recovery

#[test]
fn statements_on_one_line_need_semicolons() {
    assert!(errors("fun f() { a; b }").is_empty());
    assert_eq!(
        errors("fun f() { a 1 }"),
        vec!["Unexpected tokens (use ';' to separate expressions on the same line)"]
    );
}

#[test]
fn stray_token_on_its_own_line_is_swallowed() {
    assert_eq!(errors("fun f() {\n    #\n}"), vec!["Expecting an element"]);
    assert_eq!(errors("fun f() {\n    a\n    #\n    b\n}"), vec!["Expecting an element"]);
    assert_eq!(errors("class A {\n#\n}"), vec!["Expecting member declaration"]);
    assert!(!errors("fun{\n#").is_empty());
}

#[test]
fn local_declarations_in_blocks() {
    assert_eq!(
        decl("fun f() {\n    val a = 1\n    fun g() {}\n    class C\n}"),
        "FUN\n\
         \x20 VALUE_PARAMETER_LIST\n\
         \x20 BLOCK\n\
         \x20   PROPERTY\n\
         \x20     INTEGER_CONSTANT\n\
         \x20   FUN\n\
         \x20     VALUE_PARAMETER_LIST\n\
         \x20     BLOCK\n\
         \x20   CLASS\n"
    );
}

#[test]
fn modifier_like_call_in_block_is_an_expression() {
    assert_eq!(
        decl("fun f() { open(1) }"),
        "FUN\n\
         \x20 VALUE_PARAMETER_LIST\n\
         \x20 BLOCK\n\
         \x20   CALL_EXPRESSION\n\
         \x20     REFERENCE_EXPRESSION\n\
         \x20     VALUE_ARGUMENT_LIST\n\
         \x20       VALUE_ARGUMENT\n\
         \x20         INTEGER_CONSTANT\n"
    );
}

#[test]
fn missing_closing_brace_of_class() {
    assert_eq!(errors("class A {\n    fun f() {}\n"), vec!["Missing '}'"]);
}

#[test]
fn recovery_continues_with_next_member() {
    let parse = parse("class A {\n    val = 1\n    fun ok() {}\n}");
    assert_eq!(parse.diagnostics().len(), 1);
    let tree = parse.tree();
    let funs = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|&node| tree.node_kind(node) == NodeKind::Fun)
        .count();
    assert_eq!(funs, 1);
}

#[test]
fn deep_nesting_is_reported_not_overflowed() {
    let source = format!("val x = {}1{}", "(".repeat(2000), ")".repeat(2000));
    let parse = parse(&source);
    assert!(parse
        .diagnostics()
        .iter()
        .any(|diagnostic| diagnostic.message == "Expression is nested too deeply"));
}

#[test]
fn doc_comment_attaches_to_declaration() {
    for (source, expected) in [
        ("/** Doc. */\nfun f() {}", "/** Doc. */\nfun f() {}"),
        ("// license\n\n/** Doc. */\nfun f() {}", "/** Doc. */\nfun f() {}"),
        ("package a\n/** Doc. */\nfun f() {}", "/** Doc. */\nfun f() {}"),
        ("package a\nimport b.c\n\n/** Doc. */\nfun f() {}", "/** Doc. */\nfun f() {}"),
        ("val x = 1\n/** Doc. */\nfun f() {}", "/** Doc. */\nfun f() {}"),
    ] {
        let parse = parse(source);
        let tree = parse.tree();
        let fun = tree
            .child_nodes(tree.root())
            .find(|&node| tree.node_kind(node) == NodeKind::Fun)
            .expect("the function");
        assert_eq!(tree.node_text(fun), expected, "{source:?}");
    }
}

#[test]
fn empty_preamble_stays_in_front_of_leading_comments() {
    let parse = parse("/** Doc. */\nclass A");
    let tree = parse.tree();
    let kinds: Vec<_> = tree
        .children(tree.root())
        .iter()
        .map(|&element| tree.kind(element))
        .collect();
    assert_eq!(
        kinds,
        [
            ElementKind::Node(NodeKind::PackageDirective),
            ElementKind::Node(NodeKind::ImportList),
            ElementKind::Node(NodeKind::Class),
        ]
    );
    let package = tree.child_nodes(tree.root()).next().expect("package directive");
    assert_eq!(tree.node_span(package), kt_ir::Span::point(0));
}
