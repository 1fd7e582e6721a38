//! Grammar for deferred regions: doc comments and the links inside them.
//!
//! Both run over token lists from `kt_lexer::lex_kdoc` and
//! `kt_lexer::lex_kdoc_link`, never over the file's own tokens.
//!
//! A doc comment splits into sections. Every comment has a first,
//! implicit section; `@constructor` and `@property` open a new one. Any
//! other tag lives in the current section and runs until the next line
//! that starts with a tag, or the end of the comment.

use kt_ir::{NodeKind as N, TokenKind as T};

use crate::Parser;

/// Tags that close the current section and open the next.
const SECTION_START_TAGS: &[&str] = &["@constructor", "@property"];

/// Entry point for a whole doc comment.
pub(crate) fn doc(p: &mut Parser<'_>) {
    let root = p.mark();
    p.consume_if(T::KdocStart);

    let mut section = Some(p.mark());
    while !p.eof() {
        if p.at(T::KdocTagName) {
            if SECTION_START_TAGS.contains(&p.text()) {
                if let Some(open) = section.take() {
                    p.done(open, N::KDocSection);
                }
                section = Some(p.mark());
            }
            parse_tag(p);
        } else if p.at(T::KdocEnd) {
            if let Some(open) = section.take() {
                p.done(open, N::KDocSection);
            }
            p.advance();
        } else {
            p.advance();
        }
    }
    if let Some(open) = section {
        p.done(open, N::KDocSection);
    }
    p.done(root, N::KDoc);
}

fn parse_tag(p: &mut Parser<'_>) {
    let tag = p.mark();
    p.advance(); // tag name
    while !p.eof() && !at_end_of_tag(p) {
        p.advance();
    }
    p.done(tag, N::KDocTag);
}

/// The comment ends, or the next line opens another tag.
fn at_end_of_tag(p: &Parser<'_>) -> bool {
    match p.current() {
        T::KdocEnd | T::KdocTagName => true,
        T::KdocLeadingAsterisk => p.lookahead(1) == T::KdocTagName,
        _ => false,
    }
}

/// Entry point for a markdown link, `[a.b.c]` or a bare tag subject.
pub(crate) fn link(p: &mut Parser<'_>) {
    let root = p.mark();
    let bracketed = p.consume_if(T::LBracket);

    if p.at(T::Identifier) {
        let mut name = p.mark();
        p.advance();
        while p.at(T::Dot) {
            let qualifier = p.done(name, N::KDocName);
            name = p.precede(qualifier);
            p.advance(); // .
            if !p.expect(T::Identifier) {
                p.error_here("Identifier expected");
                break;
            }
        }
        p.done(name, N::KDocName);
    } else {
        p.error_here("Identifier expected");
    }

    if bracketed && !p.consume_if(T::RBracket) {
        let unclosed = p.mark();
        while !p.eof() && !p.at(T::RBracket) {
            p.advance();
        }
        p.error(unclosed, "Closing bracket expected");
        p.consume_if(T::RBracket);
    }
    if !p.eof() {
        let rest = p.mark();
        while !p.eof() {
            p.advance();
        }
        p.error(rest, "Expression expected");
    }
    p.done(root, N::KDocLink);
}
