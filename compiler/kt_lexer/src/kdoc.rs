//! Tokenizer for documentation comments and the links inside them.
//!
//! Doc comments reach the parser as one opaque token. When their structure
//! is requested, the comment text is re-tokenized here into leading
//! asterisks, tag names, markdown links, code-block lines and free text.
//! Offsets stay absolute, so spans still point into the original file.

use kt_ir::{Span, Token, TokenKind, TokenList};

use crate::{offset, push_tokens};

/// Tags whose first word names a subject (a parameter, an exception type...).
const SUBJECT_TAGS: &[&str] = &[
    "@param",
    "@property",
    "@throws",
    "@exception",
    "@see",
    "@sample",
];

/// Tokenize a whole doc comment (`/** ... */`) starting at offset `base`.
pub fn lex_kdoc(text: &str, base: u32) -> TokenList {
    let mut scanner = KdocScanner::new(text, base);
    scanner.run();
    let mut list = TokenList::with_base(text, base);
    for token in scanner.out {
        list.push(token);
    }
    list.push(Token::new(TokenKind::Eof, Span::point(list.end_offset())));
    list
}

/// Tokenize the text of a markdown link, with or without its brackets.
pub fn lex_kdoc_link(text: &str, base: u32) -> TokenList {
    let mut out = Vec::new();
    let inner_start = usize::from(text.starts_with('['));
    let inner_end = if inner_start == 1 && text.len() > 1 && text.ends_with(']') {
        text.len() - 1
    } else {
        text.len()
    };
    if inner_start == 1 {
        out.push(Token::new(TokenKind::LBracket, Span::new(base, offset(1, base))));
    }
    push_tokens(&text[inner_start..inner_end], offset(inner_start, base), &mut out);
    if inner_end < text.len() {
        out.push(Token::new(
            TokenKind::RBracket,
            Span::new(offset(inner_end, base), offset(text.len(), base)),
        ));
    }
    let mut list = TokenList::with_base(text, base);
    for token in out {
        list.push(token);
    }
    list.push(Token::new(TokenKind::Eof, Span::point(list.end_offset())));
    list
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LineState {
    /// Nothing but whitespace seen on this line.
    Start,
    AfterAsterisk,
    Content,
}

struct KdocScanner<'a> {
    text: &'a str,
    base: u32,
    pos: usize,
    end: usize,
    line: LineState,
    in_code_block: bool,
    /// The next word is the subject of a tag like `@param`.
    expect_subject: bool,
    out: Vec<Token>,
}

impl<'a> KdocScanner<'a> {
    fn new(text: &'a str, base: u32) -> Self {
        let end = if text.len() >= 5 && text.ends_with("*/") {
            text.len() - 2
        } else {
            text.len()
        };
        KdocScanner {
            text,
            base,
            pos: 0,
            end,
            line: LineState::Start,
            in_code_block: false,
            expect_subject: false,
            out: Vec::new(),
        }
    }

    fn push(&mut self, kind: TokenKind, len: usize) {
        let start = self.pos;
        self.pos += len;
        self.out.push(Token::new(
            kind,
            Span::new(offset(start, self.base), offset(self.pos, self.base)),
        ));
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..self.end]
    }

    fn run(&mut self) {
        if self.text.starts_with("/**") {
            self.push(TokenKind::KdocStart, 3.min(self.end));
        }
        while self.pos < self.end {
            self.step();
        }
        if self.end < self.text.len() {
            self.push(TokenKind::KdocEnd, self.text.len() - self.end);
        }
    }

    fn step(&mut self) {
        let rest = self.rest();
        let ws = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        if ws > 0 {
            if rest[..ws].contains('\n') {
                self.line = LineState::Start;
                self.expect_subject = false;
            }
            self.push(TokenKind::WhiteSpace, ws);
            return;
        }

        if self.line == LineState::Start && rest.starts_with('*') {
            self.line = LineState::AfterAsterisk;
            self.push(TokenKind::KdocLeadingAsterisk, 1);
            return;
        }

        let line_len = rest.find('\n').unwrap_or(rest.len());
        let line = &rest[..line_len];
        let at_line_start =
            std::mem::replace(&mut self.line, LineState::Content) != LineState::Content;

        if at_line_start && line.trim_start().starts_with("```") {
            self.in_code_block = !self.in_code_block;
            let len = trim_end_len(line);
            self.push(TokenKind::KdocText, len);
            return;
        }
        if self.in_code_block {
            let len = trim_end_len(line);
            self.push(TokenKind::KdocCodeBlockText, len);
            return;
        }

        if at_line_start && rest.starts_with('@') {
            let len = 1 + rest[1..]
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(rest.len() - 1);
            if len > 1 {
                self.expect_subject = SUBJECT_TAGS.contains(&&rest[..len]);
                self.push(TokenKind::KdocTagName, len);
                return;
            }
        }

        if std::mem::take(&mut self.expect_subject) {
            if let Some(len) = link_len(line) {
                self.push(TokenKind::KdocMarkdownLink, len);
                return;
            }
            let len = line.find(char::is_whitespace).unwrap_or(line.len());
            self.push(TokenKind::KdocMarkdownLink, len);
            return;
        }

        if rest.starts_with('[') {
            if let Some(len) = link_len(line) {
                let after = &line[len..];
                if after.starts_with('(') {
                    if let Some(close) = after.find(')') {
                        self.push(TokenKind::KdocMarkdownInlineLink, len + close + 1);
                        return;
                    }
                }
                if after.starts_with('[') {
                    if let Some(second) = link_len(after) {
                        self.push(TokenKind::KdocMarkdownInlineLink, len + second);
                        return;
                    }
                }
                self.push(TokenKind::KdocMarkdownLink, len);
                return;
            }
        }

        if rest.starts_with('\\') {
            if let Some(c) = rest[1..].chars().next() {
                if c.is_ascii_punctuation() {
                    self.push(TokenKind::KdocMarkdownEscapedChar, 2);
                    return;
                }
            }
        }

        // Free text up to the next line break, link or escape; trailing
        // blanks are left for the whitespace token.
        let first = line.chars().next().map_or(1, char::len_utf8);
        let stop = line[first..]
            .find(['[', '\\'])
            .map_or(line.len(), |i| i + first);
        let len = trim_end_len(&line[..stop]).max(1);
        let len = next_char_boundary(line, len);
        self.push(TokenKind::KdocText, len);
    }
}

/// Length of a `[...]` link at the start of `line`, if it closes on the line.
fn link_len(line: &str) -> Option<usize> {
    if !line.starts_with('[') {
        return None;
    }
    let close = line[1..].find([']', '['])?;
    (line.as_bytes()[close + 1] == b']' && close > 0).then_some(close + 2)
}

fn trim_end_len(s: &str) -> usize {
    s.trim_end().len()
}

fn next_char_boundary(s: &str, mut at: usize) -> usize {
    while at < s.len() && !s.is_char_boundary(at) {
        at += 1;
    }
    at
}
