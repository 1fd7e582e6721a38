//! Splitting string literals into template pieces.
//!
//! `"a$b\n${c + 1}"` becomes:
//! `OPEN_QUOTE REGULAR_STRING_PART SHORT_TEMPLATE_ENTRY_START IDENTIFIER
//! ESCAPE_SEQUENCE LONG_TEMPLATE_ENTRY_START <tokens of c + 1>
//! LONG_TEMPLATE_ENTRY_END CLOSING_QUOTE`.

use kt_ir::{keyword_for_text, Span, Token, TokenKind};

use crate::{offset, push_tokens};

pub(crate) fn push_string(slice: &str, start: u32, raw: bool, out: &mut Vec<Token>) {
    let quote = if raw { 3 } else { 1 };
    let bytes = slice.as_bytes();
    let span = |a: usize, b: usize| Span::new(offset(a, start), offset(b, start));

    out.push(Token::new(TokenKind::OpenQuote, span(0, quote.min(slice.len()))));

    let (body_end, closed) = body_end(slice, raw);
    let mut i = quote.min(body_end);
    let mut part_start = i;

    while i < body_end {
        let piece = match bytes[i] {
            b'\\' if !raw => Some(escape_len(&slice[i..body_end])),
            b'$' if bytes.get(i + 1) == Some(&b'{') => None,
            b'$' if slice[i + 1..body_end].starts_with(is_ident_start) => Some(1),
            _ => {
                i += 1;
                continue;
            }
        };

        if part_start < i {
            out.push(Token::new(TokenKind::RegularStringPart, span(part_start, i)));
        }

        match piece {
            Some(len) if bytes[i] == b'\\' => {
                out.push(Token::new(TokenKind::EscapeSequence, span(i, i + len)));
                i += len;
            }
            Some(_) => {
                out.push(Token::new(TokenKind::ShortTemplateEntryStart, span(i, i + 1)));
                let name_len = slice[i + 1..body_end]
                    .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .unwrap_or(body_end - i - 1);
                let name = &slice[i + 1..i + 1 + name_len];
                let kind = match keyword_for_text(name) {
                    Some(TokenKind::ThisKeyword) => TokenKind::ThisKeyword,
                    _ => TokenKind::Identifier,
                };
                out.push(Token::new(kind, span(i + 1, i + 1 + name_len)));
                i += 1 + name_len;
            }
            None => {
                out.push(Token::new(TokenKind::LongTemplateEntryStart, span(i, i + 2)));
                let inner_start = i + 2;
                let close = matching_brace(&slice[inner_start..body_end]);
                let inner_end = close.map_or(body_end, |c| inner_start + c);
                push_tokens(
                    &slice[inner_start..inner_end],
                    offset(inner_start, start),
                    out,
                );
                i = inner_end;
                if close.is_some() {
                    out.push(Token::new(TokenKind::LongTemplateEntryEnd, span(i, i + 1)));
                    i += 1;
                }
            }
        }
        part_start = i;
    }

    if part_start < body_end {
        out.push(Token::new(TokenKind::RegularStringPart, span(part_start, body_end)));
    }
    if closed {
        out.push(Token::new(TokenKind::ClosingQuote, span(body_end, slice.len())));
    }
}

/// End of the string body and whether a closing quote follows it.
fn body_end(slice: &str, raw: bool) -> (usize, bool) {
    if raw {
        if slice.len() >= 6 && slice.ends_with("\"\"\"") {
            return (slice.len() - 3, true);
        }
        return (slice.len(), false);
    }
    let bytes = slice.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return (i, true),
            _ => i += 1,
        }
    }
    (slice.len(), false)
}

/// Length of the escape at the start of `text` (which begins with `\`).
fn escape_len(text: &str) -> usize {
    let mut chars = text.char_indices().skip(1);
    match chars.next() {
        Some((_, 'u')) => {
            let hex = text[2..]
                .bytes()
                .take(4)
                .take_while(u8::is_ascii_hexdigit)
                .count();
            2 + hex
        }
        Some((at, c)) => at + c.len_utf8(),
        None => 1,
    }
}

/// Offset of the `}` closing a template entry, honoring nested braces.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' if depth == 0 => return Some(i),
            b'}' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}
