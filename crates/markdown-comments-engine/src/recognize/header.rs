use std::sync::OnceLock;

use regex::Regex;

use super::MarkdownElement;
use crate::text::Span;

/// Directive keywords that may follow `#` in C, C++ and C# source. Lines
/// like `#include <x>` show up inside comments routinely and must not be
/// mistaken for headers when the skip option is on.
const PREPROCESSOR_KEYWORDS: &[&str] = &[
    "define", "undef", "include", "if", "ifdef", "ifndef", "else", "elif", "endif", "line",
    "error", "pragma", "warning", "region", "endregion",
];

/// A line is a header when, past a prefix of non-word non-`#` characters
/// (comment punctuation, whitespace), it starts with 1..=6 `#` followed by
/// optional whitespace. Capturing up to 7 hashes lets the level check
/// reject over-long runs that a 6-bounded pattern would silently shorten.
fn header_line_regex() -> &'static Regex {
    static HEADER_RE: OnceLock<Regex> = OnceLock::new();
    HEADER_RE
        .get_or_init(|| Regex::new(r"^[^\w#]*((#{1,7})(\s*))").expect("invalid header regex"))
}

/// Scans `text` line by line for header elements.
///
/// The element span is the whole line (terminator excluded); the delimiter
/// span covers the hashes and the whitespace after them. With
/// `skip_preprocessor`, a single `#` immediately followed by a directive
/// keyword does not match; the keyword test is a prefix match, so `#iffy`
/// is excluded along with `#if`.
pub fn headers(text: &str, base: usize, skip_preprocessor: bool) -> Vec<MarkdownElement> {
    let mut out = Vec::new();
    for (line_start, line) in lines(text) {
        let Some(caps) = header_line_regex().captures(line) else {
            continue;
        };
        let hashes = caps.get(2).expect("hash group always captures");
        let level = hashes.len();
        if level > 6 {
            continue;
        }
        if skip_preprocessor && level == 1 && is_preprocessor_directive(&line[hashes.end()..]) {
            continue;
        }
        let delimiter = caps.get(1).expect("delimiter group always captures");
        out.push(MarkdownElement::Header {
            span: Span::new(base + line_start, base + line_start + line.len()),
            delimiter: Span::new(
                base + line_start + delimiter.start(),
                base + line_start + delimiter.end(),
            ),
            level: level as u8,
        });
    }
    out
}

fn is_preprocessor_directive(after_hash: &str) -> bool {
    PREPROCESSOR_KEYWORDS
        .iter()
        .any(|kw| after_hash.starts_with(kw))
}

/// Lines of `text` with their start offsets, terminators stripped.
fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0usize, |offset, raw| {
        let start = *offset;
        *offset += raw.len();
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let line = line.strip_suffix('\r').unwrap_or(line);
        Some((start, line))
    })
}
