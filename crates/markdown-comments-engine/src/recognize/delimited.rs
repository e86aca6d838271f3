//! Delimiter-balanced inline spans: emphasis, strong emphasis and
//! strikethrough.
//!
//! The matching rules carry look-around constraints (an opener run must not
//! be preceded by a word character or the same delimiter, a closer run must
//! not be followed by one, and the content may not contain the delimiter),
//! which a regex cannot express here, so this is a hand cursor scan.

use super::MarkdownElement;
use crate::text::Span;

/// `*text*` / `_text_`.
pub fn emphasis(text: &str, base: usize) -> Vec<MarkdownElement> {
    scan(text, base, &[b'*', b'_'], 1)
        .into_iter()
        .map(|m| MarkdownElement::Emphasis {
            span: m.span,
            start_delim: m.start_delim,
            end_delim: m.end_delim,
        })
        .collect()
}

/// `**text**` / `__text__`.
pub fn strong_emphasis(text: &str, base: usize) -> Vec<MarkdownElement> {
    scan(text, base, &[b'*', b'_'], 2)
        .into_iter()
        .map(|m| MarkdownElement::StrongEmphasis {
            span: m.span,
            start_delim: m.start_delim,
            end_delim: m.end_delim,
        })
        .collect()
}

/// `~~text~~`, tildes exactly doubled.
pub fn strikethrough(text: &str, base: usize) -> Vec<MarkdownElement> {
    scan(text, base, &[b'~'], 2)
        .into_iter()
        .map(|m| MarkdownElement::Strikethrough {
            span: m.span,
            start_delim: m.start_delim,
            end_delim: m.end_delim,
        })
        .collect()
}

struct DelimitedMatch {
    span: Span,
    start_delim: Span,
    end_delim: Span,
}

/// Leftmost, non-overlapping scan for `run` repeated delimiter characters
/// around minimal non-empty content.
///
/// Flanking rules, applied per opener candidate:
/// - the character before the opener run must not be a word character or
///   the delimiter itself (rejects `snake_case` and mid-run starts);
/// - the content is the minimal non-empty stretch free of the delimiter
///   and of line breaks;
/// - a partial delimiter run inside the content fails the candidate (so
///   `**a*b**` is not strong emphasis);
/// - the character after the closer run must not be a word character or
///   the delimiter itself.
///
/// On success scanning resumes after the closer; on failure, one position
/// later. Delimiters are ASCII, so a byte at a delimiter value is always a
/// character boundary.
fn scan(text: &str, base: usize, delims: &[u8], run: usize) -> Vec<DelimitedMatch> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let d = bytes[i];
        if !delims.contains(&d) || !run_at(bytes, i, d, run) {
            i += 1;
            continue;
        }
        if let Some(prev) = text[..i].chars().next_back() {
            if is_word(prev) || prev == d as char {
                i += 1;
                continue;
            }
        }
        match find_closer(text, i + run, d, run) {
            Some(closer) => {
                out.push(DelimitedMatch {
                    span: Span::new(base + i, base + closer + run),
                    start_delim: Span::new(base + i, base + i + run),
                    end_delim: Span::new(base + closer, base + closer + run),
                });
                i = closer + run;
            }
            None => i += 1,
        }
    }
    out
}

/// Position of a valid closer run for the opener ending at `content_start`,
/// or `None` when the candidate fails.
fn find_closer(text: &str, content_start: usize, d: u8, run: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut j = content_start;
    while j < bytes.len() {
        let b = bytes[j];
        if b == d {
            if j == content_start {
                return None; // empty content
            }
            if !run_at(bytes, j, d, run) {
                return None; // stray delimiter inside the content
            }
            return match text[j + run..].chars().next() {
                Some(next) if is_word(next) || next == d as char => None,
                _ => Some(j),
            };
        }
        if b == b'\n' || b == b'\r' {
            return None;
        }
        j += 1;
    }
    None
}

fn run_at(bytes: &[u8], i: usize, d: u8, run: usize) -> bool {
    i + run <= bytes.len() && bytes[i..i + run].iter().all(|&b| b == d)
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
