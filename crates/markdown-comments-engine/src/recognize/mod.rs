//! Inline Markdown recognition over one comment region's text.
//!
//! Each element kind is scanned independently over the whole region, so the
//! same characters may be reported by several kinds (a header line can also
//! contain emphasis); the projector decides what to do with overlaps.
//! Within one kind, matches are leftmost and non-overlapping. Recognition
//! is pure and total: malformed or unterminated syntax never errors, it
//! simply yields fewer elements.

pub mod delimited;
pub mod header;
pub mod image;

use crate::text::Span;

/// A recognized inline Markdown element with byte spans into the buffer.
///
/// All sub-spans lie within `span`. Delimiter spans are reported separately
/// from content so the projector can hide them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownElement {
    /// An ATX-style header line, `# ...` through `###### ...`.
    Header {
        /// Whole line, excluding the terminator.
        span: Span,
        /// The `#` run plus the whitespace that follows it.
        delimiter: Span,
        /// Number of leading `#`, 1..=6.
        level: u8,
    },
    /// `*text*` or `_text_`.
    Emphasis {
        span: Span,
        start_delim: Span,
        end_delim: Span,
    },
    /// `**text**` or `__text__`.
    StrongEmphasis {
        span: Span,
        start_delim: Span,
        end_delim: Span,
    },
    /// `~~text~~` (tildes exactly doubled).
    Strikethrough {
        span: Span,
        start_delim: Span,
        end_delim: Span,
    },
    /// `![alt](uri "title")`, title optional.
    Image {
        span: Span,
        alt: Span,
        uri: Span,
        /// Empty span at the URI's end when no title is present.
        title: Span,
    },
}

impl MarkdownElement {
    /// The full matched span of the element.
    pub fn span(&self) -> Span {
        match *self {
            MarkdownElement::Header { span, .. }
            | MarkdownElement::Emphasis { span, .. }
            | MarkdownElement::StrongEmphasis { span, .. }
            | MarkdownElement::Strikethrough { span, .. }
            | MarkdownElement::Image { span, .. } => span,
        }
    }
}

/// Recognizer knobs that affect matching itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognizerOptions {
    /// Exclude C-family preprocessor directives (`#include`, `#pragma`, …)
    /// from header matching.
    pub skip_preprocessor: bool,
}

impl Default for RecognizerOptions {
    fn default() -> Self {
        Self {
            skip_preprocessor: true,
        }
    }
}

/// All elements of every kind in one region, kind by kind.
///
/// `base` is the region's start offset in the buffer; spans are absolute.
/// Ordering within a kind is left-to-right; across kinds it is scan order,
/// which consumers must not rely on.
pub fn elements(
    text: &str,
    base: usize,
    options: RecognizerOptions,
) -> impl Iterator<Item = MarkdownElement> + '_ {
    image::images(text, base)
        .into_iter()
        .chain(header::headers(text, base, options.skip_preprocessor))
        .chain(delimited::emphasis(text, base))
        .chain(delimited::strong_emphasis(text, base))
        .chain(delimited::strikethrough(text, base))
}
