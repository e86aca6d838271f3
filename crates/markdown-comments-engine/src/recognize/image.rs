//! Inline image recognition, `![alt](uri "title")`.

use std::sync::OnceLock;

use regex::Regex;

use super::MarkdownElement;
use crate::text::Span;

/// Alt text may be empty but may not contain brackets or line breaks; the
/// URI runs to the first whitespace or `)`; the quoted title is optional.
fn image_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"!\[([^\[\]\r\n]*)\]\(([^\s)]+)(?:\s+"([^"()\r\n]*)")?\)"#)
            .expect("invalid image regex")
    })
}

/// All inline images in `text`, leftmost and non-overlapping.
///
/// When the title is absent, its span is empty and sits at the URI's end,
/// so an edit there grows into a future title.
pub fn images(text: &str, base: usize) -> Vec<MarkdownElement> {
    image_regex()
        .captures_iter(text)
        .map(|caps| {
            let whole = caps.get(0).expect("whole match always captures");
            let alt = caps.get(1).expect("alt group always captures");
            let uri = caps.get(2).expect("uri group always captures");
            let title = match caps.get(3) {
                Some(m) => Span::new(base + m.start(), base + m.end()),
                None => Span::new(base + uri.end(), base + uri.end()),
            };
            MarkdownElement::Image {
                span: Span::new(base + whole.start(), base + whole.end()),
                alt: Span::new(base + alt.start(), base + alt.end()),
                uri: Span::new(base + uri.start(), base + uri.end()),
                title,
            }
        })
        .collect()
}
