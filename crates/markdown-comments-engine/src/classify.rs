//! Comment region aggregation over host-supplied lexical classification.
//!
//! The host's tokenizer frequently splits one logical comment into several
//! adjacent classification tokens (doc-comment delimiter vs. body, line
//! continuations). The recognizer wants one contiguous parsing unit, so
//! adjacent comment-classified tokens are merged into maximal regions here.

use crate::text::{Snapshot, Span};

/// One classified token from the host's lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSpan {
    pub span: Span,
    pub name: String,
}

impl ClassifiedSpan {
    pub fn new(span: Span, name: impl Into<String>) -> Self {
        Self {
            span,
            name: name.into(),
        }
    }
}

/// Source of lexical classification, injected by the host.
///
/// Returns the classified tokens intersecting `span`, in document order.
/// The engine only ever asks whether a token's name is a comment.
pub trait ClassificationSource {
    fn classified_spans(&self, span: Span, snapshot: &Snapshot) -> Vec<ClassifiedSpan>;
}

/// Whether a classification name is a comment (or doc-comment), including
/// dotted sub-types such as `comment.line` or `doc-comment.body`.
pub fn is_comment(name: &str) -> bool {
    for base in ["comment", "doc-comment"] {
        if let Some(rest) = name.strip_prefix(base) {
            if rest.is_empty() || rest.starts_with('.') {
                return true;
            }
        }
    }
    false
}

/// Merges comment-classified tokens into maximal contiguous regions.
///
/// A comment token starting exactly at the open region's end extends it; a
/// non-adjacent comment token yields the open region and starts a new one.
/// Non-comment tokens neither extend nor close the open region; only
/// another, non-adjacent comment token does. The open region is flushed at
/// end of input.
pub fn comment_regions<I>(tokens: I) -> CommentRegions<I::IntoIter>
where
    I: IntoIterator<Item = ClassifiedSpan>,
{
    CommentRegions {
        tokens: tokens.into_iter(),
        open: None,
        done: false,
    }
}

pub struct CommentRegions<I> {
    tokens: I,
    open: Option<Span>,
    done: bool,
}

impl<I> Iterator for CommentRegions<I>
where
    I: Iterator<Item = ClassifiedSpan>,
{
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        if self.done {
            return None;
        }
        for token in self.tokens.by_ref() {
            if !is_comment(&token.name) {
                continue;
            }
            match self.open {
                Some(open) if token.span.start == open.end => {
                    self.open = Some(Span::new(open.start, token.span.end));
                }
                Some(open) => {
                    self.open = Some(token.span);
                    return Some(open);
                }
                None => {
                    self.open = Some(token.span);
                }
            }
        }
        self.done = true;
        self.open.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn token(start: usize, end: usize, name: &str) -> ClassifiedSpan {
        ClassifiedSpan::new(Span::new(start, end), name)
    }

    fn regions(tokens: Vec<ClassifiedSpan>) -> Vec<Span> {
        comment_regions(tokens).collect()
    }

    #[rstest]
    #[case("comment", true)]
    #[case("comment.line", true)]
    #[case("doc-comment", true)]
    #[case("doc-comment.body", true)]
    #[case("commentary", false)]
    #[case("string", false)]
    #[case("keyword", false)]
    fn comment_name_matching(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_comment(name), expected);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(regions(vec![]), vec![]);
    }

    #[test]
    fn adjacent_comment_tokens_merge() {
        let out = regions(vec![token(0, 5, "comment"), token(5, 9, "comment")]);
        assert_eq!(out, vec![Span::new(0, 9)]);
    }

    #[test]
    fn non_adjacent_comment_tokens_split() {
        let out = regions(vec![
            token(0, 5, "comment"),
            token(8, 12, "keyword"),
            token(14, 20, "comment"),
        ]);
        assert_eq!(out, vec![Span::new(0, 5), Span::new(14, 20)]);
    }

    #[test]
    fn gap_alone_does_not_close_region() {
        // A non-comment token between two adjacent comment tokens is not
        // enough to close the region; only non-adjacency is.
        let out = regions(vec![
            token(0, 5, "comment"),
            token(2, 4, "keyword"),
            token(5, 9, "comment"),
        ]);
        assert_eq!(out, vec![Span::new(0, 9)]);
    }

    #[test]
    fn doc_comment_merges_with_comment() {
        let out = regions(vec![token(0, 3, "doc-comment"), token(3, 9, "comment")]);
        assert_eq!(out, vec![Span::new(0, 9)]);
    }

    #[test]
    fn trailing_region_is_flushed() {
        let out = regions(vec![token(4, 9, "keyword"), token(9, 12, "comment")]);
        assert_eq!(out, vec![Span::new(9, 12)]);
    }

    #[test]
    fn only_non_comment_tokens_yield_nothing() {
        let out = regions(vec![token(0, 5, "keyword"), token(5, 9, "string")]);
        assert_eq!(out, vec![]);
    }

    #[test]
    fn iterator_is_fused() {
        let mut it = comment_regions(vec![token(0, 5, "comment")]);
        assert_eq!(it.next(), Some(Span::new(0, 5)));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }
}
