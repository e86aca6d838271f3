//! Suppression of replacing tags while the user edits a comment.
//!
//! Adornments swap Markdown syntax out of the view, which fights the user
//! the moment they try to edit it. While the caret's line touches a comment
//! region, that region renders raw. Classification tags stay up since they
//! never move text around.

use crate::text::{Span, TextBuffer};

/// A caret or selection, in buffer offsets at the buffer's current version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// The fixed end of the selection.
    pub anchor: usize,
    /// The moving end; the caret position when the selection is empty.
    pub active: usize,
}

impl Selection {
    pub fn caret(pos: usize) -> Self {
        Self {
            anchor: pos,
            active: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }
}

/// Whether adornment and error tags in `region` should be withheld for this
/// selection.
///
/// An empty selection suppresses every region overlapping the caret's line
/// (terminator included, so a caret just past a trailing comment still
/// suppresses it). A non-empty selection suppresses only the region
/// containing its anchor, so sweeping a selection across a comment does not
/// flicker every region it passes.
pub fn should_suppress(region: Span, selection: Selection, buffer: &TextBuffer) -> bool {
    if selection.is_empty() {
        let caret = selection.active.min(buffer.len());
        region.overlaps(buffer.line_extent(caret))
    } else {
        region.contains(selection.anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // Line 0: 0..10, line 1: 10..21, line 2: 21..26.
    const TEXT: &str = "fn main()\n// *hello*\n// hi";

    fn buffer() -> TextBuffer {
        TextBuffer::from_str(TEXT)
    }

    #[rstest]
    #[case(10, true)] // caret at comment start
    #[case(15, true)] // caret inside the comment
    #[case(20, true)] // caret on the line terminator
    #[case(3, false)] // caret on the code line above
    #[case(23, false)] // caret on the next line
    fn caret_suppresses_regions_on_its_line(#[case] caret: usize, #[case] suppressed: bool) {
        let region = Span::new(13, 20); // "*hello*"
        assert_eq!(
            should_suppress(region, Selection::caret(caret), &buffer()),
            suppressed
        );
    }

    #[test]
    fn caret_past_the_end_is_clamped() {
        let region = Span::new(21, 26);
        assert!(should_suppress(region, Selection::caret(999), &buffer()));
    }

    #[test]
    fn selection_suppresses_only_the_anchor_region() {
        let region = Span::new(13, 20);
        // Anchor inside the region, active end far away.
        let sel = Selection {
            anchor: 15,
            active: 2,
        };
        assert!(should_suppress(region, sel, &buffer()));
        // Anchor outside, even with the active end inside.
        let sel = Selection {
            anchor: 2,
            active: 15,
        };
        assert!(!should_suppress(region, sel, &buffer()));
    }
}
