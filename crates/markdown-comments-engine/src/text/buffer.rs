use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::rope::BaseMetric;
use xi_rope::{Cursor, Delta, Rope, RopeInfo};

use crate::error::EngineError;
use crate::text::span::Span;

/// Versioned text buffer backed by a rope.
///
/// The buffer is the single source of truth for document text. Every edit
/// compiles to a [`Delta`], is applied immediately, and bumps the version;
/// the deltas are retained so spans minted against an older version can be
/// re-anchored on demand (see [`crate::text::TrackingSpan`]). Nothing here
/// is ever mutated in place from a span's point of view: a span plus a
/// version is a stable fact about one immutable revision of the text.
pub struct TextBuffer {
    rope: Rope,
    version: u64,
    /// Version the first retained delta starts from.
    base_version: u64,
    /// `deltas[i]` maps version `base_version + i` to `base_version + i + 1`.
    deltas: Vec<Delta<RopeInfo>>,
}

impl TextBuffer {
    pub fn from_str(text: &str) -> Self {
        Self {
            rope: Rope::from(text),
            version: 0,
            base_version: 0,
            deltas: Vec::new(),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.rope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len() == 0
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Slices the buffer, failing fast on out-of-bounds spans rather than
    /// clamping: a bad span means the caller is holding positions from the
    /// wrong snapshot.
    pub fn slice(&self, span: Span) -> Result<String, EngineError> {
        if span.start > span.end || span.end > self.rope.len() {
            return Err(EngineError::SpanOutOfBounds {
                span,
                len: self.rope.len(),
            });
        }
        Ok(self.rope.slice_to_cow(span.start..span.end).into_owned())
    }

    /// Replaces `range` with `replacement`, bumping the version and
    /// recording the delta. Returns the changed span in the new version.
    ///
    /// The range must lie in bounds and on character boundaries; anything
    /// else means the caller is holding positions from the wrong snapshot
    /// and fails with a typed error instead of corrupting the text.
    pub fn apply_edit(
        &mut self,
        range: Range<usize>,
        replacement: &str,
    ) -> Result<Span, EngineError> {
        if range.start > range.end || range.end > self.rope.len() {
            return Err(EngineError::SpanOutOfBounds {
                span: Span {
                    start: range.start,
                    end: range.end,
                },
                len: self.rope.len(),
            });
        }
        for offset in [range.start, range.end] {
            if !Cursor::new(&self.rope, offset).is_boundary::<BaseMetric>() {
                return Err(EngineError::NotCharBoundary { offset });
            }
        }
        let mut builder = Builder::new(self.rope.len());
        builder.replace(range.clone(), Rope::from(replacement));
        let delta = builder.build();
        self.rope = delta.apply(&self.rope);
        self.version += 1;
        self.deltas.push(delta);
        Ok(Span::new(range.start, range.start + replacement.len()))
    }

    /// Immutable handle on the current revision.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rope: self.rope.clone(),
            version: self.version,
        }
    }

    /// Extent of the line containing `offset`, including its terminator.
    pub fn line_extent(&self, offset: usize) -> Span {
        let offset = offset.min(self.rope.len());
        let line = self.rope.line_of_offset(offset);
        let start = self.rope.offset_of_line(line);
        let end = self.rope.offset_of_line(line + 1);
        Span::new(start, end)
    }

    /// Errors unless `version` is the buffer's current version.
    pub fn check_current(&self, version: u64) -> Result<(), EngineError> {
        if version != self.version {
            return Err(EngineError::StaleSnapshot {
                requested: version,
                current: self.version,
            });
        }
        Ok(())
    }

    /// All deltas recorded after `version`, oldest first.
    pub(crate) fn deltas_since(
        &self,
        version: u64,
    ) -> Result<&[Delta<RopeInfo>], EngineError> {
        if version > self.version || version < self.base_version {
            return Err(EngineError::UnknownVersion {
                requested: version,
                oldest: self.base_version,
                current: self.version,
            });
        }
        Ok(&self.deltas[(version - self.base_version) as usize..])
    }
}

/// Cheap immutable view of one buffer revision (rope clones share storage).
#[derive(Clone)]
pub struct Snapshot {
    rope: Rope,
    version: u64,
}

impl Snapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.rope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len() == 0
    }

    pub fn slice(&self, span: Span) -> Result<String, EngineError> {
        if span.start > span.end || span.end > self.rope.len() {
            return Err(EngineError::SpanOutOfBounds {
                span,
                len: self.rope.len(),
            });
        }
        Ok(self.rope.slice_to_cow(span.start..span.end).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn edits_bump_version_and_apply() {
        let mut buf = TextBuffer::from_str("hello world");
        assert_eq!(buf.version(), 0);

        let changed = buf.apply_edit(0..5, "goodbye").unwrap();
        assert_eq!(buf.version(), 1);
        assert_eq!(buf.text(), "goodbye world");
        assert_eq!(changed, Span::new(0, 7));

        buf.apply_edit(7..13, "").unwrap();
        assert_eq!(buf.text(), "goodbye");
        assert_eq!(buf.version(), 2);
    }

    #[test]
    fn edits_reject_out_of_bounds_ranges() {
        let mut buf = TextBuffer::from_str("hello");
        assert!(matches!(
            buf.apply_edit(2..99, "x"),
            Err(EngineError::SpanOutOfBounds { .. })
        ));
        assert!(matches!(
            buf.apply_edit(4..2, "x"),
            Err(EngineError::SpanOutOfBounds { .. })
        ));
        // Rejected edits leave the buffer untouched.
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.version(), 0);
    }

    #[test]
    fn edits_reject_offsets_off_a_character_boundary() {
        let mut buf = TextBuffer::from_str("héllo");
        // The byte after 'h' lands inside the two-byte 'é'.
        assert!(matches!(
            buf.apply_edit(2..2, "x"),
            Err(EngineError::NotCharBoundary { offset: 2 })
        ));
        assert_eq!(buf.text(), "héllo");
        assert_eq!(buf.version(), 0);
    }

    #[test]
    fn slice_rejects_out_of_bounds() {
        let buf = TextBuffer::from_str("short");
        assert_eq!(buf.slice(Span::new(1, 4)).unwrap(), "hor");
        assert!(matches!(
            buf.slice(Span::new(2, 99)),
            Err(EngineError::SpanOutOfBounds { .. })
        ));
    }

    #[test]
    fn line_extent_includes_terminator() {
        let buf = TextBuffer::from_str("one\ntwo\nthree");
        assert_eq!(buf.line_extent(0), Span::new(0, 4));
        assert_eq!(buf.line_extent(5), Span::new(4, 8));
        // Last line has no terminator.
        assert_eq!(buf.line_extent(9), Span::new(8, 13));
        // Offset at end of buffer stays on the last line.
        assert_eq!(buf.line_extent(13), Span::new(8, 13));
    }

    #[test]
    fn line_extent_of_single_line() {
        let buf = TextBuffer::from_str("just one line");
        assert_eq!(buf.line_extent(4), Span::new(0, 13));
    }

    #[test]
    fn check_current_flags_stale_versions() {
        let mut buf = TextBuffer::from_str("x");
        buf.apply_edit(1..1, "y").unwrap();
        assert!(buf.check_current(1).is_ok());
        assert!(matches!(
            buf.check_current(0),
            Err(EngineError::StaleSnapshot {
                requested: 0,
                current: 1
            })
        ));
    }

    #[test]
    fn deltas_since_rejects_unknown_versions() {
        let mut buf = TextBuffer::from_str("x");
        buf.apply_edit(1..1, "y").unwrap();
        assert_eq!(buf.deltas_since(0).unwrap().len(), 1);
        assert_eq!(buf.deltas_since(1).unwrap().len(), 0);
        assert!(matches!(
            buf.deltas_since(5),
            Err(EngineError::UnknownVersion { .. })
        ));
    }
}
