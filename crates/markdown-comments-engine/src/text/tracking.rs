use xi_rope::delta::Transformer;

use crate::error::EngineError;
use crate::text::buffer::TextBuffer;
use crate::text::span::Span;

/// How a tracked span's edges move when text is inserted exactly at them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingMode {
    /// The span grows to include text inserted at either edge.
    EdgeInclusive,
    /// The span excludes text inserted at either edge.
    EdgeExclusive,
}

/// A span minted against one buffer version that can be re-resolved against
/// a later one by replaying the intervening deltas.
///
/// Two tracking spans denote "the same logical span" exactly when their
/// resolved positions against the current buffer are equal, regardless of
/// the versions they were created at. Resolution never mutates the span;
/// it is re-anchored on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingSpan {
    span: Span,
    version: u64,
    mode: TrackingMode,
}

impl TrackingSpan {
    pub fn new(span: Span, version: u64, mode: TrackingMode) -> Self {
        Self {
            span,
            version,
            mode,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Re-anchors the span against the buffer's current version.
    ///
    /// Fails if the span's version is unknown to the buffer: silently
    /// producing wrong positions would defeat the point of tracking.
    pub fn resolve(&self, buffer: &TextBuffer) -> Result<Span, EngineError> {
        let (mut start, mut end) = (self.span.start, self.span.end);
        // For an edge-inclusive span: the start stays before text inserted
        // at it (after=false) and the end stays after text inserted at it
        // (after=true), so boundary insertions land inside the span.
        let (start_after, end_after) = match self.mode {
            TrackingMode::EdgeInclusive => (false, true),
            TrackingMode::EdgeExclusive => (true, false),
        };
        for delta in buffer.deltas_since(self.version)? {
            let mut tx = Transformer::new(delta);
            start = tx.transform(start, start_after);
            end = tx.transform(end, end_after);
        }
        let end = end.max(start);
        Ok(Span::new(start, end))
    }
}

/// Re-anchors a single position from `version` to the buffer's current
/// version. `forward` biases the point to sit after text inserted exactly
/// at it.
pub fn resolve_point(
    pos: usize,
    version: u64,
    forward: bool,
    buffer: &TextBuffer,
) -> Result<usize, EngineError> {
    let mut pos = pos;
    for delta in buffer.deltas_since(version)? {
        let mut tx = Transformer::new(delta);
        pos = tx.transform(pos, forward);
    }
    Ok(pos)
}
