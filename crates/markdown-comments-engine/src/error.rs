use crate::text::Span;

/// Caller-contract violations surfaced by the engine.
///
/// Recognition mismatches are not errors (they simply yield no elements) and
/// image-load failures are recorded as diagnostic tags, so the only hard
/// failures here are positional ones: positions are the entire value of this
/// subsystem, and producing tags against the wrong snapshot would be worse
/// than failing.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("tag query used snapshot version {requested}, but the buffer is at {current}")]
    StaleSnapshot { requested: u64, current: u64 },

    #[error("version {requested} is unknown to this buffer (history covers {oldest}..={current})")]
    UnknownVersion {
        requested: u64,
        oldest: u64,
        current: u64,
    },

    #[error("span {span:?} is out of bounds for a buffer of length {len}")]
    SpanOutOfBounds { span: Span, len: usize },

    #[error("offset {offset} is not a character boundary")]
    NotCharBoundary { offset: usize },
}
