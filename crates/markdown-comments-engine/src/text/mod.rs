//! Position primitives: byte spans, the versioned rope buffer, and spans
//! that re-anchor themselves across edits.

pub mod buffer;
pub mod span;
pub mod tracking;

pub use buffer::{Snapshot, TextBuffer};
pub use span::Span;
pub use tracking::{TrackingMode, TrackingSpan, resolve_point};
