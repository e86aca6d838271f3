//! Recognizes a restricted slice of Markdown inside source-code comments
//! and projects it as editor tags: styling for headers and emphasis,
//! adornments that hide delimiters and render inline images, and error
//! tags for images that fail to load.
//!
//! The engine is host-agnostic. The editor supplies lexical classification
//! through [`ClassificationSource`], image fetching through
//! [`ImageLoader`], and feeds edits, caret moves and option changes into
//! the [`Tagger`], which answers tag queries and queues invalidations.

pub mod classify;
pub mod error;
pub mod images;
pub mod options;
pub mod recognize;
pub mod tagging;
pub mod text;

pub use classify::{comment_regions, is_comment, ClassificationSource, ClassifiedSpan};
pub use error::EngineError;
pub use images::{resolve_target, ImageLoader, ImageState, ImageStore, ResolveError, ResolvedTarget};
pub use options::{OptionKind, Options};
pub use recognize::{elements, MarkdownElement, RecognizerOptions};
pub use tagging::{
    styles, AdornmentKind, AdornmentTag, ClassificationTag, ErrorTag, Invalidation,
    InvalidationReason, InvalidationScope, Selection, Tagger,
};
pub use text::{Snapshot, Span, TextBuffer, TrackingMode, TrackingSpan};
