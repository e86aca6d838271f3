//! Tag types projected over the buffer, and the style names they carry.

use crate::text::Span;

/// Style names handed to the host's theming layer.
///
/// The names form a dotted hierarchy so hosts can theme a whole family at
/// once (`markdown-comments.header` covers all six levels).
pub mod styles {
    pub const ROOT: &str = "markdown-comments";
    pub const HEADER: &str = "markdown-comments.header";
    pub const HEADER_LEVELS: [&str; 6] = [
        "markdown-comments.header.h1",
        "markdown-comments.header.h2",
        "markdown-comments.header.h3",
        "markdown-comments.header.h4",
        "markdown-comments.header.h5",
        "markdown-comments.header.h6",
    ];
    pub const EMPHASIS: &str = "markdown-comments.emphasis";
    pub const STRONG_EMPHASIS: &str = "markdown-comments.strong-emphasis";
    pub const STRIKETHROUGH: &str = "markdown-comments.strikethrough";
    pub const IMAGE: &str = "markdown-comments.image";

    /// Style for a header of `level` (1..=6).
    pub fn header(level: u8) -> &'static str {
        HEADER_LEVELS[usize::from(level.clamp(1, 6)) - 1]
    }
}

/// Styles a stretch of text without replacing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationTag {
    pub span: Span,
    pub style: &'static str,
}

/// Replaces a stretch of text with host-rendered content (or nothing).
///
/// `V` is the host's visual artifact type; the engine never inspects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdornmentTag<V> {
    pub span: Span,
    pub kind: AdornmentKind<V>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdornmentKind<V> {
    /// Collapse delimiter characters to nothing.
    HideDelimiter,
    /// Replace image syntax with the loaded artifact.
    Image {
        artifact: V,
        /// The image's title when one was written.
        tooltip: Option<String>,
    },
}

/// Marks image syntax whose artifact failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTag {
    pub span: Span,
    pub message: String,
}
