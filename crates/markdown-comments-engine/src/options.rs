//! Rendering options and option-change notification.

use crate::recognize::RecognizerOptions;

/// Behaviour toggles for the tagger. Everything defaults to on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Master switch; when off no tags of any kind are produced.
    pub enabled: bool,
    /// Replace inline image syntax with the rendered image.
    pub show_images: bool,
    /// Hide Markdown delimiter characters once recognized.
    pub hide_delimiters: bool,
    /// Do not treat C-family preprocessor directives as headers.
    pub skip_preprocessor: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            enabled: true,
            show_images: true,
            hide_delimiters: true,
            skip_preprocessor: true,
        }
    }
}

impl Options {
    pub fn recognizer(&self) -> RecognizerOptions {
        RecognizerOptions {
            skip_preprocessor: self.skip_preprocessor,
        }
    }
}

/// Which option changed, for scoping the resulting invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Several options changed at once (a settings reload).
    All,
    Enabled,
    ShowImages,
    HideDelimiters,
    SkipPreprocessor,
}

impl OptionKind {
    /// Whether a change to this kind covers `other`.
    pub fn matches(self, other: OptionKind) -> bool {
        self == OptionKind::All || self == other
    }
}
