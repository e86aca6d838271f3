//! The tagger: comment regions in, projected tags out.
//!
//! [`Tagger`] owns the buffer and threads the whole pipeline together:
//! the host's classifier supplies syntax tokens, the aggregator stitches
//! them into comment regions, the recognizer finds Markdown inside them,
//! and the three tag queries project the results. Edits, caret moves,
//! option changes and image completions each queue an [`Invalidation`]
//! which the host drains to decide what to re-request.

pub mod cache;
pub mod suppress;
pub mod tags;

use std::path::PathBuf;

use log::debug;

pub use cache::AdornmentCache;
pub use suppress::{should_suppress, Selection};
pub use tags::{styles, AdornmentKind, AdornmentTag, ClassificationTag, ErrorTag};

use crate::classify::{comment_regions, ClassificationSource};
use crate::error::EngineError;
use crate::images::{resolve_target, ImageLoader, ImageState, ImageStore};
use crate::options::{OptionKind, Options};
use crate::recognize::{elements, MarkdownElement};
use crate::text::{resolve_point, Snapshot, Span, TextBuffer, TrackingMode, TrackingSpan};

/// What happened to make previously issued tags stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationReason {
    Edit,
    CaretMove,
    OptionChange(OptionKind),
    /// An image load settled; its occurrences need re-rendering.
    ImageReady,
}

/// How much of the buffer the staleness covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationScope {
    Span(Span),
    /// Everything currently on screen.
    View,
    /// The whole buffer, visible or not.
    Buffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invalidation {
    pub reason: InvalidationReason,
    pub scope: InvalidationScope,
}

/// Drives recognition and projection for one buffer.
///
/// `C` classifies syntax, `L` loads images, `V` is the host's image
/// artifact type. Tag queries take the version the caller believes the
/// buffer is at and fail fast when it is stale, so a host racing its own
/// edit queue re-requests instead of painting tags at wrong offsets.
pub struct Tagger<C, L, V> {
    buffer: TextBuffer,
    source: C,
    loader: L,
    options: Options,
    /// Last reported selection, with the version its offsets are in.
    selection: Option<(Selection, u64)>,
    document_path: Option<PathBuf>,
    cache: AdornmentCache<AdornmentKind<V>>,
    images: ImageStore<V>,
    pending: Vec<Invalidation>,
}

impl<C, L, V> Tagger<C, L, V>
where
    C: ClassificationSource,
    L: ImageLoader<V>,
    V: Clone,
{
    pub fn new(text: &str, source: C, loader: L) -> Self {
        Self {
            buffer: TextBuffer::from_str(text),
            source,
            loader,
            options: Options::default(),
            selection: None,
            document_path: None,
            cache: AdornmentCache::default(),
            images: ImageStore::default(),
            pending: Vec::new(),
        }
    }

    /// The on-disk path of the buffer's document, used to resolve relative
    /// image URIs.
    pub fn with_document_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.document_path = Some(path.into());
        self
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Artifacts currently held by the identity cache.
    pub fn cached_adornments(&self) -> usize {
        self.cache.len()
    }

    /// Replace `range` with `replacement` and queue an edit invalidation
    /// over the touched lines. Returns the span of the new text; a range
    /// out of bounds or off a character boundary is rejected before any
    /// state changes.
    pub fn apply_edit(
        &mut self,
        range: std::ops::Range<usize>,
        replacement: &str,
    ) -> Result<Span, EngineError> {
        let changed = self.buffer.apply_edit(range, replacement)?;
        // Cached artifacts are keyed by pre-edit positions.
        self.cache.clear();
        let scope = self
            .buffer
            .line_extent(changed.start)
            .union(self.buffer.line_extent(changed.end));
        self.pending.push(Invalidation {
            reason: InvalidationReason::Edit,
            scope: InvalidationScope::Span(scope),
        });
        Ok(changed)
    }

    /// Report the view's selection, in offsets at the buffer's current
    /// version. Queues a caret-move invalidation only when the caret
    /// changed line or the selection changed shape, since suppression
    /// cannot have changed otherwise.
    pub fn set_selection(&mut self, selection: Selection) {
        let new_line = self.buffer.line_extent(selection.active);
        let prev = self.current_selection();
        let unchanged = prev.is_some_and(|prev| {
            prev.is_empty() == selection.is_empty()
                && self.buffer.line_extent(prev.active) == new_line
                && (selection.is_empty() || prev.anchor == selection.anchor)
        });
        if !unchanged {
            let scope = match prev {
                Some(prev) => self.buffer.line_extent(prev.active).union(new_line),
                None => new_line,
            };
            self.pending.push(Invalidation {
                reason: InvalidationReason::CaretMove,
                scope: InvalidationScope::Span(scope),
            });
        }
        self.selection = Some((selection, self.buffer.version()));
    }

    /// Swap in new options. Toggling the master switch (or reloading the
    /// whole set) invalidates the buffer; the finer toggles only affect
    /// what is rendered, so the view suffices. The adornment cache is left
    /// alone: its entries are keyed by resolved span and entries for
    /// elements no longer projected simply go unconsulted.
    pub fn set_options(&mut self, options: Options, kind: OptionKind) {
        self.options = options;
        let scope = if kind.matches(OptionKind::Enabled) {
            InvalidationScope::Buffer
        } else {
            InvalidationScope::View
        };
        self.pending.push(Invalidation {
            reason: InvalidationReason::OptionChange(kind),
            scope,
        });
    }

    /// Report the outcome of a load the tagger requested earlier. Each
    /// recorded occurrence of the URI gets its own invalidation at its
    /// current position. Completions the store cannot apply (unknown or
    /// already-loaded URIs) are dropped.
    pub fn complete_image_load(&mut self, uri: &str, outcome: Result<V, String>) {
        if !self.images.complete(uri, outcome) {
            debug!("dropping completion for unknown image uri {uri:?}");
            return;
        }
        for span in self.images.live_occurrences(uri, &self.buffer) {
            self.pending.push(Invalidation {
                reason: InvalidationReason::ImageReady,
                scope: InvalidationScope::Span(span),
            });
        }
    }

    /// Hand the queued invalidations to the host, oldest first.
    pub fn drain_invalidations(&mut self) -> Vec<Invalidation> {
        std::mem::take(&mut self.pending)
    }

    /// Styling tags for everything recognized in the comment regions
    /// touching `spans`. Never suppressed: styling does not move text, so
    /// it can stay up while the user edits.
    pub fn classification_tags(
        &self,
        spans: &[Span],
        version: u64,
    ) -> Result<Vec<ClassificationTag>, EngineError> {
        self.buffer.check_current(version)?;
        if !self.options.enabled {
            return Ok(Vec::new());
        }
        let snapshot = self.buffer.snapshot();
        let mut out = Vec::new();
        for &(region, ref text) in &self.regions_touching(spans, &snapshot)? {
            for element in elements(text, region.start, self.options.recognizer()) {
                out.push(ClassificationTag {
                    span: element.span(),
                    style: match element {
                        MarkdownElement::Header { level, .. } => styles::header(level),
                        MarkdownElement::Emphasis { .. } => styles::EMPHASIS,
                        MarkdownElement::StrongEmphasis { .. } => styles::STRONG_EMPHASIS,
                        MarkdownElement::Strikethrough { .. } => styles::STRIKETHROUGH,
                        MarkdownElement::Image { .. } => styles::IMAGE,
                    },
                });
            }
        }
        Ok(out)
    }

    /// Replacing tags: delimiter hiding and rendered images. Suppressed per
    /// region while the user's caret or selection touches it. First sight
    /// of an image URI kicks off a load through the loader.
    pub fn adornment_tags(
        &mut self,
        spans: &[Span],
        version: u64,
    ) -> Result<Vec<AdornmentTag<V>>, EngineError> {
        self.buffer.check_current(version)?;
        if !self.options.enabled {
            return Ok(Vec::new());
        }
        let snapshot = self.buffer.snapshot();
        let mut out = Vec::new();
        for &(region, ref text) in &self.regions_touching(spans, &snapshot)? {
            if self.is_suppressed(region) {
                continue;
            }
            for element in elements(text, region.start, self.options.recognizer()) {
                match element {
                    MarkdownElement::Header { delimiter, .. } => {
                        if self.options.hide_delimiters {
                            out.push(self.hide(delimiter)?);
                        }
                    }
                    MarkdownElement::Emphasis {
                        start_delim,
                        end_delim,
                        ..
                    }
                    | MarkdownElement::StrongEmphasis {
                        start_delim,
                        end_delim,
                        ..
                    }
                    | MarkdownElement::Strikethrough {
                        start_delim,
                        end_delim,
                        ..
                    } => {
                        if self.options.hide_delimiters {
                            out.push(self.hide(start_delim)?);
                            out.push(self.hide(end_delim)?);
                        }
                    }
                    MarkdownElement::Image {
                        span, uri, title, ..
                    } if self.options.show_images => {
                        if let Some(tag) = self.image_adornment(span, uri, title, &snapshot)? {
                            out.push(tag);
                        }
                    }
                    MarkdownElement::Image { .. } => {}
                }
            }
        }
        Ok(out)
    }

    /// Error tags for images whose load has failed. Follows the same
    /// suppression as adornments but never initiates loads.
    pub fn error_tags(&self, spans: &[Span], version: u64) -> Result<Vec<ErrorTag>, EngineError> {
        self.buffer.check_current(version)?;
        if !(self.options.enabled && self.options.show_images) {
            return Ok(Vec::new());
        }
        let snapshot = self.buffer.snapshot();
        let mut out = Vec::new();
        for &(region, ref text) in &self.regions_touching(spans, &snapshot)? {
            if self.is_suppressed(region) {
                continue;
            }
            for element in elements(text, region.start, self.options.recognizer()) {
                let MarkdownElement::Image { span, uri, .. } = element else {
                    continue;
                };
                let uri_text = snapshot.slice(uri)?;
                if let Some(ImageState::Failed(message)) = self.images.state(&uri_text) {
                    out.push(ErrorTag {
                        span,
                        message: message.clone(),
                    });
                }
            }
        }
        Ok(out)
    }

    /// Comment regions overlapping any requested span, with their text.
    /// Regions are deduplicated: adjacent request spans usually map to the
    /// same region.
    fn regions_touching(
        &self,
        spans: &[Span],
        snapshot: &Snapshot,
    ) -> Result<Vec<(Span, String)>, EngineError> {
        let mut out: Vec<(Span, String)> = Vec::new();
        for &request in spans {
            let tokens = self.source.classified_spans(request, snapshot);
            for region in comment_regions(tokens) {
                if !region.overlaps(request) {
                    continue;
                }
                if out.iter().any(|&(seen, _)| seen == region) {
                    continue;
                }
                let text = snapshot.slice(region)?;
                out.push((region, text));
            }
        }
        Ok(out)
    }

    /// The last reported selection, re-anchored to the current version so
    /// it stays usable when edits arrive before the next selection report.
    fn current_selection(&self) -> Option<Selection> {
        let (sel, version) = self.selection?;
        let anchor = resolve_point(sel.anchor, version, false, &self.buffer).ok()?;
        let active = resolve_point(sel.active, version, false, &self.buffer).ok()?;
        Some(Selection { anchor, active })
    }

    fn is_suppressed(&self, region: Span) -> bool {
        self.current_selection()
            .is_some_and(|sel| should_suppress(region, sel, &self.buffer))
    }

    fn hide(&mut self, span: Span) -> Result<AdornmentTag<V>, EngineError> {
        let tracked = TrackingSpan::new(span, self.buffer.version(), TrackingMode::EdgeExclusive);
        let kind = self
            .cache
            .get_or_create(&tracked, &self.buffer, || AdornmentKind::HideDelimiter)?;
        Ok(AdornmentTag { span, kind })
    }

    /// One image element's adornment, if its artifact is ready. Records the
    /// occurrence and starts the load on first sight; resolve failures
    /// settle the URI as failed immediately.
    fn image_adornment(
        &mut self,
        span: Span,
        uri: Span,
        title: Span,
        snapshot: &Snapshot,
    ) -> Result<Option<AdornmentTag<V>>, EngineError> {
        let uri_text = snapshot.slice(uri)?;
        let tracked = TrackingSpan::new(span, self.buffer.version(), TrackingMode::EdgeExclusive);
        self.images.record_occurrence(&uri_text, tracked, &self.buffer);

        if self.images.begin_loading(&uri_text) {
            match resolve_target(&uri_text, self.document_path.as_deref()) {
                Ok(target) => self.loader.request(&uri_text, &target),
                Err(err) => {
                    let message = format!("Failed to load image from {uri_text}. {err}");
                    self.images.complete(&uri_text, Err(message));
                }
            }
        }

        let Some(ImageState::Loaded(artifact)) = self.images.state(&uri_text) else {
            return Ok(None);
        };
        let artifact = artifact.clone();
        let tooltip = if title.is_empty() {
            None
        } else {
            Some(snapshot.slice(title)?)
        };
        let tracked = TrackingSpan::new(span, self.buffer.version(), TrackingMode::EdgeExclusive);
        let kind = self.cache.get_or_create(&tracked, &self.buffer, || {
            AdornmentKind::Image { artifact, tooltip }
        })?;
        Ok(Some(AdornmentTag { span, kind }))
    }
}
