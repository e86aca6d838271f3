//! Image URI resolution and asynchronous load bookkeeping.
//!
//! The engine never performs I/O. It resolves an inline image's URI to a
//! concrete target, asks the host's [`ImageLoader`] to fetch it, and keeps
//! per-URI state so every occurrence of the same URI shares one load. The
//! host reports completion back through the tagger, which turns it into
//! invalidations over the recorded occurrences.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use relative_path::RelativePath;
use thiserror::Error;

use crate::text::{Span, TextBuffer, TrackingSpan};

/// Where an image URI points once resolved against the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// A scheme-qualified URI to fetch over the network.
    Remote(String),
    /// A file on disk, absolute.
    Local(PathBuf),
}

impl ResolvedTarget {
    /// User-facing message for a load failure of this target.
    pub fn failure_message(&self, uri: &str, detail: &str) -> String {
        match self {
            ResolvedTarget::Remote(_) => {
                format!("Failed to download image from {uri}. {detail}")
            }
            ResolvedTarget::Local(_) => format!("Failed to load image from {uri}. {detail}"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A relative URI with no document path to resolve against.
    #[error("cannot resolve relative path {uri} without a document path")]
    NoDocumentPath { uri: String },
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
}

/// Resolve an inline image URI to a load target.
///
/// Anything carrying a scheme (`"://"`) is remote and passed through
/// untouched. Everything else is a filesystem path: absolute paths stand
/// alone, relative ones resolve against the document's directory and are
/// normalized, so `../img/x.png` lands where the author meant. Local
/// targets must exist at resolve time.
pub fn resolve_target(uri: &str, document_path: Option<&Path>) -> Result<ResolvedTarget, ResolveError> {
    if uri.contains("://") {
        return Ok(ResolvedTarget::Remote(uri.to_owned()));
    }
    let path = if Path::new(uri).is_absolute() {
        PathBuf::from(uri)
    } else {
        let dir = document_path
            .and_then(Path::parent)
            .ok_or_else(|| ResolveError::NoDocumentPath {
                uri: uri.to_owned(),
            })?;
        RelativePath::new(uri).to_logical_path(dir)
    };
    if !path.exists() {
        return Err(ResolveError::NotFound { path });
    }
    Ok(ResolvedTarget::Local(path))
}

/// Host-side image fetching.
///
/// `request` must not block; the host completes the load later through
/// [`Tagger::complete_image_load`](crate::tagging::Tagger::complete_image_load).
/// `V` is the host's decoded artifact type.
pub trait ImageLoader<V> {
    fn request(&mut self, uri: &str, target: &ResolvedTarget);
}

/// Lifecycle of one URI's artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState<V> {
    /// Requested from the loader, not yet completed.
    Loading,
    Loaded(V),
    /// Terminal until the store forgets the URI; carries the message shown
    /// in the error tag.
    Failed(String),
}

/// Per-URI load state and the buffer positions displaying each URI.
///
/// Keyed by the raw URI text as written, so two spellings of one file load
/// twice; that matches how hosts cache by URL.
pub struct ImageStore<V> {
    states: HashMap<String, ImageState<V>>,
    occurrences: HashMap<String, Vec<TrackingSpan>>,
}

impl<V> Default for ImageStore<V> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
            occurrences: HashMap::new(),
        }
    }
}

impl<V> ImageStore<V> {
    pub fn state(&self, uri: &str) -> Option<&ImageState<V>> {
        self.states.get(uri)
    }

    /// Mark `uri` as loading. Returns `true` when this is the first sight
    /// of the URI, in which case the caller owes the loader a request.
    pub fn begin_loading(&mut self, uri: &str) -> bool {
        if self.states.contains_key(uri) {
            return false;
        }
        self.states.insert(uri.to_owned(), ImageState::Loading);
        true
    }

    /// Record the outcome of a load. A success also supersedes a recorded
    /// failure, so a retried fetch heals every occurrence. Completions for
    /// never-requested or forgotten URIs and for already-loaded ones are
    /// dropped.
    pub fn complete(&mut self, uri: &str, outcome: Result<V, String>) -> bool {
        let Some(state) = self.states.get_mut(uri) else {
            return false;
        };
        match (&*state, outcome) {
            (ImageState::Loading, Ok(artifact)) | (ImageState::Failed(_), Ok(artifact)) => {
                *state = ImageState::Loaded(artifact);
                true
            }
            (ImageState::Loading, Err(message)) => {
                *state = ImageState::Failed(message);
                true
            }
            _ => false,
        }
    }

    /// Remember that `tracked` displays `uri`, unless an occurrence already
    /// resolves to the same place (re-tagging the same region must not pile
    /// up duplicates).
    pub fn record_occurrence(&mut self, uri: &str, tracked: TrackingSpan, buffer: &TextBuffer) {
        let spans = self.occurrences.entry(uri.to_owned()).or_default();
        let at = tracked.resolve(buffer);
        let already = spans
            .iter()
            .any(|existing| match (&at, existing.resolve(buffer)) {
                (Ok(a), Ok(b)) => *a == b,
                _ => false,
            });
        if !already {
            spans.push(tracked);
        }
    }

    /// Every recorded position displaying `uri`.
    pub fn occurrences(&self, uri: &str) -> &[TrackingSpan] {
        self.occurrences.get(uri).map_or(&[], Vec::as_slice)
    }

    /// Resolved positions of the occurrences still alive in `buffer`.
    ///
    /// Occurrences are recorded edge-exclusive, so deleting an image's
    /// text collapses its span to empty; such entries (and ones that no
    /// longer resolve at all) are pruned rather than re-rendered.
    pub fn live_occurrences(&mut self, uri: &str, buffer: &TextBuffer) -> Vec<Span> {
        let Some(spans) = self.occurrences.get_mut(uri) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        spans.retain(|tracked| match tracked.resolve(buffer) {
            Ok(span) if !span.is_empty() => {
                out.push(span);
                true
            }
            _ => false,
        });
        out
    }

    /// Drop a URI's state so the next tagging pass reloads it.
    pub fn forget(&mut self, uri: &str) {
        self.states.remove(uri);
        self.occurrences.remove(uri);
    }
}

impl<V> fmt::Debug for ImageStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageStore")
            .field("uris", &self.states.len())
            .finish()
    }
}
