//! Identity cache for adornment artifacts.
//!
//! Hosts fold adornments into layout by identity, so handing back a fresh
//! artifact for an unchanged element forces a relayout on every request.
//! The cache keys artifacts by the element's currently resolved span. That
//! key is only stable while the buffer is, which is fine: the tagger clears
//! the cache on every edit, so no entry ever outlives the version its key
//! was resolved at.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::text::{Span, TextBuffer, TrackingSpan};

#[derive(Debug)]
pub struct AdornmentCache<V> {
    entries: HashMap<Span, V>,
}

impl<V> Default for AdornmentCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V: Clone> AdornmentCache<V> {
    /// The cached artifact for `tracked`, or the one `build` makes.
    pub fn get_or_create(
        &mut self,
        tracked: &TrackingSpan,
        buffer: &TextBuffer,
        build: impl FnOnce() -> V,
    ) -> Result<V, EngineError> {
        let key = tracked.resolve(buffer)?;
        Ok(self.entries.entry(key).or_insert_with(build).clone())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
