//! In-memory document used by tests and non-browser hosts.

use crate::element::{Fallback, PageLocation, ScriptElement, ScriptPosition};
use crate::error::{DomError, DomResult};
use crate::mutator::DocumentMutator;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// A single applied change, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    ScriptInserted { id: String, index: usize },
    ScriptRemoved { id: String },
    FallbackAppended { id: String },
    FallbackRemoved { id: String },
}

#[derive(Debug, Default)]
struct DocumentState {
    head: Vec<ScriptElement>,
    body: Vec<Fallback>,
    location: PageLocation,
    mutations: Vec<Mutation>,
    detached: bool,
}

/// A document held entirely in memory.
///
/// `<head>` holds only scripts and `<body>` only fallbacks; anything else a
/// page would contain is irrelevant to tag injection. Every applied change is
/// appended to a mutation log.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    state: Mutex<DocumentState>,
}

impl MemoryDocument {
    /// Creates an empty document at `about:blank`.
    pub fn new() -> Self {
        Self::with_location(PageLocation::new("about:blank", "/", ""))
    }

    /// Creates an empty document at the given location.
    pub fn with_location(location: PageLocation) -> Self {
        Self {
            state: Mutex::new(DocumentState {
                location,
                ..Default::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, DocumentState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Simulates SPA navigation.
    pub fn navigate(&self, location: PageLocation) {
        self.state().location = location;
    }

    /// While detached, every mutation fails with [`DomError::NoDocument`].
    pub fn set_detached(&self, detached: bool) {
        self.state().detached = detached;
    }

    /// Scripts currently in `<head>`, in document order.
    pub fn scripts(&self) -> Vec<ScriptElement> {
        self.state().head.clone()
    }

    /// Ids of the scripts in `<head>`, in document order.
    pub fn script_ids(&self) -> Vec<String> {
        self.state().head.iter().map(|s| s.id.clone()).collect()
    }

    /// Number of scripts whose id or `src` contains `pattern`.
    pub fn count_scripts_matching(&self, pattern: &str) -> usize {
        self.state().head.iter().filter(|s| s.matches(pattern)).count()
    }

    /// Fallbacks currently in `<body>`.
    pub fn fallbacks(&self) -> Vec<Fallback> {
        self.state().body.clone()
    }

    /// Every change applied so far.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.state().mutations.clone()
    }

    /// Forgets the mutation log without touching the document.
    pub fn clear_mutations(&self) {
        self.state().mutations.clear();
    }

    /// Renders the document as HTML.
    pub fn to_html(&self) -> String {
        let state = self.state();
        let head: String = state.head.iter().map(ScriptElement::to_html).collect();
        let body: String = state.body.iter().map(Fallback::to_html).collect();
        format!(
            "<html><head><title>{}</title>{}</head><body>{}</body></html>",
            state.location.title, head, body
        )
    }
}

impl DocumentMutator for MemoryDocument {
    fn insert_script(&self, script: ScriptElement, position: &ScriptPosition) -> DomResult<()> {
        let mut state = self.state();
        if state.detached {
            return Err(DomError::NoDocument);
        }

        let index = match position {
            ScriptPosition::HeadStart => 0,
            ScriptPosition::HeadEnd => state.head.len(),
            ScriptPosition::After(anchor) => state
                .head
                .iter()
                .position(|s| &s.id == anchor)
                .map(|i| i + 1)
                .ok_or_else(|| DomError::AnchorNotFound(anchor.clone()))?,
            ScriptPosition::AfterLastMatching(pattern) => state
                .head
                .iter()
                .rposition(|s| s.matches(pattern))
                .map_or(0, |i| i + 1),
        };

        debug!(id = %script.id, index, "Inserting script");
        state.mutations.push(Mutation::ScriptInserted {
            id: script.id.clone(),
            index,
        });
        state.head.insert(index, script);
        Ok(())
    }

    fn remove_scripts_matching(&self, pattern: &str) -> DomResult<usize> {
        let mut state = self.state();
        if state.detached {
            return Err(DomError::NoDocument);
        }

        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut state.head).into_iter().partition(|s| s.matches(pattern));
        state.head = kept;
        for script in &removed {
            state.mutations.push(Mutation::ScriptRemoved {
                id: script.id.clone(),
            });
        }
        Ok(removed.len())
    }

    fn append_fallback(&self, id: &str, markup: &str) -> DomResult<()> {
        let mut state = self.state();
        if state.detached {
            return Err(DomError::NoDocument);
        }

        state.body.push(Fallback {
            id: id.to_string(),
            markup: markup.to_string(),
        });
        state
            .mutations
            .push(Mutation::FallbackAppended { id: id.to_string() });
        Ok(())
    }

    fn remove_fallbacks_matching(&self, pattern: &str) -> DomResult<usize> {
        let mut state = self.state();
        if state.detached {
            return Err(DomError::NoDocument);
        }

        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut state.body).into_iter().partition(|f| f.matches(pattern));
        state.body = kept;
        for fallback in &removed {
            state.mutations.push(Mutation::FallbackRemoved {
                id: fallback.id.clone(),
            });
        }
        Ok(removed.len())
    }

    fn location(&self) -> PageLocation {
        self.state().location.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_on_empty_document_records_nothing() {
        let doc = MemoryDocument::new();
        assert_eq!(doc.remove_scripts_matching("anything").unwrap(), 0);
        assert_eq!(doc.remove_fallbacks_matching("anything").unwrap(), 0);
        assert!(doc.mutations().is_empty());
    }

    #[test]
    fn detached_document_rejects_mutations() {
        let doc = MemoryDocument::new();
        doc.set_detached(true);

        let result = doc.insert_script(ScriptElement::inline("a", ""), &ScriptPosition::HeadStart);
        assert_eq!(result, Err(DomError::NoDocument));
        assert!(doc.scripts().is_empty());
    }
}
