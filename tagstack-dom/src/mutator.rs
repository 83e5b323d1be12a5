use crate::element::{PageLocation, ScriptElement, ScriptPosition};
use crate::error::DomResult;

/// Capability to inject and remove tag markup in a document.
///
/// Implementations apply each call immediately and in order. They are not
/// expected to deduplicate: callers remove stale copies before inserting.
pub trait DocumentMutator: Send + Sync {
    /// Inserts a script element into `<head>` at the given position.
    fn insert_script(&self, script: ScriptElement, position: &ScriptPosition) -> DomResult<()>;

    /// Removes every script whose id or `src` contains `pattern`.
    /// Returns how many were removed.
    fn remove_scripts_matching(&self, pattern: &str) -> DomResult<usize>;

    /// Appends `<noscript>` fallback markup to `<body>`.
    fn append_fallback(&self, id: &str, markup: &str) -> DomResult<()>;

    /// Removes every fallback whose id or markup contains `pattern`.
    fn remove_fallbacks_matching(&self, pattern: &str) -> DomResult<usize>;

    /// The document's current location and title.
    fn location(&self) -> PageLocation;
}
