//! Error types for document mutation.

use thiserror::Error;

/// Result type for document operations.
pub type DomResult<T> = Result<T, DomError>;

/// Errors raised while mutating the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// No document is available (non-browser host, detached window).
    #[error("no document available")]
    NoDocument,

    /// The document has no `<head>` element.
    #[error("document has no <head> element")]
    NoHead,

    /// The document has no `<body>` element.
    #[error("document has no <body> element")]
    NoBody,

    /// A relative insertion point referenced a script that is not present.
    #[error("anchor script not found: {0}")]
    AnchorNotFound(String),

    /// The JavaScript host rejected the operation.
    #[error("javascript error: {0}")]
    Js(String),
}
