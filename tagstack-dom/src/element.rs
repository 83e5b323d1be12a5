//! Markup descriptions handed to a [`DocumentMutator`](crate::DocumentMutator).

use serde::{Deserialize, Serialize};

/// Where a script's code comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptSource {
    /// `<script src="..." async>`
    External { src: String, is_async: bool },
    /// `<script>code</script>`
    Inline { code: String },
}

/// A `<script>` element to place in `<head>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptElement {
    pub id: String,
    pub source: ScriptSource,
}

impl ScriptElement {
    /// An asynchronously loaded external script.
    pub fn external(id: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: ScriptSource::External {
                src: src.into(),
                is_async: true,
            },
        }
    }

    /// An inline bootstrap script.
    pub fn inline(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: ScriptSource::Inline { code: code.into() },
        }
    }

    /// The `src` attribute, for external scripts.
    #[must_use]
    pub fn src(&self) -> Option<&str> {
        match &self.source {
            ScriptSource::External { src, .. } => Some(src),
            ScriptSource::Inline { .. } => None,
        }
    }

    /// Whether the id or `src` contains `pattern`.
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        self.id.contains(pattern) || self.src().is_some_and(|src| src.contains(pattern))
    }

    /// Renders the element as HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        match &self.source {
            ScriptSource::External { src, is_async } => {
                let async_attr = if *is_async { " async" } else { "" };
                format!(r#"<script id="{}"{} src="{}"></script>"#, self.id, async_attr, src)
            }
            ScriptSource::Inline { code } => {
                format!(r#"<script id="{}">{}</script>"#, self.id, code)
            }
        }
    }
}

/// A `<noscript>` fallback appended to `<body>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallback {
    pub id: String,
    pub markup: String,
}

impl Fallback {
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        self.id.contains(pattern) || self.markup.contains(pattern)
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        format!(r#"<noscript id="{}">{}</noscript>"#, self.id, self.markup)
    }
}

/// Insertion point for a new script inside `<head>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptPosition {
    /// Before every existing head child.
    HeadStart,
    /// After every existing head child.
    HeadEnd,
    /// Directly after the script with this id.
    After(String),
    /// Directly after the last script matching the pattern, or at the head
    /// start when nothing matches.
    AfterLastMatching(String),
}

/// Snapshot of `window.location` and `document.title`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLocation {
    /// Full URL (`location.href`).
    pub href: String,
    /// Path component (`location.pathname`).
    pub path: String,
    /// Document title.
    pub title: String,
}

impl PageLocation {
    pub fn new(href: impl Into<String>, path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            path: path.into(),
            title: title.into(),
        }
    }
}
