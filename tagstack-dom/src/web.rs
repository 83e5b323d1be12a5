//! Live browser document backed by `web-sys`.

use crate::element::{PageLocation, ScriptElement, ScriptPosition, ScriptSource};
use crate::error::{DomError, DomResult};
use crate::mutator::DocumentMutator;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Node};

/// The page's `window.document`.
///
/// Holds no JS handles; every call looks the document up again, so the value
/// is `Send + Sync` and survives the window being replaced.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebDocument;

impl WebDocument {
    pub fn new() -> Self {
        Self
    }
}

fn js_err(value: JsValue) -> DomError {
    DomError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

fn document() -> DomResult<Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or(DomError::NoDocument)
}

fn elements(doc: &Document, selector: &str) -> DomResult<Vec<Element>> {
    let list = doc.query_selector_all(selector).map_err(js_err)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn element_matches(el: &Element, pattern: &str) -> bool {
    el.id().contains(pattern)
        || el
            .get_attribute("src")
            .is_some_and(|src| src.contains(pattern))
}

impl DocumentMutator for WebDocument {
    fn insert_script(&self, script: ScriptElement, position: &ScriptPosition) -> DomResult<()> {
        let doc = document()?;
        let head = doc.head().ok_or(DomError::NoHead)?;

        let el = doc.create_element("script").map_err(js_err)?;
        el.set_id(&script.id);
        match &script.source {
            ScriptSource::External { src, is_async } => {
                el.set_attribute("src", src).map_err(js_err)?;
                if *is_async {
                    el.set_attribute("async", "").map_err(js_err)?;
                }
            }
            ScriptSource::Inline { code } => el.set_text_content(Some(code)),
        }

        let reference: Option<Node> = match position {
            ScriptPosition::HeadStart => head.first_child(),
            ScriptPosition::HeadEnd => None,
            ScriptPosition::After(anchor) => doc
                .get_element_by_id(anchor)
                .ok_or_else(|| DomError::AnchorNotFound(anchor.clone()))?
                .next_sibling(),
            ScriptPosition::AfterLastMatching(pattern) => {
                let scripts = elements(&doc, "head script")?;
                match scripts.iter().rev().find(|s| element_matches(s, pattern)) {
                    Some(last) => last.next_sibling(),
                    None => head.first_child(),
                }
            }
        };

        head.insert_before(&el, reference.as_ref()).map_err(js_err)?;
        Ok(())
    }

    fn remove_scripts_matching(&self, pattern: &str) -> DomResult<usize> {
        let doc = document()?;
        let mut removed = 0;
        for el in elements(&doc, "script")? {
            if element_matches(&el, pattern) {
                el.remove();
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn append_fallback(&self, id: &str, markup: &str) -> DomResult<()> {
        let doc = document()?;
        let body = doc.body().ok_or(DomError::NoBody)?;

        let el = doc.create_element("noscript").map_err(js_err)?;
        el.set_id(id);
        el.set_inner_html(markup);
        body.append_child(&el).map_err(js_err)?;
        Ok(())
    }

    fn remove_fallbacks_matching(&self, pattern: &str) -> DomResult<usize> {
        let doc = document()?;
        let mut removed = 0;
        for el in elements(&doc, "noscript")? {
            if el.id().contains(pattern) || el.inner_html().contains(pattern) {
                el.remove();
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn location(&self) -> PageLocation {
        let Some(window) = web_sys::window() else {
            return PageLocation::default();
        };
        let location = window.location();
        let title = window.document().map(|d| d.title()).unwrap_or_default();
        PageLocation {
            href: location.href().unwrap_or_default(),
            path: location.pathname().unwrap_or_default(),
            title,
        }
    }
}
