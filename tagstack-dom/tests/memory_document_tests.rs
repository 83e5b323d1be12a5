use pretty_assertions::assert_eq;
use tagstack_dom::{
    DocumentMutator, DomError, MemoryDocument, Mutation, PageLocation, ScriptElement,
    ScriptPosition,
};

fn loader(id: &str) -> ScriptElement {
    ScriptElement::external(id, format!("https://cdn.example.com/{id}.js"))
}

// ── Insertion positions ─────────────────────────────────────────

#[test]
fn head_start_inserts_before_existing_scripts() {
    let doc = MemoryDocument::new();
    doc.insert_script(loader("first"), &ScriptPosition::HeadStart).unwrap();
    doc.insert_script(loader("second"), &ScriptPosition::HeadStart).unwrap();

    assert_eq!(doc.script_ids(), vec!["second", "first"]);
}

#[test]
fn head_end_appends() {
    let doc = MemoryDocument::new();
    doc.insert_script(loader("first"), &ScriptPosition::HeadEnd).unwrap();
    doc.insert_script(loader("second"), &ScriptPosition::HeadEnd).unwrap();

    assert_eq!(doc.script_ids(), vec!["first", "second"]);
}

#[test]
fn after_anchor_inserts_directly_after() {
    let doc = MemoryDocument::new();
    doc.insert_script(loader("a"), &ScriptPosition::HeadEnd).unwrap();
    doc.insert_script(loader("c"), &ScriptPosition::HeadEnd).unwrap();
    doc.insert_script(loader("b"), &ScriptPosition::After("a".into()))
        .unwrap();

    assert_eq!(doc.script_ids(), vec!["a", "b", "c"]);
}

#[test]
fn after_missing_anchor_fails() {
    let doc = MemoryDocument::new();
    let err = doc
        .insert_script(loader("b"), &ScriptPosition::After("missing".into()))
        .unwrap_err();
    assert_eq!(err, DomError::AnchorNotFound("missing".into()));
    assert!(doc.mutations().is_empty());
}

#[test]
fn after_last_matching_uses_last_match() {
    let doc = MemoryDocument::new();
    doc.insert_script(loader("vendor-a-1"), &ScriptPosition::HeadEnd).unwrap();
    doc.insert_script(loader("vendor-a-2"), &ScriptPosition::HeadEnd).unwrap();
    doc.insert_script(loader("other"), &ScriptPosition::HeadEnd).unwrap();

    doc.insert_script(
        ScriptElement::inline("pixel", "init()"),
        &ScriptPosition::AfterLastMatching("vendor-a".into()),
    )
    .unwrap();

    assert_eq!(doc.script_ids(), vec!["vendor-a-1", "vendor-a-2", "pixel", "other"]);
}

#[test]
fn after_last_matching_falls_back_to_head_start() {
    let doc = MemoryDocument::new();
    doc.insert_script(loader("other"), &ScriptPosition::HeadEnd).unwrap();
    doc.insert_script(
        ScriptElement::inline("pixel", "init()"),
        &ScriptPosition::AfterLastMatching("vendor-a".into()),
    )
    .unwrap();

    assert_eq!(doc.script_ids(), vec!["pixel", "other"]);
}

// ── Removal ─────────────────────────────────────────────────────

#[test]
fn remove_matches_src_and_id() {
    let doc = MemoryDocument::new();
    doc.insert_script(
        ScriptElement::external("loader", "https://tags.example.com/gtag/js?id=1"),
        &ScriptPosition::HeadEnd,
    )
    .unwrap();
    doc.insert_script(ScriptElement::inline("gtag-config", "x"), &ScriptPosition::HeadEnd)
        .unwrap();
    doc.insert_script(ScriptElement::inline("unrelated", "y"), &ScriptPosition::HeadEnd)
        .unwrap();

    assert_eq!(doc.remove_scripts_matching("tags.example.com/gtag").unwrap(), 1);
    assert_eq!(doc.remove_scripts_matching("gtag-").unwrap(), 1);
    assert_eq!(doc.script_ids(), vec!["unrelated"]);
}

#[test]
fn inline_code_is_not_matched() {
    let doc = MemoryDocument::new();
    doc.insert_script(
        ScriptElement::inline("base", "load('https://connect.example.net/sdk.js')"),
        &ScriptPosition::HeadEnd,
    )
    .unwrap();

    assert_eq!(doc.remove_scripts_matching("connect.example.net").unwrap(), 0);
    assert_eq!(doc.count_scripts_matching("base"), 1);
}

#[test]
fn fallbacks_append_and_remove() {
    let doc = MemoryDocument::new();
    doc.append_fallback("px", r#"<img src="https://px.example.com/tr?id=1" />"#)
        .unwrap();
    assert_eq!(doc.fallbacks().len(), 1);

    assert_eq!(doc.remove_fallbacks_matching("px.example.com/tr").unwrap(), 1);
    assert!(doc.fallbacks().is_empty());
}

// ── Mutation log & rendering ────────────────────────────────────

#[test]
fn mutation_log_records_order() {
    let doc = MemoryDocument::new();
    doc.insert_script(loader("a"), &ScriptPosition::HeadStart).unwrap();
    doc.append_fallback("f", "<img />").unwrap();
    doc.remove_scripts_matching("a").unwrap();

    assert_eq!(
        doc.mutations(),
        vec![
            Mutation::ScriptInserted {
                id: "a".into(),
                index: 0
            },
            Mutation::FallbackAppended { id: "f".into() },
            Mutation::ScriptRemoved { id: "a".into() },
        ]
    );

    doc.clear_mutations();
    assert!(doc.mutations().is_empty());
}

#[test]
fn renders_html() {
    let doc = MemoryDocument::with_location(PageLocation::new(
        "https://shop.example.com/cart",
        "/cart",
        "Cart",
    ));
    doc.insert_script(ScriptElement::external("l", "https://cdn/x.js"), &ScriptPosition::HeadStart)
        .unwrap();
    doc.append_fallback("f", "<img />").unwrap();

    assert_eq!(
        doc.to_html(),
        r#"<html><head><title>Cart</title><script id="l" async src="https://cdn/x.js"></script></head><body><noscript id="f"><img /></noscript></body></html>"#
    );
}

#[test]
fn navigate_updates_location() {
    let doc = MemoryDocument::new();
    assert_eq!(doc.location().href, "about:blank");

    doc.navigate(PageLocation::new("https://a.example.com/p", "/p", "P"));
    let loc = doc.location();
    assert_eq!(loc.path, "/p");
    assert_eq!(loc.title, "P");
}
