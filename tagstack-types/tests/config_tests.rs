use pretty_assertions::assert_eq;
use tagstack_types::{TrackingConfig, Vendor};

// ── Construction ──────────────────────────────────────────────────

#[test]
fn disabled_config_is_empty() {
    let config = TrackingConfig::disabled();
    assert!(!config.enabled);
    assert!(config.events.is_empty());
    assert!(config.google_analytics.is_none());
    assert!(config.meta_pixel.is_none());
    assert!(config.dimensions().is_none());
}

#[test]
fn enabled_config_collects_allow_list() {
    let config = TrackingConfig::enabled(["page_view", "add_to_cart", "page_view"]);
    assert!(config.enabled);
    assert_eq!(config.events.len(), 2);
    assert!(config.allows_event("add_to_cart"));
    assert!(!config.allows_event("purchase"));
}

// ── Vendor identifiers ────────────────────────────────────────────

#[test]
fn vendor_ids_follow_declaration_order() {
    let config = TrackingConfig::enabled(["page_view"])
        .with_vendor(Vendor::MetaPixel, "987")
        .with_vendor(Vendor::GoogleAnalytics, "G-TEST123");

    let vendors: Vec<_> = config.configured_vendors().collect();
    assert_eq!(
        vendors,
        vec![(Vendor::GoogleAnalytics, "G-TEST123"), (Vendor::MetaPixel, "987")]
    );
}

#[test]
fn blank_vendor_id_counts_as_unset() {
    let config = TrackingConfig::enabled(["page_view"])
        .with_vendor(Vendor::GoogleAnalytics, "")
        .with_vendor(Vendor::MetaPixel, "   ");

    assert_eq!(config.vendor_id(Vendor::GoogleAnalytics), None);
    assert_eq!(config.vendor_id(Vendor::MetaPixel), None);
    assert_eq!(config.configured_vendors().count(), 0);
}

#[test]
fn primary_vendor_is_analytics() {
    assert!(Vendor::GoogleAnalytics.is_primary());
    assert!(!Vendor::MetaPixel.is_primary());
    assert_eq!(Vendor::ALL[0], Vendor::GoogleAnalytics);
}

// ── Dimensions ────────────────────────────────────────────────────

#[test]
fn dimensions_accumulate() {
    let config = TrackingConfig::enabled(["page_view"])
        .with_dimension("app_version", "1.1.2")
        .with_dimension("app_type", "catalog");

    let dims = config.dimensions().unwrap();
    assert_eq!(dims.get("app_type").map(String::as_str), Some("catalog"));
    assert_eq!(dims.len(), 2);
}

// ── Serde ─────────────────────────────────────────────────────────

#[test]
fn deserializes_with_defaults() {
    let config: TrackingConfig = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
    assert!(config.enabled);
    assert!(config.events.is_empty());
    assert!(config.custom_dimensions.is_none());
}

#[test]
fn accepts_allowed_events_alias() {
    let config: TrackingConfig =
        serde_json::from_str(r#"{"enabled": true, "allowed_events": ["search"]}"#).unwrap();
    assert!(config.allows_event("search"));
}

#[test]
fn vendor_serializes_snake_case() {
    let json = serde_json::to_string(&Vendor::MetaPixel).unwrap();
    assert_eq!(json, r#""meta_pixel""#);
}
