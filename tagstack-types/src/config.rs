//! Per-application tracking configuration.

use crate::vendor::Vendor;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Tracking settings for one application.
///
/// Built once when the registry is assembled and never mutated afterwards.
/// `events` gates only generic event tracking; page views, conversions and
/// custom events are forwarded regardless of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Google Analytics measurement ID (e.g. `G-XXXXXXX`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_analytics: Option<String>,

    /// Meta Pixel ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_pixel: Option<String>,

    /// Master switch. A disabled application is never tracked.
    #[serde(default)]
    pub enabled: bool,

    /// Event names allowed through `track_event`.
    #[serde(default, alias = "allowed_events")]
    pub events: BTreeSet<String>,

    /// Static dimensions applied as user properties on initialization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_dimensions: Option<BTreeMap<String, String>>,
}

impl TrackingConfig {
    /// The configuration used for applications missing from the registry.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// An enabled configuration with the given allow-list and no vendors.
    pub fn enabled<I, S>(events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: true,
            events: events.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the identifier for a vendor.
    #[must_use]
    pub fn with_vendor(mut self, vendor: Vendor, id: impl Into<String>) -> Self {
        let id = Some(id.into());
        match vendor {
            Vendor::GoogleAnalytics => self.google_analytics = id,
            Vendor::MetaPixel => self.meta_pixel = id,
        }
        self
    }

    /// Adds a custom dimension.
    #[must_use]
    pub fn with_dimension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_dimensions
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Returns the vendor's identifier. Empty strings count as unset.
    #[must_use]
    pub fn vendor_id(&self, vendor: Vendor) -> Option<&str> {
        let id = match vendor {
            Vendor::GoogleAnalytics => self.google_analytics.as_deref(),
            Vendor::MetaPixel => self.meta_pixel.as_deref(),
        };
        id.filter(|id| !id.trim().is_empty())
    }

    /// Vendors with an identifier, in initialization order.
    pub fn configured_vendors(&self) -> impl Iterator<Item = (Vendor, &str)> + '_ {
        Vendor::ALL
            .into_iter()
            .filter_map(|vendor| self.vendor_id(vendor).map(|id| (vendor, id)))
    }

    /// Whether `track_event` may forward this event name.
    #[must_use]
    pub fn allows_event(&self, event_name: &str) -> bool {
        self.events.contains(event_name)
    }

    /// Custom dimensions, if any were configured and non-empty.
    #[must_use]
    pub fn dimensions(&self) -> Option<&BTreeMap<String, String>> {
        self.custom_dimensions.as_ref().filter(|d| !d.is_empty())
    }
}
