//! Supported tracking vendors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A third-party tracking vendor.
///
/// Declaration order is the initialization order: the analytics tag always
/// lands in the document before the pixel tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    /// Google Analytics 4 (`gtag.js`).
    GoogleAnalytics,
    /// Meta (Facebook) Pixel (`fbevents.js`).
    MetaPixel,
}

impl Vendor {
    /// Every vendor, in initialization order.
    pub const ALL: [Vendor; 2] = [Vendor::GoogleAnalytics, Vendor::MetaPixel];

    /// Human-readable vendor name used in logs.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Vendor::GoogleAnalytics => "GA4",
            Vendor::MetaPixel => "Meta Pixel",
        }
    }

    /// The primary vendor receives `app_name`-enriched events.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        matches!(self, Vendor::GoogleAnalytics)
    }

    /// Suffix used when resolving the vendor's identifier from the environment.
    #[must_use]
    pub const fn env_key(&self) -> &'static str {
        match self {
            Vendor::GoogleAnalytics => "GA",
            Vendor::MetaPixel => "META_PIXEL",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
