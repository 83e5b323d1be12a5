//! Tag adapters for third-party tracking vendors.
//!
//! Each vendor sits behind the same [`TagProvider`] contract:
//! `initialize` → `track_*` → `destroy`. An adapter owns two collaborators:
//!
//! - a [`DocumentMutator`](tagstack_dom::DocumentMutator) for script and
//!   fallback markup
//! - a [`VendorClient`] for the vendor's global tracking function
//!   (`gtag`, `fbq`)
//!
//! # Adapters
//!
//! - [`GoogleAnalytics`]: async `gtag.js` loader plus inline config script
//! - [`MetaPixel`]: inline `fbevents.js` bootstrap plus `<noscript>` pixel
//!
//! Tracking calls never fail from the caller's point of view: client errors
//! are logged and dropped.

mod client;
mod error;
pub mod google_analytics;
pub mod meta_pixel;
mod provider;
#[cfg(feature = "web")]
mod web;

pub use client::{NoopClient, RecordingClient, VendorCall, VendorClient};
pub use error::{ClientError, ProviderError, ProviderResult};
pub use google_analytics::GoogleAnalytics;
pub use meta_pixel::{standard_event_name, MetaPixel};
pub use provider::{is_valid_vendor_id, TagProvider};
#[cfg(feature = "web")]
pub use web::GlobalFunctionClient;
