//! Per-application tag orchestration.
//!
//! [`TagManager`] is the single entry point for tracking. It resolves an
//! application's [`TrackingConfig`](tagstack_types::TrackingConfig) from a
//! [`TrackingRegistry`], initializes the vendor adapters that configuration
//! names, and fans tracking calls out to them:
//!
//! - `track_event` is gated by the application's event allow-list
//! - `track_page_view`, `track_conversion` and `track_custom_event` are not
//! - unknown and disabled applications never reach a vendor
//!
//! [`PageTracker`] binds a shared manager to the lifetime of a mounted view.
//!
//! ```
//! use std::sync::Arc;
//! use tagstack_dom::MemoryDocument;
//! use tagstack_manager::{TagManager, TagManagerOptions, TrackingRegistry};
//! use tagstack_types::{TrackingConfig, Vendor};
//! use tagstack_vendors::RecordingClient;
//!
//! let registry = TrackingRegistry::new().with_app(
//!     "catalog",
//!     TrackingConfig::enabled(["page_view", "add_to_cart"])
//!         .with_vendor(Vendor::GoogleAnalytics, "G-TEST123"),
//! );
//! let document = Arc::new(MemoryDocument::new());
//! let gtag = Arc::new(RecordingClient::new());
//! let mut manager = TagManager::with_vendors(
//!     registry,
//!     document.clone(),
//!     gtag.clone(),
//!     Arc::new(RecordingClient::new()),
//! );
//!
//! tokio_test::block_on(manager.initialize("catalog", TagManagerOptions::default())).unwrap();
//! assert!(manager.is_tracking_enabled());
//!
//! manager.track_event("purchase", None);
//! assert!(gtag.calls_with_command("event").is_empty());
//!
//! tokio_test::block_on(manager.cleanup());
//! assert!(document.scripts().is_empty());
//! ```

mod error;
mod manager;
mod registry;
mod session;

pub use error::{TagManagerError, TagManagerResult};
pub use manager::{SharedTagManager, TagManager, TagManagerOptions, DEFAULT_CURRENCY};
pub use registry::{env_var_name, TrackingRegistry, BUILTIN_APP_VERSION};
pub use session::{PageTracker, PageTrackerOptions};
