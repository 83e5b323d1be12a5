//! Page-level binding over a shared [`TagManager`](crate::TagManager).
//!
//! A [`PageTracker`] follows the lifetime of one mounted view: it initializes
//! tracking for its application on mount, records a page view whenever the
//! path changes, and tears tracking down on unmount.

use crate::manager::{SharedTagManager, TagManagerOptions};
use tagstack_dom::PageLocation;
use tagstack_types::Params;
use tracing::{debug, error};

/// Options for a [`PageTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTrackerOptions {
    pub app_name: String,
    pub logging_enabled: bool,
    /// Record a page view on mount and on every path change.
    pub track_page_views: bool,
}

impl PageTrackerOptions {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            logging_enabled: false,
            track_page_views: true,
        }
    }

    #[must_use]
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    #[must_use]
    pub fn track_page_views(mut self, enabled: bool) -> Self {
        self.track_page_views = enabled;
        self
    }
}

/// Tracking handle for one mounted view.
///
/// Every tracking call is dropped while the tracker is not mounted.
pub struct PageTracker {
    manager: SharedTagManager,
    options: PageTrackerOptions,
    mounted: bool,
    current_path: Option<String>,
}

impl PageTracker {
    pub fn new(manager: SharedTagManager, options: PageTrackerOptions) -> Self {
        Self {
            manager,
            options,
            mounted: false,
            current_path: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Path of the last recorded page view.
    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    /// Initializes tracking for the configured application and records the
    /// initial page view. A failed initialization is logged and leaves the
    /// tracker unmounted; calling `mount` again retries.
    pub async fn mount(&mut self, location: &PageLocation) {
        if self.mounted {
            return;
        }

        let mut manager = self.manager.lock().await;
        let options = TagManagerOptions {
            logging_enabled: self.options.logging_enabled,
        };
        if let Err(e) = manager.initialize(&self.options.app_name, options).await {
            error!(app = %self.options.app_name, error = %e, "PageTracker: Initialization failed");
            return;
        }
        self.mounted = true;

        if self.options.track_page_views {
            manager.track_page_view(Some(location.path.as_str()), Some(location.title.as_str()));
            self.current_path = Some(location.path.clone());
        }
        debug!(app = %self.options.app_name, path = %location.path, "PageTracker: Mounted");
    }

    /// Records a page view if the path differs from the last one recorded.
    pub async fn navigate(&mut self, location: &PageLocation) {
        if !self.mounted || !self.options.track_page_views {
            return;
        }
        if self.current_path.as_deref() == Some(location.path.as_str()) {
            return;
        }

        self.manager
            .lock()
            .await
            .track_page_view(Some(location.path.as_str()), Some(location.title.as_str()));
        self.current_path = Some(location.path.clone());
    }

    /// Tears tracking down. Does nothing if the tracker never mounted.
    pub async fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.manager.lock().await.cleanup().await;
        self.mounted = false;
        self.current_path = None;
        debug!(app = %self.options.app_name, "PageTracker: Unmounted");
    }

    // ── Forwarding ───────────────────────────────────────────────

    pub async fn track_event(&self, event_name: &str, params: Option<&Params>) {
        if self.mounted {
            self.manager.lock().await.track_event(event_name, params);
        }
    }

    pub async fn track_page_view(&self, path: Option<&str>, title: Option<&str>) {
        if self.mounted {
            self.manager.lock().await.track_page_view(path, title);
        }
    }

    pub async fn track_conversion(
        &self,
        conversion_type: &str,
        value: Option<f64>,
        currency: Option<&str>,
        params: Option<&Params>,
    ) {
        if self.mounted {
            self.manager
                .lock()
                .await
                .track_conversion(conversion_type, value, currency, params);
        }
    }

    pub async fn track_custom_event(&self, event_name: &str, params: Option<&Params>) {
        if self.mounted {
            self.manager.lock().await.track_custom_event(event_name, params);
        }
    }

    pub async fn set_user_properties(&self, properties: &Params) {
        if self.mounted {
            self.manager.lock().await.set_user_properties(properties);
        }
    }

    /// Whether the shared manager is currently tracking.
    pub async fn is_enabled(&self) -> bool {
        self.manager.lock().await.is_tracking_enabled()
    }

    pub async fn current_app(&self) -> Option<String> {
        self.manager.lock().await.current_app().map(str::to_string)
    }
}
