//! Tag orchestration across vendor adapters.
//!
//! The [`TagManager`] owns one adapter per vendor and the active
//! application's configuration:
//!
//! ```text
//! UNINITIALIZED   --initialize(app, enabled)---> ACTIVE(app)
//! UNINITIALIZED   --initialize(app, disabled)--> DISABLED(app)
//! ACTIVE(app)     --initialize(app)------------> ACTIVE(app)    (no-op)
//! ACTIVE(a)       --initialize(b, enabled)-----> ACTIVE(b)      (cleanup of a first)
//! ACTIVE(a)       --initialize(b, disabled)----> DISABLED(b)    (adapters untouched, calls gated)
//! ACTIVE/DISABLED --cleanup--------------------> UNINITIALIZED
//! ```
//!
//! `initialize` and `cleanup` take `&mut self`, so a single owner can never
//! interleave them. Hosts with several callers share a
//! [`SharedTagManager`], which serializes them behind an async mutex.

use crate::error::TagManagerResult;
use crate::registry::TrackingRegistry;
use serde_json::Value;
use std::sync::Arc;
use tagstack_dom::DocumentMutator;
use tagstack_types::{merge_params, now_millis, Params, TrackingConfig, Vendor};
use tagstack_vendors::{GoogleAnalytics, MetaPixel, TagProvider, VendorClient};
use tokio::sync::Mutex;
use tracing::{error, info, trace, warn};

/// Default currency for conversions.
pub const DEFAULT_CURRENCY: &str = "USD";

/// A tag manager shared between callers.
pub type SharedTagManager = Arc<Mutex<TagManager>>;

/// Emits orchestration diagnostics at `info` when logging is enabled and at
/// `trace` otherwise.
macro_rules! diag {
    ($self:expr, $($arg:tt)+) => {
        if $self.logging_enabled {
            info!($($arg)+)
        } else {
            trace!($($arg)+)
        }
    };
}

/// Options for [`TagManager::initialize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagManagerOptions {
    /// Log orchestration decisions at `info` level.
    pub logging_enabled: bool,
}

/// Single entry point for tracking calls.
pub struct TagManager {
    registry: TrackingRegistry,
    /// Sorted by vendor, which is the initialization order.
    providers: Vec<Box<dyn TagProvider>>,
    current_app: Option<String>,
    config: Option<TrackingConfig>,
    /// Adapters were initialized for an enabled app and may hold markup.
    initialized: bool,
    logging_enabled: bool,
}

impl TagManager {
    /// Creates a manager over the given adapters.
    pub fn new(registry: TrackingRegistry, mut providers: Vec<Box<dyn TagProvider>>) -> Self {
        providers.sort_by_key(|p| p.vendor());
        Self {
            registry,
            providers,
            current_app: None,
            config: None,
            initialized: false,
            logging_enabled: false,
        }
    }

    /// Creates a manager with the GA4 and Meta Pixel adapters sharing one
    /// document.
    pub fn with_vendors(
        registry: TrackingRegistry,
        document: Arc<dyn DocumentMutator>,
        gtag: Arc<dyn VendorClient>,
        fbq: Arc<dyn VendorClient>,
    ) -> Self {
        Self::new(
            registry,
            vec![
                Box::new(GoogleAnalytics::new(Arc::clone(&document), gtag)),
                Box::new(MetaPixel::new(document, fbq)),
            ],
        )
    }

    /// Wraps the manager for use from several callers.
    pub fn shared(self) -> SharedTagManager {
        Arc::new(Mutex::new(self))
    }

    pub fn registry(&self) -> &TrackingRegistry {
        &self.registry
    }

    /// The adapter for `vendor`, if one was registered.
    pub fn provider(&self, vendor: Vendor) -> Option<&dyn TagProvider> {
        self.providers
            .iter()
            .find(|p| p.vendor() == vendor)
            .map(|p| &**p)
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Activates tracking for `app_name`.
    ///
    /// Unknown applications resolve to a disabled configuration. A disabled
    /// application is recorded without touching any adapter. Switching to
    /// another enabled application tears the previous one down first, so at
    /// most one application's tags are live. On adapter failure every
    /// adapter is torn down and the manager is left uninitialized.
    pub async fn initialize(
        &mut self,
        app_name: &str,
        options: TagManagerOptions,
    ) -> TagManagerResult<()> {
        self.logging_enabled = options.logging_enabled;

        if self.initialized && self.current_app.as_deref() == Some(app_name) {
            diag!(self, app = %app_name, "TagManager: Already initialized");
            return Ok(());
        }

        let config = self.registry.get_config(app_name);
        if !config.enabled {
            // Adapters are left as they are; tracking calls are gated on
            // the recorded config.
            diag!(self, app = %app_name, "TagManager: Tracking disabled for app");
            self.current_app = Some(app_name.to_string());
            self.config = Some(config);
            return Ok(());
        }

        if self.initialized {
            diag!(self, from = ?self.current_app, to = %app_name, "TagManager: Switching application");
            self.cleanup().await;
        }

        let dimensions: Option<Params> = config.dimensions().map(|dims| {
            dims.iter()
                .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                .collect()
        });

        let mut failure = None;
        for (vendor, id) in config.configured_vendors() {
            let Some(provider) = self.providers.iter_mut().find(|p| p.vendor() == vendor) else {
                warn!(vendor = %vendor, "TagManager: No adapter registered for vendor");
                continue;
            };

            if let Err(e) = provider.initialize(id).await {
                failure = Some(e);
                break;
            }
            if let Some(dims) = &dimensions {
                if provider.supports_user_properties() {
                    provider.set_user_properties(dims);
                }
            }
        }

        if let Some(e) = failure {
            error!(app = %app_name, error = %e, "TagManager: Initialization failed");
            self.destroy_providers();
            self.reset();
            return Err(e.into());
        }

        self.current_app = Some(app_name.to_string());
        self.config = Some(config);
        self.initialized = true;
        diag!(self, app = %app_name, "TagManager: Initialized");
        Ok(())
    }

    /// Destroys every adapter and returns to the uninitialized state.
    /// Safe to call at any time.
    pub async fn cleanup(&mut self) {
        self.destroy_providers();
        self.reset();
        diag!(self, "TagManager: Cleanup completed");
    }

    fn destroy_providers(&mut self) {
        for provider in &mut self.providers {
            provider.destroy();
        }
    }

    fn reset(&mut self) {
        self.initialized = false;
        self.current_app = None;
        self.config = None;
    }

    // ── Tracking ─────────────────────────────────────────────────

    /// Returns the active config when tracking is live, logging the skip
    /// otherwise.
    fn live_config(&self, what: &str) -> Option<&TrackingConfig> {
        match &self.config {
            Some(config) if self.initialized && config.enabled => Some(config),
            _ => {
                diag!(self, call = %what, "TagManager: Not initialized or disabled, skipping");
                None
            }
        }
    }

    /// Adapters whose vendor has an identifier in `config`.
    fn configured<'a>(
        &'a self,
        config: &'a TrackingConfig,
    ) -> impl Iterator<Item = &'a dyn TagProvider> + 'a {
        self.providers
            .iter()
            .filter(move |p| config.vendor_id(p.vendor()).is_some())
            .map(|p| &**p)
    }

    fn app_name_value(&self) -> Value {
        self.current_app.as_deref().map_or(Value::Null, Value::from)
    }

    /// Records a page view with every configured vendor. Not subject to the
    /// event allow-list.
    pub fn track_page_view(&self, path: Option<&str>, title: Option<&str>) {
        let Some(config) = self.live_config("page_view") else {
            return;
        };
        for provider in self.configured(config) {
            provider.track_page_view(path, title);
        }
        diag!(self, path = ?path, title = ?title, "TagManager: Page view tracked");
    }

    /// Records an event if the active application allows it.
    ///
    /// The primary vendor receives the parameters with `app_name` added;
    /// the others receive them unchanged.
    pub fn track_event(&self, event_name: &str, params: Option<&Params>) {
        let Some(config) = self.live_config(event_name) else {
            return;
        };
        if !config.allows_event(event_name) {
            diag!(self, event = %event_name, app = ?self.current_app, "TagManager: Event not configured for app");
            return;
        }

        let mut app = Params::new();
        app.insert("app_name".into(), self.app_name_value());
        let enriched = merge_params(params, app);

        for provider in self.configured(config) {
            if provider.vendor().is_primary() {
                provider.track_event(event_name, Some(&enriched));
            } else {
                provider.track_event(event_name, params);
            }
        }
        diag!(self, event = %event_name, "TagManager: Event tracked");
    }

    /// Records a conversion with every configured vendor. Conversions bypass
    /// the event allow-list.
    pub fn track_conversion(
        &self,
        conversion_type: &str,
        value: Option<f64>,
        currency: Option<&str>,
        params: Option<&Params>,
    ) {
        let Some(config) = self.live_config(conversion_type) else {
            return;
        };

        let mut extra = Params::new();
        if let Some(value) = value {
            extra.insert("value".into(), Value::from(value));
        }
        extra.insert(
            "currency".into(),
            Value::from(currency.unwrap_or(DEFAULT_CURRENCY)),
        );
        extra.insert("app_name".into(), self.app_name_value());
        let data = merge_params(params, extra);

        for provider in self.configured(config) {
            provider.track_event(conversion_type, Some(&data));
        }
        diag!(self, conversion = %conversion_type, "TagManager: Conversion tracked");
    }

    /// Records a vendor-specific custom event. Bypasses the event allow-list.
    pub fn track_custom_event(&self, event_name: &str, params: Option<&Params>) {
        let Some(config) = self.live_config(event_name) else {
            return;
        };
        for provider in self.configured(config) {
            provider.track_custom_event(event_name, params);
        }
        diag!(self, event = %event_name, "TagManager: Custom event tracked");
    }

    /// Sets user properties, enriched with `app_name` and a timestamp, on
    /// every configured vendor that has a user-properties API.
    pub fn set_user_properties(&self, properties: &Params) {
        let Some(config) = self.live_config("user_properties") else {
            return;
        };

        let mut extra = Params::new();
        extra.insert("app_name".into(), self.app_name_value());
        extra.insert("timestamp".into(), Value::from(now_millis()));
        let enriched = merge_params(Some(properties), extra);

        for provider in self.configured(config) {
            if provider.supports_user_properties() {
                provider.set_user_properties(&enriched);
            }
        }
        diag!(self, count = enriched.len(), "TagManager: User properties set");
    }

    // ── Accessors ────────────────────────────────────────────────

    /// The resolved configuration of the current application.
    pub fn get_config(&self) -> Option<&TrackingConfig> {
        self.config.as_ref()
    }

    /// Whether tracking calls currently reach any vendor.
    pub fn is_tracking_enabled(&self) -> bool {
        self.initialized && self.config.as_ref().is_some_and(|c| c.enabled)
    }

    pub fn current_app(&self) -> Option<&str> {
        self.current_app.as_deref()
    }
}
