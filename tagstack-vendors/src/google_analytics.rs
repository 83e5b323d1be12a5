//! Google Analytics 4 adapter.
//!
//! Injects the async `gtag.js` loader at the start of `<head>` followed by an
//! inline script that defines `dataLayer`/`gtag` and configures the
//! measurement ID.

use crate::client::{VendorCall, VendorClient};
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{is_valid_vendor_id, TagProvider};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tagstack_dom::{DocumentMutator, ScriptElement, ScriptPosition};
use tagstack_types::{now_millis, Params, Vendor};
use tracing::{debug, error, info, warn};

/// Matches the loader's `src`, including copies injected by other code.
pub const LOADER_SRC_PATTERN: &str = "googletagmanager.com/gtag";

/// Prefix shared by the ids of every script this adapter injects.
pub const SCRIPT_ID_PREFIX: &str = "tagstack-ga4";

const LOADER_ID: &str = "tagstack-ga4-loader";
const CONFIG_ID: &str = "tagstack-ga4-config";

fn loader_url(measurement_id: &str) -> String {
    format!("https://www.googletagmanager.com/gtag/js?id={measurement_id}")
}

fn config_snippet(measurement_id: &str) -> String {
    format!(
        "window.dataLayer = window.dataLayer || [];\n\
         function gtag(){{dataLayer.push(arguments);}}\n\
         gtag('js', new Date());\n\
         gtag('config', '{measurement_id}', {{\n  \
           page_title: document.title,\n  \
           page_location: window.location.href\n\
         }});"
    )
}

/// GA4 adapter.
pub struct GoogleAnalytics {
    document: Arc<dyn DocumentMutator>,
    client: Arc<dyn VendorClient>,
    measurement_id: Option<String>,
    initialized: bool,
}

impl GoogleAnalytics {
    pub fn new(document: Arc<dyn DocumentMutator>, client: Arc<dyn VendorClient>) -> Self {
        Self {
            document,
            client,
            measurement_id: None,
            initialized: false,
        }
    }

    fn init_error(source: tagstack_dom::DomError) -> ProviderError {
        ProviderError::Initialization {
            vendor: Vendor::GoogleAnalytics,
            source,
        }
    }

    fn remove_scripts(&self) -> ProviderResult<usize> {
        let loaders = self
            .document
            .remove_scripts_matching(LOADER_SRC_PATTERN)
            .map_err(Self::init_error)?;
        let owned = self
            .document
            .remove_scripts_matching(SCRIPT_ID_PREFIX)
            .map_err(Self::init_error)?;
        Ok(loaders + owned)
    }

    fn inject(&self, measurement_id: &str) -> ProviderResult<()> {
        let stale = self.remove_scripts()?;
        if stale > 0 {
            debug!(removed = stale, "GA4: Removed stale scripts");
        }

        self.document
            .insert_script(
                ScriptElement::external(LOADER_ID, loader_url(measurement_id)),
                &ScriptPosition::HeadStart,
            )
            .map_err(Self::init_error)?;
        self.document
            .insert_script(
                ScriptElement::inline(CONFIG_ID, config_snippet(measurement_id)),
                &ScriptPosition::After(LOADER_ID.to_string()),
            )
            .map_err(Self::init_error)?;

        self.client.install().map_err(|source| ProviderError::Client {
            vendor: Vendor::GoogleAnalytics,
            source,
        })
    }
}

#[async_trait]
impl TagProvider for GoogleAnalytics {
    fn vendor(&self) -> Vendor {
        Vendor::GoogleAnalytics
    }

    fn vendor_id(&self) -> Option<&str> {
        self.measurement_id.as_deref()
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    async fn initialize(&mut self, measurement_id: &str) -> ProviderResult<()> {
        let measurement_id = measurement_id.trim();
        if measurement_id.is_empty() {
            warn!("GA4: No measurement ID provided");
            return Ok(());
        }
        if !is_valid_vendor_id(measurement_id) {
            return Err(ProviderError::InvalidId {
                vendor: Vendor::GoogleAnalytics,
                id: measurement_id.to_string(),
            });
        }

        if self.initialized {
            if self.measurement_id.as_deref() == Some(measurement_id) {
                return Ok(());
            }
            info!(from = ?self.measurement_id, to = %measurement_id, "GA4: Switching measurement ID");
            self.destroy();
        }

        if let Err(e) = self.inject(measurement_id) {
            error!(error = %e, "GA4: Initialization failed");
            if let Err(cleanup) = self.remove_scripts() {
                warn!(error = %cleanup, "GA4: Could not remove partial injection");
            }
            return Err(e);
        }

        self.measurement_id = Some(measurement_id.to_string());
        self.initialized = true;
        info!(measurement_id = %measurement_id, "GA4: Initialized");
        Ok(())
    }

    fn track_event(&self, event_name: &str, params: Option<&Params>) {
        if !self.initialized {
            warn!(event = %event_name, "GA4: Not initialized, skipping event");
            return;
        }

        let mut params = params.cloned().unwrap_or_default();
        params.insert("timestamp".into(), Value::from(now_millis()));

        let call = VendorCall::new("event").target(event_name).params(params);
        match self.client.call(call) {
            Ok(()) => debug!(event = %event_name, "GA4: Event tracked"),
            Err(e) => error!(event = %event_name, error = %e, "GA4: Event tracking failed"),
        }
    }

    fn track_page_view(&self, path: Option<&str>, title: Option<&str>) {
        if !self.initialized {
            return;
        }

        let location = self.document.location();
        let mut params = Params::new();
        params.insert(
            "page_title".into(),
            Value::from(title.unwrap_or(location.title.as_str())),
        );
        params.insert(
            "page_location".into(),
            Value::from(path.unwrap_or(location.href.as_str())),
        );
        params.insert(
            "page_path".into(),
            Value::from(path.unwrap_or(location.path.as_str())),
        );
        self.track_event("page_view", Some(&params));
    }

    fn supports_user_properties(&self) -> bool {
        true
    }

    fn set_user_properties(&self, properties: &Params) {
        if !self.initialized {
            return;
        }

        match self.client.call(VendorCall::new("set").params(properties.clone())) {
            Ok(()) => debug!(count = properties.len(), "GA4: User properties set"),
            Err(e) => error!(error = %e, "GA4: Set user properties failed"),
        }
    }

    fn destroy(&mut self) {
        if let Err(e) = self.remove_scripts() {
            warn!(error = %e, "GA4: Failed to remove scripts during destroy");
        }
        self.initialized = false;
        self.measurement_id = None;
        debug!("GA4: Destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_url_embeds_id() {
        assert_eq!(
            loader_url("G-ABC"),
            "https://www.googletagmanager.com/gtag/js?id=G-ABC"
        );
        assert!(loader_url("G-ABC").contains(LOADER_SRC_PATTERN));
    }

    #[test]
    fn config_snippet_configures_id() {
        let snippet = config_snippet("G-ABC");
        assert!(snippet.contains("gtag('config', 'G-ABC'"));
        assert!(snippet.contains("window.dataLayer = window.dataLayer || [];"));
    }

    #[test]
    fn owned_ids_share_prefix() {
        assert!(LOADER_ID.starts_with(SCRIPT_ID_PREFIX));
        assert!(CONFIG_ID.starts_with(SCRIPT_ID_PREFIX));
    }
}
