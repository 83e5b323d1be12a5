//! Meta Pixel adapter.
//!
//! Injects the inline `fbevents.js` bootstrap right after the GA4 scripts (or
//! at the start of `<head>` without them) and a `<noscript>` tracking pixel
//! at the end of `<body>`.
//!
//! Placement keys on the GA4 script ids, not the `googletagmanager.com`
//! source, so the bootstrap follows the GA4 inline config as well as the
//! loader: `ga4-loader, ga4-config, meta-pixel-base`.

use crate::client::{VendorCall, VendorClient};
use crate::error::{ProviderError, ProviderResult};
use crate::google_analytics;
use crate::provider::{is_valid_vendor_id, TagProvider};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tagstack_dom::{DocumentMutator, ScriptElement, ScriptPosition};
use tagstack_types::{Params, Vendor};
use tracing::{debug, error, info, warn};

/// Matches `fbevents.js` as loaded by the bootstrap.
pub const SDK_SRC_PATTERN: &str = "connect.facebook.net";

/// Matches the `<noscript>` pixel endpoint.
pub const FALLBACK_PATTERN: &str = "facebook.com/tr";

/// Prefix shared by the ids of everything this adapter injects.
pub const ID_PREFIX: &str = "tagstack-meta-pixel";

const BASE_CODE_ID: &str = "tagstack-meta-pixel-base";
const FALLBACK_ID: &str = "tagstack-meta-pixel-noscript";

/// Maps generic event names onto Meta's standard events. Unknown names pass
/// through unchanged.
#[must_use]
pub fn standard_event_name(event_name: &str) -> &str {
    match event_name {
        "page_view" => "PageView",
        "add_to_cart" => "AddToCart",
        "purchase" => "Purchase",
        "contact_form" => "Contact",
        "download" => "Download",
        "search" => "Search",
        "view_content" => "ViewContent",
        "lead" => "Lead",
        "complete_registration" => "CompleteRegistration",
        other => other,
    }
}

fn base_code(pixel_id: &str) -> String {
    format!(
        "!function(f,b,e,v,n,t,s)\n\
         {{if(f.fbq)return;n=f.fbq=function(){{n.callMethod?\n\
         n.callMethod.apply(n,arguments):n.queue.push(arguments)}};\n\
         if(!f._fbq)f._fbq=n;n.push=n;n.loaded=!0;n.version='2.0';\n\
         n.queue=[];t=b.createElement(e);t.async=!0;\n\
         t.src=v;s=b.getElementsByTagName(e)[0];\n\
         s.parentNode.insertBefore(t,s)}}(window, document,'script',\n\
         'https://connect.facebook.net/en_US/fbevents.js');\n\
         fbq('init', '{pixel_id}');\n\
         fbq('track', 'PageView');"
    )
}

fn fallback_markup(pixel_id: &str) -> String {
    format!(
        r#"<img height="1" width="1" style="display:none" src="https://www.facebook.com/tr?id={pixel_id}&ev=PageView&noscript=1" />"#
    )
}

/// Meta Pixel adapter.
pub struct MetaPixel {
    document: Arc<dyn DocumentMutator>,
    client: Arc<dyn VendorClient>,
    pixel_id: Option<String>,
    initialized: bool,
}

impl MetaPixel {
    pub fn new(document: Arc<dyn DocumentMutator>, client: Arc<dyn VendorClient>) -> Self {
        Self {
            document,
            client,
            pixel_id: None,
            initialized: false,
        }
    }

    fn init_error(source: tagstack_dom::DomError) -> ProviderError {
        ProviderError::Initialization {
            vendor: Vendor::MetaPixel,
            source,
        }
    }

    fn remove_markup(&self) -> ProviderResult<usize> {
        let mut removed = 0;
        for pattern in [SDK_SRC_PATTERN, ID_PREFIX] {
            removed += self
                .document
                .remove_scripts_matching(pattern)
                .map_err(Self::init_error)?;
        }
        for pattern in [FALLBACK_PATTERN, ID_PREFIX] {
            removed += self
                .document
                .remove_fallbacks_matching(pattern)
                .map_err(Self::init_error)?;
        }
        Ok(removed)
    }

    fn inject(&self, pixel_id: &str) -> ProviderResult<()> {
        let stale = self.remove_markup()?;
        if stale > 0 {
            debug!(removed = stale, "Meta Pixel: Removed stale markup");
        }

        // After the last GA4-owned script, which is the inline config.
        self.document
            .insert_script(
                ScriptElement::inline(BASE_CODE_ID, base_code(pixel_id)),
                &ScriptPosition::AfterLastMatching(google_analytics::SCRIPT_ID_PREFIX.to_string()),
            )
            .map_err(Self::init_error)?;
        self.document
            .append_fallback(FALLBACK_ID, &fallback_markup(pixel_id))
            .map_err(Self::init_error)?;

        self.client.install().map_err(|source| ProviderError::Client {
            vendor: Vendor::MetaPixel,
            source,
        })
    }

    fn send(&self, command: &str, event_name: &str, params: Option<&Params>) {
        let mut call = VendorCall::new(command).target(event_name);
        if let Some(params) = params {
            call = call.params(params.clone());
        }
        match self.client.call(call) {
            Ok(()) => debug!(command, event = %event_name, "Meta Pixel: Event tracked"),
            Err(e) => error!(command, event = %event_name, error = %e, "Meta Pixel: Event tracking failed"),
        }
    }
}

#[async_trait]
impl TagProvider for MetaPixel {
    fn vendor(&self) -> Vendor {
        Vendor::MetaPixel
    }

    fn vendor_id(&self) -> Option<&str> {
        self.pixel_id.as_deref()
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    async fn initialize(&mut self, pixel_id: &str) -> ProviderResult<()> {
        let pixel_id = pixel_id.trim();
        if pixel_id.is_empty() {
            warn!("Meta Pixel: No pixel ID provided");
            return Ok(());
        }
        if !is_valid_vendor_id(pixel_id) {
            return Err(ProviderError::InvalidId {
                vendor: Vendor::MetaPixel,
                id: pixel_id.to_string(),
            });
        }

        if self.initialized {
            if self.pixel_id.as_deref() == Some(pixel_id) {
                return Ok(());
            }
            info!(from = ?self.pixel_id, to = %pixel_id, "Meta Pixel: Switching pixel ID");
            self.destroy();
        }

        if let Err(e) = self.inject(pixel_id) {
            error!(error = %e, "Meta Pixel: Initialization failed");
            if let Err(cleanup) = self.remove_markup() {
                warn!(error = %cleanup, "Meta Pixel: Could not remove partial injection");
            }
            return Err(e);
        }

        self.pixel_id = Some(pixel_id.to_string());
        self.initialized = true;
        info!(pixel_id = %pixel_id, "Meta Pixel: Initialized");
        Ok(())
    }

    fn track_event(&self, event_name: &str, params: Option<&Params>) {
        if !self.initialized {
            warn!(event = %event_name, "Meta Pixel: Not initialized, skipping event");
            return;
        }
        self.send("track", standard_event_name(event_name), params);
    }

    fn track_page_view(&self, path: Option<&str>, _title: Option<&str>) {
        if !self.initialized {
            return;
        }

        let location = self.document.location();
        let mut params = Params::new();
        params.insert(
            "page_path".into(),
            Value::from(path.unwrap_or(location.path.as_str())),
        );
        params.insert("page_url".into(), Value::from(location.href));
        self.track_event("page_view", Some(&params));
    }

    fn track_custom_event(&self, event_name: &str, params: Option<&Params>) {
        if !self.initialized {
            return;
        }
        self.send("trackCustom", event_name, params);
    }

    fn destroy(&mut self) {
        if let Err(e) = self.remove_markup() {
            warn!(error = %e, "Meta Pixel: Failed to remove markup during destroy");
        }
        self.client.reset();
        self.initialized = false;
        self.pixel_id = None;
        debug!("Meta Pixel: Destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardizes_known_names() {
        assert_eq!(standard_event_name("purchase"), "Purchase");
        assert_eq!(standard_event_name("contact_form"), "Contact");
        assert_eq!(standard_event_name("complete_registration"), "CompleteRegistration");
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(standard_event_name("article_read"), "article_read");
        assert_eq!(standard_event_name("Purchase"), "Purchase");
    }

    #[test]
    fn base_code_initializes_pixel() {
        let code = base_code("12345");
        assert!(code.contains("fbq('init', '12345');"));
        assert!(code.contains("https://connect.facebook.net/en_US/fbevents.js"));
    }

    #[test]
    fn fallback_points_at_pixel_endpoint() {
        let markup = fallback_markup("12345");
        assert!(markup.contains(FALLBACK_PATTERN));
        assert!(markup.contains("id=12345&ev=PageView&noscript=1"));
    }
}
