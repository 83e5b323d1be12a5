use crate::error::ProviderResult;
use async_trait::async_trait;
use tagstack_types::{Params, Vendor};

/// Lifecycle contract shared by every vendor adapter.
///
/// `initialize` is the only fallible operation. Tracking calls made before
/// initialization are skipped with a warning; `destroy` always succeeds and
/// may be called any number of times.
#[async_trait]
pub trait TagProvider: Send + Sync {
    /// The vendor this adapter wraps.
    fn vendor(&self) -> Vendor;

    /// The identifier the adapter is currently initialized with.
    fn vendor_id(&self) -> Option<&str>;

    fn is_initialized(&self) -> bool;

    /// Injects the vendor's bootstrap markup.
    ///
    /// An empty identifier is a successful no-op. Re-initializing with the
    /// same identifier is a no-op; a different identifier tears the old
    /// integration down first.
    async fn initialize(&mut self, vendor_id: &str) -> ProviderResult<()>;

    /// Sends an event, translated to the vendor's vocabulary.
    fn track_event(&self, event_name: &str, params: Option<&Params>);

    /// Sends a page view; missing values default to the document location.
    fn track_page_view(&self, path: Option<&str>, title: Option<&str>);

    /// Sends a vendor-specific custom event. Falls back to `track_event`.
    fn track_custom_event(&self, event_name: &str, params: Option<&Params>) {
        self.track_event(event_name, params);
    }

    /// Whether the vendor exposes a user/context properties API.
    fn supports_user_properties(&self) -> bool {
        false
    }

    fn set_user_properties(&self, properties: &Params) {
        let _ = properties;
    }

    /// Removes every piece of injected markup and resets the adapter.
    fn destroy(&mut self);
}

/// Identifiers are embedded in URLs and inline scripts, so only ASCII
/// alphanumerics, `-` and `_` are accepted.
#[must_use]
pub fn is_valid_vendor_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
