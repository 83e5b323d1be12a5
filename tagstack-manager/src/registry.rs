//! Application tracking registry.
//!
//! Maps application names to their [`TrackingConfig`]. The builtin table
//! resolves vendor identifiers from the environment:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `TAGSTACK_GA_<APP>_ID` | GA4 measurement ID |
//! | `TAGSTACK_META_PIXEL_<APP>_ID` | Meta Pixel ID |
//!
//! A registry can also be loaded from a TOML file:
//!
//! ```toml
//! [apps.catalog]
//! google_analytics = "G-TEST123"
//! enabled = true
//! events = ["page_view", "add_to_cart"]
//!
//! [apps.catalog.custom_dimensions]
//! app_type = "catalog"
//! ```

use crate::error::{TagManagerError, TagManagerResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tagstack_types::{TrackingConfig, Vendor};
use tracing::{info, warn};

/// Version reported in the builtin `app_version` dimension.
pub const BUILTIN_APP_VERSION: &str = "1.1.2";

/// Name of the environment variable holding `vendor`'s identifier for `app`.
#[must_use]
pub fn env_var_name(vendor: Vendor, app: &str) -> String {
    format!("TAGSTACK_{}_{}_ID", vendor.env_key(), app.to_uppercase())
}

/// Immutable lookup table from application name to tracking configuration.
#[derive(Debug, Clone, Default)]
pub struct TrackingRegistry {
    apps: HashMap<String, TrackingConfig>,
}

impl TrackingRegistry {
    /// An empty registry; every lookup yields a disabled configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// The builtin table with vendor identifiers read from the process
    /// environment.
    pub fn builtin() -> Self {
        Self::builtin_with(|key| std::env::var(key).ok())
    }

    /// The builtin table with vendor identifiers resolved through `lookup`.
    /// Unset or blank values leave the vendor unconfigured.
    pub fn builtin_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let tracked: [(&str, &[&str]); 3] = [
            ("corporate", &["page_view", "contact_form", "download", "service_inquiry"]),
            ("blog", &["page_view", "article_read", "share", "comment", "newsletter_signup"]),
            ("catalog", &["page_view", "product_view", "add_to_cart", "purchase", "search"]),
        ];

        let mut registry = Self::new();
        for (app, events) in tracked {
            let mut config = TrackingConfig::enabled(events.iter().copied())
                .with_dimension("app_version", BUILTIN_APP_VERSION)
                .with_dimension("app_type", app);
            for vendor in Vendor::ALL {
                if let Some(id) = lookup(&env_var_name(vendor, app)).filter(|v| !v.trim().is_empty()) {
                    config = config.with_vendor(vendor, id.trim());
                }
            }
            registry.insert(app, config);
        }

        // Internal dashboards are never tracked.
        registry.insert("technical", TrackingConfig::disabled());
        registry.insert("tracking", TrackingConfig::disabled());
        registry
    }

    /// Parses a registry from TOML text.
    pub fn from_toml_str(contents: &str) -> TagManagerResult<Self> {
        let file: RegistryFile = toml::from_str(contents)?;
        Ok(Self { apps: file.apps })
    }

    /// Loads a registry from a TOML file.
    pub fn load_from(path: &Path) -> TagManagerResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| TagManagerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_toml_str(&contents).map_err(|e| TagManagerError::Registry {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!(path = ?path, apps = registry.len(), "Loaded tracking registry");
        Ok(registry)
    }

    /// Loads a registry from `path`, falling back to [`builtin`](Self::builtin)
    /// with a warning when the file is missing or invalid.
    pub fn load_or_builtin(path: &Path) -> Self {
        if !path.exists() {
            info!(path = ?path, "No registry file found, using builtin registry");
            return Self::builtin();
        }
        match Self::load_from(path) {
            Ok(registry) => registry,
            Err(e) => {
                warn!(error = %e, "Falling back to builtin registry");
                Self::builtin()
            }
        }
    }

    /// Adds or replaces an application's configuration.
    pub fn insert(&mut self, app: impl Into<String>, config: TrackingConfig) -> Option<TrackingConfig> {
        self.apps.insert(app.into(), config)
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_app(mut self, app: impl Into<String>, config: TrackingConfig) -> Self {
        self.insert(app, config);
        self
    }

    /// Returns the application's configuration, or a disabled one for
    /// unknown applications.
    #[must_use]
    pub fn get_config(&self, app: &str) -> TrackingConfig {
        self.apps.get(app).cloned().unwrap_or_else(TrackingConfig::disabled)
    }

    #[must_use]
    pub fn contains(&self, app: &str) -> bool {
        self.apps.contains_key(app)
    }

    /// Registered application names, sorted.
    #[must_use]
    pub fn apps(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.apps.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

/// Raw TOML structure of a registry file.
#[derive(Deserialize)]
struct RegistryFile {
    #[serde(default)]
    apps: HashMap<String, TrackingConfig>,
}
