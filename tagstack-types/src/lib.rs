//! Core type definitions for tagstack.
//!
//! This crate defines the vendor-agnostic types shared by every layer of the
//! tag pipeline:
//! - Per-application tracking configuration
//! - The set of supported tracking vendors
//! - Event parameter maps and timestamp helpers
//!
//! Nothing here touches a document or a vendor runtime.

mod config;
mod params;
mod vendor;

pub use config::TrackingConfig;
pub use params::{merge_params, now_millis, params_from, Params};
pub use vendor::Vendor;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("expected a JSON object for event parameters, got {0}")]
    NotAnObject(&'static str),
}
