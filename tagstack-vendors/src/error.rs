//! Error types for vendor adapters.

use tagstack_dom::DomError;
use tagstack_types::Vendor;
use thiserror::Error;

/// Result type for adapter operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced by [`TagProvider::initialize`](crate::TagProvider::initialize).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The document rejected script or fallback injection.
    #[error("{vendor} initialization failed: {source}")]
    Initialization {
        vendor: Vendor,
        #[source]
        source: DomError,
    },

    /// The vendor's global function could not be installed.
    #[error("{vendor} client error: {source}")]
    Client {
        vendor: Vendor,
        #[source]
        source: ClientError,
    },

    /// The identifier contains characters that cannot be embedded in a tag.
    #[error("invalid {vendor} identifier: {id:?}")]
    InvalidId { vendor: Vendor, id: String },
}

/// Errors raised by a [`VendorClient`](crate::VendorClient).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The vendor's global function is not present.
    #[error("vendor function not loaded: {0}")]
    NotLoaded(String),

    /// The vendor function threw.
    #[error("vendor call rejected: {0}")]
    Rejected(String),

    /// Parameters could not be encoded for the vendor.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}
