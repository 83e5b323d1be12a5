//! Error types for the tag manager.

use std::path::PathBuf;
use tagstack_vendors::ProviderError;
use thiserror::Error;

/// Result type for tag manager operations.
pub type TagManagerResult<T> = Result<T, TagManagerError>;

#[derive(Debug, Error)]
pub enum TagManagerError {
    /// A vendor adapter failed to initialize.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The registry file could not be read.
    #[error("failed to read registry {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The registry file is not valid TOML or has the wrong shape.
    #[error("invalid registry {path:?}: {message}")]
    Registry { path: PathBuf, message: String },

    #[error("invalid registry: {0}")]
    Parse(#[from] toml::de::Error),
}
