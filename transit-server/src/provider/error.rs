//! Data provider error types.

use std::path::PathBuf;

use crate::domain::{StopId, TripId};

/// Errors that can occur when reading provider data.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Dataset file could not be read
    #[error("failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dataset is not valid JSON or does not match the schema
    #[error("invalid dataset: {0}")]
    Json(#[from] serde_json::Error),

    /// Stop unknown to the provider
    #[error("stop not found: {0}")]
    StopNotFound(StopId),

    /// Line unknown to the provider
    #[error("line not found: {0}")]
    LineNotFound(String),

    /// Trip unknown to the provider
    #[error("trip not found: {0}")]
    TripNotFound(TripId),
}
