//! Sync error types.

use thiserror::Error;

use super::gate::Operation;
use crate::draft::DraftError;

/// Errors that can occur while talking to the remote store.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The configured endpoint is not a valid URL
    #[error("Invalid remote URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// Transport failure (DNS, connection refused, reset, ...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The remote answered with a non-success status
    #[error("Remote returned status {0}")]
    Status(reqwest::StatusCode),
    /// The remote answered with something other than a JSON array
    #[error("Unexpected remote payload: {0}")]
    Payload(String),
    /// The same operation is still running
    #[error("{0} is already in progress")]
    AlreadyInFlight(Operation),
    /// The local draft could not be updated
    #[error(transparent)]
    Draft(#[from] DraftError),
}

impl SyncError {
    /// True for failures reaching the remote or non-success responses.
    pub fn is_network_or_http(&self) -> bool {
        matches!(self, SyncError::Network(_) | SyncError::Status(_))
    }
}
