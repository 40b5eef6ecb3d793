//! Error types for the `PagerDuty` connector.

use thiserror::Error;

/// Errors returned by [`crate::PagerDutyClient`].
#[derive(Debug, Error)]
pub enum PagerDutyError {
    /// Request could not be sent or completed (network failure, timeout)
    #[error("execute request: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-200 response from the API
    #[error("PagerDuty API error: status={status} body={body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Client could not be constructed
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl PagerDutyError {
    /// HTTP status of an API error, if this is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors returned by a [`crate::DocumentStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Errors returned by the activity entry points, labelled with the failing stage.
#[derive(Debug, Error)]
pub enum ActivityError {
    /// Listing incidents failed, or the client could not be built
    #[error("list incidents: {0}")]
    ListIncidents(#[source] PagerDutyError),

    /// Fetching the single incident failed, or the client could not be built
    #[error("get incident: {0}")]
    GetIncident(#[source] PagerDutyError),

    /// The document store rejected the batch
    #[error("store documents: {0}")]
    StoreDocuments(#[source] StoreError),

    /// Activity input could not be decoded
    #[error("invalid activity input: {0}")]
    InvalidInput(#[source] serde_json::Error),

    /// Activity output could not be encoded
    #[error("encode activity output: {0}")]
    Output(#[source] serde_json::Error),

    /// No activity is registered under this name
    #[error("unknown activity: {0}")]
    UnknownActivity(String),
}

impl ActivityError {
    /// Whether the underlying failure was an HTTP 404 from the API.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ListIncidents(e) | Self::GetIncident(e) => e.status() == Some(404),
            _ => false,
        }
    }
}
