use thiserror::Error;

use favesweep_core::MediaKind;

/// One resolved media asset reported by the analysis collaborator. An item
/// may yield zero, one or many of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHit {
    pub id: String,
    pub url: String,
    pub kind: MediaKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HarvestError {
    /// The run was cancelled before the scroll phase finished, so the set
    /// of identified items is incomplete and no media is returned.
    #[error("harvest cancelled during the scroll phase")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("invalid service url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("service returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed service payload: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Network(err.to_string())
    }
}
