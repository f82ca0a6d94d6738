//! Error types for inference calls
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Service reported failure: {0}")]
    Service(String),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// True for failures the remote service reported itself, as opposed to transport or decoding
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Service(_))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
