use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location must not be empty")]
    Empty,
}

/// Why one provider query produced no usable data.
///
/// Never surfaces above the fetch orchestrator: every variant collapses into
/// an empty slot there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("undecodable payload: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Coarse split used in logs: `Status` counts as a transport failure since
    /// the request never produced a payload we could interpret.
    pub fn kind(&self) -> FetchFailureKind {
        match self {
            FetchError::Transport(_) | FetchError::Status { .. } => FetchFailureKind::Transport,
            FetchError::Decode(_) => FetchFailureKind::Decode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    Transport,
    Decode,
}

/// Body the provider sends alongside a non-success status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderErrorBody {
    pub error: String,
}

impl ProviderErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
