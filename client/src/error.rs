//! Client error type.

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with an error status.
    #[error("{message} ({status})")]
    Api { status: StatusCode, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Input rejected before reaching the server.
    #[error(transparent)]
    Invalid(#[from] fleet_engine::Error),
}

impl ClientError {
    /// Text to show the operator.
    pub fn message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            ClientError::Invalid(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
