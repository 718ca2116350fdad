use thiserror::Error;

/// Top-level error type for click tracking.
#[derive(Debug, Error)]
pub enum ClickTrackError {
    #[error("tracking transport error ({endpoint}): {message}")]
    Transport { endpoint: String, message: String },

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("unknown element: {0}")]
    UnknownElement(crate::types::ElementId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClickTrackError {
    pub fn transport(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }
}
