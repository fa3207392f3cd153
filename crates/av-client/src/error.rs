use thiserror::Error;

/// Everything that can go wrong between the submit button and a decoded result.
///
/// `Backend` carries the backend's `detail` message verbatim so the UI can
/// surface it unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    Backend(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    /// Short label for logs; the user-facing text comes from `Display`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Transport(_) => "transport",
            Self::Backend(_) => "backend",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}
