use thiserror::Error;

/// Failures scoped to the 3D preview. These never reach the job result
/// stores; the viewport surfaces them in its own error state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    #[error("failed to fetch asset: {0}")]
    Fetch(String),

    #[error("failed to decode asset: {0}")]
    Decode(String),
}
