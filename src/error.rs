use thiserror::Error;

/// A data-model invariant was violated while building an entity.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("upstream call failed: {0:#}")]
    Upstream(#[source] anyhow::Error),

    #[error("invalid data: {0}")]
    Validation(#[from] ValidationError),
}

impl AnalysisError {
    /// True for errors caused by the caller rather than by this service or its collaborators.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AnalysisError::InvalidArgument(_) | AnalysisError::NotFound(_))
    }
}
