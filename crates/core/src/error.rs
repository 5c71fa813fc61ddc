use crate::constants::NO_DRUGS_WARNING;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{}", NO_DRUGS_WARNING)]
    NoDrugs,
    #[error("invalid age: {0}")]
    InvalidAge(#[from] rx_types::AgeError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("entity recognition failed: {0}")]
    Recogniser(Box<dyn std::error::Error + Send + Sync>),
}

impl AnalysisError {
    /// Whether the error was caused by caller input rather than by the system.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidInput(_) | AnalysisError::NoDrugs | AnalysisError::InvalidAge(_)
        )
    }
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
