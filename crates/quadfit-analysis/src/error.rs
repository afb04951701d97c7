//! Error types for quadratic fitting

/// Errors that can occur while fitting a quadratic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// Cannot fit because there are no points.
    #[error("No data available for fitting")]
    NoData,

    /// The linear system could not be solved.
    #[error("Failed to solve: {0}")]
    Algebra(&'static str),
}

/// Result type for quadratic fitting
pub type Result<T> = std::result::Result<T, AnalysisError>;
