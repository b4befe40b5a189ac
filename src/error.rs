use thiserror::Error;

/// Top-level error type for the curvis library.
#[derive(Debug, Error)]
pub enum CurvisError {
    #[error("{parameter} must be at least 1, got {value}")]
    ResolutionTooLow {
        parameter: &'static str,
        value: usize,
    },
}

/// Convenience type alias for results using [`CurvisError`].
pub type Result<T> = std::result::Result<T, CurvisError>;
