//! Error types for causal effect estimation
//!
//! Provides a unified error type for all causal-stats crates.

use thiserror::Error;

/// Core error type for effect estimation operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} records, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Percentile pair outside [0, 100] or not strictly ordered
    #[error("Invalid percentile range: lower {lower} must be < upper {upper}, both in [0, 100]")]
    InvalidPercentileRange { lower: f64, upper: f64 },

    /// A bootstrap resample's fit failed (singular or ill-conditioned inputs)
    #[error("Degenerate resample {resample}: {reason}")]
    DegenerateResample { resample: usize, reason: String },

    /// Too few usable resamples remain to form an interval
    #[error("Insufficient successful resamples: {succeeded} succeeded, need at least {required}")]
    InsufficientSuccessfulResamples { succeeded: usize, required: usize },

    /// Label count or tensor dimension does not match the expected shape
    #[error("Schema mismatch in {context}: expected {expected}, got {actual}")]
    SchemaMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Required input columns are absent
    #[error("Missing required column(s): {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for empty input
    pub fn empty_input() -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::SchemaMismatch {
            context: context.to_string(),
            expected,
            actual,
        }
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }

    /// Create an error for a degenerate resample fit
    pub fn degenerate_resample(resample: usize, reason: impl Into<String>) -> Self {
        Self::DegenerateResample {
            resample,
            reason: reason.into(),
        }
    }
}
