use thiserror::Error;

use crate::validation::ValidationError;

/// Error types for a site response analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Fatal input problem, raised before the realisation loop starts.
    #[error("invalid configuration: {message}")]
    ConfigurationInvalid { message: String },

    /// NaN or infinity in waves, transfer functions, or spectral moments.
    /// The current realisation is discarded and not counted.
    #[error("numerical instability in {context}")]
    NumericalInstability { context: String },

    /// The iteration cap was hit with the error still above tolerance.
    /// The result is kept.
    #[error("convergence not reached after {iterations} iterations (max error {max_error:.2} %)")]
    ConvergenceNotReached { iterations: usize, max_error: f64 },

    /// The Vanmarcke ratio passes were exhausted above the RMSE threshold.
    /// The best estimate is kept.
    #[error("inversion did not converge (rmse {rmse:.4})")]
    InversionDidNotConverge { rmse: f64 },

    /// The run was cancelled; the partial realisation is dropped.
    #[error("calculation cancelled")]
    Cancelled,
}

impl From<ValidationError> for AnalysisError {
    fn from(err: ValidationError) -> Self {
        AnalysisError::ConfigurationInvalid {
            message: String::from(err),
        }
    }
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
