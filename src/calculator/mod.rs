pub mod equiv_linear;

use serde::{Deserialize, Serialize};

use crate::enums::Method;
use crate::error::AnalysisError;
use crate::validation::{ValidationError, validate_field};

/// Configuration of the site response calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationConfig {
    pub method: Method,
    /// Maximum number of equivalent linear iterations
    pub max_iterations: usize,
    /// Largest acceptable property change between iterations in percent
    pub error_tolerance: f64,
    /// Ratio between the effective and maximum strain
    pub strain_ratio: f64,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            method: Method::EquivalentLinear,
            max_iterations: 8,
            error_tolerance: 1.0,
            strain_ratio: 0.65,
        }
    }
}

impl CalculationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_field("max_iterations", self.max_iterations, Some(1), None, "calculation")?;
        validate_field("error_tolerance", self.error_tolerance, Some(0.0001), None, "calculation")?;
        validate_field("strain_ratio", self.strain_ratio, Some(0.0001), Some(1.0), "calculation")?;

        Ok(())
    }
}

/// Outcome of one calculation of one motion through one realisation.
#[derive(Debug, Clone, Copy)]
pub struct CalcSummary {
    pub iterations: usize,
    /// Largest property change of the final iteration in percent
    pub max_error: f64,
    /// False when the iteration cap was hit above the error tolerance
    pub converged: bool,
}

impl CalcSummary {
    /// The reportable error when the iteration cap was exhausted.
    ///
    /// The result of the calculation is kept either way.
    pub fn error(&self) -> Option<AnalysisError> {
        (!self.converged).then(|| AnalysisError::ConvergenceNotReached {
            iterations: self.iterations,
            max_error: self.max_error,
        })
    }
}
