use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, validate_field};

/// Pseudo-acceleration response spectrum.
///
/// Parallel vectors of oscillator period and spectral acceleration for a
/// single damping ratio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseSpectrum {
    /// Oscillator period in seconds, increasing
    pub period: Vec<f64>,
    /// Damping ratio in percent
    pub damping: f64,
    /// Spectral acceleration in g
    pub sa: Vec<f64>,
}

impl ResponseSpectrum {
    pub fn new(period: Vec<f64>, damping: f64, sa: Vec<f64>) -> Self {
        Self { period, damping, sa }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.period.is_empty() || self.period.len() != self.sa.len() {
            return Err(ValidationError {
                code: "response_spectrum.period_sa.length_mismatch".to_string(),
                message: "Both period and sa must be defined with the same length.".to_string(),
            });
        }

        for pair in self.period.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ValidationError {
                    code: "response_spectrum.period.not_increasing".to_string(),
                    message: "The period values must be increasing.".to_string(),
                });
            }
        }

        validate_field("damping", self.damping, Some(0.0001), Some(100.0), "response_spectrum")?;

        Ok(())
    }
}
