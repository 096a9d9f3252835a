use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::validation::{ValidationError, validate_field};

/// Property represented by a nonlinear curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    /// Normalized shear modulus (G/Gmax)
    ModulusReduction,
    /// Damping ratio in percent
    Damping,
}

/// Where the curve values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveSource {
    /// Tabulated values supplied by the user
    Defined,
    /// Generated from the Darendeli (2001) model
    Computed,
}

/// A tabulated function of shear strain to a soil property.
///
/// The curve stores an `average` vector and a `varied` vector. The varied
/// vector is what the interpolation reads; the curve randomizer overwrites it
/// and `reset_varied` restores the average values. Interpolation is linear on
/// (log strain, property) and clamps to the first/last value outside the
/// tabulated strain range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonlinearProperty {
    pub name: String,
    pub kind: CurveKind,
    pub source: CurveSource,
    /// Shear strain in percent, strictly increasing
    strain: Vec<f64>,
    average: Vec<f64>,
    varied: Vec<f64>,
}

impl NonlinearProperty {
    /// Creates a curve from tabulated values.
    ///
    /// Duplicate strains are removed, keeping the first occurrence.
    ///
    /// # Arguments
    /// * `name` - Curve name (e.g. "Vucetic & Dobry, PI = 0")
    /// * `kind` - Property the curve describes
    /// * `strain` - Shear strain in percent
    /// * `property` - Property value at each strain
    pub fn new(name: impl Into<String>, kind: CurveKind, strain: Vec<f64>, property: Vec<f64>) -> Self {
        let mut curve = Self {
            name: name.into(),
            kind,
            source: CurveSource::Defined,
            strain,
            average: property.clone(),
            varied: property,
        };
        curve.dedup_strain();
        curve
    }

    /// Creates an empty curve to be filled by the Darendeli model.
    pub fn computed(kind: CurveKind) -> Self {
        Self {
            name: "Computed".to_string(),
            kind,
            source: CurveSource::Computed,
            strain: Vec::new(),
            average: Vec::new(),
            varied: Vec::new(),
        }
    }

    pub fn strain(&self) -> &[f64] {
        &self.strain
    }

    pub fn average(&self) -> &[f64] {
        &self.average
    }

    pub fn varied(&self) -> &[f64] {
        &self.varied
    }

    /// Replaces both the average and varied values, e.g. from the Darendeli model.
    pub fn set_average(&mut self, strain: Vec<f64>, property: Vec<f64>) {
        self.strain = strain;
        self.average = property.clone();
        self.varied = property;
        self.dedup_strain();
    }

    /// Installs a varied realisation of the curve.
    pub fn set_varied(&mut self, varied: Vec<f64>) {
        debug_assert_eq!(varied.len(), self.strain.len());
        self.varied = varied;
    }

    /// Restores the varied values to the average curve.
    pub fn reset_varied(&mut self) {
        self.varied = self.average.clone();
    }

    /// Interpolates the varied curve at a strain.
    ///
    /// # Arguments
    /// * `strain` - Shear strain in percent
    ///
    /// # Returns
    /// * Property value, linear on log strain, clamped at the endpoints
    pub fn interp(&self, strain: f64) -> f64 {
        let n = self.strain.len();

        if strain <= self.strain[0] || n == 1 {
            return self.varied[0];
        }
        if strain >= self.strain[n - 1] {
            return self.varied[n - 1];
        }

        for i in 0..n - 1 {
            if strain <= self.strain[i + 1] {
                let t = (strain.log10() - self.strain[i].log10())
                    / (self.strain[i + 1].log10() - self.strain[i].log10());
                return self.varied[i] + t * (self.varied[i + 1] - self.varied[i]);
            }
        }

        self.varied[n - 1]
    }

    /// Validates the curve for use in a calculation.
    pub fn validate(&self, error_code_prefix: &str) -> Result<(), ValidationError> {
        if self.strain.len() < 2 {
            return Err(ValidationError {
                code: format!("{}.strain.too_few_points", error_code_prefix),
                message: "A nonlinear curve requires at least two strain points.".to_string(),
            });
        }

        for pair in self.strain.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ValidationError {
                    code: format!("{}.strain.not_increasing", error_code_prefix),
                    message: "The strain values of a nonlinear curve must be increasing."
                        .to_string(),
                });
            }
        }

        for &strain in &self.strain {
            validate_field("strain", strain, Some(0.0), None, error_code_prefix)?;
        }

        Ok(())
    }

    /// Removes values that repeat a strain, keeping the first occurrence.
    fn dedup_strain(&mut self) {
        let mut seen: HashSet<OrderedFloat<f64>> = HashSet::with_capacity(self.strain.len());
        let mut strain = Vec::with_capacity(self.strain.len());
        let mut average = Vec::with_capacity(self.average.len());
        let mut varied = Vec::with_capacity(self.varied.len());

        for i in 0..self.strain.len() {
            if seen.insert(OrderedFloat(self.strain[i])) {
                strain.push(self.strain[i]);
                average.push(self.average[i]);
                varied.push(self.varied[i]);
            }
        }

        self.strain = strain;
        self.average = average;
        self.varied = varied;
    }
}
