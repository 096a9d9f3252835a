use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::helper::log_space;
use crate::models::nonlinear_property::{CurveKind, CurveSource, NonlinearProperty};
use crate::validation::{ValidationError, validate_field, validate_finite};

/// A named soil material.
///
/// Owns the modulus reduction and damping curves along with the scalar
/// properties shared by every layer of this material. The Darendeli inputs
/// (mean stress, plasticity index, over-consolidation ratio, excitation
/// frequency, cycle count) are only used when a curve has the `Computed`
/// source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilType {
    pub name: String,
    /// Unit weight in the configured unit system (e.g. kN/m3)
    pub unit_weight: f64,
    /// Small-strain damping in percent
    pub initial_damping: f64,
    /// If the nonlinear curves of this soil are randomized
    pub is_varied: bool,
    /// Mean effective confining stress in atm
    pub mean_stress: f64,
    /// Plasticity index in percent
    pub plasticity_index: f64,
    /// Over-consolidation ratio
    pub ocr: f64,
    /// Excitation frequency in Hz
    pub excitation_freq: f64,
    /// Number of loading cycles
    pub n_cycles: f64,
    pub norm_shear_mod: NonlinearProperty,
    pub damping: NonlinearProperty,
}

impl SoilType {
    pub fn new(name: impl Into<String>, unit_weight: f64) -> Self {
        Self {
            name: name.into(),
            unit_weight,
            initial_damping: 5.0,
            is_varied: true,
            mean_stress: 2.0,
            plasticity_index: 0.0,
            ocr: 1.0,
            excitation_freq: 1.0,
            n_cycles: 10.0,
            norm_shear_mod: NonlinearProperty::computed(CurveKind::ModulusReduction),
            damping: NonlinearProperty::computed(CurveKind::Damping),
        }
    }

    /// Mass density derived from the unit weight.
    ///
    /// # Arguments
    /// * `gravity` - Acceleration of gravity in the configured unit system
    pub fn density(&self, gravity: f64) -> f64 {
        self.unit_weight / gravity
    }

    /// Fills curves of `Computed` source from the Darendeli (2001) model.
    ///
    /// Curves are evaluated on a 19 point log-spaced strain grid from 1e-4 %
    /// to 3 %. The coefficients are from Darendeli and Stokoe (2001).
    pub fn compute_darendeli_curves(&mut self) {
        let strain = log_space(0.0001, 3.0, 19);

        // Reference strain from the PI, OCR, and mean stress
        let ref_strain = (0.0352 + 0.0010 * self.plasticity_index * self.ocr.powf(0.3246))
            * self.mean_stress.powf(0.3483);

        let curvature = 0.9190;

        let shear_mod: Vec<f64> = strain
            .iter()
            .map(|&e| 1.0 / (1.0 + (e / ref_strain).powf(curvature)))
            .collect();

        let min_damping = (0.8005 + 0.0129 * self.plasticity_index * self.ocr.powf(-0.1069))
            * self.mean_stress.powf(-0.2889)
            * (1.0 + 0.2919 * self.excitation_freq.log10());

        // Masing damping correction coefficients
        let c1 = -1.1143 * curvature.powi(2) + 1.8618 * curvature + 0.2523;
        let c2 = 0.0805 * curvature.powi(2) - 0.0710 * curvature - 0.0095;
        let c3 = -0.0005 * curvature.powi(2) + 0.0002 * curvature + 0.0003;

        let b = 0.6329 - 0.00566 * self.n_cycles;

        let damping: Vec<f64> = strain
            .iter()
            .zip(shear_mod.iter())
            .map(|(&e, &g)| {
                // Masing damping assuming the a coefficient is one
                let masing_a1 = (100.0 / PI)
                    * (4.0 * (e - ref_strain * ((e + ref_strain) / ref_strain).ln())
                        / (e.powi(2) / (e + ref_strain))
                        - 2.0);
                let masing = c1 * masing_a1 + c2 * masing_a1.powi(2) + c3 * masing_a1.powi(3);

                b * g.powf(0.1) * masing + min_damping
            })
            .collect();

        if self.norm_shear_mod.source == CurveSource::Computed {
            self.norm_shear_mod.set_average(strain.clone(), shear_mod);
        }

        if self.damping.source == CurveSource::Computed {
            self.damping.set_average(strain, damping);
        }
    }

    /// Restores both curves to their average values.
    pub fn reset_varied(&mut self) {
        self.norm_shear_mod.reset_varied();
        self.damping.reset_varied();
    }

    /// Validates the soil type for use in a calculation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_field("unit_weight", self.unit_weight, Some(0.0001), None, "soil_type")?;
        validate_field("initial_damping", self.initial_damping, Some(0.0), Some(100.0), "soil_type")?;

        if self.norm_shear_mod.source == CurveSource::Computed
            || self.damping.source == CurveSource::Computed
        {
            validate_finite("mean_stress", self.mean_stress, "soil_type")?;
            validate_finite("plasticity_index", self.plasticity_index, "soil_type")?;
            validate_finite("ocr", self.ocr, "soil_type")?;
            validate_finite("excitation_freq", self.excitation_freq, "soil_type")?;
            validate_finite("n_cycles", self.n_cycles, "soil_type")?;
        }

        self.norm_shear_mod.validate("soil_type.norm_shear_mod")?;
        self.damping.validate("soil_type.damping")?;

        Ok(())
    }
}
