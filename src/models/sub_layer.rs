use serde::{Deserialize, Serialize};

use crate::models::soil_type::SoilType;

/// The numerical discretisation unit of a soil layer.
///
/// Carries the strain-compatible state updated during the equivalent linear
/// iteration along with the previous-iteration properties used to measure the
/// convergence error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubLayer {
    /// Thickness of the sub-layer
    pub thickness: f64,
    /// Depth to the top of the sub-layer
    pub depth: f64,
    /// Index of the parent soil layer in the profile
    pub soil_layer: usize,
    /// Unit weight of the parent soil type
    pub unit_weight: f64,
    /// Total vertical stress at the mid-depth of the sub-layer
    v_total_stress: f64,
    /// Shear-wave velocity at the start of the iteration
    initial_velocity: f64,
    /// Small-strain damping of the soil type in percent
    initial_damping: f64,
    /// Shear modulus at the start of the iteration
    initial_shear_mod: f64,
    gravity: f64,

    eff_strain: f64,
    max_strain: f64,
    shear_mod: f64,
    norm_shear_mod: f64,
    shear_vel: f64,
    damping: f64,
    old_shear_mod: f64,
    old_damping: f64,
    shear_mod_error: f64,
    damping_error: f64,
}

impl SubLayer {
    /// Creates a sub-layer and computes the mid-depth total vertical stress.
    ///
    /// # Arguments
    /// * `thickness` - Thickness of the sub-layer
    /// * `depth` - Depth to the top of the sub-layer
    /// * `soil_layer` - Index of the parent soil layer
    /// * `unit_weight` - Unit weight of the parent soil type
    /// * `initial_velocity` - Realised shear-wave velocity of the parent layer
    /// * `initial_damping` - Small-strain damping of the soil type in percent
    /// * `stress_at_top` - Total vertical stress at the top of the sub-layer
    /// * `gravity` - Acceleration of gravity in the configured unit system
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        thickness: f64,
        depth: f64,
        soil_layer: usize,
        unit_weight: f64,
        initial_velocity: f64,
        initial_damping: f64,
        stress_at_top: f64,
        gravity: f64,
    ) -> Self {
        let initial_shear_mod = unit_weight / gravity * initial_velocity * initial_velocity;

        let mut sub_layer = Self {
            thickness,
            depth,
            soil_layer,
            unit_weight,
            v_total_stress: stress_at_top + unit_weight * thickness / 2.0,
            initial_velocity,
            initial_damping,
            initial_shear_mod,
            gravity,
            eff_strain: -1.0,
            max_strain: -1.0,
            shear_mod: initial_shear_mod,
            norm_shear_mod: 1.0,
            shear_vel: initial_velocity,
            damping: initial_damping,
            old_shear_mod: -1.0,
            old_damping: -1.0,
            shear_mod_error: -1.0,
            damping_error: -1.0,
        };
        sub_layer.reset();
        sub_layer
    }

    /// Restores the initial properties of the sub-layer.
    pub fn reset(&mut self) {
        self.eff_strain = -1.0;
        self.max_strain = -1.0;
        self.shear_mod = self.initial_shear_mod;
        self.norm_shear_mod = 1.0;
        self.shear_vel = self.initial_velocity;
        self.damping = self.initial_damping;
        self.old_shear_mod = -1.0;
        self.old_damping = -1.0;
        self.shear_mod_error = -1.0;
        self.damping_error = -1.0;
    }

    /// Updates the strain-compatible properties from the soil type curves.
    ///
    /// The previous modulus and damping are saved and the relative change of
    /// each is recorded in percent.
    ///
    /// # Arguments
    /// * `soil_type` - Soil type of the parent layer
    /// * `eff_strain` - Effective shear strain in percent
    /// * `max_strain` - Maximum shear strain in percent
    pub fn set_strain(&mut self, soil_type: &SoilType, eff_strain: f64, max_strain: f64) {
        self.eff_strain = eff_strain;
        self.max_strain = max_strain;

        self.old_shear_mod = self.shear_mod;
        self.old_damping = self.damping;

        self.norm_shear_mod = soil_type.norm_shear_mod.interp(eff_strain);
        self.shear_mod = self.initial_shear_mod * self.norm_shear_mod;
        self.damping = soil_type.damping.interp(eff_strain);

        self.shear_vel = (self.shear_mod / self.density()).sqrt();

        self.shear_mod_error = 100.0 * (self.shear_mod - self.old_shear_mod).abs() / self.shear_mod;
        self.damping_error = 100.0 * (self.damping - self.old_damping).abs() / self.damping;
    }

    /// Records the strains without updating the properties.
    ///
    /// Used by the linear elastic calculation, where the modulus and damping
    /// stay at their initial values and a single pass leaves no error.
    pub fn record_strain(&mut self, eff_strain: f64, max_strain: f64) {
        self.eff_strain = eff_strain;
        self.max_strain = max_strain;

        self.old_shear_mod = self.shear_mod;
        self.old_damping = self.damping;
        self.shear_mod_error = 0.0;
        self.damping_error = 0.0;
    }

    pub fn density(&self) -> f64 {
        self.unit_weight / self.gravity
    }

    pub fn v_total_stress(&self) -> f64 {
        self.v_total_stress
    }

    pub fn depth_to_mid(&self) -> f64 {
        self.depth + self.thickness / 2.0
    }

    pub fn depth_to_base(&self) -> f64 {
        self.depth + self.thickness
    }

    pub fn eff_strain(&self) -> f64 {
        self.eff_strain
    }

    pub fn max_strain(&self) -> f64 {
        self.max_strain
    }

    pub fn shear_mod(&self) -> f64 {
        self.shear_mod
    }

    pub fn norm_shear_mod(&self) -> f64 {
        self.norm_shear_mod
    }

    pub fn initial_shear_mod(&self) -> f64 {
        self.initial_shear_mod
    }

    pub fn initial_shear_vel(&self) -> f64 {
        self.initial_velocity
    }

    pub fn shear_vel(&self) -> f64 {
        self.shear_vel
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Maximum shear stress in the sub-layer.
    pub fn shear_stress(&self) -> f64 {
        self.shear_mod * self.max_strain / 100.0
    }

    /// Ratio of the maximum shear stress to the total vertical stress.
    pub fn stress_ratio(&self) -> f64 {
        self.shear_stress() / self.v_total_stress
    }

    /// The larger of the modulus and damping convergence errors in percent.
    pub fn error(&self) -> f64 {
        self.shear_mod_error.max(self.damping_error)
    }
}
