use rand::Rng;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::enums::StdevModel;
use crate::helper::interp1d;
use crate::models::soil_type::SoilType;
use crate::models::velocity_layer::RockLayer;

/// Randomizes the nonlinear curves of the soil types.
///
/// At each strain point the modulus reduction and damping are perturbed by
/// correlated normal variables; softer modulus goes with higher damping, so
/// the correlation is negative. The standard deviation models are from
/// Darendeli (2001), with a tabulated fallback for custom models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonlinearVariation {
    pub enabled: bool,
    pub model: StdevModel,
    /// Also vary the damping of the bedrock
    pub bedrock_is_enabled: bool,
    /// Correlation between the modulus and damping variables
    pub correl: f64,
    /// Tabulated (strain, stdev) pairs for the Custom model
    pub shear_mod_stdev_table: Option<(Vec<f64>, Vec<f64>)>,
    pub damping_stdev_table: Option<(Vec<f64>, Vec<f64>)>,
    pub shear_mod_min: f64,
    pub shear_mod_max: f64,
    /// Damping bounds in percent
    pub damping_min: f64,
    pub damping_max: f64,
}

impl Default for NonlinearVariation {
    fn default() -> Self {
        Self {
            enabled: true,
            model: StdevModel::Darendeli,
            bedrock_is_enabled: false,
            correl: -0.50,
            shear_mod_stdev_table: None,
            damping_stdev_table: None,
            shear_mod_min: 0.10,
            shear_mod_max: 1.00,
            damping_min: 0.20,
            damping_max: 15.00,
        }
    }
}

impl NonlinearVariation {
    /// Standard deviation of the normalized shear modulus.
    ///
    /// The Darendeli model is largest at G/Gmax of one half and vanishes at
    /// the tails of the reduction curve.
    pub fn shear_mod_stdev(&self, norm_shear_mod: f64, strain: f64) -> f64 {
        match (self.model, &self.shear_mod_stdev_table) {
            (StdevModel::Custom, Some((strains, stdevs))) => interp1d(strains, stdevs, strain),
            _ => {
                (-4.23_f64).exp()
                    + (0.25 / 3.62_f64.exp() - (norm_shear_mod - 0.5).powi(2) / 3.62_f64.exp())
                        .max(0.0)
                        .sqrt()
            }
        }
    }

    /// Standard deviation of the damping ratio in percent.
    pub fn damping_stdev(&self, damping: f64, strain: f64) -> f64 {
        match (self.model, &self.damping_stdev_table) {
            (StdevModel::Custom, Some((strains, stdevs))) => interp1d(strains, stdevs, strain),
            _ => (-5.0_f64).exp() + (-0.25_f64).exp() * damping.sqrt(),
        }
    }

    /// Randomizes both curves of a soil type.
    ///
    /// A single pair of correlated variables perturbs every strain point, so
    /// a realisation shifts each curve as a whole instead of roughening it.
    pub fn vary_soil_type(&self, soil_type: &mut SoilType, rng: &mut StdRng) {
        let z1: f64 = rng.sample(StandardNormal);
        let z2: f64 = rng.sample(StandardNormal);

        let rand_g = z1;
        let rand_d = self.correl * z1 + (1.0 - self.correl * self.correl).sqrt() * z2;

        let varied: Vec<f64> = soil_type
            .norm_shear_mod
            .strain()
            .iter()
            .zip(soil_type.norm_shear_mod.average().iter())
            .map(|(&strain, &avg)| {
                let value = avg + self.shear_mod_stdev(avg, strain) * rand_g;
                value.clamp(self.shear_mod_min, self.shear_mod_max)
            })
            .collect();
        soil_type.norm_shear_mod.set_varied(varied);

        let varied: Vec<f64> = soil_type
            .damping
            .strain()
            .iter()
            .zip(soil_type.damping.average().iter())
            .map(|(&strain, &avg)| {
                let value = avg + self.damping_stdev(avg, strain) * rand_d;
                value.clamp(self.damping_min, self.damping_max)
            })
            .collect();
        soil_type.damping.set_varied(varied);
    }

    /// Randomizes the damping of the bedrock.
    pub fn vary_bedrock(&self, bedrock: &mut RockLayer, rng: &mut StdRng) {
        let z: f64 = rng.sample(StandardNormal);
        let damping = bedrock.avg_damping + self.damping_stdev(bedrock.avg_damping, 0.0) * z;

        bedrock.set_damping(damping.clamp(self.damping_min, self.damping_max));
    }
}
