use rand::Rng;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::enums::VelocityModel;
use crate::models::velocity_layer::{RockLayer, SoilLayer};

/// Depth at which the depth correlation saturates, in meters.
const CORREL_SATURATION_DEPTH: f64 = 200.0;

/// Toro (1995) model for the stochastic variation of shear-wave velocity.
///
/// Layer velocities are log-normally distributed about the median profile
/// with an inter-layer correlation combining a depth term (correlation grows
/// with depth up to 200 m) and a thickness term (thin layers correlate more
/// strongly with their neighbor). The model constants are in meters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToroVelocityModel {
    pub stdev_model: VelocityModel,
    /// Standard deviation of ln(velocity)
    pub stdev: f64,
    /// Read the stdev from each layer instead of the model
    pub stdev_is_layer_specific: bool,
    pub correl_model: VelocityModel,
    /// Correlation of adjacent thin layers at the surface (rho_0)
    pub correl_initial: f64,
    /// Correlation at and below 200 m (rho_200)
    pub correl_final: f64,
    /// Decay depth of the thickness correlation in m (Delta)
    pub correl_delta: f64,
    /// Depth offset of the depth correlation in m (d_0)
    pub correl_intercept: f64,
    /// Power of the depth correlation (b)
    pub correl_exponent: f64,
}

impl ToroVelocityModel {
    /// Creates a model with the published constants of a site class.
    pub fn new(model: VelocityModel) -> Self {
        let stdev = Self::model_stdev(model);
        let (correl_initial, correl_final, correl_delta, correl_intercept, correl_exponent) =
            Self::model_correl(model);

        Self {
            stdev_model: model,
            stdev,
            stdev_is_layer_specific: false,
            correl_model: model,
            correl_initial,
            correl_final,
            correl_delta,
            correl_intercept,
            correl_exponent,
        }
    }

    fn model_stdev(model: VelocityModel) -> f64 {
        match model {
            VelocityModel::Custom => 0.0,
            VelocityModel::GeoMatrixAB => 0.46,
            VelocityModel::GeoMatrixCD => 0.38,
            VelocityModel::UsgsAB => 0.35,
            VelocityModel::UsgsCD => 0.36,
            VelocityModel::UsgsA => 0.36,
            VelocityModel::UsgsB => 0.27,
            VelocityModel::UsgsC => 0.31,
            VelocityModel::UsgsD => 0.37,
        }
    }

    fn model_correl(model: VelocityModel) -> (f64, f64, f64, f64, f64) {
        match model {
            VelocityModel::Custom => (0.0, 0.0, 1.0, 0.0, 0.0),
            VelocityModel::GeoMatrixAB => (0.96, 0.96, 13.1, 0.0, 0.095),
            VelocityModel::GeoMatrixCD => (0.99, 1.00, 8.0, 0.0, 0.160),
            VelocityModel::UsgsAB => (0.95, 1.00, 4.2, 0.0, 0.138),
            VelocityModel::UsgsCD => (0.99, 1.00, 3.9, 0.0, 0.293),
            VelocityModel::UsgsA => (0.95, 0.42, 3.4, 0.0, 0.063),
            VelocityModel::UsgsB => (0.97, 1.00, 3.8, 0.0, 0.293),
            VelocityModel::UsgsC => (0.99, 0.98, 3.9, 0.0, 0.344),
            VelocityModel::UsgsD => (0.00, 0.50, 5.0, 0.0, 0.744),
        }
    }

    /// Randomizes the layer and bedrock velocities.
    ///
    /// The first layer draws an independent standard normal; each deeper
    /// layer is correlated to the one above it. The bedrock is perfectly
    /// correlated to the deepest soil layer and clamped to be at least as
    /// fast as that layer.
    ///
    /// # Arguments
    /// * `layers` - Soil layers with depths up to date
    /// * `bedrock` - Half-space of the profile
    /// * `to_meters` - Conversion factor from the profile length unit to m
    /// * `rng` - Seeded generator of the run
    pub fn vary(
        &self,
        layers: &mut [SoilLayer],
        bedrock: &mut RockLayer,
        to_meters: f64,
        rng: &mut StdRng,
    ) {
        let mut stdev = self.layer_stdev(&layers[0]);

        // The first layer has no correlation
        let z: f64 = rng.sample(StandardNormal);
        let mut prev_rand_var = stdev * z;

        if layers[0].is_varied {
            let velocity = layers[0].avg_velocity * prev_rand_var.exp();
            layers[0].set_shear_vel(velocity);
        } else {
            layers[0].reset_velocity();
        }

        for i in 1..layers.len() {
            if !layers[i].is_varied {
                layers[i].reset_velocity();
                continue;
            }

            let depth_to_mid = layers[i].depth_to_mid() * to_meters;
            let depth_correl = self.depth_correl(depth_to_mid);

            let thickness_correl =
                self.correl_initial * (-layers[i].thickness * to_meters / self.correl_delta).exp();

            let correl = (1.0 - depth_correl) * thickness_correl + depth_correl;

            stdev = self.layer_stdev(&layers[i]);
            let z: f64 = rng.sample(StandardNormal);
            let rand_var = correl * prev_rand_var + stdev * z * (1.0 - correl * correl).sqrt();

            let velocity = layers[i].avg_velocity * rand_var.exp();
            layers[i].set_shear_vel(velocity);

            prev_rand_var = rand_var;
        }

        // The bedrock is perfectly correlated to the deepest soil layer and
        // at least as fast as it
        if bedrock.is_varied {
            let mut rand_var = prev_rand_var;

            if self.stdev_is_layer_specific {
                let last = &layers[layers.len() - 1];
                rand_var *= bedrock.stdev.unwrap_or(self.stdev) / self.layer_stdev(last);
            }

            let velocity = (bedrock.avg_velocity * rand_var.exp())
                .max(layers[layers.len() - 1].shear_vel());
            bedrock.set_shear_vel(velocity);
        } else {
            bedrock.set_shear_vel(bedrock.avg_velocity);
        }
    }

    fn layer_stdev(&self, layer: &SoilLayer) -> f64 {
        if self.stdev_is_layer_specific {
            layer.stdev.unwrap_or(self.stdev)
        } else {
            self.stdev
        }
    }

    /// Depth dependent correlation, saturating at 200 m.
    fn depth_correl(&self, depth: f64) -> f64 {
        if depth < CORREL_SATURATION_DEPTH {
            self.correl_final
                * ((depth + self.correl_intercept)
                    / (CORREL_SATURATION_DEPTH + self.correl_intercept))
                    .powf(self.correl_exponent)
        } else {
            self.correl_final
        }
    }
}
