use rand::Rng;
use rand::rngs::StdRng;
use rand_distr::Exp1;
use serde::{Deserialize, Serialize};

use crate::enums::LayeringModel;

/// Toro (1995) model for the stochastic variation of layer boundaries.
///
/// Layer interfaces follow a non-homogeneous Poisson process with the depth
/// dependent rate `lambda(z) = c (z + z_0)^e`: layers thicken with depth.
/// Exponential increments are generated in cumulative-rate space and mapped
/// to depth through the analytic inverse of the cumulative rate function.
/// The model constants are in meters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToroLayeringModel {
    pub model: LayeringModel,
    /// Rate coefficient (c)
    pub coeff: f64,
    /// Depth offset in m (z_0)
    pub initial: f64,
    /// Rate power (e)
    pub exponent: f64,
}

impl ToroLayeringModel {
    pub fn new(model: LayeringModel) -> Self {
        match model {
            LayeringModel::Toro95 | LayeringModel::Custom => Self {
                model,
                coeff: 1.98,
                initial: 10.86,
                exponent: -0.89,
            },
        }
    }

    /// Generates layer thicknesses down to the bedrock depth.
    ///
    /// The final thickness is trimmed so the total equals `depth_to_bedrock`.
    ///
    /// # Arguments
    /// * `depth_to_bedrock` - Depth of the half-space in m
    /// * `rng` - Seeded generator of the run
    ///
    /// # Returns
    /// * Thicknesses in m, summing to the bedrock depth
    pub fn vary(&self, depth_to_bedrock: f64, rng: &mut StdRng) -> Vec<f64> {
        let mut thickness = Vec::new();

        // Sum of exponential random variables in cumulative-rate space
        let mut sum = 0.0;
        let mut prev_depth = 0.0;

        while prev_depth < depth_to_bedrock {
            let increment: f64 = rng.sample(Exp1);
            sum += increment;

            // Invert the cumulative rate function to a depth
            let depth = ((self.exponent + 1.0) * sum / self.coeff
                + self.initial.powf(self.exponent + 1.0))
            .powf(1.0 / (self.exponent + 1.0))
                - self.initial;

            thickness.push(depth - prev_depth);
            prev_depth = depth;
        }

        // Trim the last layer so the total matches the bedrock depth
        if let Some(last) = thickness.last_mut() {
            *last -= prev_depth - depth_to_bedrock;
        }

        thickness
    }
}
