pub mod layering;
pub mod nonlinear;
pub mod velocity;

use rand::Rng;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::enums::{DistributionType, LayeringModel, VelocityModel};
use crate::models::profile::Profile;
use layering::ToroLayeringModel;
use nonlinear::NonlinearVariation;
use velocity::ToroVelocityModel;

/// A randomized scalar, e.g. the depth to bedrock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    pub dist_type: DistributionType,
    /// Mean of a normal, median of a log-normal distribution
    pub avg: f64,
    /// Standard deviation; of the logarithm for a log-normal distribution
    pub stdev: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Distribution {
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        let value = match self.dist_type {
            DistributionType::Normal => {
                let z: f64 = rng.sample(StandardNormal);
                self.avg + self.stdev * z
            }
            DistributionType::LogNormal => {
                let z: f64 = rng.sample(StandardNormal);
                self.avg * (self.stdev * z).exp()
            }
            DistributionType::Uniform => match (self.min, self.max) {
                (Some(min), Some(max)) => rng.gen_range(min..=max),
                _ => self.avg,
            },
        };

        let value = match self.min {
            Some(min) => value.max(min),
            None => value,
        };
        match self.max {
            Some(max) => value.min(max),
            None => value,
        }
    }
}

/// Configuration of the profile randomization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileVariation {
    pub is_velocity_varied: bool,
    pub is_layering_varied: bool,
    pub is_bedrock_depth_varied: bool,
    pub velocity: ToroVelocityModel,
    pub layering: ToroLayeringModel,
    pub bedrock_depth: Distribution,
}

impl Default for ProfileVariation {
    fn default() -> Self {
        Self {
            is_velocity_varied: true,
            is_layering_varied: false,
            is_bedrock_depth_varied: false,
            velocity: ToroVelocityModel::new(VelocityModel::UsgsC),
            layering: ToroLayeringModel::new(LayeringModel::Toro95),
            bedrock_depth: Distribution {
                dist_type: DistributionType::LogNormal,
                avg: 30.0,
                stdev: 0.3,
                min: None,
                max: None,
            },
        }
    }
}

/// Produces one realised profile per call.
///
/// Layer boundaries, bedrock depth, layer velocities, and nonlinear curves
/// are drawn from a single seeded generator so a run is reproducible from
/// its seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteVariation {
    pub profile: ProfileVariation,
    pub nonlinear: NonlinearVariation,
}

impl SiteVariation {
    /// Samples a realisation of the base profile.
    ///
    /// The base profile is left untouched; the returned profile carries the
    /// randomized layering, velocities, and curves and still needs to be
    /// discretised before it can be propagated.
    pub fn realize(&self, base: &Profile, rng: &mut StdRng) -> Profile {
        let mut profile = base.clone();
        let to_meters = base.units.to_meters();

        if self.profile.is_layering_varied {
            let depth = if self.profile.is_bedrock_depth_varied {
                self.profile.bedrock_depth.sample(rng)
            } else {
                base.thickness()
            };

            let thickness_m = self.profile.layering.vary(depth * to_meters, rng);
            profile.layers = self.rebuild_layers(base, &thickness_m, to_meters);
        } else if self.profile.is_bedrock_depth_varied {
            let depth = self.profile.bedrock_depth.sample(rng);
            adjust_profile_depth(&mut profile, depth);
        }

        profile.update_depths();

        if self.profile.is_velocity_varied {
            self.profile.velocity.vary(
                &mut profile.layers,
                &mut profile.bedrock,
                to_meters,
                rng,
            );
        }

        if self.nonlinear.enabled {
            for soil_type in &mut profile.soil_types {
                if soil_type.is_varied {
                    self.nonlinear.vary_soil_type(soil_type, rng);
                }
            }

            if self.nonlinear.bedrock_is_enabled {
                self.nonlinear.vary_bedrock(&mut profile.bedrock, rng);
            }
        }

        profile
    }

    /// Builds the randomized layer stack over the base profile.
    ///
    /// Each generated layer copies the base layer that contributes the
    /// longest travel time within its depth range.
    fn rebuild_layers(
        &self,
        base: &Profile,
        thickness_m: &[f64],
        to_meters: f64,
    ) -> Vec<crate::models::velocity_layer::SoilLayer> {
        let mut layers = Vec::with_capacity(thickness_m.len());
        let mut top = 0.0;

        for &h_m in thickness_m {
            let thickness = h_m / to_meters;
            let representative = base.representative_soil_layer(top, top + thickness);

            let mut layer = base.layers[representative].clone();
            layer.thickness = thickness;
            layer.depth = top;

            layers.push(layer);
            top += thickness;
        }

        layers
    }
}

/// Trims or extends the layer stack to a new total depth.
fn adjust_profile_depth(profile: &mut Profile, depth: f64) {
    let mut layers = Vec::new();
    let mut top = 0.0;

    for layer in &profile.layers {
        if top >= depth {
            break;
        }

        let mut kept = layer.clone();
        if top + kept.thickness > depth {
            kept.thickness = depth - top;
        }
        top += kept.thickness;
        layers.push(kept);
    }

    // The sampled depth is below the base profile, extend the last layer
    if top < depth {
        if let Some(last) = layers.last_mut() {
            last.thickness += depth - top;
        }
    }

    profile.layers = layers;
}
