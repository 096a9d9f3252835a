use serde::{Deserialize, Serialize};

use crate::enums::UnitSystem;
use crate::models::location::Location;
use crate::models::soil_type::SoilType;
use crate::models::sub_layer::SubLayer;
use crate::models::velocity_layer::{RockLayer, SoilLayer};
use crate::validation::ValidationError;

/// A layered soil column terminated by a half-space.
///
/// The profile owns the soil type catalog, the ordered soil layers, the
/// bedrock, and the sub-layer discretisation of the current realisation.
/// Sub-layers are rebuilt per realisation by `create_sub_layers` and their
/// strain-compatible state is cleared by `reset_sub_layers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub soil_types: Vec<SoilType>,
    pub layers: Vec<SoilLayer>,
    pub bedrock: RockLayer,
    /// Depth at which the input motion is applied. A negative depth (or one
    /// below the profile) places the motion at the top of the half-space.
    pub input_depth: f64,
    pub units: UnitSystem,
    #[serde(skip)]
    sub_layers: Vec<SubLayer>,
}

impl Profile {
    pub fn new(
        soil_types: Vec<SoilType>,
        layers: Vec<SoilLayer>,
        bedrock: RockLayer,
        units: UnitSystem,
    ) -> Self {
        let mut profile = Self {
            soil_types,
            layers,
            bedrock,
            input_depth: -1.0,
            units,
            sub_layers: Vec::new(),
        };
        profile.update_depths();
        profile
    }

    /// Recomputes the depth to the top of each layer from the thicknesses.
    pub fn update_depths(&mut self) {
        let mut depth = 0.0;
        for layer in &mut self.layers {
            layer.depth = depth;
            depth += layer.thickness;
        }
    }

    /// Total thickness of the soil column.
    pub fn thickness(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness).sum()
    }

    pub fn soil_type_of(&self, layer: usize) -> &SoilType {
        &self.soil_types[self.layers[layer].soil_type]
    }

    /// Soil type of the parent layer of a sub-layer.
    pub fn sub_layer_soil_type(&self, index: usize) -> &SoilType {
        self.soil_type_of(self.sub_layers[index].soil_layer)
    }

    pub fn sub_layers(&self) -> &[SubLayer] {
        &self.sub_layers
    }

    pub fn sub_layers_mut(&mut self) -> &mut [SubLayer] {
        &mut self.sub_layers
    }

    pub fn sub_layer_count(&self) -> usize {
        self.sub_layers.len()
    }

    /// Discretises the soil layers into sub-layers.
    ///
    /// Each soil layer of thickness `h` and realised velocity `vs` is divided
    /// into `ceil(h * max_freq * wave_fraction / vs)` sub-layers of equal
    /// thickness, so that waves up to `max_freq` are resolved with at least
    /// `wave_fraction` points per wavelength. Depth and total vertical stress
    /// are accumulated along the sequence.
    ///
    /// # Arguments
    /// * `max_freq` - Maximum frequency of interest in Hz
    /// * `wave_fraction` - Sub-layers per wavelength at the maximum frequency
    pub fn create_sub_layers(&mut self, max_freq: f64, wave_fraction: f64) {
        let gravity = self.units.gravity();

        self.sub_layers.clear();

        let mut depth = 0.0;
        let mut stress = 0.0;

        for (i, layer) in self.layers.iter().enumerate() {
            let soil_type = &self.soil_types[layer.soil_type];
            let vs = layer.shear_vel();

            let count = (layer.thickness * max_freq * wave_fraction / vs).ceil() as usize;
            let count = count.max(1);
            let thickness = layer.thickness / count as f64;

            for _ in 0..count {
                let sub_layer = SubLayer::new(
                    thickness,
                    depth,
                    i,
                    soil_type.unit_weight,
                    vs,
                    soil_type.initial_damping,
                    stress,
                    gravity,
                );
                depth += thickness;
                stress += soil_type.unit_weight * thickness;
                self.sub_layers.push(sub_layer);
            }
        }
    }

    /// Restores every sub-layer to its initial properties.
    pub fn reset_sub_layers(&mut self) {
        for sub_layer in &mut self.sub_layers {
            sub_layer.reset();
        }
    }

    /// Updates the strain-compatible properties of one sub-layer.
    pub fn set_sub_layer_strain(&mut self, index: usize, eff_strain: f64, max_strain: f64) {
        let soil_type =
            &self.soil_types[self.layers[self.sub_layers[index].soil_layer].soil_type];
        self.sub_layers[index].set_strain(soil_type, eff_strain, max_strain);
    }

    /// Location where the input motion is applied.
    pub fn input_location(&self) -> Location {
        if self.input_depth < 0.0 || self.input_depth >= self.thickness() {
            Location::new(self.sub_layers.len(), 0.0)
        } else {
            self.depth_to_location(self.input_depth)
        }
    }

    /// Resolves a depth to the sub-layer containing it.
    ///
    /// Depths below the profile resolve to the top of the half-space.
    pub fn depth_to_location(&self, depth: f64) -> Location {
        for (i, sub_layer) in self.sub_layers.iter().enumerate() {
            if depth < sub_layer.depth_to_base() {
                return Location::new(i, depth - sub_layer.depth);
            }
        }

        Location::new(self.sub_layers.len(), 0.0)
    }

    /// Index of the half-space in the indexed accessors.
    pub fn bedrock_index(&self) -> usize {
        self.sub_layers.len()
    }

    /*
     * Indexed accessors over the discretised column. An index equal to the
     * sub-layer count addresses the half-space.
     */

    pub fn unit_wt_at(&self, layer: usize) -> f64 {
        if layer == self.sub_layers.len() {
            self.bedrock.unit_weight
        } else {
            self.sub_layers[layer].unit_weight
        }
    }

    pub fn density_at(&self, layer: usize) -> f64 {
        self.unit_wt_at(layer) / self.units.gravity()
    }

    pub fn shear_vel_at(&self, layer: usize) -> f64 {
        if layer == self.sub_layers.len() {
            self.bedrock.shear_vel()
        } else {
            self.sub_layers[layer].shear_vel()
        }
    }

    pub fn shear_mod_at(&self, layer: usize) -> f64 {
        if layer == self.sub_layers.len() {
            self.bedrock.shear_mod(self.units.gravity())
        } else {
            self.sub_layers[layer].shear_mod()
        }
    }

    pub fn damping_at(&self, layer: usize) -> f64 {
        if layer == self.sub_layers.len() {
            self.bedrock.damping()
        } else {
            self.sub_layers[layer].damping()
        }
    }

    /*
     * Profile vectors over the discretised column, used by the output
     * extractors.
     */

    /// Depth to the top of each sub-layer plus the top of the half-space.
    pub fn depth_profile(&self) -> Vec<f64> {
        let mut depths: Vec<f64> = self.sub_layers.iter().map(|sl| sl.depth).collect();
        if let Some(last) = self.sub_layers.last() {
            depths.push(last.depth_to_base());
        }
        depths
    }

    /// Depth to the middle of each sub-layer.
    pub fn depth_to_mid_profile(&self) -> Vec<f64> {
        self.sub_layers.iter().map(|sl| sl.depth_to_mid()).collect()
    }

    pub fn initial_shear_vel_profile(&self) -> Vec<f64> {
        let mut profile: Vec<f64> = self
            .sub_layers
            .iter()
            .map(|sl| sl.initial_shear_vel())
            .collect();
        profile.push(self.bedrock.shear_vel());
        profile
    }

    pub fn shear_vel_profile(&self) -> Vec<f64> {
        (0..=self.sub_layers.len())
            .map(|i| self.shear_vel_at(i))
            .collect()
    }

    pub fn shear_mod_profile(&self) -> Vec<f64> {
        (0..=self.sub_layers.len())
            .map(|i| self.shear_mod_at(i))
            .collect()
    }

    pub fn damping_profile(&self) -> Vec<f64> {
        (0..=self.sub_layers.len())
            .map(|i| self.damping_at(i))
            .collect()
    }

    pub fn v_total_stress_profile(&self) -> Vec<f64> {
        self.sub_layers.iter().map(|sl| sl.v_total_stress()).collect()
    }

    pub fn max_shear_strain_profile(&self) -> Vec<f64> {
        self.sub_layers.iter().map(|sl| sl.max_strain()).collect()
    }

    pub fn shear_stress_profile(&self) -> Vec<f64> {
        self.sub_layers.iter().map(|sl| sl.shear_stress()).collect()
    }

    pub fn stress_ratio_profile(&self) -> Vec<f64> {
        self.sub_layers.iter().map(|sl| sl.stress_ratio()).collect()
    }

    pub fn max_error_profile(&self) -> Vec<f64> {
        self.sub_layers.iter().map(|sl| sl.error()).collect()
    }

    /// Index of the soil layer with the longest travel time between two depths.
    ///
    /// Used when the layering is randomized to pick the soil properties of a
    /// generated layer.
    pub fn representative_soil_layer(&self, top: f64, base: f64) -> usize {
        let mut max_travel_time = -1.0;
        let mut representative = self.layers.len() - 1;

        for (i, layer) in self.layers.iter().enumerate() {
            let overlap = layer.depth_to_base().min(base) - layer.depth.max(top);
            if overlap <= 0.0 {
                continue;
            }

            let travel_time = overlap / layer.shear_vel();
            if travel_time > max_travel_time {
                max_travel_time = travel_time;
                representative = i;
            }
        }

        representative
    }

    /// Validates the profile for use in a calculation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.layers.is_empty() {
            return Err(ValidationError {
                code: "profile.layers.empty".to_string(),
                message: "The profile must contain at least one soil layer.".to_string(),
            });
        }

        if self.soil_types.is_empty() {
            return Err(ValidationError {
                code: "profile.soil_types.empty".to_string(),
                message: "The profile must contain at least one soil type.".to_string(),
            });
        }

        for soil_type in &self.soil_types {
            soil_type.validate()?;
        }

        for layer in &self.layers {
            layer.validate(self.soil_types.len())?;
        }

        self.bedrock.validate()?;

        Ok(())
    }
}
