use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, validate_field};

/// A soil layer of finite thickness.
///
/// The layer references a soil type by index into the profile's catalog and
/// carries an average shear-wave velocity along with the current (possibly
/// randomized) velocity. For a log-normal velocity distribution the average
/// represents the median.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilLayer {
    /// Index of the soil type in the profile catalog
    pub soil_type: usize,
    /// Average (median) shear-wave velocity
    pub avg_velocity: f64,
    /// Current shear-wave velocity, varies with randomization
    velocity: f64,
    /// Layer thickness
    pub thickness: f64,
    /// Depth to the top of the layer, maintained by the profile
    pub depth: f64,
    /// If the velocity of this layer is randomized
    pub is_varied: bool,
    /// Layer-specific standard deviation of ln(velocity)
    pub stdev: Option<f64>,
    /// Lower bound on the randomized velocity
    pub min_velocity: Option<f64>,
    /// Upper bound on the randomized velocity
    pub max_velocity: Option<f64>,
}

impl SoilLayer {
    pub fn new(soil_type: usize, avg_velocity: f64, thickness: f64) -> Self {
        Self {
            soil_type,
            avg_velocity,
            velocity: avg_velocity,
            thickness,
            depth: 0.0,
            is_varied: true,
            stdev: None,
            min_velocity: None,
            max_velocity: None,
        }
    }

    pub fn shear_vel(&self) -> f64 {
        self.velocity
    }

    /// Sets the randomized shear-wave velocity, clamped to the layer bounds.
    pub fn set_shear_vel(&mut self, velocity: f64) {
        let mut v = velocity;
        if let Some(min) = self.min_velocity {
            v = v.max(min);
        }
        if let Some(max) = self.max_velocity {
            v = v.min(max);
        }
        self.velocity = v;
    }

    /// Restores the velocity to the average value.
    pub fn reset_velocity(&mut self) {
        self.velocity = self.avg_velocity;
    }

    pub fn depth_to_mid(&self) -> f64 {
        self.depth + self.thickness / 2.0
    }

    pub fn depth_to_base(&self) -> f64 {
        self.depth + self.thickness
    }

    pub fn validate(&self, soil_type_count: usize) -> Result<(), ValidationError> {
        validate_field("thickness", self.thickness, Some(0.0001), None, "soil_layer")?;
        validate_field("avg_velocity", self.avg_velocity, Some(0.0001), None, "soil_layer")?;

        if self.soil_type >= soil_type_count {
            return Err(ValidationError {
                code: "soil_layer.soil_type.out_of_range".to_string(),
                message: format!(
                    "Soil type index {} is out of range for a catalog of {} types.",
                    self.soil_type, soil_type_count
                ),
            });
        }

        Ok(())
    }
}

/// The half-space terminating the soil column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RockLayer {
    /// Average (median) shear-wave velocity
    pub avg_velocity: f64,
    /// Current shear-wave velocity, varies with randomization
    velocity: f64,
    /// Unit weight in the configured unit system
    pub unit_weight: f64,
    /// Average damping in percent
    pub avg_damping: f64,
    /// Current damping in percent, varies with randomization
    damping: f64,
    /// If the velocity of the bedrock is randomized
    pub is_varied: bool,
    /// Layer-specific standard deviation of ln(velocity)
    pub stdev: Option<f64>,
}

impl RockLayer {
    pub fn new(avg_velocity: f64, unit_weight: f64, avg_damping: f64) -> Self {
        Self {
            avg_velocity,
            velocity: avg_velocity,
            unit_weight,
            avg_damping,
            damping: avg_damping,
            is_varied: false,
            stdev: None,
        }
    }

    pub fn shear_vel(&self) -> f64 {
        self.velocity
    }

    pub fn set_shear_vel(&mut self, velocity: f64) {
        self.velocity = velocity;
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn set_damping(&mut self, damping: f64) {
        self.damping = damping;
    }

    pub fn density(&self, gravity: f64) -> f64 {
        self.unit_weight / gravity
    }

    pub fn shear_mod(&self, gravity: f64) -> f64 {
        self.density(gravity) * self.velocity * self.velocity
    }

    /// Restores the velocity and damping to their average values.
    pub fn reset(&mut self) {
        self.velocity = self.avg_velocity;
        self.damping = self.avg_damping;
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_field("avg_velocity", self.avg_velocity, Some(0.0001), None, "rock_layer")?;
        validate_field("unit_weight", self.unit_weight, Some(0.0001), None, "rock_layer")?;
        validate_field("avg_damping", self.avg_damping, Some(0.0), Some(100.0), "rock_layer")?;

        Ok(())
    }
}
