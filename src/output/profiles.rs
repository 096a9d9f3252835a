use serde::{Deserialize, Serialize};

use crate::calculator::equiv_linear::EquivLinearCalc;
use crate::models::profile::Profile;
use crate::motion::Motion;
use crate::output::statistics::OutputStatistics;

/// Per-depth quantity extracted from every realisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileOutputKind {
    InitialShearVel,
    FinalShearVel,
    MaxAccel,
    MaxVel,
    MaxStrain,
    MaxStress,
    StressRatio,
    VerticalTotalStress,
    FinalDamping,
    MaxError,
}

impl ProfileOutputKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProfileOutputKind::InitialShearVel => "Initial Shear-Wave Velocity",
            ProfileOutputKind::FinalShearVel => "Final Shear-Wave Velocity",
            ProfileOutputKind::MaxAccel => "Maximum Acceleration",
            ProfileOutputKind::MaxVel => "Maximum Velocity",
            ProfileOutputKind::MaxStrain => "Maximum Shear Strain",
            ProfileOutputKind::MaxStress => "Maximum Shear Stress",
            ProfileOutputKind::StressRatio => "Stress Ratio",
            ProfileOutputKind::VerticalTotalStress => "Vertical Total Stress",
            ProfileOutputKind::FinalDamping => "Final Damping",
            ProfileOutputKind::MaxError => "Maximum Iteration Error",
        }
    }

    /// Strain-based quantities are defined at the sub-layer mid-depths and
    /// extrapolated past the deepest mid-depth instead of dropped.
    pub fn is_mid_depth(&self) -> bool {
        matches!(
            self,
            ProfileOutputKind::MaxStrain
                | ProfileOutputKind::MaxStress
                | ProfileOutputKind::StressRatio
                | ProfileOutputKind::VerticalTotalStress
                | ProfileOutputKind::FinalDamping
                | ProfileOutputKind::MaxError
        )
    }
}

/// Collects one column per (site, motion) pair of a per-depth quantity.
///
/// Columns are resampled onto the reference depth grid of the base profile
/// before storage; bins outside a realisation's depth range hold NaN and are
/// skipped by the statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileOutput {
    pub kind: ProfileOutputKind,
    ref_depth: Vec<f64>,
    data: Vec<Vec<f64>>,
    pub statistics: Option<OutputStatistics>,
}

impl ProfileOutput {
    pub fn new(kind: ProfileOutputKind) -> Self {
        Self {
            kind,
            ref_depth: Vec::new(),
            data: Vec::new(),
            statistics: None,
        }
    }

    /// Sets the reference depth grid from the base profile discretisation.
    pub fn initialize(&mut self, base: &Profile) {
        self.ref_depth = if self.kind.is_mid_depth() {
            base.depth_to_mid_profile()
        } else {
            base.depth_profile()
        };
        self.data.clear();
        self.statistics = None;
    }

    pub fn ref_depth(&self) -> &[f64] {
        &self.ref_depth
    }

    pub fn column_count(&self) -> usize {
        self.data.len()
    }

    pub fn column(&self, index: usize) -> &Vec<f64> {
        &self.data[index]
    }

    pub fn columns(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn truncate(&mut self, columns: usize) {
        self.data.truncate(columns);
    }

    /// Extracts the quantity from the realisation and stores a column.
    pub fn add_data(&mut self, calc: &EquivLinearCalc, profile: &Profile, motion: &Motion) {
        let gravity = profile.units.gravity();

        let (depths, values) = match self.kind {
            ProfileOutputKind::InitialShearVel => {
                (profile.depth_profile(), profile.initial_shear_vel_profile())
            }
            ProfileOutputKind::FinalShearVel => {
                (profile.depth_profile(), profile.shear_vel_profile())
            }
            ProfileOutputKind::MaxAccel => {
                (profile.depth_profile(), calc.max_accel_profile(motion))
            }
            ProfileOutputKind::MaxVel => {
                let values = calc
                    .max_vel_profile(motion)
                    .iter()
                    .map(|&v| gravity * v)
                    .collect();
                (profile.depth_profile(), values)
            }
            ProfileOutputKind::MaxStrain => {
                (profile.depth_to_mid_profile(), profile.max_shear_strain_profile())
            }
            ProfileOutputKind::MaxStress => {
                (profile.depth_to_mid_profile(), profile.shear_stress_profile())
            }
            ProfileOutputKind::StressRatio => {
                (profile.depth_to_mid_profile(), profile.stress_ratio_profile())
            }
            ProfileOutputKind::VerticalTotalStress => {
                (profile.depth_to_mid_profile(), profile.v_total_stress_profile())
            }
            ProfileOutputKind::FinalDamping => {
                let values = profile.sub_layers().iter().map(|sl| sl.damping()).collect();
                (profile.depth_to_mid_profile(), values)
            }
            ProfileOutputKind::MaxError => {
                (profile.depth_to_mid_profile(), profile.max_error_profile())
            }
        };

        self.data
            .push(resample(&depths, &values, &self.ref_depth, self.kind.is_mid_depth()));
    }
}

/// Resamples a column onto the reference grid by linear interpolation.
///
/// Reference bins above the sampled range are dropped to NaN. Below the
/// sampled range mid-depth quantities are extended with the slope of the last
/// two samples (the base sub-layer is extended); top-of-layer quantities are
/// dropped.
fn resample(depths: &[f64], values: &[f64], ref_depth: &[f64], extrapolate: bool) -> Vec<f64> {
    let n = depths.len();

    ref_depth
        .iter()
        .map(|&d| {
            if d < depths[0] {
                f64::NAN
            } else if d > depths[n - 1] {
                if extrapolate && n > 1 {
                    let slope =
                        (values[n - 1] - values[n - 2]) / (depths[n - 1] - depths[n - 2]);
                    values[n - 1] + slope * (d - depths[n - 1])
                } else {
                    f64::NAN
                }
            } else {
                crate::helper::interp1d(depths, values, d)
            }
        })
        .collect()
}
