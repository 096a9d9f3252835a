use serde::{Deserialize, Serialize};

/// Method used to compute the site response.
///
/// # Variants
/// * `LinearElastic` - Single pass with the initial properties
/// * `EquivalentLinear` - Strain-compatible iteration (SHAKE type analysis)
/// * `FrequencyDependent` - Equivalent linear with frequency dependent strain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    LinearElastic,
    EquivalentLinear,
    FrequencyDependent,
}

/// How a motion is specified relative to the wave field.
///
/// # Variants
/// * `Outcrop` - Recorded at a free surface, includes free-surface doubling (2A)
/// * `Within` - Recorded at depth inside a layer, up- and down-going waves (A + B)
/// * `IncomingOnly` - Only the up-going wave (A)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionType {
    Outcrop,
    Within,
    IncomingOnly,
}

/// Correction applied to the RMS duration of an oscillator response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OscillatorCorrection {
    BooreJoyner,
    LiuPezeshk,
}

/// Published parameter sets for the Toro velocity variation model.
///
/// The GeoMatrix classes are based on site geology, the USGS classes on the
/// average shear-wave velocity in the upper 30 m.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VelocityModel {
    Custom,
    GeoMatrixAB,
    GeoMatrixCD,
    UsgsAB,
    UsgsCD,
    UsgsA,
    UsgsB,
    UsgsC,
    UsgsD,
}

/// Parameter source for the Toro layering model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayeringModel {
    Custom,
    /// Default coefficients from Toro (1995)
    Toro95,
}

/// Statistical distribution of a randomized scalar (e.g. depth to bedrock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionType {
    Normal,
    LogNormal,
    Uniform,
}

/// Standard deviation model for nonlinear curve variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StdevModel {
    /// Closed-form model from Darendeli (2001)
    Darendeli,
    /// Tabulated stdev as a function of strain
    Custom,
}

/// Regional parameter set for the point source motion model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Custom,
    /// Western North America
    Wus,
    /// Central and Eastern North America
    Ceus,
}

/// Level of detail of the calculation log.
///
/// # Variants
/// * `Low` - Input echo and the progress of the calculation
/// * `Medium` - Low plus the results of each run of the calculation
/// * `High` - Results for each iteration of the calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Low,
    Medium,
    High,
}

/// Unit system of the profile and motions.
///
/// Gravity is applied once, when peak strains are converted to percent and
/// when velocity and displacement peaks are scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSystem {
    Metric,
    English,
}

impl UnitSystem {
    /// Acceleration of gravity in the length unit of the system.
    pub fn gravity(&self) -> f64 {
        match self {
            UnitSystem::Metric => 9.81,
            UnitSystem::English => 32.2,
        }
    }

    /// Conversion factor from the length unit to meters.
    pub fn to_meters(&self) -> f64 {
        match self {
            UnitSystem::Metric => 1.0,
            UnitSystem::English => 0.3048,
        }
    }
}
