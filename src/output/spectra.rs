use serde::{Deserialize, Serialize};

use crate::calculator::equiv_linear::EquivLinearCalc;
use crate::enums::MotionType;
use crate::models::location::Location;
use crate::models::profile::Profile;
use crate::motion::Motion;
use crate::output::statistics::OutputStatistics;

/// A point of interest for a spectral output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputLocation {
    /// A depth in the profile; zero is the ground surface
    Depth(f64),
    /// The top of the half-space
    Bedrock,
}

impl OutputLocation {
    pub fn resolve(&self, profile: &Profile) -> Location {
        match self {
            OutputLocation::Depth(depth) => profile.depth_to_location(*depth),
            OutputLocation::Bedrock => Location::new(profile.sub_layer_count(), 0.0),
        }
    }
}

/// Per-frequency or per-period quantity extracted from every realisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpectraOutputKind {
    /// Acceleration response spectrum at a location
    ResponseSpectrum {
        location: OutputLocation,
        motion_type: MotionType,
    },
    /// Fourier amplitude spectrum of acceleration at a location
    FourierSpectrum {
        location: OutputLocation,
        motion_type: MotionType,
    },
    /// Modulus of the acceleration transfer function between two locations
    AccelTransferFunction {
        in_location: OutputLocation,
        in_type: MotionType,
        out_location: OutputLocation,
        out_type: MotionType,
    },
    /// Modulus of the strain transfer function at a location
    StrainTransferFunction { location: OutputLocation },
    /// Ratio of the response spectra of two locations
    ResponseSpectrumRatio {
        in_location: OutputLocation,
        in_type: MotionType,
        out_location: OutputLocation,
        out_type: MotionType,
    },
}

impl SpectraOutputKind {
    pub fn name(&self) -> &'static str {
        match self {
            SpectraOutputKind::ResponseSpectrum { .. } => "Acceleration Response Spectrum",
            SpectraOutputKind::FourierSpectrum { .. } => "Fourier Amplitude Spectrum",
            SpectraOutputKind::AccelTransferFunction { .. } => "Acceleration Transfer Function",
            SpectraOutputKind::StrainTransferFunction { .. } => "Strain Transfer Function",
            SpectraOutputKind::ResponseSpectrumRatio { .. } => "Response Spectrum Ratio",
        }
    }

    /// Period-referenced outputs; the rest are frequency-referenced.
    pub fn needs_period(&self) -> bool {
        matches!(
            self,
            SpectraOutputKind::ResponseSpectrum { .. }
                | SpectraOutputKind::ResponseSpectrumRatio { .. }
        )
    }
}

/// Collects one column per (site, motion) pair of a spectral quantity.
///
/// Frequency-referenced quantities computed on the motion grid are resampled
/// onto the catalog frequency grid; period-referenced quantities are computed
/// directly on the catalog period grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectraOutput {
    pub kind: SpectraOutputKind,
    /// Catalog period or frequency grid, depending on the kind
    reference: Vec<f64>,
    /// Oscillator damping in percent for period-referenced outputs
    damping: f64,
    data: Vec<Vec<f64>>,
    pub statistics: Option<OutputStatistics>,
}

impl SpectraOutput {
    pub fn new(kind: SpectraOutputKind) -> Self {
        Self {
            kind,
            reference: Vec::new(),
            damping: 5.0,
            data: Vec::new(),
            statistics: None,
        }
    }

    /// Installs the catalog reference grids.
    pub fn initialize(&mut self, frequency: &[f64], period: &[f64], damping: f64) {
        self.reference = if self.kind.needs_period() {
            period.to_vec()
        } else {
            frequency.to_vec()
        };
        self.damping = damping;
        self.data.clear();
        self.statistics = None;
    }

    pub fn reference(&self) -> &[f64] {
        &self.reference
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
        let column = match &self.kind {
            SpectraOutputKind::ResponseSpectrum {
                location,
                motion_type,
            } => {
                let tf = calc.calc_accel_tf(
                    &calc.input_location(),
                    calc.input_type(),
                    &location.resolve(profile),
                    *motion_type,
                );
                motion.compute_sa(&self.reference, self.damping, Some(&tf))
            }
            SpectraOutputKind::FourierSpectrum {
                location,
                motion_type,
            } => {
                let tf = calc.calc_accel_tf(
                    &calc.input_location(),
                    calc.input_type(),
                    &location.resolve(profile),
                    *motion_type,
                );
                let fas = motion.abs_fourier_acc(Some(&tf));
                resample_log_freq(motion.freq(), &fas, &self.reference)
            }
            SpectraOutputKind::AccelTransferFunction {
                in_location,
                in_type,
                out_location,
                out_type,
            } => {
                let tf = calc.calc_accel_tf(
                    &in_location.resolve(profile),
                    *in_type,
                    &out_location.resolve(profile),
                    *out_type,
                );
                let modulus: Vec<f64> = tf.iter().map(|c| c.norm()).collect();
                resample_log_freq(motion.freq(), &modulus, &self.reference)
            }
            SpectraOutputKind::StrainTransferFunction { location } => {
                let tf = calc.calc_strain_tf(location.resolve(profile));
                let modulus: Vec<f64> = tf.iter().map(|c| c.norm()).collect();
                resample_log_freq(motion.freq(), &modulus, &self.reference)
            }
            SpectraOutputKind::ResponseSpectrumRatio {
                in_location,
                in_type,
                out_location,
                out_type,
            } => {
                let out_tf = calc.calc_accel_tf(
                    &calc.input_location(),
                    calc.input_type(),
                    &out_location.resolve(profile),
                    *out_type,
                );
                let in_tf = calc.calc_accel_tf(
                    &calc.input_location(),
                    calc.input_type(),
                    &in_location.resolve(profile),
                    *in_type,
                );

                let out_sa = motion.compute_sa(&self.reference, self.damping, Some(&out_tf));
                let in_sa = motion.compute_sa(&self.reference, self.damping, Some(&in_tf));

                out_sa
                    .iter()
                    .zip(in_sa.iter())
                    .map(|(&out, &input)| out / input)
                    .collect()
            }
        };

        self.data.push(column);
    }
}

/// Resamples a spectrum onto the catalog frequency grid.
///
/// Linear interpolation on log frequency; reference bins outside the motion
/// grid are dropped to NaN.
fn resample_log_freq(freq: &[f64], values: &[f64], reference: &[f64]) -> Vec<f64> {
    // The motion grid may start at zero frequency; log interpolation skips it
    let start = freq.iter().position(|&f| f > 0.0).unwrap_or(0);
    let log_freq: Vec<f64> = freq[start..].iter().map(|&f| f.log10()).collect();
    let values = &values[start..];

    reference
        .iter()
        .map(|&f| {
            if f < freq[start] || f > freq[freq.len() - 1] {
                f64::NAN
            } else {
                crate::helper::interp1d(&log_freq, values, f.log10())
            }
        })
        .collect()
}
