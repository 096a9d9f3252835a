pub mod inversion;
pub mod point_source;
pub mod quadrature;
pub mod rvt;
pub mod time_series;

use num_complex::Complex64;

use crate::enums::MotionType;
use crate::models::response_spectrum::ResponseSpectrum;
use rvt::RvtMotion;
use time_series::TimeSeriesMotion;

/// An input ground motion.
///
/// The calculator is written against the capability surface of this enum
/// only: a frequency grid, peak extraction through a transfer function, and
/// response spectrum computation. The `Rvt` variant additionally carries a
/// stochastic duration.
#[derive(Debug, Clone)]
pub enum Motion {
    TimeSeries(TimeSeriesMotion),
    Rvt(RvtMotion),
}

impl Motion {
    pub fn name(&self) -> &str {
        match self {
            Motion::TimeSeries(m) => &m.name,
            Motion::Rvt(m) => &m.name,
        }
    }

    pub fn motion_type(&self) -> MotionType {
        match self {
            Motion::TimeSeries(m) => m.motion_type,
            Motion::Rvt(m) => m.motion_type,
        }
    }

    /// Frequency grid of the motion in Hz.
    pub fn freq(&self) -> &[f64] {
        match self {
            Motion::TimeSeries(m) => m.freq(),
            Motion::Rvt(m) => m.freq(),
        }
    }

    pub fn freq_count(&self) -> usize {
        self.freq().len()
    }

    pub fn freq_at(&self, i: usize) -> f64 {
        self.freq()[i]
    }

    /// Angular frequency at index `i` in rad/s.
    pub fn ang_freq_at(&self, i: usize) -> f64 {
        2.0 * std::f64::consts::PI * self.freq_at(i)
    }

    pub fn freq_max(&self) -> f64 {
        self.freq().last().copied().unwrap_or(0.0)
    }

    /// Expected peak acceleration in g through a transfer function.
    pub fn max(&self, tf: Option<&[Complex64]>) -> f64 {
        match self {
            Motion::TimeSeries(m) => m.max(tf),
            Motion::Rvt(m) => m.max(tf),
        }
    }

    /// Expected peak velocity in g-s through a transfer function.
    ///
    /// Callers scale by gravity to obtain velocity in the configured units.
    pub fn max_vel(&self, tf: Option<&[Complex64]>) -> f64 {
        match self {
            Motion::TimeSeries(m) => m.max_vel(tf),
            Motion::Rvt(m) => m.max_vel(tf),
        }
    }

    /// Expected peak displacement in g-s^2 through a transfer function.
    pub fn max_disp(&self, tf: Option<&[Complex64]>) -> f64 {
        match self {
            Motion::TimeSeries(m) => m.max_disp(tf),
            Motion::Rvt(m) => m.max_disp(tf),
        }
    }

    /// Peak of the series produced by a strain transfer function.
    ///
    /// The strain transfer function already converts acceleration into
    /// strain, so this is the plain peak operator; the caller multiplies by
    /// gravity and by 100 to express the strain in percent.
    pub fn calc_max_strain(&self, tf: &[Complex64]) -> f64 {
        self.max(Some(tf))
    }

    /// Response spectrum through a transfer function.
    ///
    /// # Arguments
    /// * `periods` - Oscillator periods in s
    /// * `damping` - Oscillator damping in percent
    /// * `tf` - Optional transfer function applied to the motion
    pub fn compute_sa(&self, periods: &[f64], damping: f64, tf: Option<&[Complex64]>) -> Vec<f64> {
        match self {
            Motion::TimeSeries(m) => m.compute_sa(periods, damping, tf),
            Motion::Rvt(m) => m.compute_sa(periods, damping, tf),
        }
    }

    /// Absolute Fourier amplitude spectrum of acceleration in g-s.
    pub fn abs_fourier_acc(&self, tf: Option<&[Complex64]>) -> Vec<f64> {
        match self {
            Motion::TimeSeries(m) => m.abs_fourier_acc(tf),
            Motion::Rvt(m) => m.abs_fourier_acc(tf),
        }
    }

    /// Duration of the motion in seconds.
    ///
    /// For RVT motions this is the stochastic ground-motion duration; for
    /// recorded motions it is the length of the record.
    pub fn duration(&self) -> f64 {
        match self {
            Motion::TimeSeries(m) => m.duration(),
            Motion::Rvt(m) => m.duration(),
        }
    }

    /// Response spectrum of the motion itself.
    pub fn response_spectrum(&self, periods: &[f64], damping: f64) -> ResponseSpectrum {
        ResponseSpectrum::new(
            periods.to_vec(),
            damping,
            self.compute_sa(periods, damping, None),
        )
    }
}

/// The input motions of a run, each with an enabled flag.
#[derive(Debug, Clone, Default)]
pub struct MotionLibrary {
    motions: Vec<Motion>,
    enabled: Vec<bool>,
}

impl MotionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, motion: Motion) {
        self.motions.push(motion);
        self.enabled.push(true);
    }

    pub fn motions(&self) -> &[Motion] {
        &self.motions
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) {
        if let Some(value) = self.enabled.get_mut(index) {
            *value = enabled;
        }
    }

    /// Enabled motions in input order.
    pub fn enabled_motions(&self) -> impl Iterator<Item = &Motion> {
        self.motions
            .iter()
            .zip(self.enabled.iter())
            .filter_map(|(motion, &enabled)| enabled.then_some(motion))
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled.iter().filter(|&&enabled| enabled).count()
    }

    pub fn enabled_names(&self) -> Vec<String> {
        self.enabled_motions()
            .map(|motion| motion.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.motions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }
}

/// Transfer function of a single-degree-of-freedom oscillator.
///
/// ```text
///                         -fn^2
///  H = -------------------------------------------------
///       ( f^2 - fn^2 ) - 2 * sqrt(-1) * (d/100) * fn * f
/// ```
///
/// # Arguments
/// * `freq` - Frequency grid in Hz
/// * `period` - Natural period of the oscillator in s
/// * `damping` - Damping ratio in percent
pub fn sdof_tf(freq: &[f64], period: f64, damping: f64) -> Vec<Complex64> {
    let fn_ = 1.0 / period;

    freq.iter()
        .map(|&f| {
            Complex64::new(-fn_ * fn_, 0.0)
                / Complex64::new(f * f - fn_ * fn_, -2.0 * (damping / 100.0) * fn_ * f)
        })
        .collect()
}
