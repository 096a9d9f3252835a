use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::enums::{MotionType, OscillatorCorrection};
use crate::motion::point_source::PointSourceModel;
use crate::motion::quadrature::integrate_semi_infinite;
use crate::motion::sdof_tf;

/// A motion defined by a Fourier amplitude spectrum and a duration.
///
/// Random vibration theory converts the spectrum into expected peak values:
/// the spectral moments of the squared spectrum give the RMS amplitude and
/// the bandwidth, and the Cartwright and Longuet-Higgins peak factor scales
/// the RMS up to the expected maximum of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RvtMotion {
    pub name: String,
    pub motion_type: MotionType,
    /// Frequency grid in Hz
    pub(crate) freq: Vec<f64>,
    /// One-sided Fourier amplitude spectrum of acceleration in g-s
    pub(crate) fas: Vec<f64>,
    /// Ground motion duration in seconds
    pub(crate) duration: f64,
    pub osc_correction: OscillatorCorrection,
}

impl RvtMotion {
    /// Creates a motion from a defined Fourier amplitude spectrum.
    pub fn from_fas(
        name: impl Into<String>,
        motion_type: MotionType,
        freq: Vec<f64>,
        fas: Vec<f64>,
        duration: f64,
    ) -> Self {
        Self {
            name: name.into(),
            motion_type,
            freq,
            fas,
            duration,
            osc_correction: OscillatorCorrection::LiuPezeshk,
        }
    }

    /// Creates a motion from the Brune point source model.
    ///
    /// The frequency grid is log spaced over [0.05, `max_eng_freq`] with 1024
    /// points and the duration is the source plus path duration of the model.
    pub fn from_point_source(
        name: impl Into<String>,
        motion_type: MotionType,
        model: &PointSourceModel,
        max_eng_freq: f64,
    ) -> Self {
        let freq = crate::helper::log_space(0.05, max_eng_freq, 1024);
        let fas = model.fourier_spectrum(&freq);
        let duration = model.duration();

        Self {
            name: name.into(),
            motion_type,
            freq,
            fas,
            duration,
            osc_correction: OscillatorCorrection::LiuPezeshk,
        }
    }

    pub fn freq(&self) -> &[f64] {
        &self.freq
    }

    pub fn fas(&self) -> &[f64] {
        &self.fas
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Expected peak acceleration in g through a transfer function.
    pub fn max(&self, tf: Option<&[Complex64]>) -> f64 {
        self.calc_max(&self.abs_fourier_acc(tf), None)
    }

    /// Expected peak velocity in g-s through a transfer function.
    pub fn max_vel(&self, tf: Option<&[Complex64]>) -> f64 {
        self.calc_max(&self.abs_fourier_vel(tf), None)
    }

    /// Expected peak displacement in g-s^2 through a transfer function.
    pub fn max_disp(&self, tf: Option<&[Complex64]>) -> f64 {
        self.calc_max(&self.abs_fourier_disp(tf), None)
    }

    /// Spectrum of the motion with a transfer function applied.
    pub fn abs_fourier_acc(&self, tf: Option<&[Complex64]>) -> Vec<f64> {
        match tf {
            Some(tf) => {
                debug_assert_eq!(tf.len(), self.fas.len());
                self.fas
                    .iter()
                    .zip(tf.iter())
                    .map(|(&fas, tf)| tf.norm() * fas)
                    .collect()
            }
            None => self.fas.clone(),
        }
    }

    /// Velocity spectrum, integrated once in the frequency domain.
    pub fn abs_fourier_vel(&self, tf: Option<&[Complex64]>) -> Vec<f64> {
        let mut fa = self.abs_fourier_acc(tf);
        for (value, &freq) in fa.iter_mut().zip(self.freq.iter()) {
            *value /= 2.0 * PI * freq;
        }
        fa
    }

    /// Displacement spectrum, integrated twice in the frequency domain.
    pub fn abs_fourier_disp(&self, tf: Option<&[Complex64]>) -> Vec<f64> {
        let mut fa = self.abs_fourier_acc(tf);
        for (value, &freq) in fa.iter_mut().zip(self.freq.iter()) {
            *value /= (2.0 * PI * freq).powi(2);
        }
        fa
    }

    /// Response spectrum through a transfer function.
    pub fn compute_sa(&self, periods: &[f64], damping: f64, tf: Option<&[Complex64]>) -> Vec<f64> {
        let fas = self.abs_fourier_acc(tf);

        periods
            .iter()
            .map(|&period| self.calc_oscillator_max(&fas, period, damping))
            .collect()
    }

    /// Expected peak of a single-degree-of-freedom oscillator response.
    pub fn calc_oscillator_max(&self, fas: &[f64], period: f64, damping: f64) -> f64 {
        let tf = sdof_tf(&self.freq, period, damping);

        let osc_fas: Vec<f64> = fas
            .iter()
            .zip(tf.iter())
            .map(|(&fas, tf)| fas * tf.norm())
            .collect();

        let duration_rms = self.calc_rms_duration(period, damping, Some(&osc_fas));
        self.calc_max(&osc_fas, Some(duration_rms))
    }

    /// Expected peak value of the process described by a spectrum.
    ///
    /// The peak is the RMS amplitude `sqrt(m0 / duration_rms)` scaled by the
    /// Cartwright and Longuet-Higgins peak factor. Non-finite bandwidth or
    /// extrema count short circuits to a peak factor of one and logs a
    /// diagnostic dump of the inputs.
    ///
    /// # Arguments
    /// * `fas` - Fourier amplitude spectrum on the motion frequency grid
    /// * `duration_rms` - RMS duration; the ground motion duration if `None`
    pub fn calc_max(&self, fas: &[f64], duration_rms: Option<f64>) -> f64 {
        let duration_rms = duration_rms.unwrap_or(self.duration);

        let fas_sqr: Vec<f64> = fas.iter().map(|&v| v * v).collect();

        // The zero moment is the area of the spectral density
        let m0 = self.moment(0, &fas_sqr);
        let m2 = self.moment(2, &fas_sqr);
        let m4 = self.moment(4, &fas_sqr);

        // Bounded by one through the Cauchy-Schwarz inequality; rounding may
        // nudge a degenerate spectrum past it
        let band_width = ((m2 * m2) / (m0 * m4)).sqrt().min(1.0);

        // At least one full cycle (two extrema) must occur
        let num_extrema = ((m4 / m2).sqrt() * self.duration / PI).max(2.0);

        let peak_factor = if !band_width.is_finite() || !num_extrema.is_finite() {
            log::warn!(
                "non-finite peak factor inputs: duration={} duration_rms={} m0={} m2={} m4={} \
                 band_width={} num_extrema={}",
                self.duration,
                duration_rms,
                m0,
                m2,
                m4,
                band_width,
                num_extrema
            );
            1.0
        } else {
            let result = integrate_semi_infinite(
                |z| 1.0 - (1.0 - band_width * (-z * z).exp()).powf(num_extrema),
                1e-7,
            );

            if !result.converged {
                log::warn!(
                    "peak factor quadrature exhausted its subdivisions (band_width={}, \
                     num_extrema={}); using the best estimate",
                    band_width,
                    num_extrema
                );
            }

            2f64.sqrt() * result.value
        };

        (m0 / duration_rms).sqrt() * peak_factor
    }

    /// Spectral moment of order `power` by the trapezoid rule.
    ///
    /// ```text
    ///           /
    /// m_n = 2 * | ( 2 * pi * freq )^n * FAS^2 * df
    ///           /
    /// ```
    pub fn moment(&self, power: i32, fas_sqr: &[f64]) -> f64 {
        let mut sum = 0.0;
        let mut last = (2.0 * PI * self.freq[0]).powi(power) * fas_sqr[0];

        for i in 1..fas_sqr.len() {
            let current = (2.0 * PI * self.freq[i]).powi(power) * fas_sqr[i];
            // Frequency may be increasing or decreasing, just want the difference
            let d_freq = (self.freq[i] - self.freq[i - 1]).abs();

            sum += d_freq * (current + last) / 2.0;
            last = current;
        }

        2.0 * sum
    }

    /// RMS duration of an oscillator response.
    ///
    /// The ground motion duration is extended by a fraction of the oscillator
    /// duration; the fraction grows with the ratio of the ground motion
    /// duration to the oscillator period.
    ///
    /// # Arguments
    /// * `period` - Natural period of the oscillator in s
    /// * `damping` - Damping ratio in percent
    /// * `fas` - Oscillator response spectrum for the Liu and Pezeshk
    ///   correction; `None` falls back to Boore and Joyner
    pub fn calc_rms_duration(&self, period: f64, damping: f64, fas: Option<&[f64]>) -> f64 {
        let duration_osc = period / (2.0 * PI * damping / 100.0);

        let (power, bar) = match (self.osc_correction, fas) {
            (OscillatorCorrection::BooreJoyner, _) | (_, None) => (3, 1.0 / 3.0),
            (OscillatorCorrection::LiuPezeshk, Some(fas)) => {
                let fas_sqr: Vec<f64> = fas.iter().map(|&v| v * v).collect();

                let m0 = self.moment(0, &fas_sqr);
                let m1 = self.moment(1, &fas_sqr);
                let m2 = self.moment(2, &fas_sqr);

                (2, (2.0 * PI * (1.0 - (m1 * m1) / (m0 * m2))).sqrt())
            }
        };

        let ratio = (self.duration / period).powi(power);

        self.duration + duration_osc * (ratio / (ratio + bar))
    }
}
