use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::enums::MotionType;
use crate::helper::smooth;
use crate::motion::sdof_tf;

/// A recorded acceleration time series.
///
/// The record is padded to a power of two and transformed once on
/// construction; all peak extraction happens by applying transfer functions
/// to the Fourier coefficients and transforming back to the time domain.
#[derive(Debug, Clone)]
pub struct TimeSeriesMotion {
    pub name: String,
    pub motion_type: MotionType,
    /// Sampling interval in seconds
    time_step: f64,
    /// Recorded acceleration in g
    accel: Vec<f64>,
    /// One-sided frequency grid in Hz, starting at zero
    freq: Vec<f64>,
    /// One-sided Fourier coefficients, scaled so the unscaled inverse
    /// transform reproduces the record
    fourier_acc: Vec<Complex64>,
    /// Padded record length
    padded_len: usize,
}

impl TimeSeriesMotion {
    /// Creates a motion from an acceleration record.
    ///
    /// # Arguments
    /// * `name` - Motion name (e.g. the record file stem)
    /// * `motion_type` - How the motion is applied
    /// * `time_step` - Sampling interval in seconds
    /// * `accel` - Acceleration samples in g
    pub fn new(
        name: impl Into<String>,
        motion_type: MotionType,
        time_step: f64,
        accel: Vec<f64>,
    ) -> Self {
        let padded_len = accel.len().next_power_of_two();

        let mut buffer: Vec<Complex64> = accel
            .iter()
            .map(|&a| Complex64::new(a, 0.0))
            .chain(std::iter::repeat(Complex64::new(0.0, 0.0)))
            .take(padded_len)
            .collect();

        let mut planner = FftPlanner::new();
        planner.plan_fft_forward(padded_len).process(&mut buffer);

        let scale = 1.0 / padded_len as f64;
        let fourier_acc: Vec<Complex64> = buffer[..=padded_len / 2]
            .iter()
            .map(|&c| c * scale)
            .collect();

        let freq = (0..=padded_len / 2)
            .map(|i| i as f64 / (padded_len as f64 * time_step))
            .collect();

        Self {
            name: name.into(),
            motion_type,
            time_step,
            accel,
            freq,
            fourier_acc,
            padded_len,
        }
    }

    pub fn freq(&self) -> &[f64] {
        &self.freq
    }

    pub fn accel(&self) -> &[f64] {
        &self.accel
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Length of the record in seconds.
    pub fn duration(&self) -> f64 {
        self.accel.len() as f64 * self.time_step
    }

    /// Time series with a transfer function applied to the coefficients.
    pub fn time_series(&self, tf: Option<&[Complex64]>) -> Vec<f64> {
        let half = self.padded_len / 2;
        let mut full = vec![Complex64::new(0.0, 0.0); self.padded_len];

        for i in 0..=half {
            full[i] = match tf {
                Some(tf) => self.fourier_acc[i] * tf[i],
                None => self.fourier_acc[i],
            };
        }
        for i in half + 1..self.padded_len {
            full[i] = full[self.padded_len - i].conj();
        }

        let mut planner = FftPlanner::new();
        planner
            .plan_fft_inverse(self.padded_len)
            .process(&mut full);

        full.iter().take(self.accel.len()).map(|c| c.re).collect()
    }

    /// Sample times of the record in seconds.
    pub fn time_vector(&self) -> Vec<f64> {
        (0..self.accel.len())
            .map(|i| i as f64 * self.time_step)
            .collect()
    }

    /// Velocity time series in g-s through a transfer function.
    pub fn vel_time_series(&self, tf: Option<&[Complex64]>) -> Vec<f64> {
        self.time_series(Some(&self.integrated_tf(tf, 1)))
    }

    /// Displacement time series in g-s^2 through a transfer function.
    pub fn disp_time_series(&self, tf: Option<&[Complex64]>) -> Vec<f64> {
        self.time_series(Some(&self.integrated_tf(tf, 2)))
    }

    /// Peak absolute acceleration in g through a transfer function.
    pub fn max(&self, tf: Option<&[Complex64]>) -> f64 {
        peak(&self.time_series(tf))
    }

    /// Peak velocity in g-s through a transfer function.
    pub fn max_vel(&self, tf: Option<&[Complex64]>) -> f64 {
        peak(&self.vel_time_series(tf))
    }

    /// Peak displacement in g-s^2 through a transfer function.
    pub fn max_disp(&self, tf: Option<&[Complex64]>) -> f64 {
        peak(&self.disp_time_series(tf))
    }

    /// Response spectrum through a transfer function.
    pub fn compute_sa(&self, periods: &[f64], damping: f64, tf: Option<&[Complex64]>) -> Vec<f64> {
        periods
            .iter()
            .map(|&period| {
                let mut combined = sdof_tf(&self.freq, period, damping);
                if let Some(tf) = tf {
                    for (c, t) in combined.iter_mut().zip(tf.iter()) {
                        *c *= t;
                    }
                }
                peak(&self.time_series(Some(&combined)))
            })
            .collect()
    }

    /// Absolute Fourier amplitude spectrum of acceleration in g-s.
    ///
    /// A five-point moving average is applied, matching the smoothing used
    /// when exporting spectra of recorded motions.
    pub fn abs_fourier_acc(&self, tf: Option<&[Complex64]>) -> Vec<f64> {
        let scale = self.padded_len as f64 * self.time_step;

        let mut fas: Vec<f64> = self
            .fourier_acc
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let amp = match tf {
                    Some(tf) => (c * tf[i]).norm(),
                    None => c.norm(),
                };
                amp * scale
            })
            .collect();

        smooth(&mut fas, 2);
        fas
    }

    /// Transfer function combined with integration in the frequency domain.
    fn integrated_tf(&self, tf: Option<&[Complex64]>, order: u32) -> Vec<Complex64> {
        self.freq
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                if f < 1e-4 {
                    Complex64::new(0.0, 0.0)
                } else {
                    let omega = Complex64::new(0.0, 2.0 * std::f64::consts::PI * f);
                    let base = match tf {
                        Some(tf) => tf[i],
                        None => Complex64::new(1.0, 0.0),
                    };
                    base / omega.powu(order)
                }
            })
            .collect()
    }
}

fn peak(series: &[f64]) -> f64 {
    series.iter().fold(0.0, |max, &v| max.max(v.abs()))
}
