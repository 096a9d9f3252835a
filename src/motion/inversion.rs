use std::f64::consts::PI;

use crate::enums::{MotionType, OscillatorCorrection};
use crate::error::AnalysisError;
use crate::helper::{interp1d, log_space, loglog_interp};
use crate::models::response_spectrum::ResponseSpectrum;
use crate::motion::rvt::RvtMotion;
use crate::validation::ValidationError;

/// Exponent of the low-frequency power-law extrapolation of the spectrum.
const LOW_FREQ_SLOPE: f64 = 1.92;

/// Constant peak factor assumed by the Vanmarcke estimate.
const VANMARCKE_PEAK_FACTOR: f64 = 2.5;

const MAX_PASSES: usize = 30;
const MIN_RMSE: f64 = 0.005;
const MIN_RMSE_CHANGE: f64 = 0.0002;

/// Outcome of the spectrum inversion.
#[derive(Debug, Clone, Copy)]
pub struct InversionSummary {
    pub passes: usize,
    /// Root-mean-squared relative error of the final spectrum
    pub rmse: f64,
    /// Largest relative error over the period grid
    pub max_error: f64,
    /// True when the RMSE dropped below the target threshold
    pub converged: bool,
}

impl InversionSummary {
    /// The reportable error when the pass budget ran out above the threshold.
    ///
    /// The best estimate of the spectrum is kept either way.
    pub fn error(&self) -> Option<AnalysisError> {
        (!self.converged).then(|| AnalysisError::InversionDidNotConverge { rmse: self.rmse })
    }
}

impl RvtMotion {
    /// Creates a motion whose Fourier spectrum reproduces a target response
    /// spectrum.
    ///
    /// The spectrum is first estimated with the Vanmarcke relation between
    /// spectral density and oscillator response, extrapolated below the
    /// lowest tabulated period as an `f^1.92` power law, and then refined by
    /// ratio-correction passes until the computed response spectrum matches
    /// the target. When the pass budget runs out above the RMSE threshold the
    /// best estimate is kept and reported in the summary.
    ///
    /// # Arguments
    /// * `name` - Motion name
    /// * `motion_type` - How the motion is applied
    /// * `target` - Target response spectrum (increasing periods)
    /// * `duration` - Ground motion duration in s
    /// * `limit_fas` - Force an `f^-1.92` decay of the high-frequency tail
    /// * `max_eng_freq` - Upper bound of the frequency grid in Hz
    pub fn from_response_spectrum(
        name: impl Into<String>,
        motion_type: MotionType,
        target: &ResponseSpectrum,
        duration: f64,
        limit_fas: bool,
        max_eng_freq: f64,
    ) -> Result<(Self, InversionSummary), ValidationError> {
        target.validate()?;

        if target.period.len() < 2 {
            return Err(ValidationError {
                code: "response_spectrum.period.too_few_points".to_string(),
                message: "The inversion requires at least two periods.".to_string(),
            });
        }

        let mut motion = RvtMotion {
            name: name.into(),
            motion_type,
            freq: Vec::new(),
            fas: Vec::new(),
            duration,
            osc_correction: OscillatorCorrection::LiuPezeshk,
        };

        let estimate = vanmarcke_estimate(&motion, target);
        let n = target.period.len();

        // Frequency grid extended below the lowest tabulated frequency
        let target_min_freq = 1.0 / target.period[n - 1];
        motion.freq = log_space((target_min_freq / 2.0).min(0.05), max_eng_freq, 1024);

        // Target spectrum in ascending frequency order
        let target_freq: Vec<f64> = target.period.iter().rev().map(|&p| 1.0 / p).collect();
        let target_fas: Vec<f64> = estimate.iter().rev().copied().collect();

        let nf = motion.freq.len();
        let mut offset = 0;
        motion.fas = vec![0.0; nf];

        let log_fas0 = target_fas[0].ln();

        for i in 0..nf {
            let freq = motion.freq[i];
            if freq < target_min_freq {
                // Power-law extrapolation to seed the initial estimate
                motion.fas[i] = (LOW_FREQ_SLOPE * (freq / target_min_freq).ln() + log_fas0).exp();
                offset = i + 1;
            } else {
                motion.fas[i] = loglog_interp(&target_freq, &target_fas, &[freq])[0];
            }
        }

        // The refinement reads one point past the extrapolated range
        let offset = offset.min(nf - 2);

        let log_period: Vec<f64> = target.period.iter().map(|&p| p.log10()).collect();

        let mut sa = motion.compute_sa(&target.period, target.damping, None);

        let mut rmse = 1.0;
        let mut old_rmse = 1.0;
        let mut max_error = 0.0_f64;
        let mut passes = 0;

        while passes < MAX_PASSES {
            // Correct the spectrum by the ratio of the target to the
            // computed response
            let ratio: Vec<f64> = target
                .sa
                .iter()
                .zip(sa.iter())
                .map(|(&target_sa, &sa)| target_sa / sa)
                .collect();

            for i in offset..nf {
                let period = 1.0 / motion.freq[i];
                motion.fas[i] *= interp1d(&log_period, &ratio, period.log10());
            }

            // Extrapolate the low frequency values
            let log_freq0 = motion.freq[offset].ln();
            let log_fas0 = motion.fas[offset].ln();
            let slope = if limit_fas {
                LOW_FREQ_SLOPE
            } else {
                (motion.fas[offset] / motion.fas[offset + 1]).ln()
                    / (motion.freq[offset] / motion.freq[offset + 1]).ln()
            };

            for i in 0..offset {
                motion.fas[i] = (slope * (motion.freq[i].ln() - log_freq0) + log_fas0).exp();
            }

            // Force down the high frequency tail from the minimum slope point
            if limit_fas {
                let mut min_slope = 0.0;
                let mut min_slope_idx = offset;

                for i in offset..nf - 1 {
                    let tail_slope = (motion.fas[i] / motion.fas[i + 1]).ln()
                        / (motion.freq[i] / motion.freq[i + 1]).ln();

                    if tail_slope < min_slope {
                        min_slope = tail_slope;
                        min_slope_idx = i;
                    }
                }

                let x0 = motion.freq[min_slope_idx].ln();
                let y0 = motion.fas[min_slope_idx].ln();

                for i in min_slope_idx + 1..nf {
                    motion.fas[i] = (-slope * (motion.freq[i].ln() - x0) + y0).exp();
                }
            }

            sa = motion.compute_sa(&target.period, target.damping, None);

            let mut sum_error = 0.0;
            for (&computed, &target_sa) in sa.iter().zip(target.sa.iter()) {
                let error = (computed - target_sa) / target_sa;
                if max_error.abs() < error.abs() {
                    max_error = error;
                }
                sum_error += error * error;
            }
            rmse = (sum_error / sa.len() as f64).sqrt();

            passes += 1;

            if rmse < MIN_RMSE || (old_rmse - rmse).abs() < MIN_RMSE_CHANGE {
                break;
            }
            old_rmse = rmse;
        }

        let summary = InversionSummary {
            passes,
            rmse,
            max_error,
            converged: rmse < MIN_RMSE,
        };

        Ok((motion, summary))
    }
}

/// Estimates the Fourier amplitude spectrum at the target periods.
///
/// Iterating upward in frequency, the spectral density at each period is
/// solved from the target spectral acceleration, a constant peak factor, and
/// the area accumulated at lower frequencies. Non-positive densities are
/// replaced by the previous value.
fn vanmarcke_estimate(motion: &RvtMotion, target: &ResponseSpectrum) -> Vec<f64> {
    let n = target.period.len();
    let mut fas = vec![0.0; n];

    let sdof_factor = PI / (4.0 * target.damping / 100.0) - 1.0;

    let mut prev_fas_sqr = 0.0;
    let mut sum = 0.0;

    for i in (0..n).rev() {
        let freq = 1.0 / target.period[i];
        let sa = target.sa[i];
        let rms_duration = motion.calc_rms_duration(target.period[i], target.damping, None);

        let mut fas_sqr = ((rms_duration * sa * sa)
            / (2.0 * VANMARCKE_PEAK_FACTOR * VANMARCKE_PEAK_FACTOR)
            - sum)
            / (freq * sdof_factor);

        if fas_sqr < 0.0 {
            fas_sqr = prev_fas_sqr;
        }

        // Convert from spectral density into an amplitude
        fas[i] = fas_sqr.sqrt();

        if i == n - 1 {
            sum = fas_sqr * freq / 2.0;
        } else {
            sum += (fas_sqr - prev_fas_sqr) / 2.0 * (freq - 1.0 / target.period[i + 1]);
        }

        prev_fas_sqr = fas_sqr;
    }

    fas
}
