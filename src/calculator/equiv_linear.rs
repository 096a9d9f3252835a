use ndarray::Array2;
use num_complex::Complex64;

use crate::calculator::{CalcSummary, CalculationConfig};
use crate::enums::{LogLevel, Method, MotionType};
use crate::error::{AnalysisError, Result};
use crate::helper::smooth;
use crate::models::location::Location;
use crate::models::profile::Profile;
use crate::motion::Motion;
use crate::text_log::TextLog;

/// Frequencies below this floor are treated as the static limit.
const FREQ_FLOOR: f64 = 1e-4;

/// Frequency domain wave propagation solver.
///
/// The wave field is described per sub-layer by the amplitudes of the
/// up-going (A) and down-going (B) waves, recursively transferred across the
/// layer interfaces by the complex impedance ratio. The equivalent linear
/// iteration updates the modulus and damping of each sub-layer until they are
/// compatible with the effective strain the wave field produces.
pub struct EquivLinearCalc {
    config: CalculationConfig,
    nsl: usize,
    nf: usize,
    freq: Vec<f64>,
    gravity: f64,
    input_location: Location,
    input_type: MotionType,
    /// Densities of the sub-layers and the half-space
    density: Vec<f64>,
    /// Thicknesses of the sub-layers
    thickness: Vec<f64>,
    /// Complex shear modulus per layer and frequency
    shear_mod: Array2<Complex64>,
    wave_a: Array2<Complex64>,
    wave_b: Array2<Complex64>,
    wave_num: Array2<Complex64>,
    /// Strain transfer function at the mid-depth of each sub-layer
    strain_tf: Vec<Vec<Complex64>>,
}

impl EquivLinearCalc {
    pub fn new(config: CalculationConfig) -> Self {
        Self {
            config,
            nsl: 0,
            nf: 0,
            freq: Vec::new(),
            gravity: 9.81,
            input_location: Location::new(0, 0.0),
            input_type: MotionType::Outcrop,
            density: Vec::new(),
            thickness: Vec::new(),
            shear_mod: Array2::from_elem((0, 0), Complex64::new(0.0, 0.0)),
            wave_a: Array2::from_elem((0, 0), Complex64::new(0.0, 0.0)),
            wave_b: Array2::from_elem((0, 0), Complex64::new(0.0, 0.0)),
            wave_num: Array2::from_elem((0, 0), Complex64::new(0.0, 0.0)),
            strain_tf: Vec::new(),
        }
    }

    pub fn config(&self) -> &CalculationConfig {
        &self.config
    }

    pub fn freq(&self) -> &[f64] {
        &self.freq
    }

    pub fn input_location(&self) -> Location {
        self.input_location
    }

    pub fn input_type(&self) -> MotionType {
        self.input_type
    }

    /// Propagates a motion through a discretised profile.
    ///
    /// Repeats the wave computation until the modulus and damping of every
    /// sub-layer are compatible with the effective strain, the error
    /// tolerance is met, or the iteration cap is reached. The linear elastic
    /// method performs a single pass without updating the properties.
    pub fn run(
        &mut self,
        motion: &Motion,
        profile: &mut Profile,
        log: &mut TextLog,
    ) -> Result<CalcSummary> {
        self.nsl = profile.sub_layer_count();
        self.nf = motion.freq_count();
        self.freq = motion.freq().to_vec();
        self.gravity = profile.units.gravity();
        self.input_location = profile.input_location();
        self.input_type = motion.motion_type();

        self.density = (0..=self.nsl).map(|i| profile.density_at(i)).collect();
        self.thickness = profile.sub_layers().iter().map(|sl| sl.thickness).collect();

        let zero = Complex64::new(0.0, 0.0);
        self.shear_mod = Array2::from_elem((self.nsl + 1, self.nf), zero);
        self.wave_a = Array2::from_elem((self.nsl + 1, self.nf), zero);
        self.wave_b = Array2::from_elem((self.nsl + 1, self.nf), zero);
        self.wave_num = Array2::from_elem((self.nsl + 1, self.nf), zero);
        self.strain_tf = vec![vec![zero; self.nf]; self.nsl];

        // The bedrock properties do not change during the iteration
        let bedrock_mod = calc_comp_shear_mod(
            profile.shear_mod_at(self.nsl),
            profile.damping_at(self.nsl) / 100.0,
        );
        for j in 0..self.nf {
            self.shear_mod[[self.nsl, j]] = bedrock_mod;
        }

        let mut iter = 0;
        let mut max_error;

        loop {
            if self.config.method == Method::FrequencyDependent && iter > 0 {
                self.assign_freq_dependent_moduli(motion, profile);
            } else {
                self.assign_moduli(profile);
            }

            self.calc_waves()?;

            for i in 0..self.nsl {
                let location = Location::new(i, self.thickness[i] / 2.0);
                let row = self.calc_strain_tf(location);
                self.strain_tf[i] = row;
            }

            max_error = -1.0_f64;

            for i in 0..self.nsl {
                // The motion is in gravity units; the strain is reported in percent
                let max_strain = 100.0 * self.gravity * motion.calc_max_strain(&self.strain_tf[i]);

                if !max_strain.is_finite() {
                    return Err(AnalysisError::NumericalInstability {
                        context: format!("strain transfer function of sub-layer {}", i),
                    });
                }

                if self.config.method == Method::LinearElastic {
                    profile.sub_layers_mut()[i].record_strain(max_strain, max_strain);
                } else {
                    profile.set_sub_layer_strain(
                        i,
                        self.config.strain_ratio * max_strain,
                        max_strain,
                    );
                }

                max_error = max_error.max(profile.sub_layers()[i].error());
            }

            iter += 1;

            log.append_at(
                LogLevel::High,
                format!("\t\t\tIteration: {} Maximum Error: {:.2} %", iter, max_error),
            );

            if self.config.method == Method::LinearElastic {
                break;
            }
            if max_error <= self.config.error_tolerance || iter >= self.config.max_iterations {
                break;
            }
        }

        let converged = max_error <= self.config.error_tolerance;

        if !converged {
            log.append_at(
                LogLevel::Medium,
                format!(
                    "\t\t\t!! -- Maximum number of iterations reached ({}). Maximum Error: {:.2} %",
                    iter, max_error
                ),
            );
        }

        Ok(CalcSummary {
            iterations: iter,
            max_error: max_error.max(0.0),
            converged,
        })
    }

    /// Fills the complex shear modulus rows from the sub-layer properties.
    fn assign_moduli(&mut self, profile: &Profile) {
        for i in 0..self.nsl {
            let modulus =
                calc_comp_shear_mod(profile.shear_mod_at(i), profile.damping_at(i) / 100.0);
            for j in 0..self.nf {
                self.shear_mod[[i, j]] = modulus;
            }
        }
    }

    /// Fills the complex shear modulus rows with frequency dependent values.
    ///
    /// The effective strain of each sub-layer varies over frequency following
    /// the normalized, smoothed Fourier spectrum of its strain response, so
    /// the stiffness at frequencies away from the dominant response is less
    /// degraded than at the peak.
    fn assign_freq_dependent_moduli(&mut self, motion: &Motion, profile: &Profile) {
        for i in 0..self.nsl {
            let max_strain = profile.sub_layers()[i].max_strain();
            if max_strain <= 0.0 {
                continue;
            }

            let mut strain_fas = motion.abs_fourier_acc(Some(&self.strain_tf[i]));
            smooth(&mut strain_fas, 2);

            let peak = strain_fas.iter().fold(0.0_f64, |max, &v| max.max(v));
            if peak <= 0.0 {
                continue;
            }

            let soil_type = profile.sub_layer_soil_type(i);
            let initial_mod = profile.sub_layers()[i].initial_shear_mod();

            for j in 0..self.nf {
                let eff_strain = max_strain * strain_fas[j] / peak;

                let modulus = initial_mod * soil_type.norm_shear_mod.interp(eff_strain);
                let damping = soil_type.damping.interp(eff_strain) / 100.0;

                self.shear_mod[[i, j]] = calc_comp_shear_mod(modulus, damping);
            }
        }
    }

    /// Computes the wave numbers and the up- and down-going wave amplitudes.
    fn calc_waves(&mut self) -> Result<()> {
        // Complex wave numbers of the system
        for i in 0..=self.nsl {
            for j in 0..self.nf {
                let omega = 2.0 * std::f64::consts::PI * self.freq[j];
                self.wave_num[[i, j]] = omega / (self.shear_mod[[i, j]] / self.density[i]).sqrt();
            }
        }

        for i in 0..self.nsl {
            for j in 0..self.nf {
                // The waves are completely reflected at the free surface
                if i == 0 {
                    self.wave_a[[i, j]] = Complex64::new(1.0, 0.0);
                    self.wave_b[[i, j]] = Complex64::new(1.0, 0.0);
                }

                if self.freq[j] < FREQ_FLOOR {
                    self.wave_a[[i + 1, j]] = Complex64::new(1.0, 0.0);
                    self.wave_b[[i + 1, j]] = Complex64::new(1.0, 0.0);
                } else {
                    let imped = (self.wave_num[[i, j]] * self.shear_mod[[i, j]])
                        / (self.wave_num[[i + 1, j]] * self.shear_mod[[i + 1, j]]);

                    // Phase term over the full layer height
                    let term = Complex64::new(0.0, 1.0) * self.wave_num[[i, j]] * self.thickness[i];

                    self.wave_a[[i + 1, j]] = 0.5 * self.wave_a[[i, j]] * (1.0 + imped)
                        * term.exp()
                        + 0.5 * self.wave_b[[i, j]] * (1.0 - imped) * (-term).exp();

                    self.wave_b[[i + 1, j]] = 0.5 * self.wave_a[[i, j]] * (1.0 - imped)
                        * term.exp()
                        + 0.5 * self.wave_b[[i, j]] * (1.0 + imped) * (-term).exp();
                }

                if !self.wave_a[[i + 1, j]].is_finite() || !self.wave_b[[i + 1, j]].is_finite() {
                    return Err(AnalysisError::NumericalInstability {
                        context: format!("wave amplitudes of sub-layer {}", i + 1),
                    });
                }
            }
        }

        Ok(())
    }

    /// Wave field at a location for a motion type.
    fn waves(&self, freq_idx: usize, location: &Location, motion_type: MotionType) -> Complex64 {
        let term = Complex64::new(0.0, 1.0)
            * self.wave_num[[location.layer, freq_idx]]
            * location.depth;

        let a = self.wave_a[[location.layer, freq_idx]];
        let b = self.wave_b[[location.layer, freq_idx]];

        match motion_type {
            MotionType::Within => a * term.exp() + b * (-term).exp(),
            MotionType::Outcrop => 2.0 * a * term.exp(),
            MotionType::IncomingOnly => a * term.exp(),
        }
    }

    /// Acceleration transfer function between two locations.
    ///
    /// Unity at frequencies below the static floor; in particular the
    /// transfer function from a location to itself is identically one.
    pub fn calc_accel_tf(
        &self,
        in_location: &Location,
        in_type: MotionType,
        out_location: &Location,
        out_type: MotionType,
    ) -> Vec<Complex64> {
        (0..self.nf)
            .map(|j| {
                if self.freq[j] < FREQ_FLOOR {
                    Complex64::new(1.0, 0.0)
                } else {
                    self.waves(j, out_location, out_type) / self.waves(j, in_location, in_type)
                }
            })
            .collect()
    }

    /// Strain transfer function at a location relative to the input motion.
    ///
    /// The numerator is the spatial derivative of the displacement field and
    /// cannot be formed from `waves` since it involves A minus B; the
    /// denominator converts the input acceleration into displacement.
    pub fn calc_strain_tf(&self, location: Location) -> Vec<Complex64> {
        (0..self.nf)
            .map(|j| {
                if self.freq[j] < FREQ_FLOOR {
                    return Complex64::new(0.0, 0.0);
                }

                let k = self.wave_num[[location.layer, j]];
                let term = Complex64::new(0.0, 1.0) * k * location.depth;

                let numer = Complex64::new(0.0, 1.0)
                    * k
                    * (self.wave_a[[location.layer, j]] * term.exp()
                        - self.wave_b[[location.layer, j]] * (-term).exp());

                let omega = 2.0 * std::f64::consts::PI * self.freq[j];
                let denom = -omega * omega * self.waves(j, &self.input_location, self.input_type);

                numer / denom
            })
            .collect()
    }

    /// Shear stress transfer function at a location.
    pub fn calc_stress_tf(&self, location: Location) -> Vec<Complex64> {
        let mut tf = self.calc_strain_tf(location);
        for (j, value) in tf.iter_mut().enumerate() {
            *value *= self.shear_mod[[location.layer, j]];
        }
        tf
    }

    /// Strain transfer function at the mid-depth of a sub-layer, as used by
    /// the final iteration.
    pub fn strain_tf_at(&self, layer: usize) -> &[Complex64] {
        &self.strain_tf[layer]
    }

    /// Peak acceleration at the top of every layer, in g.
    ///
    /// The surface value is an outcrop motion; values at depth combine the
    /// up- and down-going waves.
    pub fn max_accel_profile(&self, motion: &Motion) -> Vec<f64> {
        (0..=self.nsl)
            .map(|i| {
                let out_type = if i == 0 {
                    MotionType::Outcrop
                } else {
                    MotionType::Within
                };

                let tf = self.calc_accel_tf(
                    &self.input_location,
                    self.input_type,
                    &Location::new(i, 0.0),
                    out_type,
                );
                motion.max(Some(&tf))
            })
            .collect()
    }

    /// Peak velocity at the top of every layer, in g-s.
    pub fn max_vel_profile(&self, motion: &Motion) -> Vec<f64> {
        (0..=self.nsl)
            .map(|i| {
                let out_type = if i == 0 {
                    MotionType::Outcrop
                } else {
                    MotionType::Within
                };

                let tf = self.calc_accel_tf(
                    &self.input_location,
                    self.input_type,
                    &Location::new(i, 0.0),
                    out_type,
                );
                motion.max_vel(Some(&tf))
            })
            .collect()
    }
}

/// Complex shear modulus from the real modulus and the damping fraction.
///
/// The frequency independent formulation that preserves the modulus
/// magnitude: `G* = G (1 - 2 d^2 + 2 i d sqrt(1 - d^2))`.
pub fn calc_comp_shear_mod(shear_mod: f64, damping: f64) -> Complex64 {
    shear_mod
        * Complex64::new(
            1.0 - 2.0 * damping * damping,
            2.0 * damping * (1.0 - damping * damping).sqrt(),
        )
}
