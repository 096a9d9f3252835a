use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::enums::Region;
use crate::helper::interp1d;

/// Amplification of the crust above the source, tabulated over frequency.
///
/// The regional tables are generic rock amplifications consistent with the
/// quarter-wavelength crustal models commonly paired with the point source
/// parameters (soft western rock versus hard eastern rock).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrustalAmplification {
    pub freq: Vec<f64>,
    pub amp: Vec<f64>,
}

impl CrustalAmplification {
    /// Generic rock amplification for western North America.
    pub fn wus() -> Self {
        Self {
            freq: vec![
                0.01, 0.09, 0.16, 0.51, 0.84, 1.25, 2.26, 3.17, 6.05, 16.6, 61.2, 100.0,
            ],
            amp: vec![
                1.00, 1.10, 1.18, 1.42, 1.58, 1.74, 2.06, 2.25, 2.58, 3.13, 4.00, 4.40,
            ],
        }
    }

    /// Hard rock amplification for central and eastern North America.
    pub fn ceus() -> Self {
        Self {
            freq: vec![
                0.01, 0.10, 0.20, 0.30, 0.50, 0.90, 1.25, 1.80, 3.00, 5.30, 8.00, 14.0, 30.0,
                100.0,
            ],
            amp: vec![
                1.00, 1.02, 1.03, 1.05, 1.07, 1.09, 1.11, 1.12, 1.13, 1.14, 1.15, 1.15, 1.15,
                1.15,
            ],
        }
    }

    pub fn custom(freq: Vec<f64>, amp: Vec<f64>) -> Self {
        Self { freq, amp }
    }

    /// Amplification at a frequency, clamped at the tabulated ends.
    pub fn interp_amp_at(&self, freq: f64) -> f64 {
        interp1d(&self.freq, &self.amp, freq)
    }
}

/// Brune single-corner point source model of the Fourier spectrum.
///
/// The spectrum is the product of a source term with corner frequency set by
/// the stress drop, a path term combining geometric spreading and anelastic
/// attenuation, and a site term combining crustal amplification with the
/// near-surface kappa filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointSourceModel {
    pub region: Region,
    /// Moment magnitude
    pub moment_mag: f64,
    /// Epicentral distance in km
    pub distance: f64,
    /// Depth of the source in km
    pub depth: f64,
    /// Stress drop in bars
    pub stress_drop: f64,
    /// Coefficient a of the quality factor Q(f) = a * f^b
    pub path_atten_coeff: f64,
    /// Power b of the quality factor
    pub path_atten_power: f64,
    /// Shear-wave velocity of the crust in km/s
    pub shear_velocity: f64,
    /// Density of the crust in g/cm3
    pub density: f64,
    /// Site attenuation (kappa) in s
    pub site_atten: f64,
    /// Geometric attenuation, only read for the Custom region
    pub custom_geo_atten: f64,
    /// Path duration coefficient, only read for the Custom region
    pub custom_path_dur_coeff: f64,
    pub crustal_amp: CrustalAmplification,
}

impl PointSourceModel {
    /// Creates a model with the published regional parameters.
    pub fn new(region: Region) -> Self {
        let (stress_drop, path_atten_coeff, path_atten_power, shear_velocity, density, site_atten) =
            match region {
                Region::Wus | Region::Custom => (100.0, 180.0, 0.45, 3.5, 2.8, 0.04),
                Region::Ceus => (150.0, 680.0, 0.36, 3.6, 2.8, 0.006),
            };

        let crustal_amp = match region {
            Region::Ceus => CrustalAmplification::ceus(),
            _ => CrustalAmplification::wus(),
        };

        Self {
            region,
            moment_mag: 6.5,
            distance: 20.0,
            depth: 8.0,
            stress_drop,
            path_atten_coeff,
            path_atten_power,
            shear_velocity,
            density,
            site_atten,
            custom_geo_atten: 0.0,
            custom_path_dur_coeff: 0.05,
            crustal_amp,
        }
    }

    /// Seismic moment in dyne-cm.
    pub fn seismic_moment(&self) -> f64 {
        10f64.powf(1.5 * (self.moment_mag + 10.7))
    }

    /// Corner frequency of the source spectrum in Hz.
    pub fn corner_freq(&self) -> f64 {
        4.9e6 * self.shear_velocity * (self.stress_drop / self.seismic_moment()).powf(1.0 / 3.0)
    }

    /// Hypocentral distance in km.
    pub fn hypo_distance(&self) -> f64 {
        (self.depth * self.depth + self.distance * self.distance).sqrt()
    }

    /// Geometric attenuation, piecewise in hypocentral distance.
    pub fn geo_atten(&self) -> f64 {
        let dist = self.hypo_distance();

        match self.region {
            Region::Custom => self.custom_geo_atten,
            Region::Wus => {
                if dist < 40.0 {
                    1.0 / dist
                } else {
                    1.0 / 40.0 * (40.0 / dist).sqrt()
                }
            }
            Region::Ceus => {
                if dist < 70.0 {
                    1.0 / dist
                } else if dist < 130.0 {
                    1.0 / 70.0
                } else {
                    1.0 / 70.0 * (130.0 / dist).sqrt()
                }
            }
        }
    }

    /// Ground motion duration: source duration plus path duration.
    ///
    /// The path duration grows with hypocentral distance; for the eastern
    /// parameters it is piecewise linear with equal values at the segment
    /// intersections (Campbell 2003).
    pub fn duration(&self) -> f64 {
        let source_dur = 1.0 / self.corner_freq();
        let dist = self.hypo_distance();

        let path_dur = match self.region {
            Region::Custom => self.custom_path_dur_coeff * dist,
            Region::Wus => 0.05 * dist,
            Region::Ceus => {
                if dist <= 10.0 {
                    0.0
                } else if dist <= 70.0 {
                    0.16 * (dist - 10.0)
                } else if dist <= 130.0 {
                    0.16 * (70.0 - 10.0) - 0.03 * (dist - 70.0)
                } else {
                    0.16 * (70.0 - 10.0) - 0.03 * (130.0 - 70.0) + 0.04 * (dist - 130.0)
                }
            }
        };

        source_dur + path_dur
    }

    /// Fourier amplitude spectrum of acceleration in g-s.
    ///
    /// # Arguments
    /// * `freq` - Frequency grid in Hz
    pub fn fourier_spectrum(&self, freq: &[f64]) -> Vec<f64> {
        // Conversion factor from dyne-cm into gravity-sec
        let conv = 1e-18 / 981.0;

        // Constant term of the source component
        let c = (0.55 * 2.0)
            / (2f64.sqrt() * 4.0 * PI * self.density * self.shear_velocity.powi(3));

        let seismic_moment = self.seismic_moment();
        let corner_freq = self.corner_freq();
        let hypo_distance = self.hypo_distance();
        let geo_atten = self.geo_atten();

        freq.iter()
            .map(|&f| {
                let source = c * seismic_moment / (1.0 + (f / corner_freq).powi(2));

                let path_atten = self.path_atten_coeff * f.powf(self.path_atten_power);
                let path = geo_atten
                    * ((-PI * f * hypo_distance) / (path_atten * self.shear_velocity)).exp();

                let site = self.crustal_amp.interp_amp_at(f) * (-PI * self.site_atten * f).exp();

                // Combine the three components and convert from displacement
                // to acceleration
                conv * (2.0 * PI * f).powi(2) * source * path * site
            })
            .collect()
    }
}
