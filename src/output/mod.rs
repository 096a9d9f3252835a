pub mod profiles;
pub mod spectra;
pub mod statistics;
pub mod time_histories;

use serde::{Deserialize, Serialize};

use crate::calculator::equiv_linear::EquivLinearCalc;
use crate::enums::MotionType;
use crate::helper::log_space;
use crate::models::profile::Profile;
use crate::motion::Motion;
use profiles::{ProfileOutput, ProfileOutputKind};
use spectra::{OutputLocation, SpectraOutput, SpectraOutputKind};
use statistics::lognormal_stats;
use time_histories::{TimeHistoryKind, TimeHistoryOutput};

/// Collects the outputs of every realisation and computes their statistics.
///
/// Each output stores one column per (site, motion) pair, appended in site
/// order with the motions of a site in input order. Columns of disabled
/// pairs are kept but skipped by the statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputCatalog {
    /// Frequency reference grid in Hz
    pub frequency: Vec<f64>,
    /// Period reference grid in s
    pub period: Vec<f64>,
    /// Oscillator damping in percent for response spectra
    pub damping: f64,
    pub profile_outputs: Vec<ProfileOutput>,
    pub spectra_outputs: Vec<SpectraOutput>,
    pub time_history_outputs: Vec<TimeHistoryOutput>,
    motion_count: usize,
    site_count: usize,
    enabled: Vec<Vec<bool>>,
    motion_names: Vec<String>,
}

impl Default for OutputCatalog {
    fn default() -> Self {
        Self {
            frequency: log_space(0.05, 100.0, 512),
            period: log_space(0.01, 10.0, 91),
            damping: 5.0,
            profile_outputs: Vec::new(),
            spectra_outputs: Vec::new(),
            time_history_outputs: Vec::new(),
            motion_count: 0,
            site_count: 0,
            enabled: Vec::new(),
            motion_names: Vec::new(),
        }
    }
}

impl OutputCatalog {
    pub fn add_profile_output(&mut self, kind: ProfileOutputKind) {
        self.profile_outputs.push(ProfileOutput::new(kind));
    }

    pub fn add_spectra_output(&mut self, kind: SpectraOutputKind) {
        self.spectra_outputs.push(SpectraOutput::new(kind));
    }

    pub fn add_time_history_output(
        &mut self,
        kind: TimeHistoryKind,
        location: OutputLocation,
        motion_type: MotionType,
    ) {
        self.time_history_outputs
            .push(TimeHistoryOutput::new(kind, location, motion_type));
    }

    /// Prepares the catalog for a run.
    ///
    /// The reference depth grids come from the discretisation of the base
    /// profile; previously collected data is cleared.
    pub fn initialize(&mut self, base: &Profile, motion_names: Vec<String>) {
        self.motion_count = motion_names.len();
        self.motion_names = motion_names;
        self.site_count = 0;
        self.enabled.clear();

        for output in &mut self.profile_outputs {
            output.initialize(base);
        }
        for output in &mut self.spectra_outputs {
            output.initialize(&self.frequency, &self.period, self.damping);
        }
        for output in &mut self.time_history_outputs {
            output.initialize();
        }
    }

    pub fn motion_count(&self) -> usize {
        self.motion_count
    }

    pub fn site_count(&self) -> usize {
        self.site_count
    }

    pub fn motion_names(&self) -> &[String] {
        &self.motion_names
    }

    /// Opens a new site; its columns follow until the next `begin_site`.
    pub fn begin_site(&mut self) {
        self.site_count += 1;
        self.enabled.push(vec![true; self.motion_count]);
    }

    /// Stores the results of one motion through the current realisation.
    pub fn save_results(&mut self, calc: &EquivLinearCalc, profile: &Profile, motion: &Motion) {
        for output in &mut self.profile_outputs {
            output.add_data(calc, profile, motion);
        }
        for output in &mut self.spectra_outputs {
            output.add_data(calc, profile, motion);
        }
        for output in &mut self.time_history_outputs {
            output.add_data(calc, profile, motion);
        }
    }

    /// Drops the partial results of the last site.
    pub fn remove_last_site(&mut self) {
        if self.site_count == 0 {
            return;
        }

        self.site_count -= 1;
        self.enabled.pop();

        let columns = self.site_count * self.motion_count;
        for output in &mut self.profile_outputs {
            output.truncate(columns);
        }
        for output in &mut self.spectra_outputs {
            output.truncate(columns);
        }
        for output in &mut self.time_history_outputs {
            output.truncate(columns);
        }
    }

    pub fn is_enabled(&self, site: usize, motion: usize) -> bool {
        self.enabled
            .get(site)
            .and_then(|row| row.get(motion))
            .copied()
            .unwrap_or(false)
    }

    pub fn set_enabled(&mut self, site: usize, motion: usize, enabled: bool) {
        if let Some(row) = self.enabled.get_mut(site) {
            if let Some(value) = row.get_mut(motion) {
                *value = enabled;
            }
        }
    }

    /// Column index of a (site, motion) pair.
    pub fn column_index(&self, site: usize, motion: usize) -> usize {
        site * self.motion_count + motion
    }

    /// Computes the statistics of every output over the enabled pairs.
    pub fn finalize(&mut self) {
        let enabled_indices: Vec<usize> = (0..self.site_count)
            .flat_map(|site| (0..self.motion_count).map(move |motion| (site, motion)))
            .filter(|&(site, motion)| self.is_enabled(site, motion))
            .map(|(site, motion)| self.column_index(site, motion))
            .collect();

        for output in &mut self.profile_outputs {
            let columns: Vec<&Vec<f64>> = enabled_indices
                .iter()
                .filter(|&&i| i < output.column_count())
                .map(|&i| output.column(i))
                .collect();
            output.statistics = lognormal_stats(&columns);
        }

        for output in &mut self.spectra_outputs {
            let columns: Vec<&Vec<f64>> = enabled_indices
                .iter()
                .filter(|&&i| i < output.column_count())
                .map(|&i| output.column(i))
                .collect();
            output.statistics = lognormal_stats(&columns);
        }
    }
}
