use serde::{Deserialize, Serialize};

use crate::calculator::equiv_linear::EquivLinearCalc;
use crate::enums::MotionType;
use crate::models::profile::Profile;
use crate::motion::Motion;
use crate::output::spectra::OutputLocation;

/// Time history extracted from a recorded motion at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeHistoryKind {
    Accel,
    Vel,
    Disp,
    Strain,
    Stress,
}

impl TimeHistoryKind {
    pub fn name(&self) -> &'static str {
        match self {
            TimeHistoryKind::Accel => "Acceleration Time Series",
            TimeHistoryKind::Vel => "Velocity Time Series",
            TimeHistoryKind::Disp => "Displacement Time Series",
            TimeHistoryKind::Strain => "Shear Strain Time Series",
            TimeHistoryKind::Stress => "Shear Stress Time Series",
        }
    }
}

/// Collects time histories of recorded motions through the realisations.
///
/// Only meaningful for recorded motions; spectrum-defined motions have no
/// time axis and contribute empty columns. Each column keeps its own time
/// vector because the records of a library may use different sampling
/// intervals, so no cross-motion statistics are computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeHistoryOutput {
    pub kind: TimeHistoryKind,
    pub location: OutputLocation,
    pub motion_type: MotionType,
    time: Vec<Vec<f64>>,
    data: Vec<Vec<f64>>,
}

impl TimeHistoryOutput {
    pub fn new(kind: TimeHistoryKind, location: OutputLocation, motion_type: MotionType) -> Self {
        Self {
            kind,
            location,
            motion_type,
            time: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn initialize(&mut self) {
        self.time.clear();
        self.data.clear();
    }

    pub fn column_count(&self) -> usize {
        self.data.len()
    }

    pub fn column(&self, index: usize) -> &Vec<f64> {
        &self.data[index]
    }

    /// Sample times of a column in seconds.
    pub fn time(&self, index: usize) -> &Vec<f64> {
        &self.time[index]
    }

    pub fn truncate(&mut self, columns: usize) {
        self.time.truncate(columns);
        self.data.truncate(columns);
    }

    /// Extracts the time history from the realisation and stores a column.
    pub fn add_data(&mut self, calc: &EquivLinearCalc, profile: &Profile, motion: &Motion) {
        let Motion::TimeSeries(record) = motion else {
            self.time.push(Vec::new());
            self.data.push(Vec::new());
            return;
        };

        let gravity = profile.units.gravity();
        let location = self.location.resolve(profile);

        let series = match self.kind {
            TimeHistoryKind::Accel | TimeHistoryKind::Vel | TimeHistoryKind::Disp => {
                let tf = calc.calc_accel_tf(
                    &calc.input_location(),
                    calc.input_type(),
                    &location,
                    self.motion_type,
                );

                match self.kind {
                    TimeHistoryKind::Accel => record.time_series(Some(&tf)),
                    TimeHistoryKind::Vel => record
                        .vel_time_series(Some(&tf))
                        .iter()
                        .map(|&v| gravity * v)
                        .collect(),
                    _ => record
                        .disp_time_series(Some(&tf))
                        .iter()
                        .map(|&v| gravity * v)
                        .collect(),
                }
            }
            TimeHistoryKind::Strain => {
                let tf = calc.calc_strain_tf(location);
                // The motion is in gravity units; the strain is in percent
                record
                    .time_series(Some(&tf))
                    .iter()
                    .map(|&v| 100.0 * gravity * v)
                    .collect()
            }
            TimeHistoryKind::Stress => {
                let tf = calc.calc_stress_tf(location);
                record
                    .time_series(Some(&tf))
                    .iter()
                    .map(|&v| gravity * v)
                    .collect()
            }
        };

        self.time.push(record.time_vector());
        self.data.push(series);
    }
}
