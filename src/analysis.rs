use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::calculator::CalculationConfig;
use crate::calculator::equiv_linear::EquivLinearCalc;
use crate::enums::LogLevel;
use crate::error::{AnalysisError, Result};
use crate::models::nonlinear_property::CurveSource;
use crate::models::profile::Profile;
use crate::motion::MotionLibrary;
use crate::output::OutputCatalog;
use crate::text_log::TextLog;
use crate::validation::{ValidationError, validate_field};
use crate::variation::SiteVariation;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Finished,
    Cancelled,
}

/// Outcome of a run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub status: RunStatus,
    /// Realisations whose results were kept
    pub site_count: usize,
    /// Enabled motions per realisation
    pub motion_count: usize,
    /// Realisations discarded for numerical instability
    pub skipped_realisations: usize,
}

/// Orchestrates a site response analysis.
///
/// For each realisation the base profile is (optionally) randomized,
/// discretised, propagated for every enabled motion, and handed to the
/// output catalog. The loop is single threaded and cooperative: the
/// cancellation flag is polled between realisations and between motions, and
/// a progress counter is bumped after each realisation.
pub struct SiteResponseModel {
    pub profile: Profile,
    pub motions: MotionLibrary,
    pub calculation: CalculationConfig,
    pub variation: SiteVariation,
    /// Randomize the profile; otherwise every realisation is the base profile
    pub is_varied: bool,
    /// Number of realisations
    pub profile_count: usize,
    /// Seed of the run; equal seeds reproduce equal results
    pub seed: u64,
    /// Maximum frequency resolved by the discretisation in Hz
    pub max_freq: f64,
    /// Sub-layers per wavelength at the maximum frequency
    pub wave_fraction: f64,
    pub output: OutputCatalog,
    pub log: TextLog,
    ok_to_continue: Arc<AtomicBool>,
    progress: Arc<AtomicUsize>,
}

impl SiteResponseModel {
    pub fn new(profile: Profile, motions: MotionLibrary) -> Self {
        Self {
            profile,
            motions,
            calculation: CalculationConfig::default(),
            variation: SiteVariation::default(),
            is_varied: false,
            profile_count: 1,
            seed: 0,
            max_freq: 20.0,
            wave_fraction: 5.0,
            output: OutputCatalog::default(),
            log: TextLog::new(LogLevel::Low),
            ok_to_continue: Arc::new(AtomicBool::new(true)),
            progress: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Flag polled between realisations and motions; clear it to stop.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.ok_to_continue)
    }

    /// Requests a cooperative stop of the run.
    pub fn stop(&self) {
        self.ok_to_continue.store(false, Ordering::Relaxed);
    }

    /// Completed realisation counter, readable from any thread.
    pub fn progress(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.progress)
    }

    fn ok_to_continue(&self) -> bool {
        self.ok_to_continue.load(Ordering::Relaxed)
    }

    /// Validates the configuration before a run.
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        self.profile.validate()?;
        self.calculation.validate()?;
        validate_field("max_freq", self.max_freq, Some(0.0001), None, "model")?;
        validate_field("wave_fraction", self.wave_fraction, Some(0.0001), None, "model")?;
        validate_field("profile_count", self.profile_count, Some(1), None, "model")?;

        if self.motions.enabled_count() == 0 {
            return Err(ValidationError {
                code: "model.motions.empty".to_string(),
                message: "At least one motion must be enabled.".to_string(),
            });
        }

        Ok(())
    }

    /// Runs the analysis.
    ///
    /// Realisations that hit a numerical instability are logged and dropped
    /// without counting; a cancellation drops the partial realisation and
    /// still finalizes the statistics of the completed ones.
    pub fn run(&mut self) -> Result<RunSummary> {
        // Curves of computed soil types are generated before validation so
        // the strain grids exist
        for soil_type in &mut self.profile.soil_types {
            if soil_type.norm_shear_mod.source == CurveSource::Computed
                || soil_type.damping.source == CurveSource::Computed
            {
                soil_type.compute_darendeli_curves();
            }
        }

        self.validate().map_err(AnalysisError::from)?;

        self.ok_to_continue.store(true, Ordering::Relaxed);
        self.progress.store(0, Ordering::Relaxed);

        // The reference grids of the catalog come from the base profile
        self.profile.create_sub_layers(self.max_freq, self.wave_fraction);
        self.output
            .initialize(&self.profile, self.motions.enabled_names());

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut calc = EquivLinearCalc::new(self.calculation.clone());

        let motion_count = self.motions.enabled_count();
        let mut skipped = 0;
        let mut cancelled = false;

        for realisation in 0..self.profile_count {
            if !self.ok_to_continue() {
                cancelled = true;
                break;
            }

            self.log.append_at(
                LogLevel::Low,
                format!(
                    "Generating site and motion variation: {} of {}",
                    realisation + 1,
                    self.profile_count
                ),
            );

            let mut realised = if self.is_varied {
                self.variation.realize(&self.profile, &mut rng)
            } else {
                self.profile.clone()
            };
            realised.create_sub_layers(self.max_freq, self.wave_fraction);

            self.output.begin_site();
            let mut site_failed = false;

            for motion in self.motions.enabled_motions() {
                if !self.ok_to_continue() {
                    cancelled = true;
                    break;
                }

                self.log
                    .append_at(LogLevel::Medium, format!("\t\tMotion: {}", motion.name()));

                match calc.run(motion, &mut realised, &mut self.log) {
                    Ok(_) => {
                        self.output.save_results(&calc, &realised, motion);
                    }
                    Err(AnalysisError::NumericalInstability { context }) => {
                        self.log.diagnostic(format!(
                            "\t\t!! -- Numerical instability in {} ({}), realisation discarded",
                            context,
                            motion.name()
                        ));
                        site_failed = true;
                        break;
                    }
                    Err(err) => return Err(err),
                }
            }

            realised.reset_sub_layers();

            if cancelled || site_failed {
                // Drop the partial realisation
                self.output.remove_last_site();

                if cancelled {
                    break;
                }

                skipped += 1;
                continue;
            }

            self.progress.store(realisation + 1, Ordering::Relaxed);
        }

        self.output.finalize();

        let status = if cancelled {
            self.log.append("Canceled by the user.");
            RunStatus::Cancelled
        } else {
            self.log.append_at(LogLevel::Low, "Calculation finished.");
            RunStatus::Finished
        };

        Ok(RunSummary {
            status,
            site_count: self.output.site_count(),
            motion_count,
            skipped_realisations: skipped,
        })
    }
}
