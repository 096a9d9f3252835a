use approx::assert_abs_diff_eq;
use siteresp::analysis::{RunStatus, SiteResponseModel};
use siteresp::enums::{Method, MotionType, Region, UnitSystem};
use siteresp::models::profile::Profile;
use siteresp::models::soil_type::SoilType;
use siteresp::models::velocity_layer::{RockLayer, SoilLayer};
use siteresp::motion::point_source::PointSourceModel;
use siteresp::motion::rvt::RvtMotion;
use siteresp::motion::{Motion, MotionLibrary};
use siteresp::output::profiles::ProfileOutputKind;
use siteresp::output::spectra::{OutputLocation, SpectraOutputKind};
use std::sync::atomic::Ordering;

fn sand_on_rock() -> Profile {
    let mut soil_type = SoilType::new("Sand", 19.62);
    soil_type.compute_darendeli_curves();

    let layers = vec![
        SoilLayer::new(0, 200.0, 10.0),
        SoilLayer::new(0, 300.0, 20.0),
    ];
    let bedrock = RockLayer::new(760.0, 22.0, 1.0);

    let mut profile = Profile::new(vec![soil_type], layers, bedrock, UnitSystem::Metric);
    profile.input_depth = -1.0;
    profile
}

fn point_source_motion() -> Motion {
    let mut model = PointSourceModel::new(Region::Wus);
    model.distance = 30.0;

    Motion::Rvt(RvtMotion::from_point_source(
        "M6.5 R30",
        MotionType::Outcrop,
        &model,
        25.0,
    ))
}

fn configured_model(profile_count: usize, is_varied: bool) -> SiteResponseModel {
    let mut motions = MotionLibrary::new();
    motions.add(point_source_motion());

    let mut model = SiteResponseModel::new(sand_on_rock(), motions);
    model.profile_count = profile_count;
    model.is_varied = is_varied;
    model.seed = 42;

    model.output.add_profile_output(ProfileOutputKind::MaxAccel);
    model.output.add_profile_output(ProfileOutputKind::MaxStrain);
    model.output.add_profile_output(ProfileOutputKind::InitialShearVel);
    model.output.add_spectra_output(SpectraOutputKind::ResponseSpectrum {
        location: OutputLocation::Depth(0.0),
        motion_type: MotionType::Outcrop,
    });
    model.output.add_spectra_output(SpectraOutputKind::AccelTransferFunction {
        in_location: OutputLocation::Bedrock,
        in_type: MotionType::Outcrop,
        out_location: OutputLocation::Depth(0.0),
        out_type: MotionType::Outcrop,
    });

    model
}

#[test]
fn test_single_realisation_run() {
    let mut model = configured_model(1, false);
    let summary = model.run().unwrap();

    assert_eq!(summary.status, RunStatus::Finished);
    assert_eq!(summary.site_count, 1);
    assert_eq!(summary.motion_count, 1);
    assert_eq!(summary.skipped_realisations, 0);
    assert_eq!(model.progress().load(Ordering::Relaxed), 1);

    // One column per (site, motion) pair in every output
    for output in &model.output.profile_outputs {
        assert_eq!(output.column_count(), 1);
    }
    for output in &model.output.spectra_outputs {
        assert_eq!(output.column_count(), 1);
    }
}

#[test]
fn test_catalog_invariant_over_realisations() {
    let mut model = configured_model(4, true);
    let summary = model.run().unwrap();

    assert_eq!(summary.status, RunStatus::Finished);
    assert_eq!(summary.site_count, 4);

    // data.size() = realisations x enabled motions
    for output in &model.output.profile_outputs {
        assert_eq!(output.column_count(), 4);
    }
    for output in &model.output.spectra_outputs {
        assert_eq!(output.column_count(), 4);
    }
}

#[test]
fn test_surface_motion_is_amplified() {
    let mut model = configured_model(1, false);
    model.run().unwrap();

    let max_accel = &model.output.profile_outputs[0];
    let column = max_accel.column(0);

    // Surface acceleration exceeds the bedrock value for this soft column
    let surface = column[0];
    let bedrock = column[column.len() - 1];
    assert!(surface.is_finite() && bedrock.is_finite());
    assert!(surface > bedrock);
    assert!(surface > 0.0 && surface < 2.0);
}

#[test]
fn test_transfer_function_peak_is_physical() {
    let mut model = configured_model(1, false);
    model.run().unwrap();

    let tf_output = &model.output.spectra_outputs[1];
    let column = tf_output.column(0);

    let peak = column
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, |max, &v| max.max(v));

    // A soft column over stiff rock amplifies well beyond the free surface
    // doubling and stays bounded
    assert!(peak > 1.5 && peak < 50.0);
}

#[test]
fn test_statistics_are_computed_after_finalize() {
    let mut model = configured_model(5, true);
    model.run().unwrap();

    let max_accel = &model.output.profile_outputs[0];
    let stats = max_accel.statistics.as_ref().unwrap();

    assert_eq!(stats.median.len(), max_accel.ref_depth().len());

    // The sigma curves bracket the median where data exists
    for bin in 0..stats.median.len() {
        if stats.median[bin] > 0.0 {
            assert!(stats.minus_sigma[bin] <= stats.median[bin]);
            assert!(stats.median[bin] <= stats.plus_sigma[bin]);
        }
    }
}

#[test]
fn test_same_seed_reproduces_the_run() {
    let mut first = configured_model(3, true);
    first.run().unwrap();

    let mut second = configured_model(3, true);
    second.run().unwrap();

    let a = first.output.profile_outputs[0].statistics.as_ref().unwrap();
    let b = second.output.profile_outputs[0].statistics.as_ref().unwrap();

    for (x, y) in a.median.iter().zip(b.median.iter()) {
        assert_eq!(x, y);
    }
}

#[test]
fn test_linear_elastic_method_runs() {
    let mut model = configured_model(1, false);
    model.calculation.method = Method::LinearElastic;

    let summary = model.run().unwrap();
    assert_eq!(summary.status, RunStatus::Finished);
}

#[test]
fn test_frequency_dependent_method_runs() {
    let mut model = configured_model(1, false);
    model.calculation.method = Method::FrequencyDependent;

    let summary = model.run().unwrap();
    assert_eq!(summary.status, RunStatus::Finished);

    let max_accel = &model.output.profile_outputs[0];
    assert!(max_accel.column(0).iter().all(|v| v.is_finite() || v.is_nan()));
}

#[test]
fn test_run_rejects_empty_motion_library() {
    let mut model = SiteResponseModel::new(sand_on_rock(), MotionLibrary::new());
    assert!(model.run().is_err());
}

#[test]
fn test_run_rejects_invalid_discretisation() {
    let mut motions = MotionLibrary::new();
    motions.add(point_source_motion());

    let mut model = SiteResponseModel::new(sand_on_rock(), motions);
    model.max_freq = 0.0;

    assert!(model.run().is_err());
}

#[test]
fn test_disabled_motions_are_skipped() {
    let mut motions = MotionLibrary::new();
    motions.add(point_source_motion());
    motions.add(point_source_motion());
    motions.set_enabled(1, false);

    let mut model = SiteResponseModel::new(sand_on_rock(), motions);
    model.output.add_profile_output(ProfileOutputKind::MaxAccel);

    let summary = model.run().unwrap();
    assert_eq!(summary.motion_count, 1);
    assert_eq!(model.output.profile_outputs[0].column_count(), 1);
}

#[test]
fn test_equivalent_linear_scenario_converges() {
    // 30 m of sand on rock under a moderate point source motion
    let mut motions = MotionLibrary::new();
    motions.add(point_source_motion());

    let mut model = SiteResponseModel::new(sand_on_rock(), motions);
    model.calculation.max_iterations = 8;
    model.calculation.error_tolerance = 1.0;
    model.output.add_profile_output(ProfileOutputKind::MaxError);

    model.run().unwrap();

    let max_error = model.output.profile_outputs[0]
        .column(0)
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, |max, &v| max.max(v));

    assert!(max_error < 1.0, "max layer error {} %", max_error);
}

#[test]
fn test_time_histories_of_a_recorded_motion() {
    use siteresp::motion::time_series::TimeSeriesMotion;
    use siteresp::output::time_histories::TimeHistoryKind;

    let accel: Vec<f64> = (0..2000)
        .map(|i| 0.05 * (2.0 * std::f64::consts::PI * 1.5 * i as f64 * 0.01).sin())
        .collect();
    let record = TimeSeriesMotion::new("Sine", MotionType::Outcrop, 0.01, accel);
    let samples = record.accel().len();

    let mut motions = MotionLibrary::new();
    motions.add(Motion::TimeSeries(record));

    let mut model = SiteResponseModel::new(sand_on_rock(), motions);
    model.output.add_time_history_output(
        TimeHistoryKind::Accel,
        OutputLocation::Depth(0.0),
        MotionType::Outcrop,
    );
    model.output.add_time_history_output(
        TimeHistoryKind::Strain,
        OutputLocation::Depth(15.0),
        MotionType::Within,
    );

    model.run().unwrap();

    let accel_output = &model.output.time_history_outputs[0];
    assert_eq!(accel_output.column_count(), 1);
    assert_eq!(accel_output.column(0).len(), samples);
    assert_eq!(accel_output.time(0).len(), samples);

    let peak = accel_output
        .column(0)
        .iter()
        .fold(0.0_f64, |max, &v| max.max(v.abs()));
    assert!(peak > 0.0 && peak < 2.0);

    let strain_output = &model.output.time_history_outputs[1];
    assert!(strain_output.column(0).iter().all(|v| v.is_finite()));
}

#[test]
fn test_log_records_the_run() {
    let mut model = configured_model(2, false);
    model.run().unwrap();

    assert!(!model.log.lines().is_empty());
    assert!(model.log.lines().iter().any(|line| line.contains("finished")));
}
