use approx::{assert_abs_diff_eq, assert_relative_eq};
use siteresp::enums::{MotionType, Region};
use siteresp::helper::log_space;
use siteresp::motion::point_source::{CrustalAmplification, PointSourceModel};
use siteresp::motion::rvt::RvtMotion;

#[test]
fn test_seismic_moment() {
    let model = PointSourceModel::new(Region::Wus);
    // M0 = 10^(1.5 (M + 10.7)) for M 6.5
    assert_relative_eq!(
        model.seismic_moment(),
        10f64.powf(1.5 * 17.2),
        max_relative = 1e-12
    );
}

#[test]
fn test_corner_frequency_of_reference_event() {
    // M 6.5, 100 bar, 3.5 km/s gives a corner near 0.2 Hz
    let model = PointSourceModel::new(Region::Wus);
    assert_abs_diff_eq!(model.corner_freq(), 0.2, epsilon = 0.01);
}

#[test]
fn test_hypocentral_distance() {
    let mut model = PointSourceModel::new(Region::Wus);
    model.distance = 30.0;
    model.depth = 4.0;

    assert_abs_diff_eq!(model.hypo_distance(), (900.0_f64 + 16.0).sqrt(), epsilon = 1e-12);
}

#[test]
fn test_wus_duration() {
    let model = PointSourceModel::new(Region::Wus);

    let expected = 1.0 / model.corner_freq() + 0.05 * model.hypo_distance();
    assert_abs_diff_eq!(model.duration(), expected, epsilon = 1e-9);
}

#[test]
fn test_ceus_duration_is_continuous_across_segments() {
    let mut model = PointSourceModel::new(Region::Ceus);
    model.depth = 0.0;

    for boundary in [10.0, 70.0, 130.0] {
        model.distance = boundary - 0.01;
        let below = model.duration();
        model.distance = boundary + 0.01;
        let above = model.duration();

        assert_abs_diff_eq!(below, above, epsilon = 0.01);
    }
}

#[test]
fn test_wus_geometric_attenuation() {
    let mut model = PointSourceModel::new(Region::Wus);
    model.distance = 20.0;
    model.depth = 8.0;

    // Within 40 km the attenuation is 1 / R
    assert_relative_eq!(
        model.geo_atten(),
        1.0 / model.hypo_distance(),
        max_relative = 1e-12
    );

    model.distance = 100.0;
    let dist = model.hypo_distance();
    assert_relative_eq!(
        model.geo_atten(),
        1.0 / 40.0 * (40.0 / dist).sqrt(),
        max_relative = 1e-12
    );
}

#[test]
fn test_fourier_spectrum_is_positive_and_finite() {
    let model = PointSourceModel::new(Region::Wus);
    let freq = log_space(0.05, 50.0, 256);
    let fas = model.fourier_spectrum(&freq);

    assert_eq!(fas.len(), freq.len());
    assert!(fas.iter().all(|&v| v > 0.0 && v.is_finite()));
}

#[test]
fn test_site_attenuation_shapes_the_tail() {
    let freq = log_space(0.05, 50.0, 256);

    let wus = PointSourceModel::new(Region::Wus);
    let mut low_kappa = wus.clone();
    low_kappa.site_atten = 0.006;

    let fas_wus = wus.fourier_spectrum(&freq);
    let fas_low = low_kappa.fourier_spectrum(&freq);

    // Less near-surface attenuation keeps more high frequency energy
    let last = freq.len() - 1;
    assert!(fas_low[last] > fas_wus[last]);
}

#[test]
fn test_larger_event_has_larger_spectrum() {
    let freq = log_space(0.05, 50.0, 128);

    let small = PointSourceModel::new(Region::Wus);
    let mut large = small.clone();
    large.moment_mag = 7.5;

    let fas_small = small.fourier_spectrum(&freq);
    let fas_large = large.fourier_spectrum(&freq);

    // A larger moment raises the low frequency plateau
    assert!(fas_large[0] > fas_small[0]);
}

#[test]
fn test_crustal_amplification_interpolation_clamps() {
    let amp = CrustalAmplification::wus();

    assert_abs_diff_eq!(amp.interp_amp_at(0.001), 1.0, epsilon = 1e-9);
    assert!(amp.interp_amp_at(5.0) > 2.0);
    assert!(amp.interp_amp_at(1000.0) >= amp.interp_amp_at(50.0));
}

#[test]
fn test_point_source_motion_carries_model_duration() {
    let model = PointSourceModel::new(Region::Ceus);
    let motion = RvtMotion::from_point_source("Source", MotionType::Outcrop, &model, 50.0);

    assert_abs_diff_eq!(motion.duration(), model.duration(), epsilon = 1e-12);
    assert_eq!(motion.freq().len(), 1024);
    assert!(motion.fas().iter().all(|&v| v > 0.0));
}
