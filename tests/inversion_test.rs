use approx::assert_abs_diff_eq;
use siteresp::enums::{MotionType, Region};
use siteresp::helper::log_space;
use siteresp::models::response_spectrum::ResponseSpectrum;
use siteresp::motion::point_source::PointSourceModel;
use siteresp::motion::rvt::RvtMotion;

/// A realistic smooth target: the response spectrum of a point source motion.
fn target_spectrum() -> (ResponseSpectrum, f64) {
    let model = PointSourceModel::new(Region::Wus);
    let motion = RvtMotion::from_point_source("Source", MotionType::Outcrop, &model, 50.0);

    let period = log_space(0.02, 5.0, 40);
    let sa = motion.compute_sa(&period, 5.0, None);

    (ResponseSpectrum::new(period, 5.0, sa), model.duration())
}

#[test]
fn test_inversion_reproduces_target_spectrum() {
    let (target, duration) = target_spectrum();

    let (motion, summary) = RvtMotion::from_response_spectrum(
        "Inverted",
        MotionType::Outcrop,
        &target,
        duration,
        true,
        50.0,
    )
    .unwrap();

    assert!(summary.passes <= 30);

    let sa = motion.compute_sa(&target.period, target.damping, None);

    // Geometric mean of the ratio close to one, every period within 12 %
    let mut log_sum = 0.0;
    for (&computed, &target_sa) in sa.iter().zip(target.sa.iter()) {
        let ratio = computed / target_sa;
        assert!(
            ratio > 0.88 && ratio < 1.12,
            "period ratio {} outside tolerance",
            ratio
        );
        log_sum += ratio.ln();
    }
    let geo_mean = (log_sum / sa.len() as f64).exp();
    assert_abs_diff_eq!(geo_mean, 1.0, epsilon = 0.03);
}

#[test]
fn test_inverted_spectrum_is_positive_on_an_increasing_grid() {
    let (target, duration) = target_spectrum();

    let (motion, _) = RvtMotion::from_response_spectrum(
        "Inverted",
        MotionType::Outcrop,
        &target,
        duration,
        true,
        50.0,
    )
    .unwrap();

    assert!(motion.fas().iter().all(|&v| v > 0.0 && v.is_finite()));
    for pair in motion.freq().windows(2) {
        assert!(pair[1] > pair[0]);
    }

    // The grid reaches below the longest target period
    assert!(motion.freq()[0] <= 1.0 / target.period[target.period.len() - 1]);
}

#[test]
fn test_inversion_rejects_decreasing_periods() {
    let target = ResponseSpectrum::new(vec![1.0, 0.5, 0.1], 5.0, vec![0.1, 0.2, 0.3]);

    assert!(
        RvtMotion::from_response_spectrum("Bad", MotionType::Outcrop, &target, 10.0, true, 50.0)
            .is_err()
    );
}

#[test]
fn test_inversion_without_tail_limit() {
    let (target, duration) = target_spectrum();

    let (motion, _) = RvtMotion::from_response_spectrum(
        "Unlimited",
        MotionType::Outcrop,
        &target,
        duration,
        false,
        50.0,
    )
    .unwrap();

    let sa = motion.compute_sa(&target.period, target.damping, None);
    for (&computed, &target_sa) in sa.iter().zip(target.sa.iter()) {
        let ratio = computed / target_sa;
        assert!(ratio > 0.85 && ratio < 1.15);
    }
}
