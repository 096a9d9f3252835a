use approx::{assert_abs_diff_eq, assert_relative_eq};
use siteresp::enums::{MotionType, OscillatorCorrection};
use siteresp::helper::{lin_space, log_space};
use siteresp::motion::rvt::RvtMotion;
use siteresp::motion::sdof_tf;

fn band_limited_motion() -> RvtMotion {
    // Flat spectrum over a finite band, a classic RVT test signal
    let freq = lin_space(0.1, 20.0, 400);
    let fas = vec![0.01; freq.len()];
    RvtMotion::from_fas("Band", MotionType::Outcrop, freq, fas, 10.0)
}

#[test]
fn test_moments_are_positive() {
    let motion = band_limited_motion();
    let fas_sqr: Vec<f64> = motion.fas().iter().map(|&v| v * v).collect();

    for power in [0, 1, 2, 4] {
        assert!(motion.moment(power, &fas_sqr) > 0.0);
    }
}

#[test]
fn test_moments_satisfy_cauchy_schwarz() {
    let motion = band_limited_motion();
    let fas_sqr: Vec<f64> = motion.fas().iter().map(|&v| v * v).collect();

    let m0 = motion.moment(0, &fas_sqr);
    let m2 = motion.moment(2, &fas_sqr);
    let m4 = motion.moment(4, &fas_sqr);

    assert!(m2 * m2 <= m0 * m4);

    // The bandwidth lies in (0, 1]
    let band_width = (m2 * m2 / (m0 * m4)).sqrt();
    assert!(band_width > 0.0 && band_width <= 1.0);
}

#[test]
fn test_zero_moment_of_flat_band() {
    // m0 = 2 * amplitude^2 * band width
    let motion = band_limited_motion();
    let fas_sqr: Vec<f64> = motion.fas().iter().map(|&v| v * v).collect();

    let expected = 2.0 * 0.01 * 0.01 * (20.0 - 0.1);
    assert_relative_eq!(motion.moment(0, &fas_sqr), expected, max_relative = 1e-9);
}

#[test]
fn test_peak_exceeds_rms_by_a_reasonable_factor() {
    let motion = band_limited_motion();
    let fas_sqr: Vec<f64> = motion.fas().iter().map(|&v| v * v).collect();

    let m0 = motion.moment(0, &fas_sqr);
    let rms = (m0 / motion.duration()).sqrt();
    let peak = motion.max(None);

    let peak_factor = peak / rms;
    assert!(
        peak_factor > 1.0 && peak_factor < 6.0,
        "peak factor {} outside the expected range",
        peak_factor
    );
}

#[test]
fn test_peak_factor_grows_with_duration() {
    let freq = lin_space(0.1, 20.0, 400);
    let fas = vec![0.01; freq.len()];

    let short = RvtMotion::from_fas("Short", MotionType::Outcrop, freq.clone(), fas.clone(), 5.0);
    let long = RvtMotion::from_fas("Long", MotionType::Outcrop, freq, fas, 40.0);

    let fas_sqr: Vec<f64> = short.fas().iter().map(|&v| v * v).collect();
    let m0 = short.moment(0, &fas_sqr);

    // More extrema means a larger expected peak relative to the RMS
    let short_factor = short.max(None) / (m0 / short.duration()).sqrt();
    let long_factor = long.max(None) / (m0 / long.duration()).sqrt();

    assert!(long_factor > short_factor);
}

#[test]
fn test_boore_joyner_rms_duration() {
    let mut motion = band_limited_motion();
    motion.osc_correction = OscillatorCorrection::BooreJoyner;

    let period = 0.5;
    let damping = 5.0;

    let duration_osc = period / (2.0 * std::f64::consts::PI * damping / 100.0);
    let ratio = (motion.duration() / period).powi(3);
    let expected = motion.duration() + duration_osc * (ratio / (ratio + 1.0 / 3.0));

    let computed = motion.calc_rms_duration(period, damping, None);
    assert_abs_diff_eq!(computed, expected, epsilon = 1e-12);
}

#[test]
fn test_liu_pezeshk_rms_duration_differs_from_boore_joyner() {
    let motion = band_limited_motion();

    let period = 0.5;
    let damping = 5.0;
    let osc_fas: Vec<f64> = {
        let tf = sdof_tf(motion.freq(), period, damping);
        motion
            .fas()
            .iter()
            .zip(tf.iter())
            .map(|(&fas, tf)| fas * tf.norm())
            .collect()
    };

    let with_fas = motion.calc_rms_duration(period, damping, Some(&osc_fas));
    let without = motion.calc_rms_duration(period, damping, None);

    // Both extend the ground motion duration
    assert!(with_fas > motion.duration());
    assert!(without > motion.duration());
    assert!((with_fas - without).abs() > 1e-6);
}

#[test]
fn test_sdof_tf_resonant_amplitude() {
    let freq = vec![0.5, 1.0, 2.0];
    let tf = sdof_tf(&freq, 1.0, 5.0);

    // At the natural frequency |H| = 1 / (2 d)
    assert_abs_diff_eq!(tf[1].norm(), 1.0 / (2.0 * 0.05), epsilon = 1e-9);

    // Far below resonance the oscillator follows the ground, |H| near 1
    assert_abs_diff_eq!(tf[0].norm(), 4.0 / 3.0, epsilon = 1e-2);
}

#[test]
fn test_compute_sa_short_period_approaches_pga() {
    let motion = log_motion();
    let pga = motion.max(None);

    let sa = motion.compute_sa(&[0.01], 5.0, None);

    // A very stiff oscillator rides the ground motion
    assert_relative_eq!(sa[0], pga, max_relative = 0.1);
}

#[test]
fn test_compute_sa_decays_at_long_period() {
    let motion = log_motion();
    let sa = motion.compute_sa(&[0.05, 0.5, 8.0], 5.0, None);

    assert!(sa[2] < sa[1]);
    assert!(sa.iter().all(|&v| v > 0.0));
}

fn log_motion() -> RvtMotion {
    // A spectrum that decays at both ends, like a real motion
    let freq = log_space(0.1, 50.0, 512);
    let fas: Vec<f64> = freq
        .iter()
        .map(|&f| 0.02 * (f / 2.0) / (1.0 + (f / 2.0).powi(2)) + 1e-6)
        .collect();
    RvtMotion::from_fas("Humped", MotionType::Outcrop, freq, fas, 15.0)
}
