use approx::assert_abs_diff_eq;
use siteresp::models::nonlinear_property::{CurveKind, NonlinearProperty};
use siteresp::models::soil_type::SoilType;

fn sample_curve() -> NonlinearProperty {
    NonlinearProperty::new(
        "Test",
        CurveKind::ModulusReduction,
        vec![0.0001, 0.001, 0.01, 0.1, 1.0],
        vec![1.0, 0.9, 0.6, 0.3, 0.1],
    )
}

#[test]
fn test_interp_clamps_below_range() {
    let curve = sample_curve();
    assert_abs_diff_eq!(curve.interp(1e-6), 1.0, epsilon = 1e-12);
}

#[test]
fn test_interp_clamps_above_range() {
    let curve = sample_curve();
    assert_abs_diff_eq!(curve.interp(10.0), 0.1, epsilon = 1e-12);
}

#[test]
fn test_interp_is_linear_in_log_strain() {
    let curve = sample_curve();

    // Halfway between 0.001 and 0.01 in log space
    let strain = (0.001_f64 * 0.01).sqrt();
    let expected = (0.9 + 0.6) / 2.0;
    assert_abs_diff_eq!(curve.interp(strain), expected, epsilon = 1e-9);

    // At a tabulated point
    assert_abs_diff_eq!(curve.interp(0.01), 0.6, epsilon = 1e-12);
}

#[test]
fn test_duplicate_strains_keep_first_occurrence() {
    let curve = NonlinearProperty::new(
        "Test",
        CurveKind::Damping,
        vec![0.0001, 0.001, 0.001, 0.01],
        vec![1.0, 2.0, 5.0, 8.0],
    );

    assert_eq!(curve.strain().len(), 3);
    assert_abs_diff_eq!(curve.interp(0.001), 2.0, epsilon = 1e-12);
}

#[test]
fn test_validate_rejects_single_point() {
    let curve = NonlinearProperty::new(
        "Test",
        CurveKind::Damping,
        vec![0.001],
        vec![5.0],
    );

    assert!(curve.validate("soil_type.damping").is_err());
}

#[test]
fn test_validate_rejects_decreasing_strain() {
    let mut curve = sample_curve();
    curve.set_average(vec![0.01, 0.001, 0.1], vec![0.9, 0.6, 0.3]);

    assert!(curve.validate("soil_type.norm_shear_mod").is_err());
}

#[test]
fn test_varied_values_are_reset_to_average() {
    let mut curve = sample_curve();
    curve.set_varied(vec![0.9, 0.8, 0.5, 0.2, 0.05]);

    assert_abs_diff_eq!(curve.interp(0.01), 0.5, epsilon = 1e-12);

    curve.reset_varied();
    assert_abs_diff_eq!(curve.interp(0.01), 0.6, epsilon = 1e-12);
}

#[test]
fn test_darendeli_curves_shape() {
    let mut soil_type = SoilType::new("Clay", 18.0);
    soil_type.mean_stress = 2.0;
    soil_type.plasticity_index = 0.0;
    soil_type.ocr = 1.0;
    soil_type.compute_darendeli_curves();

    let modulus = &soil_type.norm_shear_mod;
    let damping = &soil_type.damping;

    // 19 point grid over 1e-4 % to 3 %
    assert_eq!(modulus.strain().len(), 19);
    assert_abs_diff_eq!(modulus.strain()[0], 1e-4, epsilon = 1e-10);
    assert_abs_diff_eq!(modulus.strain()[18], 3.0, epsilon = 1e-9);

    // Nearly no reduction at the smallest strain, strong reduction at 3 %
    assert!(modulus.average()[0] > 0.99);
    assert!(modulus.average()[18] < 0.2);

    // The modulus reduction passes one half at the reference strain
    let ref_strain = 0.0352 * 2.0_f64.powf(0.3483);
    assert_abs_diff_eq!(modulus.interp(ref_strain), 0.5, epsilon = 0.02);

    // Damping grows monotonically from the small-strain value
    assert!(damping.average()[0] < 1.5);
    assert!(damping.average()[18] > damping.average()[0]);
    for pair in damping.average().windows(2) {
        assert!(pair[1] >= pair[0]);
    }
}

#[test]
fn test_darendeli_requires_finite_inputs() {
    let mut soil_type = SoilType::new("Clay", 18.0);
    soil_type.mean_stress = f64::NAN;
    soil_type.compute_darendeli_curves();

    assert!(soil_type.validate().is_err());
}
