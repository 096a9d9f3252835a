use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use siteresp::enums::{DistributionType, LayeringModel, UnitSystem, VelocityModel};
use siteresp::models::profile::Profile;
use siteresp::models::soil_type::SoilType;
use siteresp::models::velocity_layer::{RockLayer, SoilLayer};
use siteresp::variation::layering::ToroLayeringModel;
use siteresp::variation::nonlinear::NonlinearVariation;
use siteresp::variation::velocity::ToroVelocityModel;
use siteresp::variation::{Distribution, SiteVariation};

fn column_profile(layer_count: usize) -> Profile {
    let mut soil_type = SoilType::new("Sand", 19.62);
    soil_type.compute_darendeli_curves();

    let layers = (0..layer_count)
        .map(|_| SoilLayer::new(0, 400.0, 1.0))
        .collect();
    let bedrock = RockLayer::new(1500.0, 22.0, 1.0);

    Profile::new(vec![soil_type], layers, bedrock, UnitSystem::Metric)
}

#[test]
fn test_same_seed_reproduces_the_realisation() {
    let base = column_profile(20);
    let variation = SiteVariation::default();

    let first = variation.realize(&base, &mut StdRng::seed_from_u64(42));
    let second = variation.realize(&base, &mut StdRng::seed_from_u64(42));

    for (a, b) in first.layers.iter().zip(second.layers.iter()) {
        assert_eq!(a.shear_vel(), b.shear_vel());
    }
    assert_eq!(first.bedrock.shear_vel(), second.bedrock.shear_vel());
}

#[test]
fn test_different_seeds_differ() {
    let base = column_profile(20);
    let variation = SiteVariation::default();

    let first = variation.realize(&base, &mut StdRng::seed_from_u64(1));
    let second = variation.realize(&base, &mut StdRng::seed_from_u64(2));

    assert!(first.layers[0].shear_vel() != second.layers[0].shear_vel());
}

#[test]
fn test_velocity_ensemble_statistics() {
    // USGS C: sigma of ln(velocity) is 0.31
    let base = column_profile(40);
    let model = ToroVelocityModel::new(VelocityModel::UsgsC);
    let mut rng = StdRng::seed_from_u64(42);

    let realisations = 400;
    let mut samples: Vec<Vec<f64>> = vec![Vec::new(); 40];

    for _ in 0..realisations {
        let mut layers = base.layers.clone();
        let mut bedrock = base.bedrock.clone();
        model.vary(&mut layers, &mut bedrock, 1.0, &mut rng);

        for (i, layer) in layers.iter().enumerate() {
            samples[i].push((layer.shear_vel() / layer.avg_velocity).ln());
        }
    }

    // Pooled over all layers: the mean of ln(v / median) vanishes and the
    // spread matches the model sigma
    let pooled: Vec<f64> = samples.iter().flatten().copied().collect();
    let mean = pooled.iter().sum::<f64>() / pooled.len() as f64;
    let stdev = (pooled.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / pooled.len() as f64)
        .sqrt();

    assert_abs_diff_eq!(mean, 0.0, epsilon = 0.06);
    assert_abs_diff_eq!(stdev, 0.31, epsilon = 0.05);

    // Every individual depth stays within loose bounds
    for layer_samples in &samples {
        let mean = layer_samples.iter().sum::<f64>() / layer_samples.len() as f64;
        let stdev = (layer_samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / layer_samples.len() as f64)
            .sqrt();

        assert!(mean.abs() < 0.12);
        assert!(stdev > 0.2 && stdev < 0.45);
    }
}

#[test]
fn test_adjacent_layers_are_correlated() {
    let base = column_profile(40);
    let model = ToroVelocityModel::new(VelocityModel::UsgsC);
    let mut rng = StdRng::seed_from_u64(7);

    let mut products = Vec::new();
    for _ in 0..300 {
        let mut layers = base.layers.clone();
        let mut bedrock = base.bedrock.clone();
        model.vary(&mut layers, &mut bedrock, 1.0, &mut rng);

        for pair in layers.windows(2) {
            let a = (pair[0].shear_vel() / pair[0].avg_velocity).ln();
            let b = (pair[1].shear_vel() / pair[1].avg_velocity).ln();
            products.push(a * b);
        }
    }

    // Positive average product of neighboring deviations
    let mean = products.iter().sum::<f64>() / products.len() as f64;
    assert!(mean > 0.02);
}

#[test]
fn test_bedrock_velocity_is_at_least_the_deepest_layer() {
    let base = column_profile(10);
    let model = ToroVelocityModel::new(VelocityModel::UsgsD);
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..200 {
        let mut layers = base.layers.clone();
        let mut bedrock = base.bedrock.clone();
        bedrock.is_varied = true;
        model.vary(&mut layers, &mut bedrock, 1.0, &mut rng);

        assert!(bedrock.shear_vel() >= layers[layers.len() - 1].shear_vel());
    }
}

#[test]
fn test_layering_thickness_sums_to_bedrock_depth() {
    let model = ToroLayeringModel::new(LayeringModel::Toro95);
    let mut rng = StdRng::seed_from_u64(42);

    for depth in [5.0, 30.0, 120.0] {
        let thickness = model.vary(depth, &mut rng);

        assert!(!thickness.is_empty());
        assert!(thickness.iter().all(|&h| h > 0.0));

        let total: f64 = thickness.iter().sum();
        assert_abs_diff_eq!(total, depth, epsilon = 1e-9);
    }
}

#[test]
fn test_layers_thicken_with_depth_on_average() {
    let model = ToroLayeringModel::new(LayeringModel::Toro95);
    let mut rng = StdRng::seed_from_u64(11);

    let mut shallow = Vec::new();
    let mut deep = Vec::new();

    for _ in 0..200 {
        let thickness = model.vary(100.0, &mut rng);
        let mut top = 0.0;
        for h in &thickness {
            if top < 20.0 {
                shallow.push(*h);
            } else if top > 60.0 {
                deep.push(*h);
            }
            top += h;
        }
    }

    let shallow_mean = shallow.iter().sum::<f64>() / shallow.len() as f64;
    let deep_mean = deep.iter().sum::<f64>() / deep.len() as f64;

    assert!(deep_mean > shallow_mean);
}

#[test]
fn test_varied_curves_stay_within_clamps() {
    let variation = NonlinearVariation::default();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..200 {
        let mut soil_type = SoilType::new("Sand", 19.62);
        soil_type.compute_darendeli_curves();
        variation.vary_soil_type(&mut soil_type, &mut rng);

        for &value in soil_type.norm_shear_mod.varied() {
            assert!((0.10..=1.00).contains(&value));
        }
        for &value in soil_type.damping.varied() {
            assert!((0.20..=15.00).contains(&value));
        }
    }
}

#[test]
fn test_modulus_and_damping_move_in_opposite_directions() {
    let variation = NonlinearVariation::default();
    let mut rng = StdRng::seed_from_u64(42);

    let mut base = SoilType::new("Sand", 19.62);
    base.compute_darendeli_curves();
    // A mid-curve index away from the clamps
    let index = 9;
    let avg_g = base.norm_shear_mod.average()[index];
    let avg_d = base.damping.average()[index];

    let mut products = Vec::new();
    for _ in 0..300 {
        let mut soil_type = base.clone();
        variation.vary_soil_type(&mut soil_type, &mut rng);

        let dg = soil_type.norm_shear_mod.varied()[index] - avg_g;
        let dd = soil_type.damping.varied()[index] - avg_d;
        products.push(dg * dd);
    }

    let mean = products.iter().sum::<f64>() / products.len() as f64;
    assert!(mean < 0.0, "expected negative correlation, got {}", mean);
}

#[test]
fn test_distribution_respects_bounds() {
    let distribution = Distribution {
        dist_type: DistributionType::LogNormal,
        avg: 30.0,
        stdev: 0.5,
        min: Some(10.0),
        max: Some(60.0),
    };

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let value = distribution.sample(&mut rng);
        assert!((10.0..=60.0).contains(&value));
    }
}

#[test]
fn test_layering_variation_rebuilds_the_stack() {
    let base = column_profile(30);
    let mut variation = SiteVariation::default();
    variation.profile.is_layering_varied = true;
    variation.profile.is_velocity_varied = false;
    variation.nonlinear.enabled = false;

    let realised = variation.realize(&base, &mut StdRng::seed_from_u64(42));

    assert!(!realised.layers.is_empty());
    assert_abs_diff_eq!(realised.thickness(), base.thickness(), epsilon = 1e-9);

    // Depths are contiguous after the rebuild
    let mut depth = 0.0;
    for layer in &realised.layers {
        assert_abs_diff_eq!(layer.depth, depth, epsilon = 1e-9);
        depth += layer.thickness;
    }
}

#[test]
fn test_bedrock_depth_variation_changes_the_thickness() {
    let base = column_profile(30);
    let mut variation = SiteVariation::default();
    variation.profile.is_velocity_varied = false;
    variation.profile.is_bedrock_depth_varied = true;
    variation.profile.bedrock_depth = Distribution {
        dist_type: DistributionType::Uniform,
        avg: 30.0,
        stdev: 0.0,
        min: Some(15.0),
        max: Some(25.0),
    };
    variation.nonlinear.enabled = false;

    let realised = variation.realize(&base, &mut StdRng::seed_from_u64(42));

    assert!(realised.thickness() >= 15.0 - 1e-9);
    assert!(realised.thickness() <= 25.0 + 1e-9);
}
