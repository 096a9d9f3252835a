/// Result of a semi-infinite integration.
#[derive(Debug, Clone, Copy)]
pub struct QuadratureResult {
    pub value: f64,
    /// False when the subdivision cap was exhausted before the tolerance was met
    pub converged: bool,
}

const MAX_SUBDIVISIONS: usize = 1000;

/// Integrates a function over [0, inf) by adaptive Simpson quadrature.
///
/// The half line is mapped onto [0, 1) with z = t / (1 - t), which weights
/// the integrand by 1 / (1 - t)^2. The integrand must decay faster than
/// 1 / z^2 for the mapped function to vanish at t = 1; the peak factor
/// integrand decays like exp(-z^2) and easily qualifies.
///
/// On exhaustion of the subdivision cap the best estimate so far is
/// returned with `converged` set to false.
///
/// # Arguments
/// * `f` - Integrand on [0, inf)
/// * `tolerance` - Absolute tolerance of the estimate
pub fn integrate_semi_infinite<F>(f: F, tolerance: f64) -> QuadratureResult
where
    F: Fn(f64) -> f64,
{
    let mapped = |t: f64| {
        if t >= 1.0 {
            0.0
        } else {
            let z = t / (1.0 - t);
            f(z) / ((1.0 - t) * (1.0 - t))
        }
    };

    let mut budget = MAX_SUBDIVISIONS;

    let a = 0.0;
    let b = 1.0;
    let fa = mapped(a);
    let fb = mapped(b);
    let m = 0.5 * (a + b);
    let fm = mapped(m);
    let whole = simpson(a, b, fa, fm, fb);

    let value = adaptive(&mapped, a, b, fa, fm, fb, whole, tolerance, &mut budget);

    QuadratureResult {
        value,
        converged: budget > 0,
    }
}

fn simpson(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

#[allow(clippy::too_many_arguments)]
fn adaptive<F>(
    f: &F,
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
    tolerance: f64,
    budget: &mut usize,
) -> f64
where
    F: Fn(f64) -> f64,
{
    let m = 0.5 * (a + b);
    let lm = 0.5 * (a + m);
    let rm = 0.5 * (m + b);
    let flm = f(lm);
    let frm = f(rm);

    let left = simpson(a, m, fa, flm, fm);
    let right = simpson(m, b, fm, frm, fb);
    let estimate = left + right;

    // Richardson error estimate for Simpson's rule
    if (estimate - whole).abs() <= 15.0 * tolerance || *budget == 0 {
        return estimate + (estimate - whole) / 15.0;
    }

    *budget -= 1;

    adaptive(f, a, m, fa, flm, fm, left, tolerance / 2.0, budget)
        + adaptive(f, m, b, fm, frm, fb, right, tolerance / 2.0, budget)
}
