/// Performs linear interpolation for a given x value based on provided x and y vectors.
///
/// # Arguments
/// * `x_values` - Array of x-axis values (must be sorted)
/// * `y_values` - Array of y-axis values
/// * `x` - The x value for which to interpolate
///
/// # Returns
/// * Interpolated y value as f64, clamped to the first/last y outside the range
///
/// # Panics
/// If x_values and y_values lengths are not equal or the vectors are empty.
pub fn interp1d(x_values: &[f64], y_values: &[f64], x: f64) -> f64 {
    assert_eq!(
        x_values.len(),
        y_values.len(),
        "x_values and y_values must have the same length"
    );
    assert!(!x_values.is_empty(), "interpolation vectors must not be empty");

    if x <= x_values[0] {
        return y_values[0];
    }
    if x >= x_values[x_values.len() - 1] {
        return y_values[y_values.len() - 1];
    }

    for i in 0..x_values.len() - 1 {
        let x0 = x_values[i];
        let x1 = x_values[i + 1];
        let y0 = y_values[i];
        let y1 = y_values[i + 1];

        if x >= x0 && x <= x1 {
            return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
        }
    }

    y_values[y_values.len() - 1]
}

/// Linear interpolation/extrapolation in log-log space.
///
/// The log10 of both coordinates is taken and linear interpolation is used to
/// determine the values. Requested x coordinates beyond the tabulated range
/// are extrapolated from the first or last two points.
///
/// # Arguments
/// * `x_values` - Array of x-axis values (positive, sorted)
/// * `y_values` - Array of y-axis values (positive)
/// * `xi` - The x values for which to interpolate
///
/// # Returns
/// * Interpolated y values
pub fn loglog_interp(x_values: &[f64], y_values: &[f64], xi: &[f64]) -> Vec<f64> {
    assert_eq!(
        x_values.len(),
        y_values.len(),
        "x_values and y_values must have the same length"
    );
    assert!(x_values.len() > 1, "at least two points are required");

    let log_x: Vec<f64> = x_values.iter().map(|v| v.log10()).collect();
    let log_y: Vec<f64> = y_values.iter().map(|v| v.log10()).collect();
    let n = log_x.len();

    xi.iter()
        .map(|&x| {
            let lx = x.log10();

            let log_yi = if lx <= log_x[0] {
                // Extrapolate from the first two points
                let slope = (log_y[1] - log_y[0]) / (log_x[1] - log_x[0]);
                log_y[0] + slope * (lx - log_x[0])
            } else if lx >= log_x[n - 1] {
                // Extrapolate from the last two points
                let slope = (log_y[n - 1] - log_y[n - 2]) / (log_x[n - 1] - log_x[n - 2]);
                log_y[n - 1] + slope * (lx - log_x[n - 1])
            } else {
                interp1d(&log_x, &log_y, lx)
            };

            10f64.powf(log_yi)
        })
        .collect()
}

/// Generates `size` linearly spaced values over [min, max].
pub fn lin_space(min: f64, max: f64, size: usize) -> Vec<f64> {
    assert!(size > 1, "at least two points are required");

    let delta = (max - min) / (size - 1) as f64;
    (0..size).map(|i| min + i as f64 * delta).collect()
}

/// Generates `size` logarithmically spaced values over [min, max].
pub fn log_space(min: f64, max: f64, size: usize) -> Vec<f64> {
    assert!(size > 1, "at least two points are required");
    assert!(min > 0.0 && max > 0.0, "log spacing requires positive bounds");

    let log_min = min.log10();
    let delta = (max.log10() - log_min) / (size - 1) as f64;
    (0..size).map(|i| 10f64.powf(log_min + i as f64 * delta)).collect()
}

/// A moving average over the data series.
///
/// The window is the number of points on either side of a given point to
/// average against; it shrinks near the ends of the series.
///
/// # Arguments
/// * `data` - Data series to smooth
/// * `window` - Half-width of the averaging window
pub fn smooth(data: &mut [f64], window: usize) {
    let n = data.len();
    let mut smoothed = vec![0.0; n];

    for i in 0..n {
        let left = i;
        let right = n - 1 - i;
        let adjusted = window.min(left).min(right);

        let sum: f64 = data[i - adjusted..=i + adjusted].iter().sum();
        smoothed[i] = sum / (1 + 2 * adjusted) as f64;
    }

    data.copy_from_slice(&smoothed);
}
