use serde::{Deserialize, Serialize};

/// Log-normal statistics of an output over all enabled realisations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputStatistics {
    /// exp(mean of ln) per reference bin
    pub median: Vec<f64>,
    /// exp(mean - stdev of ln) per reference bin
    pub minus_sigma: Vec<f64>,
    /// exp(mean + stdev of ln) per reference bin
    pub plus_sigma: Vec<f64>,
}

/// Computes per-bin log-normal statistics over sample columns.
///
/// Bins only count columns with a finite, positive sample there, so
/// realisations that did not reach a depth bin (shallower bedrock) simply
/// contribute fewer samples. Bins with no samples report zero.
///
/// # Arguments
/// * `columns` - Sample columns, all on the same reference grid
pub fn lognormal_stats(columns: &[&Vec<f64>]) -> Option<OutputStatistics> {
    let first = columns.first()?;
    let bins = first.len();

    let mut median = vec![0.0; bins];
    let mut minus_sigma = vec![0.0; bins];
    let mut plus_sigma = vec![0.0; bins];

    for bin in 0..bins {
        let samples: Vec<f64> = columns
            .iter()
            .filter_map(|column| {
                let value = *column.get(bin)?;
                (value.is_finite() && value > 0.0).then(|| value.ln())
            })
            .collect();

        if samples.is_empty() {
            continue;
        }

        let count = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / count;
        let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        let stdev = variance.sqrt();

        median[bin] = mean.exp();
        minus_sigma[bin] = (mean - stdev).exp();
        plus_sigma[bin] = (mean + stdev).exp();
    }

    Some(OutputStatistics {
        median,
        minus_sigma,
        plus_sigma,
    })
}
