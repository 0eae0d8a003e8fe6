//! Volatility indicators: rolling population standard deviation

/// Calculates the rolling standard deviation of `values` over a trailing window.
///
/// Uses the population formula (divide by the window size, not size - 1).
/// Indices without a full window (`i < period - 1`) are filled with `0.0`,
/// as is every index when `period` is zero. Output length equals input length.
pub fn std_dev_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![0.0; values.len()];
    }

    let mut result = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if i + 1 < period {
            result.push(0.0);
            continue;
        }

        let window = &values[i + 1 - period..=i];
        result.push(population_std_dev(window));
    }

    result
}

/// Population standard deviation of a non-empty slice.
fn population_std_dev(window: &[f64]) -> f64 {
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
