//! Exponential Moving Average (EMA) series and the double-smoothed trend line.

use crate::indicators::candle::Candle;

/// Extracts closing prices in candle order.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.get_close()).collect()
}

/// Calculates the full EMA series over `values`.
///
/// EMA = value * k + EMA_prev * (1 - k)
/// where k = 2 / (period + 1)
///
/// The first EMA value is seeded with the first input value directly, so the
/// output always has the same length as the input (no warm-up prefix).
/// Returns an empty vector for empty input.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema_values = Vec::with_capacity(values.len());
    let mut prev = first;
    ema_values.push(prev);

    for &value in &values[1..] {
        prev = value * k + prev * (1.0 - k);
        ema_values.push(prev);
    }

    ema_values
}

/// EMA of an EMA: smooths `values` with `base_period`, then smooths that
/// result with `smooth_period`. This is the "Escadinha" trend line.
pub fn trend_series(values: &[f64], base_period: usize, smooth_period: usize) -> Vec<f64> {
    let base = ema_series(values, base_period);
    ema_series(&base, smooth_period)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_ema_empty() {
        assert!(ema_series(&[], 9).is_empty());
        assert!(trend_series(&[], 9, 46).is_empty());
    }

    #[test]
    fn test_ema_seeds_with_first_value() {
        let series = ema_series(&[10.0, 11.0, 12.0], 3);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0], 10.0);
    }

    #[test]
    fn test_ema_known_values() {
        // k = 2 / (3 + 1) = 0.5
        let series = ema_series(&[10.0, 12.0, 14.0, 10.0], 3);
        assert_close(series[1], 11.0); // 12*0.5 + 10*0.5
        assert_close(series[2], 12.5); // 14*0.5 + 11*0.5
        assert_close(series[3], 11.25); // 10*0.5 + 12.5*0.5
    }

    #[test]
    fn test_ema_single_value() {
        assert_eq!(ema_series(&[42.0], 9), vec![42.0]);
    }

    #[test]
    fn test_trend_is_ema_of_ema() {
        let values = [100.0, 102.0, 101.0, 105.0, 110.0, 108.0];
        let expected = ema_series(&ema_series(&values, 2), 3);
        assert_eq!(trend_series(&values, 2, 3), expected);
    }

    #[test]
    fn test_trend_lags_base_ema() {
        // In a steady uptrend, the extra smoothing pass keeps the trend below the base EMA
        let values: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let base = ema_series(&values, 3);
        let trend = trend_series(&values, 3, 5);

        assert!(trend[19] < base[19]);
        assert!(base[19] < values[19]);
    }

    #[test]
    fn test_closes_preserves_order() {
        let candles = vec![
            Candle::flat(1, 10.0),
            Candle::flat(2, 11.0),
            Candle::flat(3, 9.0),
        ];
        assert_eq!(closes(&candles), vec![10.0, 11.0, 9.0]);
    }
}
