//! Indicator engine: candles in, trend line + magnetic line + signals out.

use serde::Serialize;
use tracing::trace;

use crate::indicators::candle::Candle;
use crate::indicators::config::StrategyConfig;
use crate::indicators::magnetic::reference_line;
use crate::indicators::moving_averages::{closes, trend_series};
use crate::indicators::signals::{Signal, signal_series};
use crate::indicators::volatility::std_dev_series;

/// A candle plus the indicator values computed at its index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnrichedCandle {
    #[serde(flatten)]
    pub candle: Candle,
    /// Double-smoothed EMA ("EMA Escadinha").
    pub trend_value: f64,
    /// Magnetic reference line.
    pub reference_line: f64,
    pub signal: Option<Signal>,
}

impl EnrichedCandle {
    pub fn get_timestamp(&self) -> u64 {
        self.candle.get_timestamp()
    }
}

/// Runs the full indicator pipeline over `candles` (oldest first).
///
/// The result has one entry per input candle, in the same order. Empty input
/// yields an empty vector. The input is only read.
pub fn calculate_indicators(candles: &[Candle], config: &StrategyConfig) -> Vec<EnrichedCandle> {
    if candles.is_empty() {
        return Vec::new();
    }

    let closes = closes(candles);
    let trend = trend_series(&closes, config.ema_len, config.smooth_len);
    let dispersion = std_dev_series(&closes, config.std_len);
    let reference = reference_line(&trend, &dispersion, config.std_mult, config.force_mag);
    let signals = signal_series(&trend, &reference);

    let enriched: Vec<EnrichedCandle> = candles
        .iter()
        .enumerate()
        .map(|(i, candle)| EnrichedCandle {
            candle: *candle,
            trend_value: trend[i],
            reference_line: reference[i],
            signal: signals[i],
        })
        .collect();

    trace!(
        candles = enriched.len(),
        signals = enriched.iter().filter(|c| c.signal.is_some()).count(),
        "indicators calculated"
    );

    enriched
}

/// Returns the most recent candle carrying a signal, if any.
pub fn last_signal(enriched: &[EnrichedCandle]) -> Option<&EnrichedCandle> {
    enriched.iter().rev().find(|c| c.signal.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let timestamp = 1_700_000_000_000 + i as u64 * 60_000;
                Candle::new(timestamp, close, close + 1.0, close - 1.0, close, 10.0)
            })
            .collect()
    }

    fn closes_from_ticks(ticks: &[u16]) -> Vec<f64> {
        ticks.iter().map(|&t| 1_000.0 + t as f64 / 10.0).collect()
    }

    fn small_config(ema_len: u8, smooth_len: u8, std_len: u8) -> StrategyConfig {
        StrategyConfig {
            ema_len: ema_len as usize % 20 + 1,
            smooth_len: smooth_len as usize % 20 + 1,
            std_len: std_len as usize % 30 + 1,
            std_mult: 0.8,
            force_mag: 2.0,
            ..StrategyConfig::default()
        }
    }

    fn signal_indices(enriched: &[EnrichedCandle]) -> Vec<(usize, Signal)> {
        enriched
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.signal.map(|s| (i, s)))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(calculate_indicators(&[], &StrategyConfig::default()).is_empty());
    }

    #[test]
    fn test_single_candle() {
        let candles = candles_from_closes(&[100.0]);
        let enriched = calculate_indicators(&candles, &StrategyConfig::default());

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].trend_value, 100.0);
        // Not rising at index 0, zero dispersion: trend + force
        assert_eq!(enriched[0].reference_line, 255.0);
        assert_eq!(enriched[0].signal, None);
    }

    #[test]
    fn test_constant_closes_settle() {
        let candles = candles_from_closes(&[100.0; 200]);
        let config = StrategyConfig::default();
        let enriched = calculate_indicators(&candles, &config);

        assert!(enriched.iter().all(|c| (c.trend_value - 100.0).abs() < 1e-9));
        assert!(enriched.iter().all(|c| c.signal.is_none()));

        let dispersion = std_dev_series(&closes(&candles), config.std_len);
        assert!(dispersion.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_hand_checked_long_crossover() {
        let config = StrategyConfig {
            ema_len: 2,
            smooth_len: 2,
            std_len: 3,
            std_mult: 1.0,
            force_mag: 0.5,
            ..StrategyConfig::default()
        };
        let candles = candles_from_closes(&[10.0, 10.0, 10.0, 9.0, 8.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
        let enriched = calculate_indicators(&candles, &config);

        // The trend turns up at index 7 and the magnetic line flips beneath it
        assert_eq!(signal_indices(&enriched), vec![(7, Signal::Long)]);
        assert!(enriched[6].trend_value < enriched[6].reference_line);
        assert!(enriched[7].trend_value > enriched[7].reference_line);
    }

    #[test]
    fn test_v_shape_emits_single_long_after_bottom() {
        let mut closes: Vec<f64> = (0..50).map(|i| 200.0 - i as f64).collect();
        closes.extend((1..=50).map(|i| 150.0 + i as f64));
        let candles = candles_from_closes(&closes);
        let enriched = calculate_indicators(&candles, &StrategyConfig::default());

        let signals = signal_indices(&enriched);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].1, Signal::Long);
        assert!(signals[0].0 > 50);
    }

    #[test]
    fn test_inverted_v_emits_short_after_top() {
        let mut closes: Vec<f64> = (0..50).map(|i| 150.0 + i as f64).collect();
        closes.extend((1..=50).map(|i| 199.0 - i as f64));
        let candles = candles_from_closes(&closes);
        let enriched = calculate_indicators(&candles, &StrategyConfig::default());

        let signals = signal_indices(&enriched);
        // Index 1 is the first candle whose direction can be "up"
        assert_eq!(signals.first(), Some(&(1, Signal::Long)));
        assert_eq!(signals.last().map(|s| s.1), Some(Signal::Short));
        assert!(signals.last().unwrap().0 > 50);
    }

    #[test]
    fn test_step_up_trend_is_non_decreasing() {
        let mut closes = vec![100.0; 10];
        closes.extend(vec![110.0; 200]);
        let candles = candles_from_closes(&closes);
        let enriched = calculate_indicators(&candles, &StrategyConfig::default());

        for pair in enriched[10..].windows(2) {
            assert!(pair[1].trend_value >= pair[0].trend_value);
        }
        assert!(enriched.last().unwrap().trend_value <= 110.0);
    }

    #[test]
    fn test_last_signal() {
        let mut closes: Vec<f64> = (0..50).map(|i| 200.0 - i as f64).collect();
        closes.extend((1..=50).map(|i| 150.0 + i as f64));
        let candles = candles_from_closes(&closes);
        let enriched = calculate_indicators(&candles, &StrategyConfig::default());

        let last = last_signal(&enriched).unwrap();
        assert_eq!(last.signal, Some(Signal::Long));
        assert!(last_signal(&enriched[..10]).is_none());
    }

    #[test]
    fn test_serializes_flat() {
        let candles = candles_from_closes(&[100.0]);
        let enriched = calculate_indicators(&candles, &StrategyConfig::default());
        let json = serde_json::to_value(enriched[0]).unwrap();

        assert_eq!(json["close"], 100.0);
        assert_eq!(json["trend_value"], 100.0);
        assert!(json["signal"].is_null());
    }

    #[quickcheck]
    fn prop_output_aligned_with_input(
        ticks: Vec<u16>,
        ema_len: u8,
        smooth_len: u8,
        std_len: u8,
    ) -> bool {
        let candles = candles_from_closes(&closes_from_ticks(&ticks));
        let enriched = calculate_indicators(&candles, &small_config(ema_len, smooth_len, std_len));

        enriched.len() == candles.len()
            && enriched
                .iter()
                .zip(&candles)
                .all(|(e, c)| e.get_timestamp() == c.get_timestamp() && e.candle == *c)
    }

    #[quickcheck]
    fn prop_first_signal_is_none(
        ticks: Vec<u16>,
        ema_len: u8,
        smooth_len: u8,
        std_len: u8,
    ) -> bool {
        let candles = candles_from_closes(&closes_from_ticks(&ticks));
        let enriched = calculate_indicators(&candles, &small_config(ema_len, smooth_len, std_len));

        enriched.first().is_none_or(|c| c.signal.is_none())
    }

    #[quickcheck]
    fn prop_signals_only_on_crossings(
        ticks: Vec<u16>,
        ema_len: u8,
        smooth_len: u8,
        std_len: u8,
    ) -> bool {
        let candles = candles_from_closes(&closes_from_ticks(&ticks));
        let enriched = calculate_indicators(&candles, &small_config(ema_len, smooth_len, std_len));

        enriched.windows(2).all(|pair| {
            let (prev, cur) = (&pair[0], &pair[1]);
            match cur.signal {
                Some(Signal::Long) => {
                    prev.trend_value <= prev.reference_line && cur.trend_value > cur.reference_line
                }
                Some(Signal::Short) => {
                    prev.trend_value >= prev.reference_line && cur.trend_value < cur.reference_line
                }
                None => true,
            }
        })
    }

    #[quickcheck]
    fn prop_recalculation_is_bit_identical(
        ticks: Vec<u16>,
        ema_len: u8,
        smooth_len: u8,
        std_len: u8,
    ) -> bool {
        let candles = candles_from_closes(&closes_from_ticks(&ticks));
        let config = small_config(ema_len, smooth_len, std_len);
        let first = calculate_indicators(&candles, &config);
        let second = calculate_indicators(&candles, &config);

        first.iter().zip(&second).all(|(a, b)| {
            a.trend_value.to_bits() == b.trend_value.to_bits()
                && a.reference_line.to_bits() == b.reference_line.to_bits()
                && a.signal == b.signal
        }) && first.len() == second.len()
    }

    #[quickcheck]
    fn prop_dispersion_zero_before_window(ticks: Vec<u16>, std_len: u8) -> bool {
        let closes = closes_from_ticks(&ticks);
        let period = std_len as usize % 100 + 1;
        let dispersion = std_dev_series(&closes, period);

        dispersion.len() == closes.len()
            && dispersion.iter().take(period - 1).all(|&d| d == 0.0)
    }
}
