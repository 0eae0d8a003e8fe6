//! Candle (OHLCV) data structure with timestamp

use serde::{Deserialize, Serialize};

/// Represents a single candlestick with OHLCV data and timestamp.
///
/// The timestamp is stored as Unix time in milliseconds (candle open time).
/// Candles handed to the indicator engine are expected oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Unix timestamp in milliseconds (candle open time)
    timestamp: u64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl Candle {
    /// Creates a new Candle.
    ///
    /// Use `0` for the timestamp if not available (e.g., in tests).
    pub fn new(
        timestamp: u64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        debug_assert!(high >= low, "candle high must be >= low");

        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Creates a flat candle where open, high, low and close are all `price`.
    pub fn flat(timestamp: u64, price: f64) -> Self {
        Self::new(timestamp, price, price, price, price, 0.0)
    }

    /// Returns the candle's timestamp (Unix time in milliseconds).
    pub fn get_timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn get_open(&self) -> f64 {
        self.open
    }

    pub fn get_high(&self) -> f64 {
        self.high
    }

    pub fn get_low(&self) -> f64 {
        self.low
    }

    pub fn get_close(&self) -> f64 {
        self.close
    }

    pub fn get_volume(&self) -> f64 {
        self.volume
    }

    /// Returns a copy of this candle with `price` folded in as the latest trade.
    ///
    /// The close becomes `price`; high and low widen if the price escapes them.
    pub fn with_price(&self, price: f64) -> Self {
        Self {
            close: price,
            high: self.high.max(price),
            low: self.low.min(price),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_price_extends_range() {
        let candle = Candle::new(1_000, 100.0, 105.0, 95.0, 102.0, 10.0);

        let up = candle.with_price(110.0);
        assert_eq!(up.get_close(), 110.0);
        assert_eq!(up.get_high(), 110.0);
        assert_eq!(up.get_low(), 95.0);

        let down = candle.with_price(90.0);
        assert_eq!(down.get_low(), 90.0);
        assert_eq!(down.get_high(), 105.0);
        assert_eq!(down.get_open(), 100.0);
        assert_eq!(down.get_timestamp(), 1_000);
    }

    #[test]
    fn test_with_price_inside_range_only_moves_close() {
        let candle = Candle::new(0, 100.0, 105.0, 95.0, 102.0, 10.0);
        let updated = candle.with_price(101.0);

        assert_eq!(updated.get_close(), 101.0);
        assert_eq!(updated.get_high(), 105.0);
        assert_eq!(updated.get_low(), 95.0);
        assert_eq!(updated.get_volume(), 10.0);
    }

    #[test]
    fn test_flat_candle() {
        let candle = Candle::flat(42, 100.0);
        assert_eq!(candle.get_open(), 100.0);
        assert_eq!(candle.get_high(), candle.get_low());
        assert_eq!(candle.get_volume(), 0.0);
    }
}
