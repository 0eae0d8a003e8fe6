//! Rolling candle window fed by REST snapshots and pushed price ticks.

use tracing::debug;

use crate::indicators::candle::Candle;
use crate::indicators::config::StrategyConfig;
use crate::indicators::engine::{EnrichedCandle, calculate_indicators};
use crate::indicators::timeframe::Timeframe;

/// Time-ordered candle window for one symbol and timeframe.
///
/// Holds at most `capacity` candles; the oldest are dropped first.
#[derive(Debug, Clone)]
pub struct CandleFeed {
    timeframe: Timeframe,
    capacity: usize,
    candles: Vec<Candle>,
}

impl CandleFeed {
    pub fn new(timeframe: Timeframe, capacity: usize) -> Self {
        Self {
            timeframe,
            capacity: capacity.max(1),
            candles: Vec::with_capacity(capacity.max(1)),
        }
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Upserts `incoming` by timestamp.
    ///
    /// A candle with a known timestamp replaces the stored one (the backend
    /// re-sends the still-open candle); others are inserted in time order.
    /// Unknown candles older than the current window start are ignored. An
    /// empty window accepts everything.
    pub fn merge(&mut self, incoming: &[Candle]) {
        let window_start = self.candles.first().map(|c| c.get_timestamp());

        for candle in incoming {
            match self
                .candles
                .binary_search_by_key(&candle.get_timestamp(), |c| c.get_timestamp())
            {
                Ok(i) => self.candles[i] = *candle,
                Err(_) if window_start.is_some_and(|start| candle.get_timestamp() < start) => {
                    debug!(
                        timestamp = candle.get_timestamp(),
                        "Ignoring candle before window start"
                    );
                }
                Err(i) => self.candles.insert(i, *candle),
            }
        }
        self.trim();
        debug!(candles = self.candles.len(), merged = incoming.len(), "Candle window merged");
    }

    /// Folds a traded price observed at `timestamp` (Unix ms) into the window.
    ///
    /// Ticks inside the newest candle's interval (or older) update that candle.
    /// A tick past it opens a new flat candle aligned to the timeframe.
    pub fn apply_price(&mut self, timestamp: u64, price: f64) {
        let interval = self.timeframe.to_millis();

        if let Some(last) = self.candles.last_mut() {
            if timestamp < last.get_timestamp() + interval {
                *last = last.with_price(price);
                return;
            }
        }

        let open_time = timestamp - timestamp % interval;
        self.candles.push(Candle::flat(open_time, price));
        self.trim();
    }

    /// Runs the indicator engine over the current window.
    pub fn enriched(&self, config: &StrategyConfig) -> Vec<EnrichedCandle> {
        calculate_indicators(&self.candles, config)
    }

    fn trim(&mut self) {
        if self.candles.len() > self.capacity {
            let excess = self.candles.len() - self.capacity;
            self.candles.drain(..excess);
        }
    }
}
