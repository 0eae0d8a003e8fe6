//! Take-profit, stop-loss and trailing levels for an open position.

use serde::Serialize;

use crate::indicators::config::StrategyConfig;
use crate::indicators::signals::Signal;

/// Six exit prices derived from an entry price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelSet {
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
    pub tp4: f64,
    pub sl: f64,
    pub trailing: f64,
}

/// Calculates the exit levels of a position opened at `entry_price` on `side`.
///
/// Take-profits and the trailing reference lie in the direction of profit,
/// the stop loss on the opposite side of entry. `entry_price` is not
/// validated: a non-positive price gives arithmetically defined but
/// meaningless levels.
pub fn calculate_levels(entry_price: f64, side: Signal, config: &StrategyConfig) -> LevelSet {
    let m = side.multiplier();
    let toward = |percent: f64| entry_price * (1.0 + m * percent / 100.0);

    LevelSet {
        tp1: toward(config.tp1_percent),
        tp2: toward(config.tp2_percent),
        tp3: toward(config.tp3_percent),
        tp4: toward(config.tp4_percent),
        sl: entry_price * (1.0 - m * config.sl_percent / 100.0),
        trailing: toward(config.trail_percent),
    }
}

impl LevelSet {
    pub fn take_profits(&self) -> [f64; 4] {
        [self.tp1, self.tp2, self.tp3, self.tp4]
    }

    /// Which of TP1..TP4 `price` has reached for a position on `side`.
    pub fn targets_hit(&self, price: f64, side: Signal) -> [bool; 4] {
        self.take_profits().map(|tp| match side {
            Signal::Long => price >= tp,
            Signal::Short => price <= tp,
        })
    }

    /// Whether `price` has reached the stop loss for a position on `side`.
    pub fn stop_hit(&self, price: f64, side: Signal) -> bool {
        match side {
            Signal::Long => price <= self.sl,
            Signal::Short => price >= self.sl,
        }
    }
}

/// Signed percentage move from `entry_price` to `price`, positive when the
/// move favours `side`.
pub fn pnl_percent(entry_price: f64, price: f64, side: Signal) -> f64 {
    side.multiplier() * (price - entry_price) / entry_price * 100.0
}
