//! Strategy tunables for the EMA Escadinha + magnetic line model.

use serde::{Deserialize, Serialize};

use crate::bot::types::BotConfig;

/// Immutable parameter bundle controlling the indicator transform and the
/// position level calculator.
///
/// Percent fields are whole-number percentages (`1.1` means 1.1%).
/// Deserializing a partial document fills the missing fields from `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Base trend window.
    pub ema_len: usize,
    /// Smoothing window applied to the base trend.
    pub smooth_len: usize,
    /// Window of the dispersion (standard deviation) estimate.
    pub std_len: usize,
    /// Multiplier applied to dispersion to size the offset band.
    pub std_mult: f64,
    /// Fixed absolute offset pushed beyond the band ("magnetic force").
    pub force_mag: f64,
    pub tp1_percent: f64,
    pub tp2_percent: f64,
    pub tp3_percent: f64,
    pub tp4_percent: f64,
    pub sl_percent: f64,
    pub trail_percent: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            ema_len: 9,
            smooth_len: 46,
            std_len: 80,
            std_mult: 0.8,
            force_mag: 155.0,
            tp1_percent: 1.1,
            tp2_percent: 2.3,
            tp3_percent: 4.5,
            tp4_percent: 7.5,
            sl_percent: 1.4,
            trail_percent: 3.0,
        }
    }
}

impl StrategyConfig {
    /// Returns a copy with the backend's per-symbol exit percentages applied.
    ///
    /// The indicator windows stay untouched; the backend does not expose them.
    pub fn with_bot_config(&self, bot: &BotConfig) -> Self {
        Self {
            tp1_percent: bot.tp1_percent,
            tp2_percent: bot.tp2_percent,
            tp3_percent: bot.tp3_percent,
            tp4_percent: bot.tp4_percent,
            sl_percent: bot.sl_percent,
            trail_percent: bot.trailing_percent,
            ..*self
        }
    }

    /// Take-profit percentages in order TP1..TP4.
    pub fn take_profit_percents(&self) -> [f64; 4] {
        [
            self.tp1_percent,
            self.tp2_percent,
            self.tp3_percent,
            self.tp4_percent,
        ]
    }
}
