//! Strategy indicators: EMA Escadinha trend line, magnetic reference line,
//! crossover signals and position exit levels.

pub mod candle;
pub mod config;
pub mod engine;
pub mod levels;
pub mod magnetic;
pub mod moving_averages;
pub mod signals;
pub mod timeframe;
pub mod volatility;

pub use candle::Candle;
pub use config::StrategyConfig;
pub use engine::{EnrichedCandle, calculate_indicators, last_signal};
pub use levels::{LevelSet, calculate_levels, pnl_percent};
pub use signals::Signal;
pub use timeframe::Timeframe;
