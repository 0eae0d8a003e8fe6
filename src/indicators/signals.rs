//! Crossover signals between the trend line and the magnetic reference line.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of a crossover signal, also used as the side of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Long,
    Short,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Long => "LONG",
            Signal::Short => "SHORT",
        }
    }

    /// `+1.0` for long, `-1.0` for short.
    pub fn multiplier(&self) -> f64 {
        match self {
            Signal::Long => 1.0,
            Signal::Short => -1.0,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detects the crossover between two adjacent samples, if any.
///
/// Long: trend was at or below the reference and is now strictly above.
/// Short: trend was at or above the reference and is now strictly below.
pub fn crossover(prev_trend: f64, prev_ref: f64, trend: f64, reference: f64) -> Option<Signal> {
    if prev_trend <= prev_ref && trend > reference {
        Some(Signal::Long)
    } else if prev_trend >= prev_ref && trend < reference {
        Some(Signal::Short)
    } else {
        None
    }
}

/// Calculates one optional signal per index. Index 0 never signals.
pub fn signal_series(trend: &[f64], reference: &[f64]) -> Vec<Option<Signal>> {
    debug_assert_eq!(trend.len(), reference.len());

    if trend.is_empty() {
        return Vec::new();
    }

    let mut signals = Vec::with_capacity(trend.len());
    signals.push(None);

    for i in 1..trend.len() {
        signals.push(crossover(trend[i - 1], reference[i - 1], trend[i], reference[i]));
    }

    signals
}
