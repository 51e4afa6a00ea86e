// Moving Average Convergence Divergence (MACD) indicator implementation
use super::ema::ema;
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::{MacdPoint, PricePoint};

pub const DEFAULT_MACD_FAST: usize = 12;
pub const DEFAULT_MACD_SLOW: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;

/// MACD(12, 26, 9) over closing prices.
pub fn macd(closes: &[f64]) -> Vec<MacdPoint> {
    macd_with(closes, DEFAULT_MACD_FAST, DEFAULT_MACD_SLOW, DEFAULT_MACD_SIGNAL)
}

/// MACD line is `ema(fast) - ema(slow)`; signal is the EMA of that line.
pub fn macd_with(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<MacdPoint> {
    let ema_fast = ema(closes, fast);
    let ema_slow = ema(closes, slow);
    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&macd_line, signal);

    macd_line
        .into_iter()
        .zip(signal_line)
        .map(|(macd, signal)| MacdPoint { macd, signal })
        .collect()
}

pub struct Macd {
    name: String,
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            name: format!("MACD({},{},{})", fast, slow, signal),
            fast,
            slow,
            signal,
        }
    }

    pub fn points(&self, data: &[PricePoint]) -> Vec<MacdPoint> {
        macd_with(&closes(data), self.fast, self.slow, self.signal)
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(DEFAULT_MACD_FAST, DEFAULT_MACD_SLOW, DEFAULT_MACD_SIGNAL)
    }
}

impl IndicatorCalculator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "fast": self.fast, "slow": self.slow, "signal": self.signal })
    }

    // Only the MACD line fits a single series; use `points` for the signal.
    fn calculate(&self, data: &[PricePoint]) -> Vec<Option<f64>> {
        self.points(data).into_iter().map(|p| Some(p.macd)).collect()
    }
}
