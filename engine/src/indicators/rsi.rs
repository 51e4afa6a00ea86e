// Relative Strength Index (RSI) indicator implementation
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::PricePoint;

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// RSI over consecutive differences of `closes`, one entry per difference.
///
/// Gains and losses are kept as running sums over the last `period`
/// differences (a rolling window, not Wilder smoothing). Entries before the
/// window is full are `None`. A window without losses reads exactly 100.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let len = closes.len().saturating_sub(1);
    if period == 0 {
        return vec![None; len];
    }

    let mut results = Vec::with_capacity(len);
    let mut gains = 0.0;
    let mut losses = 0.0;
    let window = period as f64;

    for i in 1..closes.len() {
        let diff = closes[i] - closes[i - 1];
        if diff > 0.0 {
            gains += diff;
        } else {
            losses -= diff;
        }

        if i >= period {
            results.push(Some(rsi_value(gains / window, losses / window)));

            let stale = closes[i - period + 1] - closes[i - period];
            if stale > 0.0 {
                gains -= stale;
            } else {
                losses += stale;
            }
        } else {
            results.push(None);
        }
    }
    results
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    // avg_loss can drift just below zero when the running sums cancel out.
    if avg_loss <= 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    /// Aligned to the input points: the first point has no difference, so it is `None`.
    fn calculate(&self, data: &[PricePoint]) -> Vec<Option<f64>> {
        if data.is_empty() {
            return Vec::new();
        }
        let mut results = Vec::with_capacity(data.len());
        results.push(None);
        results.extend(rsi(&closes(data), self.period));
        results
    }
}
